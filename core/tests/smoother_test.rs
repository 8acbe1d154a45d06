use vigil_core::reducers::AsymmetricSmoother;

#[test]
fn rises_with_attack_rate() {
    let mut s = AsymmetricSmoother::default();
    assert!((s.step(1.0) - 0.14).abs() < 1e-9);
    assert!((s.step(1.0) - (0.14 + 0.86 * 0.14)).abs() < 1e-9);
}

#[test]
fn falls_with_release_rate() {
    let mut s = AsymmetricSmoother::default();
    // Drive up first
    for _ in 0..200 {
        s.step(1.0);
    }
    assert!((s.level() - 1.0).abs() < 1e-3);

    let before = s.level();
    let after = s.step(0.0);
    assert!((after - (before - before * 0.07)).abs() < 1e-9);
}

#[test]
fn attack_is_faster_than_release() {
    let mut up = AsymmetricSmoother::default();
    let mut down = AsymmetricSmoother::default();
    for _ in 0..200 {
        down.step(1.0);
    }

    let rise = up.step(1.0);
    let fall_delta = {
        let before = down.level();
        before - down.step(0.0)
    };
    assert!(rise > fall_delta);
}

#[test]
fn snaps_to_target_when_close() {
    let mut s = AsymmetricSmoother::default();
    for _ in 0..500 {
        s.step(1.0);
    }
    assert_eq!(s.level(), 1.0, "level must snap exactly to the target");

    for _ in 0..500 {
        s.step(0.0);
    }
    assert_eq!(s.level(), 0.0);
}
