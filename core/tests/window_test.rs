use vigil_core::reducers::{EnvironmentWindows, WindowSeries};

#[test]
fn appending_past_capacity_keeps_last_n_in_arrival_order() {
    let mut series = WindowSeries::new(12);
    for i in 0..15 {
        series.push(&format!("t{}", i), i as f64);
    }
    assert_eq!(series.len(), 12);

    let labels: Vec<_> = series.points().map(|p| p.label.clone()).collect();
    let expected: Vec<_> = (3..15).map(|i| format!("t{}", i)).collect();
    assert_eq!(labels, expected);
}

#[test]
fn latest_is_most_recent_sample() {
    let mut series = WindowSeries::new(3);
    series.push("a", 1.0);
    series.push("b", 2.0);
    assert_eq!(series.latest().map(|p| p.value), Some(2.0));
}

#[test]
fn empty_series_has_no_latest() {
    let series = WindowSeries::new(3);
    assert!(series.is_empty());
    assert!(series.latest().is_none());
}

#[test]
fn environment_series_stay_index_aligned() {
    let mut env = EnvironmentWindows::new(12);
    for i in 0..15 {
        env.record(&format!("t{}", i), i as f64, i as f64 * 2.0, i as f64 * 3.0);
    }

    assert_eq!(env.temperature.len(), 12);
    assert_eq!(env.humidity.len(), 12);
    assert_eq!(env.gas.len(), 12);

    // Same label at every index across the three series
    for ((t, h), g) in env
        .temperature
        .points()
        .zip(env.humidity.points())
        .zip(env.gas.points())
    {
        assert_eq!(t.label, h.label);
        assert_eq!(t.label, g.label);
        assert_eq!(h.value, t.value * 2.0);
        assert_eq!(g.value, t.value * 3.0);
    }
}
