use vigil_core::reducers::{AlertFeed, AlertKind, Hysteresis, RisingEdge};

// =============================================================================
// Trigger primitives
// =============================================================================

#[test]
fn rising_edge_fires_on_transitions_only() {
    let mut edge = RisingEdge::default();
    let inputs = [false, true, true, false, true];
    let fired: Vec<bool> = inputs.iter().map(|&v| edge.observe(v)).collect();
    assert_eq!(fired, vec![false, true, false, false, true]);
    assert_eq!(fired.iter().filter(|&&f| f).count(), 2);
}

#[test]
fn rising_edge_does_not_refire_while_held() {
    let mut edge = RisingEdge::default();
    assert!(edge.observe(true));
    for _ in 0..10 {
        assert!(!edge.observe(true));
    }
    assert!(!edge.observe(false));
    assert!(edge.observe(true));
}

#[test]
fn hysteresis_refires_only_after_rearm() {
    let mut gas = Hysteresis::new(50.0, 45.0);
    let inputs = [10.0, 52.0, 48.0, 44.0, 51.0];
    let fired: Vec<bool> = inputs.iter().map(|&v| gas.observe(v)).collect();
    assert_eq!(fired, vec![false, true, false, false, true]);
}

#[test]
fn hysteresis_dead_band_suppresses_oscillation() {
    let mut gas = Hysteresis::new(50.0, 45.0);
    // Never drops below the lower threshold, so only the first crossing fires
    let inputs = [52.0, 48.0, 52.0];
    let count = inputs.iter().filter(|&&v| gas.observe(v)).count();
    assert_eq!(count, 1);
}

#[test]
fn hysteresis_fires_exactly_at_upper_threshold() {
    let mut gas = Hysteresis::new(50.0, 45.0);
    assert!(gas.observe(50.0));
}

// =============================================================================
// AlertFeed
// =============================================================================

#[test]
fn vibration_edge_appends_earthquake_alert() {
    let mut feed = AlertFeed::default();
    assert!(feed.observe_vibration(true, "10:00:00").is_some());
    assert!(feed.observe_vibration(true, "10:00:01").is_none());

    let alerts: Vec<_> = feed.alerts().collect();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::Earthquake);
    assert_eq!(alerts[0].message, "Earthquake detected");
    assert_eq!(alerts[0].time, "10:00:00");
}

#[test]
fn gas_crossing_appends_gas_leak_alert() {
    let mut feed = AlertFeed::default();
    assert!(feed.observe_gas(10.0, "t").is_none());
    let alert = feed.observe_gas(55.0, "t").cloned();
    assert_eq!(alert.map(|a| a.kind), Some(AlertKind::GasLeak));
}

#[test]
fn alert_list_is_newest_first_and_capped() {
    let mut feed = AlertFeed::new(5, 50.0, 45.0);
    for i in 0..8 {
        // Re-arm between each firing
        feed.observe_vibration(false, "t");
        feed.observe_vibration(true, &format!("t{}", i));
    }
    assert_eq!(feed.len(), 5);

    let times: Vec<_> = feed.alerts().map(|a| a.time.clone()).collect();
    assert_eq!(times, vec!["t7", "t6", "t5", "t4", "t3"]);

    // Ids keep increasing across evictions
    let ids: Vec<_> = feed.alerts().map(|a| a.id).collect();
    assert_eq!(ids, vec![7, 6, 5, 4, 3]);
}

#[test]
fn clear_empties_list_without_touching_arm_state() {
    let mut feed = AlertFeed::default();
    feed.observe_vibration(true, "t");
    feed.observe_gas(60.0, "t");
    assert_eq!(feed.len(), 2);

    feed.clear();
    assert!(feed.is_empty());

    // Both signals are still held, so nothing re-fires
    assert!(feed.observe_vibration(true, "t").is_none());
    assert!(feed.observe_gas(55.0, "t").is_none());

    // Releasing re-arms
    feed.observe_vibration(false, "t");
    feed.observe_gas(40.0, "t");
    assert!(feed.observe_vibration(true, "t").is_some());
    assert!(feed.observe_gas(51.0, "t").is_some());
}
