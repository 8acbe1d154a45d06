use vigil_core::event::{format_face_time, AccessStatus, FaceStatus, FeedEvent};
use vigil_core::reducers::DedupKeyed;

#[test]
fn parses_telemetry_update_frame() {
    let raw = r#"{
        "event": "update",
        "data": {
            "radar": {"angle": 90, "distance": 120.5},
            "sensors": {"temp": 24.5, "hum": 40.0, "gas": 12, "vib": 1}
        }
    }"#;

    match FeedEvent::parse(raw).expect("should parse") {
        FeedEvent::Update(update) => {
            assert_eq!(update.radar.angle, 90.0);
            assert_eq!(update.radar.distance, 120.5);
            assert_eq!(update.sensors.temp, 24.5);
            assert_eq!(update.sensors.vib, 1);
        }
        other => panic!("wrong kind: {:?}", other),
    }
}

#[test]
fn parses_access_event_frame() {
    let raw = r#"{
        "event": "nfc_event",
        "data": {
            "status": "AUTHORIZED",
            "name": "Sara",
            "uid": "04:A2:19",
            "method": "NFC",
            "time": "12:30:01"
        }
    }"#;

    match FeedEvent::parse(raw).expect("should parse") {
        FeedEvent::Access(event) => {
            assert_eq!(event.status, AccessStatus::Authorized);
            assert_eq!(event.uid, "04:A2:19");
            assert_eq!(event.dedup_key(), "04:A2:19-12:30:01");
        }
        other => panic!("wrong kind: {:?}", other),
    }
}

#[test]
fn parses_face_event_frame() {
    let raw = r#"{
        "event": "face_event",
        "data": {
            "name": "UNKNOWN",
            "status": "unknown",
            "image_url": "/faces/UNKNOWN_20250316_142530_123456.jpg",
            "time": "20250316_142530_123456",
            "camera": "cam_01"
        }
    }"#;

    match FeedEvent::parse(raw).expect("should parse") {
        FeedEvent::Face(event) => {
            assert_eq!(event.status, FaceStatus::Unknown);
            assert_eq!(
                event.dedup_key(),
                "/faces/UNKNOWN_20250316_142530_123456.jpg-20250316_142530_123456"
            );
        }
        other => panic!("wrong kind: {:?}", other),
    }
}

#[test]
fn unknown_event_kind_is_an_error() {
    let raw = r#"{"event": "motor_event", "data": {}}"#;
    assert!(FeedEvent::parse(raw).is_err());
}

#[test]
fn malformed_frames_are_errors_not_panics() {
    for raw in [
        "",
        "not json",
        "{}",
        r#"{"event": "update"}"#,
        r#"{"event": "update", "data": {"radar": {}}}"#,
        r#"{"event": "nfc_event", "data": {"status": "MAYBE"}}"#,
    ] {
        assert!(FeedEvent::parse(raw).is_err(), "should reject: {raw}");
    }
}

#[test]
fn kind_names_match_the_wire() {
    let update = r#"{"event":"update","data":{"radar":{"angle":0,"distance":0},"sensors":{"temp":0,"hum":0,"gas":0,"vib":0}}}"#;
    assert_eq!(FeedEvent::parse(update).unwrap().kind(), "update");
}

#[test]
fn face_time_formats_full_stamp() {
    assert_eq!(
        format_face_time("20250316_142530_123456").as_deref(),
        Some("16/03/2025 14:25:30")
    );
}

#[test]
fn face_time_rejects_short_stamp() {
    assert_eq!(format_face_time("20250316"), None);
    assert_eq!(format_face_time(""), None);
}
