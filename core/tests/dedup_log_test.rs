use vigil_core::reducers::{DedupKeyed, DedupLog};

#[derive(Debug, Clone, PartialEq)]
struct Reading {
    key: String,
    value: u32,
}

impl Reading {
    fn new(key: &str, value: u32) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }
}

impl DedupKeyed for Reading {
    fn dedup_key(&self) -> String {
        self.key.clone()
    }
}

#[test]
fn ingest_prepends_newest_first() {
    let mut log = DedupLog::new(5);
    assert!(log.ingest(Reading::new("a", 1)));
    assert!(log.ingest(Reading::new("b", 2)));
    assert!(log.ingest(Reading::new("c", 3)));

    let keys: Vec<_> = log.entries().map(|e| e.event.key.clone()).collect();
    assert_eq!(keys, vec!["c", "b", "a"]);
}

#[test]
fn length_never_exceeds_capacity() {
    let mut log = DedupLog::new(5);
    for i in 0..20 {
        log.ingest(Reading::new(&format!("k{}", i), i));
        assert!(log.len() <= 5, "log exceeded capacity at i={}", i);
    }
    assert_eq!(log.len(), 5);

    // Oldest beyond capacity were evicted
    let keys: Vec<_> = log.entries().map(|e| e.event.key.clone()).collect();
    assert_eq!(keys, vec!["k19", "k18", "k17", "k16", "k15"]);
}

#[test]
fn consecutive_duplicate_collapses_to_one_entry() {
    let mut log = DedupLog::new(5);
    assert!(log.ingest(Reading::new("a", 1)));
    assert!(!log.ingest(Reading::new("a", 1)));
    assert!(!log.ingest(Reading::new("a", 1)));
    assert_eq!(log.len(), 1);
}

#[test]
fn non_consecutive_duplicate_logs_twice() {
    let mut log = DedupLog::new(5);
    assert!(log.ingest(Reading::new("a", 1)));
    assert!(log.ingest(Reading::new("b", 2)));
    assert!(log.ingest(Reading::new("a", 1)));
    assert_eq!(log.len(), 3);
}

#[test]
fn sequence_ids_are_unique_and_increasing() {
    let mut log = DedupLog::new(3);
    for i in 0..6 {
        log.ingest(Reading::new(&format!("k{}", i), i));
    }
    let ids: Vec<_> = log.entries().map(|e| e.id).collect();
    assert_eq!(ids, vec![5, 4, 3]);
}

// Pins the observed behavior: clearing the log does NOT reset the dedup
// key, so a re-delivery of the last pre-clear event stays suppressed.
#[test]
fn clear_keeps_dedup_key() {
    let mut log = DedupLog::new(5);
    log.ingest(Reading::new("a", 1));
    log.clear();
    assert!(log.is_empty());

    assert!(!log.ingest(Reading::new("a", 1)), "duplicate of the last pre-clear event must stay suppressed");
    assert!(log.is_empty());

    assert!(log.ingest(Reading::new("b", 2)), "a fresh key must still be logged");
    assert_eq!(log.len(), 1);
}

#[test]
fn update_all_rewrites_every_entry() {
    let mut log = DedupLog::new(5);
    log.ingest(Reading::new("a", 1));
    log.ingest(Reading::new("b", 2));

    log.update_all(|r| r.value += 10);

    let values: Vec<_> = log.entries().map(|e| e.event.value).collect();
    assert_eq!(values, vec![12, 11]);
}

#[test]
fn default_capacity_is_five() {
    let log: DedupLog<Reading> = DedupLog::default();
    assert_eq!(log.capacity(), 5);
}
