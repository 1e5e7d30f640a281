use super::*;

/// Test value: keeps the latest `Some` per slot, like a partial update.
#[derive(Debug, Clone, Default, PartialEq)]
struct Edit {
    a: Option<i32>,
    b: Option<i32>,
}

impl Coalesce for Edit {
    fn coalesce(&mut self, newer: Self) {
        self.a = newer.a.or(self.a);
        self.b = newer.b.or(self.b);
    }
}

fn a(v: i32) -> Edit {
    Edit { a: Some(v), b: None }
}

fn b(v: i32) -> Edit {
    Edit { a: None, b: Some(v) }
}

const WINDOW: Duration = Duration::from_millis(500);

// =============================================================
// State transitions
// =============================================================

#[test]
fn new_debouncer_is_idle() {
    let d: Debouncer<u32, Edit> = Debouncer::new(WINDOW);
    assert_eq!(d.state(), WindowState::Idle);
    assert!(d.deadline().is_none());
    assert_eq!(d.window(), WINDOW);
}

#[test]
fn push_starts_accumulating() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    d.push(1, a(1), now);
    assert_eq!(d.state(), WindowState::Accumulating);
    assert_eq!(d.deadline(), Some(now + WINDOW));
}

#[test]
fn take_moves_to_flushing_then_idle() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    d.push(1, a(1), now);
    let batch = d.take_now().unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(d.state(), WindowState::Flushing);
    d.flush_finished();
    assert_eq!(d.state(), WindowState::Idle);
}

#[test]
fn push_during_flight_opens_fresh_window() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    d.push(1, a(1), now);
    let first = d.take_now().unwrap();
    d.push(1, a(2), now + Duration::from_millis(10));
    assert_eq!(d.state(), WindowState::Accumulating);
    // In-flight batch is unaffected by the new edit.
    assert_eq!(first.get(&1), Some(&a(1)));
    assert_eq!(d.pending().get(&1), Some(&a(2)));
    d.flush_finished();
    assert_eq!(d.state(), WindowState::Accumulating);
}

#[test]
fn flush_finished_without_flight_saturates() {
    let mut d: Debouncer<u32, Edit> = Debouncer::new(WINDOW);
    d.flush_finished();
    assert_eq!(d.state(), WindowState::Idle);
}

// =============================================================
// Deadline
// =============================================================

#[test]
fn not_due_before_window_elapses() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    d.push(1, a(1), now);
    assert!(!d.is_due(now + Duration::from_millis(499)));
    assert!(d.take_due(now + Duration::from_millis(499)).is_none());
    assert!(d.is_due(now + WINDOW));
}

#[test]
fn each_push_restarts_window() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    d.push(1, a(1), now);
    d.push(1, a(2), now + Duration::from_millis(400));
    assert!(!d.is_due(now + Duration::from_millis(600)));
    assert!(d.is_due(now + Duration::from_millis(900)));
}

#[test]
fn take_due_clears_pending_and_deadline() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    d.push(1, a(1), now);
    d.push(2, b(7), now);
    let batch = d.take_due(now + WINDOW).unwrap();
    assert_eq!(batch.len(), 2);
    assert!(d.pending().is_empty());
    assert!(d.deadline().is_none());
    assert!(d.take_due(now + WINDOW * 4).is_none());
}

#[test]
fn take_now_on_empty_returns_none() {
    let mut d: Debouncer<u32, Edit> = Debouncer::new(WINDOW);
    assert!(d.take_now().is_none());
    assert_eq!(d.state(), WindowState::Idle);
}

// =============================================================
// Coalescing
// =============================================================

#[test]
fn same_slot_keeps_last_value() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    for v in 0..10 {
        d.push(1, a(v), now);
    }
    let batch = d.take_now().unwrap();
    assert_eq!(batch.get(&1), Some(&a(9)));
}

#[test]
fn different_slots_are_merged() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    d.push(1, a(1), now);
    d.push(1, b(2), now);
    let batch = d.take_now().unwrap();
    assert_eq!(batch.get(&1), Some(&Edit { a: Some(1), b: Some(2) }));
}

// =============================================================
// amend
// =============================================================

#[test]
fn amend_edits_in_place() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    d.push(1, Edit { a: Some(1), b: Some(2) }, now);
    d.amend(&1, |e| {
        e.a = None;
        true
    });
    assert_eq!(d.pending().get(&1), Some(&b(2)));
    assert_eq!(d.deadline(), Some(now + WINDOW));
}

#[test]
fn amend_dropping_last_entry_returns_to_idle() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    d.push(1, a(1), now);
    d.amend(&1, |_| false);
    assert!(d.pending().is_empty());
    assert!(d.deadline().is_none());
    assert_eq!(d.state(), WindowState::Idle);
}

#[test]
fn amend_missing_key_is_noop() {
    let now = Instant::now();
    let mut d = Debouncer::new(WINDOW);
    d.push(1, a(1), now);
    d.amend(&2, |_| false);
    assert_eq!(d.pending().len(), 1);
}
