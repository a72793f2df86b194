#![allow(missing_docs)]

use relay_links::{DEDUP_WINDOW_CAPACITY, DEDUP_WINDOW_RETAIN, DedupWindow};

#[test]
fn dedup_rejects_repeat_insert() {
    let mut window = DedupWindow::new();
    assert!(window.is_empty());
    assert!(window.insert(42));
    assert!(!window.insert(42));
    assert!(window.contains(42));
    assert_eq!(window.len(), 1);
}

#[test]
fn dedup_holds_capacity_without_trimming() {
    let mut window = DedupWindow::new();
    for id in 1..=1000 {
        window.insert(id);
    }
    assert_eq!(window.len(), DEDUP_WINDOW_CAPACITY);
    assert!(window.contains(1));
}

#[test]
fn dedup_trims_to_most_recent_after_overflow() {
    let mut window = DedupWindow::new();
    for id in 1..=1001 {
        window.insert(id);
    }
    assert_eq!(window.len(), DEDUP_WINDOW_RETAIN);
    assert!(!window.contains(501));
    assert!(window.contains(502));
    assert!(window.contains(1001));
    let kept: Vec<i64> = window.iter().collect();
    assert_eq!(kept, (502..=1001).collect::<Vec<_>>());
}

#[test]
fn dedup_custom_limits_clamp_retain() {
    let mut window = DedupWindow::with_limits(3, 10);
    for id in [7, 8, 9, 10] {
        window.insert(id);
    }
    assert_eq!(window.iter().collect::<Vec<_>>(), vec![8, 9, 10]);
}

#[test]
fn dedup_evicted_id_is_accepted_again() {
    let mut window = DedupWindow::with_limits(2, 1);
    window.insert(1);
    window.insert(2);
    window.insert(3);
    assert_eq!(window.len(), 1);
    assert!(window.insert(1));
}
