use super::*;

#[test]
fn test_alloc_sequential_indices() {
    let mut alloc = SlotAllocator::new(2);
    assert_eq!(alloc.alloc(), 0);
    assert_eq!(alloc.alloc(), 1);
    assert_eq!(alloc.alloc(), 2);
    assert_eq!(alloc.len(), 3);
    assert_eq!(alloc.high_water_mark(), 3);
}

#[test]
fn test_retired_slot_waits_out_in_flight_window() {
    let mut alloc = SlotAllocator::new(2);
    let a = alloc.alloc();
    let _b = alloc.alloc();

    alloc.retire(a, 10);
    assert_eq!(alloc.len(), 1);

    // Frames 10 and 11 may still read slot 0; it must not be recycled yet
    alloc.collect(11);
    assert_eq!(alloc.alloc(), 2);

    // Two frames later the slot is safe to reuse
    alloc.collect(12);
    assert_eq!(alloc.alloc(), 0);
}

#[test]
fn test_collect_recycles_multiple_slots() {
    let mut alloc = SlotAllocator::new(1);
    let a = alloc.alloc();
    let b = alloc.alloc();
    let c = alloc.alloc();

    alloc.retire(a, 5);
    alloc.retire(c, 5);
    alloc.collect(6);

    // Both parked slots returned to the pool; order within the pool is LIFO
    let first = alloc.alloc();
    let second = alloc.alloc();
    let mut recycled = [first, second];
    recycled.sort_unstable();
    assert_eq!(recycled, [0, 2]);
    assert_eq!(alloc.high_water_mark(), 3);
    let _ = b;
}

#[test]
fn test_is_empty() {
    let mut alloc = SlotAllocator::new(2);
    assert!(alloc.is_empty());
    let a = alloc.alloc();
    assert!(!alloc.is_empty());
    alloc.retire(a, 0);
    assert!(alloc.is_empty());
}

#[test]
fn test_zero_frames_in_flight_recycles_immediately() {
    let mut alloc = SlotAllocator::new(0);
    let a = alloc.alloc();
    alloc.retire(a, 3);
    alloc.collect(3);
    assert_eq!(alloc.alloc(), 0);
}
