use std::collections::BTreeSet;

/// Integer addresses in `[min_ref, max_ref]` not occupied by any descriptor
/// row, ascending. Every slot in a panel's range ends up either occupied or
/// explicitly marked empty.
pub fn empty_slots(min_ref: i64, max_ref: i64, occupied: &BTreeSet<i64>) -> Vec<i64> {
    (min_ref..=max_ref)
        .filter(|address| !occupied.contains(address))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_unoccupied_slot() {
        let occupied: BTreeSet<i64> = [0, 4, 9].into_iter().collect();
        let slots = empty_slots(0, 9, &occupied);
        assert_eq!(slots, vec![1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(slots.len(), 10 - occupied.len());
    }

    #[test]
    fn fully_occupied_range_yields_nothing() {
        let occupied: BTreeSet<i64> = (3..=5).collect();
        assert!(empty_slots(3, 5, &occupied).is_empty());
    }

    #[test]
    fn out_of_range_occupancy_is_ignored() {
        let occupied: BTreeSet<i64> = [-5, 100].into_iter().collect();
        assert_eq!(empty_slots(0, 2, &occupied), vec![0, 1, 2]);
    }
}
