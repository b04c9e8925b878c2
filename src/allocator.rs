//! Greedy exam seat allocation.
//!
//! Rooms are walked lowest floor first and, within a floor, largest room
//! first. Whole rooms are taken until the requested count is covered, so the
//! last room may be only partly filled. Seats are never split across rooms.
//!
//! The result uses the fewest rooms *for that traversal order*. It is not a
//! global minimum: with `{A: 30, floor 1}`, `{B: 30, floor 1}` and
//! `{C: 60, floor 2}`, a request for 60 takes A and B even though C alone
//! would do. Floor preference wins over room count.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::data::{AllocationResult, ClassroomRecord};
use crate::error::AllocationError;

/// Total order used to walk the inventory: floor ascending, capacity
/// descending, then room id ascending.
pub fn traversal_order(a: &ClassroomRecord, b: &ClassroomRecord) -> Ordering {
    a.floor_no
        .cmp(&b.floor_no)
        .then_with(|| b.capacity.cmp(&a.capacity))
        .then_with(|| a.room_id.cmp(&b.room_id))
}

/// Sum of the capacities of every room in `inventory`.
pub fn total_capacity(inventory: &[ClassroomRecord]) -> u64 {
    inventory.iter().map(|room| u64::from(room.capacity)).sum()
}

/// Selects the rooms that seat `requested_count` students.
///
/// `inventory` is only borrowed and may be in any order. Room id uniqueness
/// is the caller's responsibility.
pub fn allocate(
    inventory: &[ClassroomRecord],
    requested_count: i64,
) -> Result<AllocationResult, AllocationError> {
    if requested_count < 1 {
        return Err(AllocationError::InvalidRequest(format!(
            "{requested_count} is not a positive student count"
        )));
    }
    let requested = requested_count.unsigned_abs();

    let total_available_capacity = total_capacity(inventory);
    if total_available_capacity < requested {
        return Err(AllocationError::InsufficientCapacity {
            requested,
            total_available_capacity,
        });
    }

    let mut remaining = requested;
    let mut allocated_rooms = Vec::new();
    for room in inventory.iter().sorted_by(|a, b| traversal_order(a, b)) {
        if remaining == 0 {
            break;
        }
        allocated_rooms.push(room.clone());
        remaining = remaining.saturating_sub(u64::from(room.capacity));
    }

    let seats_allocated = total_capacity(&allocated_rooms);
    Ok(AllocationResult {
        rooms_used: allocated_rooms.len(),
        allocated_rooms,
        students_allocated: requested.min(seats_allocated),
        seats_allocated,
        total_available_capacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn room(id: &str, capacity: u32, floor_no: u32) -> ClassroomRecord {
        ClassroomRecord::new(id, capacity, floor_no)
    }

    fn three_rooms() -> Vec<ClassroomRecord> {
        vec![room("R1", 30, 2), room("R2", 50, 1), room("R3", 20, 1)]
    }

    fn ids(result: &AllocationResult) -> Vec<&str> {
        result
            .allocated_rooms
            .iter()
            .map(|r| r.room_id.as_str())
            .collect()
    }

    #[test]
    fn lower_floor_rooms_are_taken_first() {
        let result = allocate(&three_rooms(), 60).unwrap();

        assert_eq!(ids(&result), ["R2", "R3"]);
        assert_eq!(result.students_allocated, 60);
        assert_eq!(result.seats_allocated, 70);
        assert_eq!(result.spare_seats(), 10);
        assert_eq!(result.rooms_used, 2);
        assert_eq!(result.total_available_capacity, 100);
    }

    #[test]
    fn exact_total_capacity_uses_every_room() {
        let result = allocate(&three_rooms(), 100).unwrap();

        assert_eq!(ids(&result), ["R2", "R3", "R1"]);
        assert_eq!(result.students_allocated, 100);
        assert_eq!(result.seats_allocated, 100);
        assert_eq!(result.rooms_used, 3);
    }

    #[test]
    fn one_over_total_capacity_fails() {
        let err = allocate(&three_rooms(), 101).unwrap_err();
        assert_eq!(
            err,
            AllocationError::InsufficientCapacity {
                requested: 101,
                total_available_capacity: 100,
            }
        );
    }

    #[test]
    fn empty_inventory_has_no_capacity() {
        let err = allocate(&[], 1).unwrap_err();
        assert_eq!(
            err,
            AllocationError::InsufficientCapacity {
                requested: 1,
                total_available_capacity: 0,
            }
        );
    }

    #[test]
    fn non_positive_counts_are_invalid() {
        let inventory = vec![room("A", 40, 1)];
        for count in [0, -1, i64::MIN] {
            assert!(matches!(
                allocate(&inventory, count),
                Err(AllocationError::InvalidRequest(_))
            ));
        }
        // validation comes before the capacity check
        assert!(matches!(
            allocate(&[], 0),
            Err(AllocationError::InvalidRequest(_))
        ));
    }

    #[test]
    fn equal_rooms_break_ties_by_room_id() {
        let inventory = vec![room("Y", 30, 1), room("X", 30, 1)];
        let result = allocate(&inventory, 30).unwrap();
        assert_eq!(ids(&result), ["X"]);
    }

    #[test]
    fn last_room_is_taken_whole() {
        let result = allocate(&three_rooms(), 55).unwrap();

        assert_eq!(ids(&result), ["R2", "R3"]);
        assert_eq!(result.students_allocated, 55);
        assert_eq!(result.seats_allocated, 70);
    }

    #[test]
    fn floor_preference_beats_fewer_rooms() {
        let inventory = vec![room("C", 60, 2), room("A", 30, 1), room("B", 30, 1)];
        let result = allocate(&inventory, 60).unwrap();

        // C alone would cover the request, but it sits on a higher floor
        assert_eq!(ids(&result), ["A", "B"]);
    }

    #[test]
    fn near_washroom_does_not_affect_selection() {
        let inventory = vec![
            room("A", 30, 1),
            room("B", 30, 1).near_washroom(true),
        ];
        let result = allocate(&inventory, 30).unwrap();
        assert_eq!(ids(&result), ["A"]);
    }

    #[test]
    fn traversal_order_is_floor_then_capacity_then_id() {
        let mut rooms = vec![
            room("D", 10, 2),
            room("C", 40, 1),
            room("B", 40, 1),
            room("A", 50, 3),
            room("E", 60, 2),
        ];
        rooms.sort_by(traversal_order);
        let order: Vec<_> = rooms.iter().map(|r| r.room_id.as_str()).collect();
        assert_eq!(order, ["B", "C", "E", "D", "A"]);
    }

    fn inventory_strategy() -> impl Strategy<Value = Vec<ClassroomRecord>> {
        prop::collection::vec((1u32..=120, 1u32..=5, any::<bool>()), 0..16).prop_map(|rows| {
            rows
                .into_iter()
                .enumerate()
                .map(|(i, (capacity, floor_no, washroom))| {
                    room(&format!("R{i:02}"), capacity, floor_no).near_washroom(washroom)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn feasible_requests_are_covered_without_redundant_rooms(
            inventory in inventory_strategy(),
            requested in 1i64..=1500,
        ) {
            let total = total_capacity(&inventory);
            let before = inventory.clone();

            match allocate(&inventory, requested) {
                Ok(result) => {
                    let requested = requested as u64;
                    prop_assert!(total >= requested);
                    prop_assert!(result.seats_allocated >= requested);
                    prop_assert_eq!(result.students_allocated, requested);
                    prop_assert_eq!(result.rooms_used, result.allocated_rooms.len());
                    prop_assert_eq!(result.total_available_capacity, total);

                    let (_, head) = result.allocated_rooms.split_last().unwrap();
                    prop_assert!(total_capacity(head) < requested);

                    for (a, b) in result.allocated_rooms.iter().zip(result.allocated_rooms.iter().skip(1)) {
                        prop_assert!(
                            a.floor_no < b.floor_no
                                || (a.floor_no == b.floor_no && a.capacity >= b.capacity)
                        );
                    }
                }
                Err(err) => {
                    prop_assert!(total < requested as u64);
                    prop_assert_eq!(
                        err,
                        AllocationError::InsufficientCapacity {
                            requested: requested as u64,
                            total_available_capacity: total,
                        }
                    );
                }
            }

            prop_assert_eq!(inventory, before);
        }

        #[test]
        fn input_order_does_not_change_the_result(
            inventory in inventory_strategy(),
            requested in 1i64..=600,
        ) {
            let mut reversed = inventory.clone();
            reversed.reverse();

            prop_assert_eq!(allocate(&inventory, requested), allocate(&inventory, requested));
            prop_assert_eq!(allocate(&inventory, requested), allocate(&reversed, requested));
        }
    }
}
