use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::AllocationError;

pub type RoomId = String;
pub type Capacity = u32;
pub type FloorNo = u32;

/// A classroom as held by the inventory: normalized and validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomRecord {
    pub room_id: RoomId,
    pub capacity: Capacity,
    pub floor_no: FloorNo,
    /// Informational only, never consulted by the allocator.
    pub near_washroom: bool,
}

impl ClassroomRecord {
    pub fn new(room_id: impl Into<RoomId>, capacity: Capacity, floor_no: FloorNo) -> Self {
        Self {
            room_id: room_id.into(),
            capacity,
            floor_no,
            near_washroom: false,
        }
    }

    pub fn near_washroom(mut self, near_washroom: bool) -> Self {
        self.near_washroom = near_washroom;
        self
    }
}

impl fmt::Display for ClassroomRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (floor {}, {} seats)",
            self.room_id, self.floor_no, self.capacity
        )
    }
}

/// An unvalidated classroom as submitted by a client.
///
/// Every field is optional here so that a missing field is reported as a
/// validation error instead of a body rejection. `capacity` and `floorNo`
/// stay raw JSON because clients send them as numbers or numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClassroom {
    pub room_id: Option<String>,
    #[serde(default)]
    pub capacity: Option<Value>,
    #[serde(default)]
    pub floor_no: Option<Value>,
    pub near_washroom: Option<bool>,
}

/// Reads a whole number sent either as a JSON integer or as a string holding
/// one. `Ok(None)` means the value is absent or `null`.
pub fn whole_number(value: Option<&Value>) -> Result<Option<i64>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| format!("{n} is not a whole number")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("{s:?} is not a whole number")),
        Some(other) => Err(format!("{other} is not a whole number")),
    }
}

/// Body of an allocation request.
///
/// `totalStudents` is kept as a raw JSON value: clients send it either as a
/// number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    #[serde(default)]
    pub total_students: Option<Value>,
}

impl AllocationRequest {
    /// Parses the requested student count.
    ///
    /// Only shape is checked here; positivity is the allocator's job.
    pub fn requested_count(&self) -> Result<i64, AllocationError> {
        whole_number(self.total_students.as_ref())
            .map_err(AllocationError::InvalidRequest)?
            .ok_or_else(|| AllocationError::InvalidRequest("totalStudents is missing".to_string()))
    }
}

/// The outcome of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// Rooms in the order they were selected.
    pub allocated_rooms: Vec<ClassroomRecord>,
    pub students_allocated: u64,
    /// Sum of the capacities of `allocated_rooms`; may exceed the request.
    pub seats_allocated: u64,
    pub rooms_used: usize,
    pub total_available_capacity: u64,
}

impl AllocationResult {
    /// Seats in the selected rooms left empty by the over-covering last room.
    pub fn spare_seats(&self) -> u64 {
        self.seats_allocated - self.students_allocated
    }
}
