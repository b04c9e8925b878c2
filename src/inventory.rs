//! In-memory classroom inventory.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info, warn};
use serde_json::Value;

use crate::allocator;
use crate::data::{self, Capacity, ClassroomRecord, FloorNo, NewClassroom, RoomId};
use crate::error::InventoryError;

/// Shared handle to the classroom inventory, keyed by normalized room id.
#[derive(Debug, Clone, Default)]
pub struct ClassroomStore {
    rooms: Arc<RwLock<BTreeMap<RoomId, ClassroomRecord>>>,
}

impl ClassroomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates, normalizes and stores a classroom.
    pub fn add(&self, new_room: NewClassroom) -> Result<ClassroomRecord, InventoryError> {
        let record = validate(new_room)?;

        let mut rooms = self.write();
        if rooms.contains_key(&record.room_id) {
            warn!("Rejected duplicate room {}", record.room_id);
            return Err(InventoryError::DuplicateRoom(record.room_id));
        }
        rooms.insert(record.room_id.clone(), record.clone());
        info!("Added classroom {record}; inventory now holds {} rooms", rooms.len());

        Ok(record)
    }

    /// Every room, lowest floor first, then by room id.
    pub fn list(&self) -> Vec<ClassroomRecord> {
        let mut rooms = self.snapshot();
        rooms.sort_by(|a, b| {
            a.floor_no
                .cmp(&b.floor_no)
                .then_with(|| a.room_id.cmp(&b.room_id))
        });
        rooms
    }

    /// Point-in-time copy of the inventory. Rooms added afterwards are not
    /// part of it.
    pub fn snapshot(&self) -> Vec<ClassroomRecord> {
        let rooms: Vec<_> = self.read().values().cloned().collect();
        debug!("Took inventory snapshot of {} rooms", rooms.len());
        rooms
    }

    pub fn total_capacity(&self) -> u64 {
        allocator::total_capacity(&self.snapshot())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // The map is never left half-updated, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<RoomId, ClassroomRecord>> {
        self.rooms.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<RoomId, ClassroomRecord>> {
        self.rooms.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate(new_room: NewClassroom) -> Result<ClassroomRecord, InventoryError> {
    let NewClassroom {
        room_id,
        capacity,
        floor_no,
        near_washroom,
    } = new_room;

    let room_id = room_id
        .map(|id| id.trim().to_uppercase())
        .filter(|id| !id.is_empty());
    let capacity = number_field(capacity.as_ref(), "Capacity")?;
    let floor_no = number_field(floor_no.as_ref(), "Floor number")?;
    let (Some(room_id), Some(capacity), Some(floor_no)) = (room_id, capacity, floor_no) else {
        return Err(InventoryError::Validation(
            "Missing required fields: roomId, capacity, floorNo".to_string(),
        ));
    };

    let capacity: Capacity = at_least_one(capacity, "Capacity")?;
    let floor_no: FloorNo = at_least_one(floor_no, "Floor number")?;

    Ok(ClassroomRecord {
        room_id,
        capacity,
        floor_no,
        near_washroom: near_washroom.unwrap_or(false),
    })
}

fn number_field(value: Option<&Value>, field: &str) -> Result<Option<i64>, InventoryError> {
    data::whole_number(value)
        .map_err(|reason| InventoryError::Validation(format!("{field} is invalid: {reason}")))
}

fn at_least_one(value: i64, field: &str) -> Result<u32, InventoryError> {
    if value < 1 {
        return Err(InventoryError::Validation(format!(
            "{field} must be at least 1"
        )));
    }
    u32::try_from(value)
        .map_err(|_| InventoryError::Validation(format!("{field} is too large: {value}")))
}
