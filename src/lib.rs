//! Exam seat planning: picks the classrooms that seat a given number of
//! students, lowest floor and largest room first.

pub mod allocator;
pub mod config;
pub mod data;
pub mod error;
pub mod inventory;
pub mod server;

pub use allocator::allocate;
pub use data::{AllocationRequest, AllocationResult, ClassroomRecord, NewClassroom};
pub use error::{AllocationError, InventoryError};
pub use inventory::ClassroomStore;
