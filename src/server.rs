use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::allocator;
use crate::config::Config;
use crate::data::{AllocationRequest, ClassroomRecord, NewClassroom};
use crate::error::{AllocationError, InventoryError};
use crate::inventory::ClassroomStore;

type ApiError = (StatusCode, Json<ErrorBody>);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_capacity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<u64>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            total_capacity: None,
            required: None,
        }
    }
}

impl From<InventoryError> for ErrorBody {
    fn from(err: InventoryError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<AllocationError> for ErrorBody {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::InvalidRequest(_) => Self::new("Please provide valid totalStudents"),
            AllocationError::InsufficientCapacity {
                requested,
                total_available_capacity,
            } => Self {
                total_capacity: Some(total_available_capacity),
                required: Some(requested),
                ..Self::new("Not enough seats available")
            },
        }
    }
}

fn bad_request(body: impl Into<ErrorBody>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(body.into()))
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AddedBody {
    pub success: bool,
    pub message: &'static str,
    pub classroom: ClassroomRecord,
}

#[derive(Debug, Serialize)]
pub struct ListBody {
    pub success: bool,
    pub data: Vec<ClassroomRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityBody {
    pub success: bool,
    pub total_capacity: u64,
    pub rooms: usize,
    /// Rounded to the nearest seat; `null` for an empty inventory.
    pub average_capacity: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBody {
    pub success: bool,
    pub allocated_classrooms: Vec<ClassroomRecord>,
    pub total_students_allocated: u64,
    pub seats_allocated: u64,
    pub rooms_used: usize,
    pub total_capacity: u64,
    pub message: String,
}

async fn status_handler() -> Json<StatusBody> {
    Json(StatusBody {
        message: "Exam Seat Planner API is running",
    })
}

async fn add_classroom_handler(
    State(store): State<ClassroomStore>,
    payload: Result<Json<NewClassroom>, JsonRejection>,
) -> Result<(StatusCode, Json<AddedBody>), ApiError> {
    let Json(new_room) = payload.map_err(|rejection| {
        warn!("Rejected classroom body: {rejection}");
        bad_request(ErrorBody::new(rejection.body_text()))
    })?;
    let classroom = store.add(new_room).map_err(bad_request)?;
    Ok((
        StatusCode::CREATED,
        Json(AddedBody {
            success: true,
            message: "Classroom added successfully",
            classroom,
        }),
    ))
}

async fn list_classrooms_handler(State(store): State<ClassroomStore>) -> Json<ListBody> {
    Json(ListBody {
        success: true,
        data: store.list(),
    })
}

async fn capacity_handler(State(store): State<ClassroomStore>) -> Json<CapacityBody> {
    let rooms = store.snapshot();
    let total_capacity = allocator::total_capacity(&rooms);
    let count = rooms.len() as u64;
    Json(CapacityBody {
        success: true,
        total_capacity,
        rooms: rooms.len(),
        average_capacity: (count > 0).then(|| (2 * total_capacity + count) / (2 * count)),
    })
}

async fn allocate_handler(
    State(store): State<ClassroomStore>,
    payload: Result<Json<AllocationRequest>, JsonRejection>,
) -> Result<Json<AllocationBody>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected allocation body: {rejection}");
        bad_request(AllocationError::InvalidRequest(rejection.body_text()))
    })?;
    let requested = request.requested_count().map_err(|e| {
        warn!("Rejected allocation request: {e}");
        bad_request(e)
    })?;

    let inventory = store.snapshot();
    let result = allocator::allocate(&inventory, requested).map_err(|e| {
        warn!("Allocation for {requested} students failed: {e}");
        bad_request(e)
    })?;

    info!(
        "Allocated {} room(s) for {} students ({} spare seats)",
        result.rooms_used,
        result.students_allocated,
        result.spare_seats()
    );

    Ok(Json(AllocationBody {
        success: true,
        message: format!(
            "Allocated {} classroom(s) for {} students",
            result.rooms_used, result.students_allocated
        ),
        total_students_allocated: result.students_allocated,
        seats_allocated: result.seats_allocated,
        rooms_used: result.rooms_used,
        total_capacity: result.total_available_capacity,
        allocated_classrooms: result.allocated_rooms,
    }))
}

/// Builds the API router over the given inventory.
pub fn build_router(store: ClassroomStore) -> Router {
    Router::new()
        .route("/", get(status_handler))
        .route(
            "/api/classrooms",
            get(list_classrooms_handler).post(add_classroom_handler),
        )
        .route("/api/classrooms/capacity", get(capacity_handler))
        .route("/api/classrooms/allocate", post(allocate_handler))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

pub async fn run_server(config: &Config, store: ClassroomStore) -> anyhow::Result<()> {
    let app = build_router(store);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    info!("Server running at http://{}", listener.local_addr()?);
    for (method, path) in [
        ("GET ", "/"),
        ("POST", "/api/classrooms"),
        ("GET ", "/api/classrooms"),
        ("GET ", "/api/classrooms/capacity"),
        ("POST", "/api/classrooms/allocate"),
    ] {
        info!("  {method} {path}");
    }

    axum::serve(listener, app).await?;
    Ok(())
}
