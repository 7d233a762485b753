//! Employee and department endpoints.
//!
//! # Endpoints
//!
//! - `GET /employees` - List employees
//! - `POST /employees` - Create an employee
//! - `PUT /employees/:id` - Overwrite an employee's name and position
//! - `DELETE /employees/:id` - Delete an employee (cascades for managers)
//! - `GET /employees/:id/subordinates` - Members of department `id`
//! - `GET /employees/:id/department` - Members of department `id`
//! - `GET /departments` - List departments
//! - `GET /departments/:id/employees` - Staff of the department managed by employee `id`

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use staffgraph_core::{Department, Employee, EmployeeInput, EmployeeSummary, NodeId};
use staffgraph_graph::StaffStore;

use crate::error::ApiError;

/// State shared by all handlers: the injected store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StaffStore>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn success() -> Json<Self> {
        Json(Self {
            status: "success".to_string(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeesResponse<T> {
    pub employees: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DepartmentResponse {
    pub department: Vec<EmployeeSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DepartmentsResponse {
    pub departments: Vec<Department>,
}

/// Build the application router over the given store.
pub fn router(store: Arc<dyn StaffStore>) -> Router {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", put(update_employee).delete(delete_employee))
        .route("/employees/:id/subordinates", get(subordinates))
        .route("/employees/:id/department", get(employee_department))
        .route("/departments", get(list_departments))
        .route("/departments/:id/employees", get(department_employees))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

fn parse_id(raw: &str) -> Result<NodeId, ApiError> {
    Ok(raw.parse::<NodeId>()?)
}

async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<EmployeesResponse<Employee>>, ApiError> {
    let employees = state.store.list_employees().await?;
    Ok(Json(EmployeesResponse { employees }))
}

async fn create_employee(
    State(state): State<AppState>,
    body: Result<Json<EmployeeInput>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(input) = body?;
    state.store.create_employee(&input).await?;
    Ok(StatusResponse::success())
}

async fn update_employee(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<EmployeeInput>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    let Json(input) = body?;
    state.store.update_employee(id, &input).await?;
    Ok(StatusResponse::success())
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    state.store.delete_employee(id).await?;
    Ok(StatusResponse::success())
}

async fn subordinates(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<EmployeesResponse<EmployeeSummary>>, ApiError> {
    let employees = state.store.department_members(parse_id(&raw_id)?).await?;
    Ok(Json(EmployeesResponse { employees }))
}

async fn employee_department(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let department = state.store.department_members(parse_id(&raw_id)?).await?;
    Ok(Json(DepartmentResponse { department }))
}

async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<DepartmentsResponse>, ApiError> {
    let departments = state.store.list_departments().await?;
    Ok(Json(DepartmentsResponse { departments }))
}

/// `id` is the department manager's employee id.
async fn department_employees(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<EmployeesResponse<EmployeeSummary>>, ApiError> {
    let employees = state
        .store
        .department_employees_by_manager(parse_id(&raw_id)?)
        .await?;
    Ok(Json(EmployeesResponse { employees }))
}
