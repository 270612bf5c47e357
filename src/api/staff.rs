use crate::{
    api::SearchQuery,
    auth::session::Session,
    error::AppError,
    model::staff::{Gender, Staff, StaffDetails, StaffRole},
    repository::StaffRepository,
    utils::validation::{self, MAX_NAME_LEN},
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::IntoEnumIterator;
use tracing::{debug, info};
use utoipa::ToSchema;

const DUPLICATE_STAFF: &str = "A staff member with this email or contact number already exists.";

/// Staff form as submitted. Choices arrive as text and are checked here so
/// the caller gets the form message instead of a deserialization error.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct StaffPayload {
    #[schema(example = "Nimal Perera")]
    pub name: String,
    #[schema(example = "Male")]
    pub gender: Option<String>,
    #[schema(example = "Trainer")]
    pub role: Option<String>,
    #[schema(example = "0771234567")]
    pub contact: String,
    #[schema(example = "nimal@fitlife.lk", format = "email")]
    pub email: String,
    /// Omitted means the role's default salary.
    #[schema(example = 70000)]
    pub salary: Option<i64>,
}

impl StaffPayload {
    /// Checks fields in form order and reports the first failure.
    pub fn validate(&self) -> Result<StaffDetails, AppError> {
        let name = validation::required_text(&self.name, "Name cannot be empty.", MAX_NAME_LEN)?;
        let gender: Gender = validation::choice(self.gender.as_deref(), "Please select a gender.")?;
        let role: StaffRole = validation::choice(self.role.as_deref(), "Please select a role.")?;
        let contact = validation::contact(
            &self.contact,
            "Enter a valid 10-digit contact number (e.g., 0771234567).",
        )?;
        let email = validation::email(&self.email)?;
        let salary = match self.salary {
            Some(salary) => validation::non_negative(salary, "Salary must be a number.")?,
            None => role.default_salary(),
        };

        Ok(StaffDetails {
            name,
            gender,
            role,
            contact,
            email,
            salary,
        })
    }
}

#[derive(Serialize, ToSchema)]
pub struct StaffListResponse {
    pub data: Vec<Staff>,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Serialize, ToSchema)]
pub struct RoleSalary {
    #[schema(example = "Trainer")]
    pub role: StaffRole,
    #[schema(example = 70000)]
    pub default_salary: u32,
}

/// Add a staff member
#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = StaffPayload,
    responses(
        (status = 201, description = "Staff member created", body = Object, example = json!({
            "message": "Staff added successfully!",
            "id": 1
        })),
        (status = 400, description = "Invalid field"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Email or contact number already in use")
    ),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
pub async fn create_staff(
    session: Session,
    repo: web::Data<dyn StaffRepository>,
    payload: web::Json<StaffPayload>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let details = payload.validate()?;

    if repo.find_conflict(&details.email, &details.contact, None).await? {
        return Err(AppError::Conflict(DUPLICATE_STAFF.to_string()));
    }

    let id = repo.create(&details).await?;
    info!(staff_id = id, role = %details.role, "Staff member added");

    Ok(HttpResponse::Created().json(json!({
        "message": "Staff added successfully!",
        "id": id
    })))
}

/// List or search staff
#[utoipa::path(
    get,
    path = "/api/staff",
    params(SearchQuery),
    responses(
        (status = 200, description = "Staff matching the keyword, or everyone", body = StaffListResponse),
        (status = 403, description = "Admin only")
    ),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
pub async fn list_staff(
    session: Session,
    repo: web::Data<dyn StaffRepository>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;

    let data = match query.keyword() {
        Some(keyword) => {
            debug!(keyword, "Searching staff");
            repo.search(keyword).await?
        }
        None => repo.list().await?,
    };

    Ok(HttpResponse::Ok().json(StaffListResponse {
        total: data.len(),
        data,
    }))
}

/// Get a staff member
#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    params(("id" = u64, Path, description = "Staff ID")),
    responses(
        (status = 200, body = Staff),
        (status = 404, description = "Staff not found")
    ),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
pub async fn get_staff(
    session: Session,
    repo: web::Data<dyn StaffRepository>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;

    let staff = repo
        .get(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Staff not found".to_string()))?;

    Ok(HttpResponse::Ok().json(staff))
}

/// Replace a staff member's details
#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    params(("id" = u64, Path, description = "Staff ID")),
    request_body = StaffPayload,
    responses(
        (status = 200, description = "Updated", body = Object, example = json!({
            "message": "Staff updated successfully!"
        })),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Staff not found"),
        (status = 409, description = "Email or contact number already in use")
    ),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
pub async fn update_staff(
    session: Session,
    repo: web::Data<dyn StaffRepository>,
    path: web::Path<u64>,
    payload: web::Json<StaffPayload>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let id = path.into_inner();
    let details = payload.validate()?;

    if repo
        .find_conflict(&details.email, &details.contact, Some(id))
        .await?
    {
        return Err(AppError::Conflict(DUPLICATE_STAFF.to_string()));
    }

    repo.update(id, &details).await?;
    info!(staff_id = id, "Staff member updated");

    Ok(HttpResponse::Ok().json(json!({ "message": "Staff updated successfully!" })))
}

/// Remove a staff member
#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    params(("id" = u64, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({
            "message": "Staff record deleted successfully!"
        })),
        (status = 404, description = "Staff not found")
    ),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
pub async fn delete_staff(
    session: Session,
    repo: web::Data<dyn StaffRepository>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let id = path.into_inner();

    repo.delete(id).await?;
    info!(staff_id = id, "Staff member deleted");

    Ok(HttpResponse::Ok().json(json!({ "message": "Staff record deleted successfully!" })))
}

/// Names of staff with the Trainer role, for the program form
#[utoipa::path(
    get,
    path = "/api/staff/trainers",
    responses(
        (status = 200, body = Object, example = json!({ "data": ["Nimal Perera"] }))
    ),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
pub async fn list_trainers(
    session: Session,
    repo: web::Data<dyn StaffRepository>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let names = repo.trainer_names().await?;
    Ok(HttpResponse::Ok().json(json!({ "data": names })))
}

/// Default salary for each role, used to pre-fill the staff form
#[utoipa::path(
    get,
    path = "/api/staff/roles",
    responses((status = 200, body = Vec<RoleSalary>)),
    tag = "Staff",
    security(("bearer_auth" = []))
)]
pub async fn list_roles(session: Session) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let roles: Vec<RoleSalary> = StaffRole::iter()
        .map(|role| RoleSalary {
            role,
            default_salary: role.default_salary(),
        })
        .collect();
    Ok(HttpResponse::Ok().json(roles))
}
