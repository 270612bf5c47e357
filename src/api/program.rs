use crate::{
    api::SearchQuery,
    auth::session::Session,
    error::AppError,
    model::program::{Program, ProgramDetails},
    repository::ProgramRepository,
    utils::validation::{self, MAX_DESCRIPTION_LEN, MAX_NAME_LEN},
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ProgramPayload {
    #[schema(example = "HIIT Blast")]
    pub name: String,
    #[schema(example = 1500)]
    pub cost_per_session: Option<i64>,
    #[schema(example = "High intensity interval training")]
    pub description: String,
    /// Name of a staff member with the Trainer role
    #[schema(example = "Nimal Perera")]
    pub trainer: Option<String>,
}

impl ProgramPayload {
    pub fn validate(&self) -> Result<ProgramDetails, AppError> {
        let name =
            validation::required_text(&self.name, "Program name is required.", MAX_NAME_LEN)?;
        let cost_per_session =
            validation::positive(self.cost_per_session, "Cost must be a valid number.")?;
        let description = validation::required_text(
            &self.description,
            "Description cannot be empty.",
            MAX_DESCRIPTION_LEN,
        )?;
        let trainer = validation::required_text(
            self.trainer.as_deref().unwrap_or_default(),
            "Please select a trainer.",
            MAX_NAME_LEN,
        )?;

        Ok(ProgramDetails {
            name,
            cost_per_session,
            description,
            trainer,
        })
    }
}

#[derive(Serialize, ToSchema)]
pub struct ProgramListResponse {
    pub data: Vec<Program>,
    #[schema(example = 1)]
    pub total: usize,
}

/// Create a program
#[utoipa::path(
    post,
    path = "/api/programs",
    request_body = ProgramPayload,
    responses(
        (status = 201, description = "Program created", body = Object, example = json!({
            "message": "Program added successfully!",
            "id": 1
        })),
        (status = 400, description = "Invalid field"),
        (status = 403, description = "Admin only")
    ),
    tag = "Program",
    security(("bearer_auth" = []))
)]
pub async fn create_program(
    session: Session,
    repo: web::Data<dyn ProgramRepository>,
    payload: web::Json<ProgramPayload>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let details = payload.validate()?;

    let id = repo.create(&details).await?;
    info!(program_id = id, name = %details.name, "Program added");

    Ok(HttpResponse::Created().json(json!({
        "message": "Program added successfully!",
        "id": id
    })))
}

/// List or search programs
#[utoipa::path(
    get,
    path = "/api/programs",
    params(SearchQuery),
    responses(
        (status = 200, description = "Programs matching name, description or trainer", body = ProgramListResponse)
    ),
    tag = "Program",
    security(("bearer_auth" = []))
)]
pub async fn list_programs(
    _session: Session,
    repo: web::Data<dyn ProgramRepository>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let data = match query.keyword() {
        Some(keyword) => {
            debug!(keyword, "Searching programs");
            repo.search(keyword).await?
        }
        None => repo.list().await?,
    };

    Ok(HttpResponse::Ok().json(ProgramListResponse {
        total: data.len(),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/programs/{id}",
    params(("id" = u64, Path, description = "Program ID")),
    responses(
        (status = 200, body = Program),
        (status = 404, description = "Program not found")
    ),
    tag = "Program",
    security(("bearer_auth" = []))
)]
pub async fn get_program(
    _session: Session,
    repo: web::Data<dyn ProgramRepository>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let program = repo
        .get(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Program not found".to_string()))?;

    Ok(HttpResponse::Ok().json(program))
}

#[utoipa::path(
    put,
    path = "/api/programs/{id}",
    params(("id" = u64, Path, description = "Program ID")),
    request_body = ProgramPayload,
    responses(
        (status = 200, description = "Updated", body = Object, example = json!({
            "message": "Program updated successfully!"
        })),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Program not found")
    ),
    tag = "Program",
    security(("bearer_auth" = []))
)]
pub async fn update_program(
    session: Session,
    repo: web::Data<dyn ProgramRepository>,
    path: web::Path<u64>,
    payload: web::Json<ProgramPayload>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let id = path.into_inner();
    let details = payload.validate()?;

    repo.update(id, &details).await?;
    info!(program_id = id, "Program updated");

    Ok(HttpResponse::Ok().json(json!({ "message": "Program updated successfully!" })))
}

#[utoipa::path(
    delete,
    path = "/api/programs/{id}",
    params(("id" = u64, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({
            "message": "Program deleted successfully!"
        })),
        (status = 404, description = "Program not found")
    ),
    tag = "Program",
    security(("bearer_auth" = []))
)]
pub async fn delete_program(
    session: Session,
    repo: web::Data<dyn ProgramRepository>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let id = path.into_inner();

    repo.delete(id).await?;
    info!(program_id = id, "Program deleted");

    Ok(HttpResponse::Ok().json(json!({ "message": "Program deleted successfully!" })))
}
