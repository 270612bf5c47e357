use crate::{
    auth::session::Session,
    booking_code::{BookingCode, next_code},
    error::AppError,
    model::booking::{Booking, BookingDetails, MembershipType},
    pricing::{self, Quote},
    repository::{BookingRepository, ProgramRepository},
    utils::validation::{self, MAX_NAME_LEN},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct BookingPayload {
    /// Explicit code for a new booking. Left out, the store allocates one.
    /// Ignored on update.
    #[schema(example = "B007")]
    pub booking_code: Option<String>,
    #[schema(example = "Sahan Silva")]
    pub full_name: String,
    #[schema(example = "0761234567")]
    pub contact: String,
    #[schema(example = "Monthly")]
    pub membership_type: Option<String>,
    /// Name of an existing program
    #[schema(example = "HIIT Blast")]
    pub program: Option<String>,
    #[schema(example = "2026-01-05", format = "date")]
    pub start_date: Option<String>,
    #[schema(example = 12)]
    pub sessions: Option<i64>,
}

impl BookingPayload {
    /// Field checks that need no lookups. The cost is always derived from
    /// the session count.
    pub fn validate(&self) -> Result<BookingDetails, AppError> {
        let full_name =
            validation::required_text(&self.full_name, "Full name is required.", MAX_NAME_LEN)?;
        let contact = validation::contact(&self.contact, "Contact must be 10 digits.")?;
        let membership_type: MembershipType =
            validation::choice(self.membership_type.as_deref(), "Select membership type.")?;
        let program = validation::required_text(
            self.program.as_deref().unwrap_or_default(),
            "Select program.",
            MAX_NAME_LEN,
        )?;
        let start_date = parse_start_date(self.start_date.as_deref())?;
        let quote = self
            .sessions
            .ok_or(pricing::InvalidSessions)
            .and_then(pricing::quote)
            .map_err(|_| AppError::validation("Sessions must be a positive whole number."))?;

        Ok(BookingDetails {
            full_name,
            contact,
            membership_type,
            program,
            start_date,
            sessions: quote.sessions,
            total_cost: quote.total_cost,
        })
    }

    fn requested_code(&self) -> Result<Option<BookingCode>, AppError> {
        match self.booking_code.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(code) => code
                .parse()
                .map(Some)
                .map_err(|_| AppError::validation("Booking code must look like B001.")),
        }
    }
}

fn parse_start_date(value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::validation("Start date must be a date like 2026-01-31.")),
    }
}

fn parse_code(raw: &str) -> Result<BookingCode, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Booking not found".to_string()))
}

async fn ensure_program_exists(
    programs: &dyn ProgramRepository,
    name: &str,
) -> Result<(), AppError> {
    if programs.exists_by_name(name).await? {
        Ok(())
    } else {
        Err(AppError::validation("Program not found"))
    }
}

#[derive(Serialize, ToSchema)]
pub struct BookingListResponse {
    pub data: Vec<Booking>,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuoteQuery {
    /// Raw text of the sessions field
    pub sessions: Option<String>,
}

/// Create a booking
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = BookingPayload,
    responses(
        (status = 201, description = "Booking created", body = Object, example = json!({
            "message": "Booking created: B004",
            "booking_code": "B004",
            "total_cost": 9600
        })),
        (status = 400, description = "Invalid field or unknown program"),
        (status = 409, description = "Booking code already in use")
    ),
    tag = "Booking",
    security(("bearer_auth" = []))
)]
pub async fn create_booking(
    _session: Session,
    bookings: web::Data<dyn BookingRepository>,
    programs: web::Data<dyn ProgramRepository>,
    payload: web::Json<BookingPayload>,
) -> Result<HttpResponse, AppError> {
    let details = payload.validate()?;
    let requested = payload.requested_code()?;
    ensure_program_exists(programs.get_ref(), &details.program).await?;

    let code = bookings.create(requested, &details).await?;
    info!(booking_code = %code, sessions = details.sessions, "Booking created");

    Ok(HttpResponse::Created().json(json!({
        "message": format!("Booking created: {code}"),
        "booking_code": code,
        "total_cost": details.total_cost
    })))
}

#[utoipa::path(
    get,
    path = "/api/bookings",
    responses((status = 200, description = "All bookings, oldest first", body = BookingListResponse)),
    tag = "Booking",
    security(("bearer_auth" = []))
)]
pub async fn list_bookings(
    _session: Session,
    bookings: web::Data<dyn BookingRepository>,
) -> Result<HttpResponse, AppError> {
    let data = bookings.list().await?;
    Ok(HttpResponse::Ok().json(BookingListResponse {
        total: data.len(),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/bookings/{code}",
    params(("code" = String, Path, description = "Booking code, e.g. B004")),
    responses(
        (status = 200, body = Booking),
        (status = 404, description = "Booking not found")
    ),
    tag = "Booking",
    security(("bearer_auth" = []))
)]
pub async fn get_booking(
    _session: Session,
    bookings: web::Data<dyn BookingRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = parse_code(&path)?;
    let booking = bookings
        .get(code)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    Ok(HttpResponse::Ok().json(booking))
}

#[utoipa::path(
    put,
    path = "/api/bookings/{code}",
    params(("code" = String, Path, description = "Booking code, e.g. B004")),
    request_body = BookingPayload,
    responses(
        (status = 200, description = "Updated", body = Object, example = json!({
            "message": "Booking updated successfully.",
            "total_cost": 9600
        })),
        (status = 400, description = "Invalid field or unknown program"),
        (status = 404, description = "Booking not found")
    ),
    tag = "Booking",
    security(("bearer_auth" = []))
)]
pub async fn update_booking(
    _session: Session,
    bookings: web::Data<dyn BookingRepository>,
    programs: web::Data<dyn ProgramRepository>,
    path: web::Path<String>,
    payload: web::Json<BookingPayload>,
) -> Result<HttpResponse, AppError> {
    let code = parse_code(&path)?;
    let details = payload.validate()?;
    ensure_program_exists(programs.get_ref(), &details.program).await?;

    bookings.update(code, &details).await?;
    info!(booking_code = %code, "Booking updated");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Booking updated successfully.",
        "total_cost": details.total_cost
    })))
}

#[utoipa::path(
    delete,
    path = "/api/bookings/{code}",
    params(("code" = String, Path, description = "Booking code, e.g. B004")),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({
            "message": "Booking deleted successfully."
        })),
        (status = 404, description = "Booking not found")
    ),
    tag = "Booking",
    security(("bearer_auth" = []))
)]
pub async fn delete_booking(
    _session: Session,
    bookings: web::Data<dyn BookingRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = parse_code(&path)?;
    bookings.delete(code).await?;
    info!(booking_code = %code, "Booking deleted");

    Ok(HttpResponse::Ok().json(json!({ "message": "Booking deleted successfully." })))
}

/// Price a session count as typed into the form
#[utoipa::path(
    get,
    path = "/api/bookings/quote",
    params(QuoteQuery),
    responses(
        (status = 200, body = Quote),
        (status = 400, description = "Not a positive whole number", body = Object, example = json!({
            "error": "Invalid"
        }))
    ),
    tag = "Booking",
    security(("bearer_auth" = []))
)]
pub async fn quote(_session: Session, query: web::Query<QuoteQuery>) -> Result<HttpResponse, AppError> {
    let quote = pricing::quote_input(query.sessions.as_deref().unwrap_or_default())
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(HttpResponse::Ok().json(quote))
}

/// Code the next allocated booking would get
#[utoipa::path(
    get,
    path = "/api/bookings/next-code",
    responses(
        (status = 200, body = Object, example = json!({ "booking_code": "B005" }))
    ),
    tag = "Booking",
    security(("bearer_auth" = []))
)]
pub async fn preview_next_code(
    _session: Session,
    bookings: web::Data<dyn BookingRepository>,
) -> Result<HttpResponse, AppError> {
    let highest = bookings
        .max_id()
        .await?
        .and_then(BookingCode::from_id)
        .map(|code| code.to_string());

    if highest.is_none() {
        debug!("No bookings yet, previewing the first code");
    }

    Ok(HttpResponse::Ok().json(json!({
        "booking_code": next_code(highest.as_deref())
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{program::ProgramDetails, role::Role},
        repository::Repositories,
        test_support::{bearer, delete, get, post, put, test_app},
    };
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    fn booking() -> Value {
        json!({
            "full_name": "Sahan Silva",
            "contact": "0761234567",
            "membership_type": "Monthly",
            "program": "HIIT Blast",
            "start_date": "2026-01-05",
            "sessions": 12
        })
    }

    async fn seed_program(repos: &Repositories) {
        repos
            .programs
            .create(&ProgramDetails {
                name: "HIIT Blast".into(),
                cost_per_session: 1500,
                description: "Intervals".into(),
                trainer: "Nimal Perera".into(),
            })
            .await
            .unwrap();
    }

    fn check(body: Value) -> Result<BookingDetails, String> {
        serde_json::from_value::<BookingPayload>(body)
            .unwrap()
            .validate()
            .map_err(|e| e.to_string())
    }

    #[::core::prelude::v1::test]
    fn cost_is_derived_from_sessions() {
        let details = check(booking()).unwrap();
        assert_eq!(details.sessions, 12);
        assert_eq!(details.total_cost, 9_600);
        assert_eq!(details.start_date, NaiveDate::from_ymd_opt(2026, 1, 5));

        let mut body = booking();
        body["start_date"] = json!("");
        body["sessions"] = json!(51);
        let details = check(body).unwrap();
        assert_eq!(details.start_date, None);
        assert_eq!(details.total_cost, 25_500);
    }

    #[::core::prelude::v1::test]
    fn validation_messages() {
        let mut body = booking();
        body["full_name"] = json!("");
        assert_eq!(check(body).unwrap_err(), "Full name is required.");

        let mut body = booking();
        body["contact"] = json!("076-123456");
        assert_eq!(check(body).unwrap_err(), "Contact must be 10 digits.");

        let mut body = booking();
        body["membership_type"] = json!(null);
        assert_eq!(check(body).unwrap_err(), "Select membership type.");

        let mut body = booking();
        body["program"] = json!("");
        assert_eq!(check(body).unwrap_err(), "Select program.");

        let mut body = booking();
        body["sessions"] = json!(0);
        assert!(check(body).is_err());
    }

    #[actix_web::test]
    async fn member_books_a_program() {
        let repos = Repositories::in_memory();
        seed_program(&repos).await;
        let app = test_app!(repos);
        let auth = bearer(Role::Member);

        let req = get("/api/bookings/next-code")
            .insert_header(auth.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["booking_code"], "B001");

        let req = post("/api/bookings")
            .insert_header(auth.clone())
            .set_json(booking())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Booking created: B001");
        assert_eq!(body["total_cost"], 9_600);

        let req = get("/api/bookings/next-code")
            .insert_header(auth.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["booking_code"], "B002");

        let mut changed = booking();
        changed["sessions"] = json!(5);
        let req = put("/api/bookings/B001")
            .insert_header(auth.clone())
            .set_json(changed)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_cost"], 5_000);

        let req = get("/api/bookings/B001")
            .insert_header(auth.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["booking_code"], "B001");
        assert_eq!(body["sessions"], 5);

        let req = delete("/api/bookings/B001")
            .insert_header(auth.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = get("/api/bookings/B001")
            .insert_header(auth)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unknown_program_and_taken_code_are_rejected() {
        let repos = Repositories::in_memory();
        seed_program(&repos).await;
        let app = test_app!(repos);
        let auth = bearer(Role::Member);

        let mut body = booking();
        body["program"] = json!("Zumba");
        let req = post("/api/bookings")
            .insert_header(auth.clone())
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Program not found");

        let mut body = booking();
        body["booking_code"] = json!("B007");
        let req = post("/api/bookings")
            .insert_header(auth.clone())
            .set_json(body.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = post("/api/bookings")
            .insert_header(auth.clone())
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // allocation continues after the explicit code
        let req = post("/api/bookings")
            .insert_header(auth)
            .set_json(booking())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["booking_code"], "B008");
    }

    #[actix_web::test]
    async fn malformed_fields_get_a_json_error() {
        let repos = Repositories::in_memory();
        seed_program(&repos).await;
        let app = test_app!(repos);
        let auth = bearer(Role::Member);

        for sessions in [json!("abc"), json!(1.5)] {
            let mut body = booking();
            body["sessions"] = sessions.clone();
            let req = post("/api/bookings")
                .insert_header(auth.clone())
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{sessions}");
            let body: Value = test::read_body_json(resp).await;
            let message = body["error"].as_str().unwrap();
            assert!(message.starts_with("Invalid request body"), "{message}");
        }

        let req = get("/api/bookings").insert_header(auth).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 0);
    }

    #[actix_web::test]
    async fn quote_answers_invalid_for_bad_input() {
        let repos = Repositories::in_memory();
        let app = test_app!(repos);
        let auth = bearer(Role::Member);

        let req = get("/api/bookings/quote?sessions=31")
            .insert_header(auth.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["rate"], 600);
        assert_eq!(body["total_cost"], 18_600);

        for raw in ["abc", "0", "-3", ""] {
            let req = get(&format!("/api/bookings/quote?sessions={raw}"))
                .insert_header(auth.clone())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{raw}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Invalid");
        }
    }
}
