use crate::{
    auth::session::Session,
    error::AppError,
    navigation::{NavigationError, Navigator, View},
};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ViewEntry {
    #[schema(example = "manage_staff")]
    pub view: View,
    #[schema(example = "Manage Staff")]
    pub title: String,
    /// Target of "back"
    #[schema(example = "admin_home")]
    pub parent: Option<View>,
}

impl From<View> for ViewEntry {
    fn from(view: View) -> Self {
        ViewEntry {
            view,
            title: view.title().to_string(),
            parent: view.parent(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Menu {
    pub landing: ViewEntry,
    pub views: Vec<ViewEntry>,
}

impl From<NavigationError> for AppError {
    fn from(err: NavigationError) -> Self {
        AppError::Forbidden(err.to_string())
    }
}

/// Views available to the signed-in role, starting from its landing view
#[utoipa::path(
    get,
    path = "/api/navigation",
    responses((status = 200, body = Menu)),
    tag = "Navigation",
    security(("bearer_auth" = []))
)]
pub async fn menu(session: Session) -> HttpResponse {
    let role = session.role;
    let mut navigator = Navigator::new();
    let landing = navigator.sign_in(session);

    HttpResponse::Ok().json(Menu {
        landing: landing.into(),
        views: View::visible_views(Some(role))
            .into_iter()
            .map(ViewEntry::from)
            .collect(),
    })
}

/// Resolve one view for the signed-in role
#[utoipa::path(
    get,
    path = "/api/navigation/{view}",
    params(("view" = String, Path, description = "View name, e.g. manage_bookings")),
    responses(
        (status = 200, body = ViewEntry),
        (status = 403, description = "View belongs to another role"),
        (status = 404, description = "No such view")
    ),
    tag = "Navigation",
    security(("bearer_auth" = []))
)]
pub async fn open_view(
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view: View = path
        .parse()
        .map_err(|_| AppError::NotFound(format!("Unknown view: {}", path.as_str())))?;

    let mut navigator = Navigator::new();
    navigator.sign_in(session);
    let opened = navigator.open(view)?;

    Ok(HttpResponse::Ok().json(ViewEntry::from(opened)))
}
