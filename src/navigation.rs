//! Screen graph of the client application.
//!
//! Every screen is a [`View`] with a fixed parent, so "back" is a property of
//! the graph instead of a reference handed to a screen after it loads. The
//! [`Navigator`] owns the stack of open views together with the signed-in
//! [`Session`]; signing out clears both.

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::{auth::session::Session, model::role::Role};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum View {
    Login,
    Register,
    AdminHome,
    ManageStaff,
    ManagePrograms,
    MemberHome,
    ManageBookings,
    ViewPrograms,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Register => "Register",
            View::AdminHome => "Admin Dashboard",
            View::ManageStaff => "Manage Staff",
            View::ManagePrograms => "Manage Programs",
            View::MemberHome => "Member Dashboard",
            View::ManageBookings => "Manage Bookings",
            View::ViewPrograms => "View Programs",
        }
    }

    /// Where "back" leads. Root views have none.
    pub fn parent(self) -> Option<View> {
        match self {
            View::Login | View::AdminHome | View::MemberHome => None,
            View::Register => Some(View::Login),
            View::ManageStaff | View::ManagePrograms => Some(View::AdminHome),
            View::ManageBookings | View::ViewPrograms => Some(View::MemberHome),
        }
    }

    /// `None` marks the signed-out views.
    pub fn required_role(self) -> Option<Role> {
        match self {
            View::Login | View::Register => None,
            View::AdminHome | View::ManageStaff | View::ManagePrograms => Some(Role::Admin),
            View::MemberHome | View::ManageBookings | View::ViewPrograms => Some(Role::Member),
        }
    }

    pub fn landing_for(role: Role) -> View {
        match role {
            Role::Admin => View::AdminHome,
            Role::Member => View::MemberHome,
        }
    }

    /// Whether someone signed in as `role` (or nobody, for `None`) may open this view.
    pub fn visible_to(self, role: Option<Role>) -> bool {
        self.required_role() == role
    }

    pub fn visible_views(role: Option<Role>) -> Vec<View> {
        View::iter().filter(|v| v.visible_to(role)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("{0} is not available to the current user")]
    Forbidden(View),
}

/// Client-side screen stack. A client keeps one `Navigator` across screens
/// and drives `back`, `home` and `sign_out` itself; the HTTP handlers build a
/// throwaway one per request only to resolve the landing view and to check
/// whether a view may be opened.
#[derive(Debug)]
pub struct Navigator {
    session: Option<Session>,
    stack: Vec<View>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            session: None,
            stack: vec![View::Login],
        }
    }

    pub fn current(&self) -> View {
        self.stack.last().copied().unwrap_or(View::Login)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.role)
    }

    fn root(&self) -> View {
        self.role().map(View::landing_for).unwrap_or(View::Login)
    }

    /// Starts a session and shows its landing view.
    pub fn sign_in(&mut self, session: Session) -> View {
        let landing = View::landing_for(session.role);
        self.session = Some(session);
        self.stack = vec![landing];
        landing
    }

    /// Ends the session and returns to the login view.
    pub fn sign_out(&mut self) -> Option<Session> {
        self.stack = vec![View::Login];
        self.session.take()
    }

    /// Opens `view` on top of the stack. The current view stays intact when
    /// the view is not visible to the signed-in role.
    pub fn open(&mut self, view: View) -> Result<View, NavigationError> {
        if !view.visible_to(self.role()) {
            return Err(NavigationError::Forbidden(view));
        }
        if view == self.root() {
            return Ok(self.home());
        }
        // keep the stack a path from the root, so back always means parent
        while self.stack.len() > 1 && Some(self.current()) != view.parent() {
            self.stack.pop();
        }
        self.stack.push(view);
        Ok(view)
    }

    /// Goes to the parent view, never past the landing view.
    pub fn back(&mut self) -> View {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self.current()
    }

    pub fn home(&mut self) -> View {
        self.stack.truncate(1);
        self.current()
    }
}
