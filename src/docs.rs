use crate::api::booking::{BookingListResponse, BookingPayload};
use crate::api::navigation::{Menu, ViewEntry};
use crate::api::program::{ProgramListResponse, ProgramPayload};
use crate::api::staff::{RoleSalary, StaffListResponse, StaffPayload};
use crate::auth::handlers::LoginResponse;
use crate::auth::session::Session;
use crate::model::booking::{Booking, BookingDetails, MembershipType};
use crate::model::program::{Program, ProgramDetails};
use crate::model::role::Role;
use crate::model::staff::{Gender, Staff, StaffDetails, StaffRole};
use crate::models::{LoginReqDto, RegisterReq};
use crate::navigation::View;
use crate::pricing::Quote;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FitLife Gym API",
        version = "1.0.0",
        description = r#"
## FitLife Gym Management

Back end for the FitLife front desk and member portal.

### Features
- **Staff** (admin): add, edit, remove and search staff; salaries default by role
- **Programs**: admins maintain the catalogue, members browse and search it
- **Bookings** (members): book programs with tiered per-session pricing and `B001` style codes
- **Navigation**: the menu of views each role may open

### Security
Everything outside `/auth` needs a **JWT Bearer** access token from `/auth/login`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,

        crate::api::navigation::menu,
        crate::api::navigation::open_view,

        crate::api::staff::create_staff,
        crate::api::staff::list_staff,
        crate::api::staff::get_staff,
        crate::api::staff::update_staff,
        crate::api::staff::delete_staff,
        crate::api::staff::list_trainers,
        crate::api::staff::list_roles,

        crate::api::program::create_program,
        crate::api::program::list_programs,
        crate::api::program::get_program,
        crate::api::program::update_program,
        crate::api::program::delete_program,

        crate::api::booking::create_booking,
        crate::api::booking::list_bookings,
        crate::api::booking::get_booking,
        crate::api::booking::update_booking,
        crate::api::booking::delete_booking,
        crate::api::booking::quote,
        crate::api::booking::preview_next_code
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            LoginResponse,
            Session,
            Role,
            View,
            ViewEntry,
            Menu,
            Staff,
            StaffDetails,
            StaffRole,
            Gender,
            StaffPayload,
            StaffListResponse,
            RoleSalary,
            Program,
            ProgramDetails,
            ProgramPayload,
            ProgramListResponse,
            Booking,
            BookingDetails,
            MembershipType,
            BookingPayload,
            BookingListResponse,
            Quote
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, sign-in and token rotation"),
        (name = "Navigation", description = "Views per role"),
        (name = "Staff", description = "Staff management APIs"),
        (name = "Program", description = "Program catalogue APIs"),
        (name = "Booking", description = "Booking and pricing APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
