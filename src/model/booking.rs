use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::booking_code::BookingCode;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter, ToSchema,
)]
pub enum MembershipType {
    Monthly,
    Quarterly,
    Annual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "booking_code": "B007",
        "full_name": "Sahan Silva",
        "contact": "0761234567",
        "membership_type": "Monthly",
        "program": "HIIT Blast",
        "start_date": "2026-01-05",
        "sessions": 12,
        "total_cost": 9600
    })
)]
pub struct Booking {
    #[schema(value_type = String, example = "B007")]
    pub booking_code: BookingCode,
    #[serde(flatten)]
    pub details: BookingDetails,
}

/// Booking fields a member fills in, plus the derived cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookingDetails {
    pub full_name: String,
    pub contact: String,
    pub membership_type: MembershipType,
    /// Program name, checked against the program table on submit.
    pub program: String,
    #[schema(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    pub sessions: u32,
    pub total_cost: u32,
}
