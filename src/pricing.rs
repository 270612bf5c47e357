use serde::Serialize;
use utoipa::ToSchema;

/// Rate brackets as `(max sessions inclusive, rate per session)`.
/// Anything above the last bracket is charged `OPEN_RATE`.
pub const RATE_BRACKETS: [(u32, u32); 3] = [(10, 1000), (30, 800), (50, 600)];
pub const OPEN_RATE: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Quote {
    #[schema(example = 12)]
    pub sessions: u32,
    #[schema(example = 800)]
    pub rate: u32,
    #[schema(example = 9600)]
    pub total_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid")]
pub struct InvalidSessions;

pub fn rate_for(sessions: u32) -> u32 {
    RATE_BRACKETS
        .iter()
        .find(|(max, _)| sessions <= *max)
        .map(|(_, rate)| *rate)
        .unwrap_or(OPEN_RATE)
}

/// Prices a session count. Zero is rejected rather than priced.
pub fn quote(sessions: i64) -> Result<Quote, InvalidSessions> {
    if sessions <= 0 {
        return Err(InvalidSessions);
    }
    let sessions = u32::try_from(sessions).map_err(|_| InvalidSessions)?;
    let rate = rate_for(sessions);
    let total_cost = sessions.checked_mul(rate).ok_or(InvalidSessions)?;

    Ok(Quote {
        sessions,
        rate,
        total_cost,
    })
}

/// Prices raw form input, e.g. the text of a "sessions" field.
pub fn quote_input(input: &str) -> Result<Quote, InvalidSessions> {
    let sessions = input.trim().parse::<i64>().map_err(|_| InvalidSessions)?;
    quote(sessions)
}
