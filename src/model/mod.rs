pub mod account;
pub mod booking;
pub mod program;
pub mod role;
pub mod staff;
