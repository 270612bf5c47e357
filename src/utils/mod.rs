pub mod search;
pub mod username_cache;
pub mod username_filter;
pub mod validation;
