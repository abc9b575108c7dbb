pub mod analytics;
pub mod jwt;
