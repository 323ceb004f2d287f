pub mod api;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod supplier;
pub mod table;
pub mod views;
