pub mod capabilities;
pub mod config;
pub mod dispatch;
pub mod models;
