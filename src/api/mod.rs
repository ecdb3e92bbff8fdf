pub mod event_handler;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;
pub mod slash_handler;

pub use handler::{AppState, router};
