//! Reply pipelines run after the inbound webhook has been acknowledged.

pub mod command;
pub mod deliver;
pub mod respond;

pub use command::{CommandOutcome, respond_to_command, spawn_command_reply};
pub use respond::{EventOutcome, respond_to_event, spawn_event_reply};
