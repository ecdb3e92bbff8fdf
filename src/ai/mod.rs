//! All AI/LLM functionality

pub mod client;

pub use client::{LlmClient, estimate_tokens};
