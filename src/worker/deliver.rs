use tracing::{error, warn};

use crate::core::capabilities::{TextGenerator, UserDirectory};
use crate::prompt::{GENERATION_FALLBACK, PLACEHOLDER_NAME};

/// Looks up a display name, substituting [`PLACEHOLDER_NAME`] on failure.
pub async fn resolve_name(users: &dyn UserDirectory, user_id: &str) -> String {
    match users.display_name(user_id).await {
        Ok(name) => name,
        Err(e) => {
            warn!("Failed to resolve name for user {}: {}", user_id, e);
            PLACEHOLDER_NAME.to_string()
        }
    }
}

/// Generates a reply, returning [`GENERATION_FALLBACK`] when generation
/// fails or produces only whitespace.
pub async fn generate_or_fallback(
    generator: &dyn TextGenerator,
    prompt: &str,
    speaker: &str,
) -> String {
    match generator.generate(prompt, speaker).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Text generation returned an empty reply");
            GENERATION_FALLBACK.to_string()
        }
        Err(e) => {
            error!("Text generation failed: {}", e);
            GENERATION_FALLBACK.to_string()
        }
    }
}
