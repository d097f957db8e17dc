//! Errors surfaced by the backend API boundary

use thiserror::Error;

/// Fallback message shown when a rename fails without a usable message
pub const RENAME_FAILED_MESSAGE: &str = "Failed to rename project";

/// Errors returned by backend collaborators
///
/// `Display` yields the human-readable message that ends up in a toast, so
/// variants carry owned strings rather than the transport's error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body, or a generic one
        message: String,
    },
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),
    /// The response body could not be decoded
    #[error("Unexpected response from server: {0}")]
    Decode(String),
    /// The update call succeeded but returned no project
    #[error("Failed to update project")]
    EmptyResult,
    /// A rename was requested without a project identifier
    #[error("Cannot rename: Project ID is missing")]
    MissingProjectId,
}

impl ApiError {
    /// Message to show the user, falling back to `fallback` when empty
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}
