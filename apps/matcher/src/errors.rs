use serde_json::Value;
use thiserror::Error;

/// Pre-flight failure: the active mode is missing required input.
/// The `Display` text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Please choose both resume and job images.")]
    MissingImagePair,

    #[error("Add at least one resume text.")]
    MissingResumeTexts,

    #[error("Pick at least one resume image and one job image.")]
    MissingMultiImages,
}

/// Failure of a single call to the matching backend.
/// `Display` yields the message surfaced in the `Failed` state.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Invalid image '{0}'")]
    InvalidImage(String),
}

/// Why a submit did not enter `Submitting`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("A match request is already in progress")]
    Busy,

    #[error("{0}")]
    Invalid(#[from] ValidationFailure),
}

/// Local input loading errors raised by the console before anything reaches the session.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{0}' is not an image")]
    NotAnImage(String),

    #[error("No resume image at index {0}")]
    NoSuchImage(usize),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Picks the user-facing message for a non-2xx backend response.
///
/// A string `detail` wins; any other non-null `detail` is rendered as compact JSON;
/// otherwise a generic status line is used.
pub fn backend_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Null) | Some(Value::String(_)) | None => {
            format!("Request failed with status code {status}")
        }
        Some(other) => other.to_string(),
    }
}
