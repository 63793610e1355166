use thiserror::Error;

/// Local pre-flight rejection of analysis input. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("text is empty")]
    Empty,
    #[error("text contains only whitespace")]
    WhitespaceOnly,
    #[error("text is too short ({len} characters, minimum {min})")]
    TooShort { len: usize, min: usize },
    #[error("text is too long ({len} characters, maximum {max})")]
    TooLong { len: usize, max: usize },
}

/// Failure of a remote analysis or status call.
///
/// Every variant leaves the caller's buffer and store untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The request could not be sent or did not complete in time.
    #[error("network error: {0}")]
    Network(String),
    /// The service answered with a non-2xx status or an unreadable body.
    #[error("analysis service error ({status}): {message}")]
    Service { status: u16, message: String },
}

impl ClientError {
    /// The message shown to the user in the status bar.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(e) => e.to_string(),
            ClientError::Network(_) => {
                "Could not reach the analysis service. Check your connection and try again."
                    .to_owned()
            }
            ClientError::Service { message, .. } => message.clone(),
        }
    }
}

/// Failure of an edit-flow operation on a single suggestion.
///
/// Returned only when nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    #[error("suggestion {id} no longer exists")]
    NotFound { id: String },
    #[error("suggestion {id} must keep at least one candidate")]
    EmptyCandidates { id: String },
    #[error("suggestion {id} has no candidate #{index} (it has {len})")]
    CandidateOutOfRange { id: String, index: usize, len: usize },
    /// A candidate text or rationale was patched to blank.
    #[error("suggestion {id} cannot have a blank {field}")]
    BlankText { id: String, field: &'static str },
}
