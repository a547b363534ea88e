use std::fmt;

use shared::api::Status;

/// Errors returned by the apiserver collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Request never got a response (connection, timeout)
    Transport(String),
    /// Non-success response, with the `Status` body when the server sent one
    Http { code: u16, status: Option<Status> },
    /// Response body did not match the expected shape
    Decode(String),
    /// Request URL could not be built from the given names
    InvalidPath(String),
}

impl ApiError {
    /// Human readable details for inline alerts.
    ///
    /// Prefers the server supplied message, then the status code.
    pub fn details(&self) -> String {
        match self {
            ApiError::Http { code, status } => status
                .as_ref()
                .and_then(|s| s.message.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("Status: {}", code)),
            ApiError::Transport(msg) | ApiError::Decode(msg) | ApiError::InvalidPath(msg) => {
                msg.clone()
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ApiError::Http { code, .. } => write!(f, "HTTP error ({}): {}", code, self.details()),
            ApiError::Decode(msg) => write!(f, "Decode error: {}", msg),
            ApiError::InvalidPath(msg) => write!(f, "Invalid request path: {}", msg),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Errors of the autoscaler form, one variant per step that can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    /// Route is missing the kind or the name
    MissingParameter,
    /// Routed kind cannot be autoscaled
    UnsupportedKind(String),
    /// Routed project or name is not a valid object name
    InvalidName(String),
    /// Project could not be resolved
    Project(String, ApiError),
    /// Caller lacks the verb on autoscalers in the project
    Forbidden { verb: String, project: String },
    /// Target resource could not be loaded
    Load(ApiError),
    /// Create or update was rejected
    Save(ApiError),
    /// Form values do not describe a valid autoscaler
    Invalid(String),
    /// Save requested before the form finished loading
    NotReady,
    /// The form was torn down while a request was pending
    Cancelled,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingParameter => write!(f, "Kind or name parameter missing."),
            FormError::UnsupportedKind(kind) => {
                write!(f, "Autoscaling not supported for kind {}.", kind)
            }
            FormError::InvalidName(name) => write!(f, "Invalid name \"{}\".", name),
            FormError::Project(project, err) => {
                write!(f, "Could not load project {}: {}", project, err)
            }
            FormError::Forbidden { verb, project } => write!(
                f,
                "You do not have authority to {} horizontal pod autoscalers in project {}.",
                verb, project
            ),
            FormError::Load(err) => write!(f, "Load error: {}", err),
            FormError::Save(err) => write!(f, "Save error: {}", err),
            FormError::Invalid(msg) => write!(f, "Invalid form: {}", msg),
            FormError::NotReady => write!(f, "The form has not finished loading."),
            FormError::Cancelled => write!(f, "The form was closed."),
        }
    }
}
