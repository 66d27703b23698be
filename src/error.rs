use thiserror::Error;

/// Everything a page controller can be handed back from the service layer.
///
/// Auth cases get their own variants so the controllers can word the
/// user-facing message per case; everything network/permission shaped is
/// collapsed into [`AppError::Service`].
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already in use")]
    EmailTaken,

    #[error("Recent sign-in required")]
    RequiresRecentLogin,

    #[error("Required fields missing")]
    MissingFields,

    #[error("No project at index {0}")]
    ProjectOutOfRange(usize),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Service error: {0}")]
    Service(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Service(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Service(err.to_string())
    }
}
