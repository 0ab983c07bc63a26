use silence_platform::{PlatformError, PlatformServicesError};
use silence_rendering::RenderError;
use thiserror::Error;

/// Host application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Platform service error: {0}")]
    Services(#[from] PlatformServicesError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Initialization failed: {0}")]
    Init(String),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_collaborator_errors() {
        let err: AppError = PlatformError::NoCaptureDevice.into();
        assert_eq!(
            err.to_string(),
            "Platform error: no capture device available"
        );

        let err: AppError = PlatformServicesError::Tray("Shell_NotifyIconW".into()).into();
        assert_eq!(
            err.to_string(),
            "Platform service error: tray error: Shell_NotifyIconW"
        );
    }
}
