use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("buffer capacity must be at least one sample")]
    InvalidCapacity,
    #[error("sample rate must be finite and non-negative, got {0}")]
    InvalidSampleRate(f64),
    #[error("refresh interval must be greater than zero")]
    InvalidRefreshInterval,
    #[error("failed to parse scope config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} thread panicked")]
    WorkerPanicked(&'static str),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ScopeError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ScopeError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for ScopeError {
    fn from(value: image::ImageError) -> Self {
        ScopeError::Plot(value.to_string())
    }
}
