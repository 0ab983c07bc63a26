use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid badge size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error("svg parse failed: {0}")]
    Svg(#[from] usvg::Error),
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;
