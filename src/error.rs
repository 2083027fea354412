use thiserror::Error;

pub type HistogramResult<T> = Result<T, HistogramError>;

#[derive(Debug, Error)]
pub enum HistogramError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("handle index {index} out of range for {handle_count} handles")]
    HandleOutOfRange { index: usize, handle_count: usize },

    #[error("handle edit input rejected: {0}")]
    PromptValue(String),
}
