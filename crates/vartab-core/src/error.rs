use thiserror::Error;

#[derive(Debug, Error)]
pub enum VartabError {
    #[error("input has no header line")]
    EmptyInput,

    #[error("unknown ACMG criterion: {0}")]
    UnknownCriterion(String),

    #[error("evidence score {0} is outside 0..=5")]
    InvalidScore(u8),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
