use thiserror::Error;

/// Hard failures of an extraction call.
///
/// Missing or malformed tier data is never an error: empty `number` lists are
/// a normal result when the page layout drifts.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no source URL supplied")]
    MissingSourceUrl,

    #[error("no page text: both primary text and secondary markup are empty")]
    NoSource,

    #[error("block pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid engine configuration: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
