use thiserror::Error;

/// Failures surfaced by [`crate::Mind`] operations
#[derive(Debug, Error)]
pub enum MindError {
    /// A display label did not match any pane created so far
    #[error("no such display: {0}")]
    UnresolvedDisplay(String),

    /// The splitter could not carry out a request
    #[error("splitter failed: {0}")]
    Splitter(#[source] anyhow::Error),

    /// The thinker rejected the finished layout
    #[error("thinker failed: {0}")]
    Thinker(#[source] anyhow::Error),

    /// The layout was already handed to the thinker
    #[error("layout has already been built")]
    AlreadyBuilt,
}

pub type MindResult<T> = Result<T, MindError>;
