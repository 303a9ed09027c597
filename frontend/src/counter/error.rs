use thiserror::Error;

/// Reasons a counter is skipped. None of them is fatal to the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    #[error("counter has no target value")]
    MissingTarget,
    #[error("counter target {raw:?} is not a non-negative integer")]
    UnparsableTarget { raw: String },
    #[error("element has no renderable geometry")]
    DetachedElement,
}
