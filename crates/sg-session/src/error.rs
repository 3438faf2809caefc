use sg_edit::ClipboardError;
use sg_ir::PatternError;

/// Errors surfaced by an [`EditSession`](crate::EditSession).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("clipboard: {0}")]
    Clipboard(#[from] ClipboardError),
    /// The command needs an active pattern and there is none
    #[error("no pattern is open")]
    NoPattern,
    #[error("pattern {0:?} already exists")]
    DuplicatePattern(String),
    #[error("no pattern named {0:?}")]
    UnknownPattern(String),
}
