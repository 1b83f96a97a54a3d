//! Fatal error conditions per [§ 7 Error handling design](https://www.w3.org/TR/css-syntax-3/).
//!
//! Everything else the tokenizer and parser encounter is recoverable: the
//! offending construct is dropped and a message is pushed onto a
//! stylesheet's `parsing_errors`. Only the two conditions below abort the
//! operation that triggered them.

use thiserror::Error;

/// Fatal conditions that abort the operation that triggered them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CssError {
    /// An escape sequence was found inside an unquoted `url(...)` token.
    ///
    /// Escaping inside unquoted URLs is not yet supported; the upstream
    /// implementation this crate is descended from marks this a hard stop
    /// rather than a silently-dropped construct.
    #[error("escape sequences inside unquoted url() tokens are not supported")]
    UnsupportedUrlEscape,

    /// Source position was requested while a sub-stream override was active.
    ///
    /// Sub-streams (used for declaration-list and keyframes parsing) replace
    /// the parser's token source with an in-memory slice that has no
    /// meaningful position in the original source text.
    #[error("source position is unavailable while a sub-stream is active")]
    PositionUnavailable,
}

/// Convenience alias for fallible operations that can only fail with
/// [`CssError`].
pub type CssResult<T> = Result<T, CssError>;
