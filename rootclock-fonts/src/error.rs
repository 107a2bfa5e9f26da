//! Typed error types for rootclock-fonts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    /// The font specification string could not be parsed.
    #[error("cannot parse font name to pattern: '{0}'")]
    InvalidPattern(String),

    /// No installed face satisfies the pattern.
    #[error("cannot load font from name: '{0}'")]
    NotFound(String),

    /// The face data was found but could not be parsed.
    #[error("font data for '{0}' is not a usable TrueType/OpenType face")]
    InvalidData(String),

    /// None of the names in a fallback list could be loaded.
    #[error("no font in the list could be loaded: {0:?}")]
    EmptyChain(Vec<String>),
}
