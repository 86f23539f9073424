//! Error types for path and transform parsing

use thiserror::Error;

/// Result type alias for pathkit-svg operations
pub type SvgResult<T> = Result<T, SvgError>;

/// Errors that can occur while interpreting SVG attributes or walking a tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvgError {
    /// The lexer hit a character it does not recognize.
    #[error("Lex error at offset {offset}: unrecognized character {found:?}")]
    Lex { offset: usize, found: String },

    /// A numeric literal could not be converted.
    #[error("Invalid number {text:?}: {reason}")]
    Number { text: String, reason: String },

    /// Wrong token kind, wrong operand count, or a missing delimiter.
    #[error("Grammar error: {0}")]
    Grammar(String),

    /// Path command letter outside `M m L l H h V v C c Z z`.
    #[error("Unsupported path command: {0:?}")]
    UnsupportedCommand(String),

    /// Transform function other than `matrix` or `translate`.
    #[error("Unsupported transform function: {0:?}")]
    UnsupportedTransform(String),

    /// An attribute value could not be used.
    #[error("Invalid attribute {name}: {reason}")]
    InvalidAttribute { name: String, reason: String },

    /// Failure inside one path, after `operands` numbers were consumed.
    #[error("Error in path {id:?} after {operands} operands: {source}")]
    Path {
        id: String,
        operands: usize,
        #[source]
        source: Box<SvgError>,
    },

    /// Failure in the `ordinal`-th child (1-based) of a group or document.
    #[error("Error when parsing element nr. {ordinal}: {source}")]
    Element {
        ordinal: usize,
        #[source]
        source: Box<SvgError>,
    },

    /// The render was cancelled.
    #[error("Operation cancelled")]
    Cancelled,
}

impl SvgError {
    /// Create a grammar error
    pub fn grammar(msg: impl Into<String>) -> Self {
        Self::Grammar(msg.into())
    }

    /// Create an invalid attribute error
    pub fn invalid_attribute(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Wrap in the child ordinal of the producer that surfaced it.
    pub fn in_element(self, ordinal: usize) -> Self {
        Self::Element {
            ordinal,
            source: Box::new(self),
        }
    }

    /// The innermost error, with path and element annotations stripped.
    pub fn root_cause(&self) -> &SvgError {
        match self {
            SvgError::Path { source, .. } | SvgError::Element { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    /// Element ordinals from the outermost group down to the failing leaf.
    pub fn ordinals(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut current = self;
        loop {
            match current {
                SvgError::Element { ordinal, source } => {
                    out.push(*ordinal);
                    current = source;
                }
                SvgError::Path { source, .. } => current = source,
                _ => return out,
            }
        }
    }

    /// Get the error category of the root cause for log fields.
    pub fn category(&self) -> &'static str {
        match self.root_cause() {
            SvgError::Lex { .. } => "lex",
            SvgError::Number { .. } => "number",
            SvgError::Grammar(_)
            | SvgError::UnsupportedCommand(_)
            | SvgError::UnsupportedTransform(_) => "grammar",
            SvgError::InvalidAttribute { .. } => "attribute",
            SvgError::Cancelled => "cancelled",
            SvgError::Path { .. } | SvgError::Element { .. } => "internal",
        }
    }
}
