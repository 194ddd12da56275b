//! Error types for parsing stylesheets and resolving directives.
//!
//! Every failure is fatal to the `parse` call that raised it. Errors that can
//! be tied to a place in the source carry a 1-based [`Position`].

use std::fmt;

use thiserror::Error;

/// A 1-based line/column location in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors raised while turning source text into a [`Tree`](crate::Tree).
///
/// # Examples
///
/// ```rust
/// use jes::{parse, ParseError, Position};
///
/// let err = parse("h1 }").unwrap_err();
/// assert_eq!(err, ParseError::UnmatchedClosingBrace(Position::new(1, 4)));
/// assert_eq!(err.to_string(), "unmatched closing brace @ line 1, column 4");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `{` with no selector text in front of it.
    #[error("unexpected opening brace @ {0}")]
    UnexpectedOpeningBrace(Position),

    /// A `}` with no open block to close.
    #[error("unmatched closing brace @ {0}")]
    UnmatchedClosingBrace(Position),

    /// A `key = value` assignment outside of any block.
    #[error("property declaration outside block @ {0}")]
    PropertyDeclarationOutsideBlock(Position),

    /// A `= value` assignment with nothing in front of the `=`.
    #[error("missing property name @ {0}")]
    EmptyPropertyName(Position),

    /// A comma that does not belong to a selector list or a value.
    #[error("unexpected comma outside selector @ {0}")]
    UnexpectedCommaOutsideBlock(Position),

    /// A selector list with an empty entry, e.g. `h1, {`.
    #[error("empty selector in selector list @ {0}")]
    EmptySelector(Position),

    /// A property value that was not terminated by a line break.
    #[error("missing line break after property value @ {0}")]
    MissingLineBreakAfterPropertyValue(Position),

    /// The input ended while at least one block was still open.
    #[error("unexpected end of string (missing closing brace)")]
    UnexpectedEndOfString,

    /// A `@device` or `@print` block opened inside another one.
    #[error("nested device range block @ {0}")]
    NestedDeviceRange(Position),

    /// A `@device`, `@theme` or `@print` block sharing its selector list.
    #[error("scope directive `{directive}` must be the only selector @ {position}")]
    MultipleSelectorsForScopeBlock {
        directive: &'static str,
        position: Position,
    },

    /// A directive whose arguments could not be resolved.
    #[error("{source} @ {position}")]
    Directive {
        #[source]
        source: DirectiveError,
        position: Position,
    },
}

impl ParseError {
    /// Source position of the error, if it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::UnexpectedOpeningBrace(p)
            | Self::UnmatchedClosingBrace(p)
            | Self::PropertyDeclarationOutsideBlock(p)
            | Self::EmptyPropertyName(p)
            | Self::UnexpectedCommaOutsideBlock(p)
            | Self::EmptySelector(p)
            | Self::MissingLineBreakAfterPropertyValue(p)
            | Self::NestedDeviceRange(p) => Some(*p),
            Self::MultipleSelectorsForScopeBlock { position, .. }
            | Self::Directive { position, .. } => Some(*position),
            Self::UnexpectedEndOfString => None,
        }
    }
}

/// Errors raised by the directive resolvers.
///
/// Resolvers only see the directive text, so these carry no position; the
/// parser attaches one through [`ParseError::Directive`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    /// A device name that is not in the device range table.
    #[error("unknown device \"{0}\"")]
    UnknownDevice(String),

    /// A `@device` argument that is neither `NAME only` nor a `FROM..TO` range.
    #[error("invalid device range \"{0}\"")]
    InvalidDeviceRange(String),

    /// A `@when` condition outside the supported vocabulary.
    #[error("unknown condition \"{0}\"")]
    UnknownCondition(String),

    /// A `@with` relation other than child, sibling, adjacent or descendant.
    #[error("unknown relation \"{0}\"")]
    UnknownRelation(String),

    /// A `@position` argument that is not a signed integer.
    #[error("invalid position \"{0}\"")]
    InvalidPosition(String),

    /// A directive argument that does not fit the directive's grammar.
    #[error("malformed `{directive}` argument \"{argument}\"")]
    Malformed {
        directive: &'static str,
        argument: String,
    },

    /// A directive that requires an argument was given none.
    #[error("`{0}` requires an argument")]
    MissingArgument(&'static str),

    /// A directive that takes no argument was given one.
    #[error("`{0}` takes no argument, found \"{1}\"")]
    UnexpectedArgument(&'static str, String),
}
