//! # jes-css
//!
//! The stylesheet pipeline around the [`jes`] compiler:
//!
//! ```text
//! source ─ interpolate ─ pre-filters ─ parse ─ render ─ post-filters ─ CSS
//! ```
//!
//! [`Preprocessor`] holds everything a compilation can be configured with:
//! the `$variable` values, whether an undefined `$NAME` is an error, and the
//! filters that run before parsing and after rendering.
//!
//! ```rust
//! use jes_css::Preprocessor;
//!
//! let css = Preprocessor::new()
//!     .variable("accent", "tomato")
//!     .post_filter(|css, _tree| format!("{css}\n"))
//!     .compile("a {\n  color = $accent\n}")
//!     .unwrap();
//!
//! assert_eq!(css, "a{color:tomato}\n");
//! ```

pub mod error;
pub mod interpolate;
mod log_init;

use std::fmt;
use std::path::Path;

pub use error::{JesError, Result};
pub use interpolate::{Variables, interpolate, interpolate_strict};
pub use jes::{
    Block, BlockKind, DirectiveError, ParseError, Position, Property, Tree, parse, render,
};
pub use log_init::init_logger;

// Re-export the log crate so callers can set levels without a direct dependency.
pub use log;

/// A text filter that runs on the interpolated source before parsing.
pub type PreFilter = Box<dyn Fn(&str, &Variables) -> String + Send + Sync>;

/// A text filter that runs on the rendered CSS, with the parsed tree at hand.
pub type PostFilter = Box<dyn Fn(&str, &Tree) -> String + Send + Sync>;

/// A configured compilation pipeline.
///
/// Filters run in the order they were added. Each one receives the output of
/// the previous one.
#[derive(Default)]
pub struct Preprocessor {
    variables: Variables,
    /// Reject `$NAME` references with no value instead of keeping them.
    strict_variables: bool,
    pre_filters: Vec<PreFilter>,
    post_filters: Vec<PostFilter>,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a `$name` variable.
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.define(name, value);
        self
    }

    /// Defines several variables at once.
    pub fn variables<I, K, V>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.variables.extend(variables);
        self
    }

    /// Makes an undefined `$NAME` fail the compilation with
    /// [`JesError::UnknownVariable`]. By default it is left in the source.
    pub fn strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    pub fn pre_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, &Variables) -> String + Send + Sync + 'static,
    {
        self.pre_filters.push(Box::new(filter));
        self
    }

    pub fn post_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, &Tree) -> String + Send + Sync + 'static,
    {
        self.post_filters.push(Box::new(filter));
        self
    }

    /// Compiles stylesheet source into CSS.
    pub fn compile(&self, source: &str) -> Result<String> {
        let mut text = if self.strict_variables {
            interpolate_strict(source, &self.variables)?
        } else {
            interpolate(source, &self.variables)
        };
        for filter in &self.pre_filters {
            text = filter(&text, &self.variables);
        }

        let tree = parse(&text)?;
        log::debug!("parsed {} top-level blocks", tree.len());

        let mut css = render(&tree);
        for filter in &self.post_filters {
            css = filter(&css, &tree);
        }

        log::debug!("compiled {} bytes of CSS", css.len());
        Ok(css)
    }

    /// Reads a stylesheet from disk and compiles it.
    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        log::debug!("compiling {}", path.display());
        let source = std::fs::read_to_string(path)?;
        self.compile(&source)
    }
}

impl fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessor")
            .field("variables", &self.variables)
            .field("strict_variables", &self.strict_variables)
            .field("pre_filters", &self.pre_filters.len())
            .field("post_filters", &self.post_filters.len())
            .finish()
    }
}

/// Compiles `source` with no variables and no filters.
pub fn compile(source: &str) -> Result<String> {
    Preprocessor::new().compile(source)
}
