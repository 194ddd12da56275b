//! `$variable` substitution.
//!
//! Runs on the raw source before anything else, so a variable can stand in
//! for any text: a value, part of a selector, even a directive argument.
//!
//! ```text
//! $brand = #0b5fff          (supplied by the caller)
//!
//! a {                       a {
//!     color = $brand   =>       color = #0b5fff
//! }                         }
//! ```

use std::collections::HashMap;

use crate::error::{JesError, Result};

/// Caller-supplied variable values, looked up by name without the `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    variables: HashMap<String, String>,
}

impl Variables {
    /// Creates an empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a variable, replacing any previous value.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Looks up a variable's value.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Variables
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Self::new();
        variables.extend(iter);
        variables
    }
}

impl<K, V> Extend<(K, V)> for Variables
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.define(name, value);
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Replaces every `$NAME` in `source` that has a value.
///
/// Names are the longest run of ASCII letters, digits, `-` and `_` after the
/// `$`. A `$NAME` with no value, and a `$` that does not start a name, are
/// kept as is.
///
/// # Examples
///
/// ```rust
/// use jes_css::{Variables, interpolate};
///
/// let variables: Variables = [("gap", "8px")].into_iter().collect();
/// assert_eq!(interpolate("margin = $gap", &variables), "margin = 8px");
/// assert_eq!(interpolate("content = \"$5\"", &variables), "content = \"$5\"");
/// ```
pub fn interpolate(source: &str, variables: &Variables) -> String {
    substitute(source, variables).0
}

/// Like [`interpolate`], but a `$NAME` with no value is an error.
///
/// ```rust
/// use jes_css::{JesError, Variables, interpolate_strict};
///
/// let variables: Variables = [("gap", "8px")].into_iter().collect();
/// let err = interpolate_strict("margin = $size", &variables).unwrap_err();
/// assert!(matches!(err, JesError::UnknownVariable(name) if name == "size"));
/// ```
pub fn interpolate_strict(source: &str, variables: &Variables) -> Result<String> {
    match substitute(source, variables) {
        (_, Some(unknown)) => Err(JesError::UnknownVariable(unknown)),
        (output, None) => Ok(output),
    }
}

/// Returns the substituted text and the first name that had no value.
fn substitute(source: &str, variables: &Variables) -> (String, Option<String>) {
    let mut output = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut substituted = 0usize;
    let mut unknown = None;

    while let Some(c) = chars.next() {
        output.push(c);
        if c != '$' {
            continue;
        }

        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if !is_name_char(next) {
                break;
            }
            name.push(next);
            chars.next();
        }

        let value = match name.as_str() {
            "" => None,
            name => variables.resolve(name),
        };
        match value {
            Some(value) => {
                output.pop();
                output.push_str(value);
                substituted += 1;
            }
            None => {
                if !name.is_empty() && unknown.is_none() {
                    unknown = Some(name.clone());
                }
                output.push_str(&name);
            }
        }
    }

    log::debug!("interpolated {substituted} variable references");
    (output, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs.iter().copied().collect()
    }

    #[test]
    fn replaces_every_occurrence() {
        let variables = vars(&[("c", "red")]);
        assert_eq!(
            interpolate("a = $c\nb = $c", &variables),
            "a = red\nb = red"
        );
    }

    #[test]
    fn names_are_greedy() {
        let variables = vars(&[("gap", "1px"), ("gap-lg", "2px")]);
        assert_eq!(
            interpolate("$gap $gap-lg", &variables),
            "1px 2px"
        );
    }

    #[test]
    fn name_ends_at_other_characters() {
        let variables = vars(&[("w", "10")]);
        assert_eq!(interpolate("calc($w*2)", &variables), "calc(10*2)");
    }

    #[test]
    fn lone_dollar_is_literal() {
        assert_eq!(
            interpolate("content = \"$ 5\"\n$", &Variables::new()),
            "content = \"$ 5\"\n$"
        );
    }

    #[test]
    fn unknown_names_are_kept() {
        let variables = vars(&[("brand", "red")]);
        assert_eq!(
            interpolate("content = \"$5\" // $todo\ncolor = $brand", &variables),
            "content = \"$5\" // $todo\ncolor = red"
        );
    }

    #[test]
    fn strict_rejects_unknown_names() {
        let err = interpolate_strict("color = $brand", &Variables::new()).unwrap_err();
        assert!(matches!(err, JesError::UnknownVariable(ref name) if name == "brand"));
        assert_eq!(err.to_string(), "unknown variable: $brand");
    }

    #[test]
    fn strict_reports_first_unknown_name() {
        let variables = vars(&[("b", "1")]);
        let err = interpolate_strict("$a $b $c", &variables).unwrap_err();
        assert!(matches!(err, JesError::UnknownVariable(ref name) if name == "a"));
        assert_eq!(interpolate_strict("$b $", &variables).unwrap(), "1 $");
    }

    #[test]
    fn values_are_not_rescanned() {
        let variables = vars(&[("a", "$b")]);
        assert_eq!(interpolate("$a", &variables), "$b");
    }

    #[test]
    fn define_replaces() {
        let mut variables = Variables::new();
        variables.define("x", "1");
        variables.define("x", "2");
        assert_eq!(variables.resolve("x"), Some("2"));
        assert_eq!(variables.len(), 1);
    }
}
