//! Line comment stripping.
//!
//! `// ...` runs to the end of its line and is removed before scanning. The
//! line break itself is kept, so a comment after a value still terminates the
//! declaration and line numbers stay intact.
//!
//! `//` is left alone inside quoted strings and directly after a `:`, so
//! values like `url("//cdn/a.png")` or `url(https://cdn/a.png)` survive. A
//! quote only opens a string where a token can start, so the apostrophe in
//! `content = it's // note` does not hide the comment.

/// Removes every `//` line comment from `source`.
pub fn strip_line_comments(source: &str) -> String {
    let mut output = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;
    let mut previous: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(open) => {
                if c == open {
                    quote = None;
                } else if c == '\n' {
                    // Quotes never span lines.
                    quote = None;
                }
            }
            None if (c == '"' || c == '\'') && starts_token(previous) => quote = Some(c),
            None if c == '/' && chars.peek() == Some(&'/') && previous != Some(':') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
                continue;
            }
            None => {}
        }
        output.push(c);
        previous = Some(c);
    }

    output
}

/// Whether a string can start after `previous`.
fn starts_token(previous: Option<char>) -> bool {
    match previous {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '=' | '(' | '[' | ','),
    }
}
