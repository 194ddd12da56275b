//! Stylesheet parsing.
//!
//! The parser is a single pass over the source, one character at a time:
//!
//! - `{` closes the selector buffer and opens a block
//! - `}` closes the innermost open block
//! - `=` ends a property name; the value runs to the next line break
//! - `[` / `]` mark an attribute selector, where `=` and `,` are literal
//! - `,` separates selectors (or is part of a value)
//!
//! ```text
//! button {
//!     color = black
//!     @state error {
//!         color = red
//!     }
//! }
//! ```
//!
//! Selectors that start with `@` are resolved by [`directives`] as soon as
//! their block opens. Open blocks live on a stack and are attached to their
//! parent when they close, so a block is only ever reachable from one place.
//!
//! ## Submodules
//!
//! - [`comments`]: `//` line comment stripping
//! - [`directives`]: directive selector resolution

pub mod comments;
pub mod directives;

use bitflags::bitflags;

use crate::error::{ParseError, Position};
use crate::parser::comments::strip_line_comments;
use crate::parser::directives::{Directive, resolve, split_directive};
use crate::tree::{Block, BlockKind, Property, Tree};

bitflags! {
    /// What the scanner is currently inside of.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ScanMode: u8 {
        /// Between a property's `=` and its terminating line break.
        const DECLARATION       = 0b0000_0001;
        /// Between `[` and `]` of an attribute selector.
        const SELECTOR_BRACKETS = 0b0000_0010;
        /// Some open block is a `@device` or `@print` scope.
        const DEVICE_SCOPE      = 0b0000_0100;
    }
}

/// Parses stylesheet source into a block [`Tree`].
///
/// # Examples
///
/// ```rust
/// use jes::{parse, Block};
///
/// let tree = parse("h1 {\n  color = red\n}").unwrap();
/// assert_eq!(tree.blocks, vec![Block::new(["h1"]).with_declaration("color", "red")]);
/// ```
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    let source = strip_line_comments(source);
    let mut parser = Parser::new();
    for c in source.chars() {
        parser.process_char(c)?;
    }
    parser.finish()
}

/// The parser state.
struct Parser {
    /// Current location, pointing at the character being processed.
    position: Position,
    /// Text collected since the last structural character.
    buffer: String,
    /// Name of the property whose value is being collected.
    property: String,
    mode: ScanMode,
    /// Blocks opened but not yet closed, innermost last.
    stack: Vec<Block>,
    /// Closed top-level blocks.
    tree: Vec<Block>,
}

impl Parser {
    fn new() -> Self {
        Self {
            position: Position::default(),
            buffer: String::new(),
            property: String::new(),
            mode: ScanMode::empty(),
            stack: Vec::new(),
            tree: Vec::new(),
        }
    }

    /// Process a single character and advance the cursor past it.
    fn process_char(&mut self, c: char) -> Result<(), ParseError> {
        match c {
            '{' => self.open_block()?,
            '}' => self.close_block()?,
            '[' | ']' => self.bracket(c),
            '=' => self.assignment()?,
            ',' => self.comma()?,
            '\n' => self.line_break(),
            // A directive can only start a selector, so the value before it
            // was never terminated.
            '@' if self.mode.contains(ScanMode::DECLARATION) => {
                return Err(ParseError::MissingLineBreakAfterPropertyValue(
                    self.position,
                ));
            }
            _ => self.buffer.push(c),
        }

        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Ok(())
    }

    /// Handle `{`: turn the buffered selector text into a new open block.
    fn open_block(&mut self) -> Result<(), ParseError> {
        if self.mode.contains(ScanMode::DECLARATION) {
            return Err(ParseError::MissingLineBreakAfterPropertyValue(
                self.position,
            ));
        }

        let selector = self.buffer.trim();
        if selector.is_empty() {
            return Err(ParseError::UnexpectedOpeningBrace(self.position));
        }

        let selectors = split_selectors(selector);
        if selectors.iter().any(|s| s.is_empty()) {
            return Err(ParseError::EmptySelector(self.position));
        }

        let block = self.build_block(selectors)?;
        log::trace!(
            "open {:?} block {:?} @ {}",
            block.kind,
            block.selectors,
            self.position
        );

        if block.kind.is_device_scope() {
            self.mode.insert(ScanMode::DEVICE_SCOPE);
        }
        self.stack.push(block);
        self.buffer.clear();
        Ok(())
    }

    /// Create a block from its raw selectors, resolving any directives.
    fn build_block(&mut self, selectors: Vec<String>) -> Result<Block, ParseError> {
        let count = selectors.len();
        let mut block = Block::new(Vec::<String>::new());

        for raw in selectors {
            if !raw.starts_with('@') {
                block.selectors.push(raw);
                continue;
            }

            let (keyword, argument) = split_directive(&raw);
            let Some(directive) = Directive::from_keyword(keyword) else {
                log::debug!(
                    "passing through unknown directive `{keyword}` @ {}",
                    self.position
                );
                block.selectors.push(raw);
                continue;
            };

            match directive.scope_kind() {
                Some(kind) => {
                    if kind.is_device_scope() && self.mode.contains(ScanMode::DEVICE_SCOPE) {
                        return Err(ParseError::NestedDeviceRange(self.position));
                    }
                    if count > 1 {
                        return Err(ParseError::MultipleSelectorsForScopeBlock {
                            directive: directive.keyword(),
                            position: self.position,
                        });
                    }

                    let condition = self.resolve_directive(directive, argument)?;
                    if kind == BlockKind::Theme {
                        self.merge_theme_into_device(&condition);
                    }
                    block.kind = kind;
                    block.selectors.push(condition);
                }
                None => {
                    let selector = self.resolve_directive(directive, argument)?;
                    block.selectors.push(selector);
                }
            }
        }

        Ok(block)
    }

    fn resolve_directive(
        &self,
        directive: Directive,
        argument: &str,
    ) -> Result<String, ParseError> {
        resolve(directive, argument).map_err(|source| ParseError::Directive {
            source,
            position: self.position,
        })
    }

    /// Fold a theme condition into the innermost open `@device` block, so
    /// both conditions end up in a single media query.
    fn merge_theme_into_device(&mut self, condition: &str) {
        let device = self
            .stack
            .iter_mut()
            .rev()
            .find(|block| block.kind == BlockKind::Device);

        if let Some(device) = device {
            if let Some(query) = device.selectors.first_mut() {
                query.push_str("and");
                query.push_str(condition);
            }
        }
    }

    /// Handle `}`: close the innermost block and attach it to its parent.
    fn close_block(&mut self) -> Result<(), ParseError> {
        if self.stack.is_empty() {
            return Err(ParseError::UnmatchedClosingBrace(self.position));
        }
        if self.mode.contains(ScanMode::DECLARATION) {
            return Err(ParseError::MissingLineBreakAfterPropertyValue(
                self.position,
            ));
        }

        if !self.buffer.trim().is_empty() {
            log::debug!(
                "discarding stray text {:?} before `}}` @ {}",
                self.buffer.trim(),
                self.position
            );
        }

        if let Some(block) = self.stack.pop() {
            log::trace!(
                "close {:?} block {:?} @ {}",
                block.kind,
                block.selectors,
                self.position
            );
            match self.stack.last_mut() {
                Some(parent) => parent.children.push(block),
                None => self.tree.push(block),
            }
        }

        let in_device_scope = self.stack.iter().any(|b| b.kind.is_device_scope());
        self.mode.set(ScanMode::DEVICE_SCOPE, in_device_scope);
        self.buffer.clear();
        Ok(())
    }

    /// Handle `[` and `]`. Brackets inside a value are plain text.
    fn bracket(&mut self, c: char) {
        if !self.mode.contains(ScanMode::DECLARATION) {
            self.mode.set(ScanMode::SELECTOR_BRACKETS, c == '[');
        }
        self.buffer.push(c);
    }

    /// Handle `=`: either attribute equality or the start of a value.
    fn assignment(&mut self) -> Result<(), ParseError> {
        if self.mode.contains(ScanMode::SELECTOR_BRACKETS) {
            self.buffer.push('=');
            return Ok(());
        }
        if self.mode.contains(ScanMode::DECLARATION) {
            return Err(ParseError::MissingLineBreakAfterPropertyValue(
                self.position,
            ));
        }
        if self.stack.is_empty() {
            return Err(ParseError::PropertyDeclarationOutsideBlock(self.position));
        }

        let property = self.buffer.trim();
        if property.is_empty() {
            return Err(ParseError::EmptyPropertyName(self.position));
        }

        self.property = property.to_string();
        self.mode.insert(ScanMode::DECLARATION);
        self.buffer.clear();
        Ok(())
    }

    /// Handle `,`. A comma with nothing before it cannot separate anything.
    fn comma(&mut self) -> Result<(), ParseError> {
        if !self
            .mode
            .intersects(ScanMode::SELECTOR_BRACKETS | ScanMode::DECLARATION)
            && self.buffer.trim().is_empty()
        {
            return Err(ParseError::UnexpectedCommaOutsideBlock(self.position));
        }
        self.buffer.push(',');
        Ok(())
    }

    /// Handle a line break: it terminates a pending declaration.
    fn line_break(&mut self) {
        if !self.mode.contains(ScanMode::DECLARATION) {
            return;
        }

        let property = Property::new(std::mem::take(&mut self.property), self.buffer.trim());
        if let Some(block) = self.stack.last_mut() {
            block.declarations.push(property);
        }
        self.mode.remove(ScanMode::DECLARATION);
        self.buffer.clear();
    }

    fn finish(self) -> Result<Tree, ParseError> {
        if !self.stack.is_empty() {
            return Err(ParseError::UnexpectedEndOfString);
        }
        Ok(Tree::new(self.tree))
    }
}

/// Splits a selector list on its top-level commas.
///
/// Commas inside `[...]`, `(...)` or quotes belong to the selector.
fn split_selectors(list: &str) -> Vec<String> {
    let mut selectors = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in list.chars() {
        match (quote, c) {
            (Some(open), _) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                selectors.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    selectors.push(current.trim().to_string());

    selectors
}
