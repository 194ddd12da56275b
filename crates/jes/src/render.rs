//! CSS code generation from a block [`Tree`].
//!
//! The renderer walks the tree depth-first, carrying the selector path of the
//! enclosing rule:
//!
//! - `&` in a selector is replaced by the parent path (`&.error` under
//!   `button` becomes `button.error`)
//! - any other selector is joined to the parent path with a space
//! - `@device` and `@print` blocks open an `@media` wrapper and render their
//!   contents against the unchanged parent path
//! - `@theme` blocks inside a device scope render inline, since their
//!   condition was folded into the device query while parsing; elsewhere they
//!   open their own `@media (prefers-color-scheme:…)` wrapper
//!
//! ```text
//! h1 {                                     h1{color:red}
//!     color = red                          @media screen and(min-width:576px)
//!     @device tablet .. {          =>          and(prefers-color-scheme:light)
//!         @theme light {                       {h1{color:blue}}
//!             color = blue
//!         }
//!     }
//! }
//! ```

use crate::tree::{Block, BlockKind, Property, Tree};

/// Name of the output group every block renders into.
pub const ROOT_GROUP: &str = "root";

/// Renders a parsed tree into CSS.
///
/// # Examples
///
/// ```rust
/// use jes::{parse, render};
///
/// let tree = parse("button {\n  color = black\n  @state error {\n    color = red\n  }\n}").unwrap();
/// assert_eq!(render(&tree), "button{color:black}button.error{color:red}");
/// ```
pub fn render(tree: &Tree) -> String {
    let mut renderer = Renderer::default();
    for block in tree {
        renderer.render_block(ROOT_GROUP, block, "", Enclosing::None);
    }
    renderer.output.finish()
}

/// The media scope a block is rendered inside of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Enclosing {
    None,
    Device,
    Print,
}

/// Rendered fragments, grouped by name in first-use order.
#[derive(Debug, Default)]
struct OutputGroups {
    groups: Vec<(&'static str, Vec<String>)>,
}

impl OutputGroups {
    fn group(&mut self, name: &'static str) -> &mut Vec<String> {
        let index = match self.groups.iter().position(|(n, _)| *n == name) {
            Some(index) => index,
            None => {
                self.groups.push((name, Vec::new()));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index].1
    }

    fn push(&mut self, name: &'static str, fragment: impl Into<String>) {
        self.group(name).push(fragment.into());
    }

    fn finish(self) -> String {
        self.groups
            .into_iter()
            .flat_map(|(_, fragments)| fragments)
            .collect()
    }
}

#[derive(Debug, Default)]
struct Renderer {
    output: OutputGroups,
}

impl Renderer {
    fn render_block(
        &mut self,
        group: &'static str,
        block: &Block,
        parent: &str,
        enclosing: Enclosing,
    ) {
        log::trace!("render {:?} block {:?} under {:?}", block.kind, block.selectors, parent);

        match block.kind {
            BlockKind::Plain => {
                let path = resolve_path(&block.selectors, parent);
                self.render_declarations(group, &path, &block.declarations);
                self.render_children(group, block, &path, enclosing);
            }
            BlockKind::Device | BlockKind::Print => {
                let (wrapper, inner) = if block.kind == BlockKind::Print {
                    ("@media print{".to_string(), Enclosing::Print)
                } else {
                    let condition = block.selectors.first().map(String::as_str).unwrap_or("");
                    (format!("@media screen and{condition}{{"), Enclosing::Device)
                };
                self.output.push(group, wrapper);
                self.render_declarations(group, parent, &block.declarations);
                self.render_children(group, block, parent, inner);
                self.output.push(group, "}");
            }
            BlockKind::Theme if enclosing == Enclosing::Device => {
                self.render_declarations(group, parent, &block.declarations);
                self.render_children(group, block, parent, enclosing);
            }
            BlockKind::Theme => {
                let condition = block.selectors.first().map(String::as_str).unwrap_or("");
                self.output.push(group, format!("@media {condition}{{"));
                self.render_declarations(group, parent, &block.declarations);
                self.render_children(group, block, parent, enclosing);
                self.output.push(group, "}");
            }
        }
    }

    fn render_children(
        &mut self,
        group: &'static str,
        block: &Block,
        parent: &str,
        enclosing: Enclosing,
    ) {
        for child in &block.children {
            self.render_block(group, child, parent, enclosing);
        }
    }

    fn render_declarations(&mut self, group: &'static str, path: &str, declarations: &[Property]) {
        if declarations.is_empty() {
            return;
        }
        self.output
            .push(group, format!("{path}{{{}}}", render_properties(declarations)));
    }
}

/// Resolves a block's selectors against the parent path, comma-joined.
fn resolve_path(selectors: &[String], parent: &str) -> String {
    selectors
        .iter()
        .map(|selector| match selector.strip_prefix('&') {
            Some(rest) => format!("{parent}{rest}"),
            None if parent.is_empty() => selector.clone(),
            None => format!("{parent} {selector}"),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders declarations as `key:value` pairs joined by `;`.
fn render_properties(properties: &[Property]) -> String {
    properties
        .iter()
        .map(|property| format!("{}:{}", property.key, property.value))
        .collect::<Vec<_>>()
        .join(";")
}
