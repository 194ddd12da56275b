//! The block tree produced by the parser and consumed by the renderer.

/// How a block renders: as a plain rule or as one of the `@media` scopes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlockKind {
    #[default]
    Plain,
    Device,
    Theme,
    Print,
}

impl BlockKind {
    /// `true` for the kinds that may not be nested inside each other.
    pub fn is_device_scope(self) -> bool {
        matches!(self, BlockKind::Device | BlockKind::Print)
    }
}

/// A `key = value` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One scope of the source: selectors, declarations and nested blocks.
///
/// Scope blocks (`Device`, `Theme`, `Print`) hold exactly one selector, the
/// resolved media condition (or `print`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub selectors: Vec<String>,
    pub declarations: Vec<Property>,
    pub children: Vec<Block>,
}

impl Block {
    /// Creates a plain block with the given selectors.
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selectors: selectors.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Creates a scope block with a single resolved condition.
    pub fn scope(kind: BlockKind, condition: impl Into<String>) -> Self {
        Self {
            kind,
            selectors: vec![condition.into()],
            ..Default::default()
        }
    }

    pub fn with_declaration(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.declarations.push(Property::new(key, value));
        self
    }

    pub fn with_child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }
}

/// An ordered forest of top-level blocks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    pub blocks: Vec<Block>,
}

impl Tree {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
