//! # JES - Just Enough Styling
//!
//! A compiler for a small CSS superset: nested blocks, `key = value`
//! declarations and `@` directives that expand into selectors and media
//! queries.
//!
//! - **Parsing**: turn source text into a block [`Tree`] with [`parse`]
//! - **Rendering**: turn a [`Tree`] into flat CSS with [`render`]
//!
//! ## Quick Start
//!
//! ```rust
//! use jes::{parse, render};
//!
//! let source = r#"
//! nav {
//!     display = flex
//!
//!     @child class item {
//!         margin = 0 4px
//!     }
//!
//!     @device .. mobile {
//!         display = none
//!     }
//! }
//! "#;
//!
//! let tree = parse(source).expect("valid stylesheet");
//! assert_eq!(
//!     render(&tree),
//!     "nav{display:flex}nav>.item{margin:0 4px}\
//!      @media screen and(max-width:575px){nav{display:none}}"
//! );
//! ```
//!
//! ## Syntax
//!
//! - Blocks: `selector { ... }`, nested to any depth
//! - Selector lists: `h1, h2 { ... }`
//! - Parent reference: `&:hover`, `&.active`
//! - Declarations: `key = value`, terminated by a line break
//! - Line comments: `// ...`
//!
//! ### Directives
//! - Relations: `@child`, `@sibling`, `@adjacent`, `@with`
//! - Element state: `@class`, `@state`, `@when`, `@attribute`
//! - Position: `@position`, `@first`, `@last`
//! - Media scopes: `@device`, `@theme`, `@print`
//!
//! ## Modules
//!
//! - [`parser`]: the parsing state machine and directive resolution
//! - [`render`]: CSS generation
//! - [`tree`]: blocks and declarations
//! - [`devices`]: the named device width ranges
//! - [`error`]: error types for parsing failures

pub mod devices;
pub mod error;
pub mod parser;
pub mod render;
pub mod tree;

pub use devices::{DEVICE_RANGES, DeviceRange};
pub use error::{DirectiveError, ParseError, Position};
pub use parser::parse;
pub use render::render;
pub use tree::{Block, BlockKind, Property, Tree};
