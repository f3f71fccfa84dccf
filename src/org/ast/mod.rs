//! AST primitives: source positions and the position-tracking node tree.

pub mod node;
pub mod range;

pub use node::{Mapped, Node, NodeId, Tree};
pub use range::{Point, Position, Range, SourceIndex};
