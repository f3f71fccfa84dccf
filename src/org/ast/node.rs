//! Position-tracking node tree
//!
//!     Classified lines become nodes in a tree whose shape is decided by an
//!     external document assembler. The tree's job here is bookkeeping: every
//!     node's span must contain the span of every descendant, and that
//!     invariant is maintained incrementally at each attach rather than being
//!     recomputed from scratch.
//!
//!     Nodes live in an arena owned by the [`Tree`]; children are held as
//!     arena indices and the parent link is a non-owning [`NodeId`] handle.
//!     This gives the upward span-propagation walk a parent pointer without
//!     creating a reference cycle: the arena owns every node, handles own
//!     nothing.
//!
//! Span Widening
//!
//!     Attaching a child widens at most one boundary of each ancestor per
//!     call. An empty ancestor adopts the child's span outright; otherwise
//!     the start moves if the child starts earlier, else the end moves if the
//!     child ends later. A child of a non-empty parent is assumed not to both
//!     precede its start and exceed its end in the same call, since a child
//!     is nested within or adjacent to already-parsed content. The walk
//!     continues upward only while a span actually changed, so an attach deep
//!     in the tree can ripple to the root but an attach inside an existing
//!     span touches nothing.

use serde::Serialize;

use crate::org::ast::range::Position;
use crate::org::token::{Token, TokenData};

/// A non-owning handle to a node in a [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A tree element: a token plus children and a parent handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: String,
    pub raw: String,
    pub position: Position,
    pub data: TokenData,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            raw: String::new(),
            position: Position::default(),
            data: TokenData::None,
            children: Vec::new(),
            parent: None,
        }
    }

    fn from_token(token: Token) -> Self {
        Self {
            kind: token.kind,
            raw: token.raw,
            position: token.position,
            data: token.data,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Child handles in attach order (not sorted by position).
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Arena-backed node tree with a single root.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree whose root node has the given kind, an empty span and no
    /// children.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(kind)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Allocate a detached node with an empty span and no children.
    ///
    /// The node takes part in the tree once passed to [`Tree::attach_node`].
    pub fn new_node(&mut self, kind: impl Into<String>) -> NodeId {
        self.nodes.push(Node::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    /// Wrap a classified token as a node and attach it under `parent`.
    ///
    /// Returns the new child's handle; the parent handle stays valid in the
    /// caller's hands, and the child handle is what a subsequent deeper
    /// attach needs.
    pub fn attach(&mut self, parent: NodeId, token: Token) -> NodeId {
        self.nodes.push(Node::from_token(token));
        let child = NodeId(self.nodes.len() - 1);
        self.attach_node(parent, child);
        child
    }

    /// Attach a previously allocated node under `parent`.
    ///
    /// Widens ancestor spans as needed (see the module docs), sets the
    /// child's parent handle, and appends the child to the parent's children.
    /// Attach order is insertion order; children are never re-sorted.
    pub fn attach_node(&mut self, parent: NodeId, child: NodeId) {
        let child_position = self.nodes[child.0].position;
        self.widen(parent, child_position);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Propagate a new descendant span up the ancestor chain.
    ///
    /// At each level at most one boundary moves; the walk stops at the first
    /// ancestor whose span already covers the incoming one.
    fn widen(&mut self, from: NodeId, child_position: Position) {
        let mut current = Some(from);
        let mut incoming = child_position;

        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            let dirty = if node.position.is_empty() {
                node.position = incoming;
                true
            } else if incoming.start.before(&node.position.start) {
                node.position.start = incoming.start;
                true
            } else if incoming.end.after(&node.position.end) {
                node.position.end = incoming.end;
                true
            } else {
                false
            };

            if !dirty {
                break;
            }
            incoming = node.position;
            current = node.parent;
        }
    }

    /// Depth-first structure-preserving copy with a caller-supplied transform
    /// applied at every node.
    ///
    /// The output mirrors the tree's shape exactly (same child counts at
    /// every level, `kind` preserved) but carries only what the transform
    /// returns; parent handles and other arena bookkeeping do not survive the
    /// mapping. Intended for exporting a built tree into another
    /// representation such as JSON.
    pub fn map<T>(&self, transform: impl Fn(&Node) -> T) -> Mapped<T> {
        self.map_node(self.root, &transform)
    }

    fn map_node<T>(&self, id: NodeId, transform: &impl Fn(&Node) -> T) -> Mapped<T> {
        let node = &self.nodes[id.0];
        Mapped {
            kind: node.kind.clone(),
            value: transform(node),
            children: node
                .children
                .iter()
                .map(|child| self.map_node(*child, transform))
                .collect(),
        }
    }
}

/// One node of a mapped tree: the preserved `kind`, the transform's output,
/// and the mapped children. Serializes with the transform output flattened in
/// and empty child lists skipped, matching the shape consumers expect from an
/// exported tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mapped<T> {
    pub kind: String,
    #[serde(flatten)]
    pub value: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Mapped<T>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::ast::range::{Point, Position};

    fn span(start: (usize, usize), end: (usize, usize)) -> Position {
        Position::new(Point::new(start.0, start.1), Point::new(end.0, end.1))
    }

    fn token_at(kind: &str, position: Position) -> Token {
        Token::new(kind, "", TokenData::None).at(position)
    }

    #[test]
    fn test_new_tree_root_is_empty() {
        let tree = Tree::new("document");
        let root = tree.node(tree.root());
        assert_eq!(root.kind, "document");
        assert!(root.position.is_empty());
        assert!(root.children().is_empty());
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn test_empty_parent_adopts_child_span() {
        let mut tree = Tree::new("document");
        let child_span = span((2, 0), (3, 5));
        tree.attach(tree.root(), token_at("headline", child_span));

        assert_eq!(tree.node(tree.root()).position, child_span);
    }

    #[test]
    fn test_attach_sets_parent_and_appends_child() {
        let mut tree = Tree::new("document");
        let first = tree.attach(tree.root(), token_at("headline", span((0, 0), (0, 9))));
        let second = tree.attach(tree.root(), token_at("line", span((1, 0), (1, 4))));

        let root = tree.node(tree.root());
        assert_eq!(root.children(), &[first, second]);
        assert_eq!(tree.node(first).parent(), Some(tree.root()));
        assert_eq!(tree.node(second).parent(), Some(tree.root()));
    }

    #[test]
    fn test_detached_node_then_attach() {
        let mut tree = Tree::new("document");
        let section = tree.new_node("section");
        assert!(tree.node(section).position.is_empty());

        tree.attach(section, token_at("headline", span((4, 0), (4, 12))));
        tree.attach_node(tree.root(), section);

        assert_eq!(tree.node(section).position, span((4, 0), (4, 12)));
        assert_eq!(tree.node(tree.root()).position, span((4, 0), (4, 12)));
    }
}
