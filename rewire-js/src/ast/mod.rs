use crate::loc::Loc;
use core::fmt;
use core::ops::{Index, IndexMut};
use serde::Serialize;
use std::fmt::{Debug, Formatter};

pub mod syntax;
pub mod walk;

pub use syntax::*;

/// Stable handle to a node in an [`Arena`]. Ids are never reused or invalidated; replacing a
/// node's syntax keeps its id, so anything that recorded the id (e.g. a reference index) stays
/// valid across rewrites.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl Debug for NodeId {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

#[derive(Clone, Debug, Serialize)]
pub struct Node {
  // A location is not a SourceRange; nodes created by a transformation don't exist in the source and use Loc::SYNTHETIC.
  pub loc: Loc,
  pub stx: Syntax,
}

#[derive(Clone, Default, Serialize)]
pub struct Arena {
  nodes: Vec<Node>,
}

impl Arena {
  pub fn new() -> Arena {
    Arena::default()
  }

  pub fn alloc(&mut self, loc: Loc, stx: Syntax) -> NodeId {
    let id = NodeId(
      u32::try_from(self.nodes.len()).expect("arena cannot hold more than u32::MAX nodes"),
    );
    self.nodes.push(Node { loc, stx });
    id
  }

  /// Allocates a node that has no source location.
  pub fn synth(&mut self, stx: Syntax) -> NodeId {
    self.alloc(Loc::SYNTHETIC, stx)
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Drops every node allocated at or after `len`. Only safe when nothing outside the dropped
  /// range refers to them, e.g. when backtracking in the parser.
  pub fn truncate(&mut self, len: usize) {
    self.nodes.truncate(len);
  }

  pub fn stx(&self, id: NodeId) -> &Syntax {
    &self.nodes[id.index()].stx
  }

  pub fn stx_mut(&mut self, id: NodeId) -> &mut Syntax {
    &mut self.nodes[id.index()].stx
  }

  pub fn loc(&self, id: NodeId) -> Loc {
    self.nodes[id.index()].loc
  }

  /// Swaps in new syntax for an existing node, returning the previous syntax.
  pub fn replace(&mut self, id: NodeId, stx: Syntax) -> Syntax {
    std::mem::replace(&mut self.nodes[id.index()].stx, stx)
  }

  /// Ids of all nodes allocated at or after `start`, in allocation order.
  pub fn ids_from(&self, start: usize) -> impl Iterator<Item = NodeId> {
    (start..self.nodes.len()).map(|i| NodeId(i as u32))
  }

  pub fn id_name(&self, id: NodeId) -> Option<&str> {
    match self.stx(id) {
      Syntax::Id { name } => Some(name),
      _ => None,
    }
  }
}

impl Index<NodeId> for Arena {
  type Output = Node;

  fn index(&self, index: NodeId) -> &Self::Output {
    &self.nodes[index.index()]
  }
}

impl IndexMut<NodeId> for Arena {
  fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
    &mut self.nodes[index.index()]
  }
}

impl Debug for Arena {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_map()
      .entries(self.nodes.iter().enumerate().map(|(i, n)| (i, &n.stx)))
      .finish()
  }
}

/// The root of a parsed module: the arena that owns every node, and the ordered top-level
/// statements. The module is mutated in place by transformations.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Module {
  pub arena: Arena,
  pub body: Vec<NodeId>,
}

impl Module {
  pub fn new(arena: Arena, body: Vec<NodeId>) -> Module {
    Module { arena, body }
  }
}

#[cfg(test)]
mod tests {
  use super::Arena;
  use super::Syntax;

  #[test]
  fn test_replace_keeps_id() {
    let mut arena = Arena::new();
    let id = arena.synth(Syntax::Id { name: "a".into() });
    let old = arena.replace(id, Syntax::This);
    assert!(matches!(old, Syntax::Id { ref name } if name == "a"));
    assert!(matches!(arena.stx(id), Syntax::This));
  }

  #[test]
  fn test_truncate_and_ids_from() {
    let mut arena = Arena::new();
    arena.synth(Syntax::This);
    let mark = arena.len();
    arena.synth(Syntax::Super);
    arena.synth(Syntax::LitNull);
    assert_eq!(arena.ids_from(mark).count(), 2);
    arena.truncate(mark);
    assert_eq!(arena.len(), 1);
  }
}
