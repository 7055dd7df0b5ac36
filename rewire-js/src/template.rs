//! Builds tree fragments from source templates with named holes.
//!
//! A template is ordinary module source. After it's parsed into the target arena, every identifier,
//! identifier pattern, string literal, member property name and plain property key whose text is
//! exactly a hole's name is substituted with the hole's value. By convention hole names are
//! uppercase (e.g. `NAME`, `VALUE`) so they can't clash with the fixed parts of a template.
use crate::ast::Arena;
use crate::ast::NodeId;
use crate::ast::PropKey;
use crate::ast::Syntax;
use crate::error::SyntaxError;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::parse::Parser;
use ahash::HashMap;
use ahash::HashMapExt;
use core::fmt;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, Debug)]
pub enum Hole {
  /// Substituted as an identifier, identifier pattern, string literal or property name, depending
  /// on where the hole appears. May be used any number of times.
  Name(String),
  /// An existing node that is moved into the hole's position. May be used at most once; the
  /// original node must not stay reachable from the tree afterwards.
  Node(NodeId),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TemplateError {
  Syntax(SyntaxError),
  /// `statement` was used on a template that doesn't contain exactly one statement.
  NotAStatement(usize),
  UnusedHole(String),
  NodeHoleReused(String),
}

impl Display for TemplateError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      TemplateError::Syntax(err) => write!(f, "template failed to parse: {}", err),
      TemplateError::NotAStatement(n) => {
        write!(f, "template must contain exactly one statement, found {}", n)
      }
      TemplateError::UnusedHole(name) => write!(f, "template hole `{}` is never used", name),
      TemplateError::NodeHoleReused(name) => {
        write!(f, "node hole `{}` is used more than once", name)
      }
    }
  }
}

impl Error for TemplateError {}

impl From<SyntaxError> for TemplateError {
  fn from(err: SyntaxError) -> Self {
    TemplateError::Syntax(err)
  }
}

/// Turns template text plus hole bindings into nodes allocated in a module's arena.
pub trait FragmentBuilder {
  fn statements(
    &mut self,
    arena: &mut Arena,
    text: &str,
    holes: &[(&str, Hole)],
  ) -> Result<Vec<NodeId>, TemplateError>;

  fn statement(
    &mut self,
    arena: &mut Arena,
    text: &str,
    holes: &[(&str, Hole)],
  ) -> Result<NodeId, TemplateError> {
    let start = arena.len();
    let stmts = self.statements(arena, text, holes)?;
    match stmts.as_slice() {
      [stmt] => Ok(*stmt),
      _ => {
        arena.truncate(start);
        Err(TemplateError::NotAStatement(stmts.len()))
      }
    }
  }
}

/// [`FragmentBuilder`] that parses templates with the crate's own parser.
#[derive(Default)]
pub struct TemplateBuilder {
  built: usize,
}

impl TemplateBuilder {
  pub fn new() -> TemplateBuilder {
    TemplateBuilder::default()
  }

  /// Number of fragments built so far.
  pub fn built(&self) -> usize {
    self.built
  }
}

struct Substitution<'h> {
  holes: HashMap<&'h str, &'h Hole>,
  uses: HashMap<&'h str, usize>,
}

impl<'h> Substitution<'h> {
  fn lookup(&mut self, text: &str) -> Option<&'h Hole> {
    let (&name, &hole) = self.holes.get_key_value(text)?;
    *self.uses.entry(name).or_default() += 1;
    Some(hole)
  }

  fn apply(&mut self, arena: &mut Arena, id: NodeId) {
    // The replacement syntax, plus the node it was moved from for node holes.
    let replacement = match arena.stx(id) {
      Syntax::Id { name } => self.lookup(name).map(|hole| match hole {
        Hole::Name(n) => (Syntax::Id { name: n.clone() }, None),
        Hole::Node(node) => (arena.stx(*node).clone(), Some(*node)),
      }),
      Syntax::IdPat { name } => self.lookup(name).map(|hole| match hole {
        Hole::Name(n) => (Syntax::IdPat { name: n.clone() }, None),
        Hole::Node(node) => (arena.stx(*node).clone(), Some(*node)),
      }),
      Syntax::LitStr { value } => self.lookup(value).map(|hole| match hole {
        Hole::Name(n) => (Syntax::LitStr { value: n.clone() }, None),
        Hole::Node(node) => (arena.stx(*node).clone(), Some(*node)),
      }),
      Syntax::Member {
        object,
        property,
        optional,
      } => match self.lookup(property) {
        Some(Hole::Name(n)) => Some((
          Syntax::Member {
            object: *object,
            property: n.clone(),
            optional: *optional,
          },
          None,
        )),
        _ => None,
      },
      Syntax::Prop {
        key: PropKey::Direct { name },
        value,
        shorthand,
      } => match self.lookup(name) {
        Some(Hole::Name(n)) => Some((
          Syntax::Prop {
            key: PropKey::Direct { name: n.clone() },
            value: *value,
            shorthand: *shorthand,
          },
          None,
        )),
        _ => None,
      },
      _ => None,
    };
    if let Some((stx, moved_from)) = replacement {
      if let Some(node) = moved_from {
        arena[id].loc = arena.loc(node);
      }
      arena.replace(id, stx);
    }
  }

  fn check(&self) -> Result<(), TemplateError> {
    for (&name, &hole) in self.holes.iter() {
      let uses = self.uses.get(name).copied().unwrap_or(0);
      if uses == 0 {
        return Err(TemplateError::UnusedHole(name.to_string()));
      }
      if uses > 1 && matches!(hole, Hole::Node(_)) {
        return Err(TemplateError::NodeHoleReused(name.to_string()));
      }
    }
    Ok(())
  }
}

impl FragmentBuilder for TemplateBuilder {
  fn statements(
    &mut self,
    arena: &mut Arena,
    text: &str,
    holes: &[(&str, Hole)],
  ) -> Result<Vec<NodeId>, TemplateError> {
    let start = arena.len();
    let mut parser = Parser::with_arena(Lexer::new(text), std::mem::take(arena));
    let parsed = parser.parse_module();
    *arena = parser.into_arena();
    let body = match parsed {
      Ok(body) => body,
      Err(err) => {
        arena.truncate(start);
        return Err(err.into());
      }
    };

    let mut subst = Substitution {
      holes: holes.iter().map(|(name, hole)| (*name, hole)).collect(),
      uses: HashMap::new(),
    };
    let fragment: Vec<NodeId> = arena.ids_from(start).collect();
    for &id in &fragment {
      // Template locations refer to the template text, not the module source.
      arena[id].loc = Loc::SYNTHETIC;
    }
    // Only the parsed nodes are visited, so syntax moved in by a node hole is never substituted
    // again.
    for &id in &fragment {
      subst.apply(arena, id);
    }
    if let Err(err) = subst.check() {
      arena.truncate(start);
      return Err(err);
    }
    self.built += 1;
    Ok(body)
  }
}

#[cfg(test)]
mod tests {
  use super::FragmentBuilder;
  use super::Hole;
  use super::TemplateBuilder;
  use super::TemplateError;
  use crate::ast::Arena;
  use crate::ast::Syntax;

  #[test]
  fn test_name_holes_substitute_identifiers_strings_and_properties() {
    let mut arena = Arena::new();
    let mut builder = TemplateBuilder::new();
    let stmt = builder
      .statement(
        &mut arena,
        r#"Object.defineProperty(exports, "NAME", { get: () => NAME }); exports.NAME;"#,
        &[("NAME", Hole::Name("foo".into()))],
      )
      .unwrap_err();
    assert_eq!(stmt, TemplateError::NotAStatement(2));

    let stmts = builder
      .statements(
        &mut arena,
        r#"Object.defineProperty(exports, "NAME", { get: () => NAME }); exports.NAME;"#,
        &[("NAME", Hole::Name("foo".into()))],
      )
      .unwrap();
    assert_eq!(stmts.len(), 2);
    let mut names = Vec::new();
    for id in arena.ids_from(0) {
      match arena.stx(id) {
        Syntax::Id { name } => names.push(name.clone()),
        Syntax::LitStr { value } => names.push(value.clone()),
        Syntax::Member { property, .. } => names.push(property.clone()),
        _ => {}
      }
    }
    assert!(!names.iter().any(|n| n == "NAME"));
    assert_eq!(names.iter().filter(|n| *n == "foo").count(), 3);
    assert_eq!(builder.built(), 2);
  }

  #[test]
  fn test_node_hole_moves_node() {
    let mut arena = Arena::new();
    let value = arena.synth(Syntax::LitNum { raw: "42".into() });
    let mut builder = TemplateBuilder::new();
    let stmt = builder
      .statement(&mut arena, "exports.x = VALUE;", &[(
        "VALUE",
        Hole::Node(value),
      )])
      .unwrap();
    let Syntax::ExprStmt { expr } = arena.stx(stmt) else {
      panic!("expected ExprStmt");
    };
    let Syntax::Assign { value, .. } = arena.stx(*expr) else {
      panic!("expected Assign");
    };
    assert!(matches!(arena.stx(*value), Syntax::LitNum { raw } if raw == "42"));
  }

  #[test]
  fn test_hole_errors() {
    let mut arena = Arena::new();
    let value = arena.synth(Syntax::This);
    let mut builder = TemplateBuilder::new();
    assert_eq!(
      builder.statement(&mut arena, "a;", &[("NAME", Hole::Name("x".into()))]),
      Err(TemplateError::UnusedHole("NAME".into()))
    );
    assert_eq!(
      builder.statement(&mut arena, "[VALUE, VALUE];", &[("VALUE", Hole::Node(value))]),
      Err(TemplateError::NodeHoleReused("VALUE".into()))
    );
    assert!(matches!(
      builder.statement(&mut arena, "let = ;", &[]),
      Err(TemplateError::Syntax(_))
    ));
    // Failed builds leave nothing behind.
    assert_eq!(arena.len(), 1);
  }
}
