use super::state::ModuleState;
use super::INTEROP_HELPERS;
use super::REQUIRE;
use super::RESERVED_NAMES;
use crate::ast::Arena;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::ast::VarDeclKind;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeclForm {
  MutableVariable,
  ImmutableVariable,
  Function,
  Class,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExportStatus {
  Private,
  Named,
  Default,
  /// Only exported through `export { local as other }`.
  Renamed,
}

/// Why a top-level declaration was left as it is.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SkipReason {
  /// Emitted by a previous rewrite, or already exposed through an accessor on `exports`.
  Synthesized,
  /// Initialized by a `require(...)` call.
  RequireCall,
  /// Declares, or is initialized by a call to, an interop helper of the module-format converter.
  InteropHelper,
  /// `export default function () {}` or `export default class {}`; there is no local name to
  /// redirect references through.
  AnonymousDefault,
  /// Declarator with an object or array pattern.
  Destructuring,
  /// A name the rewritten output itself refers to.
  ReservedName,
  /// Referenced from inside a scope that declares its own `exports`.
  NamespaceShadowed,
}

impl Display for SkipReason {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      SkipReason::Synthesized => "already synthesized",
      SkipReason::RequireCall => "require call",
      SkipReason::InteropHelper => "interop helper",
      SkipReason::AnonymousDefault => "anonymous default export",
      SkipReason::Destructuring => "destructuring pattern",
      SkipReason::ReservedName => "reserved name",
      SkipReason::NamespaceShadowed => "exports shadowed at a reference",
    })
  }
}

/// How a binding's declaration is replaced.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shape {
  /// `const f = () => ...` becomes `exports.f = () => ...`.
  ArrowConst { init: NodeId },
  /// A variable kept as a local of the same kind, plus an accessor.
  Variable {
    kind: VarDeclKind,
    init: Option<NodeId>,
  },
  /// A function declaration kept in place; its accessor goes to the module prologue.
  FunctionDecl { decl: NodeId },
  /// A class declaration kept in place, followed by its accessor.
  ClassDecl { decl: NodeId },
  /// `export function f() {}` becomes `let f = function f() {}`.
  ExportedFunction { func: NodeId },
  /// `export class C {}` becomes `const C = class C {}`.
  ExportedClass { class: NodeId },
  /// `export default function f() {}` becomes `exports.default = function f() {}`.
  DefaultFunction { func: NodeId },
  /// `export default class C {}` keeps `class C {}` and exposes it as both `C` and `default`.
  DefaultClass { decl: NodeId },
}

#[derive(Clone, Debug)]
pub struct Binding {
  pub name: String,
  pub form: DeclForm,
  pub export: ExportStatus,
  pub shape: Shape,
}

impl Binding {
  /// The `exports` property that references are redirected to.
  pub fn namespace_key(&self) -> &str {
    match self.shape {
      Shape::DefaultFunction { .. } => "default",
      _ => &self.name,
    }
  }

  /// Whether the replacement declares a local binding of the same name.
  pub fn keeps_local(&self) -> bool {
    !matches!(
      self.shape,
      Shape::ArrowConst { .. } | Shape::DefaultFunction { .. }
    )
  }
}

#[derive(Clone, Debug)]
pub enum Declared {
  Rewrite(Binding),
  Skip {
    /// The declarator (for variable statements) or declaration statement that stays as is.
    node: NodeId,
    names: Vec<String>,
    reason: SkipReason,
  },
}

#[derive(Clone, Debug)]
pub enum Classified {
  /// Passes through unchanged: imports, re-exports, expressions, control flow and so on.
  Keep,
  /// A variable statement, possibly behind `export`, with one entry per declarator.
  Declarators {
    kind: VarDeclKind,
    exported: bool,
    entries: Vec<Declared>,
  },
  /// A function or class declaration, possibly behind `export` or `export default`.
  Single(Declared),
  /// `export { ... }` without `from`.
  ExportList,
}

impl Classified {
  pub fn entries(&self) -> &[Declared] {
    match self {
      Classified::Declarators { entries, .. } => entries,
      Classified::Single(entry) => std::slice::from_ref(entry),
      Classified::Keep | Classified::ExportList => &[],
    }
  }
}

pub fn pattern_names(arena: &Arena, pat: NodeId, out: &mut Vec<String>) {
  match arena.stx(pat) {
    Syntax::IdPat { name } => out.push(name.clone()),
    Syntax::ArrayPat { elements } => {
      for &e in elements.iter().flatten() {
        pattern_names(arena, e, out);
      }
    }
    Syntax::ObjPat { props } => {
      for &p in props {
        pattern_names(arena, p, out);
      }
    }
    Syntax::ObjPatProp { target, .. }
    | Syntax::AssignPat { target, .. }
    | Syntax::RestPat { target } => pattern_names(arena, *target, out),
    _ => {}
  }
}

fn check_name(name: &str, state: &ModuleState) -> Option<SkipReason> {
  if INTEROP_HELPERS.contains(&name) {
    Some(SkipReason::InteropHelper)
  } else if RESERVED_NAMES.contains(&name) {
    Some(SkipReason::ReservedName)
  } else if state.synthesized.contains(name) {
    Some(SkipReason::Synthesized)
  } else if state.namespace_shadowed.contains(name) {
    Some(SkipReason::NamespaceShadowed)
  } else {
    None
  }
}

fn check_init(arena: &Arena, init: NodeId) -> Option<SkipReason> {
  let Syntax::Call { callee, .. } = arena.stx(init) else {
    return None;
  };
  match arena.id_name(*callee) {
    Some(REQUIRE) => Some(SkipReason::RequireCall),
    Some(name) if INTEROP_HELPERS.contains(&name) => Some(SkipReason::InteropHelper),
    _ => None,
  }
}

/// Sorts the top-level statements of one module. Bindings that will be redeclared locally are
/// added to the synthesized-name set as they're found, so a later declaration of the same name is
/// left alone.
pub struct Classifier<'a> {
  arena: &'a Arena,
  state: &'a mut ModuleState,
}

impl<'a> Classifier<'a> {
  pub fn new(arena: &'a Arena, state: &'a mut ModuleState) -> Classifier<'a> {
    Classifier { arena, state }
  }

  fn export_status(&self, name: &str, declared: ExportStatus) -> ExportStatus {
    if declared != ExportStatus::Private {
      return declared;
    }
    match self.state.listed_exports.get(name) {
      Some(exported) if exported.iter().any(|e| e != name) => ExportStatus::Renamed,
      Some(_) => ExportStatus::Named,
      None => ExportStatus::Private,
    }
  }

  fn bind(
    &mut self,
    node: NodeId,
    name: &str,
    form: DeclForm,
    export: ExportStatus,
    shape: Shape,
  ) -> Declared {
    if let Some(reason) = check_name(name, self.state) {
      return Declared::Skip {
        node,
        names: vec![name.to_string()],
        reason,
      };
    }
    let binding = Binding {
      name: name.to_string(),
      form,
      export: self.export_status(name, export),
      shape,
    };
    if binding.keeps_local() {
      self.state.synthesized.insert(binding.name.clone());
    }
    Declared::Rewrite(binding)
  }

  fn declarator(&mut self, kind: VarDeclKind, exported: bool, declarator: NodeId) -> Declared {
    let arena = self.arena;
    let Syntax::Declarator { pat, init } = arena.stx(declarator) else {
      unreachable!("variable statement child is not a declarator");
    };
    let Syntax::IdPat { name } = arena.stx(*pat) else {
      let mut names = Vec::new();
      pattern_names(arena, *pat, &mut names);
      return Declared::Skip {
        node: declarator,
        names,
        reason: SkipReason::Destructuring,
      };
    };
    if let Some(reason) = init.and_then(|init| check_init(arena, init)) {
      return Declared::Skip {
        node: declarator,
        names: vec![name.clone()],
        reason,
      };
    }
    let (form, shape) = match (kind, init) {
      (VarDeclKind::Const, Some(init)) if matches!(arena.stx(*init), Syntax::Arrow { .. }) => (
        DeclForm::ImmutableVariable,
        Shape::ArrowConst { init: *init },
      ),
      _ => (
        if kind.is_mutable() {
          DeclForm::MutableVariable
        } else {
          DeclForm::ImmutableVariable
        },
        Shape::Variable { kind, init: *init },
      ),
    };
    let export = if exported {
      ExportStatus::Named
    } else {
      ExportStatus::Private
    };
    self.bind(declarator, name, form, export, shape)
  }

  fn declarators(&mut self, kind: VarDeclKind, exported: bool, decls: &[NodeId]) -> Classified {
    Classified::Declarators {
      kind,
      exported,
      entries: decls
        .iter()
        .map(|&d| self.declarator(kind, exported, d))
        .collect(),
    }
  }

  pub fn classify(&mut self, stmt: NodeId) -> Classified {
    let arena = self.arena;
    match arena.stx(stmt) {
      Syntax::VarDecl { kind, declarators } => self.declarators(*kind, false, declarators),
      Syntax::FuncDecl {
        name: Some(name), ..
      } => Classified::Single(self.bind(
        stmt,
        name,
        DeclForm::Function,
        ExportStatus::Private,
        Shape::FunctionDecl { decl: stmt },
      )),
      Syntax::ClassDecl {
        name: Some(name), ..
      } => Classified::Single(self.bind(
        stmt,
        name,
        DeclForm::Class,
        ExportStatus::Private,
        Shape::ClassDecl { decl: stmt },
      )),
      Syntax::ExportDecl { decl } => match arena.stx(*decl) {
        Syntax::VarDecl { kind, declarators } => self.declarators(*kind, true, declarators),
        Syntax::FuncDecl {
          name: Some(name),
          func,
        } => Classified::Single(self.bind(
          stmt,
          name,
          DeclForm::Function,
          ExportStatus::Named,
          Shape::ExportedFunction { func: *func },
        )),
        Syntax::ClassDecl {
          name: Some(name),
          class,
        } => Classified::Single(self.bind(
          stmt,
          name,
          DeclForm::Class,
          ExportStatus::Named,
          Shape::ExportedClass { class: *class },
        )),
        _ => Classified::Keep,
      },
      Syntax::ExportDefaultDecl { decl } => match arena.stx(*decl) {
        Syntax::FuncDecl {
          name: Some(name),
          func,
        } => Classified::Single(self.bind(
          stmt,
          name,
          DeclForm::Function,
          ExportStatus::Default,
          Shape::DefaultFunction { func: *func },
        )),
        Syntax::ClassDecl {
          name: Some(name), ..
        } => Classified::Single(self.bind(
          stmt,
          name,
          DeclForm::Class,
          ExportStatus::Default,
          Shape::DefaultClass { decl: *decl },
        )),
        _ => Classified::Single(Declared::Skip {
          node: stmt,
          names: vec!["default".to_string()],
          reason: SkipReason::AnonymousDefault,
        }),
      },
      Syntax::ExportList { from: None, .. } => Classified::ExportList,
      _ => Classified::Keep,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::Classified;
  use super::Classifier;
  use super::DeclForm;
  use super::Declared;
  use super::ExportStatus;
  use super::Shape;
  use super::SkipReason;
  use crate::parse::parse;
  use crate::rewrite::state::ModuleState;
  use crate::rewrite::RewireOptions;

  fn classify_all(src: &str) -> Vec<Classified> {
    let m = parse(src).unwrap();
    let mut state = ModuleState::scan(&m.arena, &m.body, &RewireOptions::default());
    let mut classifier = Classifier::new(&m.arena, &mut state);
    m.body.iter().map(|&s| classifier.classify(s)).collect()
  }

  fn single(c: &Classified) -> &Declared {
    match c {
      Classified::Single(d) => d,
      Classified::Declarators { entries, .. } => &entries[0],
      other => panic!("expected a declaration, got {:?}", other),
    }
  }

  fn skip_reason(c: &Classified) -> SkipReason {
    match single(c) {
      Declared::Skip { reason, .. } => *reason,
      other => panic!("expected a skip, got {:?}", other),
    }
  }

  #[test]
  fn test_variable_shapes() {
    let out = classify_all("const f = () => 1; const g = function () {}; let x; var y = 2;");
    let forms: Vec<_> = out
      .iter()
      .map(|c| match single(c) {
        Declared::Rewrite(b) => (b.form, matches!(b.shape, Shape::ArrowConst { .. })),
        other => panic!("unexpected {:?}", other),
      })
      .collect();
    assert_eq!(forms, vec![
      (DeclForm::ImmutableVariable, true),
      (DeclForm::ImmutableVariable, false),
      (DeclForm::MutableVariable, false),
      (DeclForm::MutableVariable, false),
    ]);
  }

  #[test]
  fn test_skips() {
    let out = classify_all(
      r#"
var fs = require("fs");
var _a = _interopRequireDefault(require("a"));
function _interopRequireWildcard(obj) { return obj; }
const { a, b: [c] } = o;
export default function () {}
var exports = {};
"#,
    );
    assert_eq!(skip_reason(&out[0]), SkipReason::RequireCall);
    assert_eq!(skip_reason(&out[1]), SkipReason::InteropHelper);
    assert_eq!(skip_reason(&out[2]), SkipReason::InteropHelper);
    assert_eq!(skip_reason(&out[3]), SkipReason::Destructuring);
    match single(&out[3]) {
      Declared::Skip { names, .. } => assert_eq!(names, &vec!["a".to_string(), "c".into()]),
      _ => unreachable!(),
    }
    assert_eq!(skip_reason(&out[4]), SkipReason::AnonymousDefault);
    assert_eq!(skip_reason(&out[5]), SkipReason::ReservedName);
  }

  #[test]
  fn test_redeclaration_is_skipped() {
    let out = classify_all("var a = 1; var a = 2; function f() {} function f() {}");
    assert!(matches!(single(&out[0]), Declared::Rewrite(_)));
    assert_eq!(skip_reason(&out[1]), SkipReason::Synthesized);
    assert!(matches!(single(&out[2]), Declared::Rewrite(_)));
    assert_eq!(skip_reason(&out[3]), SkipReason::Synthesized);
  }

  #[test]
  fn test_export_status() {
    let out = classify_all(
      "export const a = 1; const b = 2; const c = 3; function d() {} export default class E {} export { b, c as cc };",
    );
    let statuses: Vec<_> = out[..5]
      .iter()
      .map(|c| match single(c) {
        Declared::Rewrite(b) => b.export,
        other => panic!("unexpected {:?}", other),
      })
      .collect();
    assert_eq!(statuses, vec![
      ExportStatus::Named,
      ExportStatus::Named,
      ExportStatus::Renamed,
      ExportStatus::Private,
      ExportStatus::Default,
    ]);
    assert!(matches!(out[5], Classified::ExportList));
  }

  #[test]
  fn test_default_function_key() {
    let out = classify_all("export default function foo() {}");
    match single(&out[0]) {
      Declared::Rewrite(b) => {
        assert_eq!(b.namespace_key(), "default");
        assert!(!b.keeps_local());
      }
      other => panic!("unexpected {:?}", other),
    }
  }
}
