//! Lexical scope analysis over a parsed [`Module`].
//!
//! [`analyze`] builds a scope tree for the module and resolves every identifier expression, JSX
//! component tag and export specifier label to its nearest enclosing declaration. Only bindings
//! declared in the module scope are kept in the resulting [`ScopeIndex`], together with every
//! site that refers to them; inner bindings are tracked during analysis purely so that shadowing
//! is respected.
//!
//! ## Scopes
//!
//! - [`ScopeKind::Module`]: the module top level; `var` and function declarations hoist here.
//! - [`ScopeKind::NonArrowFunction`] / [`ScopeKind::ArrowFunction`]: parameters and the body of a
//!   function share one scope, which is also the `var` scope for everything inside it.
//! - [`ScopeKind::StaticBlock`]: class static blocks, which have their own `var` scope.
//! - [`ScopeKind::Block`]: blocks, `for` heads, `catch` clauses and `switch` bodies.
//! - [`ScopeKind::FunctionExpressionName`] / [`ScopeKind::ClassExpressionName`]: the dedicated
//!   scope holding a named function or class expression's own name.
//!
//! Declarations of a scope are collected when it is entered, before any of its references are
//! resolved, so a reference that precedes its declaration in source order still resolves to it.
//! Function declarations bind their name in the enclosing scope. Class declarations bind only in
//! the enclosing scope; references to the class name from inside its body resolve there too.
use crate::ast::Arena;
use crate::ast::Module;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::ast::VarDeclKind;
use crate::ast::walk::children;
use crate::operator::UnaryOp;
use crate::rewrite::NAMESPACE;
use ahash::HashMap;
use ahash::HashMapExt;
use ahash::HashSet;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScopeKind {
  Module,
  NonArrowFunction,
  ArrowFunction,
  StaticBlock,
  Block,
  FunctionExpressionName,
  ClassExpressionName,
}

impl ScopeKind {
  fn is_var_scope(self) -> bool {
    matches!(
      self,
      ScopeKind::Module
        | ScopeKind::NonArrowFunction
        | ScopeKind::ArrowFunction
        | ScopeKind::StaticBlock
    )
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeclKind {
  /// A `var` declared directly by a top-level statement.
  Var,
  /// A `var` declared inside a nested statement (block, loop head, ...) that hoists to the module.
  NestedVar,
  Let,
  Const,
  Function,
  Class,
  Import,
  Param,
  CatchParam,
  /// The own name of a named function or class expression.
  SelfName,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RefKind {
  /// An identifier expression, including assignment and update targets and the value of a
  /// shorthand property.
  Identifier,
  /// A JSX component tag, or the base identifier of a JSX member tag.
  JsxTag,
  /// The local name of an `export { local as exported }` specifier. The node is the specifier.
  ExportLabel,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RefSite {
  pub node: NodeId,
  pub kind: RefKind,
  /// Whether `exports` is declared in a scope enclosing the site, so `exports.<name>` written
  /// there wouldn't reach the module namespace object.
  pub namespace_shadowed: bool,
}

#[derive(Clone, Debug)]
pub struct BindingInfo {
  pub name: String,
  pub kind: DeclKind,
  /// The node that introduced the binding.
  pub decl: NodeId,
  /// Reference sites in traversal (source) order.
  pub refs: Vec<RefSite>,
}

/// Module scope bindings and their references.
#[derive(Clone, Debug, Default)]
pub struct ScopeIndex {
  bindings: Vec<BindingInfo>,
  by_name: HashMap<String, usize>,
  // Every name declared in any scope or referenced anywhere.
  names: HashSet<String>,
}

impl ScopeIndex {
  pub fn binding(&self, name: &str) -> Option<&BindingInfo> {
    self.by_name.get(name).map(|&i| &self.bindings[i])
  }

  /// Module scope bindings in declaration order.
  pub fn bindings(&self) -> impl Iterator<Item = &BindingInfo> {
    self.bindings.iter()
  }

  pub fn refs(&self, name: &str) -> &[RefSite] {
    self.binding(name).map_or(&[], |b| b.refs.as_slice())
  }

  /// Whether `name` is declared in any scope or referenced anywhere in the module, e.g. to pick a
  /// fresh name that can't capture or shadow anything.
  pub fn is_name_used(&self, name: &str) -> bool {
    self.names.contains(name)
  }

}

struct ScopeData {
  parent: Option<ScopeId>,
  kind: ScopeKind,
  symbols: HashMap<String, DeclKind>,
}

struct Analyzer<'a> {
  arena: &'a Arena,
  scopes: Vec<ScopeData>,
  index: ScopeIndex,
}

fn starts_lowercase(name: &str) -> bool {
  name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

impl<'a> Analyzer<'a> {
  fn new_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
    let id = ScopeId(self.scopes.len() as u32);
    self.scopes.push(ScopeData {
      parent,
      kind,
      symbols: HashMap::new(),
    });
    id
  }

  fn scope(&self, id: ScopeId) -> &ScopeData {
    &self.scopes[id.0 as usize]
  }

  fn declare(&mut self, scope: ScopeId, name: &str, kind: DeclKind, decl: NodeId) {
    self.index.names.insert(name.to_string());
    let data = &mut self.scopes[scope.0 as usize];
    if data.symbols.contains_key(name) {
      // Redeclaration (e.g. `var a; var a;`) refers to the first binding.
      return;
    }
    data.symbols.insert(name.to_string(), kind);
    if data.kind == ScopeKind::Module {
      self.index.by_name.insert(name.to_string(), self.index.bindings.len());
      self.index.bindings.push(BindingInfo {
        name: name.to_string(),
        kind,
        decl,
        refs: Vec::new(),
      });
    }
  }

  fn declare_pattern(&mut self, scope: ScopeId, pat: NodeId, kind: DeclKind) {
    let arena = self.arena;
    match arena.stx(pat) {
      Syntax::IdPat { name } => self.declare(scope, name, kind, pat),
      Syntax::ArrayPat { elements } => {
        for &e in elements.iter().flatten() {
          self.declare_pattern(scope, e, kind);
        }
      }
      Syntax::ObjPat { props } => {
        for &p in props {
          self.declare_pattern(scope, p, kind);
        }
      }
      Syntax::ObjPatProp { target, .. }
      | Syntax::AssignPat { target, .. }
      | Syntax::RestPat { target } => self.declare_pattern(scope, *target, kind),
      _ => {}
    }
  }

  fn resolve(&mut self, mut scope: ScopeId, name: &str, node: NodeId, kind: RefKind) {
    self.index.names.insert(name.to_string());
    let mut namespace_shadowed = false;
    loop {
      let data = self.scope(scope);
      namespace_shadowed |= data.symbols.contains_key(NAMESPACE);
      if data.symbols.contains_key(name) {
        if data.kind == ScopeKind::Module {
          if let Some(&i) = self.index.by_name.get(name) {
            self.index.bindings[i].refs.push(RefSite {
              node,
              kind,
              namespace_shadowed,
            });
          }
        }
        return;
      }
      match data.parent {
        Some(parent) => scope = parent,
        // Unresolved, i.e. a global.
        None => return,
      }
    }
  }

  // Collects `var` declarations of a var scope, descending into nested statements but not into
  // functions or classes.
  fn hoist_vars(&mut self, scope: ScopeId, stmt: NodeId, top_level: bool) {
    let arena = self.arena;
    match arena.stx(stmt) {
      Syntax::VarDecl {
        kind: VarDeclKind::Var,
        declarators,
      } => {
        let kind = if top_level {
          DeclKind::Var
        } else {
          DeclKind::NestedVar
        };
        for &d in declarators {
          if let Syntax::Declarator { pat, .. } = arena.stx(d) {
            self.declare_pattern(scope, *pat, kind);
          }
        }
      }
      Syntax::ExportDecl { decl } => self.hoist_vars(scope, *decl, top_level),
      Syntax::Block { .. }
      | Syntax::If { .. }
      | Syntax::For { .. }
      | Syntax::ForIn { .. }
      | Syntax::While { .. }
      | Syntax::DoWhile { .. }
      | Syntax::Try { .. }
      | Syntax::Catch { .. }
      | Syntax::Labeled { .. }
      | Syntax::Switch { .. }
      | Syntax::SwitchCase { .. } => {
        for child in children(arena.stx(stmt)) {
          self.hoist_vars(scope, child, false);
        }
      }
      _ => {}
    }
  }

  // Collects the lexical declarations made directly by `stmts` in `scope`.
  fn declare_lexical(&mut self, scope: ScopeId, stmts: &[NodeId]) {
    let arena = self.arena;
    for &stmt in stmts {
      let decl = match arena.stx(stmt) {
        Syntax::ExportDecl { decl } | Syntax::ExportDefaultDecl { decl } => *decl,
        _ => stmt,
      };
      match arena.stx(decl) {
        Syntax::VarDecl { kind, declarators } if *kind != VarDeclKind::Var => {
          let kind = if *kind == VarDeclKind::Let {
            DeclKind::Let
          } else {
            DeclKind::Const
          };
          for &d in declarators {
            if let Syntax::Declarator { pat, .. } = arena.stx(d) {
              self.declare_pattern(scope, *pat, kind);
            }
          }
        }
        Syntax::FuncDecl {
          name: Some(name), ..
        } => self.declare(scope, name, DeclKind::Function, decl),
        Syntax::ClassDecl {
          name: Some(name), ..
        } => self.declare(scope, name, DeclKind::Class, decl),
        Syntax::Import {
          default,
          namespace,
          names,
          ..
        } => {
          for local in default
            .iter()
            .chain(namespace.iter())
            .chain(names.iter().map(|n| &n.local))
          {
            self.declare(scope, local, DeclKind::Import, decl);
          }
        }
        _ => {}
      }
    }
  }

  // Enters a var scope whose body is `stmts`, after `params` have been declared.
  fn visit_var_scope_body(&mut self, scope: ScopeId, stmts: &[NodeId]) {
    let kind = self.scope(scope).kind;
    debug_assert!(kind.is_var_scope());
    for &s in stmts {
      self.hoist_vars(scope, s, kind == ScopeKind::Module);
    }
    self.declare_lexical(scope, stmts);
    for &s in stmts {
      self.visit(scope, s);
    }
  }

  fn visit_function(&mut self, scope: ScopeId, kind: ScopeKind, params: &[NodeId], body: NodeId) {
    let inner = self.new_scope(Some(scope), kind);
    for &p in params {
      self.declare_pattern(inner, p, DeclKind::Param);
    }
    for &p in params {
      self.visit(inner, p);
    }
    let arena = self.arena;
    match arena.stx(body) {
      Syntax::Block { body } => self.visit_var_scope_body(inner, body),
      _ => self.visit(inner, body),
    }
  }

  fn visit_jsx_tag(&mut self, scope: ScopeId, tag: NodeId, is_member_base: bool) {
    let arena = self.arena;
    match arena.stx(tag) {
      Syntax::JsxTagName { name } => {
        let is_component = is_member_base || !starts_lowercase(name);
        if is_component && !name.contains([':', '-']) {
          self.resolve(scope, name, tag, RefKind::JsxTag);
        }
      }
      Syntax::JsxTagMember { object, .. } => self.visit_jsx_tag(scope, *object, true),
      _ => self.visit(scope, tag),
    }
  }

  fn visit(&mut self, scope: ScopeId, id: NodeId) {
    let arena = self.arena;
    match arena.stx(id) {
      Syntax::Id { name } => self.resolve(scope, name, id, RefKind::Identifier),
      // Not a reference: `delete exports.x` would remove the accessor.
      Syntax::Unary {
        op: UnaryOp::Delete,
        arg,
      } => match arena.stx(*arg) {
        Syntax::Id { name } => {
          self.index.names.insert(name.clone());
        }
        _ => self.visit(scope, *arg),
      },
      Syntax::Function { params, body, .. } => {
        self.visit_function(scope, ScopeKind::NonArrowFunction, params, *body)
      }
      Syntax::Arrow { params, body, .. } => {
        self.visit_function(scope, ScopeKind::ArrowFunction, params, *body)
      }
      Syntax::FuncExpr {
        name: Some(name),
        func,
      } => {
        let inner = self.new_scope(Some(scope), ScopeKind::FunctionExpressionName);
        self.declare(inner, name, DeclKind::SelfName, id);
        self.visit(inner, *func);
      }
      Syntax::ClassExpr {
        name: Some(name),
        class,
      } => {
        let inner = self.new_scope(Some(scope), ScopeKind::ClassExpressionName);
        self.declare(inner, name, DeclKind::SelfName, id);
        self.visit(inner, *class);
      }
      Syntax::StaticBlock { body } => {
        let inner = self.new_scope(Some(scope), ScopeKind::StaticBlock);
        self.visit_var_scope_body(inner, body);
      }
      Syntax::Block { body } => {
        let inner = self.new_scope(Some(scope), ScopeKind::Block);
        self.declare_lexical(inner, body);
        for &s in body {
          self.visit(inner, s);
        }
      }
      Syntax::For { .. } | Syntax::ForIn { .. } => {
        let init = match arena.stx(id) {
          Syntax::For { init, .. } => *init,
          Syntax::ForIn { left, .. } => Some(*left),
          _ => None,
        };
        let inner = self.new_scope(Some(scope), ScopeKind::Block);
        if let Some(init) = init {
          self.declare_lexical(inner, &[init]);
        }
        for child in children(arena.stx(id)) {
          self.visit(inner, child);
        }
      }
      Syntax::Catch { param, body } => {
        let inner = self.new_scope(Some(scope), ScopeKind::Block);
        if let Some(param) = param {
          self.declare_pattern(inner, *param, DeclKind::CatchParam);
          self.visit(inner, *param);
        }
        self.visit(inner, *body);
      }
      Syntax::Switch {
        discriminant,
        cases,
      } => {
        self.visit(scope, *discriminant);
        let inner = self.new_scope(Some(scope), ScopeKind::Block);
        for &case in cases {
          if let Syntax::SwitchCase { body, .. } = arena.stx(case) {
            self.declare_lexical(inner, body);
          }
        }
        for &case in cases {
          self.visit(inner, case);
        }
      }
      Syntax::JsxElem {
        name,
        attrs,
        children,
        ..
      } => {
        if let Some(name) = name {
          self.visit_jsx_tag(scope, *name, false);
        }
        for &c in attrs.iter().chain(children.iter()) {
          self.visit(scope, c);
        }
      }
      Syntax::ExportList {
        specifiers,
        from: None,
      } => {
        for &s in specifiers {
          if let Syntax::ExportSpecifier { local, .. } = arena.stx(s) {
            self.resolve(scope, local, s, RefKind::ExportLabel);
          }
        }
      }
      Syntax::ExportList { from: Some(_), .. } | Syntax::ExportAll { .. } => {}
      stx => {
        for child in children(stx) {
          self.visit(scope, child);
        }
      }
    }
  }
}

/// Builds the scope tree for `module` and resolves all references to module scope bindings.
pub fn analyze(module: &Module) -> ScopeIndex {
  let mut analyzer = Analyzer {
    arena: &module.arena,
    scopes: Vec::new(),
    index: ScopeIndex::default(),
  };
  let root = analyzer.new_scope(None, ScopeKind::Module);
  analyzer.visit_var_scope_body(root, &module.body);
  analyzer.index
}

#[cfg(test)]
mod tests {
  use super::analyze;
  use super::DeclKind;
  use super::RefKind;
  use crate::parse::parse;

  #[test]
  fn test_module_bindings_and_refs() {
    let m = parse("const a = 1; function f() { return a + b; } f(a);").unwrap();
    let index = analyze(&m);
    let a = index.binding("a").unwrap();
    assert_eq!(a.kind, DeclKind::Const);
    assert_eq!(a.refs.len(), 2);
    assert_eq!(index.binding("f").unwrap().kind, DeclKind::Function);
    assert_eq!(index.refs("f").len(), 1);
    // Globals aren't bindings.
    assert!(index.binding("b").is_none());
    assert!(index.is_name_used("b"));
  }

  #[test]
  fn test_shadowing_is_respected() {
    let m = parse(
      "let x = 1; function g(x) { return x; } function h() { let x = 2; { x; } } const k = (x) => x; x;",
    )
    .unwrap();
    let index = analyze(&m);
    assert_eq!(index.refs("x").len(), 1);
  }

  #[test]
  fn test_hoisted_references_resolve() {
    let m = parse("f(); function f() {} g(); var g = 1;").unwrap();
    let index = analyze(&m);
    assert_eq!(index.refs("f").len(), 1);
    assert_eq!(index.refs("g").len(), 1);
    assert_eq!(index.binding("g").unwrap().kind, DeclKind::Var);
  }

  #[test]
  fn test_nested_var_hoists_to_module() {
    let m = parse("if (a) { var v = 1; } v;").unwrap();
    let index = analyze(&m);
    assert_eq!(index.binding("v").unwrap().kind, DeclKind::NestedVar);
    assert_eq!(index.refs("v").len(), 1);
  }

  #[test]
  fn test_function_expression_name_has_own_scope() {
    let m = parse("const fact = function fact(n) { return fact(n - 1); }; fact(1);").unwrap();
    let index = analyze(&m);
    // Only the outer call refers to the module binding.
    assert_eq!(index.refs("fact").len(), 1);
  }

  #[test]
  fn test_class_name_inside_body_resolves_to_declaration() {
    let m = parse("class Foo { static make() { return new Foo(); } }").unwrap();
    let index = analyze(&m);
    assert_eq!(index.refs("Foo").len(), 1);
  }

  #[test]
  fn test_jsx_and_export_label_refs() {
    let m = parse("const Foo = 1; const ns = {}; <Foo><div /><ns.Item /></Foo>; export { Foo as Bar };")
      .unwrap();
    let index = analyze(&m);
    let kinds: Vec<_> = index.refs("Foo").iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![RefKind::JsxTag, RefKind::ExportLabel]);
    assert_eq!(index.refs("ns")[0].kind, RefKind::JsxTag);
  }

  #[test]
  fn test_namespace_shadowing_is_recorded() {
    let m = parse("const a = 1; a; function f(exports) { return a; } { let exports; a; }").unwrap();
    let index = analyze(&m);
    let shadowed: Vec<_> = index.refs("a").iter().map(|r| r.namespace_shadowed).collect();
    assert_eq!(shadowed, vec![false, true, true]);
    let names: Vec<_> = index.bindings().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["a", "f"]);
  }

  #[test]
  fn test_delete_operand_is_not_a_reference() {
    let m = parse("let x = 1; delete x; delete x.y;").unwrap();
    let index = analyze(&m);
    assert_eq!(index.refs("x").len(), 1);
  }

  #[test]
  fn test_imports_are_bindings() {
    let m = parse("import a, { b as c } from \"m\"; c(a);").unwrap();
    let index = analyze(&m);
    assert_eq!(index.binding("c").unwrap().kind, DeclKind::Import);
    assert_eq!(index.refs("a").len(), 1);
    assert!(index.binding("b").is_none());
  }
}
