use super::classify::Binding;
use super::classify::Shape;
use crate::ast::Arena;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::ast::VarDeclKind;
use crate::scope::ScopeIndex;
use crate::template::FragmentBuilder;
use crate::template::Hole;
use crate::template::TemplateError;

const GETTER: &str = r#"Object.defineProperty(exports, "KEY", { enumerable: true, configurable: true, get: () => LOCAL });"#;
const GETTER_SETTER: &str = r#"Object.defineProperty(exports, "KEY", { enumerable: true, configurable: true, get: () => LOCAL, set: (PARAM) => LOCAL = PARAM });"#;
const ASSIGN: &str = "exports.KEY = VALUE;";
const ALIAS: &str = "exports.EXPORTED = exports.LOCAL;";
const MARKER: &str = r#"Object.defineProperty(exports, "__esModule", { value: true });"#;
const SETTER_PARAM: &str = "newValue";

/// Statements that take the place of one declaration.
#[derive(Debug, Default)]
pub struct Replacement {
  /// Hoisted to the start of the module, after any directives.
  pub prologue: Vec<NodeId>,
  pub stmts: Vec<NodeId>,
}

/// Builds replacement statements through a [`FragmentBuilder`].
pub struct Splitter<'a> {
  builder: &'a mut dyn FragmentBuilder,
  scopes: &'a ScopeIndex,
}

impl<'a> Splitter<'a> {
  pub fn new(builder: &'a mut dyn FragmentBuilder, scopes: &'a ScopeIndex) -> Splitter<'a> {
    Splitter { builder, scopes }
  }

  fn setter_param(&self, local: &str) -> String {
    if local != SETTER_PARAM {
      return SETTER_PARAM.to_string();
    }
    let mut n = 1;
    loop {
      let candidate = format!("{}_{}", SETTER_PARAM, n);
      if !self.scopes.is_name_used(&candidate) {
        return candidate;
      }
      n += 1;
    }
  }

  /// `Object.defineProperty(exports, key, ...)` with a getter returning `local`, and a setter
  /// assigning to it if `writable`.
  pub fn accessor(
    &mut self,
    arena: &mut Arena,
    key: &str,
    local: &str,
    writable: bool,
  ) -> Result<NodeId, TemplateError> {
    if writable {
      let param = self.setter_param(local);
      self.builder.statement(arena, GETTER_SETTER, &[
        ("KEY", Hole::Name(key.to_string())),
        ("LOCAL", Hole::Name(local.to_string())),
        ("PARAM", Hole::Name(param)),
      ])
    } else {
      self.builder.statement(arena, GETTER, &[
        ("KEY", Hole::Name(key.to_string())),
        ("LOCAL", Hole::Name(local.to_string())),
      ])
    }
  }

  pub fn assignment(
    &mut self,
    arena: &mut Arena,
    key: &str,
    value: NodeId,
  ) -> Result<NodeId, TemplateError> {
    self.builder.statement(arena, ASSIGN, &[
      ("KEY", Hole::Name(key.to_string())),
      ("VALUE", Hole::Node(value)),
    ])
  }

  /// `exports.exported = exports.local;`
  pub fn alias(
    &mut self,
    arena: &mut Arena,
    exported: &str,
    local: &str,
  ) -> Result<NodeId, TemplateError> {
    self.builder.statement(arena, ALIAS, &[
      ("EXPORTED", Hole::Name(exported.to_string())),
      ("LOCAL", Hole::Name(local.to_string())),
    ])
  }

  pub fn local(
    &mut self,
    arena: &mut Arena,
    kind: VarDeclKind,
    name: &str,
    init: Option<NodeId>,
  ) -> Result<NodeId, TemplateError> {
    match init {
      Some(init) => self.builder.statement(
        arena,
        &format!("{} LOCAL = VALUE;", kind.as_str()),
        &[
          ("LOCAL", Hole::Name(name.to_string())),
          ("VALUE", Hole::Node(init)),
        ],
      ),
      None => self.builder.statement(arena, &format!("{} LOCAL;", kind.as_str()), &[(
        "LOCAL",
        Hole::Name(name.to_string()),
      )]),
    }
  }

  pub fn marker(&mut self, arena: &mut Arena) -> Result<NodeId, TemplateError> {
    self.builder.statement(arena, MARKER, &[])
  }

  pub fn split(&mut self, arena: &mut Arena, binding: &Binding) -> Result<Replacement, TemplateError> {
    let name = binding.name.as_str();
    let mut out = Replacement::default();
    match binding.shape {
      Shape::ArrowConst { init } => out.stmts.push(self.assignment(arena, name, init)?),
      Shape::Variable { kind, init } => {
        out.stmts.push(self.local(arena, kind, name, init)?);
        out
          .stmts
          .push(self.accessor(arena, name, name, kind.is_mutable())?);
      }
      Shape::FunctionDecl { decl } => {
        out.prologue.push(self.accessor(arena, name, name, true)?);
        out.stmts.push(decl);
      }
      Shape::ClassDecl { decl } => {
        out.stmts.push(decl);
        out.stmts.push(self.accessor(arena, name, name, false)?);
      }
      Shape::ExportedFunction { func } => {
        let value = arena.synth(Syntax::FuncExpr {
          name: Some(name.to_string()),
          func,
        });
        out
          .stmts
          .push(self.local(arena, VarDeclKind::Let, name, Some(value))?);
        out.stmts.push(self.accessor(arena, name, name, true)?);
      }
      Shape::ExportedClass { class } => {
        let value = arena.synth(Syntax::ClassExpr {
          name: Some(name.to_string()),
          class,
        });
        out
          .stmts
          .push(self.local(arena, VarDeclKind::Const, name, Some(value))?);
        out.stmts.push(self.accessor(arena, name, name, false)?);
      }
      Shape::DefaultFunction { func } => {
        let value = arena.synth(Syntax::FuncExpr {
          name: Some(name.to_string()),
          func,
        });
        out.stmts.push(self.assignment(arena, "default", value)?);
      }
      Shape::DefaultClass { decl } => {
        out.stmts.push(decl);
        out.stmts.push(self.accessor(arena, name, name, false)?);
        out.stmts.push(self.accessor(arena, "default", name, false)?);
      }
    };
    Ok(out)
  }
}

#[cfg(test)]
mod tests {
  use super::Splitter;
  use crate::ast::Module;
  use crate::ast::Syntax;
  use crate::emit::emit_module;
  use crate::emit::EmitOptions;
  use crate::parse::parse;
  use crate::scope::analyze;
  use crate::template::TemplateBuilder;

  fn emit_stmts(arena: &crate::ast::Arena, body: Vec<crate::ast::NodeId>) -> String {
    emit_module(&Module::new(arena.clone(), body), EmitOptions::default()).unwrap()
  }

  #[test]
  fn test_accessors() {
    let m = parse("let newValue = 1; newValue_1;").unwrap();
    let scopes = analyze(&m);
    let mut arena = m.arena.clone();
    let mut builder = TemplateBuilder::new();
    let mut splitter = Splitter::new(&mut builder, &scopes);
    let getter = splitter.accessor(&mut arena, "a", "a", false).unwrap();
    let both = splitter.accessor(&mut arena, "b", "b", true).unwrap();
    let clash = splitter
      .accessor(&mut arena, "newValue", "newValue", true)
      .unwrap();
    assert_eq!(
      emit_stmts(&arena, vec![getter, both, clash]),
      concat!(
        "Object.defineProperty(exports, \"a\", { enumerable: true, configurable: true, get: () => a });\n",
        "Object.defineProperty(exports, \"b\", { enumerable: true, configurable: true, get: () => b, set: (newValue) => b = newValue });\n",
        "Object.defineProperty(exports, \"newValue\", { enumerable: true, configurable: true, get: () => newValue, set: (newValue_2) => newValue = newValue_2 });\n",
      )
    );
  }

  #[test]
  fn test_assignment_alias_and_marker() {
    let mut arena = crate::ast::Arena::new();
    let scopes = Default::default();
    let mut builder = TemplateBuilder::new();
    let mut splitter = Splitter::new(&mut builder, &scopes);
    let value = arena.synth(Syntax::LitNum { raw: "1".into() });
    let assign = splitter.assignment(&mut arena, "default", value).unwrap();
    let alias = splitter.alias(&mut arena, "bar", "foo").unwrap();
    let marker = splitter.marker(&mut arena).unwrap();
    assert_eq!(
      emit_stmts(&arena, vec![assign, alias, marker]),
      "exports.default = 1;\nexports.bar = exports.foo;\nObject.defineProperty(exports, \"__esModule\", { value: true });\n"
    );
  }
}
