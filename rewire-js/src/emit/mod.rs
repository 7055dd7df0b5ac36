//! Serializes a [`Module`] back to JavaScript.
//!
//! Output is re-parseable into an equivalent tree: parentheses are inserted
//! where precedence or statement-start ambiguity requires them, and nowhere
//! else. Comments and original formatting are not preserved.

use crate::ast::Arena;
use crate::ast::Module;
use crate::ast::NodeId;
use crate::loc::Loc;
use core::fmt;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

mod emitter;
mod escape;
mod expr;
mod jsx;
mod stmt;

pub use emitter::Emitter;
pub use escape::is_identifier_name;
pub use escape::string_literal;

/// Controls how optional whitespace is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmitMode {
  /// One statement per line, two-space indentation, spaces around operators.
  #[default]
  Pretty,
  /// Only the whitespace required to keep tokens apart.
  Minified,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitOptions {
  pub mode: EmitMode,
}

impl EmitOptions {
  pub fn minified() -> EmitOptions {
    EmitOptions {
      mode: EmitMode::Minified,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmitErrorKind {
  /// A node appeared in a position it can't be written in, e.g. a switch case used as a
  /// statement.
  Unsupported(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitError {
  pub kind: EmitErrorKind,
  /// Source location of the offending node; `None` for synthesized nodes.
  pub loc: Option<Loc>,
}

impl EmitError {
  pub(crate) fn unsupported(message: &'static str, loc: Loc) -> EmitError {
    EmitError {
      kind: EmitErrorKind::Unsupported(message),
      loc: (loc != Loc::SYNTHETIC).then_some(loc),
    }
  }
}

impl Display for EmitError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &self.kind {
      EmitErrorKind::Unsupported(what) => write!(f, "cannot emit {}", what)?,
    };
    if let Some(loc) = self.loc {
      write!(f, " at [{}:{}]", loc.0, loc.1)?;
    }
    Ok(())
  }
}

impl Error for EmitError {}

pub type EmitResult = Result<(), EmitError>;

/// Walks the arena and writes through an [`Emitter`].
pub(crate) struct JsEmitter<'a> {
  arena: &'a Arena,
  out: Emitter,
  // Set while writing a `for (...;` head, where a bare `in` would end the initializer.
  in_disallowed: bool,
}

impl<'a> JsEmitter<'a> {
  fn new(arena: &'a Arena, opts: EmitOptions) -> JsEmitter<'a> {
    JsEmitter {
      arena,
      out: Emitter::new(opts),
      in_disallowed: false,
    }
  }

  fn unsupported(&self, what: &'static str, id: NodeId) -> EmitError {
    EmitError::unsupported(what, self.arena.loc(id))
  }

  /// Writes `items` separated by commas.
  fn comma_separated<T>(
    &mut self,
    items: &[T],
    mut f: impl FnMut(&mut Self, &T) -> EmitResult,
  ) -> EmitResult {
    for (i, item) in items.iter().enumerate() {
      if i > 0 {
        self.out.write_punct(",");
        self.out.write_space();
      }
      f(self, item)?;
    }
    Ok(())
  }
}

pub fn emit_module(module: &Module, opts: EmitOptions) -> Result<String, EmitError> {
  let mut em = JsEmitter::new(&module.arena, opts);
  em.emit_stmts(&module.body)?;
  let mut out = em.out.into_string();
  if opts.mode == EmitMode::Pretty && !out.is_empty() {
    out.push('\n');
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::emit_module;
  use super::EmitErrorKind;
  use super::EmitOptions;
  use crate::ast::Module;
  use crate::ast::Syntax;
  use crate::parse::parse;

  fn pretty(src: &str) -> String {
    emit_module(&parse(src).unwrap(), EmitOptions::default()).unwrap()
  }

  fn minified(src: &str) -> String {
    emit_module(&parse(src).unwrap(), EmitOptions::minified()).unwrap()
  }

  #[test]
  fn test_pretty_statements_and_blocks() {
    assert_eq!(
      pretty("function f(a,b){if(a){return b}else return 1}\nlet x=[1,,2]"),
      "function f(a, b) {\n  if (a) {\n    return b;\n  } else return 1;\n}\nlet x = [1, , 2];\n"
    );
  }

  #[test]
  fn test_minified_output() {
    assert_eq!(
      minified("const a = typeof b === 'x' ? c : d;\nfor (let i = 0; i < n; i++) { f(i); }"),
      r#"const a=typeof b==="x"?c:d;for(let i=0;i<n;i++){f(i);}"#
    );
  }

  #[test]
  fn test_precedence_parentheses() {
    assert_eq!(minified("(a + b) * c;"), "(a+b)*c;");
    assert_eq!(minified("a + (b * c);"), "a+b*c;");
    assert_eq!(minified("a - (b - c);"), "a-(b-c);");
    assert_eq!(minified("(a ** b) ** c;"), "(a**b)**c;");
    assert_eq!(minified("(-a) ** b;"), "(-a)**b;");
    assert_eq!(minified("(a || b) ?? c;"), "(a||b)??c;");
    assert_eq!(minified("a = (b, c);"), "a=(b,c);");
    assert_eq!(minified("new (f())();"), "new(f())();");
    assert_eq!(minified("new Foo;"), "new Foo();");
    assert_eq!(minified("(1).toString();"), "(1).toString();");
  }

  #[test]
  fn test_statement_start_disambiguation() {
    assert_eq!(minified("(function () {})();"), "(function(){}());");
    assert_eq!(minified("({ a } = b);"), "({a}=b);");
    assert_eq!(minified("(class {}).name;"), "(class{}.name);");
    assert_eq!(minified("x = () => ({});"), "x=()=>({});");
    assert_eq!(minified("export default (function () {});"), "export default(function(){});");
  }

  #[test]
  fn test_for_in_initializer() {
    assert_eq!(minified("for (let a = (b in c); ;) {}"), "for(let a=(b in c);;){}");
  }

  #[test]
  fn test_objects_and_classes() {
    assert_eq!(
      pretty("x = {a, b: 1, [c]: 2, get d() { return 1 }, ...e, 'f-g': 3};"),
      "x = { a, b: 1, [c]: 2, get d() {\n  return 1;\n}, ...e, \"f-g\": 3 };\n"
    );
    assert_eq!(
      pretty("class A extends B { static x = 1; #y; static { init() } async *m() {} }"),
      "class A extends B {\n  static x = 1;\n  #y;\n  static {\n    init();\n  }\n  async *m() {}\n}\n"
    );
  }

  #[test]
  fn test_imports_and_exports() {
    assert_eq!(
      pretty(
        "import a, { b as c } from 'm';\nimport * as ns from 'n';\nexport { a as x, c };\nexport * as o from 'o';\nexport default class {}"
      ),
      "import a, { b as c } from \"m\";\nimport * as ns from \"n\";\nexport { a as x, c };\nexport * as o from \"o\";\nexport default class {}\n"
    );
  }

  #[test]
  fn test_jsx() {
    assert_eq!(
      minified("x = <Foo.Bar a=\"1\" b={2} {...c}>hi {d}<br /></Foo.Bar>;"),
      "x=<Foo.Bar a=\"1\" b={2} {...c}>hi {d}<br/></Foo.Bar>;"
    );
    assert_eq!(minified("x = <>a</>;"), "x=<>a</>;");
  }

  #[test]
  fn test_templates_and_regex() {
    assert_eq!(minified("x = tag`a${b}c`; y = /re/g;"), "x=tag`a${b}c`;y=/re/g;");
  }

  #[test]
  fn test_reparse_round_trip() {
    let src = "label: for (const [k, { v = 2 }] of m) { if (!k) continue label; else break; }";
    let once = pretty(src);
    assert_eq!(pretty(&once), once);
  }

  #[test]
  fn test_unsupported_node_position() {
    let mut module = Module::default();
    let case = module.arena.synth(Syntax::SwitchCase {
      test: None,
      body: Vec::new(),
    });
    module.body.push(case);
    let err = emit_module(&module, EmitOptions::default()).unwrap_err();
    assert_eq!(err.kind, EmitErrorKind::Unsupported("switch case outside a switch"));
    assert_eq!(err.loc, None);
  }
}
