use super::parse;
use super::Parser;
use crate::ast::Module;
use crate::ast::NodeId;
use crate::ast::PropKey;
use crate::ast::Syntax;
use crate::ast::VarDeclKind;
use crate::error::SyntaxErrorType;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::operator::BinaryOp;
use crate::token::TT;

fn stmt(m: &Module, i: usize) -> &Syntax {
  m.arena.stx(m.body[i])
}

fn expr_of_stmt(m: &Module, i: usize) -> NodeId {
  match stmt(m, i) {
    Syntax::ExprStmt { expr } => *expr,
    other => panic!("expected expression statement, got {:?}", other),
  }
}

#[test]
fn test_parser_checkpoint() {
  let mut p = Parser::new(Lexer::new("let x = /a/ / 1;"));
  let cp = p.checkpoint();
  let t = p.consume();
  assert_eq!(t.typ, TT::Identifier);
  assert_eq!(p.consume().typ, TT::Identifier);
  p.restore_checkpoint(cp);
  assert!(p.peek_is_word("let"));
  p.consume();
  p.consume();
  p.consume();
  assert_eq!(p.peek_with_mode(LexMode::SlashIsRegex).typ, TT::LiteralRegex);
  assert_eq!(p.peek().typ, TT::Slash);
}

#[test]
fn test_var_decl_with_multiple_declarators() {
  let m = parse("let a = 1, b;").unwrap();
  let Syntax::VarDecl { kind, declarators } = stmt(&m, 0) else {
    panic!("expected VarDecl");
  };
  assert_eq!(*kind, VarDeclKind::Let);
  assert_eq!(declarators.len(), 2);
  assert!(matches!(
    m.arena.stx(declarators[1]),
    Syntax::Declarator { init: None, .. }
  ));
}

#[test]
fn test_binary_precedence() {
  let m = parse("a + b * c;").unwrap();
  let Syntax::Binary { op, right, .. } = m.arena.stx(expr_of_stmt(&m, 0)) else {
    panic!("expected Binary");
  };
  assert_eq!(*op, BinaryOp::Add);
  assert!(matches!(
    m.arena.stx(*right),
    Syntax::Binary {
      op: BinaryOp::Mul,
      ..
    }
  ));
}

#[test]
fn test_exponent_is_right_associative() {
  let m = parse("a ** b ** c;").unwrap();
  let Syntax::Binary { left, right, .. } = m.arena.stx(expr_of_stmt(&m, 0)) else {
    panic!("expected Binary");
  };
  assert!(matches!(m.arena.stx(*left), Syntax::Id { .. }));
  assert!(matches!(m.arena.stx(*right), Syntax::Binary { .. }));
}

#[test]
fn test_arrow_functions() {
  let m = parse("const f = (a, b = 1) => a + b; const g = async x => x; h(a, b);").unwrap();
  let Syntax::VarDecl { declarators, .. } = stmt(&m, 0) else {
    panic!("expected VarDecl");
  };
  let Syntax::Declarator { init: Some(init), .. } = m.arena.stx(declarators[0]) else {
    panic!("expected initializer");
  };
  let Syntax::Arrow {
    is_async, params, ..
  } = m.arena.stx(*init)
  else {
    panic!("expected Arrow");
  };
  assert!(!is_async);
  assert_eq!(params.len(), 2);
  assert!(matches!(
    m.arena.stx(params[1]),
    Syntax::AssignPat { .. }
  ));

  let Syntax::VarDecl { declarators, .. } = stmt(&m, 1) else {
    panic!("expected VarDecl");
  };
  let Syntax::Declarator { init: Some(init), .. } = m.arena.stx(declarators[0]) else {
    panic!("expected initializer");
  };
  assert!(matches!(
    m.arena.stx(*init),
    Syntax::Arrow { is_async: true, .. }
  ));

  assert!(matches!(
    m.arena.stx(expr_of_stmt(&m, 2)),
    Syntax::Call { .. }
  ));
}

#[test]
fn test_parenthesized_expression_is_not_arrow() {
  let m = parse("(a, b);").unwrap();
  assert!(matches!(
    m.arena.stx(expr_of_stmt(&m, 0)),
    Syntax::Seq { .. }
  ));
}

#[test]
fn test_object_literal_members() {
  let m = parse("x = { a, b: 1, [c]: 2, get d() { return 1; }, ...e, f() {} };").unwrap();
  let Syntax::Assign { value, .. } = m.arena.stx(expr_of_stmt(&m, 0)) else {
    panic!("expected Assign");
  };
  let Syntax::Object { members } = m.arena.stx(*value) else {
    panic!("expected Object");
  };
  assert_eq!(members.len(), 6);
  assert!(matches!(
    m.arena.stx(members[0]),
    Syntax::Prop {
      shorthand: true,
      ..
    }
  ));
  assert!(matches!(
    m.arena.stx(members[2]),
    Syntax::Prop {
      key: PropKey::Computed { .. },
      ..
    }
  ));
  assert!(matches!(m.arena.stx(members[4]), Syntax::Spread { .. }));
}

#[test]
fn test_class_members() {
  let m = parse("class A extends B { static x = 1; #y; get z() { return 1; } static { init(); } }")
    .unwrap();
  let Syntax::ClassDecl {
    name: Some(name),
    class,
  } = stmt(&m, 0)
  else {
    panic!("expected ClassDecl");
  };
  assert_eq!(name, "A");
  let Syntax::Class { extends, members } = m.arena.stx(*class) else {
    panic!("expected Class");
  };
  assert!(extends.is_some());
  assert_eq!(members.len(), 4);
  assert!(matches!(
    m.arena.stx(members[0]),
    Syntax::ClassField {
      is_static: true,
      ..
    }
  ));
  assert!(matches!(
    m.arena.stx(members[1]),
    Syntax::ClassField {
      key: PropKey::Private { .. },
      ..
    }
  ));
  assert!(matches!(
    m.arena.stx(members[3]),
    Syntax::StaticBlock { .. }
  ));
}

#[test]
fn test_new_without_arguments_and_member_chain() {
  let m = parse("new Foo.Bar;").unwrap();
  let Syntax::New { callee, args } = m.arena.stx(expr_of_stmt(&m, 0)) else {
    panic!("expected New");
  };
  assert!(args.is_empty());
  assert!(matches!(m.arena.stx(*callee), Syntax::Member { .. }));
}

#[test]
fn test_jsx_element() {
  let m = parse("x = <Foo bar=\"1\" baz={2}>text {value}<span /></Foo>;").unwrap();
  let Syntax::Assign { value, .. } = m.arena.stx(expr_of_stmt(&m, 0)) else {
    panic!("expected Assign");
  };
  let Syntax::JsxElem {
    name: Some(name),
    attrs,
    children,
    ..
  } = m.arena.stx(*value)
  else {
    panic!("expected JsxElem");
  };
  assert!(matches!(m.arena.stx(*name), Syntax::JsxTagName { name } if name == "Foo"));
  assert_eq!(attrs.len(), 2);
  assert_eq!(children.len(), 3);
}

#[test]
fn test_jsx_closing_tag_mismatch() {
  let err = parse("x = <Foo></Bar>;").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::JsxClosingTagMismatch);
}

#[test]
fn test_template_literal() {
  let m = parse("x = `a${b}c${d}e`;").unwrap();
  let Syntax::Assign { value, .. } = m.arena.stx(expr_of_stmt(&m, 0)) else {
    panic!("expected Assign");
  };
  let Syntax::Template { parts, exprs } = m.arena.stx(*value) else {
    panic!("expected Template");
  };
  assert_eq!(parts, &vec!["a".to_string(), "c".into(), "e".into()]);
  assert_eq!(exprs.len(), 2);
}

#[test]
fn test_for_of_and_for_in() {
  let m = parse("for (const x of xs) {} for (k in o) {} for (let i = 0; i < n; i++) {}").unwrap();
  assert!(matches!(stmt(&m, 0), Syntax::ForIn { of: true, .. }));
  assert!(matches!(stmt(&m, 1), Syntax::ForIn { of: false, .. }));
  assert!(matches!(stmt(&m, 2), Syntax::For { .. }));
}

#[test]
fn test_asi_and_restricted_return() {
  let m = parse("function f() {\n  return\n  1\n}\nlet a = 1\nlet b = 2").unwrap();
  assert_eq!(m.body.len(), 3);
  let Syntax::FuncDecl { func, .. } = stmt(&m, 0) else {
    panic!("expected FuncDecl");
  };
  let Syntax::Function { body, .. } = m.arena.stx(*func) else {
    panic!("expected Function");
  };
  let Syntax::Block { body } = m.arena.stx(*body) else {
    panic!("expected Block");
  };
  assert_eq!(body.len(), 2);
  assert!(matches!(m.arena.stx(body[0]), Syntax::Return { arg: None }));
}

#[test]
fn test_import_and_export_forms() {
  let m = parse(
    r#"
import a, { b as c } from "m";
import * as ns from "n";
import "side";
export { a as x, c };
export * from "o";
export default function () {}
export const y = 1;
"#,
  )
  .unwrap();
  assert_eq!(m.body.len(), 7);
  let Syntax::Import {
    default, names, ..
  } = stmt(&m, 0)
  else {
    panic!("expected Import");
  };
  assert_eq!(default.as_deref(), Some("a"));
  assert_eq!(names[0].local, "c");
  assert!(matches!(
    stmt(&m, 1),
    Syntax::Import {
      namespace: Some(_),
      ..
    }
  ));
  assert!(matches!(stmt(&m, 3), Syntax::ExportList { from: None, .. }));
  assert!(matches!(stmt(&m, 4), Syntax::ExportAll { .. }));
  let Syntax::ExportDefaultDecl { decl } = stmt(&m, 5) else {
    panic!("expected ExportDefaultDecl");
  };
  assert!(matches!(
    m.arena.stx(*decl),
    Syntax::FuncDecl { name: None, .. }
  ));
  assert!(matches!(stmt(&m, 6), Syntax::ExportDecl { .. }));
}

#[test]
fn test_invalid_assignment_target() {
  let err = parse("a + b = c;").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::InvalidAssigmentTarget);
}

#[test]
fn test_try_requires_handler() {
  let err = parse("try {}").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::TryStatementHasNoCatchOrFinally);
}

#[test]
fn test_unexpected_end() {
  let err = parse("let a = ").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::UnexpectedEnd);
}

#[test]
fn test_unterminated_string() {
  let err = parse("let a = \"abc").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::UnterminatedLiteral);
}

#[test]
fn test_top_level_await() {
  let m = parse("await x;").unwrap();
  assert!(matches!(
    m.arena.stx(expr_of_stmt(&m, 0)),
    Syntax::Await { .. }
  ));
}
