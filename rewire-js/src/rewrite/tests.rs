use super::rewrite_module;
use super::rewrite_module_with;
use super::RewireOptions;
use super::RewriteReport;
use super::SkipReason;
use crate::ast::Arena;
use crate::ast::NodeId;
use crate::emit::emit_module;
use crate::emit::EmitOptions;
use crate::err::RewireError;
use crate::parse::parse;
use crate::scope::analyze;
use crate::template::FragmentBuilder;
use crate::template::Hole;
use crate::template::TemplateBuilder;
use crate::template::TemplateError;

fn rewrite_with(src: &str, options: &RewireOptions) -> (String, RewriteReport) {
  let mut module = parse(src).unwrap();
  let report = rewrite_module(&mut module, options).unwrap();
  (emit_module(&module, EmitOptions::default()).unwrap(), report)
}

fn rewrite(src: &str) -> (String, RewriteReport) {
  rewrite_with(src, &RewireOptions::default().with_module_marker(false))
}

#[test]
fn test_report_lists_decisions_in_source_order() {
  let (out, report) = rewrite(
    r#"
"use strict";
var fs = require("fs");
const a = 1, { b } = o, c = () => a;
function f() { return c(); }
export default function () {}
"#,
  );
  assert_eq!(report.rewritten, vec!["a", "c", "f"]);
  assert_eq!(report.skipped, vec![
    ("fs".to_string(), SkipReason::RequireCall),
    ("b".to_string(), SkipReason::Destructuring),
    ("default".to_string(), SkipReason::AnonymousDefault),
  ]);
  assert!(!report.marker_emitted);
  assert_eq!(
    out,
    r#""use strict";
Object.defineProperty(exports, "f", { enumerable: true, configurable: true, get: () => f, set: (newValue) => f = newValue });
var fs = require("fs");
const a = 1;
Object.defineProperty(exports, "a", { enumerable: true, configurable: true, get: () => a });
const { b } = o;
exports.c = () => exports.a;
function f() {
  return exports.c();
}
export default function () {}
"#
  );
}

#[test]
fn test_exported_destructuring_keeps_export() {
  let (out, _) = rewrite("export let x = 1, [y] = z;");
  assert_eq!(
    out,
    r#"let x = 1;
Object.defineProperty(exports, "x", { enumerable: true, configurable: true, get: () => x, set: (newValue) => x = newValue });
export let [y] = z;
"#
  );
}

#[test]
fn test_untouched_statement_keeps_identity() {
  let mut module = parse("var a = require('a'); a.b();").unwrap();
  let before = module.body.clone();
  let report = rewrite_module(
    &mut module,
    &RewireOptions::default().with_module_marker(false),
  )
  .unwrap();
  assert!(report.rewritten.is_empty());
  assert_eq!(module.body, before);
}

#[test]
fn test_custom_test_primitives() {
  let options = RewireOptions::default().with_test_primitives(["suite", "test"]);
  let (out, report) = rewrite_with("const a = 1; test('a', () => a);", &options);
  assert!(report.skipped_test_module);
  assert!(!report.marker_emitted);
  assert_eq!(out, "const a = 1;\ntest(\"a\", () => a);\n");

  // `describe` is no longer a test primitive.
  let (_, report) = rewrite_with("describe('a', () => {});", &options);
  assert!(!report.skipped_test_module);
  assert!(report.marker_emitted);
}

#[test]
fn test_export_list_of_default_function_uses_default_property() {
  let (out, _) = rewrite("export default function foo() {} export { foo, foo as bar };");
  assert_eq!(
    out,
    "exports.default = function foo() {};\nexports.foo = exports.default;\nexports.bar = exports.default;\n"
  );
}

// Counts fragments and defers to the template builder.
struct Counting {
  inner: TemplateBuilder,
  calls: usize,
}

impl FragmentBuilder for Counting {
  fn statements(
    &mut self,
    arena: &mut Arena,
    text: &str,
    holes: &[(&str, Hole)],
  ) -> Result<Vec<NodeId>, TemplateError> {
    self.calls += 1;
    self.inner.statements(arena, text, holes)
  }
}

#[test]
fn test_injected_fragment_builder() {
  let mut module = parse("let a = 1; class B {}").unwrap();
  let scopes = analyze(&module);
  let mut builder = Counting {
    inner: TemplateBuilder::new(),
    calls: 0,
  };
  let report =
    rewrite_module_with(&mut module, &RewireOptions::default(), &scopes, &mut builder).unwrap();
  assert_eq!(report.rewritten, vec!["a", "B"]);
  // Local and accessor for `a`, accessor for `B`, and the marker.
  assert_eq!(builder.calls, 4);
}

struct Failing;

impl FragmentBuilder for Failing {
  fn statements(
    &mut self,
    _arena: &mut Arena,
    _text: &str,
    holes: &[(&str, Hole)],
  ) -> Result<Vec<NodeId>, TemplateError> {
    Err(TemplateError::UnusedHole(holes[0].0.to_string()))
  }
}

#[test]
fn test_fragment_errors_propagate() {
  let mut module = parse("let a = 1;").unwrap();
  let scopes = analyze(&module);
  let err = rewrite_module_with(&mut module, &RewireOptions::default(), &scopes, &mut Failing)
    .unwrap_err();
  assert!(matches!(err, RewireError::Template(TemplateError::UnusedHole(ref hole)) if hole == "LOCAL"));
}

// Defers to the template builder until `fail_at` fragments have been requested.
struct FailingAt {
  inner: TemplateBuilder,
  calls: usize,
  fail_at: usize,
}

impl FragmentBuilder for FailingAt {
  fn statements(
    &mut self,
    arena: &mut Arena,
    text: &str,
    holes: &[(&str, Hole)],
  ) -> Result<Vec<NodeId>, TemplateError> {
    self.calls += 1;
    if self.calls == self.fail_at {
      return Err(TemplateError::UnusedHole(holes[0].0.to_string()));
    }
    self.inner.statements(arena, text, holes)
  }
}

#[test]
fn test_failed_rewrite_leaves_module_unchanged() {
  for fail_at in 1..=3 {
    let mut module = parse("let a = 1; a; function f() { return a; }").unwrap();
    let before = emit_module(&module, EmitOptions::default()).unwrap();
    let arena_len = module.arena.len();
    let scopes = analyze(&module);
    let mut builder = FailingAt {
      inner: TemplateBuilder::new(),
      calls: 0,
      fail_at,
    };
    assert!(rewrite_module_with(&mut module, &RewireOptions::default(), &scopes, &mut builder).is_err());
    assert_eq!(emit_module(&module, EmitOptions::default()).unwrap(), before);
    assert_eq!(module.arena.len(), arena_len);
  }
}

#[test]
fn test_bindings_read_under_shadowed_exports_are_kept() {
  let (out, report) = rewrite(
    "const msg = 1;\nconst other = 2;\nfunction f(exports) {\n  return msg + other;\n}\nother;\n",
  );
  assert_eq!(report.skipped, vec![
    ("msg".to_string(), SkipReason::NamespaceShadowed),
    ("other".to_string(), SkipReason::NamespaceShadowed),
  ]);
  assert_eq!(report.rewritten, vec!["f"]);
  assert_eq!(
    out,
    r#"Object.defineProperty(exports, "f", { enumerable: true, configurable: true, get: () => f, set: (newValue) => f = newValue });
const msg = 1;
const other = 2;
function f(exports) {
  return msg + other;
}
other;
"#
  );
}
