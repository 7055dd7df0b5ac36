use rewire_js::emit::emit_module;
use rewire_js::emit::EmitOptions;
use rewire_js::parse::parse;
use rewire_js::rewire;
use rewire_js::rewrite::rewrite_module;
use rewire_js::rewrite::SkipReason;
use rewire_js::RewireOptions;

const MARKER: &str = "Object.defineProperty(exports, \"__esModule\", { value: true });\n";

fn rewire_str(src: &str) -> String {
  rewire(src.as_bytes(), &RewireOptions::default()).unwrap()
}

fn without_marker(src: &str) -> String {
  rewire(
    src.as_bytes(),
    &RewireOptions::default().with_module_marker(false),
  )
  .unwrap()
}

fn getter(name: &str) -> String {
  format!(
    "Object.defineProperty(exports, \"{0}\", {{ enumerable: true, configurable: true, get: () => {0} }});\n",
    name
  )
}

fn getter_setter(name: &str) -> String {
  format!(
    "Object.defineProperty(exports, \"{0}\", {{ enumerable: true, configurable: true, get: () => {0}, set: (newValue) => {0} = newValue }});\n",
    name
  )
}

fn reformat(src: &str) -> String {
  emit_module(&parse(src).unwrap(), EmitOptions::default()).unwrap()
}

#[test]
fn rewriting_twice_changes_nothing() {
  let inputs = [
    r#"const msg = "hello"; console.log(msg);"#,
    "const foo = () => 1; foo();",
    "export function foo() { return 1; } foo();",
    "export default function foo() { return foo; }",
    "export default class Foo {} new Foo();",
    "export class Bar {} let b = new Bar(), c;",
    "import a from \"m\"; const b = 1; export { a as x, b as y };",
    "const { a } = o; var n = require(\"n\"); foo(); function foo() {}",
    "\"use strict\"; const App = () => <Foo />; class Foo {}",
    "export default function () {}",
  ];
  for input in inputs {
    let once = rewire_str(input);
    let twice = rewire_str(&once);
    assert_eq!(twice, once, "rewriting the output of {:?} again changed it", input);
  }
}

#[test]
fn marker_is_appended_once_and_last() {
  let out = rewire_str("let a = 1; export { a as b }; export default function () {}");
  assert_eq!(out.matches("__esModule").count(), 1);
  assert!(out.ends_with(MARKER));

  assert_eq!(rewire_str(""), MARKER);

  let existing = "Object.defineProperty(exports, \"__esModule\", { value: true });\nvar a = 1;\n";
  let out = rewire_str(existing);
  assert_eq!(out.matches("__esModule").count(), 1);
  assert!(out.starts_with(MARKER));
}

#[test]
fn test_modules_are_left_alone() {
  let src = "const a = 1;\ndescribe(\"a\", () => {\n  it(\"works\", () => a);\n});\n";
  assert_eq!(rewire_str(src), src);

  let mut module = parse("describe.each([1, 2])(\"n\", (n) => {});").unwrap();
  let report = rewrite_module(&mut module, &RewireOptions::default()).unwrap();
  assert!(report.skipped_test_module);
  assert!(!report.marker_emitted);
  assert!(report.rewritten.is_empty());
}

#[test]
fn jsx_tags_become_member_tags() {
  assert_eq!(
    without_marker("const Foo = () => <div />;\nexport const App = () => <Foo><Foo.Item /></Foo>;"),
    "exports.Foo = () => <div />;\nexports.App = () => <exports.Foo><exports.Foo.Item /></exports.Foo>;\n"
  );
}

#[test]
fn construction_goes_through_namespace() {
  assert_eq!(
    without_marker("class Foo { static create() { return new Foo(); } } const foo = new Foo();"),
    format!(
      "class Foo {{\n  static create() {{\n    return new exports.Foo();\n  }}\n}}\n{}const foo = new exports.Foo();\n{}",
      getter("Foo"),
      getter("foo")
    )
  );
}

#[test]
fn multiple_declarators_are_split_in_order() {
  assert_eq!(
    without_marker("let a = 1, b = a + 1; var c;"),
    format!(
      "let a = 1;\n{}let b = exports.a + 1;\n{}var c;\n{}",
      getter_setter("a"),
      getter_setter("b"),
      getter_setter("c")
    )
  );
}

#[test]
fn exported_class_becomes_constant_local() {
  assert_eq!(
    without_marker("export class Foo {} Foo.x = 1;"),
    format!("const Foo = class Foo {{}};\n{}exports.Foo.x = 1;\n", getter("Foo"))
  );
}

#[test]
fn default_exported_class_is_exposed_under_both_names() {
  assert_eq!(
    without_marker("export default class Foo {} new Foo();"),
    format!(
      "class Foo {{}}\n{}{}new exports.Foo();\n",
      getter("Foo"),
      getter("Foo").replacen("\"Foo\"", "\"default\"", 1)
    )
  );
}

#[test]
fn anonymous_default_export_is_kept() {
  let mut module = parse("export default class {}").unwrap();
  let report = rewrite_module(&mut module, &RewireOptions::default()).unwrap();
  assert_eq!(report.skipped, vec![(
    "default".to_string(),
    SkipReason::AnonymousDefault
  )]);
  assert_eq!(
    emit_module(&module, EmitOptions::default()).unwrap(),
    format!("export default class {{}}\n{}", MARKER)
  );
}

#[test]
fn function_accessor_precedes_earlier_calls() {
  assert_eq!(
    without_marker("\"use strict\";\nfoo();\nfunction foo() { return 1; }"),
    format!(
      "\"use strict\";\n{}exports.foo();\nfunction foo() {{\n  return 1;\n}}\n",
      getter_setter("foo")
    )
  );
}

#[test]
fn export_list_keeps_specifiers_without_backing_property() {
  assert_eq!(
    without_marker("import a from \"m\";\nconst b = 1;\nconst [d] = e;\nexport { a, b as c, b, d };"),
    format!(
      "import a from \"m\";\nconst b = 1;\n{}const [d] = e;\nexport {{ a, d }};\nexports.c = exports.b;\n",
      getter("b")
    )
  );
}

#[test]
fn other_exports_pass_through_with_redirected_references() {
  assert_eq!(
    without_marker("const a = 1;\nexport default a;\nexport { x } from \"m\";\nexport * from \"n\";"),
    format!(
      "const a = 1;\n{}export default exports.a;\nexport {{ x }} from \"m\";\nexport * from \"n\";\n",
      getter("a")
    )
  );
}

#[test]
fn shorthand_properties_are_expanded() {
  assert_eq!(
    without_marker("const msg = \"hi\";\nexport const greet = () => ({ msg });"),
    format!(
      "const msg = \"hi\";\n{}exports.greet = () => ({{ msg: exports.msg }});\n",
      getter("msg")
    )
  );
}

#[test]
fn setter_parameter_avoids_binding_name() {
  assert_eq!(
    without_marker("let newValue = 1;"),
    "let newValue = 1;\nObject.defineProperty(exports, \"newValue\", { enumerable: true, configurable: true, get: () => newValue, set: (newValue_1) => newValue = newValue_1 });\n"
  );
}

#[test]
fn interop_helpers_and_requires_are_untouched() {
  let src = r#""use strict";
var _a = _interopRequireDefault(require("a"));
var fs = require("fs");
function _interopRequireDefault(obj) { return obj && obj.__esModule ? obj : { default: obj }; }
"#;
  assert_eq!(without_marker(src), reformat(src));

  let mut module = parse(src).unwrap();
  let report = rewrite_module(&mut module, &RewireOptions::default()).unwrap();
  assert_eq!(report.skipped, vec![
    ("_a".to_string(), SkipReason::InteropHelper),
    ("fs".to_string(), SkipReason::RequireCall),
    ("_interopRequireDefault".to_string(), SkipReason::InteropHelper),
  ]);
}

#[test]
fn shadowed_references_are_not_redirected() {
  assert_eq!(
    without_marker("let count = 0;\nfunction inc(count) { return count + 1; }\ncount = inc(count);"),
    format!(
      "{}let count = 0;\n{}function inc(count) {{\n  return count + 1;\n}}\nexports.count = exports.inc(exports.count);\n",
      getter_setter("inc"),
      getter_setter("count")
    )
  );
}

#[test]
fn shadowed_namespace_keeps_binding_local() {
  assert_eq!(
    without_marker("const msg = 1;\nfunction f(exports) {\n  return msg;\n}"),
    format!(
      "{}const msg = 1;\nfunction f(exports) {{\n  return msg;\n}}\n",
      getter_setter("f")
    )
  );
}

#[test]
fn delete_operand_is_not_redirected() {
  assert_eq!(
    without_marker("let x = 1;\ndelete x;\nx;"),
    format!("let x = 1;\n{}delete x;\nexports.x;\n", getter_setter("x"))
  );
}
