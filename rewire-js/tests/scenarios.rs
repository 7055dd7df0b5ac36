use rewire_js::rewire;
use rewire_js::RewireOptions;

const MARKER: &str = "Object.defineProperty(exports, \"__esModule\", { value: true });\n";

fn rewire_str(src: &str) -> String {
  rewire(src.as_bytes(), &RewireOptions::default()).unwrap()
}

fn with_marker(out: &str) -> String {
  format!("{}{}", out, MARKER)
}

#[test]
fn private_constant_gets_getter() {
  assert_eq!(
    rewire_str(r#"const msg = "hello, world"; console.log(msg);"#),
    with_marker(concat!(
      "const msg = \"hello, world\";\n",
      "Object.defineProperty(exports, \"msg\", { enumerable: true, configurable: true, get: () => msg });\n",
      "console.log(exports.msg);\n",
    ))
  );
}

#[test]
fn private_arrow_constant_becomes_assignment() {
  let options = RewireOptions::default().with_module_marker(false);
  assert_eq!(
    rewire(br#"const foo = () => "foo";"#, &options).unwrap(),
    "exports.foo = () => \"foo\";\n"
  );
}

#[test]
fn exported_function_becomes_mutable_local() {
  assert_eq!(
    rewire_str(r#"export function foo() { return "foo"; } foo();"#),
    with_marker(concat!(
      "let foo = function foo() {\n",
      "  return \"foo\";\n",
      "};\n",
      "Object.defineProperty(exports, \"foo\", { enumerable: true, configurable: true, get: () => foo, set: (newValue) => foo = newValue });\n",
      "exports.foo();\n",
    ))
  );
}

#[test]
fn default_exported_function_becomes_default_assignment() {
  assert_eq!(
    rewire_str(r#"export default function foo() { return "foo"; } foo();"#),
    with_marker(concat!(
      "exports.default = function foo() {\n",
      "  return \"foo\";\n",
      "};\n",
      "exports.default();\n",
    ))
  );
}

#[test]
fn renamed_export_becomes_alias() {
  assert_eq!(
    rewire_str("export {foo as bar};"),
    with_marker("exports.bar = exports.foo;\n")
  );
}

#[test]
fn same_name_export_adds_nothing() {
  assert_eq!(
    rewire_str("const foo = 1; export {foo};"),
    with_marker(
      "const foo = 1;\nObject.defineProperty(exports, \"foo\", { enumerable: true, configurable: true, get: () => foo });\n"
    )
  );
}
