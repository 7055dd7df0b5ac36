use assert_cmd::Command;
use serde_json::Value;
use std::time::Duration;
use tempfile::tempdir;

fn rewire_js_cli() -> Command {
  assert_cmd::cargo::cargo_bin_cmd!("rewire-js")
}

const MARKER: &str = "Object.defineProperty(exports, \"__esModule\", { value: true });\n";

#[test]
fn rewrites_stdin_to_stdout() {
  let assert = rewire_js_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin("const foo = () => \"foo\";\nfoo();\n")
    .assert()
    .success();
  let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
  assert_eq!(
    stdout,
    format!("exports.foo = () => \"foo\";\nexports.foo();\n{}", MARKER)
  );
}

#[test]
fn reads_and_writes_files() {
  let dir = tempdir().unwrap();
  let input = dir.path().join("in.js");
  let output = dir.path().join("out.js");
  std::fs::write(&input, "let n = 1;\nn++;\n").unwrap();

  rewire_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--input")
    .arg(&input)
    .arg("-o")
    .arg(&output)
    .arg("--minify")
    .arg("--no-module-marker")
    .assert()
    .success()
    .stdout("");

  let written = std::fs::read_to_string(&output).unwrap();
  assert_eq!(
    written,
    "let n=1;Object.defineProperty(exports,\"n\",{enumerable:true,configurable:true,get:()=>n,set:(newValue)=>n=newValue});exports.n++;"
  );
}

#[test]
fn custom_test_primitive_leaves_module_untouched() {
  let assert = rewire_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--test-primitive")
    .arg("suite")
    .write_stdin("const a = 1;\nsuite(\"a\", () => a);\n")
    .assert()
    .success();
  let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
  assert_eq!(stdout, "const a = 1;\nsuite(\"a\", () => a);\n");
}

#[test]
fn dumps_rewritten_tree_as_json() {
  let assert = rewire_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--dump-ast")
    .arg("--no-module-marker")
    .write_stdin("const f = () => 1;")
    .assert()
    .success();
  let output: Value =
    serde_json::from_slice(&assert.get_output().stdout).expect("stdout should be valid JSON");
  let body = output["body"].as_array().unwrap();
  assert_eq!(body.len(), 1);
  let stmt = &output["arena"]["nodes"][body[0].as_u64().unwrap() as usize];
  assert_eq!(stmt["stx"]["$t"], "ExprStmt");
}

#[test]
fn prints_diagnostic_on_parse_error() {
  let assert = rewire_js_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin("let x = 1;\nfunction {")
    .assert()
    .failure()
    .code(1);
  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.contains("error[RS"));
  assert!(stderr.contains("<stdin>:2:"));
}

#[test]
fn rejects_invalid_utf8() {
  let assert = rewire_js_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin(vec![b'x', 0xff, b';'])
    .assert()
    .failure()
    .code(1);
  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.contains("not valid UTF-8"));
}

#[test]
fn trace_logs_to_stderr() {
  let assert = rewire_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--trace")
    .write_stdin("var a = require(\"a\");")
    .assert()
    .success();
  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.contains("skipping declaration"));
  assert!(stderr.contains("rewrite_module"));
}
