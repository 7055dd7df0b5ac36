use rewire_js::parse::parse;
use rewire_js::rewrite::rewrite_module;
use rewire_js::RewireOptions;
use serde_json::Value;

fn stmt<'a>(module: &'a Value, i: usize) -> &'a Value {
  let id = module["body"][i].as_u64().unwrap() as usize;
  &module["arena"]["nodes"][id]
}

#[test]
fn rewritten_module_serializes_with_tagged_syntax() {
  let mut module = parse("console.log(1);\nlet a = 1;").unwrap();
  rewrite_module(&mut module, &RewireOptions::default().with_module_marker(false)).unwrap();
  let json = serde_json::to_value(&module).unwrap();

  assert_eq!(json["body"].as_array().unwrap().len(), 3);
  let kept = stmt(&json, 0);
  assert_eq!(kept["stx"]["$t"], "ExprStmt");
  assert!(kept["loc"][1].as_u64().unwrap() > 0);

  assert_eq!(stmt(&json, 1)["stx"]["$t"], "VarDecl");

  // Accessors don't exist in the source.
  let accessor = stmt(&json, 2);
  assert_eq!(accessor["stx"]["$t"], "ExprStmt");
  assert_eq!(accessor["loc"], serde_json::json!([0, 0]));
}
