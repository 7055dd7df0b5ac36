use super::classify::Binding;
use super::NAMESPACE;
use crate::ast::Arena;
use crate::ast::Syntax;
use crate::scope::RefKind;
use crate::scope::ScopeIndex;
use tracing::trace;

/// Points every reference to `binding` at its property on the namespace object, and returns how
/// many references were rewritten. Export specifier labels keep the original name, as they're
/// resolved by the export list rewrite instead.
///
/// References are replaced in place (the node keeps its id), so this must run before the
/// declarations that contain them are moved into replacement fragments.
pub fn redirect_references(arena: &mut Arena, scopes: &ScopeIndex, binding: &Binding) -> usize {
  let key = binding.namespace_key();
  let mut redirected = 0;
  for site in scopes.refs(&binding.name) {
    let replacement = match (site.kind, arena.stx(site.node)) {
      (RefKind::Identifier, Syntax::Id { name }) if *name == binding.name => {
        let object = arena.synth(Syntax::Id {
          name: NAMESPACE.to_string(),
        });
        Syntax::Member {
          object,
          property: key.to_string(),
          optional: false,
        }
      }
      (RefKind::JsxTag, Syntax::JsxTagName { name }) if *name == binding.name => {
        let object = arena.synth(Syntax::JsxTagName {
          name: NAMESPACE.to_string(),
        });
        Syntax::JsxTagMember {
          object,
          property: key.to_string(),
        }
      }
      (RefKind::ExportLabel, _) => {
        trace!(name = binding.name.as_str(), node = ?site.node, "keeping export label");
        continue;
      }
      // Already redirected.
      _ => continue,
    };
    arena.replace(site.node, replacement);
    trace!(
      name = binding.name.as_str(),
      key,
      node = ?site.node,
      kind = ?site.kind,
      "redirected reference"
    );
    redirected += 1;
  }
  redirected
}

#[cfg(test)]
mod tests {
  use super::redirect_references;
  use crate::emit::emit_module;
  use crate::emit::EmitOptions;
  use crate::parse::parse;
  use crate::rewrite::classify::Classified;
  use crate::rewrite::classify::Classifier;
  use crate::rewrite::classify::Declared;
  use crate::rewrite::state::ModuleState;
  use crate::rewrite::RewireOptions;
  use crate::scope::analyze;

  fn redirect_first(src: &str) -> (String, usize) {
    let mut m = parse(src).unwrap();
    let scopes = analyze(&m);
    let mut state = ModuleState::scan(&m.arena, &m.body, &RewireOptions::default());
    let classified = Classifier::new(&m.arena, &mut state).classify(m.body[0]);
    let binding = match classified {
      Classified::Single(Declared::Rewrite(b)) => b,
      Classified::Declarators { mut entries, .. } => match entries.remove(0) {
        Declared::Rewrite(b) => b,
        other => panic!("unexpected {:?}", other),
      },
      other => panic!("unexpected {:?}", other),
    };
    let n = redirect_references(&mut m.arena, &scopes, &binding);
    (emit_module(&m, EmitOptions::minified()).unwrap(), n)
  }

  #[test]
  fn test_identifier_and_jsx_references() {
    let (out, n) = redirect_first("class Foo {} new Foo(); x = <Foo.Bar><Foo /></Foo.Bar>; y = { Foo };");
    assert_eq!(n, 4);
    assert_eq!(
      out,
      "class Foo{}new exports.Foo();x=<exports.Foo.Bar><exports.Foo/></exports.Foo.Bar>;y={Foo:exports.Foo};"
    );
  }

  #[test]
  fn test_shadowed_names_and_labels_are_kept() {
    let (out, n) = redirect_first("let a = 1; function f(a) { return a; } a++; export { a as b };");
    assert_eq!(n, 1);
    assert_eq!(out, "let a=1;function f(a){return a;}exports.a++;export{a as b};");
  }

  #[test]
  fn test_default_function_uses_default_key() {
    let (out, _) = redirect_first("export default function foo() { return foo; } foo();");
    assert_eq!(
      out,
      "export default function foo(){return exports.default;}exports.default();"
    );
  }

  #[test]
  fn test_second_pass_is_noop() {
    let mut m = parse("var a = 1; a;").unwrap();
    let scopes = analyze(&m);
    let mut state = ModuleState::scan(&m.arena, &m.body, &RewireOptions::default());
    let Classified::Declarators { entries, .. } = Classifier::new(&m.arena, &mut state).classify(m.body[0]) else {
      panic!("expected declarators");
    };
    let Declared::Rewrite(binding) = &entries[0] else {
      panic!("expected a rewrite");
    };
    assert_eq!(redirect_references(&mut m.arena, &scopes, binding), 1);
    assert_eq!(redirect_references(&mut m.arena, &scopes, binding), 0);
  }
}
