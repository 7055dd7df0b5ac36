use super::RewireOptions;
use super::MODULE_MARKER;
use super::NAMESPACE;
use crate::ast::Arena;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::scope::ScopeIndex;
use ahash::HashMap;
use ahash::HashMapExt;
use ahash::HashSet;
use ahash::HashSetExt;

/// Per-module state, created on entry to the module root and dropped when the rewrite returns.
#[derive(Debug, Default)]
pub struct ModuleState {
  /// Names of local declarations emitted by the rewriter itself, plus names that already have an
  /// accessor on the namespace object when the rewrite starts.
  pub synthesized: HashSet<String>,
  pub test_module: bool,
  /// The module already defines `exports.__esModule`.
  pub marker_present: bool,
  /// Locals of top-level `export { ... }` lists (without `from`), mapped to their exported names.
  pub listed_exports: HashMap<String, Vec<String>>,
  /// Bindings referenced from somewhere `exports` is declared by an enclosing scope.
  pub namespace_shadowed: HashSet<String>,
}

/// The identifier at the root of a callee chain, e.g. `describe` for `describe.each(t)(...)`.
fn callee_root(arena: &Arena, mut id: NodeId) -> Option<&str> {
  loop {
    id = match arena.stx(id) {
      Syntax::Id { name } => return Some(name),
      Syntax::Member { object, .. } | Syntax::ComputedMember { object, .. } => *object,
      Syntax::Call { callee, .. } => *callee,
      Syntax::TaggedTemplate { tag, .. } => *tag,
      _ => return None,
    };
  }
}

/// The property name of a top-level `Object.defineProperty(exports, "<name>", ...)` statement.
pub fn defined_export_name(arena: &Arena, stmt: NodeId) -> Option<&str> {
  let Syntax::ExprStmt { expr } = arena.stx(stmt) else {
    return None;
  };
  let Syntax::Call { callee, args, .. } = arena.stx(*expr) else {
    return None;
  };
  let Syntax::Member {
    object, property, ..
  } = arena.stx(*callee)
  else {
    return None;
  };
  if arena.id_name(*object) != Some("Object") || property != "defineProperty" {
    return None;
  }
  match args.as_slice() {
    [target, key, ..] if arena.id_name(*target) == Some(NAMESPACE) => match arena.stx(*key) {
      Syntax::LitStr { value } => Some(value),
      _ => None,
    },
    _ => None,
  }
}

impl ModuleState {
  pub fn scan(arena: &Arena, body: &[NodeId], options: &RewireOptions) -> ModuleState {
    let mut state = ModuleState {
      synthesized: HashSet::new(),
      test_module: false,
      marker_present: false,
      listed_exports: HashMap::new(),
      namespace_shadowed: HashSet::new(),
    };
    for &stmt in body {
      match arena.stx(stmt) {
        Syntax::ExprStmt { expr } => {
          if let Some(name) = defined_export_name(arena, stmt) {
            if name == MODULE_MARKER {
              state.marker_present = true;
            } else {
              state.synthesized.insert(name.to_string());
            }
          } else if let Syntax::Call { callee, .. } = arena.stx(*expr) {
            if callee_root(arena, *callee)
              .is_some_and(|root| options.test_primitives.iter().any(|p| p == root))
            {
              state.test_module = true;
            }
          }
        }
        Syntax::ExportList {
          specifiers,
          from: None,
        } => {
          for &s in specifiers {
            if let Syntax::ExportSpecifier { local, exported } = arena.stx(s) {
              state
                .listed_exports
                .entry(local.clone())
                .or_default()
                .push(exported.clone());
            }
          }
        }
        _ => {}
      }
    }
    state
  }

  /// Records the bindings that have a reference where `exports` means something else.
  pub fn note_shadowed_namespace(&mut self, scopes: &ScopeIndex) {
    self.namespace_shadowed.extend(
      scopes
        .bindings()
        .filter(|b| b.refs.iter().any(|r| r.namespace_shadowed))
        .map(|b| b.name.clone()),
    );
  }
}

#[cfg(test)]
mod tests {
  use super::ModuleState;
  use crate::parse::parse;
  use crate::rewrite::RewireOptions;

  fn scan(src: &str) -> ModuleState {
    let m = parse(src).unwrap();
    ModuleState::scan(&m.arena, &m.body, &RewireOptions::default())
  }

  #[test]
  fn test_detects_test_modules() {
    assert!(scan("describe('x', () => {});").test_module);
    assert!(scan("describe.each([1])('x', (n) => {});").test_module);
    assert!(!scan("it('x', () => {});").test_module);
    assert!(!scan("function f() { describe('x'); }").test_module);
  }

  #[test]
  fn test_seeds_from_existing_accessors() {
    let state = scan(
      r#"
const msg = "hi";
Object.defineProperty(exports, "msg", { get: () => msg });
Object.defineProperty(exports, "__esModule", { value: true });
"#,
    );
    assert!(state.synthesized.contains("msg"));
    assert!(!state.synthesized.contains("__esModule"));
    assert!(state.marker_present);
  }

  #[test]
  fn test_collects_export_lists() {
    let state = scan("export { a as b, a, c }; export { d } from 'm';");
    assert_eq!(state.listed_exports["a"], vec!["b".to_string(), "a".into()]);
    assert!(state.listed_exports.contains_key("c"));
    assert!(!state.listed_exports.contains_key("d"));
  }
}
