//! Makes every top-level binding of a module reachable and replaceable through `exports`.
//!
//! Each top-level declaration is classified, every reference to it is redirected to its property
//! on `exports`, and the declaration is replaced with an equivalent local declaration plus an
//! accessor property (or a direct assignment for arrow functions and default-exported functions).
//! A test harness can then swap out any binding at run time by redefining the property, and the
//! rest of the module sees the substitute. Running the rewrite over its own output changes nothing.
//!
//! ```
//! use rewire_js::parse::parse;
//! use rewire_js::rewrite::rewrite_module;
//! use rewire_js::rewrite::RewireOptions;
//!
//! let mut module = parse("let count = 0; count++;").unwrap();
//! let report = rewrite_module(&mut module, &RewireOptions::default()).unwrap();
//! assert_eq!(report.rewritten, vec!["count".to_string()]);
//! assert!(report.marker_emitted);
//! ```

use crate::ast::Arena;
use crate::ast::Module;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::emit::EmitOptions;
use crate::err::RewireError;
use crate::scope::analyze;
use crate::scope::ScopeIndex;
use crate::template::FragmentBuilder;
use crate::template::TemplateBuilder;
use ahash::HashMap;
use ahash::HashMapExt;
use classify::Classified;
use classify::Classifier;
use classify::Declared;
use export::rewrite_export_list;
use redirect::redirect_references;
use split::Splitter;
use state::ModuleState;
use tracing::debug;
use tracing::debug_span;

mod classify;
mod export;
mod redirect;
mod split;
mod state;
#[cfg(test)]
mod tests;

pub use classify::Binding;
pub use classify::DeclForm;
pub use classify::ExportStatus;
pub use classify::Shape;
pub use classify::SkipReason;

/// Interop helpers inserted by module-format converters. Their declarations, and variables
/// initialized by calling them, are never rewritten.
pub const INTEROP_HELPERS: [&str; 3] = [
  "_getRequireWildcardCache",
  "_interopRequireWildcard",
  "_interopRequireDefault",
];
pub const REQUIRE: &str = "require";
/// The namespace object every binding is exposed on.
pub const NAMESPACE: &str = "exports";
pub const MODULE_MARKER: &str = "__esModule";
/// Globals the rewritten output relies on, so they can't be rebound.
pub const RESERVED_NAMES: [&str; 2] = [NAMESPACE, "Object"];

#[derive(Clone, Debug)]
pub struct RewireOptions {
  /// Top-level calls rooted at one of these names (e.g. `describe(...)`, `describe.each(...)(...)`)
  /// mark a test-definition module, which is left untouched.
  pub test_primitives: Vec<String>,
  /// Used by [`crate::rewire`] when serializing the result.
  pub emit: EmitOptions,
  /// Append `Object.defineProperty(exports, "__esModule", ...)` unless already present.
  pub module_marker: bool,
}

impl Default for RewireOptions {
  fn default() -> Self {
    RewireOptions {
      test_primitives: vec!["describe".to_string()],
      emit: EmitOptions::default(),
      module_marker: true,
    }
  }
}

impl RewireOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replaces the test primitives.
  pub fn with_test_primitives<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.test_primitives = names.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_emit(mut self, emit: EmitOptions) -> Self {
    self.emit = emit;
    self
  }

  pub fn with_module_marker(mut self, module_marker: bool) -> Self {
    self.module_marker = module_marker;
    self
  }
}

/// What a rewrite did to a module.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewriteReport {
  pub skipped_test_module: bool,
  /// Bindings whose declarations were replaced, in source order.
  pub rewritten: Vec<String>,
  /// Declared names that were left as they are.
  pub skipped: Vec<(String, SkipReason)>,
  pub marker_emitted: bool,
}

fn is_directive(arena: &Arena, stmt: NodeId) -> bool {
  matches!(arena.stx(stmt), Syntax::ExprStmt { expr } if matches!(arena.stx(*expr), Syntax::LitStr { .. }))
}

/// Rewrites `module` in place, analyzing its scopes and building fragments with the crate's own
/// parser.
pub fn rewrite_module(
  module: &mut Module,
  options: &RewireOptions,
) -> Result<RewriteReport, RewireError> {
  let scopes = analyze(module);
  let mut builder = TemplateBuilder::new();
  rewrite_module_with(module, options, &scopes, &mut builder)
}

/// Rewrites `module` in place. `scopes` must have been computed from `module` as it is now.
///
/// On error the module is left exactly as it was.
pub fn rewrite_module_with(
  module: &mut Module,
  options: &RewireOptions,
  scopes: &ScopeIndex,
  builder: &mut dyn FragmentBuilder,
) -> Result<RewriteReport, RewireError> {
  let span = debug_span!("rewrite_module", statements = module.body.len());
  let _entered = span.enter();

  let mut state = ModuleState::scan(&module.arena, &module.body, options);
  let mut report = RewriteReport::default();
  if state.test_module {
    debug!("test module left as is");
    report.skipped_test_module = true;
    return Ok(report);
  }
  state.note_shadowed_namespace(scopes);

  let classified: Vec<(NodeId, Classified)> = {
    let mut classifier = Classifier::new(&module.arena, &mut state);
    module
      .body
      .iter()
      .map(|&stmt| (stmt, classifier.classify(stmt)))
      .collect()
  };

  // Local name to the `exports` property backing it. Existing accessors count too.
  let mut backing: HashMap<String, String> = state
    .synthesized
    .iter()
    .map(|name| (name.clone(), name.clone()))
    .collect();

  let arena_len = module.arena.len();
  // Syntax of every redirected reference before it was redirected.
  let mut originals: Vec<(NodeId, Syntax)> = Vec::new();
  // Moving a node into a fragment copies its syntax to a new id, so every reference must be
  // redirected before any declaration is split.
  for (_, c) in &classified {
    for entry in c.entries() {
      match entry {
        Declared::Rewrite(binding) => {
          originals.extend(
            scopes
              .refs(&binding.name)
              .iter()
              .map(|site| (site.node, module.arena.stx(site.node).clone())),
          );
          let references = redirect_references(&mut module.arena, scopes, binding);
          debug!(
            name = binding.name.as_str(),
            form = ?binding.form,
            export = ?binding.export,
            references,
            "rewriting binding"
          );
          backing.insert(binding.name.clone(), binding.namespace_key().to_string());
          report.rewritten.push(binding.name.clone());
        }
        Declared::Skip { names, reason, .. } => {
          for name in names {
            debug!(name = name.as_str(), reason = %reason, "skipping declaration");
            report.skipped.push((name.clone(), *reason));
          }
        }
      }
    }
  }

  let marker = options.module_marker && !state.marker_present;
  match splice(module, scopes, builder, &classified, &backing, marker) {
    Ok(body) => module.body = body,
    Err(err) => {
      for (node, stx) in originals {
        module.arena.replace(node, stx);
      }
      module.arena.truncate(arena_len);
      debug!(error = %err, "rewrite abandoned");
      return Err(err);
    }
  }
  report.marker_emitted = marker;

  debug!(
    rewritten = report.rewritten.len(),
    skipped = report.skipped.len(),
    "rewrote module"
  );
  Ok(report)
}

/// Builds the replacement for every classified statement and returns the new module body:
/// directives, the prologue, each statement or its replacement, then the marker if requested.
fn splice(
  module: &mut Module,
  scopes: &ScopeIndex,
  builder: &mut dyn FragmentBuilder,
  classified: &[(NodeId, Classified)],
  backing: &HashMap<String, String>,
  marker: bool,
) -> Result<Vec<NodeId>, RewireError> {
  let mut splitter = Splitter::new(builder, scopes);
  let mut prologue = Vec::new();
  let mut replacements: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
  for (stmt, c) in classified {
    let stmts = match c {
      Classified::Keep | Classified::Single(Declared::Skip { .. }) => continue,
      Classified::ExportList => {
        let replaced = rewrite_export_list(&mut module.arena, &mut splitter, *stmt, |local| {
          match backing.get(local) {
            Some(key) => Some(key.clone()),
            // Not declared in this module, so it can only live on `exports`.
            None if scopes.binding(local).is_none() => Some(local.to_string()),
            None => None,
          }
        })?;
        match replaced {
          Some(stmts) => stmts,
          None => continue,
        }
      }
      Classified::Single(Declared::Rewrite(binding)) => {
        let replacement = splitter.split(&mut module.arena, binding)?;
        prologue.extend(replacement.prologue);
        replacement.stmts
      }
      Classified::Declarators {
        kind,
        exported,
        entries,
      } => {
        if !entries.iter().any(|e| matches!(e, Declared::Rewrite(_))) {
          continue;
        }
        let mut stmts = Vec::new();
        for entry in entries {
          match entry {
            Declared::Rewrite(binding) => {
              let replacement = splitter.split(&mut module.arena, binding)?;
              prologue.extend(replacement.prologue);
              stmts.extend(replacement.stmts);
            }
            Declared::Skip { node, .. } => {
              let mut kept = module.arena.synth(Syntax::VarDecl {
                kind: *kind,
                declarators: vec![*node],
              });
              if *exported {
                kept = module.arena.synth(Syntax::ExportDecl { decl: kept });
              }
              stmts.push(kept);
            }
          }
        }
        stmts
      }
    };
    replacements.insert(*stmt, stmts);
  }

  let directives = module
    .body
    .iter()
    .take_while(|&&stmt| is_directive(&module.arena, stmt))
    .count();
  let mut body = Vec::with_capacity(module.body.len() + prologue.len() + 1);
  body.extend_from_slice(&module.body[..directives]);
  body.extend(prologue);
  for &stmt in &module.body[directives..] {
    match replacements.remove(&stmt) {
      Some(stmts) => body.extend(stmts),
      None => body.push(stmt),
    }
  }
  if marker {
    body.push(splitter.marker(&mut module.arena)?);
  }
  Ok(body)
}
