use super::split::Splitter;
use crate::ast::Arena;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::emit::is_identifier_name;
use crate::template::TemplateError;
use tracing::debug;

/// Rewrites an `export { ... }` list without `from`. `backing_key` maps a local name to the
/// `exports` property that holds it, if any. Specifiers with a backing property turn into
/// `exports.exported = exports.key;`, or nothing when the property already has the exported name;
/// the rest stay in a residual list. Returns `None` if the statement stays as it is.
pub fn rewrite_export_list(
  arena: &mut Arena,
  splitter: &mut Splitter,
  stmt: NodeId,
  backing_key: impl Fn(&str) -> Option<String>,
) -> Result<Option<Vec<NodeId>>, TemplateError> {
  let Syntax::ExportList {
    specifiers,
    from: None,
  } = arena.stx(stmt)
  else {
    return Ok(None);
  };
  let specifiers = specifiers.clone();
  let mut residual = Vec::new();
  let mut aliases = Vec::new();
  for &s in &specifiers {
    let Syntax::ExportSpecifier { local, exported } = arena.stx(s) else {
      residual.push(s);
      continue;
    };
    let key = match backing_key(local) {
      Some(key) if is_identifier_name(exported) => key,
      _ => {
        residual.push(s);
        continue;
      }
    };
    if key != *exported {
      let exported = exported.clone();
      debug!(local = local.as_str(), exported = exported.as_str(), key = key.as_str(), "aliased export");
      aliases.push(splitter.alias(arena, &exported, &key)?);
    }
  }
  if residual.len() == specifiers.len() {
    return Ok(None);
  }
  let mut out = Vec::with_capacity(aliases.len() + 1);
  if !residual.is_empty() {
    out.push(arena.synth(Syntax::ExportList {
      specifiers: residual,
      from: None,
    }));
  }
  out.extend(aliases);
  Ok(Some(out))
}
