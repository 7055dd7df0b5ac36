use emit::emit_module;
use err::RewireError;
use parse::parse;
use rewrite::rewrite_module;

pub mod ast;
pub mod emit;
pub mod err;
pub mod error;
pub mod lex;
pub mod loc;
pub mod operator;
pub mod parse;
pub mod rewrite;
pub mod scope;
pub mod template;
pub mod token;

pub use rewrite::RewireOptions;
pub use rewrite::RewriteReport;

/// Rewrites a UTF-8 JavaScript module so that every top-level binding is reachable, and
/// replaceable, through `exports`.
///
/// # Arguments
///
/// * `source` - The module's source code.
/// * `options` - Test-module detection, marker emission and output formatting.
///
/// # Examples
///
/// ```
/// use rewire_js::{rewire, RewireOptions};
///
/// let out = rewire(b"const msg = \"hi\"; console.log(msg);", &RewireOptions::default()).unwrap();
/// assert_eq!(
///   out,
///   concat!(
///     "const msg = \"hi\";\n",
///     "Object.defineProperty(exports, \"msg\", { enumerable: true, configurable: true, get: () => msg });\n",
///     "console.log(exports.msg);\n",
///     "Object.defineProperty(exports, \"__esModule\", { value: true });\n",
///   )
/// );
/// ```
pub fn rewire(source: &[u8], options: &RewireOptions) -> Result<String, RewireError> {
  let source_str = std::str::from_utf8(source).map_err(RewireError::InvalidUtf8)?;
  let mut module = parse(source_str).map_err(RewireError::Syntax)?;
  rewrite_module(&mut module, options)?;
  emit_module(&module, options.emit).map_err(RewireError::Emit)
}
