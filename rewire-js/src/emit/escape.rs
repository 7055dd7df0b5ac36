use crate::lex::is_id_continue;
use crate::lex::is_id_start;

/// Double-quoted string literal for a decoded string value. Non-ASCII characters are kept as
/// UTF-8 except U+2028/U+2029, which must always be escaped.
pub fn string_literal(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  let mut chars = value.chars().peekable();
  while let Some(ch) = chars.next() {
    match ch {
      '\\' => out.push_str("\\\\"),
      '"' => out.push_str("\\\""),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\0' => {
        if chars.peek().is_some_and(|c| c.is_ascii_digit()) {
          out.push_str("\\x00");
        } else {
          out.push_str("\\0");
        }
      }
      '\u{2028}' => out.push_str("\\u2028"),
      '\u{2029}' => out.push_str("\\u2029"),
      ch if ch < '\u{20}' => out.push_str(&format!("\\x{:02X}", ch as u32)),
      ch => out.push(ch),
    }
  }
  out.push('"');
  out
}

/// Whether `name` can be written as a bare identifier name (e.g. a property key or an
/// import/export name) rather than a string literal.
pub fn is_identifier_name(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if is_id_start(c) => chars.all(is_id_continue),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::is_identifier_name;
  use super::string_literal;

  #[test]
  fn test_escapes_quotes_and_backslashes() {
    assert_eq!(string_literal("a\"b\\c"), "\"a\\\"b\\\\c\"");
  }

  #[test]
  fn test_escapes_control_characters() {
    assert_eq!(string_literal("a\nb\tc"), "\"a\\nb\\tc\"");
    assert_eq!(string_literal("a\u{0007}b"), "\"a\\x07b\"");
    assert_eq!(string_literal("\u{0}1"), "\"\\x001\"");
    assert_eq!(string_literal("é\u{2028}"), "\"é\\u2028\"");
  }

  #[test]
  fn test_identifier_names() {
    assert!(is_identifier_name("$foo_1"));
    assert!(is_identifier_name("default"));
    assert!(!is_identifier_name("1a"));
    assert!(!is_identifier_name("a-b"));
    assert!(!is_identifier_name(""));
  }
}
