use super::unexpected;
use super::Parser;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;

fn hex_value(digits: &str) -> Option<char> {
  u32::from_str_radix(digits, 16)
    .ok()
    .and_then(char::from_u32)
}

/// Decodes the body of a string literal (without its quotes).
pub fn decode_string(raw: &str) -> Option<String> {
  let mut out = String::with_capacity(raw.len());
  let mut chars = raw.char_indices().peekable();
  while let Some((_, c)) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }
    let (i, esc) = chars.next()?;
    match esc {
      'n' => out.push('\n'),
      'r' => out.push('\r'),
      't' => out.push('\t'),
      'b' => out.push('\u{0008}'),
      'f' => out.push('\u{000C}'),
      'v' => out.push('\u{000B}'),
      '0' if !chars.peek().is_some_and(|(_, n)| n.is_ascii_digit()) => out.push('\0'),
      'x' => {
        let digits = raw.get(i + 1..i + 3)?;
        out.push(hex_value(digits)?);
        chars.next();
        chars.next();
      }
      'u' => {
        if raw[i + 1..].starts_with('{') {
          let end = raw[i + 1..].find('}')? + i + 1;
          out.push(hex_value(&raw[i + 2..end])?);
          while chars.next_if(|&(j, _)| j <= end).is_some() {}
        } else {
          let digits = raw.get(i + 1..i + 5)?;
          out.push(hex_value(digits)?);
          for _ in 0..4 {
            chars.next();
          }
        }
      }
      // Line continuation.
      '\r' => {
        chars.next_if(|&(_, n)| n == '\n');
      }
      '\n' | '\u{2028}' | '\u{2029}' => {}
      // Legacy octal escapes aren't allowed in modules.
      '1'..='9' => return None,
      other => out.push(other),
    }
  }
  Some(out)
}

impl<'a> Parser<'a> {
  pub fn parse_lit_str(&mut self, t: &Token) -> SyntaxResult<String> {
    let raw = self.str(Loc(t.loc.0 + 1, t.loc.1 - 1));
    decode_string(raw).ok_or_else(|| t.loc.error(SyntaxErrorType::InvalidCharacterEscape, None))
  }

  /// Parses a template literal whose first part token `first` has already been consumed.
  pub fn parse_template_after_first_part(&mut self, first: Token) -> SyntaxResult<NodeId> {
    let mut loc = first.loc;
    let mut parts = Vec::new();
    let mut exprs = Vec::new();
    let mut part = first;
    // The first part starts with the opening backtick; continuations start right after `}`.
    let mut skip_start = 1;
    loop {
      let ends = part.typ == TT::LiteralTemplatePartStringEnd;
      let skip_end = if ends { 1 } else { 2 };
      parts.push(self.string(Loc(part.loc.0 + skip_start, part.loc.1 - skip_end)));
      loc.extend(part.loc);
      if ends {
        break;
      }
      let expr = self.with_in_allowed(true, |p| p.parse_expr())?;
      exprs.push(expr);
      self.require(TT::BraceClose)?;
      part = self.consume_with_mode(LexMode::TemplateStrContinue);
      if !matches!(
        part.typ,
        TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd
      ) {
        return Err(unexpected(&part, SyntaxErrorType::UnterminatedLiteral));
      }
      skip_start = 0;
    }
    Ok(self.alloc(loc, Syntax::Template { parts, exprs }))
  }
}

#[cfg(test)]
mod tests {
  use super::decode_string;

  #[test]
  fn test_decode_escapes() {
    assert_eq!(decode_string(r"a\nb").as_deref(), Some("a\nb"));
    assert_eq!(decode_string(r"\x41B\u{43}").as_deref(), Some("ABC"));
    assert_eq!(decode_string(r#"\"\'\\"#).as_deref(), Some("\"'\\"));
    assert_eq!(decode_string("a\\\nb").as_deref(), Some("ab"));
    assert_eq!(decode_string(r"\0").as_deref(), Some("\0"));
  }

  #[test]
  fn test_decode_rejects_bad_escapes() {
    assert_eq!(decode_string(r"\x4"), None);
    assert_eq!(decode_string(r"\1"), None);
    assert_eq!(decode_string("\\"), None);
  }
}
