//! Boundary-aware output buffer.
//!
//! Callers write token-like fragments through the typed helpers and the
//! [`Emitter`] inserts the minimal whitespace needed to keep adjacent tokens
//! from lexing as something else (`returnx`, `a+ +b`, `a/ /re/`). Optional
//! whitespace (spaces around operators, newlines, indentation) is only written
//! in [`EmitMode::Pretty`].

use super::EmitMode;
use super::EmitOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
  None,
  Word,
  Number,
  Plus,
  Minus,
  Slash,
  Lt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leading {
  Word,
  Number,
  Plus,
  Minus,
  Slash,
  Star,
  Lt,
  Other,
}

fn needs_space(prev: Boundary, next: Leading) -> bool {
  match (prev, next) {
    (Boundary::Word | Boundary::Number, Leading::Word | Leading::Number) => true,
    (Boundary::Plus, Leading::Plus) => true,
    (Boundary::Minus, Leading::Minus) => true,
    (Boundary::Slash, Leading::Slash | Leading::Star) => true,
    (Boundary::Lt, Leading::Lt) => true,
    _ => false,
  }
}

fn is_word_byte(b: u8) -> bool {
  b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn leading_of(s: &str) -> Leading {
  match s.as_bytes().first() {
    Some(b'0'..=b'9') => Leading::Number,
    Some(&b) if is_word_byte(b) => Leading::Word,
    Some(b'+') => Leading::Plus,
    Some(b'-') => Leading::Minus,
    Some(b'/') => Leading::Slash,
    Some(b'*') => Leading::Star,
    Some(b'<') => Leading::Lt,
    _ => Leading::Other,
  }
}

fn trailing_of(s: &str) -> Boundary {
  match s.as_bytes().last() {
    Some(&b) if is_word_byte(b) => Boundary::Word,
    Some(b'+') => Boundary::Plus,
    Some(b'-') => Boundary::Minus,
    Some(b'/') => Boundary::Slash,
    Some(b'<') => Boundary::Lt,
    _ => Boundary::None,
  }
}

pub struct Emitter {
  out: String,
  mode: EmitMode,
  indent: usize,
  at_line_start: bool,
  trailing: Boundary,
}

impl Emitter {
  pub fn new(opts: EmitOptions) -> Emitter {
    Emitter {
      out: String::new(),
      mode: opts.mode,
      indent: 0,
      at_line_start: true,
      trailing: Boundary::None,
    }
  }

  pub fn is_pretty(&self) -> bool {
    self.mode == EmitMode::Pretty
  }

  pub fn into_string(self) -> String {
    self.out
  }

  fn write_fragment(&mut self, s: &str, leading: Leading, trailing: Boundary) {
    if s.is_empty() {
      return;
    }
    if self.at_line_start {
      for _ in 0..self.indent {
        self.out.push_str("  ");
      }
      self.at_line_start = false;
    } else if needs_space(self.trailing, leading) {
      self.out.push(' ');
    }
    self.out.push_str(s);
    self.trailing = trailing;
  }

  pub fn write_keyword(&mut self, kw: &str) {
    self.write_fragment(kw, Leading::Word, Boundary::Word);
  }

  /// Identifiers, including private names (`#x`) and the raw text of JSX names.
  pub fn write_identifier(&mut self, name: &str) {
    self.write_fragment(name, leading_of(name), trailing_of(name));
  }

  pub fn write_number(&mut self, raw: &str) {
    // Number literals may end in a word character (`1n`, `0xff`) but also in `.`.
    let trailing = match trailing_of(raw) {
      Boundary::Word => Boundary::Number,
      other => other,
    };
    self.write_fragment(raw, Leading::Number, trailing);
  }

  pub fn write_punct(&mut self, punct: &str) {
    self.write_fragment(punct, leading_of(punct), trailing_of(punct));
  }

  /// A complete token with no boundary hazards of its own, e.g. a string literal.
  pub fn write_raw(&mut self, raw: &str) {
    self.write_fragment(raw, leading_of(raw), trailing_of(raw));
  }

  /// Writes JSX text verbatim. JSX text can't be adjacent to tokens that would merge with it.
  pub fn write_verbatim(&mut self, raw: &str) {
    self.at_line_start = false;
    self.out.push_str(raw);
    self.trailing = Boundary::None;
  }

  /// Optional space: written in pretty mode only.
  pub fn write_space(&mut self) {
    if self.is_pretty() && !self.at_line_start {
      self.out.push(' ');
      self.trailing = Boundary::None;
    }
  }

  /// A space that's required regardless of mode, e.g. between JSX attributes.
  pub fn write_required_space(&mut self) {
    self.out.push(' ');
    self.trailing = Boundary::None;
  }

  /// Optional line break: written in pretty mode only.
  pub fn write_newline(&mut self) {
    if self.is_pretty() {
      self.out.push('\n');
      self.at_line_start = true;
      self.trailing = Boundary::None;
    }
  }

  pub fn indent(&mut self) {
    self.indent += 1;
  }

  pub fn dedent(&mut self) {
    self.indent = self.indent.saturating_sub(1);
  }
}

#[cfg(test)]
mod tests {
  use super::Emitter;
  use crate::emit::EmitMode;
  use crate::emit::EmitOptions;

  fn minified() -> Emitter {
    Emitter::new(EmitOptions {
      mode: EmitMode::Minified,
    })
  }

  #[test]
  fn test_separates_words() {
    let mut e = minified();
    e.write_keyword("return");
    e.write_identifier("x");
    e.write_punct(";");
    assert_eq!(e.into_string(), "return x;");
  }

  #[test]
  fn test_separates_operator_runs() {
    let mut e = minified();
    e.write_identifier("a");
    e.write_punct("+");
    e.write_punct("+");
    e.write_identifier("b");
    e.write_punct("-");
    e.write_punct("--");
    e.write_identifier("c");
    assert_eq!(e.into_string(), "a+ +b- --c");
  }

  #[test]
  fn test_regex_after_division() {
    let mut e = minified();
    e.write_identifier("a");
    e.write_punct("/");
    e.write_raw("/re/g");
    assert_eq!(e.into_string(), "a/ /re/g");
  }

  #[test]
  fn test_pretty_indentation() {
    let mut e = Emitter::new(EmitOptions::default());
    e.write_punct("{");
    e.indent();
    e.write_newline();
    e.write_identifier("a");
    e.write_punct(";");
    e.dedent();
    e.write_newline();
    e.write_punct("}");
    assert_eq!(e.into_string(), "{\n  a;\n}");
  }
}
