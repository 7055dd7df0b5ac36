use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use ahash::HashMap;
use ahash::HashMapExt;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::AhoCorasickKind;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use core::ops::Index;
use memchr::memchr;
use memchr::memchr2;
use memchr::memchr3;
use once_cell::sync::Lazy;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LexMode {
  JsxTag,
  JsxTextContent,
  SlashIsRegex,
  Standard,
  TemplateStrContinue,
}

struct PatternMatcher {
  patterns: Vec<TT>,
  matcher: AhoCorasick,
}

impl PatternMatcher {
  fn new(patterns: &[(TT, &'static str)]) -> Self {
    let (tts, syns): (Vec<_>, Vec<_>) = patterns.iter().copied().unzip();
    let matcher = AhoCorasickBuilder::new()
      .start_kind(StartKind::Anchored)
      .kind(Some(AhoCorasickKind::DFA))
      .match_kind(MatchKind::LeftmostLongest)
      .build(syns)
      .expect("punctuator patterns are valid");
    PatternMatcher {
      patterns: tts,
      matcher,
    }
  }

  // Returns the matched token type and the match length.
  fn find(&self, rem: &[u8]) -> Option<(TT, usize)> {
    self
      .matcher
      .find(Input::new(rem).anchored(Anchored::Yes))
      .map(|m| (self.patterns[m.pattern().as_usize()], m.end()))
  }
}

static PUNCTUATORS: Lazy<PatternMatcher> = Lazy::new(|| {
  PatternMatcher::new(&[
    (TT::Ampersand, "&"),
    (TT::AmpersandAmpersand, "&&"),
    (TT::AmpersandAmpersandEquals, "&&="),
    (TT::AmpersandEquals, "&="),
    (TT::Asterisk, "*"),
    (TT::AsteriskAsterisk, "**"),
    (TT::AsteriskAsteriskEquals, "**="),
    (TT::AsteriskEquals, "*="),
    (TT::Bar, "|"),
    (TT::BarBar, "||"),
    (TT::BarBarEquals, "||="),
    (TT::BarEquals, "|="),
    (TT::BraceClose, "}"),
    (TT::BraceOpen, "{"),
    (TT::BracketClose, "]"),
    (TT::BracketOpen, "["),
    (TT::Caret, "^"),
    (TT::CaretEquals, "^="),
    (TT::ChevronLeft, "<"),
    (TT::ChevronLeftChevronLeft, "<<"),
    (TT::ChevronLeftChevronLeftEquals, "<<="),
    (TT::ChevronLeftEquals, "<="),
    (TT::ChevronRight, ">"),
    (TT::ChevronRightChevronRight, ">>"),
    (TT::ChevronRightChevronRightChevronRight, ">>>"),
    (TT::ChevronRightChevronRightChevronRightEquals, ">>>="),
    (TT::ChevronRightChevronRightEquals, ">>="),
    (TT::ChevronRightEquals, ">="),
    (TT::Colon, ":"),
    (TT::Comma, ","),
    (TT::Dot, "."),
    (TT::DotDotDot, "..."),
    (TT::Equals, "="),
    (TT::EqualsChevronRight, "=>"),
    (TT::EqualsEquals, "=="),
    (TT::EqualsEqualsEquals, "==="),
    (TT::Exclamation, "!"),
    (TT::ExclamationEquals, "!="),
    (TT::ExclamationEqualsEquals, "!=="),
    (TT::Hyphen, "-"),
    (TT::HyphenEquals, "-="),
    (TT::HyphenHyphen, "--"),
    (TT::ParenthesisClose, ")"),
    (TT::ParenthesisOpen, "("),
    (TT::Percent, "%"),
    (TT::PercentEquals, "%="),
    (TT::Plus, "+"),
    (TT::PlusEquals, "+="),
    (TT::PlusPlus, "++"),
    (TT::Question, "?"),
    (TT::QuestionDot, "?."),
    (TT::QuestionQuestion, "??"),
    (TT::QuestionQuestionEquals, "??="),
    (TT::Semicolon, ";"),
    (TT::Slash, "/"),
    (TT::SlashEquals, "/="),
    (TT::Tilde, "~"),
  ])
});

// Inside a JSX tag, `>` must never combine into `>>` or `>=`, and `</` is its own token.
static JSX_TAG_PUNCTUATORS: Lazy<PatternMatcher> = Lazy::new(|| {
  PatternMatcher::new(&[
    (TT::BraceClose, "}"),
    (TT::BraceOpen, "{"),
    (TT::ChevronLeft, "<"),
    (TT::ChevronLeftSlash, "</"),
    (TT::ChevronRight, ">"),
    (TT::Colon, ":"),
    (TT::Dot, "."),
    (TT::Equals, "="),
    (TT::Slash, "/"),
  ])
});

pub static KEYWORDS_MAPPING: Lazy<HashMap<&'static str, TT>> = Lazy::new(|| {
  let mut map = HashMap::<&'static str, TT>::new();
  map.insert("break", TT::KeywordBreak);
  map.insert("case", TT::KeywordCase);
  map.insert("catch", TT::KeywordCatch);
  map.insert("class", TT::KeywordClass);
  map.insert("const", TT::KeywordConst);
  map.insert("continue", TT::KeywordContinue);
  map.insert("debugger", TT::KeywordDebugger);
  map.insert("default", TT::KeywordDefault);
  map.insert("delete", TT::KeywordDelete);
  map.insert("do", TT::KeywordDo);
  map.insert("else", TT::KeywordElse);
  map.insert("export", TT::KeywordExport);
  map.insert("extends", TT::KeywordExtends);
  map.insert("false", TT::LiteralFalse);
  map.insert("finally", TT::KeywordFinally);
  map.insert("for", TT::KeywordFor);
  map.insert("function", TT::KeywordFunction);
  map.insert("if", TT::KeywordIf);
  map.insert("import", TT::KeywordImport);
  map.insert("in", TT::KeywordIn);
  map.insert("instanceof", TT::KeywordInstanceof);
  map.insert("new", TT::KeywordNew);
  map.insert("null", TT::LiteralNull);
  map.insert("return", TT::KeywordReturn);
  map.insert("super", TT::KeywordSuper);
  map.insert("switch", TT::KeywordSwitch);
  map.insert("this", TT::KeywordThis);
  map.insert("throw", TT::KeywordThrow);
  map.insert("true", TT::LiteralTrue);
  map.insert("try", TT::KeywordTry);
  map.insert("typeof", TT::KeywordTypeof);
  map.insert("var", TT::KeywordVar);
  map.insert("void", TT::KeywordVoid);
  map.insert("while", TT::KeywordWhile);
  map.insert("with", TT::KeywordWith);
  map
});

pub fn is_id_start(c: char) -> bool {
  c == '$' || c == '_' || c.is_ascii_alphabetic() || (!c.is_ascii() && c.is_alphabetic())
}

pub fn is_id_continue(c: char) -> bool {
  is_id_start(c) || c.is_ascii_digit() || c == '\u{200C}' || c == '\u{200D}'
}

fn is_line_terminator(c: char) -> bool {
  matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace(c: char) -> bool {
  matches!(
    c,
    ' ' | '\t' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}'
  ) || (!c.is_ascii() && c.is_whitespace() && !is_line_terminator(c))
}

#[derive(Copy, Clone)]
pub struct LexerCheckpoint {
  next: usize,
}

pub struct Lexer<'a> {
  source: &'a str,
  next: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(code: &'a str) -> Lexer<'a> {
    // A hashbang line is only valid at the very start and is dropped like a comment.
    let next = if code.starts_with("#!") {
      memchr(b'\n', code.as_bytes()).unwrap_or(code.len())
    } else {
      0
    };
    Lexer { source: code, next }
  }

  pub fn next(&self) -> usize {
    self.next
  }

  pub fn set_next(&mut self, next: usize) {
    self.next = next;
  }

  pub fn checkpoint(&self) -> LexerCheckpoint {
    LexerCheckpoint { next: self.next }
  }

  pub fn apply_checkpoint(&mut self, checkpoint: LexerCheckpoint) {
    self.next = checkpoint.next;
  }

  pub fn source(&self) -> &'a str {
    self.source
  }

  pub fn source_range(&self) -> Loc {
    Loc(0, self.source.len())
  }

  fn rem(&self) -> &'a str {
    &self.source[self.next..]
  }

  fn peek_char(&self) -> Option<char> {
    self.rem().chars().next()
  }

  fn peek_char_at(&self, n: usize) -> Option<char> {
    self.rem().chars().nth(n)
  }

  fn at_end(&self) -> bool {
    self.next >= self.source.len()
  }

  fn skip_char(&mut self) {
    if let Some(c) = self.peek_char() {
      self.next += c.len_utf8();
    }
  }

  fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
    while let Some(c) = self.peek_char() {
      if !pred(c) {
        break;
      }
      self.next += c.len_utf8();
    }
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = str;

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}

// Skips whitespace and comments. Returns whether a line terminator was crossed, or None if a
// multiline comment is never closed.
fn skip_trivia(lexer: &mut Lexer) -> Option<bool> {
  let mut crossed = false;
  loop {
    let Some(c) = lexer.peek_char() else {
      return Some(crossed);
    };
    if is_line_terminator(c) {
      crossed = true;
      lexer.skip_char();
    } else if is_whitespace(c) {
      lexer.skip_char();
    } else if lexer.rem().starts_with("//") {
      let rem = lexer.rem().as_bytes();
      // U+2028/U+2029 also terminate single-line comments but are vanishingly rare; they are
      // treated as part of the comment.
      lexer.next += memchr2(b'\n', b'\r', rem).unwrap_or(rem.len());
    } else if lexer.rem().starts_with("/*") {
      let body_start = lexer.next + 2;
      let end = lexer.source[body_start..].find("*/")?;
      if lexer.source[body_start..body_start + end]
        .chars()
        .any(is_line_terminator)
      {
        crossed = true;
      }
      lexer.next = body_start + end + 2;
    } else {
      return Some(crossed);
    }
  }
}

fn lex_identifier(lexer: &mut Lexer, allow_hyphen: bool) {
  lexer.skip_char();
  lexer.skip_while(|c| is_id_continue(c) || (allow_hyphen && c == '-'));
}

fn lex_number(lexer: &mut Lexer) -> TT {
  let rem = lexer.rem().as_bytes();
  if rem.len() > 1 && rem[0] == b'0' && matches!(rem[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B') {
    lexer.next += 2;
    lexer.skip_while(|c| c.is_ascii_hexdigit() || c == '_');
    if lexer.peek_char() == Some('n') {
      lexer.skip_char();
      return TT::LiteralBigInt;
    }
    return TT::LiteralNumber;
  }
  lexer.skip_while(|c| c.is_ascii_digit() || c == '_');
  let mut is_integer = true;
  if lexer.peek_char() == Some('.') {
    is_integer = false;
    lexer.skip_char();
    lexer.skip_while(|c| c.is_ascii_digit() || c == '_');
  }
  if matches!(lexer.peek_char(), Some('e' | 'E')) {
    let sign = matches!(lexer.peek_char_at(1), Some('+' | '-'));
    let digit_at = if sign { 2 } else { 1 };
    if lexer
      .peek_char_at(digit_at)
      .is_some_and(|c| c.is_ascii_digit())
    {
      is_integer = false;
      lexer.next += digit_at;
      lexer.skip_while(|c| c.is_ascii_digit() || c == '_');
    }
  }
  if is_integer && lexer.peek_char() == Some('n') {
    lexer.skip_char();
    return TT::LiteralBigInt;
  }
  if lexer.peek_char().is_some_and(is_id_start) {
    return TT::Invalid;
  }
  TT::LiteralNumber
}

fn lex_string(lexer: &mut Lexer, quote: u8, allow_escapes: bool) -> TT {
  lexer.next += 1;
  loop {
    let rem = lexer.rem().as_bytes();
    let found = if allow_escapes {
      memchr3(quote, b'\\', b'\n', rem)
    } else {
      memchr(quote, rem)
    };
    let Some(pos) = found else {
      lexer.next = lexer.source.len();
      return TT::Invalid;
    };
    match rem[pos] {
      b'\\' => {
        lexer.next += pos + 1;
        // Skip the escaped char, which may be a multibyte char or a line continuation.
        lexer.skip_char();
      }
      b'\n' => {
        lexer.next += pos;
        return TT::Invalid;
      }
      _ => {
        lexer.next += pos + 1;
        return TT::LiteralString;
      }
    }
  }
}

// Lexes the rest of a template part, starting after the opening backtick or closing brace.
fn lex_template_part(lexer: &mut Lexer) -> TT {
  loop {
    let rem = lexer.rem().as_bytes();
    let Some(pos) = memchr3(b'`', b'$', b'\\', rem) else {
      lexer.next = lexer.source.len();
      return TT::Invalid;
    };
    match rem[pos] {
      b'\\' => {
        lexer.next += pos + 1;
        lexer.skip_char();
      }
      b'$' => {
        if rem.get(pos + 1) == Some(&b'{') {
          lexer.next += pos + 2;
          return TT::LiteralTemplatePartString;
        }
        lexer.next += pos + 1;
      }
      _ => {
        lexer.next += pos + 1;
        return TT::LiteralTemplatePartStringEnd;
      }
    }
  }
}

fn lex_regex(lexer: &mut Lexer) -> TT {
  lexer.next += 1;
  let mut in_class = false;
  loop {
    let Some(c) = lexer.peek_char() else {
      return TT::Invalid;
    };
    if is_line_terminator(c) {
      return TT::Invalid;
    }
    lexer.skip_char();
    match c {
      '\\' => {
        if lexer.peek_char().is_some_and(is_line_terminator) {
          return TT::Invalid;
        }
        lexer.skip_char();
      }
      '[' => in_class = true,
      ']' => in_class = false,
      '/' if !in_class => break,
      _ => {}
    }
  }
  lexer.skip_while(is_id_continue);
  TT::LiteralRegex
}

fn lex_jsx_text(lexer: &mut Lexer) -> Option<TT> {
  let rem = lexer.rem().as_bytes();
  let len = memchr2(b'{', b'<', rem).unwrap_or(rem.len());
  if len == 0 {
    return None;
  }
  lexer.next += len;
  Some(TT::JsxTextContent)
}

pub fn lex_next(lexer: &mut Lexer, mode: LexMode) -> Token {
  if mode == LexMode::TemplateStrContinue {
    let start = lexer.next;
    let typ = lex_template_part(lexer);
    return Token {
      typ,
      loc: Loc(start, lexer.next),
      preceded_by_line_terminator: false,
    };
  }

  let mut preceded_by_line_terminator = false;
  if mode == LexMode::JsxTextContent {
    let start = lexer.next;
    if lexer.at_end() {
      return Token {
        typ: TT::EOF,
        loc: Loc(start, start),
        preceded_by_line_terminator,
      };
    }
    if let Some(typ) = lex_jsx_text(lexer) {
      return Token {
        typ,
        loc: Loc(start, lexer.next),
        preceded_by_line_terminator,
      };
    }
  } else {
    match skip_trivia(lexer) {
      Some(crossed) => preceded_by_line_terminator = crossed,
      None => {
        let start = lexer.next;
        lexer.next = lexer.source.len();
        return Token {
          typ: TT::Invalid,
          loc: Loc(start, lexer.next),
          preceded_by_line_terminator,
        };
      }
    }
  }

  let start = lexer.next;
  let Some(c) = lexer.peek_char() else {
    return Token {
      typ: TT::EOF,
      loc: Loc(start, start),
      preceded_by_line_terminator,
    };
  };
  let jsx = matches!(mode, LexMode::JsxTag | LexMode::JsxTextContent);

  let typ = if is_id_start(c) {
    lex_identifier(lexer, mode == LexMode::JsxTag);
    if mode == LexMode::JsxTag {
      TT::Identifier
    } else {
      KEYWORDS_MAPPING
        .get(&lexer.source[start..lexer.next])
        .copied()
        .unwrap_or(TT::Identifier)
    }
  } else if c == '#' && !jsx && lexer.peek_char_at(1).is_some_and(is_id_start) {
    lexer.skip_char();
    lex_identifier(lexer, false);
    TT::PrivateMember
  } else if !jsx
    && (c.is_ascii_digit()
      || (c == '.' && lexer.peek_char_at(1).is_some_and(|n| n.is_ascii_digit())))
  {
    lex_number(lexer)
  } else if c == '"' || c == '\'' {
    lex_string(lexer, c as u8, mode != LexMode::JsxTag)
  } else if c == '`' && !jsx {
    lexer.skip_char();
    lex_template_part(lexer)
  } else if c == '/' && mode == LexMode::SlashIsRegex {
    lex_regex(lexer)
  } else {
    let matcher = if jsx {
      &*JSX_TAG_PUNCTUATORS
    } else {
      &*PUNCTUATORS
    };
    match matcher.find(lexer.rem().as_bytes()) {
      // `a?.5:b` is a conditional, not optional chaining.
      Some((TT::QuestionDot, _))
        if lexer.peek_char_at(2).is_some_and(|n| n.is_ascii_digit()) =>
      {
        lexer.next += 1;
        TT::Question
      }
      Some((typ, len)) => {
        lexer.next += len;
        typ
      }
      None => {
        lexer.skip_char();
        TT::Invalid
      }
    }
  };

  Token {
    typ,
    loc: Loc(start, lexer.next),
    preceded_by_line_terminator,
  }
}
