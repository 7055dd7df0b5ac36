use crate::loc::Loc;
use crate::token::TT;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

/// A stable classification of syntax errors produced by the front end.
///
/// Diagnostic codes (prefix `RS`) are assigned per variant and are stable:
/// - `RS0001`: [`SyntaxErrorType::ExpectedNotFound`]
/// - `RS0002`: [`SyntaxErrorType::ExpectedSyntax`]
/// - `RS0003`: [`SyntaxErrorType::InvalidAssigmentTarget`]
/// - `RS0004`: [`SyntaxErrorType::InvalidCharacterEscape`]
/// - `RS0005`: [`SyntaxErrorType::JsxClosingTagMismatch`]
/// - `RS0006`: [`SyntaxErrorType::LineTerminatorInString`]
/// - `RS0007`: [`SyntaxErrorType::MalformedLiteralNumber`]
/// - `RS0008`: [`SyntaxErrorType::RequiredTokenNotFound`]
/// - `RS0009`: [`SyntaxErrorType::TryStatementHasNoCatchOrFinally`]
/// - `RS0010`: [`SyntaxErrorType::UnexpectedEnd`]
/// - `RS0011`: [`SyntaxErrorType::UnterminatedLiteral`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedNotFound,
  ExpectedSyntax(&'static str),
  InvalidAssigmentTarget,
  InvalidCharacterEscape,
  JsxClosingTagMismatch,
  LineTerminatorInString,
  MalformedLiteralNumber,
  RequiredTokenNotFound(TT),
  TryStatementHasNoCatchOrFinally,
  UnexpectedEnd,
  UnterminatedLiteral,
}

#[derive(Clone)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual_token: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError {
      typ,
      loc,
      actual_token,
    }
  }

  /// Renders `error[CODE]: message` followed by the 1-based position in `source`.
  pub fn render(&self, file_name: &str, source: &str) -> String {
    let (line, col) = self.loc.line_col(source);
    format!(
      "error[{}]: {}\n  --> {}:{}:{}",
      self.typ.code(),
      self.typ.message(self.actual_token),
      file_name,
      line,
      col
    )
  }
}

impl Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} around loc [{}:{}]", self, self.loc.0, self.loc.1)
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} [token={:?}]", self.typ, self.actual_token)
  }
}

impl Error for SyntaxError {}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

impl SyntaxErrorType {
  /// Stable diagnostic code for this syntax error variant.
  pub fn code(&self) -> &'static str {
    match self {
      SyntaxErrorType::ExpectedNotFound => "RS0001",
      SyntaxErrorType::ExpectedSyntax(_) => "RS0002",
      SyntaxErrorType::InvalidAssigmentTarget => "RS0003",
      SyntaxErrorType::InvalidCharacterEscape => "RS0004",
      SyntaxErrorType::JsxClosingTagMismatch => "RS0005",
      SyntaxErrorType::LineTerminatorInString => "RS0006",
      SyntaxErrorType::MalformedLiteralNumber => "RS0007",
      SyntaxErrorType::RequiredTokenNotFound(_) => "RS0008",
      SyntaxErrorType::TryStatementHasNoCatchOrFinally => "RS0009",
      SyntaxErrorType::UnexpectedEnd => "RS0010",
      SyntaxErrorType::UnterminatedLiteral => "RS0011",
    }
  }

  /// Human-readable message describing this syntax error.
  pub fn message(&self, actual_token: Option<TT>) -> String {
    match self {
      SyntaxErrorType::ExpectedNotFound => "expected token not found".into(),
      SyntaxErrorType::ExpectedSyntax(expected) => format!("expected {}", expected),
      SyntaxErrorType::InvalidAssigmentTarget => "invalid assignment target".into(),
      SyntaxErrorType::InvalidCharacterEscape => "invalid character escape".into(),
      SyntaxErrorType::JsxClosingTagMismatch => "JSX closing tag does not match opening tag".into(),
      SyntaxErrorType::LineTerminatorInString => {
        "line terminator not allowed in string literal".into()
      }
      SyntaxErrorType::MalformedLiteralNumber => "malformed number literal".into(),
      SyntaxErrorType::RequiredTokenNotFound(token) => format!("expected token {:?}", token),
      SyntaxErrorType::TryStatementHasNoCatchOrFinally => {
        "try statement requires a catch or finally block".into()
      }
      SyntaxErrorType::UnexpectedEnd => actual_token
        .map(|tok| format!("unexpected end before {:?}", tok))
        .unwrap_or_else(|| "unexpected end of input".into()),
      SyntaxErrorType::UnterminatedLiteral => "unterminated literal".into(),
    }
  }
}
