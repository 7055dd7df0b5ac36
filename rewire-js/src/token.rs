use crate::loc::Loc;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TT {
  // Special token used to represent the end of the source code. Easier than using and handling Option everywhere.
  EOF,
  // Special token used to represent invalid source code, so peeking never needs error handling.
  Invalid,

  Ampersand,
  AmpersandAmpersand,
  AmpersandAmpersandEquals,
  AmpersandEquals,
  Asterisk,
  AsteriskAsterisk,
  AsteriskAsteriskEquals,
  AsteriskEquals,
  Bar,
  BarBar,
  BarBarEquals,
  BarEquals,
  BraceClose,
  BraceOpen,
  BracketClose,
  BracketOpen,
  Caret,
  CaretEquals,
  ChevronLeft,
  ChevronLeftChevronLeft,
  ChevronLeftChevronLeftEquals,
  ChevronLeftEquals,
  ChevronLeftSlash,
  ChevronRight,
  ChevronRightChevronRight,
  ChevronRightChevronRightChevronRight,
  ChevronRightChevronRightChevronRightEquals,
  ChevronRightChevronRightEquals,
  ChevronRightEquals,
  Colon,
  Comma,
  Dot,
  DotDotDot,
  Equals,
  EqualsChevronRight,
  EqualsEquals,
  EqualsEqualsEquals,
  Exclamation,
  ExclamationEquals,
  ExclamationEqualsEquals,
  Hyphen,
  HyphenEquals,
  HyphenHyphen,
  Identifier,
  JsxTextContent,
  KeywordBreak,
  KeywordCase,
  KeywordCatch,
  KeywordClass,
  KeywordConst,
  KeywordContinue,
  KeywordDebugger,
  KeywordDefault,
  KeywordDelete,
  KeywordDo,
  KeywordElse,
  KeywordExport,
  KeywordExtends,
  KeywordFinally,
  KeywordFor,
  KeywordFunction,
  KeywordIf,
  KeywordImport,
  KeywordIn,
  KeywordInstanceof,
  KeywordNew,
  KeywordReturn,
  KeywordSuper,
  KeywordSwitch,
  KeywordThis,
  KeywordThrow,
  KeywordTry,
  KeywordTypeof,
  KeywordVar,
  KeywordVoid,
  KeywordWhile,
  KeywordWith,
  LiteralBigInt,
  LiteralFalse,
  LiteralNull,
  LiteralNumber,
  LiteralRegex,
  LiteralString,
  // A template part that ends with `${`.
  LiteralTemplatePartString,
  // A template part that ends with the closing backtick.
  LiteralTemplatePartStringEnd,
  LiteralTrue,
  ParenthesisClose,
  ParenthesisOpen,
  Percent,
  PercentEquals,
  Plus,
  PlusEquals,
  PlusPlus,
  PrivateMember,
  Question,
  QuestionDot,
  QuestionQuestion,
  QuestionQuestionEquals,
  Semicolon,
  Slash,
  SlashEquals,
  Tilde,
}

impl TT {
  /// Whether this token may be used where an IdentifierName is expected, e.g. a property key or
  /// the name after `.`. Reserved words are allowed there.
  pub fn is_identifier_name(self) -> bool {
    matches!(
      self,
      TT::Identifier
        | TT::KeywordBreak
        | TT::KeywordCase
        | TT::KeywordCatch
        | TT::KeywordClass
        | TT::KeywordConst
        | TT::KeywordContinue
        | TT::KeywordDebugger
        | TT::KeywordDefault
        | TT::KeywordDelete
        | TT::KeywordDo
        | TT::KeywordElse
        | TT::KeywordExport
        | TT::KeywordExtends
        | TT::KeywordFinally
        | TT::KeywordFor
        | TT::KeywordFunction
        | TT::KeywordIf
        | TT::KeywordImport
        | TT::KeywordIn
        | TT::KeywordInstanceof
        | TT::KeywordNew
        | TT::KeywordReturn
        | TT::KeywordSuper
        | TT::KeywordSwitch
        | TT::KeywordThis
        | TT::KeywordThrow
        | TT::KeywordTry
        | TT::KeywordTypeof
        | TT::KeywordVar
        | TT::KeywordVoid
        | TT::KeywordWhile
        | TT::KeywordWith
        | TT::LiteralFalse
        | TT::LiteralNull
        | TT::LiteralTrue
    )
  }
}

#[derive(Clone, Debug)]
pub struct Token {
  pub typ: TT,
  pub loc: Loc,
  // Whether one or more line terminators appear between this token and the previous one.
  pub preceded_by_line_terminator: bool,
}
