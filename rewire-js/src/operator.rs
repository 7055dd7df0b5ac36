use serde::Serialize;

/// Binding power of an expression, from loosest to tightest. Used by both the parser (to decide
/// where an operand ends) and the emitter (to decide where parentheses are needed).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum Precedence {
  Sequence,
  Assignment,
  Conditional,
  Nullish,
  LogicalOr,
  LogicalAnd,
  BitwiseOr,
  BitwiseXor,
  BitwiseAnd,
  Equality,
  Relational,
  Shift,
  Additive,
  Multiplicative,
  Exponentiation,
  Unary,
  Update,
  LeftHandSide,
  Primary,
}

impl Precedence {
  /// The next tighter level, used for the right operand of left-associative operators.
  pub fn next_tighter(self) -> Precedence {
    match self {
      Precedence::Sequence => Precedence::Assignment,
      Precedence::Assignment => Precedence::Conditional,
      Precedence::Conditional => Precedence::Nullish,
      Precedence::Nullish => Precedence::LogicalOr,
      Precedence::LogicalOr => Precedence::LogicalAnd,
      Precedence::LogicalAnd => Precedence::BitwiseOr,
      Precedence::BitwiseOr => Precedence::BitwiseXor,
      Precedence::BitwiseXor => Precedence::BitwiseAnd,
      Precedence::BitwiseAnd => Precedence::Equality,
      Precedence::Equality => Precedence::Relational,
      Precedence::Relational => Precedence::Shift,
      Precedence::Shift => Precedence::Additive,
      Precedence::Additive => Precedence::Multiplicative,
      Precedence::Multiplicative => Precedence::Exponentiation,
      Precedence::Exponentiation => Precedence::Unary,
      Precedence::Unary => Precedence::Update,
      Precedence::Update => Precedence::LeftHandSide,
      Precedence::LeftHandSide | Precedence::Primary => Precedence::Primary,
    }
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub enum BinaryOp {
  Add,
  BitAnd,
  BitOr,
  BitXor,
  Div,
  Eq,
  Exp,
  Gt,
  Gte,
  In,
  Instanceof,
  LogicalAnd,
  LogicalOr,
  Lt,
  Lte,
  Mul,
  Neq,
  Nullish,
  Rem,
  Shl,
  Shr,
  StrictEq,
  StrictNeq,
  Sub,
  UShr,
}

impl BinaryOp {
  pub fn precedence(self) -> Precedence {
    match self {
      BinaryOp::Nullish => Precedence::Nullish,
      BinaryOp::LogicalOr => Precedence::LogicalOr,
      BinaryOp::LogicalAnd => Precedence::LogicalAnd,
      BinaryOp::BitOr => Precedence::BitwiseOr,
      BinaryOp::BitXor => Precedence::BitwiseXor,
      BinaryOp::BitAnd => Precedence::BitwiseAnd,
      BinaryOp::Eq | BinaryOp::Neq | BinaryOp::StrictEq | BinaryOp::StrictNeq => {
        Precedence::Equality
      }
      BinaryOp::Gt
      | BinaryOp::Gte
      | BinaryOp::In
      | BinaryOp::Instanceof
      | BinaryOp::Lt
      | BinaryOp::Lte => Precedence::Relational,
      BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => Precedence::Shift,
      BinaryOp::Add | BinaryOp::Sub => Precedence::Additive,
      BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => Precedence::Multiplicative,
      BinaryOp::Exp => Precedence::Exponentiation,
    }
  }

  pub fn is_right_associative(self) -> bool {
    self == BinaryOp::Exp
  }

  pub fn is_word(self) -> bool {
    matches!(self, BinaryOp::In | BinaryOp::Instanceof)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      BinaryOp::Add => "+",
      BinaryOp::BitAnd => "&",
      BinaryOp::BitOr => "|",
      BinaryOp::BitXor => "^",
      BinaryOp::Div => "/",
      BinaryOp::Eq => "==",
      BinaryOp::Exp => "**",
      BinaryOp::Gt => ">",
      BinaryOp::Gte => ">=",
      BinaryOp::In => "in",
      BinaryOp::Instanceof => "instanceof",
      BinaryOp::LogicalAnd => "&&",
      BinaryOp::LogicalOr => "||",
      BinaryOp::Lt => "<",
      BinaryOp::Lte => "<=",
      BinaryOp::Mul => "*",
      BinaryOp::Neq => "!=",
      BinaryOp::Nullish => "??",
      BinaryOp::Rem => "%",
      BinaryOp::Shl => "<<",
      BinaryOp::Shr => ">>",
      BinaryOp::StrictEq => "===",
      BinaryOp::StrictNeq => "!==",
      BinaryOp::Sub => "-",
      BinaryOp::UShr => ">>>",
    }
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub enum UnaryOp {
  BitNot,
  Delete,
  Neg,
  Not,
  Pos,
  Typeof,
  Void,
}

impl UnaryOp {
  pub fn as_str(self) -> &'static str {
    match self {
      UnaryOp::BitNot => "~",
      UnaryOp::Delete => "delete",
      UnaryOp::Neg => "-",
      UnaryOp::Not => "!",
      UnaryOp::Pos => "+",
      UnaryOp::Typeof => "typeof",
      UnaryOp::Void => "void",
    }
  }

  pub fn is_word(self) -> bool {
    matches!(self, UnaryOp::Delete | UnaryOp::Typeof | UnaryOp::Void)
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub enum UpdateOp {
  Decrement,
  Increment,
}

impl UpdateOp {
  pub fn as_str(self) -> &'static str {
    match self {
      UpdateOp::Decrement => "--",
      UpdateOp::Increment => "++",
    }
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub enum AssignOp {
  Add,
  Assign,
  BitAnd,
  BitOr,
  BitXor,
  Div,
  Exp,
  LogicalAnd,
  LogicalOr,
  Mul,
  Nullish,
  Rem,
  Shl,
  Shr,
  Sub,
  UShr,
}

impl AssignOp {
  pub fn as_str(self) -> &'static str {
    match self {
      AssignOp::Add => "+=",
      AssignOp::Assign => "=",
      AssignOp::BitAnd => "&=",
      AssignOp::BitOr => "|=",
      AssignOp::BitXor => "^=",
      AssignOp::Div => "/=",
      AssignOp::Exp => "**=",
      AssignOp::LogicalAnd => "&&=",
      AssignOp::LogicalOr => "||=",
      AssignOp::Mul => "*=",
      AssignOp::Nullish => "??=",
      AssignOp::Rem => "%=",
      AssignOp::Shl => "<<=",
      AssignOp::Shr => ">>=",
      AssignOp::Sub => "-=",
      AssignOp::UShr => ">>>=",
    }
  }
}
