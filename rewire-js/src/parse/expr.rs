use super::unexpected;
use super::ParseCtx;
use super::Parser;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::operator::AssignOp;
use crate::operator::BinaryOp;
use crate::operator::Precedence;
use crate::operator::UnaryOp;
use crate::operator::UpdateOp;
use crate::token::Token;
use crate::token::TT;

fn binary_op(typ: TT) -> Option<BinaryOp> {
  Some(match typ {
    TT::Ampersand => BinaryOp::BitAnd,
    TT::AmpersandAmpersand => BinaryOp::LogicalAnd,
    TT::Asterisk => BinaryOp::Mul,
    TT::AsteriskAsterisk => BinaryOp::Exp,
    TT::Bar => BinaryOp::BitOr,
    TT::BarBar => BinaryOp::LogicalOr,
    TT::Caret => BinaryOp::BitXor,
    TT::ChevronLeft => BinaryOp::Lt,
    TT::ChevronLeftChevronLeft => BinaryOp::Shl,
    TT::ChevronLeftEquals => BinaryOp::Lte,
    TT::ChevronRight => BinaryOp::Gt,
    TT::ChevronRightChevronRight => BinaryOp::Shr,
    TT::ChevronRightChevronRightChevronRight => BinaryOp::UShr,
    TT::ChevronRightEquals => BinaryOp::Gte,
    TT::EqualsEquals => BinaryOp::Eq,
    TT::EqualsEqualsEquals => BinaryOp::StrictEq,
    TT::ExclamationEquals => BinaryOp::Neq,
    TT::ExclamationEqualsEquals => BinaryOp::StrictNeq,
    TT::Hyphen => BinaryOp::Sub,
    TT::KeywordIn => BinaryOp::In,
    TT::KeywordInstanceof => BinaryOp::Instanceof,
    TT::Percent => BinaryOp::Rem,
    TT::Plus => BinaryOp::Add,
    TT::QuestionQuestion => BinaryOp::Nullish,
    TT::Slash => BinaryOp::Div,
    _ => return None,
  })
}

fn assign_op(typ: TT) -> Option<AssignOp> {
  Some(match typ {
    TT::Equals => AssignOp::Assign,
    TT::AmpersandAmpersandEquals => AssignOp::LogicalAnd,
    TT::AmpersandEquals => AssignOp::BitAnd,
    TT::AsteriskAsteriskEquals => AssignOp::Exp,
    TT::AsteriskEquals => AssignOp::Mul,
    TT::BarBarEquals => AssignOp::LogicalOr,
    TT::BarEquals => AssignOp::BitOr,
    TT::CaretEquals => AssignOp::BitXor,
    TT::ChevronLeftChevronLeftEquals => AssignOp::Shl,
    TT::ChevronRightChevronRightChevronRightEquals => AssignOp::UShr,
    TT::ChevronRightChevronRightEquals => AssignOp::Shr,
    TT::HyphenEquals => AssignOp::Sub,
    TT::PercentEquals => AssignOp::Rem,
    TT::PlusEquals => AssignOp::Add,
    TT::QuestionQuestionEquals => AssignOp::Nullish,
    TT::SlashEquals => AssignOp::Div,
    _ => return None,
  })
}

fn unary_op(typ: TT) -> Option<UnaryOp> {
  Some(match typ {
    TT::Exclamation => UnaryOp::Not,
    TT::Hyphen => UnaryOp::Neg,
    TT::KeywordDelete => UnaryOp::Delete,
    TT::KeywordTypeof => UnaryOp::Typeof,
    TT::KeywordVoid => UnaryOp::Void,
    TT::Plus => UnaryOp::Pos,
    TT::Tilde => UnaryOp::BitNot,
    _ => return None,
  })
}

fn update_op(typ: TT) -> Option<UpdateOp> {
  match typ {
    TT::PlusPlus => Some(UpdateOp::Increment),
    TT::HyphenHyphen => Some(UpdateOp::Decrement),
    _ => None,
  }
}

// Tokens after which `yield` has no operand.
fn ends_operand(t: &Token) -> bool {
  t.preceded_by_line_terminator
    || matches!(
      t.typ,
      TT::BraceClose
        | TT::BracketClose
        | TT::Colon
        | TT::Comma
        | TT::EOF
        | TT::ParenthesisClose
        | TT::Semicolon
    )
}

impl<'a> Parser<'a> {
  /// Parses a full Expression, including the comma operator.
  pub fn parse_expr(&mut self) -> SyntaxResult<NodeId> {
    let first = self.parse_assign()?;
    if !self.peek_is(TT::Comma) {
      return Ok(first);
    }
    let mut loc = self.loc_of(first);
    let mut exprs = vec![first];
    while self.consume_if(TT::Comma).is_some() {
      let e = self.parse_assign()?;
      loc.extend(self.loc_of(e));
      exprs.push(e);
    }
    Ok(self.alloc(loc, Syntax::Seq { exprs }))
  }

  /// Parses an AssignmentExpression: arrows, `yield`, assignments and everything tighter.
  pub fn parse_assign(&mut self) -> SyntaxResult<NodeId> {
    if self.ctx().in_generator && self.peek_is_word("yield") {
      return self.parse_yield();
    }
    if let Some(arrow) = self.try_parse_arrow()? {
      return Ok(arrow);
    }
    let target = self.parse_conditional()?;
    let t = self.peek();
    let Some(op) = assign_op(t.typ) else {
      return Ok(target);
    };
    self.check_assign_target(target, op)?;
    self.consume();
    let value = self.parse_assign()?;
    let loc = self.loc_of(target) + self.loc_of(value);
    Ok(self.alloc(loc, Syntax::Assign { op, target, value }))
  }

  fn check_assign_target(&self, target: NodeId, op: AssignOp) -> SyntaxResult<()> {
    match self.arena().stx(target) {
      Syntax::Id { .. } | Syntax::Member { optional: false, .. } => Ok(()),
      Syntax::ComputedMember { optional: false, .. } => Ok(()),
      // Destructuring assignment.
      Syntax::Array { .. } | Syntax::Object { .. } if op == AssignOp::Assign => Ok(()),
      _ => Err(
        self
          .loc_of(target)
          .error(SyntaxErrorType::InvalidAssigmentTarget, None),
      ),
    }
  }

  fn parse_yield(&mut self) -> SyntaxResult<NodeId> {
    let start = self.consume();
    let delegate = self.consume_if(TT::Asterisk).is_some();
    let next = self.peek();
    let arg = if !delegate && ends_operand(&next) {
      None
    } else {
      Some(self.parse_assign()?)
    };
    let loc = arg.map_or(start.loc, |a| start.loc + self.loc_of(a));
    Ok(self.alloc(loc, Syntax::Yield { arg, delegate }))
  }

  // Returns None without consuming anything if the upcoming tokens aren't an arrow function head.
  fn try_parse_arrow(&mut self) -> SyntaxResult<Option<NodeId>> {
    let (a, b, c) = self.peek_3();
    let is_async = self.is_word(&a, "async") && !b.preceded_by_line_terminator;
    let single_param =
      a.typ == TT::Identifier && b.typ == TT::EqualsChevronRight && !b.preceded_by_line_terminator;
    let async_single_param = is_async
      && b.typ == TT::Identifier
      && c.typ == TT::EqualsChevronRight
      && !c.preceded_by_line_terminator;
    if single_param || async_single_param {
      if async_single_param {
        self.consume();
      }
      let (loc, name) = self.require_identifier()?;
      let param = self.alloc(loc, Syntax::IdPat { name });
      self.require(TT::EqualsChevronRight)?;
      return self
        .parse_arrow_body(a.loc, async_single_param, vec![param])
        .map(Some);
    }

    let parenthesized = a.typ == TT::ParenthesisOpen;
    let async_parenthesized = is_async && b.typ == TT::ParenthesisOpen;
    if !parenthesized && !async_parenthesized {
      return Ok(None);
    }
    let cp = self.checkpoint();
    if async_parenthesized {
      self.consume();
    }
    let params = match self.parse_params() {
      Ok(params) => params,
      Err(_) => {
        self.restore_checkpoint(cp);
        return Ok(None);
      }
    };
    let arrow = self.peek();
    if arrow.typ != TT::EqualsChevronRight || arrow.preceded_by_line_terminator {
      self.restore_checkpoint(cp);
      return Ok(None);
    }
    self.consume();
    self
      .parse_arrow_body(a.loc, async_parenthesized, params)
      .map(Some)
  }

  fn parse_arrow_body(
    &mut self,
    start: Loc,
    is_async: bool,
    params: Vec<NodeId>,
  ) -> SyntaxResult<NodeId> {
    let outer = self.ctx();
    let ctx = ParseCtx {
      in_allowed: outer.in_allowed,
      in_async: is_async,
      in_generator: false,
      function_depth: outer.function_depth + 1,
    };
    let body = if self.peek_is(TT::BraceOpen) {
      self.with_ctx(ctx, |p| p.parse_function_body())?
    } else {
      self.with_ctx(ctx, |p| p.parse_assign())?
    };
    let loc = start + self.loc_of(body);
    Ok(self.alloc(loc, Syntax::Arrow {
      is_async,
      params,
      body,
    }))
  }

  fn parse_conditional(&mut self) -> SyntaxResult<NodeId> {
    let test = self.parse_binary(Precedence::Nullish)?;
    if self.consume_if(TT::Question).is_none() {
      return Ok(test);
    }
    let cons = self.with_in_allowed(true, |p| p.parse_assign())?;
    self.require(TT::Colon)?;
    let alt = self.parse_assign()?;
    let loc = self.loc_of(test) + self.loc_of(alt);
    Ok(self.alloc(loc, Syntax::Cond { test, cons, alt }))
  }

  fn parse_binary(&mut self, min: Precedence) -> SyntaxResult<NodeId> {
    let mut left = self.parse_unary()?;
    loop {
      let t = self.peek();
      let Some(op) = binary_op(t.typ) else {
        break;
      };
      if op == BinaryOp::In && !self.ctx().in_allowed {
        break;
      }
      let prec = op.precedence();
      if prec < min {
        break;
      }
      self.consume();
      let right = if op.is_right_associative() {
        self.parse_binary(prec)?
      } else {
        self.parse_binary(prec.next_tighter())?
      };
      let loc = self.loc_of(left) + self.loc_of(right);
      left = self.alloc(loc, Syntax::Binary { op, left, right });
    }
    Ok(left)
  }

  fn parse_unary(&mut self) -> SyntaxResult<NodeId> {
    let t = self.peek();
    if let Some(op) = unary_op(t.typ) {
      self.consume();
      let arg = self.parse_unary()?;
      let loc = t.loc + self.loc_of(arg);
      return Ok(self.alloc(loc, Syntax::Unary { op, arg }));
    }
    if let Some(op) = update_op(t.typ) {
      self.consume();
      let arg = self.parse_unary()?;
      self.check_update_target(arg)?;
      let loc = t.loc + self.loc_of(arg);
      return Ok(self.alloc(loc, Syntax::Update {
        op,
        prefix: true,
        arg,
      }));
    }
    let ctx = self.ctx();
    if (ctx.in_async || ctx.function_depth == 0) && self.is_word(&t, "await") {
      self.consume();
      let arg = self.parse_unary()?;
      let loc = t.loc + self.loc_of(arg);
      return Ok(self.alloc(loc, Syntax::Await { arg }));
    }

    let arg = self.parse_lhs()?;
    let next = self.peek();
    match update_op(next.typ) {
      Some(op) if !next.preceded_by_line_terminator => {
        self.check_update_target(arg)?;
        self.consume();
        let loc = self.loc_of(arg) + next.loc;
        Ok(self.alloc(loc, Syntax::Update {
          op,
          prefix: false,
          arg,
        }))
      }
      _ => Ok(arg),
    }
  }

  fn check_update_target(&self, arg: NodeId) -> SyntaxResult<()> {
    match self.arena().stx(arg) {
      Syntax::Id { .. }
      | Syntax::Member { optional: false, .. }
      | Syntax::ComputedMember { optional: false, .. } => Ok(()),
      _ => Err(
        self
          .loc_of(arg)
          .error(SyntaxErrorType::InvalidAssigmentTarget, None),
      ),
    }
  }

  /// Parses a LeftHandSideExpression: a primary or `new` expression followed by any chain of
  /// member accesses, calls and tagged templates.
  pub fn parse_lhs(&mut self) -> SyntaxResult<NodeId> {
    let expr = if self.peek_is(TT::KeywordNew) {
      self.parse_new()?
    } else {
      self.parse_primary()?
    };
    self.parse_chain(expr, true)
  }

  fn parse_new(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordNew)?;
    if self.consume_if(TT::Dot).is_some() {
      // `new.target`.
      let (loc, property) = self.require_identifier_name()?;
      let object = self.alloc(start.loc, Syntax::Id { name: "new".into() });
      return Ok(self.alloc(start.loc + loc, Syntax::Member {
        object,
        property,
        optional: false,
      }));
    }
    let callee = if self.peek_is(TT::KeywordNew) {
      self.parse_new()?
    } else {
      self.parse_primary()?
    };
    let callee = self.parse_chain(callee, false)?;
    let (args, end) = if self.peek_is(TT::ParenthesisOpen) {
      self.parse_args()?
    } else {
      (Vec::new(), self.loc_of(callee))
    };
    Ok(self.alloc(start.loc + end, Syntax::New { callee, args }))
  }

  /// Parses a parenthesized argument list, returning the arguments and the location of `)`.
  pub fn parse_args(&mut self) -> SyntaxResult<(Vec<NodeId>, Loc)> {
    self.require(TT::ParenthesisOpen)?;
    let mut args = Vec::new();
    self.with_in_allowed(true, |p| {
      loop {
        if p.peek_is(TT::ParenthesisClose) {
          break;
        }
        if let Some(spread) = p.consume_if(TT::DotDotDot) {
          let arg = p.parse_assign()?;
          let loc = spread.loc + p.loc_of(arg);
          args.push(p.alloc(loc, Syntax::Spread { arg }));
        } else {
          args.push(p.parse_assign()?);
        }
        if p.consume_if(TT::Comma).is_none() {
          break;
        }
      }
      Ok(())
    })?;
    let end = self.require(TT::ParenthesisClose)?;
    Ok((args, end.loc))
  }

  fn parse_member_name(&mut self) -> SyntaxResult<(Loc, String)> {
    if let Some(t) = self.consume_if(TT::PrivateMember) {
      return Ok((t.loc, self.string(t.loc)));
    }
    self.require_identifier_name()
  }

  fn parse_chain(&mut self, mut expr: NodeId, allow_call: bool) -> SyntaxResult<NodeId> {
    loop {
      let t = self.peek();
      let start = self.loc_of(expr);
      expr = match t.typ {
        TT::Dot => {
          self.consume();
          let (loc, property) = self.parse_member_name()?;
          self.alloc(start + loc, Syntax::Member {
            object: expr,
            property,
            optional: false,
          })
        }
        TT::QuestionDot => {
          if !allow_call {
            break;
          }
          self.consume();
          match self.peek().typ {
            TT::ParenthesisOpen => {
              let (args, end) = self.parse_args()?;
              self.alloc(start + end, Syntax::Call {
                callee: expr,
                args,
                optional: true,
              })
            }
            TT::BracketOpen => {
              self.consume();
              let property = self.with_in_allowed(true, |p| p.parse_expr())?;
              let end = self.require(TT::BracketClose)?;
              self.alloc(start + end.loc, Syntax::ComputedMember {
                object: expr,
                property,
                optional: true,
              })
            }
            _ => {
              let (loc, property) = self.parse_member_name()?;
              self.alloc(start + loc, Syntax::Member {
                object: expr,
                property,
                optional: true,
              })
            }
          }
        }
        TT::BracketOpen => {
          self.consume();
          let property = self.with_in_allowed(true, |p| p.parse_expr())?;
          let end = self.require(TT::BracketClose)?;
          self.alloc(start + end.loc, Syntax::ComputedMember {
            object: expr,
            property,
            optional: false,
          })
        }
        TT::ParenthesisOpen if allow_call => {
          let (args, end) = self.parse_args()?;
          self.alloc(start + end, Syntax::Call {
            callee: expr,
            args,
            optional: false,
          })
        }
        TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd => {
          let first = self.consume();
          let template = self.parse_template_after_first_part(first)?;
          let loc = start + self.loc_of(template);
          self.alloc(loc, Syntax::TaggedTemplate {
            tag: expr,
            template,
          })
        }
        _ => break,
      };
    }
    Ok(expr)
  }

  fn parse_primary(&mut self) -> SyntaxResult<NodeId> {
    let t = self.peek_with_mode(LexMode::SlashIsRegex);
    let simple = match t.typ {
      TT::KeywordThis => Some(Syntax::This),
      TT::KeywordSuper => Some(Syntax::Super),
      TT::LiteralNull => Some(Syntax::LitNull),
      TT::LiteralTrue => Some(Syntax::LitBool { value: true }),
      TT::LiteralFalse => Some(Syntax::LitBool { value: false }),
      TT::LiteralNumber => Some(Syntax::LitNum {
        raw: self.string(t.loc),
      }),
      TT::LiteralBigInt => Some(Syntax::LitBigInt {
        raw: self.string(t.loc),
      }),
      TT::LiteralRegex => Some(Syntax::LitRegex {
        raw: self.string(t.loc),
      }),
      _ => None,
    };
    if let Some(stx) = simple {
      self.consume_with_mode(LexMode::SlashIsRegex);
      return Ok(self.alloc(t.loc, stx));
    }

    match t.typ {
      TT::Identifier => {
        let (_, next) = self.peek_2();
        if self.is_word(&t, "async")
          && next.typ == TT::KeywordFunction
          && !next.preceded_by_line_terminator
        {
          return self.parse_func_expr();
        }
        self.consume();
        Ok(self.alloc(t.loc, Syntax::Id {
          name: self.string(t.loc),
        }))
      }
      TT::LiteralString => {
        self.consume();
        let value = self.parse_lit_str(&t)?;
        Ok(self.alloc(t.loc, Syntax::LitStr { value }))
      }
      TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd => {
        let first = self.consume();
        self.parse_template_after_first_part(first)
      }
      TT::ParenthesisOpen => {
        self.consume();
        let expr = self.with_in_allowed(true, |p| p.parse_expr())?;
        self.require(TT::ParenthesisClose)?;
        Ok(expr)
      }
      TT::BracketOpen => self.parse_array_lit(),
      TT::BraceOpen => self.parse_object_lit(),
      TT::KeywordFunction => self.parse_func_expr(),
      TT::KeywordClass => self.parse_class_expr(),
      TT::ChevronLeft => self.parse_jsx_elem(),
      TT::KeywordImport => {
        self.consume();
        if self.consume_if(TT::Dot).is_some() {
          // `import.meta`.
          let (loc, property) = self.require_identifier_name()?;
          let object = self.alloc(t.loc, Syntax::Id {
            name: "import".into(),
          });
          return Ok(self.alloc(t.loc + loc, Syntax::Member {
            object,
            property,
            optional: false,
          }));
        }
        let (args, end) = self.parse_args()?;
        Ok(self.alloc(t.loc + end, Syntax::ImportCall { args }))
      }
      TT::Invalid => Err(self.invalid_token_error(&t)),
      _ => Err(unexpected(&t, SyntaxErrorType::ExpectedSyntax("expression"))),
    }
  }

  fn invalid_token_error(&self, t: &Token) -> crate::error::SyntaxError {
    let raw = self.str(t.loc);
    let typ = match raw.chars().next() {
      Some('"' | '\'') if raw.contains('\n') => SyntaxErrorType::LineTerminatorInString,
      Some('"' | '\'' | '`' | '/') => SyntaxErrorType::UnterminatedLiteral,
      Some(c) if c.is_ascii_digit() || c == '.' => SyntaxErrorType::MalformedLiteralNumber,
      _ => SyntaxErrorType::ExpectedSyntax("expression"),
    };
    t.loc.error(typ, Some(TT::Invalid))
  }

  fn parse_array_lit(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::BracketOpen)?;
    let mut elements = Vec::new();
    self.with_in_allowed(true, |p| {
      loop {
        if p.peek_is(TT::BracketClose) {
          break;
        }
        if p.consume_if(TT::Comma).is_some() {
          elements.push(None);
          continue;
        }
        if let Some(spread) = p.consume_if(TT::DotDotDot) {
          let arg = p.parse_assign()?;
          let loc = spread.loc + p.loc_of(arg);
          elements.push(Some(p.alloc(loc, Syntax::Spread { arg })));
        } else {
          elements.push(Some(p.parse_assign()?));
        }
        if p.consume_if(TT::Comma).is_none() {
          break;
        }
      }
      Ok(())
    })?;
    let end = self.require(TT::BracketClose)?;
    Ok(self.alloc(start.loc + end.loc, Syntax::Array { elements }))
  }
}
