use super::unexpected;
use super::Parser;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::ast::VarDeclKind;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn parse_stmt(&mut self) -> SyntaxResult<NodeId> {
    let (t, next) = self.peek_2();
    match t.typ {
      TT::BraceOpen => self.parse_block(),
      TT::Semicolon => {
        self.consume();
        Ok(self.alloc(t.loc, Syntax::Empty))
      }
      TT::KeywordVar | TT::KeywordConst => self.parse_var_stmt(),
      TT::Identifier
        if self.is_word(&t, "let")
          && matches!(
            next.typ,
            TT::Identifier | TT::BracketOpen | TT::BraceOpen
          ) =>
      {
        self.parse_var_stmt()
      }
      TT::Identifier
        if self.is_word(&t, "async")
          && next.typ == TT::KeywordFunction
          && !next.preceded_by_line_terminator =>
      {
        self.parse_func_decl(false)
      }
      TT::Identifier if next.typ == TT::Colon => {
        self.consume();
        self.consume();
        let label = self.string(t.loc);
        let body = self.parse_stmt()?;
        let loc = t.loc + self.loc_of(body);
        Ok(self.alloc(loc, Syntax::Labeled { label, body }))
      }
      TT::KeywordFunction => self.parse_func_decl(false),
      TT::KeywordClass => self.parse_class_decl(false),
      TT::KeywordIf => self.parse_if(),
      TT::KeywordFor => self.parse_for(),
      TT::KeywordWhile => {
        self.consume();
        let test = self.parse_paren_expr()?;
        let body = self.parse_stmt()?;
        let loc = t.loc + self.loc_of(body);
        Ok(self.alloc(loc, Syntax::While { test, body }))
      }
      TT::KeywordDo => {
        self.consume();
        let body = self.parse_stmt()?;
        self.require(TT::KeywordWhile)?;
        let test = self.parse_paren_expr()?;
        // The semicolon after `do ... while (...)` is always optional.
        let end = self.consume_if(TT::Semicolon);
        let mut loc = t.loc + self.loc_of(test);
        if let Some(end) = end {
          loc.extend(end.loc);
        }
        Ok(self.alloc(loc, Syntax::DoWhile { body, test }))
      }
      TT::KeywordReturn => {
        self.consume();
        let after = self.peek();
        let arg = if after.preceded_by_line_terminator
          || matches!(after.typ, TT::Semicolon | TT::BraceClose | TT::EOF)
        {
          None
        } else {
          Some(self.parse_expr()?)
        };
        self.require_semicolon()?;
        let loc = arg.map_or(t.loc, |a| t.loc + self.loc_of(a));
        Ok(self.alloc(loc, Syntax::Return { arg }))
      }
      TT::KeywordThrow => {
        self.consume();
        let after = self.peek();
        if after.preceded_by_line_terminator {
          return Err(unexpected(
            &after,
            SyntaxErrorType::ExpectedSyntax("expression on the same line as `throw`"),
          ));
        }
        let arg = self.parse_expr()?;
        self.require_semicolon()?;
        let loc = t.loc + self.loc_of(arg);
        Ok(self.alloc(loc, Syntax::Throw { arg }))
      }
      TT::KeywordTry => self.parse_try(),
      TT::KeywordBreak | TT::KeywordContinue => {
        self.consume();
        let after = self.peek();
        let label = if after.typ == TT::Identifier && !after.preceded_by_line_terminator {
          self.consume();
          Some(self.string(after.loc))
        } else {
          None
        };
        self.require_semicolon()?;
        let stx = if t.typ == TT::KeywordBreak {
          Syntax::Break { label }
        } else {
          Syntax::Continue { label }
        };
        Ok(self.alloc(t.loc, stx))
      }
      TT::KeywordSwitch => self.parse_switch(),
      TT::KeywordDebugger => {
        self.consume();
        self.require_semicolon()?;
        Ok(self.alloc(t.loc, Syntax::Debugger))
      }
      TT::KeywordImport if !matches!(next.typ, TT::ParenthesisOpen | TT::Dot) => {
        self.parse_import()
      }
      TT::KeywordExport => self.parse_export(),
      _ => self.parse_expr_stmt(),
    }
  }

  pub fn parse_expr_stmt(&mut self) -> SyntaxResult<NodeId> {
    let expr = self.parse_expr()?;
    self.require_semicolon()?;
    let loc = self.loc_of(expr);
    Ok(self.alloc(loc, Syntax::ExprStmt { expr }))
  }

  fn parse_block(&mut self) -> SyntaxResult<NodeId> {
    let (body, loc) = self.parse_braced_stmts()?;
    Ok(self.alloc(loc, Syntax::Block { body }))
  }

  fn parse_paren_expr(&mut self) -> SyntaxResult<NodeId> {
    self.require(TT::ParenthesisOpen)?;
    let expr = self.with_in_allowed(true, |p| p.parse_expr())?;
    self.require(TT::ParenthesisClose)?;
    Ok(expr)
  }

  /// Parses `var`, `let` or `const` and its declarators, without the terminating semicolon.
  pub fn parse_var_decl(&mut self) -> SyntaxResult<NodeId> {
    let t = self.consume();
    let kind = match t.typ {
      TT::KeywordVar => VarDeclKind::Var,
      TT::KeywordConst => VarDeclKind::Const,
      _ if self.is_word(&t, "let") => VarDeclKind::Let,
      _ => {
        return Err(unexpected(
          &t,
          SyntaxErrorType::ExpectedSyntax("variable declaration"),
        ))
      }
    };
    let mut loc = t.loc;
    let mut declarators = Vec::new();
    loop {
      let pat = self.parse_pattern()?;
      let init = if self.consume_if(TT::Equals).is_some() {
        Some(self.parse_assign()?)
      } else {
        None
      };
      let mut decl_loc = self.loc_of(pat);
      if let Some(init) = init {
        decl_loc.extend(self.loc_of(init));
      }
      loc.extend(decl_loc);
      declarators.push(self.alloc(decl_loc, Syntax::Declarator { pat, init }));
      if self.consume_if(TT::Comma).is_none() {
        break;
      }
    }
    Ok(self.alloc(loc, Syntax::VarDecl { kind, declarators }))
  }

  pub fn parse_var_stmt(&mut self) -> SyntaxResult<NodeId> {
    let decl = self.parse_var_decl()?;
    self.require_semicolon()?;
    Ok(decl)
  }

  fn parse_if(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordIf)?;
    let test = self.parse_paren_expr()?;
    let cons = self.parse_stmt()?;
    let alt = if self.consume_if(TT::KeywordElse).is_some() {
      Some(self.parse_stmt()?)
    } else {
      None
    };
    let loc = start.loc + self.loc_of(alt.unwrap_or(cons));
    Ok(self.alloc(loc, Syntax::If { test, cons, alt }))
  }

  fn parse_for(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordFor)?;
    self.require(TT::ParenthesisOpen)?;
    let (a, b) = self.peek_2();
    let init = if a.typ == TT::Semicolon {
      None
    } else if matches!(a.typ, TT::KeywordVar | TT::KeywordConst)
      || (self.is_word(&a, "let")
        && matches!(b.typ, TT::Identifier | TT::BracketOpen | TT::BraceOpen))
    {
      Some(self.with_in_allowed(false, |p| p.parse_var_decl())?)
    } else {
      Some(self.with_in_allowed(false, |p| p.parse_expr())?)
    };

    if let Some(left) = init {
      let of = self.peek_is_word("of");
      if of || self.peek_is(TT::KeywordIn) {
        self.consume();
        let right = if of {
          self.with_in_allowed(true, |p| p.parse_assign())?
        } else {
          self.with_in_allowed(true, |p| p.parse_expr())?
        };
        self.require(TT::ParenthesisClose)?;
        let body = self.parse_stmt()?;
        let loc = start.loc + self.loc_of(body);
        return Ok(self.alloc(loc, Syntax::ForIn {
          of,
          left,
          right,
          body,
        }));
      }
    }

    self.require(TT::Semicolon)?;
    let test = if self.peek_is(TT::Semicolon) {
      None
    } else {
      Some(self.with_in_allowed(true, |p| p.parse_expr())?)
    };
    self.require(TT::Semicolon)?;
    let update = if self.peek_is(TT::ParenthesisClose) {
      None
    } else {
      Some(self.with_in_allowed(true, |p| p.parse_expr())?)
    };
    self.require(TT::ParenthesisClose)?;
    let body = self.parse_stmt()?;
    let loc = start.loc + self.loc_of(body);
    Ok(self.alloc(loc, Syntax::For {
      init,
      test,
      update,
      body,
    }))
  }

  fn parse_try(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordTry)?;
    let block = self.parse_block()?;
    let mut loc = start.loc + self.loc_of(block);
    let handler = if let Some(catch) = self.consume_if(TT::KeywordCatch) {
      let param = if self.consume_if(TT::ParenthesisOpen).is_some() {
        let param = self.parse_pattern()?;
        self.require(TT::ParenthesisClose)?;
        Some(param)
      } else {
        None
      };
      let body = self.parse_block()?;
      let catch_loc = catch.loc + self.loc_of(body);
      loc.extend(catch_loc);
      Some(self.alloc(catch_loc, Syntax::Catch { param, body }))
    } else {
      None
    };
    let finalizer = if self.consume_if(TT::KeywordFinally).is_some() {
      let body = self.parse_block()?;
      loc.extend(self.loc_of(body));
      Some(body)
    } else {
      None
    };
    if handler.is_none() && finalizer.is_none() {
      return Err(loc.error(SyntaxErrorType::TryStatementHasNoCatchOrFinally, None));
    }
    Ok(self.alloc(loc, Syntax::Try {
      block,
      handler,
      finalizer,
    }))
  }

  fn parse_switch(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordSwitch)?;
    let discriminant = self.parse_paren_expr()?;
    self.require(TT::BraceOpen)?;
    let mut cases = Vec::new();
    loop {
      let t = self.peek();
      let test = match t.typ {
        TT::BraceClose => break,
        TT::KeywordCase => {
          self.consume();
          Some(self.with_in_allowed(true, |p| p.parse_expr())?)
        }
        TT::KeywordDefault => {
          self.consume();
          None
        }
        _ => {
          return Err(unexpected(
            &t,
            SyntaxErrorType::ExpectedSyntax("`case` or `default`"),
          ))
        }
      };
      self.require(TT::Colon)?;
      let mut body = Vec::new();
      while !matches!(
        self.peek().typ,
        TT::KeywordCase | TT::KeywordDefault | TT::BraceClose | TT::EOF
      ) {
        body.push(self.parse_stmt()?);
      }
      cases.push(self.alloc(t.loc, Syntax::SwitchCase { test, body }));
    }
    let end = self.require(TT::BraceClose)?;
    Ok(self.alloc(start.loc + end.loc, Syntax::Switch {
      discriminant,
      cases,
    }))
  }
}
