use super::ParseCtx;
use super::Parser;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::token::TT;

// The parsed `[async] function [*] [name]` head shared by declarations and expressions.
struct FuncHead {
  start: Loc,
  is_async: bool,
  generator: bool,
  name: Option<String>,
}

impl<'a> Parser<'a> {
  /// Parses a parenthesized formal parameter list.
  pub fn parse_params(&mut self) -> SyntaxResult<Vec<NodeId>> {
    self.require(TT::ParenthesisOpen)?;
    let mut params = Vec::new();
    self.with_in_allowed(true, |p| {
      loop {
        if p.peek_is(TT::ParenthesisClose) {
          break;
        }
        if let Some(rest) = p.consume_if(TT::DotDotDot) {
          let target = p.parse_pattern()?;
          let loc = rest.loc + p.loc_of(target);
          params.push(p.alloc(loc, Syntax::RestPat { target }));
          break;
        }
        params.push(p.parse_pattern_with_default()?);
        if p.consume_if(TT::Comma).is_none() {
          break;
        }
      }
      Ok(())
    })?;
    self.require(TT::ParenthesisClose)?;
    Ok(params)
  }

  /// Parses `{ ... }` as a list of statements, returning them with the location of the braces.
  pub fn parse_braced_stmts(&mut self) -> SyntaxResult<(Vec<NodeId>, Loc)> {
    let start = self.require(TT::BraceOpen)?;
    let mut body = Vec::new();
    while !self.peek_is(TT::BraceClose) {
      body.push(self.parse_stmt()?);
    }
    let end = self.require(TT::BraceClose)?;
    Ok((body, start.loc + end.loc))
  }

  /// Parses `{ ... }` as a function body, using the current context.
  pub fn parse_function_body(&mut self) -> SyntaxResult<NodeId> {
    let (body, loc) = self.parse_braced_stmts()?;
    Ok(self.alloc(loc, Syntax::Block { body }))
  }

  /// Parses the parameters and body of a function or method into a Function node.
  pub fn parse_func_rest(
    &mut self,
    start: Loc,
    is_async: bool,
    generator: bool,
  ) -> SyntaxResult<NodeId> {
    let ctx = ParseCtx {
      in_allowed: true,
      in_async: is_async,
      in_generator: generator,
      function_depth: self.ctx().function_depth + 1,
    };
    self.with_ctx(ctx, |p| {
      let params = p.parse_params()?;
      let body = p.parse_function_body()?;
      let loc = start + p.loc_of(body);
      Ok(p.alloc(loc, Syntax::Function {
        is_async,
        generator,
        params,
        body,
      }))
    })
  }

  fn parse_func_head(&mut self) -> SyntaxResult<FuncHead> {
    let first = self.peek();
    let is_async = self.consume_if_word("async").is_some();
    self.require(TT::KeywordFunction)?;
    let generator = self.consume_if(TT::Asterisk).is_some();
    let name = if self.peek_is(TT::Identifier) {
      Some(self.require_identifier()?.1)
    } else {
      None
    };
    Ok(FuncHead {
      start: first.loc,
      is_async,
      generator,
      name,
    })
  }

  /// Parses a function declaration. The name may only be omitted when `name_optional` is set, as
  /// in `export default function () {}`.
  pub fn parse_func_decl(&mut self, name_optional: bool) -> SyntaxResult<NodeId> {
    let head = self.parse_func_head()?;
    if head.name.is_none() && !name_optional {
      // Report the missing name at the token that should have been it.
      self.require_identifier()?;
    }
    let func = self.parse_func_rest(head.start, head.is_async, head.generator)?;
    let loc = self.loc_of(func);
    Ok(self.alloc(loc, Syntax::FuncDecl {
      name: head.name,
      func,
    }))
  }

  pub fn parse_func_expr(&mut self) -> SyntaxResult<NodeId> {
    let head = self.parse_func_head()?;
    let func = self.parse_func_rest(head.start, head.is_async, head.generator)?;
    let loc = self.loc_of(func);
    Ok(self.alloc(loc, Syntax::FuncExpr {
      name: head.name,
      func,
    }))
  }
}
