use super::unexpected;
use super::Parser;
use crate::ast::NodeId;
use crate::ast::PropKey;
use crate::ast::Syntax;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Parses a binding pattern: an identifier, or an array or object destructuring pattern.
  pub fn parse_pattern(&mut self) -> SyntaxResult<NodeId> {
    let t = self.peek();
    match t.typ {
      TT::Identifier => {
        let (loc, name) = self.require_identifier()?;
        Ok(self.alloc(loc, Syntax::IdPat { name }))
      }
      TT::BracketOpen => self.parse_array_pattern(),
      TT::BraceOpen => self.parse_object_pattern(),
      _ => Err(unexpected(&t, SyntaxErrorType::ExpectedSyntax("pattern"))),
    }
  }

  /// Parses a binding pattern optionally followed by `= default`.
  pub fn parse_pattern_with_default(&mut self) -> SyntaxResult<NodeId> {
    let target = self.parse_pattern()?;
    if self.consume_if(TT::Equals).is_none() {
      return Ok(target);
    }
    let default = self.with_in_allowed(true, |p| p.parse_assign())?;
    let loc = self.loc_of(target) + self.loc_of(default);
    Ok(self.alloc(loc, Syntax::AssignPat { target, default }))
  }

  fn parse_rest_pattern(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::DotDotDot)?;
    let target = self.parse_pattern()?;
    let loc = start.loc + self.loc_of(target);
    Ok(self.alloc(loc, Syntax::RestPat { target }))
  }

  fn parse_array_pattern(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::BracketOpen)?;
    let mut elements = Vec::new();
    loop {
      if self.peek_is(TT::BracketClose) {
        break;
      }
      if self.consume_if(TT::Comma).is_some() {
        elements.push(None);
        continue;
      }
      if self.peek_is(TT::DotDotDot) {
        elements.push(Some(self.parse_rest_pattern()?));
        break;
      }
      elements.push(Some(self.parse_pattern_with_default()?));
      if self.consume_if(TT::Comma).is_none() {
        break;
      }
    }
    let end = self.require(TT::BracketClose)?;
    Ok(self.alloc(start.loc + end.loc, Syntax::ArrayPat { elements }))
  }

  fn parse_object_pattern(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::BraceOpen)?;
    let mut props = Vec::new();
    loop {
      if self.peek_is(TT::BraceClose) {
        break;
      }
      if self.peek_is(TT::DotDotDot) {
        props.push(self.parse_rest_pattern()?);
        break;
      }
      let key_tok = self.peek();
      let key = self.parse_prop_key()?;
      let prop = if self.consume_if(TT::Colon).is_some() {
        let target = self.parse_pattern_with_default()?;
        let loc = key_tok.loc + self.loc_of(target);
        self.alloc(loc, Syntax::ObjPatProp {
          key,
          target,
          shorthand: false,
        })
      } else {
        // Shorthand: `{a}` or `{a = 1}`.
        let PropKey::Direct { name } = &key else {
          return Err(unexpected(&key_tok, SyntaxErrorType::ExpectedSyntax("`:`")));
        };
        if key_tok.typ != TT::Identifier {
          return Err(unexpected(&key_tok, SyntaxErrorType::ExpectedSyntax("identifier")));
        }
        let mut target = self.alloc(key_tok.loc, Syntax::IdPat { name: name.clone() });
        if self.consume_if(TT::Equals).is_some() {
          let default = self.with_in_allowed(true, |p| p.parse_assign())?;
          let loc = key_tok.loc + self.loc_of(default);
          target = self.alloc(loc, Syntax::AssignPat { target, default });
        }
        let loc = self.loc_of(target);
        self.alloc(loc, Syntax::ObjPatProp {
          key,
          target,
          shorthand: true,
        })
      };
      props.push(prop);
      if self.consume_if(TT::Comma).is_none() {
        break;
      }
    }
    let end = self.require(TT::BraceClose)?;
    Ok(self.alloc(start.loc + end.loc, Syntax::ObjPat { props }))
  }
}
