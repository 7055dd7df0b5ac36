use super::unexpected;
use super::Parser;
use crate::ast::Arena;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::token::TT;

/// Renders a tag name node back to its source form, for matching closing tags.
pub fn jsx_tag_name_str(arena: &Arena, id: NodeId) -> String {
  match arena.stx(id) {
    Syntax::JsxTagName { name } => name.clone(),
    Syntax::JsxTagMember { object, property } => {
      format!("{}.{}", jsx_tag_name_str(arena, *object), property)
    }
    // Tag member bases may have been redirected to plain member expressions.
    Syntax::Member {
      object, property, ..
    } => format!("{}.{}", jsx_tag_name_str(arena, *object), property),
    Syntax::Id { name } => name.clone(),
    _ => String::new(),
  }
}

impl<'a> Parser<'a> {
  // Parses `a`, `a-b`, `a:b` or `a.b.c`.
  fn parse_jsx_tag_name(&mut self) -> SyntaxResult<NodeId> {
    let first = self.require_with_mode(TT::Identifier, LexMode::JsxTag)?;
    let mut name = self.string(first.loc);
    let mut loc = first.loc;
    if self.consume_if_with_mode(TT::Colon, LexMode::JsxTag).is_some() {
      let local = self.require_with_mode(TT::Identifier, LexMode::JsxTag)?;
      name.push(':');
      name.push_str(self.str(local.loc));
      loc.extend(local.loc);
      return Ok(self.alloc(loc, Syntax::JsxTagName { name }));
    }
    let mut tag = self.alloc(loc, Syntax::JsxTagName { name });
    while self.consume_if_with_mode(TT::Dot, LexMode::JsxTag).is_some() {
      let property = self.require_with_mode(TT::Identifier, LexMode::JsxTag)?;
      loc.extend(property.loc);
      tag = self.alloc(loc, Syntax::JsxTagMember {
        object: tag,
        property: self.string(property.loc),
      });
    }
    Ok(tag)
  }

  fn parse_jsx_attr_name(&mut self) -> SyntaxResult<String> {
    let t = self.require_with_mode(TT::Identifier, LexMode::JsxTag)?;
    let mut name = self.string(t.loc);
    if self.consume_if_with_mode(TT::Colon, LexMode::JsxTag).is_some() {
      let local = self.require_with_mode(TT::Identifier, LexMode::JsxTag)?;
      name.push(':');
      name.push_str(self.str(local.loc));
    }
    Ok(name)
  }

  // Parses `{expr}` after the opening brace has been consumed, or `{}`/`{/* comment */}`.
  fn parse_jsx_expr_container_rest(&mut self, start: Loc) -> SyntaxResult<NodeId> {
    let expr = if self.peek_is(TT::BraceClose) {
      None
    } else {
      Some(self.with_in_allowed(true, |p| p.parse_assign())?)
    };
    let end = self.require(TT::BraceClose)?;
    Ok(self.alloc(start + end.loc, Syntax::JsxExprContainer { expr }))
  }

  // Returns the attributes, whether the tag is self-closing, and the location of the final `>`.
  fn parse_jsx_attrs(&mut self) -> SyntaxResult<(Vec<NodeId>, bool, Loc)> {
    let mut attrs = Vec::new();
    loop {
      let t = self.peek_with_mode(LexMode::JsxTag);
      match t.typ {
        TT::Slash => {
          self.consume_with_mode(LexMode::JsxTag);
          let end = self.require_with_mode(TT::ChevronRight, LexMode::JsxTag)?;
          return Ok((attrs, true, end.loc));
        }
        TT::ChevronRight => {
          self.consume_with_mode(LexMode::JsxTag);
          return Ok((attrs, false, t.loc));
        }
        TT::BraceOpen => {
          self.consume_with_mode(LexMode::JsxTag);
          self.require(TT::DotDotDot)?;
          let arg = self.with_in_allowed(true, |p| p.parse_assign())?;
          let end = self.require(TT::BraceClose)?;
          attrs.push(self.alloc(t.loc + end.loc, Syntax::JsxSpreadAttr { arg }));
        }
        TT::Identifier => {
          let name = self.parse_jsx_attr_name()?;
          let value = if self
            .consume_if_with_mode(TT::Equals, LexMode::JsxTag)
            .is_some()
          {
            let v = self.peek_with_mode(LexMode::JsxTag);
            Some(match v.typ {
              TT::LiteralString => {
                self.consume_with_mode(LexMode::JsxTag);
                self.alloc(v.loc, Syntax::JsxStr {
                  raw: self.string(v.loc),
                })
              }
              TT::BraceOpen => {
                self.consume_with_mode(LexMode::JsxTag);
                self.parse_jsx_expr_container_rest(v.loc)?
              }
              TT::ChevronLeft => self.parse_jsx_elem()?,
              _ => {
                return Err(unexpected(
                  &v,
                  SyntaxErrorType::ExpectedSyntax("JSX attribute value"),
                ))
              }
            })
          } else {
            None
          };
          attrs.push(self.alloc(t.loc, Syntax::JsxAttr { name, value }));
        }
        _ => {
          return Err(unexpected(
            &t,
            SyntaxErrorType::ExpectedSyntax("JSX attribute"),
          ))
        }
      }
    }
  }

  fn parse_jsx_children(&mut self) -> SyntaxResult<Vec<NodeId>> {
    let mut children = Vec::new();
    loop {
      let t = self.peek_with_mode(LexMode::JsxTextContent);
      match t.typ {
        TT::JsxTextContent => {
          self.consume_with_mode(LexMode::JsxTextContent);
          children.push(self.alloc(t.loc, Syntax::JsxText {
            raw: self.string(t.loc),
          }));
        }
        TT::BraceOpen => {
          self.consume_with_mode(LexMode::JsxTextContent);
          children.push(self.parse_jsx_expr_container_rest(t.loc)?);
        }
        TT::ChevronLeft => children.push(self.parse_jsx_elem()?),
        TT::ChevronLeftSlash => return Ok(children),
        _ => {
          return Err(unexpected(
            &t,
            SyntaxErrorType::ExpectedSyntax("JSX child"),
          ))
        }
      }
    }
  }

  /// Parses a JSX element or fragment starting at `<`.
  pub fn parse_jsx_elem(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require_with_mode(TT::ChevronLeft, LexMode::JsxTag)?;
    if self
      .consume_if_with_mode(TT::ChevronRight, LexMode::JsxTag)
      .is_some()
    {
      let children = self.parse_jsx_children()?;
      self.require_with_mode(TT::ChevronLeftSlash, LexMode::JsxTextContent)?;
      let end = self.require_with_mode(TT::ChevronRight, LexMode::JsxTag)?;
      return Ok(self.alloc(start.loc + end.loc, Syntax::JsxElem {
        name: None,
        attrs: Vec::new(),
        children,
        self_closing: false,
      }));
    }

    let name = self.parse_jsx_tag_name()?;
    let (attrs, self_closing, tag_end) = self.parse_jsx_attrs()?;
    if self_closing {
      return Ok(self.alloc(start.loc + tag_end, Syntax::JsxElem {
        name: Some(name),
        attrs,
        children: Vec::new(),
        self_closing,
      }));
    }
    let children = self.parse_jsx_children()?;
    self.require_with_mode(TT::ChevronLeftSlash, LexMode::JsxTextContent)?;
    let closing = self.parse_jsx_tag_name()?;
    let end = self.require_with_mode(TT::ChevronRight, LexMode::JsxTag)?;
    if jsx_tag_name_str(self.arena(), name) != jsx_tag_name_str(self.arena(), closing) {
      return Err(
        self
          .loc_of(closing)
          .error(SyntaxErrorType::JsxClosingTagMismatch, None),
      );
    }
    Ok(self.alloc(start.loc + end.loc, Syntax::JsxElem {
      name: Some(name),
      attrs,
      children,
      self_closing,
    }))
  }
}
