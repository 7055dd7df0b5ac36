use super::EmitResult;
use super::JsEmitter;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::operator::Precedence;

impl<'a> JsEmitter<'a> {
  fn emit_jsx_tag_name(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    match arena.stx(id) {
      Syntax::JsxTagName { name } | Syntax::Id { name } => self.out.write_identifier(name),
      Syntax::JsxTagMember { object, property }
      | Syntax::Member {
        object, property, ..
      } => {
        self.emit_jsx_tag_name(*object)?;
        self.out.write_punct(".");
        self.out.write_identifier(property);
      }
      _ => return Err(self.unsupported("JSX tag name", id)),
    };
    Ok(())
  }

  fn emit_jsx_expr_container(&mut self, expr: Option<NodeId>) -> EmitResult {
    self.out.write_punct("{");
    if let Some(expr) = expr {
      self.emit_expr(expr, Precedence::Assignment)?;
    }
    self.out.write_punct("}");
    Ok(())
  }

  fn emit_jsx_attr(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    match arena.stx(id) {
      Syntax::JsxAttr { name, value } => {
        self.out.write_identifier(name);
        if let Some(value) = value {
          self.out.write_punct("=");
          match arena.stx(*value) {
            Syntax::JsxStr { raw } => self.out.write_verbatim(raw),
            Syntax::JsxExprContainer { expr } => self.emit_jsx_expr_container(*expr)?,
            Syntax::JsxElem { .. } => self.emit_jsx_elem(*value)?,
            _ => return Err(self.unsupported("JSX attribute value", *value)),
          };
        }
      }
      Syntax::JsxSpreadAttr { arg } => {
        self.out.write_punct("{");
        self.out.write_punct("...");
        self.emit_expr(*arg, Precedence::Assignment)?;
        self.out.write_punct("}");
      }
      _ => return Err(self.unsupported("JSX attribute", id)),
    };
    Ok(())
  }

  pub fn emit_jsx_elem(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    let Syntax::JsxElem {
      name,
      attrs,
      children,
      self_closing,
    } = arena.stx(id)
    else {
      return Err(self.unsupported("JSX element", id));
    };
    self.out.write_punct("<");
    if let Some(name) = name {
      self.emit_jsx_tag_name(*name)?;
    }
    for &attr in attrs {
      self.out.write_required_space();
      self.emit_jsx_attr(attr)?;
    }
    if *self_closing {
      self.out.write_space();
      self.out.write_punct("/>");
      return Ok(());
    }
    self.out.write_punct(">");
    for &child in children {
      match arena.stx(child) {
        Syntax::JsxText { raw } => self.out.write_verbatim(raw),
        Syntax::JsxExprContainer { expr } => self.emit_jsx_expr_container(*expr)?,
        Syntax::JsxElem { .. } => self.emit_jsx_elem(child)?,
        _ => return Err(self.unsupported("JSX child", child)),
      };
    }
    self.out.write_punct("</");
    if let Some(name) = name {
      self.emit_jsx_tag_name(*name)?;
    }
    self.out.write_punct(">");
    Ok(())
  }
}
