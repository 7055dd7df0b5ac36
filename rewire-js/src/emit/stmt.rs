use super::escape::is_identifier_name;
use super::escape::string_literal;
use super::expr::StartGuard;
use super::EmitResult;
use super::JsEmitter;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::operator::Precedence;

impl<'a> JsEmitter<'a> {
  pub fn emit_stmts(&mut self, stmts: &[NodeId]) -> EmitResult {
    for (i, &stmt) in stmts.iter().enumerate() {
      if i > 0 {
        self.out.write_newline();
      }
      self.emit_stmt(stmt)?;
    }
    Ok(())
  }

  /// `{ ... }` around a statement list, with the contents indented.
  pub fn emit_braced(&mut self, stmts: &[NodeId]) -> EmitResult {
    self.out.write_punct("{");
    if !stmts.is_empty() {
      self.out.indent();
      self.out.write_newline();
      self.emit_stmts(stmts)?;
      self.out.dedent();
      self.out.write_newline();
    }
    self.out.write_punct("}");
    Ok(())
  }

  pub fn emit_block(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    match arena.stx(id) {
      Syntax::Block { body } => self.emit_braced(body),
      _ => Err(self.unsupported("non-block as block", id)),
    }
  }

  fn emit_module_name(&mut self, name: &str) {
    if is_identifier_name(name) {
      self.out.write_identifier(name);
    } else {
      self.out.write_raw(&string_literal(name));
    }
  }

  fn emit_from(&mut self, source: &str) {
    self.out.write_space();
    self.out.write_keyword("from");
    self.out.write_space();
    self.out.write_raw(&string_literal(source));
  }

  fn emit_var_decl(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    let Syntax::VarDecl { kind, declarators } = arena.stx(id) else {
      return Err(self.unsupported("non-declaration as variable declaration", id));
    };
    self.out.write_keyword(kind.as_str());
    self.out.write_space();
    self.comma_separated(declarators, |em, &d| {
      let Syntax::Declarator { pat, init } = arena.stx(d) else {
        return Err(em.unsupported("non-declarator in variable declaration", d));
      };
      em.emit_pat(*pat)?;
      if let Some(init) = init {
        em.out.write_space();
        em.out.write_punct("=");
        em.out.write_space();
        em.emit_expr(*init, Precedence::Assignment)?;
      }
      Ok(())
    })
  }

  // The head of a for loop, or the left side of a for-in/of loop.
  fn emit_for_head_part(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    match arena.stx(id) {
      Syntax::VarDecl { .. } => self.emit_var_decl(id),
      _ => self.emit_expr_guarded(id, Precedence::LeftHandSide, StartGuard::Statement),
    }
  }

  // Whether `else` after this statement would attach to a nested `if` instead.
  fn ends_with_open_if(&self, id: NodeId) -> bool {
    match self.arena.stx(id) {
      Syntax::If { alt: None, .. } => true,
      Syntax::If { alt: Some(alt), .. } => self.ends_with_open_if(*alt),
      Syntax::For { body, .. }
      | Syntax::ForIn { body, .. }
      | Syntax::While { body, .. }
      | Syntax::Labeled { body, .. } => self.ends_with_open_if(*body),
      _ => false,
    }
  }

  fn emit_body(&mut self, id: NodeId) -> EmitResult {
    self.out.write_space();
    self.emit_stmt(id)
  }

  fn emit_paren_head(&mut self, keyword: &str, expr: NodeId) -> EmitResult {
    self.out.write_keyword(keyword);
    self.out.write_space();
    self.out.write_punct("(");
    self.emit_expr(expr, Precedence::Sequence)?;
    self.out.write_punct(")");
    Ok(())
  }

  pub fn emit_stmt(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    match arena.stx(id) {
      Syntax::VarDecl { .. } => {
        self.emit_var_decl(id)?;
        self.out.write_punct(";");
      }
      Syntax::FuncDecl { name, func } => self.emit_function(name.as_deref(), *func)?,
      Syntax::ClassDecl { name, class } => self.emit_class(name.as_deref(), *class)?,
      Syntax::ExprStmt { expr } => {
        self.emit_expr_guarded(*expr, Precedence::Sequence, StartGuard::Statement)?;
        self.out.write_punct(";");
      }
      Syntax::Block { body } => self.emit_braced(body)?,
      Syntax::Empty => self.out.write_punct(";"),
      Syntax::If { test, cons, alt } => {
        self.emit_paren_head("if", *test)?;
        let wrap_cons = alt.is_some() && self.ends_with_open_if(*cons);
        if wrap_cons {
          self.out.write_space();
          self.emit_braced(&[*cons])?;
        } else {
          self.emit_body(*cons)?;
        }
        if let Some(alt) = alt {
          self.out.write_space();
          self.out.write_keyword("else");
          self.emit_body(*alt)?;
        }
      }
      Syntax::For {
        init,
        test,
        update,
        body,
      } => {
        self.out.write_keyword("for");
        self.out.write_space();
        self.out.write_punct("(");
        if let Some(init) = init {
          self.in_disallowed = true;
          let res = self.emit_for_head_part(*init);
          self.in_disallowed = false;
          res?;
        }
        self.out.write_punct(";");
        if let Some(test) = test {
          self.out.write_space();
          self.emit_expr(*test, Precedence::Sequence)?;
        }
        self.out.write_punct(";");
        if let Some(update) = update {
          self.out.write_space();
          self.emit_expr(*update, Precedence::Sequence)?;
        }
        self.out.write_punct(")");
        self.emit_body(*body)?;
      }
      Syntax::ForIn {
        of,
        left,
        right,
        body,
      } => {
        self.out.write_keyword("for");
        self.out.write_space();
        self.out.write_punct("(");
        self.emit_for_head_part(*left)?;
        self.out.write_space();
        self.out.write_keyword(if *of { "of" } else { "in" });
        self.out.write_space();
        let right_min = if *of {
          Precedence::Assignment
        } else {
          Precedence::Sequence
        };
        self.emit_expr(*right, right_min)?;
        self.out.write_punct(")");
        self.emit_body(*body)?;
      }
      Syntax::While { test, body } => {
        self.emit_paren_head("while", *test)?;
        self.emit_body(*body)?;
      }
      Syntax::DoWhile { body, test } => {
        self.out.write_keyword("do");
        self.emit_body(*body)?;
        self.out.write_space();
        self.emit_paren_head("while", *test)?;
        self.out.write_punct(";");
      }
      Syntax::Return { arg } => {
        self.out.write_keyword("return");
        if let Some(arg) = arg {
          self.out.write_space();
          self.emit_expr(*arg, Precedence::Sequence)?;
        }
        self.out.write_punct(";");
      }
      Syntax::Throw { arg } => {
        self.out.write_keyword("throw");
        self.out.write_space();
        self.emit_expr(*arg, Precedence::Sequence)?;
        self.out.write_punct(";");
      }
      Syntax::Try {
        block,
        handler,
        finalizer,
      } => {
        self.out.write_keyword("try");
        self.out.write_space();
        self.emit_block(*block)?;
        if let Some(handler) = handler {
          let Syntax::Catch { param, body } = arena.stx(*handler) else {
            return Err(self.unsupported("non-catch as catch clause", *handler));
          };
          self.out.write_space();
          self.out.write_keyword("catch");
          self.out.write_space();
          if let Some(param) = param {
            self.out.write_punct("(");
            self.emit_pat(*param)?;
            self.out.write_punct(")");
            self.out.write_space();
          }
          self.emit_block(*body)?;
        }
        if let Some(finalizer) = finalizer {
          self.out.write_space();
          self.out.write_keyword("finally");
          self.out.write_space();
          self.emit_block(*finalizer)?;
        }
      }
      Syntax::Break { label } | Syntax::Continue { label } => {
        let keyword = if matches!(arena.stx(id), Syntax::Break { .. }) {
          "break"
        } else {
          "continue"
        };
        self.out.write_keyword(keyword);
        if let Some(label) = label {
          self.out.write_identifier(label);
        }
        self.out.write_punct(";");
      }
      Syntax::Labeled { label, body } => {
        self.out.write_identifier(label);
        self.out.write_punct(":");
        self.emit_body(*body)?;
      }
      Syntax::Switch {
        discriminant,
        cases,
      } => {
        self.emit_paren_head("switch", *discriminant)?;
        self.out.write_space();
        self.out.write_punct("{");
        self.out.indent();
        for &case in cases {
          let Syntax::SwitchCase { test, body } = arena.stx(case) else {
            return Err(self.unsupported("non-case in switch", case));
          };
          self.out.write_newline();
          match test {
            Some(test) => {
              self.out.write_keyword("case");
              self.out.write_space();
              self.emit_expr(*test, Precedence::Sequence)?;
            }
            None => self.out.write_keyword("default"),
          };
          self.out.write_punct(":");
          self.out.indent();
          for &stmt in body {
            self.out.write_newline();
            self.emit_stmt(stmt)?;
          }
          self.out.dedent();
        }
        self.out.dedent();
        if !cases.is_empty() {
          self.out.write_newline();
        }
        self.out.write_punct("}");
      }
      Syntax::Debugger => {
        self.out.write_keyword("debugger");
        self.out.write_punct(";");
      }
      Syntax::Import {
        default,
        namespace,
        names,
        source,
      } => {
        self.out.write_keyword("import");
        if default.is_none() && namespace.is_none() && names.is_empty() {
          self.out.write_space();
          self.out.write_raw(&string_literal(source));
          self.out.write_punct(";");
          return Ok(());
        }
        self.out.write_space();
        if let Some(default) = default {
          self.out.write_identifier(default);
          if namespace.is_some() || !names.is_empty() {
            self.out.write_punct(",");
            self.out.write_space();
          }
        }
        if let Some(namespace) = namespace {
          self.out.write_punct("*");
          self.out.write_space();
          self.out.write_keyword("as");
          self.out.write_identifier(namespace);
        } else if !names.is_empty() {
          self.out.write_punct("{");
          self.out.write_space();
          self.comma_separated(names, |em, name| {
            em.emit_module_name(&name.imported);
            if name.imported != name.local {
              em.out.write_keyword("as");
              em.out.write_identifier(&name.local);
            }
            Ok(())
          })?;
          self.out.write_space();
          self.out.write_punct("}");
        }
        self.emit_from(source);
        self.out.write_punct(";");
      }
      Syntax::ExportDecl { decl } => {
        self.out.write_keyword("export");
        self.out.write_space();
        self.emit_stmt(*decl)?;
      }
      Syntax::ExportDefaultDecl { decl } => {
        self.out.write_keyword("export");
        self.out.write_keyword("default");
        self.out.write_space();
        self.emit_stmt(*decl)?;
      }
      Syntax::ExportDefaultExpr { expr } => {
        self.out.write_keyword("export");
        self.out.write_keyword("default");
        self.out.write_space();
        self.emit_expr_guarded(*expr, Precedence::Assignment, StartGuard::ExportDefault)?;
        self.out.write_punct(";");
      }
      Syntax::ExportList { specifiers, from } => {
        self.out.write_keyword("export");
        self.out.write_space();
        self.out.write_punct("{");
        if !specifiers.is_empty() {
          self.out.write_space();
          self.comma_separated(specifiers, |em, &s| {
            let Syntax::ExportSpecifier { local, exported } = arena.stx(s) else {
              return Err(em.unsupported("non-specifier in export list", s));
            };
            em.emit_module_name(local);
            if local != exported {
              em.out.write_keyword("as");
              em.emit_module_name(exported);
            }
            Ok(())
          })?;
          self.out.write_space();
        }
        self.out.write_punct("}");
        if let Some(from) = from {
          self.emit_from(from);
        }
        self.out.write_punct(";");
      }
      Syntax::ExportAll { alias, from } => {
        self.out.write_keyword("export");
        self.out.write_space();
        self.out.write_punct("*");
        if let Some(alias) = alias {
          self.out.write_space();
          self.out.write_keyword("as");
          self.out.write_space();
          self.emit_module_name(alias);
        }
        self.emit_from(from);
        self.out.write_punct(";");
      }
      Syntax::SwitchCase { .. } => return Err(self.unsupported("switch case outside a switch", id)),
      _ => return Err(self.unsupported("non-statement in statement position", id)),
    };
    Ok(())
  }
}
