use super::unexpected;
use super::Parser;
use crate::ast::ImportName;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::token::TT;

impl<'a> Parser<'a> {
  // Module export names may be IdentifierNames or string literals.
  fn parse_module_export_name(&mut self) -> SyntaxResult<String> {
    let t = self.consume();
    if t.typ == TT::LiteralString {
      return self.parse_lit_str(&t);
    }
    if !t.typ.is_identifier_name() {
      return Err(unexpected(&t, SyntaxErrorType::ExpectedSyntax("export name")));
    }
    Ok(self.string(t.loc))
  }

  fn parse_module_source(&mut self) -> SyntaxResult<String> {
    let t = self.require(TT::LiteralString)?;
    self.parse_lit_str(&t)
  }

  pub fn parse_import(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordImport)?;
    let mut default = None;
    let mut namespace = None;
    let mut names = Vec::new();

    if let Some(t) = self.consume_if(TT::LiteralString) {
      // Side-effect import.
      let source = self.parse_lit_str(&t)?;
      self.require_semicolon()?;
      return Ok(self.alloc(start.loc + t.loc, Syntax::Import {
        default,
        namespace,
        names,
        source,
      }));
    }

    if self.peek_is(TT::Identifier) {
      default = Some(self.require_identifier()?.1);
      if self.consume_if(TT::Comma).is_none() {
        return self.finish_import(start.loc, default, namespace, names);
      }
    }
    if self.consume_if(TT::Asterisk).is_some() {
      self.require_word("as")?;
      namespace = Some(self.require_identifier()?.1);
    } else {
      self.require(TT::BraceOpen)?;
      loop {
        if self.peek_is(TT::BraceClose) {
          break;
        }
        let imported = self.parse_module_export_name()?;
        let local = if self.consume_if_word("as").is_some() {
          self.require_identifier()?.1
        } else {
          imported.clone()
        };
        names.push(ImportName { imported, local });
        if self.consume_if(TT::Comma).is_none() {
          break;
        }
      }
      self.require(TT::BraceClose)?;
    }
    self.finish_import(start.loc, default, namespace, names)
  }

  fn finish_import(
    &mut self,
    start: Loc,
    default: Option<String>,
    namespace: Option<String>,
    names: Vec<ImportName>,
  ) -> SyntaxResult<NodeId> {
    self.require_word("from")?;
    let source_tok = self.peek();
    let source = self.parse_module_source()?;
    self.require_semicolon()?;
    Ok(self.alloc(start + source_tok.loc, Syntax::Import {
      default,
      namespace,
      names,
      source,
    }))
  }

  pub fn parse_export(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordExport)?;
    let (t, next) = self.peek_2();
    match t.typ {
      TT::Asterisk => {
        self.consume();
        let alias = if self.consume_if_word("as").is_some() {
          Some(self.parse_module_export_name()?)
        } else {
          None
        };
        self.require_word("from")?;
        let from_tok = self.peek();
        let from = self.parse_module_source()?;
        self.require_semicolon()?;
        Ok(self.alloc(start.loc + from_tok.loc, Syntax::ExportAll { alias, from }))
      }
      TT::BraceOpen => {
        self.consume();
        let mut specifiers = Vec::new();
        loop {
          let t = self.peek();
          if t.typ == TT::BraceClose {
            break;
          }
          let local = self.parse_module_export_name()?;
          let exported = if self.consume_if_word("as").is_some() {
            self.parse_module_export_name()?
          } else {
            local.clone()
          };
          specifiers.push(self.alloc(t.loc, Syntax::ExportSpecifier { local, exported }));
          if self.consume_if(TT::Comma).is_none() {
            break;
          }
        }
        let end = self.require(TT::BraceClose)?;
        let mut loc = start.loc + end.loc;
        let from = if self.consume_if_word("from").is_some() {
          let from_tok = self.peek();
          loc.extend(from_tok.loc);
          Some(self.parse_module_source()?)
        } else {
          None
        };
        self.require_semicolon()?;
        Ok(self.alloc(loc, Syntax::ExportList { specifiers, from }))
      }
      TT::KeywordDefault => {
        self.consume();
        let (a, b) = self.peek_2();
        let is_func = a.typ == TT::KeywordFunction
          || (self.is_word(&a, "async")
            && b.typ == TT::KeywordFunction
            && !b.preceded_by_line_terminator);
        if is_func || a.typ == TT::KeywordClass {
          let decl = if is_func {
            self.parse_func_decl(true)?
          } else {
            self.parse_class_decl(true)?
          };
          let loc = start.loc + self.loc_of(decl);
          return Ok(self.alloc(loc, Syntax::ExportDefaultDecl { decl }));
        }
        let expr = self.parse_assign()?;
        self.require_semicolon()?;
        let loc = start.loc + self.loc_of(expr);
        Ok(self.alloc(loc, Syntax::ExportDefaultExpr { expr }))
      }
      TT::KeywordVar | TT::KeywordConst => self.finish_export_decl(start.loc, |p| p.parse_var_stmt()),
      TT::Identifier if self.is_word(&t, "let") => {
        self.finish_export_decl(start.loc, |p| p.parse_var_stmt())
      }
      TT::KeywordFunction => self.finish_export_decl(start.loc, |p| p.parse_func_decl(false)),
      TT::Identifier
        if self.is_word(&t, "async")
          && next.typ == TT::KeywordFunction
          && !next.preceded_by_line_terminator =>
      {
        self.finish_export_decl(start.loc, |p| p.parse_func_decl(false))
      }
      TT::KeywordClass => self.finish_export_decl(start.loc, |p| p.parse_class_decl(false)),
      _ => Err(unexpected(
        &t,
        SyntaxErrorType::ExpectedSyntax("exportable declaration"),
      )),
    }
  }

  fn finish_export_decl(
    &mut self,
    start: Loc,
    parse_decl: impl FnOnce(&mut Self) -> SyntaxResult<NodeId>,
  ) -> SyntaxResult<NodeId> {
    let decl = parse_decl(self)?;
    let loc = start + self.loc_of(decl);
    Ok(self.alloc(loc, Syntax::ExportDecl { decl }))
  }
}
