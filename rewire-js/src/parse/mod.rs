use crate::ast::Arena;
use crate::ast::Module;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::lex_next;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::lex::LexerCheckpoint;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;

pub mod class_or_object;
pub mod expr;
pub mod func;
pub mod import_export;
pub mod jsx;
pub mod lit;
pub mod pat;
pub mod stmt;
#[cfg(test)]
mod tests;

// Context that changes as the parser descends and must be restored on the way back out. Kept as a
// Copy value on the parser and swapped in/out with `with_ctx` instead of being passed to every
// parse_* function.
#[derive(Clone, Copy)]
pub struct ParseCtx {
  // Whether `in` is a binary operator here; false only directly inside a `for` head initializer.
  pub in_allowed: bool,
  pub in_async: bool,
  pub in_generator: bool,
  // Zero at the module top level, where `await` is always an operator.
  pub function_depth: usize,
}

impl Default for ParseCtx {
  fn default() -> Self {
    ParseCtx {
      in_allowed: true,
      in_async: false,
      in_generator: false,
      function_depth: 0,
    }
  }
}

pub struct ParserCheckpoint {
  lexer: LexerCheckpoint,
  arena_len: usize,
}

pub struct Parser<'a> {
  lexer: Lexer<'a>,
  arena: Arena,
  ctx: ParseCtx,
}

// We extend this struct with added methods in the various submodules, instead of simply using free
// functions and passing `&mut Parser` around, so that every parse_* function shares the lexer,
// the arena being built and the current context.
impl<'a> Parser<'a> {
  pub fn new(lexer: Lexer<'a>) -> Parser<'a> {
    Parser::with_arena(lexer, Arena::new())
  }

  /// Creates a parser that allocates into an existing arena, e.g. to graft a fragment into a
  /// module that has already been parsed.
  pub fn with_arena(lexer: Lexer<'a>, arena: Arena) -> Parser<'a> {
    Parser {
      lexer,
      arena,
      ctx: ParseCtx::default(),
    }
  }

  pub fn into_arena(self) -> Arena {
    self.arena
  }

  pub fn arena(&self) -> &Arena {
    &self.arena
  }

  pub fn source_range(&self) -> Loc {
    self.lexer.source_range()
  }

  pub fn str(&self, loc: Loc) -> &'a str {
    &self.lexer.source()[loc.0..loc.1]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn ctx(&self) -> ParseCtx {
    self.ctx
  }

  /// Runs `f` with a modified context, restoring the previous context afterwards regardless of the
  /// result.
  pub fn with_ctx<T>(
    &mut self,
    ctx: ParseCtx,
    f: impl FnOnce(&mut Self) -> SyntaxResult<T>,
  ) -> SyntaxResult<T> {
    let prev = std::mem::replace(&mut self.ctx, ctx);
    let res = f(self);
    self.ctx = prev;
    res
  }

  pub fn with_in_allowed<T>(
    &mut self,
    in_allowed: bool,
    f: impl FnOnce(&mut Self) -> SyntaxResult<T>,
  ) -> SyntaxResult<T> {
    let ctx = ParseCtx {
      in_allowed,
      ..self.ctx
    };
    self.with_ctx(ctx, f)
  }

  pub fn alloc(&mut self, loc: Loc, stx: Syntax) -> NodeId {
    self.arena.alloc(loc, stx)
  }

  pub fn loc_of(&self, id: NodeId) -> Loc {
    self.arena.loc(id)
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      lexer: self.lexer.checkpoint(),
      arena_len: self.arena.len(),
    }
  }

  pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
    self.lexer.apply_checkpoint(checkpoint.lexer);
    self.arena.truncate(checkpoint.arena_len);
  }

  pub fn consume_with_mode(&mut self, mode: LexMode) -> Token {
    lex_next(&mut self.lexer, mode)
  }

  pub fn consume(&mut self) -> Token {
    self.consume_with_mode(LexMode::Standard)
  }

  pub fn peek_with_mode(&mut self, mode: LexMode) -> Token {
    let cp = self.lexer.checkpoint();
    let t = lex_next(&mut self.lexer, mode);
    self.lexer.apply_checkpoint(cp);
    t
  }

  pub fn peek(&mut self) -> Token {
    self.peek_with_mode(LexMode::Standard)
  }

  pub fn peek_2(&mut self) -> (Token, Token) {
    let cp = self.lexer.checkpoint();
    let a = lex_next(&mut self.lexer, LexMode::Standard);
    let b = lex_next(&mut self.lexer, LexMode::Standard);
    self.lexer.apply_checkpoint(cp);
    (a, b)
  }

  pub fn peek_3(&mut self) -> (Token, Token, Token) {
    let cp = self.lexer.checkpoint();
    let a = lex_next(&mut self.lexer, LexMode::Standard);
    let b = lex_next(&mut self.lexer, LexMode::Standard);
    let c = lex_next(&mut self.lexer, LexMode::Standard);
    self.lexer.apply_checkpoint(cp);
    (a, b, c)
  }

  pub fn peek_is(&mut self, typ: TT) -> bool {
    self.peek().typ == typ
  }

  /// Whether the next token is the identifier `word`, e.g. a contextual keyword like `async`.
  pub fn peek_is_word(&mut self, word: &str) -> bool {
    let t = self.peek();
    t.typ == TT::Identifier && self.str(t.loc) == word
  }

  pub fn is_word(&self, t: &Token, word: &str) -> bool {
    t.typ == TT::Identifier && self.str(t.loc) == word
  }

  pub fn consume_if(&mut self, typ: TT) -> Option<Token> {
    self.consume_if_with_mode(typ, LexMode::Standard)
  }

  pub fn consume_if_with_mode(&mut self, typ: TT, mode: LexMode) -> Option<Token> {
    let cp = self.lexer.checkpoint();
    let t = lex_next(&mut self.lexer, mode);
    if t.typ == typ {
      Some(t)
    } else {
      self.lexer.apply_checkpoint(cp);
      None
    }
  }

  pub fn consume_if_word(&mut self, word: &str) -> Option<Token> {
    if self.peek_is_word(word) {
      Some(self.consume())
    } else {
      None
    }
  }

  pub fn require_with_mode(&mut self, typ: TT, mode: LexMode) -> SyntaxResult<Token> {
    let t = self.consume_with_mode(mode);
    if t.typ != typ {
      return Err(unexpected(&t, SyntaxErrorType::RequiredTokenNotFound(typ)));
    }
    Ok(t)
  }

  pub fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    self.require_with_mode(typ, LexMode::Standard)
  }

  pub fn require_word(&mut self, word: &'static str) -> SyntaxResult<Token> {
    let t = self.consume();
    if !self.is_word(&t, word) {
      return Err(unexpected(&t, SyntaxErrorType::ExpectedSyntax(word)));
    }
    Ok(t)
  }

  /// Consumes an identifier usable as a binding or reference name.
  pub fn require_identifier(&mut self) -> SyntaxResult<(Loc, String)> {
    let t = self.consume();
    if t.typ != TT::Identifier {
      return Err(unexpected(&t, SyntaxErrorType::ExpectedSyntax("identifier")));
    }
    Ok((t.loc, self.string(t.loc)))
  }

  /// Consumes an IdentifierName, which may be a reserved word (e.g. after `.`).
  pub fn require_identifier_name(&mut self) -> SyntaxResult<(Loc, String)> {
    let t = self.consume();
    if !t.typ.is_identifier_name() {
      return Err(unexpected(&t, SyntaxErrorType::ExpectedSyntax("identifier name")));
    }
    Ok((t.loc, self.string(t.loc)))
  }

  /// Consumes a statement terminator, applying automatic semicolon insertion.
  pub fn require_semicolon(&mut self) -> SyntaxResult<()> {
    let t = self.peek();
    match t.typ {
      TT::Semicolon => {
        self.consume();
        Ok(())
      }
      TT::BraceClose | TT::EOF => Ok(()),
      _ if t.preceded_by_line_terminator => Ok(()),
      _ => Err(unexpected(
        &t,
        SyntaxErrorType::RequiredTokenNotFound(TT::Semicolon),
      )),
    }
  }

  pub fn parse_module(&mut self) -> SyntaxResult<Vec<NodeId>> {
    let mut body = Vec::new();
    while !self.peek_is(TT::EOF) {
      body.push(self.parse_stmt()?);
    }
    Ok(body)
  }
}

pub fn unexpected(t: &Token, typ: SyntaxErrorType) -> SyntaxError {
  if t.typ == TT::EOF {
    return t.loc.error(SyntaxErrorType::UnexpectedEnd, None);
  }
  t.loc.error(typ, Some(t.typ))
}

/// Parses a UTF-8 module into a fresh arena.
pub fn parse(source: &str) -> SyntaxResult<Module> {
  let mut parser = Parser::new(Lexer::new(source));
  let body = parser.parse_module()?;
  Ok(Module::new(parser.into_arena(), body))
}
