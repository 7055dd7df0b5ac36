use super::unexpected;
use super::ParseCtx;
use super::Parser;
use crate::ast::MethodKind;
use crate::ast::NodeId;
use crate::ast::PropKey;
use crate::ast::Syntax;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::operator::AssignOp;
use crate::token::Token;
use crate::token::TT;

// Whether `t` can start a property key, which decides if a preceding `get`, `set`, `async` or
// `static` is a modifier or the key itself.
fn starts_key(t: &Token) -> bool {
  t.typ.is_identifier_name()
    || matches!(
      t.typ,
      TT::LiteralString
        | TT::LiteralNumber
        | TT::LiteralBigInt
        | TT::BracketOpen
        | TT::PrivateMember
        | TT::Asterisk
    )
}

// Method modifiers that precede a key.
struct Modifiers {
  is_async: bool,
  generator: bool,
  kind: MethodKind,
}

impl<'a> Parser<'a> {
  pub fn parse_prop_key(&mut self) -> SyntaxResult<PropKey> {
    let t = self.consume();
    Ok(match t.typ {
      TT::LiteralString => PropKey::Str {
        value: self.parse_lit_str(&t)?,
      },
      TT::LiteralNumber | TT::LiteralBigInt => PropKey::Num {
        raw: self.string(t.loc),
      },
      TT::PrivateMember => PropKey::Private {
        name: self.string(t.loc),
      },
      TT::BracketOpen => {
        let expr = self.with_in_allowed(true, |p| p.parse_assign())?;
        self.require(TT::BracketClose)?;
        PropKey::Computed { expr }
      }
      typ if typ.is_identifier_name() => PropKey::Direct {
        name: self.string(t.loc),
      },
      _ => return Err(unexpected(&t, SyntaxErrorType::ExpectedSyntax("property key"))),
    })
  }

  fn parse_modifiers(&mut self) -> Modifiers {
    let mut m = Modifiers {
      is_async: false,
      generator: false,
      kind: MethodKind::Method,
    };
    let (a, b) = self.peek_2();
    if self.is_word(&a, "async") && starts_key(&b) && !b.preceded_by_line_terminator {
      self.consume();
      m.is_async = true;
    }
    if self.consume_if(TT::Asterisk).is_some() {
      m.generator = true;
      return m;
    }
    if !m.is_async {
      let (a, b) = self.peek_2();
      if starts_key(&b) && b.typ != TT::Asterisk {
        if self.is_word(&a, "get") {
          self.consume();
          m.kind = MethodKind::Getter;
        } else if self.is_word(&a, "set") {
          self.consume();
          m.kind = MethodKind::Setter;
        }
      }
    }
    m
  }

  pub fn parse_object_lit(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::BraceOpen)?;
    let mut members = Vec::new();
    self.with_in_allowed(true, |p| {
      loop {
        if p.peek_is(TT::BraceClose) {
          break;
        }
        members.push(p.parse_object_member()?);
        if p.consume_if(TT::Comma).is_none() {
          break;
        }
      }
      Ok(())
    })?;
    let end = self.require(TT::BraceClose)?;
    Ok(self.alloc(start.loc + end.loc, Syntax::Object { members }))
  }

  fn parse_object_member(&mut self) -> SyntaxResult<NodeId> {
    if let Some(spread) = self.consume_if(TT::DotDotDot) {
      let arg = self.parse_assign()?;
      let loc = spread.loc + self.loc_of(arg);
      return Ok(self.alloc(loc, Syntax::Spread { arg }));
    }
    let start = self.peek();
    let m = self.parse_modifiers();
    let key_tok = self.peek();
    let key = self.parse_prop_key()?;
    if self.peek_is(TT::ParenthesisOpen) {
      let func = self.parse_func_rest(key_tok.loc, m.is_async, m.generator)?;
      let loc = start.loc + self.loc_of(func);
      return Ok(self.alloc(loc, Syntax::Method {
        key,
        kind: m.kind,
        func,
      }));
    }
    if m.is_async || m.generator || m.kind != MethodKind::Method {
      let t = self.peek();
      return Err(unexpected(
        &t,
        SyntaxErrorType::RequiredTokenNotFound(TT::ParenthesisOpen),
      ));
    }
    if self.consume_if(TT::Colon).is_some() {
      let value = self.parse_assign()?;
      let loc = start.loc + self.loc_of(value);
      return Ok(self.alloc(loc, Syntax::Prop {
        key,
        value,
        shorthand: false,
      }));
    }

    // Shorthand, optionally with a default when the object is an assignment target.
    let name = match (&key, key_tok.typ) {
      (PropKey::Direct { name }, TT::Identifier) => name.clone(),
      _ => {
        let t = self.peek();
        return Err(unexpected(
          &t,
          SyntaxErrorType::RequiredTokenNotFound(TT::Colon),
        ));
      }
    };
    let id = self.alloc(key_tok.loc, Syntax::Id { name });
    if self.consume_if(TT::Equals).is_some() {
      let default = self.parse_assign()?;
      let loc = key_tok.loc + self.loc_of(default);
      let value = self.alloc(loc, Syntax::Assign {
        op: AssignOp::Assign,
        target: id,
        value: default,
      });
      return Ok(self.alloc(loc, Syntax::Prop {
        key,
        value,
        shorthand: false,
      }));
    }
    Ok(self.alloc(key_tok.loc, Syntax::Prop {
      key,
      value: id,
      shorthand: true,
    }))
  }

  fn parse_class_rest(&mut self, start: Loc) -> SyntaxResult<NodeId> {
    let extends = if self.consume_if(TT::KeywordExtends).is_some() {
      Some(self.parse_lhs()?)
    } else {
      None
    };
    self.require(TT::BraceOpen)?;
    let mut members = Vec::new();
    loop {
      if self.consume_if(TT::Semicolon).is_some() {
        continue;
      }
      if self.peek_is(TT::BraceClose) {
        break;
      }
      members.push(self.parse_class_member()?);
    }
    let end = self.require(TT::BraceClose)?;
    Ok(self.alloc(start + end.loc, Syntax::Class { extends, members }))
  }

  fn parse_class_member(&mut self) -> SyntaxResult<NodeId> {
    let start = self.peek();
    let (a, b) = self.peek_2();
    let mut is_static = false;
    if self.is_word(&a, "static") {
      if b.typ == TT::BraceOpen {
        self.consume();
        let ctx = ParseCtx {
          in_allowed: true,
          in_async: false,
          in_generator: false,
          function_depth: self.ctx().function_depth + 1,
        };
        let (body, end) = self.with_ctx(ctx, |p| p.parse_braced_stmts())?;
        return Ok(self.alloc(start.loc + end, Syntax::StaticBlock { body }));
      }
      if starts_key(&b) {
        self.consume();
        is_static = true;
      }
    }

    let m = self.parse_modifiers();
    let key = self.parse_prop_key()?;
    if self.peek_is(TT::ParenthesisOpen) {
      let key_end = self.peek().loc;
      let func = self.parse_func_rest(key_end, m.is_async, m.generator)?;
      let loc = start.loc + self.loc_of(func);
      return Ok(self.alloc(loc, Syntax::ClassMethod {
        is_static,
        key,
        kind: m.kind,
        func,
      }));
    }
    if m.is_async || m.generator || m.kind != MethodKind::Method {
      let t = self.peek();
      return Err(unexpected(
        &t,
        SyntaxErrorType::RequiredTokenNotFound(TT::ParenthesisOpen),
      ));
    }
    let value = if self.consume_if(TT::Equals).is_some() {
      // Initializers run like methods: `await` and `yield` aren't operators here.
      let ctx = ParseCtx {
        in_allowed: true,
        in_async: false,
        in_generator: false,
        function_depth: self.ctx().function_depth + 1,
      };
      Some(self.with_ctx(ctx, |p| p.parse_assign())?)
    } else {
      None
    };
    let mut loc = start.loc;
    if let Some(value) = value {
      loc.extend(self.loc_of(value));
    }
    self.require_semicolon()?;
    Ok(self.alloc(loc, Syntax::ClassField {
      is_static,
      key,
      value,
    }))
  }

  pub fn parse_class_expr(&mut self) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordClass)?;
    let name = if self.peek_is(TT::Identifier) {
      Some(self.require_identifier()?.1)
    } else {
      None
    };
    let class = self.parse_class_rest(start.loc)?;
    let loc = self.loc_of(class);
    Ok(self.alloc(loc, Syntax::ClassExpr { name, class }))
  }

  /// Parses a class declaration. The name may only be omitted when `name_optional` is set, as in
  /// `export default class {}`.
  pub fn parse_class_decl(&mut self, name_optional: bool) -> SyntaxResult<NodeId> {
    let start = self.require(TT::KeywordClass)?;
    let name = if self.peek_is(TT::Identifier) || !name_optional {
      Some(self.require_identifier()?.1)
    } else {
      None
    };
    let class = self.parse_class_rest(start.loc)?;
    let loc = self.loc_of(class);
    Ok(self.alloc(loc, Syntax::ClassDecl { name, class }))
  }
}
