use super::escape::string_literal;
use super::EmitResult;
use super::JsEmitter;
use crate::ast::MethodKind;
use crate::ast::NodeId;
use crate::ast::PropKey;
use crate::ast::Syntax;
use crate::operator::BinaryOp;
use crate::operator::Precedence;

pub fn precedence(stx: &Syntax) -> Precedence {
  match stx {
    Syntax::Seq { .. } => Precedence::Sequence,
    Syntax::Assign { .. } | Syntax::Arrow { .. } | Syntax::Yield { .. } => Precedence::Assignment,
    Syntax::Cond { .. } => Precedence::Conditional,
    Syntax::Binary { op, .. } => op.precedence(),
    Syntax::Unary { .. } | Syntax::Await { .. } => Precedence::Unary,
    Syntax::Update { .. } => Precedence::Update,
    Syntax::Call { .. }
    | Syntax::New { .. }
    | Syntax::Member { .. }
    | Syntax::ComputedMember { .. }
    | Syntax::TaggedTemplate { .. }
    | Syntax::ImportCall { .. } => Precedence::LeftHandSide,
    _ => Precedence::Primary,
  }
}

/// Positions where an expression can't begin with certain tokens.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StartGuard {
  /// Expression statements can't start with `function`, `class`, `{` or `let [`.
  Statement,
  /// `export default` followed by `function` or `class` would be a declaration.
  ExportDefault,
  /// A concise arrow body can't start with `{`.
  ArrowBody,
}

fn is_logical(stx: &Syntax) -> bool {
  matches!(stx, Syntax::Binary {
    op: BinaryOp::LogicalAnd | BinaryOp::LogicalOr,
    ..
  })
}

fn is_nullish(stx: &Syntax) -> bool {
  matches!(stx, Syntax::Binary {
    op: BinaryOp::Nullish,
    ..
  })
}

impl<'a> JsEmitter<'a> {
  /// The node whose first token starts the written form of `id`, ignoring any parentheses
  /// precedence might add. Conservative: may report a conflict that parentheses would have
  /// hidden anyway.
  fn leftmost(&self, mut id: NodeId) -> NodeId {
    loop {
      id = match self.arena.stx(id) {
        Syntax::Binary { left, .. } => *left,
        Syntax::Assign { target, .. } => *target,
        Syntax::Cond { test, .. } => *test,
        Syntax::Seq { exprs } if !exprs.is_empty() => exprs[0],
        Syntax::Call { callee, .. } => *callee,
        Syntax::Member { object, .. } | Syntax::ComputedMember { object, .. } => *object,
        Syntax::TaggedTemplate { tag, .. } => *tag,
        Syntax::Update {
          prefix: false, arg, ..
        } => *arg,
        _ => return id,
      };
    }
  }

  fn starts_with_forbidden(&self, id: NodeId, guard: StartGuard) -> bool {
    let first = self.arena.stx(self.leftmost(id));
    match guard {
      StartGuard::Statement => match first {
        Syntax::FuncExpr { .. } | Syntax::ClassExpr { .. } | Syntax::Object { .. } => true,
        Syntax::Id { name } => name == "let",
        _ => false,
      },
      StartGuard::ExportDefault => {
        matches!(first, Syntax::FuncExpr { .. } | Syntax::ClassExpr { .. })
      }
      StartGuard::ArrowBody => matches!(first, Syntax::Object { .. }),
    }
  }

  /// Whether a `new` callee has a call in its member chain, e.g. `new (f().g)()`.
  fn contains_call(&self, mut id: NodeId) -> bool {
    loop {
      id = match self.arena.stx(id) {
        Syntax::Call { .. } | Syntax::ImportCall { .. } => return true,
        Syntax::Member { object, .. } | Syntax::ComputedMember { object, .. } => *object,
        Syntax::TaggedTemplate { tag, .. } => *tag,
        _ => return false,
      };
    }
  }

  fn parenthesized(&mut self, f: impl FnOnce(&mut Self) -> EmitResult) -> EmitResult {
    self.out.write_punct("(");
    let in_disallowed = std::mem::replace(&mut self.in_disallowed, false);
    f(self)?;
    self.in_disallowed = in_disallowed;
    self.out.write_punct(")");
    Ok(())
  }

  pub fn emit_expr(&mut self, id: NodeId, min: Precedence) -> EmitResult {
    self.emit_operand(id, min, false)
  }

  pub fn emit_expr_guarded(&mut self, id: NodeId, min: Precedence, guard: StartGuard) -> EmitResult {
    if self.starts_with_forbidden(id, guard) {
      self.parenthesized(|em| em.emit_expr(id, Precedence::Sequence))
    } else {
      self.emit_expr(id, min)
    }
  }

  fn emit_operand(&mut self, id: NodeId, min: Precedence, force_parens: bool) -> EmitResult {
    let stx = self.arena.stx(id);
    let needs_parens = force_parens
      || precedence(stx) < min
      || (self.in_disallowed
        && matches!(stx, Syntax::Binary {
          op: BinaryOp::In,
          ..
        }));
    if needs_parens {
      self.parenthesized(|em| em.emit_expr_unparenthesized(id))
    } else {
      self.emit_expr_unparenthesized(id)
    }
  }

  fn emit_args(&mut self, args: &[NodeId]) -> EmitResult {
    self.out.write_punct("(");
    self.comma_separated(args, |em, &arg| em.emit_expr(arg, Precedence::Assignment))?;
    self.out.write_punct(")");
    Ok(())
  }

  fn emit_binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> EmitResult {
    let prec = op.precedence();
    let (left_min, right_min) = if op.is_right_associative() {
      // The base of `**` can't be a unary expression.
      (Precedence::Update, prec)
    } else {
      (prec, prec.next_tighter())
    };
    // `??` can't be mixed with `||`/`&&` without parentheses.
    let mixes = |stx: &Syntax| match op {
      BinaryOp::Nullish => is_logical(stx),
      BinaryOp::LogicalAnd | BinaryOp::LogicalOr => is_nullish(stx),
      _ => false,
    };
    let arena = self.arena;
    self.emit_operand(left, left_min, mixes(arena.stx(left)))?;
    self.out.write_space();
    if op.is_word() {
      self.out.write_keyword(op.as_str());
    } else {
      self.out.write_punct(op.as_str());
    }
    self.out.write_space();
    self.emit_operand(right, right_min, mixes(arena.stx(right)))
  }

  pub fn emit_prop_key(&mut self, key: &PropKey) -> EmitResult {
    match key {
      PropKey::Direct { name } | PropKey::Private { name } => self.out.write_identifier(name),
      PropKey::Str { value } => self.out.write_raw(&string_literal(value)),
      PropKey::Num { raw } => self.out.write_number(raw),
      PropKey::Computed { expr } => {
        self.out.write_punct("[");
        self.emit_expr(*expr, Precedence::Assignment)?;
        self.out.write_punct("]");
      }
    };
    Ok(())
  }

  fn emit_elements(&mut self, elements: &[Option<NodeId>], pattern: bool) -> EmitResult {
    self.out.write_punct("[");
    for (i, el) in elements.iter().enumerate() {
      if i > 0 {
        self.out.write_punct(",");
        self.out.write_space();
      }
      match el {
        Some(el) if pattern => self.emit_pat(*el)?,
        Some(el) => self.emit_expr(*el, Precedence::Assignment)?,
        None => {}
      };
    }
    if matches!(elements.last(), Some(None)) {
      self.out.write_punct(",");
    }
    self.out.write_punct("]");
    Ok(())
  }

  fn emit_template(&mut self, parts: &[String], exprs: &[NodeId]) -> EmitResult {
    let mut chunk = String::from("`");
    for (i, part) in parts.iter().enumerate() {
      chunk.push_str(part);
      match exprs.get(i) {
        Some(&expr) => {
          chunk.push_str("${");
          self.out.write_raw(&chunk);
          self.emit_expr(expr, Precedence::Sequence)?;
          chunk = String::from("}");
        }
        None => chunk.push('`'),
      }
    }
    self.out.write_raw(&chunk);
    Ok(())
  }

  pub fn emit_params(&mut self, params: &[NodeId]) -> EmitResult {
    self.out.write_punct("(");
    self.comma_separated(params, |em, &p| em.emit_pat(p))?;
    self.out.write_punct(")");
    Ok(())
  }

  /// Writes a function's parameter list and body. `func` must be a [`Syntax::Function`].
  pub fn emit_function_rest(&mut self, func: NodeId) -> EmitResult {
    let arena = self.arena;
    let Syntax::Function { params, body, .. } = arena.stx(func) else {
      return Err(self.unsupported("non-function as function body", func));
    };
    self.emit_params(params)?;
    self.out.write_space();
    self.emit_block(*body)
  }

  /// `function` declarations and expressions.
  pub fn emit_function(&mut self, name: Option<&str>, func: NodeId) -> EmitResult {
    let arena = self.arena;
    let Syntax::Function {
      is_async,
      generator,
      ..
    } = arena.stx(func)
    else {
      return Err(self.unsupported("non-function as function", func));
    };
    if *is_async {
      self.out.write_keyword("async");
    }
    self.out.write_keyword("function");
    if *generator {
      self.out.write_punct("*");
    }
    self.out.write_space();
    if let Some(name) = name {
      self.out.write_identifier(name);
    }
    self.emit_function_rest(func)
  }

  fn emit_method_head(&mut self, kind: MethodKind, key: &PropKey, func: NodeId) -> EmitResult {
    let arena = self.arena;
    let Syntax::Function {
      is_async,
      generator,
      ..
    } = arena.stx(func)
    else {
      return Err(self.unsupported("non-function as method", func));
    };
    match kind {
      MethodKind::Getter => self.out.write_keyword("get"),
      MethodKind::Setter => self.out.write_keyword("set"),
      MethodKind::Method => {}
    };
    if *is_async {
      self.out.write_keyword("async");
    }
    if kind != MethodKind::Method || *is_async {
      self.out.write_space();
    }
    if *generator {
      self.out.write_punct("*");
    }
    self.emit_prop_key(key)?;
    self.emit_function_rest(func)
  }

  /// `class` declarations and expressions.
  pub fn emit_class(&mut self, name: Option<&str>, class: NodeId) -> EmitResult {
    let arena = self.arena;
    let Syntax::Class { extends, members } = arena.stx(class) else {
      return Err(self.unsupported("non-class as class", class));
    };
    self.out.write_keyword("class");
    if let Some(name) = name {
      self.out.write_identifier(name);
    }
    if let Some(extends) = extends {
      self.out.write_keyword("extends");
      self.emit_expr(*extends, Precedence::LeftHandSide)?;
    }
    self.out.write_space();
    self.out.write_punct("{");
    if !members.is_empty() {
      self.out.indent();
      for &member in members {
        self.out.write_newline();
        self.emit_class_member(member)?;
      }
      self.out.dedent();
      self.out.write_newline();
    }
    self.out.write_punct("}");
    Ok(())
  }

  fn emit_class_member(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    match arena.stx(id) {
      Syntax::ClassMethod {
        is_static,
        key,
        kind,
        func,
      } => {
        if *is_static {
          self.out.write_keyword("static");
          self.out.write_space();
        }
        self.emit_method_head(*kind, key, *func)
      }
      Syntax::ClassField {
        is_static,
        key,
        value,
      } => {
        if *is_static {
          self.out.write_keyword("static");
          self.out.write_space();
        }
        self.emit_prop_key(key)?;
        if let Some(value) = value {
          self.out.write_space();
          self.out.write_punct("=");
          self.out.write_space();
          self.emit_expr(*value, Precedence::Assignment)?;
        }
        self.out.write_punct(";");
        Ok(())
      }
      Syntax::StaticBlock { body } => {
        self.out.write_keyword("static");
        self.out.write_space();
        self.emit_braced(body)
      }
      _ => Err(self.unsupported("class member", id)),
    }
  }

  pub fn emit_pat(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    match arena.stx(id) {
      Syntax::IdPat { name } => self.out.write_identifier(name),
      Syntax::ArrayPat { elements } => self.emit_elements(elements, true)?,
      Syntax::ObjPat { props } => {
        self.out.write_punct("{");
        if !props.is_empty() {
          self.out.write_space();
          self.comma_separated(props, |em, &p| em.emit_pat(p))?;
          self.out.write_space();
        }
        self.out.write_punct("}");
      }
      Syntax::ObjPatProp {
        key,
        target,
        shorthand,
      } => {
        let name = match (key, arena.stx(*target)) {
          (PropKey::Direct { name }, Syntax::IdPat { name: target_name })
            if *shorthand && name == target_name =>
          {
            Some(name)
          }
          _ => None,
        };
        match (shorthand, name, arena.stx(*target)) {
          (_, Some(name), _) => self.out.write_identifier(name),
          (true, None, Syntax::AssignPat { .. }) => self.emit_pat(*target)?,
          _ => {
            self.emit_prop_key(key)?;
            self.out.write_punct(":");
            self.out.write_space();
            self.emit_pat(*target)?;
          }
        }
      }
      Syntax::AssignPat { target, default } => {
        self.emit_pat(*target)?;
        self.out.write_space();
        self.out.write_punct("=");
        self.out.write_space();
        self.emit_expr(*default, Precedence::Assignment)?;
      }
      Syntax::RestPat { target } => {
        self.out.write_punct("...");
        self.emit_pat(*target)?;
      }
      // Assignment targets in expressions (e.g. `for (a.b of c)`) stay expressions.
      _ => self.emit_expr(id, Precedence::LeftHandSide)?,
    };
    Ok(())
  }

  fn emit_expr_unparenthesized(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    match arena.stx(id) {
      Syntax::Id { name } => self.out.write_identifier(name),
      Syntax::This => self.out.write_keyword("this"),
      Syntax::Super => self.out.write_keyword("super"),
      Syntax::LitNull => self.out.write_keyword("null"),
      Syntax::LitBool { value } => self.out.write_keyword(if *value { "true" } else { "false" }),
      Syntax::LitNum { raw } | Syntax::LitBigInt { raw } => self.out.write_number(raw),
      Syntax::LitStr { value } => self.out.write_raw(&string_literal(value)),
      Syntax::LitRegex { raw } => self.out.write_raw(raw),
      Syntax::Template { parts, exprs } => self.emit_template(parts, exprs)?,
      Syntax::TaggedTemplate { tag, template } => {
        self.emit_expr(*tag, Precedence::LeftHandSide)?;
        self.emit_expr(*template, Precedence::Primary)?;
      }
      Syntax::Array { elements } => self.emit_elements(elements, false)?,
      Syntax::Object { members } => {
        self.out.write_punct("{");
        if !members.is_empty() {
          self.out.write_space();
          self.comma_separated(members, |em, &m| em.emit_object_member(m))?;
          self.out.write_space();
        }
        self.out.write_punct("}");
      }
      Syntax::Spread { arg } => {
        self.out.write_punct("...");
        self.emit_expr(*arg, Precedence::Assignment)?;
      }
      Syntax::FuncExpr { name, func } => self.emit_function(name.as_deref(), *func)?,
      Syntax::ClassExpr { name, class } => self.emit_class(name.as_deref(), *class)?,
      Syntax::Arrow {
        is_async,
        params,
        body,
      } => {
        if *is_async {
          self.out.write_keyword("async");
          self.out.write_space();
        }
        self.emit_params(params)?;
        self.out.write_space();
        self.out.write_punct("=>");
        self.out.write_space();
        if matches!(arena.stx(*body), Syntax::Block { .. }) {
          self.emit_block(*body)?;
        } else {
          self.emit_expr_guarded(*body, Precedence::Assignment, StartGuard::ArrowBody)?;
        }
      }
      Syntax::Member {
        object,
        property,
        optional,
      } => {
        // `1.x` would lex as a number followed by an identifier.
        let bare_integer = matches!(
          arena.stx(*object),
          Syntax::LitNum { raw } if raw.bytes().all(|b| b.is_ascii_digit())
        );
        self.emit_operand(*object, Precedence::LeftHandSide, bare_integer)?;
        self.out.write_punct(if *optional { "?." } else { "." });
        self.out.write_identifier(property);
      }
      Syntax::ComputedMember {
        object,
        property,
        optional,
      } => {
        self.emit_expr(*object, Precedence::LeftHandSide)?;
        if *optional {
          self.out.write_punct("?.");
        }
        self.out.write_punct("[");
        self.emit_expr(*property, Precedence::Sequence)?;
        self.out.write_punct("]");
      }
      Syntax::Call {
        callee,
        args,
        optional,
      } => {
        self.emit_expr(*callee, Precedence::LeftHandSide)?;
        if *optional {
          self.out.write_punct("?.");
        }
        self.emit_args(args)?;
      }
      Syntax::New { callee, args } => {
        self.out.write_keyword("new");
        let force = self.contains_call(*callee);
        if force {
          self.out.write_space();
        }
        self.emit_operand(*callee, Precedence::LeftHandSide, force)?;
        self.emit_args(args)?;
      }
      Syntax::ImportCall { args } => {
        self.out.write_keyword("import");
        self.emit_args(args)?;
      }
      Syntax::Unary { op, arg } => {
        if op.is_word() {
          self.out.write_keyword(op.as_str());
          self.out.write_space();
        } else {
          self.out.write_punct(op.as_str());
        }
        self.emit_expr(*arg, Precedence::Unary)?;
      }
      Syntax::Update { op, prefix, arg } => {
        if *prefix {
          self.out.write_punct(op.as_str());
          self.emit_expr(*arg, Precedence::LeftHandSide)?;
        } else {
          self.emit_expr(*arg, Precedence::LeftHandSide)?;
          self.out.write_punct(op.as_str());
        }
      }
      Syntax::Binary { op, left, right } => self.emit_binary(*op, *left, *right)?,
      Syntax::Cond { test, cons, alt } => {
        self.emit_expr(*test, Precedence::Nullish)?;
        self.out.write_space();
        self.out.write_punct("?");
        self.out.write_space();
        let in_disallowed = std::mem::replace(&mut self.in_disallowed, false);
        self.emit_expr(*cons, Precedence::Assignment)?;
        self.in_disallowed = in_disallowed;
        self.out.write_space();
        self.out.write_punct(":");
        self.out.write_space();
        self.emit_expr(*alt, Precedence::Assignment)?;
      }
      Syntax::Assign { op, target, value } => {
        self.emit_expr(*target, Precedence::LeftHandSide)?;
        self.out.write_space();
        self.out.write_punct(op.as_str());
        self.out.write_space();
        self.emit_expr(*value, Precedence::Assignment)?;
      }
      Syntax::Seq { exprs } => {
        self.comma_separated(exprs, |em, &e| em.emit_expr(e, Precedence::Assignment))?;
      }
      Syntax::Yield { arg, delegate } => {
        self.out.write_keyword("yield");
        if *delegate {
          self.out.write_punct("*");
        }
        if let Some(arg) = arg {
          self.out.write_space();
          self.emit_expr(*arg, Precedence::Assignment)?;
        }
      }
      Syntax::Await { arg } => {
        self.out.write_keyword("await");
        self.out.write_space();
        self.emit_expr(*arg, Precedence::Unary)?;
      }
      Syntax::JsxElem { .. } => self.emit_jsx_elem(id)?,
      _ => return Err(self.unsupported("non-expression in expression position", id)),
    };
    Ok(())
  }

  fn emit_object_member(&mut self, id: NodeId) -> EmitResult {
    let arena = self.arena;
    match arena.stx(id) {
      Syntax::Prop {
        key,
        value,
        shorthand,
      } => {
        let keeps_shorthand = *shorthand
          && matches!(
            (key, arena.stx(*value)),
            (PropKey::Direct { name }, Syntax::Id { name: value_name }) if name == value_name
          );
        if keeps_shorthand {
          return self.emit_prop_key(key);
        }
        self.emit_prop_key(key)?;
        self.out.write_punct(":");
        self.out.write_space();
        self.emit_expr(*value, Precedence::Assignment)
      }
      Syntax::Method { key, kind, func } => self.emit_method_head(*kind, key, *func),
      Syntax::Spread { .. } => self.emit_expr(id, Precedence::Assignment),
      _ => Err(self.unsupported("object member", id)),
    }
  }
}
