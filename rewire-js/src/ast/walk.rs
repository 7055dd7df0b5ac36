use super::Arena;
use super::NodeId;
use super::PropKey;
use super::Syntax;

fn key_child(key: &PropKey, out: &mut Vec<NodeId>) {
  if let PropKey::Computed { expr } = key {
    out.push(*expr);
  }
}

/// Direct children of a node, in source order.
pub fn children(stx: &Syntax) -> Vec<NodeId> {
  let mut out = Vec::new();
  match stx {
    Syntax::IdPat { .. }
    | Syntax::Id { .. }
    | Syntax::This
    | Syntax::Super
    | Syntax::LitNull
    | Syntax::LitBool { .. }
    | Syntax::LitNum { .. }
    | Syntax::LitBigInt { .. }
    | Syntax::LitStr { .. }
    | Syntax::LitRegex { .. }
    | Syntax::JsxTagName { .. }
    | Syntax::JsxStr { .. }
    | Syntax::JsxText { .. }
    | Syntax::Empty
    | Syntax::Break { .. }
    | Syntax::Continue { .. }
    | Syntax::Debugger
    | Syntax::Import { .. }
    | Syntax::ExportSpecifier { .. }
    | Syntax::ExportAll { .. } => {}
    Syntax::ArrayPat { elements } | Syntax::Array { elements } => {
      out.extend(elements.iter().flatten().copied());
    }
    Syntax::ObjPat { props } => out.extend(props.iter().copied()),
    Syntax::ObjPatProp { key, target, .. } => {
      key_child(key, &mut out);
      out.push(*target);
    }
    Syntax::AssignPat { target, default } => {
      out.push(*target);
      out.push(*default);
    }
    Syntax::RestPat { target } => out.push(*target),
    Syntax::Template { exprs, .. } => out.extend(exprs.iter().copied()),
    Syntax::TaggedTemplate { tag, template } => {
      out.push(*tag);
      out.push(*template);
    }
    Syntax::Object { members } => out.extend(members.iter().copied()),
    Syntax::Prop { key, value, .. } => {
      key_child(key, &mut out);
      out.push(*value);
    }
    Syntax::Method { key, func, .. } => {
      key_child(key, &mut out);
      out.push(*func);
    }
    Syntax::Spread { arg } | Syntax::JsxSpreadAttr { arg } | Syntax::Await { arg } => {
      out.push(*arg)
    }
    Syntax::Function { params, body, .. } | Syntax::Arrow { params, body, .. } => {
      out.extend(params.iter().copied());
      out.push(*body);
    }
    Syntax::FuncExpr { func, .. } | Syntax::FuncDecl { func, .. } => out.push(*func),
    Syntax::Class { extends, members } => {
      out.extend(extends.iter().copied());
      out.extend(members.iter().copied());
    }
    Syntax::ClassExpr { class, .. } | Syntax::ClassDecl { class, .. } => out.push(*class),
    Syntax::ClassMethod { key, func, .. } => {
      key_child(key, &mut out);
      out.push(*func);
    }
    Syntax::ClassField { key, value, .. } => {
      key_child(key, &mut out);
      out.extend(value.iter().copied());
    }
    Syntax::StaticBlock { body } | Syntax::Block { body } => out.extend(body.iter().copied()),
    Syntax::Member { object, .. } => out.push(*object),
    Syntax::ComputedMember {
      object, property, ..
    } => {
      out.push(*object);
      out.push(*property);
    }
    Syntax::Call { callee, args, .. } | Syntax::New { callee, args } => {
      out.push(*callee);
      out.extend(args.iter().copied());
    }
    Syntax::ImportCall { args } => out.extend(args.iter().copied()),
    Syntax::Unary { arg, .. } | Syntax::Update { arg, .. } => out.push(*arg),
    Syntax::Binary { left, right, .. } => {
      out.push(*left);
      out.push(*right);
    }
    Syntax::Cond { test, cons, alt } => {
      out.push(*test);
      out.push(*cons);
      out.push(*alt);
    }
    Syntax::Assign { target, value, .. } => {
      out.push(*target);
      out.push(*value);
    }
    Syntax::Seq { exprs } => out.extend(exprs.iter().copied()),
    Syntax::Yield { arg, .. } => out.extend(arg.iter().copied()),
    Syntax::JsxElem {
      name,
      attrs,
      children,
      ..
    } => {
      out.extend(name.iter().copied());
      out.extend(attrs.iter().copied());
      out.extend(children.iter().copied());
    }
    Syntax::JsxTagMember { object, .. } => out.push(*object),
    Syntax::JsxAttr { value, .. } => out.extend(value.iter().copied()),
    Syntax::JsxExprContainer { expr } => out.extend(expr.iter().copied()),
    Syntax::VarDecl { declarators, .. } => out.extend(declarators.iter().copied()),
    Syntax::Declarator { pat, init } => {
      out.push(*pat);
      out.extend(init.iter().copied());
    }
    Syntax::ExprStmt { expr } | Syntax::ExportDefaultExpr { expr } => out.push(*expr),
    Syntax::If { test, cons, alt } => {
      out.push(*test);
      out.push(*cons);
      out.extend(alt.iter().copied());
    }
    Syntax::For {
      init,
      test,
      update,
      body,
    } => {
      out.extend(init.iter().copied());
      out.extend(test.iter().copied());
      out.extend(update.iter().copied());
      out.push(*body);
    }
    Syntax::ForIn {
      left, right, body, ..
    } => {
      out.push(*left);
      out.push(*right);
      out.push(*body);
    }
    Syntax::While { test, body } => {
      out.push(*test);
      out.push(*body);
    }
    Syntax::DoWhile { body, test } => {
      out.push(*body);
      out.push(*test);
    }
    Syntax::Return { arg } => out.extend(arg.iter().copied()),
    Syntax::Throw { arg } => out.push(*arg),
    Syntax::Try {
      block,
      handler,
      finalizer,
    } => {
      out.push(*block);
      out.extend(handler.iter().copied());
      out.extend(finalizer.iter().copied());
    }
    Syntax::Catch { param, body } => {
      out.extend(param.iter().copied());
      out.push(*body);
    }
    Syntax::Labeled { body, .. } => out.push(*body),
    Syntax::Switch {
      discriminant,
      cases,
    } => {
      out.push(*discriminant);
      out.extend(cases.iter().copied());
    }
    Syntax::SwitchCase { test, body } => {
      out.extend(test.iter().copied());
      out.extend(body.iter().copied());
    }
    Syntax::ExportDecl { decl } | Syntax::ExportDefaultDecl { decl } => out.push(*decl),
    Syntax::ExportList { specifiers, .. } => out.extend(specifiers.iter().copied()),
  };
  out
}

/// Calls `f` for `root` and every node reachable from it, parents before children.
pub fn visit_preorder(arena: &Arena, root: NodeId, f: &mut impl FnMut(NodeId, &Syntax)) {
  let mut stack = vec![root];
  while let Some(id) = stack.pop() {
    let stx = arena.stx(id);
    f(id, stx);
    // Reverse so children are visited in source order.
    stack.extend(children(stx).into_iter().rev());
  }
}

#[cfg(test)]
mod tests {
  use super::visit_preorder;
  use crate::ast::Arena;
  use crate::ast::Syntax;
  use crate::operator::BinaryOp;

  #[test]
  fn test_preorder_is_source_order() {
    let mut arena = Arena::new();
    let a = arena.synth(Syntax::Id { name: "a".into() });
    let b = arena.synth(Syntax::Id { name: "b".into() });
    let bin = arena.synth(Syntax::Binary {
      op: BinaryOp::Add,
      left: a,
      right: b,
    });
    let mut seen = Vec::new();
    visit_preorder(&arena, bin, &mut |id, _| seen.push(id));
    assert_eq!(seen, vec![bin, a, b]);
  }
}
