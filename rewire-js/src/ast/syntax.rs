use super::NodeId;
use crate::operator::{AssignOp, BinaryOp, UnaryOp, UpdateOp};
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub enum VarDeclKind {
  Const,
  Let,
  Var,
}

impl VarDeclKind {
  pub fn as_str(self) -> &'static str {
    match self {
      VarDeclKind::Const => "const",
      VarDeclKind::Let => "let",
      VarDeclKind::Var => "var",
    }
  }

  pub fn is_mutable(self) -> bool {
    self != VarDeclKind::Const
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub enum MethodKind {
  Getter,
  Method,
  Setter,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "$t")]
pub enum PropKey {
  Direct { name: String },
  Str { value: String },
  Num { raw: String },
  Computed { expr: NodeId },
  // Includes the leading `#`.
  Private { name: String },
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportName {
  pub imported: String,
  pub local: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "$t")]
pub enum Syntax {
  // Patterns. These only appear in declaration positions (parameters, declarators, catch
  // bindings); assignment targets in expressions stay expressions.
  IdPat {
    name: String,
  },
  // The last element may be a RestPat.
  ArrayPat {
    elements: Vec<Option<NodeId>>,
  },
  // ObjPatProp members, optionally followed by a RestPat.
  ObjPat {
    props: Vec<NodeId>,
  },
  ObjPatProp {
    key: PropKey,
    target: NodeId,
    shorthand: bool,
  },
  AssignPat {
    target: NodeId,
    default: NodeId,
  },
  RestPat {
    target: NodeId,
  },

  // Expressions.
  Id {
    name: String,
  },
  This,
  Super,
  LitNull,
  LitBool {
    value: bool,
  },
  LitNum {
    raw: String,
  },
  LitBigInt {
    raw: String,
  },
  // Decoded value; the emitter re-escapes it.
  LitStr {
    value: String,
  },
  LitRegex {
    raw: String,
  },
  // `parts` are raw (undecoded) and always one longer than `exprs`.
  Template {
    parts: Vec<String>,
    exprs: Vec<NodeId>,
  },
  TaggedTemplate {
    tag: NodeId,
    template: NodeId,
  },
  Array {
    elements: Vec<Option<NodeId>>,
  },
  Object {
    members: Vec<NodeId>,
  },
  Prop {
    key: PropKey,
    value: NodeId,
    // Only honored by the emitter while the value is still an Id with the same name as the key.
    shorthand: bool,
  },
  Method {
    key: PropKey,
    kind: MethodKind,
    func: NodeId,
  },
  Spread {
    arg: NodeId,
  },
  // Shared by function declarations, function expressions and methods.
  Function {
    is_async: bool,
    generator: bool,
    params: Vec<NodeId>,
    body: NodeId,
  },
  FuncExpr {
    name: Option<String>,
    func: NodeId,
  },
  Arrow {
    is_async: bool,
    params: Vec<NodeId>,
    // A Block for block bodies, otherwise an expression.
    body: NodeId,
  },
  // Shared by class declarations and class expressions.
  Class {
    extends: Option<NodeId>,
    members: Vec<NodeId>,
  },
  ClassExpr {
    name: Option<String>,
    class: NodeId,
  },
  ClassMethod {
    is_static: bool,
    key: PropKey,
    kind: MethodKind,
    func: NodeId,
  },
  ClassField {
    is_static: bool,
    key: PropKey,
    value: Option<NodeId>,
  },
  StaticBlock {
    body: Vec<NodeId>,
  },
  Member {
    object: NodeId,
    property: String,
    optional: bool,
  },
  ComputedMember {
    object: NodeId,
    property: NodeId,
    optional: bool,
  },
  Call {
    callee: NodeId,
    args: Vec<NodeId>,
    optional: bool,
  },
  New {
    callee: NodeId,
    args: Vec<NodeId>,
  },
  Unary {
    op: UnaryOp,
    arg: NodeId,
  },
  Update {
    op: UpdateOp,
    prefix: bool,
    arg: NodeId,
  },
  Binary {
    op: BinaryOp,
    left: NodeId,
    right: NodeId,
  },
  Cond {
    test: NodeId,
    cons: NodeId,
    alt: NodeId,
  },
  Assign {
    op: AssignOp,
    target: NodeId,
    value: NodeId,
  },
  Seq {
    exprs: Vec<NodeId>,
  },
  Yield {
    arg: Option<NodeId>,
    delegate: bool,
  },
  Await {
    arg: NodeId,
  },
  // `import(...)`; the argument list is kept as-is.
  ImportCall {
    args: Vec<NodeId>,
  },

  // JSX. A missing element name denotes a fragment.
  JsxElem {
    name: Option<NodeId>,
    attrs: Vec<NodeId>,
    children: Vec<NodeId>,
    self_closing: bool,
  },
  // A plain tag name. Only names that don't start with a lowercase ASCII letter refer to
  // bindings; the rest are intrinsic elements.
  JsxTagName {
    name: String,
  },
  JsxTagMember {
    object: NodeId,
    property: String,
  },
  JsxAttr {
    name: String,
    value: Option<NodeId>,
  },
  JsxSpreadAttr {
    arg: NodeId,
  },
  // Attribute string, including its quotes.
  JsxStr {
    raw: String,
  },
  JsxText {
    raw: String,
  },
  JsxExprContainer {
    expr: Option<NodeId>,
  },

  // Statements.
  VarDecl {
    kind: VarDeclKind,
    declarators: Vec<NodeId>,
  },
  Declarator {
    pat: NodeId,
    init: Option<NodeId>,
  },
  // The name can only be omitted in a default export.
  FuncDecl {
    name: Option<String>,
    func: NodeId,
  },
  // The name can only be omitted in a default export.
  ClassDecl {
    name: Option<String>,
    class: NodeId,
  },
  ExprStmt {
    expr: NodeId,
  },
  Block {
    body: Vec<NodeId>,
  },
  Empty,
  If {
    test: NodeId,
    cons: NodeId,
    alt: Option<NodeId>,
  },
  For {
    init: Option<NodeId>,
    test: Option<NodeId>,
    update: Option<NodeId>,
    body: NodeId,
  },
  // `left` is a VarDecl without initializers, or an assignment target expression.
  ForIn {
    of: bool,
    left: NodeId,
    right: NodeId,
    body: NodeId,
  },
  While {
    test: NodeId,
    body: NodeId,
  },
  DoWhile {
    body: NodeId,
    test: NodeId,
  },
  Return {
    arg: Option<NodeId>,
  },
  Throw {
    arg: NodeId,
  },
  Try {
    block: NodeId,
    handler: Option<NodeId>,
    finalizer: Option<NodeId>,
  },
  Catch {
    param: Option<NodeId>,
    body: NodeId,
  },
  Break {
    label: Option<String>,
  },
  Continue {
    label: Option<String>,
  },
  Labeled {
    label: String,
    body: NodeId,
  },
  Switch {
    discriminant: NodeId,
    cases: Vec<NodeId>,
  },
  SwitchCase {
    test: Option<NodeId>,
    body: Vec<NodeId>,
  },
  Debugger,

  // Module items.
  Import {
    default: Option<String>,
    namespace: Option<String>,
    names: Vec<ImportName>,
    source: String,
  },
  // `export` wrapping a VarDecl, FuncDecl or ClassDecl.
  ExportDecl {
    decl: NodeId,
  },
  // `export default` wrapping a FuncDecl or ClassDecl, either of which may be anonymous.
  ExportDefaultDecl {
    decl: NodeId,
  },
  ExportDefaultExpr {
    expr: NodeId,
  },
  ExportList {
    specifiers: Vec<NodeId>,
    from: Option<String>,
  },
  ExportSpecifier {
    local: String,
    exported: String,
  },
  ExportAll {
    alias: Option<String>,
    from: String,
  },
}

impl Syntax {
  pub fn is_function_like(&self) -> bool {
    matches!(self, Syntax::Arrow { .. } | Syntax::FuncExpr { .. })
  }
}
