//! Abstract Syntax Tree definitions
//!
//! Every slot that can hold more than one shape is its own closed enum, so
//! the generator matches exhaustively instead of inspecting values at run
//! time. Nodes own their children; the tree has no sharing and no cycles,
//! which keeps it directly serializable for `--json` dumps.

use serde::Serialize;

pub use crate::lexer::NumberKind;

/// Root AST node representing a complete program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ast {
    pub block: Block,
}

/// An ordered list of statements sharing one indentation depth
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

impl Block {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}

/// Statement node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Stmt {
    /// `-- text`
    Comment { text: String },

    /// `a, b.c = x, y`
    Assignment {
        targets: Vec<AssignTarget>,
        values: ExprList,
    },

    /// A bare expression, usually a call
    Expression { expr: Expr },

    If {
        condition: Expr,
        body: Block,
        else_ifs: Vec<ElseIf>,
        /// `None` when no `else` clause was written
        else_body: Option<Block>,
    },

    While { condition: Expr, body: Block },

    /// `for i = start, end[, step]`
    NumericFor {
        index: String,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
        body: Block,
    },

    /// `for k, v in source`
    ForEach {
        names: Vec<String>,
        source: ExprList,
        body: Block,
    },

    Return { values: ExprList },

    FlowControl { kind: FlowControl },
}

impl Stmt {
    /// Node kind used in render errors
    pub fn kind(&self) -> &'static str {
        match self {
            Stmt::Comment { .. } => "Comment",
            Stmt::Assignment { .. } => "Assignment",
            Stmt::Expression { .. } => "ExpressionStatement",
            Stmt::If { .. } => "If",
            Stmt::While { .. } => "While",
            Stmt::NumericFor { .. } => "NumericFor",
            Stmt::ForEach { .. } => "ForEach",
            Stmt::Return { .. } => "Return",
            Stmt::FlowControl { .. } => "FlowControl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElseIf {
    pub condition: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowControl {
    Break,
    Continue,
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AssignTarget {
    /// `x = ...`
    Name { name: String },
    /// `@x = ...`
    SelfField { name: String },
    /// `a.b[c] = ...`; the chain ends in a field or index access
    Chain(Chain),
}

/// Comma-joined expressions: assignment values, return values, call
/// arguments and foreach sources. Empty is a valid, distinct state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExprList(pub Vec<Expr>);

impl ExprList {
    pub fn new(exprs: Vec<Expr>) -> Self {
        Self(exprs)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.0.iter()
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr {
    /// `true`, `false` or `nil`, kept as raw text
    Primitive { value: String },

    Number(Number),

    String(StringLiteral),

    /// Variable reference
    Ref { name: String },

    /// `@name`; an empty name is the receiver itself
    SelfRef { name: String },

    Parens { expr: Box<Expr> },

    /// Flat operator chain
    Binary(BinaryChain),

    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },

    Chain(Chain),

    Table(Table),

    Function(FunctionExpr),
}

impl Expr {
    /// Node kind used in errors
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Primitive { .. } => "Primitive",
            Expr::Number(_) => "Number",
            Expr::String(_) => "StringLiteral",
            Expr::Ref { .. } => "Ref",
            Expr::SelfRef { .. } => "SelfRef",
            Expr::Parens { .. } => "Parens",
            Expr::Binary(_) => "Expression",
            Expr::Unary { .. } => "Unary",
            Expr::Chain(_) => "Chain",
            Expr::Table(_) => "Table",
            Expr::Function(_) => "FunctionExpression",
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Expr::Ref { name: name.into() }
    }

    pub fn number(kind: NumberKind, text: impl Into<String>) -> Self {
        Expr::Number(Number {
            kind,
            text: text.into(),
        })
    }

    pub fn integer(text: impl Into<String>) -> Self {
        Self::number(NumberKind::Integer, text)
    }
}

/// A number literal; `text` is exactly what the source contained
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Number {
    pub kind: NumberKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub delimiter: char,
    pub parts: Vec<StringPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum StringPart {
    Text { text: String },
    Interpolation { expr: Box<Expr> },
}

/// `head (op value)*`, kept in source order with no precedence applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryChain {
    pub head: Box<Expr>,
    pub rest: Vec<(BinaryOp, Expr)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Concat,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOp {
    /// The Lua spelling of the operator
    pub fn as_lua(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "^",
            BinaryOp::Concat => "..",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "~=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,
    Negate,
    Length,
}

/// A target followed by postfix operations, applied left to right
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chain {
    pub target: Box<Expr>,
    pub ops: Vec<ChainOp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ChainOp {
    Call { args: ExprList },
    Dot { field: String },
    Method { field: String },
    Index { index: Expr },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub entries: Vec<TableEntry>,
}

/// One table entry; `key` is `None` for positional values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableEntry {
    pub key: Option<TableKey>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TableKey {
    /// `name: value`
    Name { name: String },
    /// `[expr]: value`
    Expr { expr: Expr },
}

/// `(a, b = 1) -> body`, or `=>` for methods. The receiver parameter of
/// a method is not stored in `params`; it is added when rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionExpr {
    pub is_method: bool,
    pub params: Vec<Param>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
}

impl Param {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }
}
