//! Abstract syntax tree of a Skeptical program.
//!
//! Nodes own their data (no borrowed tokens) so a tree can be built by hand,
//! outlive the source buffer, and be serialised by `parse --json`.  Every
//! statement and declaration remembers the 1‑based line it started on; the
//! interpreter uses it to locate runtime errors.

use serde::Serialize;
use std::fmt;

/// A whole program: the static division followed by the dynamic division.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Program {
    pub static_division: Vec<StaticDecl>,
    pub dynamic_division: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticDecl {
    pub kind: DeclKind,
    pub line: usize,
}

/// Declarations allowed in the static division.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DeclKind {
    /// `program "name";` (metadata only)
    ProgramId(String),

    /// `author "name";` (metadata only)
    Author(String),

    /// `date "text";` (metadata only)
    Date(String),

    /// `const NAME = expression;`
    Const { name: String, value: Expr },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: usize,
}

impl Stmt {
    pub fn new(kind: StmtKind, line: usize) -> Self {
        Stmt { kind, line }
    }
}

/// Executable statements of the dynamic division.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    /// `name = value (as number|string)?;`
    Assign {
        name: String,
        value: Expr,
        type_tag: Option<TypeTag>,
    },

    /// `print value;`
    Print(Expr),

    /// `input name "prompt";`
    Input { name: String, prompt: String },

    /// `if condition { ... } else { ... }`; an absent else is an empty list.
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },

    /// `loop var from start to end { ... }`, inclusive on both ends.
    Loop {
        var: String,
        start: Expr,
        end: Expr,
        body: Vec<Stmt>,
    },

    /// `rand name from min to max;`
    Rand { name: String, min: Expr, max: Expr },

    /// `func name(params) returns var { ... }`
    FuncDef {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
        returns: String,
    },

    /// `call name(args);`
    Call { name: String, args: Vec<Expr> },
}

/// Advisory type annotation on an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeTag {
    Number,
    String,
}

impl TypeTag {
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Number => "number",
            TypeTag::String => "string",
        }
    }
}

/// Expressions, listed from the loosest to the tightest binding form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// `left or right`
    Disjunction(Box<Expr>, Box<Expr>),

    /// `left and right`
    Conjunction(Box<Expr>, Box<Expr>),

    Comparison(Box<Expr>, CompareOp, Box<Expr>),

    Sum(Box<Expr>, SumOp, Box<Expr>),

    Term(Box<Expr>, TermOp, Box<Expr>),

    /// `base ^ exponent`, right‑associative.  No exponent means `^ 1`.
    Power(Box<Expr>, Option<Box<Expr>>),

    Unary(UnaryOp, Box<Expr>),

    /// Parenthesised sub‑expression.
    Group(Box<Expr>),

    Number(f64),

    Str(String),

    Identifier(String),
}

impl Expr {
    pub fn number(n: f64) -> Self {
        Expr::Number(n)
    }

    pub fn string<S: Into<String>>(s: S) -> Self {
        Expr::Str(s.into())
    }

    pub fn ident<S: Into<String>>(name: S) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn sum(left: Expr, op: SumOp, right: Expr) -> Self {
        Expr::Sum(Box::new(left), op, Box::new(right))
    }

    pub fn term(left: Expr, op: TermOp, right: Expr) -> Self {
        Expr::Term(Box::new(left), op, Box::new(right))
    }

    pub fn compare(left: Expr, op: CompareOp, right: Expr) -> Self {
        Expr::Comparison(Box::new(left), op, Box::new(right))
    }

    pub fn power(base: Expr, exponent: Option<Expr>) -> Self {
        Expr::Power(Box::new(base), exponent.map(Box::new))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SumOp {
    Add,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TermOp {
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Negate,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
            CompareOp::Less => "<",
            CompareOp::Greater => ">",
            CompareOp::LessEqual => "<=",
            CompareOp::GreaterEqual => ">=",
        };

        f.write_str(symbol)
    }
}

impl fmt::Display for SumOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SumOp::Add => "+",
            SumOp::Sub => "-",
        })
    }
}

impl fmt::Display for TermOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TermOp::Mul => "*",
            TermOp::Div => "/",
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Negate => "-",
        })
    }
}
