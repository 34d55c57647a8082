//! Expression AST types.
//!
//! Search conditions and row expressions share one [`Expr`] type. Which
//! variants can appear where is decided by the parser.

use super::{Id, SelectStatement};

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// `TRUE` or `FALSE`.
    Boolean(bool),
    Null,
    /// Numeric literal, kept as written (`42`, `1.5e-3`, `0x1F`).
    Number(String),
    /// String literal, unescaped.
    String(String),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Logical
    Or,
    And,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Arithmetic
    Add,
    Sub,
    Concat,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Concat => "||",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
        }
    }

    /// Returns true for `= <> < <= > >=`.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical NOT
    Not,
    /// Unary plus
    Plus,
    /// Negation (-)
    Neg,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Not => "NOT",
            Self::Plus => "+",
            Self::Neg => "-",
        }
    }
}

/// The right-hand side of `IS [NOT]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsValue {
    True,
    False,
    Unknown,
    Null,
}

impl IsValue {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Unknown => "UNKNOWN",
            Self::Null => "NULL",
        }
    }
}

/// The quantifier of `x > ALL (SELECT ...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonQuantifier {
    All,
    Some,
    Any,
}

impl ComparisonQuantifier {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Some => "SOME",
            Self::Any => "ANY",
        }
    }
}

/// The operand of `IN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InList {
    Subquery(Box<SelectStatement>),
    /// A parenthesized list; may hold a single element.
    Values(Vec<Expr>),
}

/// A column reference, `a`, `t.a`, `s.t.*` or `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Dotted path; empty only for a bare `*`.
    pub path: Vec<Id>,
    /// Whether the reference ends in `*`.
    pub wildcard: bool,
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// The (possibly qualified) function name.
    pub name: Vec<Id>,
    /// The arguments. `COUNT(*)` has a single wildcard column argument.
    pub args: Vec<Expr>,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A binary expression.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// `expr IS [NOT] TRUE | FALSE | UNKNOWN | NULL`.
    Is {
        expr: Box<Expr>,
        negated: bool,
        value: IsValue,
    },

    /// `left op ALL | SOME | ANY (query)`.
    QuantifiedComparison {
        left: Box<Expr>,
        op: BinaryOp,
        quantifier: ComparisonQuantifier,
        query: Box<SelectStatement>,
    },

    /// BETWEEN expression.
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// IN expression.
    In {
        expr: Box<Expr>,
        list: InList,
        negated: bool,
    },

    /// LIKE expression.
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        negated: bool,
    },

    /// `EXISTS (query)`.
    Exists(Box<SelectStatement>),

    /// A literal value.
    Literal(Literal),

    /// A `?` placeholder, numbered from 1 in source order.
    Parameter { position: usize },

    /// A column reference.
    Column(ColumnRef),

    /// A function call.
    Function(FunctionCall),

    /// A parenthesized list of two or more expressions.
    List(Vec<Expr>),

    /// A scalar subquery.
    Subquery(Box<SelectStatement>),

    /// CASE expression.
    Case {
        /// The operand of a simple CASE.
        operand: Option<Box<Expr>>,
        /// WHEN/THEN clauses.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE clause.
        else_result: Option<Box<Expr>>,
    },
}

impl Expr {
    /// Creates a new column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(ColumnRef {
            path: vec![Id::new(name)],
            wildcard: false,
        })
    }

    /// Creates a new qualified column reference.
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column(ColumnRef {
            path: vec![Id::new(table), Id::new(name)],
            wildcard: false,
        })
    }

    /// Creates a bare `*`.
    #[must_use]
    pub const fn wildcard() -> Self {
        Self::Column(ColumnRef {
            path: Vec::new(),
            wildcard: true,
        })
    }

    /// Creates a numeric literal from its source text.
    #[must_use]
    pub fn number(text: impl Into<String>) -> Self {
        Self::Literal(Literal::Number(text.into()))
    }

    /// Creates a new string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Creates a new boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    /// Creates a NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a unary expression.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, right: Self) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt(self, right: Self) -> Self {
        self.binary(BinaryOp::Gt, right)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::Is {
            expr: Box::new(self),
            negated: false,
            value: IsValue::Null,
        }
    }

    /// Creates a BETWEEN expression.
    #[must_use]
    pub fn between(self, low: Self, high: Self) -> Self {
        Self::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
            negated: false,
        }
    }

    /// Creates an IN expression over a value list.
    #[must_use]
    pub fn in_list(self, list: Vec<Self>) -> Self {
        Self::In {
            expr: Box::new(self),
            list: InList::Values(list),
            negated: false,
        }
    }

    /// Returns how tightly the expression binds when rendered, matching the
    /// grammar tier that produces it. Higher binds tighter.
    pub(crate) const fn binding_level(&self) -> u8 {
        match self {
            Self::Binary { op, .. } => match op {
                BinaryOp::Or => 1,
                BinaryOp::And => 2,
                BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq => 5,
                BinaryOp::Add | BinaryOp::Sub | BinaryOp::Concat => 6,
                BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 7,
                BinaryOp::Pow => 8,
            },
            Self::Unary {
                op: UnaryOp::Not, ..
            } => 3,
            Self::Is {
                value: IsValue::True | IsValue::False | IsValue::Unknown,
                ..
            } => 4,
            Self::Is { .. }
            | Self::QuantifiedComparison { .. }
            | Self::Between { .. }
            | Self::In { .. }
            | Self::Like { .. }
            | Self::Exists(_) => 5,
            Self::Unary { .. }
            | Self::Literal(_)
            | Self::Parameter { .. }
            | Self::Column(_)
            | Self::Function(_)
            | Self::List(_)
            | Self::Subquery(_)
            | Self::Case { .. } => ROW_PRIMARY,
        }
    }
}

/// Binding level of everything a row expression accepts.
pub(crate) const ROW_EXPR: u8 = 6;
/// Binding level of the operands of unary `+`/`-`.
pub(crate) const ROW_PRIMARY: u8 = 9;
