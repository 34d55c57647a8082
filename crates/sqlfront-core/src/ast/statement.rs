//! SELECT statement AST types.

use super::expression::Expr;
use super::{Id, TableRef};

/// A complete SELECT statement: optional WITH, a query body, and ORDER BY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub with_clause: Option<WithClause>,
    pub body: QueryExpressionBody,
    /// Empty when there is no ORDER BY.
    pub order_by: Vec<OrderByItem>,
}

/// `WITH [RECURSIVE] cte, ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithClause {
    pub recursive: bool,
    /// At least one entry.
    pub ctes: Vec<CommonTableExpr>,
}

/// `name [(col, ...)] AS (query)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonTableExpr {
    pub name: Id,
    pub columns: Vec<Id>,
    pub query: Box<SelectStatement>,
}

/// Set operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Except,
    Intersect,
}

impl SetOperator {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Except => "EXCEPT",
            Self::Intersect => "INTERSECT",
        }
    }
}

/// `ALL` / `DISTINCT` after SELECT, GROUP BY or a set operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetQuantifier {
    /// Neither keyword was written.
    #[default]
    Unspecified,
    All,
    Distinct,
}

impl SetQuantifier {
    /// Returns the SQL keyword, if any.
    #[must_use]
    pub const fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::All => Some("ALL"),
            Self::Distinct => Some("DISTINCT"),
        }
    }
}

/// The body of a query: a single SELECT block or a set operation.
///
/// Parentheses around a query body are structural only and leave no node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpressionBody {
    SetOp {
        op: SetOperator,
        quantifier: SetQuantifier,
        left: Box<QueryExpressionBody>,
        right: Box<QueryExpressionBody>,
    },
    Primary(Box<QueryPrimary>),
}

impl QueryExpressionBody {
    /// Returns the SELECT block if the body is not a set operation.
    #[must_use]
    pub fn as_primary(&self) -> Option<&QueryPrimary> {
        match self {
            Self::Primary(primary) => Some(primary),
            Self::SetOp { .. } => None,
        }
    }
}

/// A single `SELECT ... FROM ... WHERE ... GROUP BY ... HAVING ...` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPrimary {
    pub quantifier: SetQuantifier,
    /// At least one entry.
    pub projections: Vec<Projection>,
    /// Comma-separated FROM entries; empty when there is no FROM.
    pub from: Vec<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: Option<GroupBy>,
    pub having: Option<Expr>,
}

/// `GROUP BY [ALL | DISTINCT] expr, ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBy {
    pub quantifier: SetQuantifier,
    pub items: Vec<Expr>,
}

/// One entry of the select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub expr: Expr,
    pub alias: Option<Id>,
}

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// No direction written.
    #[default]
    Unspecified,
    Asc,
    Desc,
}

impl OrderDirection {
    /// Returns the SQL keyword, if any.
    #[must_use]
    pub const fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::Asc => Some("ASC"),
            Self::Desc => Some("DESC"),
        }
    }
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByItem {
    pub expr: Expr,
    pub direction: OrderDirection,
}
