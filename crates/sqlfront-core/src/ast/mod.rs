//! Abstract Syntax Tree (AST) types for SELECT statements.
//!
//! Every node owns its children. All nodes implement `Display`, rendering
//! SQL that parses back to an equal tree.

mod display;
mod expression;
mod ident;
mod statement;
mod table_ref;

pub use expression::{
    BinaryOp, ColumnRef, ComparisonQuantifier, Expr, FunctionCall, InList, IsValue, Literal,
    UnaryOp,
};
pub use ident::Id;
pub use statement::{
    CommonTableExpr, GroupBy, OrderByItem, OrderDirection, Projection, QueryExpressionBody,
    QueryPrimary, SelectStatement, SetOperator, SetQuantifier, WithClause,
};
pub use table_ref::{JoinKind, TableRef};
