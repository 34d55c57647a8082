//! SQL rendering via `fmt::Display` for AST nodes.
//!
//! The output is canonical SQL that parses back to an equal tree: keywords
//! upper-case, identifiers quoted when needed, and parentheses added
//! wherever an operand binds looser than its position requires.

use std::fmt;

use super::expression::{ROW_EXPR, ROW_PRIMARY};
use super::{
    ColumnRef, CommonTableExpr, Expr, FunctionCall, Id, InList, IsValue, Literal, OrderByItem,
    Projection, QueryExpressionBody, QueryPrimary, SelectStatement, SetOperator, TableRef,
    UnaryOp, WithClause,
};
use crate::lexer::Keyword;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_path(f: &mut fmt::Formatter<'_>, path: &[Id]) -> fmt::Result {
    for (i, id) in path.iter().enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        write!(f, "{id}")?;
    }
    Ok(())
}

/// Writes `expr`, parenthesized if it binds looser than `min_level`.
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, min_level: u8) -> fmt::Result {
    if expr.binding_level() < min_level {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

const fn not_prefix(negated: bool) -> &'static str {
    if negated {
        "NOT "
    } else {
        ""
    }
}

// ---------------------------------------------------------------------------
// Identifiers and literals
// ---------------------------------------------------------------------------

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_plain() {
            f.write_str(&self.text)
        } else {
            write!(f, "\"{}\"", self.text.replace('"', "\"\""))
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::Null => f.write_str("NULL"),
            Self::Number(text) => f.write_str(text),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_path(f, &self.path)?;
        match (self.wildcard, self.path.is_empty()) {
            (true, true) => f.write_str("*"),
            (true, false) => f.write_str(".*"),
            (false, _) => Ok(()),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.as_slice() {
            [name] if Keyword::from_str(name.as_str()).is_some_and(|kw| kw.is_function_name()) => {
                f.write_str(name.as_str())?;
            }
            path => write_path(f, path)?,
        }
        f.write_str("(")?;
        comma_list(f, &self.args)?;
        f.write_str(")")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary { left, op, right } => {
                // Left-associative tiers; comparisons do not chain.
                let level = self.binding_level();
                let (left_min, right_min) = if op.is_comparison() {
                    (ROW_EXPR, ROW_EXPR)
                } else {
                    (level, level + 1)
                };
                write_operand(f, left, left_min)?;
                write!(f, " {} ", op.as_str())?;
                write_operand(f, right, right_min)
            }
            Self::Unary {
                op: UnaryOp::Not,
                operand,
            } => {
                f.write_str("NOT ")?;
                write_operand(f, operand, self.binding_level())
            }
            Self::Unary { op, operand } => {
                f.write_str(op.as_str())?;
                if matches!(operand.as_ref(), Self::Unary { .. }) {
                    write!(f, "({operand})")
                } else {
                    write_operand(f, operand, ROW_PRIMARY)
                }
            }
            Self::Is {
                expr,
                negated,
                value,
            } => {
                let min = if *value == IsValue::Null {
                    ROW_EXPR
                } else {
                    self.binding_level() + 1
                };
                write_operand(f, expr, min)?;
                write!(f, " IS {}{}", not_prefix(*negated), value.as_str())
            }
            Self::QuantifiedComparison {
                left,
                op,
                quantifier,
                query,
            } => {
                write_operand(f, left, ROW_EXPR)?;
                write!(f, " {} {} ({query})", op.as_str(), quantifier.as_str())
            }
            Self::Between {
                expr,
                low,
                high,
                negated,
            } => {
                write_operand(f, expr, ROW_EXPR)?;
                write!(f, " {}BETWEEN ", not_prefix(*negated))?;
                write_operand(f, low, ROW_EXPR)?;
                f.write_str(" AND ")?;
                write_operand(f, high, ROW_EXPR)
            }
            Self::In {
                expr,
                list,
                negated,
            } => {
                write_operand(f, expr, ROW_EXPR)?;
                write!(f, " {}IN (", not_prefix(*negated))?;
                match list {
                    InList::Subquery(query) => write!(f, "{query}")?,
                    InList::Values(values) => comma_list(f, values)?,
                }
                f.write_str(")")
            }
            Self::Like {
                expr,
                pattern,
                escape,
                negated,
            } => {
                write_operand(f, expr, ROW_EXPR)?;
                write!(f, " {}LIKE ", not_prefix(*negated))?;
                write_operand(f, pattern, ROW_EXPR)?;
                if let Some(escape) = escape {
                    f.write_str(" ESCAPE ")?;
                    write_operand(f, escape, ROW_EXPR)?;
                }
                Ok(())
            }
            Self::Exists(query) => write!(f, "EXISTS ({query})"),
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Parameter { .. } => f.write_str("?"),
            Self::Column(column) => write!(f, "{column}"),
            Self::Function(call) => write!(f, "{call}"),
            Self::List(items) => {
                f.write_str("(")?;
                comma_list(f, items)?;
                f.write_str(")")
            }
            Self::Subquery(query) => write!(f, "({query})"),
            Self::Case {
                operand,
                when_clauses,
                else_result,
            } => {
                f.write_str("CASE")?;
                if let Some(operand) = operand {
                    f.write_str(" ")?;
                    write_operand(f, operand, ROW_EXPR)?;
                }
                for (condition, result) in when_clauses {
                    write!(f, " WHEN {condition} THEN {result}")?;
                }
                if let Some(else_result) = else_result {
                    write!(f, " ELSE {else_result}")?;
                }
                f.write_str(" END")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with_clause {
            write!(f, "{with} ")?;
        }
        write!(f, "{}", self.body)?;
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            comma_list(f, &self.order_by)?;
        }
        Ok(())
    }
}

impl fmt::Display for WithClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WITH ")?;
        if self.recursive {
            f.write_str("RECURSIVE ")?;
        }
        comma_list(f, &self.ctes)
    }
}

impl fmt::Display for CommonTableExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            comma_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        write!(f, " AS ({})", self.query)
    }
}

impl QueryExpressionBody {
    const fn binding_level(&self) -> u8 {
        match self {
            Self::SetOp {
                op: SetOperator::Intersect,
                ..
            } => 2,
            Self::SetOp { .. } => 1,
            Self::Primary(_) => 3,
        }
    }
}

fn write_body_operand(
    f: &mut fmt::Formatter<'_>,
    body: &QueryExpressionBody,
    min_level: u8,
) -> fmt::Result {
    if body.binding_level() < min_level {
        write!(f, "({body})")
    } else {
        write!(f, "{body}")
    }
}

impl fmt::Display for QueryExpressionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetOp {
                op,
                quantifier,
                left,
                right,
            } => {
                let level = self.binding_level();
                write_body_operand(f, left, level)?;
                write!(f, " {}", op.as_str())?;
                if let Some(q) = quantifier.as_str() {
                    write!(f, " {q}")?;
                }
                f.write_str(" ")?;
                write_body_operand(f, right, level + 1)
            }
            Self::Primary(primary) => write!(f, "{primary}"),
        }
    }
}

impl fmt::Display for QueryPrimary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if let Some(q) = self.quantifier.as_str() {
            write!(f, "{q} ")?;
        }
        comma_list(f, &self.projections)?;
        if !self.from.is_empty() {
            f.write_str(" FROM ")?;
            comma_list(f, &self.from)?;
        }
        if let Some(cond) = &self.where_clause {
            write!(f, " WHERE {cond}")?;
        }
        if let Some(group_by) = &self.group_by {
            f.write_str(" GROUP BY ")?;
            if let Some(q) = group_by.quantifier.as_str() {
                write!(f, "{q} ")?;
            }
            for (i, item) in group_by.items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_operand(f, item, ROW_EXPR)?;
            }
        }
        if let Some(cond) = &self.having {
            write!(f, " HAVING {cond}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_operand(f, &self.expr, ROW_EXPR)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

impl fmt::Display for OrderByItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_operand(f, &self.expr, ROW_EXPR)?;
        if let Some(dir) = self.direction.as_str() {
            write!(f, " {dir}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relation { path, alias } => {
                write_path(f, path)?;
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                }
                Ok(())
            }
            Self::Subquery {
                query,
                alias,
                column_aliases,
            } => {
                write!(f, "({query}) AS {alias}")?;
                if !column_aliases.is_empty() {
                    f.write_str(" (")?;
                    comma_list(f, column_aliases)?;
                    f.write_str(")")?;
                }
                Ok(())
            }
            Self::Join {
                kind,
                left,
                right,
                on,
            } => {
                write!(f, "{left} {} ", kind.as_str())?;
                if matches!(right.as_ref(), Self::Join { .. }) {
                    write!(f, "({right})")?;
                } else {
                    write!(f, "{right}")?;
                }
                if let Some(cond) = on {
                    write!(f, " ON {cond}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, OrderDirection, SetQuantifier};

    fn select(projections: Vec<Expr>) -> QueryPrimary {
        QueryPrimary {
            quantifier: SetQuantifier::Unspecified,
            projections: projections
                .into_iter()
                .map(|expr| Projection { expr, alias: None })
                .collect(),
            from: vec![TableRef::table("t")],
            where_clause: None,
            group_by: None,
            having: None,
        }
    }

    #[test]
    fn test_ident_quoting() {
        assert_eq!(Id::new("users").to_string(), "users");
        assert_eq!(Id::new("order").to_string(), "\"order\"");
        assert_eq!(Id::new("a\"b").to_string(), "\"a\"\"b\"");
        assert_eq!(Id::new("first name").to_string(), "\"first name\"");
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Expr::string("O'Brien").to_string(), "'O''Brien'");
        assert_eq!(Expr::number("1.5e-3").to_string(), "1.5e-3");
        assert_eq!(Expr::null().to_string(), "NULL");
        assert_eq!(Expr::boolean(false).to_string(), "FALSE");
    }

    #[test]
    fn test_operand_parentheses() {
        let sum = Expr::column("a").binary(BinaryOp::Add, Expr::column("b"));
        let product = sum.clone().binary(BinaryOp::Mul, Expr::column("c"));
        assert_eq!(product.to_string(), "(a + b) * c");

        let nested = Expr::column("a").binary(
            BinaryOp::Sub,
            Expr::column("b").binary(BinaryOp::Sub, Expr::column("c")),
        );
        assert_eq!(nested.to_string(), "a - (b - c)");

        let cond = Expr::column("x")
            .eq(Expr::number("1"))
            .or(Expr::column("y").eq(Expr::number("2")))
            .and(Expr::column("z").is_null());
        assert_eq!(cond.to_string(), "(x = 1 OR y = 2) AND z IS NULL");
    }

    #[test]
    fn test_unary_display() {
        let neg = Expr::unary(UnaryOp::Neg, Expr::unary(UnaryOp::Neg, Expr::number("1")));
        assert_eq!(neg.to_string(), "-(-1)");
        let not = Expr::unary(UnaryOp::Not, Expr::column("a").and(Expr::column("b")));
        assert_eq!(not.to_string(), "NOT (a AND b)");
    }

    #[test]
    fn test_query_display() {
        let stmt = SelectStatement {
            with_clause: None,
            body: QueryExpressionBody::SetOp {
                op: SetOperator::Union,
                quantifier: SetQuantifier::All,
                left: Box::new(QueryExpressionBody::Primary(Box::new(select(vec![
                    Expr::column("a"),
                ])))),
                right: Box::new(QueryExpressionBody::Primary(Box::new(select(vec![
                    Expr::wildcard(),
                ])))),
            },
            order_by: vec![OrderByItem {
                expr: Expr::number("1"),
                direction: OrderDirection::Desc,
            }],
        };
        assert_eq!(
            stmt.to_string(),
            "SELECT a FROM t UNION ALL SELECT * FROM t ORDER BY 1 DESC"
        );
    }

    #[test]
    fn test_function_name_keyword_is_bare() {
        let call = FunctionCall {
            name: vec![Id::new("COUNT")],
            args: vec![Expr::wildcard()],
        };
        assert_eq!(call.to_string(), "COUNT(*)");
    }
}
