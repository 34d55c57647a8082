//! Search condition and row expression rules.
//!
//! Precedence, loosest first: OR, AND, NOT, `IS [NOT] TRUE|FALSE|UNKNOWN`,
//! predicates (comparison, `IS [NOT] NULL`, BETWEEN, IN, LIKE, EXISTS),
//! `+ - ||`, `* / %`, `^`, then primaries.

use super::error::ParseError;
use super::parser::{Parenthesized, Parser};
use crate::ast::{
    BinaryOp, ColumnRef, ComparisonQuantifier, Expr, FunctionCall, Id, InList, IsValue, Literal,
    UnaryOp,
};
use crate::lexer::{Keyword, TokenKind};

/// Tokens that can start a row expression. The function keywords must match
/// [`Keyword::is_function_name`].
const ROW_EXPR_START: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::String,
    TokenKind::Keyword(Keyword::True),
    TokenKind::Keyword(Keyword::False),
    TokenKind::Keyword(Keyword::Null),
    TokenKind::Question,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Keyword(Keyword::Case),
    TokenKind::Identifier,
    TokenKind::Keyword(Keyword::Avg),
    TokenKind::Keyword(Keyword::Count),
    TokenKind::Keyword(Keyword::Grouping),
    TokenKind::Keyword(Keyword::Max),
    TokenKind::Keyword(Keyword::Min),
    TokenKind::Keyword(Keyword::Nullif),
    TokenKind::Keyword(Keyword::Rank),
    TokenKind::Keyword(Keyword::Sum),
    TokenKind::Star,
    TokenKind::LeftParen,
];

/// Tokens that can start a search condition, beyond [`ROW_EXPR_START`].
const CONDITION_START: &[TokenKind] = &[
    TokenKind::Keyword(Keyword::Not),
    TokenKind::Keyword(Keyword::Exists),
];

const fn comparison_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        _ => None,
    }
}

impl Parser<'_> {
    // --- Search conditions ---

    /// `boolean_term (OR boolean_term)*`
    pub(super) fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        self.nested(|p| {
            let mut left = p.parse_boolean_term()?;
            while p.eat_keyword(Keyword::Or) {
                let right = p.parse_boolean_term()?;
                left = left.or(right);
            }
            Ok(left)
        })
    }

    /// `boolean_factor (AND boolean_factor)*`
    fn parse_boolean_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_boolean_factor()?;
        while self.eat_keyword(Keyword::And) {
            let right = self.parse_boolean_factor()?;
            left = left.and(right);
        }
        Ok(left)
    }

    fn parse_boolean_factor(&mut self) -> Result<Expr, ParseError> {
        if self.eat_keyword(Keyword::Not) {
            let operand = self.nested(Self::parse_boolean_factor)?;
            return Ok(Expr::unary(UnaryOp::Not, operand));
        }
        self.parse_boolean_test()
    }

    /// `boolean_primary [IS [NOT] (TRUE | FALSE | UNKNOWN)]`
    fn parse_boolean_test(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_boolean_primary()?;
        if !self.eat_keyword(Keyword::Is) {
            return Ok(expr);
        }
        let negated = self.eat_keyword(Keyword::Not);
        let value = match self.current().as_keyword() {
            Some(Keyword::True) => IsValue::True,
            Some(Keyword::False) => IsValue::False,
            Some(Keyword::Unknown) => IsValue::Unknown,
            _ => {
                let mut expected = Vec::with_capacity(5);
                if !negated {
                    expected.push(TokenKind::Keyword(Keyword::Not));
                }
                expected.extend(
                    [Keyword::True, Keyword::False, Keyword::Unknown, Keyword::Null]
                        .map(TokenKind::Keyword),
                );
                return Err(self.error(&expected));
            }
        };
        self.advance();
        Ok(Expr::Is {
            expr: Box::new(expr),
            negated,
            value,
        })
    }

    fn parse_boolean_primary(&mut self) -> Result<Expr, ParseError> {
        if self.eat_keyword(Keyword::Exists) {
            self.expect(TokenKind::LeftParen)?;
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen)?;
            return Ok(Expr::Exists(Box::new(query)));
        }

        if !ROW_EXPR_START.contains(&self.current().kind) {
            let expected: Vec<TokenKind> = CONDITION_START
                .iter()
                .chain(ROW_EXPR_START)
                .copied()
                .collect();
            return Err(self.error(&expected));
        }

        let left = self.parse_row_expr()?;

        if let Some(op) = comparison_op(self.current().kind) {
            self.advance();
            let quantifier = match self.current().as_keyword() {
                Some(Keyword::All) => Some(ComparisonQuantifier::All),
                Some(Keyword::Some) => Some(ComparisonQuantifier::Some),
                Some(Keyword::Any) => Some(ComparisonQuantifier::Any),
                _ => None,
            };
            if let Some(quantifier) = quantifier {
                self.advance();
                self.expect(TokenKind::LeftParen)?;
                let query = self.parse_query()?;
                self.expect(TokenKind::RightParen)?;
                return Ok(Expr::QuantifiedComparison {
                    left: Box::new(left),
                    op,
                    quantifier,
                    query: Box::new(query),
                });
            }
            let right = self.parse_row_expr()?;
            return Ok(left.binary(op, right));
        }

        match self.current().as_keyword() {
            Some(Keyword::Is) => {
                // Only IS [NOT] NULL belongs here; IS [NOT] TRUE and friends
                // are left for the boolean test.
                let saved = self.checkpoint();
                self.advance();
                let negated = self.eat_keyword(Keyword::Not);
                if self.eat_keyword(Keyword::Null) {
                    return Ok(Expr::Is {
                        expr: Box::new(left),
                        negated,
                        value: IsValue::Null,
                    });
                }
                self.restore(saved);
                Ok(left)
            }
            Some(Keyword::Not) => {
                self.advance();
                match self.current().as_keyword() {
                    Some(Keyword::Between) => self.parse_between(left, true),
                    Some(Keyword::In) => self.parse_in(left, true),
                    Some(Keyword::Like) => self.parse_like(left, true),
                    _ => Err(self.error(&[
                        TokenKind::Keyword(Keyword::Between),
                        TokenKind::Keyword(Keyword::In),
                        TokenKind::Keyword(Keyword::Like),
                    ])),
                }
            }
            Some(Keyword::Between) => self.parse_between(left, false),
            Some(Keyword::In) => self.parse_in(left, false),
            Some(Keyword::Like) => self.parse_like(left, false),
            _ => Ok(left),
        }
    }

    /// `BETWEEN row_expr AND row_expr`
    fn parse_between(&mut self, expr: Expr, negated: bool) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Between)?;
        let low = self.parse_row_expr()?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_row_expr()?;
        Ok(Expr::Between {
            expr: Box::new(expr),
            low: Box::new(low),
            high: Box::new(high),
            negated,
        })
    }

    /// `IN ( select_statement | expr_list )`
    fn parse_in(&mut self, expr: Expr, negated: bool) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::In)?;
        if !self.check(TokenKind::LeftParen) {
            return Err(self.error(&[TokenKind::LeftParen]));
        }
        let list = match self.parse_parenthesized(Self::parse_expression_list)? {
            Parenthesized::Query(query) => InList::Subquery(Box::new(query)),
            Parenthesized::Other(values) => InList::Values(values),
        };
        Ok(Expr::In {
            expr: Box::new(expr),
            list,
            negated,
        })
    }

    /// `LIKE row_expr [ESCAPE row_expr]`
    fn parse_like(&mut self, expr: Expr, negated: bool) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Like)?;
        let pattern = self.parse_row_expr()?;
        let escape = if self.eat_keyword(Keyword::Escape) {
            Some(Box::new(self.parse_row_expr()?))
        } else {
            None
        };
        Ok(Expr::Like {
            expr: Box::new(expr),
            pattern: Box::new(pattern),
            escape,
            negated,
        })
    }

    /// `search_condition (, search_condition)*`
    pub(super) fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_condition()?];
        while self.eat(TokenKind::Comma) {
            exprs.push(self.parse_condition()?);
        }
        Ok(exprs)
    }

    // --- Row expressions ---

    /// `factor ((+ | - | ||) factor)*`
    pub(super) fn parse_row_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::Concat => BinaryOp::Concat,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = left.binary(op, right);
        }
        Ok(left)
    }

    /// `power ((* | / | %) power)*`
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            left = left.binary(op, right);
        }
        Ok(left)
    }

    /// `row_primary (^ row_primary)*`
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_row_primary()?;
        while self.eat(TokenKind::Caret) {
            let right = self.parse_row_primary()?;
            left = left.binary(BinaryOp::Pow, right);
        }
        Ok(left)
    }

    fn parse_row_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                Ok(Expr::number(token.raw))
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr::Literal(Literal::String(token.value().into_owned())))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::boolean(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::boolean(false))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::null())
            }
            TokenKind::Question => {
                self.advance();
                self.param_counter += 1;
                Ok(Expr::Parameter {
                    position: self.param_counter,
                })
            }
            TokenKind::Plus | TokenKind::Minus => {
                self.advance();
                let op = if token.kind == TokenKind::Plus {
                    UnaryOp::Plus
                } else {
                    UnaryOp::Neg
                };
                let operand = self.nested(Self::parse_row_primary)?;
                Ok(Expr::unary(op, operand))
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Identifier | TokenKind::Star => self.parse_column_or_function(),
            TokenKind::Keyword(kw) if kw.is_function_name() => {
                self.advance();
                let args = self.parse_function_args()?;
                Ok(Expr::Function(FunctionCall {
                    name: vec![Id::new(token.raw)],
                    args,
                }))
            }
            TokenKind::LeftParen => match self.parse_parenthesized(Self::parse_expression_list)? {
                Parenthesized::Query(query) => Ok(Expr::Subquery(Box::new(query))),
                Parenthesized::Other(list) => Ok(match <[Expr; 1]>::try_from(list) {
                    Ok([single]) => single,
                    Err(list) => Expr::List(list),
                }),
            },
            _ => Err(self.error(ROW_EXPR_START)),
        }
    }

    /// A dotted path, optionally ending in `*`, and an argument list if the
    /// path names a function.
    fn parse_column_or_function(&mut self) -> Result<Expr, ParseError> {
        let mut path = Vec::new();
        let mut wildcard = false;
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Star => {
                    self.advance();
                    wildcard = true;
                    break;
                }
                TokenKind::Identifier => {
                    self.advance();
                    path.push(Id::new(token.value()));
                }
                _ => return Err(self.error(&[TokenKind::Identifier, TokenKind::Star])),
            }
            if !self.eat(TokenKind::Dot) {
                break;
            }
        }

        if !wildcard && self.check(TokenKind::LeftParen) {
            let args = self.parse_function_args()?;
            return Ok(Expr::Function(FunctionCall { name: path, args }));
        }
        Ok(Expr::Column(ColumnRef { path, wildcard }))
    }

    /// `( [search_condition (, search_condition)*] )`
    fn parse_function_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        if self.eat(TokenKind::RightParen) {
            return Ok(vec![]);
        }
        let args = self.parse_expression_list()?;
        if !self.eat(TokenKind::RightParen) {
            return Err(self.error(&[TokenKind::Comma, TokenKind::RightParen]));
        }
        Ok(args)
    }

    /// `CASE [row_expr] (WHEN cond THEN cond)+ [ELSE cond] END`
    fn parse_case_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Case)?;

        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_row_expr()?))
        };

        let mut when_clauses = Vec::new();
        while self.eat_keyword(Keyword::When) {
            let condition = self.parse_condition()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_condition()?;
            when_clauses.push((condition, result));
        }
        if when_clauses.is_empty() {
            return Err(self.error(&[TokenKind::Keyword(Keyword::When)]));
        }

        let else_result = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_condition()?))
        } else {
            None
        };

        if !self.eat_keyword(Keyword::End) {
            let end = TokenKind::Keyword(Keyword::End);
            return Err(if else_result.is_some() {
                self.error(&[end])
            } else {
                self.error(&[
                    TokenKind::Keyword(Keyword::When),
                    TokenKind::Keyword(Keyword::Else),
                    end,
                ])
            });
        }

        Ok(Expr::Case {
            operand,
            when_clauses,
            else_result,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Expr, IsValue};
    use crate::lexer::{Keyword, TokenKind};
    use crate::parser::Parser;

    fn condition(sql: &str) -> Expr {
        Parser::new(sql).parse_search_condition().unwrap()
    }

    #[test]
    fn test_or_and_precedence() {
        let expr = condition("1 > 0 AND 2 < 3 OR 4 = 4");
        let Expr::Binary { op, left, .. } = expr else {
            panic!("Expected binary expression");
        };
        assert_eq!(op, BinaryOp::Or);
        assert!(matches!(
            *left,
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_is_null_vs_is_true() {
        assert!(matches!(
            condition("a IS NOT NULL"),
            Expr::Is {
                negated: true,
                value: IsValue::Null,
                ..
            }
        ));
        let Expr::Is { expr, value, .. } = condition("a = 1 IS UNKNOWN") else {
            panic!("Expected IS");
        };
        assert_eq!(value, IsValue::Unknown);
        assert!(matches!(*expr, Expr::Binary { op: BinaryOp::Eq, .. }));
    }

    #[test]
    fn test_function_keywords_are_expected() {
        let expected = Parser::new("SELECT").parse().unwrap_err().expected;
        for kw in Keyword::VARIANTS.iter().filter(|kw| kw.is_function_name()) {
            assert!(expected.contains(&TokenKind::Keyword(*kw)), "missing {kw}");
        }

        let err = Parser::new("").parse_search_condition().unwrap_err();
        assert!(err.expected.contains(&TokenKind::Keyword(Keyword::Count)));
        assert!(err.to_string().contains("identifier | AVG | COUNT"));
    }

    #[test]
    fn test_power_binds_tighter_than_mul() {
        let expr = condition("2 * 3 ^ 2");
        assert!(matches!(
            expr,
            Expr::Binary { op: BinaryOp::Mul, ref right, .. }
                if matches!(**right, Expr::Binary { op: BinaryOp::Pow, .. })
        ));
    }
}
