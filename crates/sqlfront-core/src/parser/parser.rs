//! SQL Parser implementation.

use tracing::{debug, debug_span, trace};

use super::error::ParseError;
use crate::ast::{
    CommonTableExpr, Expr, GroupBy, Id, OrderByItem, OrderDirection, Projection,
    QueryExpressionBody, QueryPrimary, SelectStatement, SetOperator, SetQuantifier, WithClause,
};
use crate::config::ParserConfig;
use crate::lexer::{Keyword, Scanner, ScannerState, Token, TokenKind};

/// Everything that must be rewound when a speculative parse is abandoned.
#[derive(Clone, Copy)]
pub(super) struct Checkpoint<'a> {
    scanner: ScannerState<'a>,
    param_counter: usize,
}

/// The outcome of a parenthesized construct that may hold a query.
pub(super) enum Parenthesized<T> {
    Query(SelectStatement),
    Other(T),
}

/// SQL Parser.
///
/// A recursive descent parser with one method per grammar rule. Each rule
/// starts at the scanner's current token and, on success, leaves the scanner
/// on the first token it did not consume.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    config: ParserConfig,
    depth: usize,
    /// Parameter counter for ? placeholders.
    pub(super) param_counter: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    /// Creates a parser with custom settings.
    #[must_use]
    pub fn with_config(input: &'a str, config: ParserConfig) -> Self {
        let mut scanner = Scanner::new(input);
        scanner.advance();
        Self::from_scanner(scanner, config)
    }

    /// Creates a parser that continues from an existing scanner. An
    /// unprimed scanner is advanced onto its first token.
    #[must_use]
    pub fn from_scanner(mut scanner: Scanner<'a>, config: ParserConfig) -> Self {
        if !scanner.is_primed() {
            scanner.advance();
        }
        Self {
            scanner,
            config,
            depth: 0,
            param_counter: 0,
        }
    }

    /// Returns the scanner, positioned after the last consumed token.
    #[must_use]
    pub fn into_scanner(self) -> Scanner<'a> {
        self.scanner
    }

    /// Parses one SELECT statement, an optional `;`, and, unless the
    /// configuration says otherwise, the end of input.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid SELECT statement.
    ///
    /// # Performance
    ///
    /// A parenthesized term that could be either a subquery or an expression
    /// is parsed twice when the subquery reading fails. Input that nests
    /// shapes like `((SELECT 1) + 1)` therefore takes time exponential in
    /// the nesting depth. Set [`ParserConfig::max_depth`] when parsing
    /// untrusted input.
    pub fn parse(&mut self) -> Result<SelectStatement, ParseError> {
        let span = debug_span!("parse", len = self.scanner.input().len());
        let _enter = span.enter();

        let result = self.parse_complete();
        match &result {
            Ok(_) => debug!(parameters = self.param_counter, "parsed select statement"),
            Err(err) => debug!(error = %err, "parse failed"),
        }
        result
    }

    fn parse_complete(&mut self) -> Result<SelectStatement, ParseError> {
        let stmt = self.parse_query()?;
        self.eat(TokenKind::Semicolon);
        if self.config.require_end_of_input && !self.check(TokenKind::Eof) {
            return Err(self.error(&[TokenKind::Eof]));
        }
        Ok(stmt)
    }

    /// Parses a SELECT statement and stops at the first token that cannot
    /// continue it.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if no SELECT statement starts here.
    pub fn parse_select_statement(&mut self) -> Result<SelectStatement, ParseError> {
        self.parse_query()
    }

    /// Parses a search condition (a WHERE-style boolean expression) and
    /// stops at the first token that cannot continue it.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if no search condition starts here.
    pub fn parse_search_condition(&mut self) -> Result<Expr, ParseError> {
        self.parse_condition()
    }

    // --- Select statement ---

    /// `[WITH ...] query_expression_body [ORDER BY ...]`
    pub(super) fn parse_query(&mut self) -> Result<SelectStatement, ParseError> {
        self.nested(|p| {
            let with_clause = if p.check_keyword(Keyword::With) {
                Some(p.parse_with_clause()?)
            } else {
                None
            };

            let body = p.parse_query_body()?;

            let order_by = if p.eat_keyword(Keyword::Order) {
                p.expect_keyword(Keyword::By)?;
                p.parse_order_by_list()?
            } else {
                vec![]
            };

            Ok(SelectStatement {
                with_clause,
                body,
                order_by,
            })
        })
    }

    fn parse_with_clause(&mut self) -> Result<WithClause, ParseError> {
        self.expect_keyword(Keyword::With)?;
        let recursive = self.eat_keyword(Keyword::Recursive);
        let mut ctes = vec![self.parse_cte()?];
        while self.eat(TokenKind::Comma) {
            ctes.push(self.parse_cte()?);
        }
        Ok(WithClause { recursive, ctes })
    }

    /// `name [(col, ...)] AS (select_statement)`
    fn parse_cte(&mut self) -> Result<CommonTableExpr, ParseError> {
        let name = self.expect_identifier()?;
        let columns = if self.check(TokenKind::LeftParen) {
            self.parse_identifier_list()?
        } else {
            vec![]
        };

        if !self.eat_keyword(Keyword::As) {
            let as_kw = TokenKind::Keyword(Keyword::As);
            return Err(if columns.is_empty() {
                self.error(&[TokenKind::LeftParen, as_kw])
            } else {
                self.error(&[as_kw])
            });
        }

        self.expect(TokenKind::LeftParen)?;
        let query = self.parse_query()?;
        self.expect(TokenKind::RightParen)?;

        Ok(CommonTableExpr {
            name,
            columns,
            query: Box::new(query),
        })
    }

    /// `query_term ((UNION | EXCEPT) [ALL | DISTINCT] query_term)*`
    fn parse_query_body(&mut self) -> Result<QueryExpressionBody, ParseError> {
        let mut left = self.parse_query_term()?;
        loop {
            let op = match self.current().as_keyword() {
                Some(Keyword::Union) => SetOperator::Union,
                Some(Keyword::Except) => SetOperator::Except,
                _ => break,
            };
            self.advance();
            let quantifier = self.parse_set_quantifier();
            let right = self.parse_query_term()?;
            left = QueryExpressionBody::SetOp {
                op,
                quantifier,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// `query_primary (INTERSECT [ALL | DISTINCT] query_primary)*`
    fn parse_query_term(&mut self) -> Result<QueryExpressionBody, ParseError> {
        let mut left = self.parse_query_primary()?;
        while self.eat_keyword(Keyword::Intersect) {
            let quantifier = self.parse_set_quantifier();
            let right = self.parse_query_primary()?;
            left = QueryExpressionBody::SetOp {
                op: SetOperator::Intersect,
                quantifier,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// A SELECT block, or a parenthesized query body.
    fn parse_query_primary(&mut self) -> Result<QueryExpressionBody, ParseError> {
        match self.current().kind {
            TokenKind::Keyword(Keyword::Select) => Ok(QueryExpressionBody::Primary(Box::new(
                self.parse_select_block()?,
            ))),
            TokenKind::LeftParen => {
                self.advance();
                let body = self.nested(Self::parse_query_body)?;
                self.expect(TokenKind::RightParen)?;
                Ok(body)
            }
            _ => Err(self.error(&[TokenKind::Keyword(Keyword::Select), TokenKind::LeftParen])),
        }
    }

    fn parse_select_block(&mut self) -> Result<QueryPrimary, ParseError> {
        self.expect_keyword(Keyword::Select)?;

        let quantifier = self.parse_set_quantifier();

        let mut projections = vec![self.parse_projection()?];
        while self.eat(TokenKind::Comma) {
            projections.push(self.parse_projection()?);
        }

        let from = if self.eat_keyword(Keyword::From) {
            let mut tables = vec![self.parse_table_ref()?];
            while self.eat(TokenKind::Comma) {
                tables.push(self.parse_table_ref()?);
            }
            tables
        } else {
            vec![]
        };

        let where_clause = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_condition()?)
        } else {
            None
        };

        let group_by = if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            let quantifier = self.parse_set_quantifier();
            let mut items = vec![self.parse_row_expr()?];
            while self.eat(TokenKind::Comma) {
                items.push(self.parse_row_expr()?);
            }
            Some(GroupBy { quantifier, items })
        } else {
            None
        };

        let having = if self.eat_keyword(Keyword::Having) {
            Some(self.parse_condition()?)
        } else {
            None
        };

        Ok(QueryPrimary {
            quantifier,
            projections,
            from,
            where_clause,
            group_by,
            having,
        })
    }

    fn parse_projection(&mut self) -> Result<Projection, ParseError> {
        let expr = self.parse_row_expr()?;
        let alias = self.parse_optional_alias()?;
        Ok(Projection { expr, alias })
    }

    fn parse_order_by_list(&mut self) -> Result<Vec<OrderByItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            let expr = self.parse_row_expr()?;
            let direction = if self.eat_keyword(Keyword::Asc) {
                OrderDirection::Asc
            } else if self.eat_keyword(Keyword::Desc) {
                OrderDirection::Desc
            } else {
                OrderDirection::Unspecified
            };
            items.push(OrderByItem { expr, direction });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(items)
    }

    fn parse_set_quantifier(&mut self) -> SetQuantifier {
        if self.eat_keyword(Keyword::All) {
            SetQuantifier::All
        } else if self.eat_keyword(Keyword::Distinct) {
            SetQuantifier::Distinct
        } else {
            SetQuantifier::Unspecified
        }
    }

    // --- Backtracking ---

    /// Parses `( select_statement )`, or `( fallback )` when the contents are
    /// not a query.
    ///
    /// The query alternative is only tried when the token after `(` can
    /// start one. When both alternatives fail, the error from the
    /// alternative that got further into the input is reported; ties go to
    /// the query alternative.
    ///
    /// Nothing is memoized: a failed query alternative re-parses its
    /// contents through `fallback`, so every nesting level doubles the work.
    pub(super) fn parse_parenthesized<T>(
        &mut self,
        fallback: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Parenthesized<T>, ParseError> {
        self.expect(TokenKind::LeftParen)?;

        let mut preferred = None;
        if self.starts_query() {
            let saved = self.checkpoint();
            match self
                .parse_query()
                .and_then(|query| self.expect(TokenKind::RightParen).map(|()| query))
            {
                Ok(query) => return Ok(Parenthesized::Query(query)),
                Err(err) => {
                    trace!(error = %err, "not a subquery, rewinding");
                    self.restore(saved);
                    preferred = Some(err);
                }
            }
        }

        let result = fallback(self)
            .and_then(|value| self.expect(TokenKind::RightParen).map(|()| value));
        match (result, preferred) {
            (Ok(value), _) => Ok(Parenthesized::Other(value)),
            (Err(err), Some(preferred)) if preferred.position.offset >= err.position.offset => {
                Err(preferred)
            }
            (Err(err), _) => Err(err),
        }
    }

    fn starts_query(&self) -> bool {
        self.check_keyword(Keyword::Select)
            || self.check_keyword(Keyword::With)
            || self.check(TokenKind::LeftParen)
    }

    pub(super) const fn checkpoint(&self) -> Checkpoint<'a> {
        Checkpoint {
            scanner: self.scanner.checkpoint(),
            param_counter: self.param_counter,
        }
    }

    pub(super) fn restore(&mut self, checkpoint: Checkpoint<'a>) {
        self.scanner.restore(checkpoint.scanner);
        self.param_counter = checkpoint.param_counter;
    }

    /// Runs `rule` one nesting level deeper.
    pub(super) fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if let Some(max_depth) = self.config.max_depth {
            if self.depth >= max_depth {
                return Err(ParseError::too_deep(&self.current(), max_depth));
            }
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    // --- Helper methods ---

    pub(super) const fn current(&self) -> Token<'a> {
        self.scanner.current_token()
    }

    /// Advances to the next token.
    pub(super) fn advance(&mut self) {
        self.scanner.advance();
    }

    /// Checks if the current token matches the given kind.
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.check(TokenKind::Keyword(keyword))
    }

    /// Consumes the current token if it matches.
    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is the given keyword.
    pub(super) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        self.eat(TokenKind::Keyword(keyword))
    }

    /// Expects the current token to be the given kind.
    pub(super) fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(&[kind]))
        }
    }

    /// Expects the current token to be the given keyword.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        self.expect(TokenKind::Keyword(keyword))
    }

    /// Expects and returns an identifier.
    pub(super) fn expect_identifier(&mut self) -> Result<Id, ParseError> {
        let token = self.current();
        if token.kind == TokenKind::Identifier {
            self.advance();
            Ok(Id::new(token.value()))
        } else {
            Err(self.error(&[TokenKind::Identifier]))
        }
    }

    /// Parses `( id, ... )`.
    pub(super) fn parse_identifier_list(&mut self) -> Result<Vec<Id>, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let mut ids = vec![self.expect_identifier()?];
        while self.eat(TokenKind::Comma) {
            ids.push(self.expect_identifier()?);
        }
        if !self.eat(TokenKind::RightParen) {
            return Err(self.error(&[TokenKind::Comma, TokenKind::RightParen]));
        }
        Ok(ids)
    }

    /// Parses `[AS] id`.
    pub(super) fn parse_optional_alias(&mut self) -> Result<Option<Id>, ParseError> {
        if self.eat_keyword(Keyword::As) || self.check(TokenKind::Identifier) {
            Ok(Some(self.expect_identifier()?))
        } else {
            Ok(None)
        }
    }

    /// Builds an error for the current token.
    pub(super) fn error(&self, expected: &[TokenKind]) -> ParseError {
        ParseError::unexpected(&self.current(), expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, TableRef};
    use crate::parser::ParseErrorKind;

    fn parse(sql: &str) -> Result<SelectStatement, ParseError> {
        Parser::new(sql).parse()
    }

    #[test]
    fn test_simple_select() {
        let stmt = parse("SELECT id, name FROM users").unwrap();
        let select = stmt.body.as_primary().unwrap();
        assert_eq!(select.projections.len(), 2);
        assert!(matches!(&select.from[0], TableRef::Relation { path, alias: None } if path[0] == "users"));
    }

    #[test]
    fn test_expression_precedence() {
        // 1 + 2 * 3 should be parsed as 1 + (2 * 3)
        let stmt = parse("SELECT 1 + 2 * 3").unwrap();
        let select = stmt.body.as_primary().unwrap();
        if let Expr::Binary { op, right, .. } = &select.projections[0].expr {
            assert_eq!(*op, BinaryOp::Add);
            assert!(matches!(
                right.as_ref(),
                Expr::Binary {
                    op: BinaryOp::Mul,
                    ..
                }
            ));
        } else {
            panic!("Expected binary expression");
        }
    }

    #[test]
    fn test_trailing_semicolon() {
        assert!(parse("SELECT 1;").is_ok());
        assert!(parse("SELECT 1;;").is_err());
    }

    #[test]
    fn test_trailing_input() {
        let err = parse("SELECT 1 2").unwrap_err();
        assert_eq!(err.expected, vec![TokenKind::Eof]);

        let config = ParserConfig::new().with_require_end_of_input(false);
        let mut parser = Parser::with_config("SELECT 1 2", config);
        assert!(parser.parse().is_ok());
        assert_eq!(parser.into_scanner().current_token().raw, "2");
    }

    #[test]
    fn test_max_depth() {
        let config = ParserConfig::new().with_max_depth(3);
        let shallow = Parser::with_config("SELECT a FROM t", config).parse();
        assert!(shallow.is_ok());

        let deep = Parser::with_config("SELECT (SELECT (SELECT (SELECT 1)))", config).parse();
        assert_eq!(deep.unwrap_err().kind, ParseErrorKind::NestingTooDeep);
    }

    #[test]
    fn test_nested_subquery_operands() {
        let nested = |levels: usize| {
            format!(
                "SELECT {}SELECT 1{}",
                "(".repeat(levels),
                ") + 1".repeat(levels)
            )
        };

        let stmt = parse(&nested(6)).unwrap();
        let select = stmt.body.as_primary().unwrap();
        assert!(matches!(
            select.projections[0].expr,
            Expr::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));

        // Rejected before the backtracking fans out.
        let config = ParserConfig::new().with_max_depth(8);
        let err = Parser::with_config(&nested(40), config).parse().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
    }

    #[test]
    fn test_parameters_numbered_after_backtracking() {
        let stmt = parse("SELECT ? FROM t WHERE a IN ((?), ?)").unwrap();
        let select = stmt.body.as_primary().unwrap();
        assert_eq!(select.projections[0].expr, Expr::Parameter { position: 1 });
        let Some(Expr::In { list, .. }) = &select.where_clause else {
            panic!("Expected IN");
        };
        assert_eq!(
            *list,
            crate::ast::InList::Values(vec![
                Expr::Parameter { position: 2 },
                Expr::Parameter { position: 3 },
            ])
        );
    }
}
