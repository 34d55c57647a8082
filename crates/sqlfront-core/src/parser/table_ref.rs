//! FROM clause rules.

use super::error::ParseError;
use super::parser::{Parenthesized, Parser};
use crate::ast::{Id, JoinKind, TableRef};
use crate::lexer::{Keyword, TokenKind};

/// The word between the optional NATURAL and JOIN.
#[derive(Clone, Copy)]
enum JoinSide {
    Plain,
    Inner,
    Left,
    Right,
    Full,
}

impl Parser<'_> {
    /// `table_primary (join_op table_primary [ON search_condition])*`,
    /// left-associative.
    pub(super) fn parse_table_ref(&mut self) -> Result<TableRef, ParseError> {
        self.nested(|p| {
            let mut left = p.parse_table_primary()?;
            while let Some(kind) = p.parse_join_kind()? {
                let right = p.parse_table_primary()?;
                let on = if kind.requires_on() {
                    p.expect_keyword(Keyword::On)?;
                    Some(p.parse_condition()?)
                } else if p.check_keyword(Keyword::On) {
                    return Err(ParseError::not_allowed(
                        &p.current(),
                        &format!("ON is not allowed after {}", kind.as_str()),
                    ));
                } else {
                    None
                };
                left = TableRef::Join {
                    kind,
                    left: Box::new(left),
                    right: Box::new(right),
                    on,
                };
            }
            Ok(left)
        })
    }

    /// Consumes a join operator, if one starts here.
    fn parse_join_kind(&mut self) -> Result<Option<JoinKind>, ParseError> {
        if self.eat_keyword(Keyword::Cross) {
            self.expect_keyword(Keyword::Join)?;
            return Ok(Some(JoinKind::Cross));
        }

        let natural = self.eat_keyword(Keyword::Natural);
        let side = match self.current().as_keyword() {
            Some(Keyword::Join) => JoinSide::Plain,
            Some(Keyword::Inner) => JoinSide::Inner,
            Some(Keyword::Left) => JoinSide::Left,
            Some(Keyword::Right) => JoinSide::Right,
            Some(Keyword::Full) => JoinSide::Full,
            _ if natural => {
                return Err(self.error(&[
                    TokenKind::Keyword(Keyword::Join),
                    TokenKind::Keyword(Keyword::Inner),
                    TokenKind::Keyword(Keyword::Left),
                    TokenKind::Keyword(Keyword::Right),
                    TokenKind::Keyword(Keyword::Full),
                ]));
            }
            _ => return Ok(None),
        };
        if !matches!(side, JoinSide::Plain) {
            self.advance();
        }

        let sided = matches!(side, JoinSide::Left | JoinSide::Right | JoinSide::Full);
        let outer = sided && self.eat_keyword(Keyword::Outer);
        if !self.eat_keyword(Keyword::Join) {
            let join = TokenKind::Keyword(Keyword::Join);
            return Err(if sided && !outer {
                self.error(&[TokenKind::Keyword(Keyword::Outer), join])
            } else {
                self.error(&[join])
            });
        }

        let kind = match (natural, side, outer) {
            (false, JoinSide::Plain, _) => JoinKind::Join,
            (false, JoinSide::Inner, _) => JoinKind::Inner,
            (false, JoinSide::Left, false) => JoinKind::Left,
            (false, JoinSide::Left, true) => JoinKind::LeftOuter,
            (false, JoinSide::Right, false) => JoinKind::Right,
            (false, JoinSide::Right, true) => JoinKind::RightOuter,
            (false, JoinSide::Full, false) => JoinKind::Full,
            (false, JoinSide::Full, true) => JoinKind::FullOuter,
            (true, JoinSide::Plain, _) => JoinKind::Natural,
            (true, JoinSide::Inner, _) => JoinKind::NaturalInner,
            (true, JoinSide::Left, false) => JoinKind::NaturalLeft,
            (true, JoinSide::Left, true) => JoinKind::NaturalLeftOuter,
            (true, JoinSide::Right, false) => JoinKind::NaturalRight,
            (true, JoinSide::Right, true) => JoinKind::NaturalRightOuter,
            (true, JoinSide::Full, false) => JoinKind::NaturalFull,
            (true, JoinSide::Full, true) => JoinKind::NaturalFullOuter,
        };
        Ok(Some(kind))
    }

    /// A named table, a derived table, or a parenthesized table reference.
    fn parse_table_primary(&mut self) -> Result<TableRef, ParseError> {
        match self.current().kind {
            TokenKind::Identifier => {
                let mut path = vec![self.expect_identifier()?];
                while self.eat(TokenKind::Dot) {
                    path.push(self.expect_identifier()?);
                }
                let alias = self.parse_optional_alias()?;
                Ok(TableRef::Relation { path, alias })
            }
            TokenKind::LeftParen => match self.parse_parenthesized(Self::parse_table_ref)? {
                Parenthesized::Query(query) => {
                    let alias = self.parse_required_alias()?;
                    let column_aliases = if self.check(TokenKind::LeftParen) {
                        self.parse_identifier_list()?
                    } else {
                        vec![]
                    };
                    Ok(TableRef::Subquery {
                        query: Box::new(query),
                        alias,
                        column_aliases,
                    })
                }
                Parenthesized::Other(table) => Ok(table),
            },
            _ => Err(self.error(&[TokenKind::Identifier, TokenKind::LeftParen])),
        }
    }

    /// `[AS] id`, where the identifier is mandatory.
    fn parse_required_alias(&mut self) -> Result<Id, ParseError> {
        if self.eat_keyword(Keyword::As) || self.check(TokenKind::Identifier) {
            self.expect_identifier()
        } else {
            Err(self.error(&[TokenKind::Keyword(Keyword::As), TokenKind::Identifier]))
        }
    }
}
