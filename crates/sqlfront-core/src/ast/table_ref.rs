//! FROM clause AST types.

use super::{Expr, Id, SelectStatement};

/// Join kinds, one per accepted keyword spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Cross,
    Join,
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Full,
    FullOuter,
    Natural,
    NaturalInner,
    NaturalLeft,
    NaturalLeftOuter,
    NaturalRight,
    NaturalRightOuter,
    NaturalFull,
    NaturalFullOuter,
}

impl JoinKind {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cross => "CROSS JOIN",
            Self::Join => "JOIN",
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::Right => "RIGHT JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
            Self::Full => "FULL JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
            Self::Natural => "NATURAL JOIN",
            Self::NaturalInner => "NATURAL INNER JOIN",
            Self::NaturalLeft => "NATURAL LEFT JOIN",
            Self::NaturalLeftOuter => "NATURAL LEFT OUTER JOIN",
            Self::NaturalRight => "NATURAL RIGHT JOIN",
            Self::NaturalRightOuter => "NATURAL RIGHT OUTER JOIN",
            Self::NaturalFull => "NATURAL FULL JOIN",
            Self::NaturalFullOuter => "NATURAL FULL OUTER JOIN",
        }
    }

    /// Returns true for the NATURAL joins.
    #[must_use]
    pub const fn is_natural(&self) -> bool {
        matches!(
            self,
            Self::Natural
                | Self::NaturalInner
                | Self::NaturalLeft
                | Self::NaturalLeftOuter
                | Self::NaturalRight
                | Self::NaturalRightOuter
                | Self::NaturalFull
                | Self::NaturalFullOuter
        )
    }

    /// Returns true if the join must be followed by `ON`.
    ///
    /// CROSS and NATURAL joins never take `ON`.
    #[must_use]
    pub const fn requires_on(&self) -> bool {
        !matches!(self, Self::Cross) && !self.is_natural()
    }
}

/// A table reference in a FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    /// A named table, `schema.table [AS alias]`.
    Relation { path: Vec<Id>, alias: Option<Id> },
    /// A derived table, `(query) [AS] alias [(col, ...)]`.
    Subquery {
        query: Box<SelectStatement>,
        alias: Id,
        column_aliases: Vec<Id>,
    },
    /// A joined table. `on` is `None` exactly for CROSS and NATURAL joins.
    Join {
        kind: JoinKind,
        left: Box<TableRef>,
        right: Box<TableRef>,
        on: Option<Expr>,
    },
}

impl TableRef {
    /// Creates a simple table reference.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self::Relation {
            path: vec![Id::new(name)],
            alias: None,
        }
    }

    /// Creates a table reference with an alias.
    #[must_use]
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::Relation {
            path: vec![Id::new(name)],
            alias: Some(Id::new(alias)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_kind_on_requirement() {
        assert!(JoinKind::Join.requires_on());
        assert!(JoinKind::LeftOuter.requires_on());
        assert!(!JoinKind::Cross.requires_on());
        assert!(!JoinKind::NaturalFullOuter.requires_on());
        assert!(JoinKind::NaturalInner.is_natural());
        assert!(!JoinKind::Inner.is_natural());
    }
}
