//! Parser configuration.

/// Settings that change what the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of statements, conditions, table references and
    /// unary operator chains. `None` means unbounded.
    ///
    /// Backtracking over parenthesized terms costs time exponential in the
    /// nesting depth, so untrusted input should always be parsed with a
    /// limit.
    pub max_depth: Option<usize>,
    /// Whether [`crate::Parser::parse`] must consume the whole input.
    /// A single trailing `;` is always accepted.
    pub require_end_of_input: bool,
}

impl ParserConfig {
    /// Creates the default configuration: unbounded nesting, whole input
    /// required.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: None,
            require_end_of_input: true,
        }
    }

    /// Limits nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets whether trailing input is an error.
    #[must_use]
    pub const fn with_require_end_of_input(mut self, require: bool) -> Self {
        self.require_end_of_input = require;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}
