//! Pull-based SQL scanner.

use tracing::trace;

use super::{Keyword, LexError, Position, Span, Token, TokenKind};

/// A snapshot of the scanner, taken with [`Scanner::checkpoint`].
///
/// Restoring a snapshot brings back the current token and the read cursor
/// exactly as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerState<'a> {
    /// Byte offset just past the current token.
    offset: usize,
    line: u32,
    column: u32,
    token: Token<'a>,
}

impl<'a> ScannerState<'a> {
    const fn initial() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
            token: Token::new(TokenKind::Start, "", Span::new(0, 0), 1, 1),
        }
    }

    /// The token that was current when the snapshot was taken.
    #[must_use]
    pub const fn token(&self) -> Token<'a> {
        self.token
    }
}

#[derive(Clone, Copy)]
struct Mark {
    offset: usize,
    line: u32,
    column: u32,
}

/// Scans SQL text one token at a time.
///
/// A new scanner holds a [`TokenKind::Start`] token; call [`Scanner::advance`]
/// to move onto the first real token. Once the scanner reaches
/// [`TokenKind::Eof`] or [`TokenKind::Error`] it stays there.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    state: ScannerState<'a>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned before the first token.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            state: ScannerState::initial(),
        }
    }

    /// Returns the text being scanned.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Returns the current token without consuming it.
    #[must_use]
    pub const fn current_token(&self) -> Token<'a> {
        self.state.token
    }

    /// Returns true once the scanner has moved past [`TokenKind::Start`].
    #[must_use]
    pub const fn is_primed(&self) -> bool {
        !matches!(self.state.token.kind, TokenKind::Start)
    }

    /// Returns the location of the current token.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.state.token.position()
    }

    /// Moves to the next token.
    pub fn advance(&mut self) {
        if self.state.token.kind.is_terminal() {
            return;
        }
        self.state.token = self.scan();
    }

    /// Takes a snapshot of the scanner.
    #[must_use]
    pub const fn checkpoint(&self) -> ScannerState<'a> {
        self.state
    }

    /// Rewinds (or fast-forwards) to a snapshot of this scanner.
    ///
    /// `state` must come from [`Scanner::checkpoint`] on this scanner. A
    /// snapshot of another scanner leaves the position and current token
    /// meaningless, and scanning panics if its offset lies outside this
    /// input. Debug builds check the offset here.
    pub fn restore(&mut self, state: ScannerState<'a>) {
        debug_assert!(
            self.input.is_char_boundary(state.offset),
            "scanner state at byte {} does not belong to this input",
            state.offset
        );
        self.state = state;
    }

    /// Scans the remaining input, up to and including the first
    /// [`TokenKind::Eof`] or [`TokenKind::Error`] token.
    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        if !self.is_primed() {
            self.advance();
        }
        loop {
            let token = self.current_token();
            tokens.push(token);
            if token.kind.is_terminal() {
                break;
            }
            self.advance();
        }
        tokens
    }

    // --- Character cursor ---

    fn peek(&self) -> Option<char> {
        self.input[self.state.offset..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.state.offset..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.state.offset += c.len_utf8();
        if c == '\n' {
            self.state.line += 1;
            self.state.column = 1;
        } else {
            self.state.column += 1;
        }
        Some(c)
    }

    fn bump_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(&pred) {
            self.bump();
            count += 1;
        }
        count
    }

    const fn mark(&self) -> Mark {
        Mark {
            offset: self.state.offset,
            line: self.state.line,
            column: self.state.column,
        }
    }

    fn make_token(&self, kind: TokenKind, mark: Mark) -> Token<'a> {
        if let TokenKind::Error(error) = kind {
            trace!(%error, line = mark.line, column = mark.column, "lexical error");
        }
        Token::new(
            kind,
            &self.input[mark.offset..self.state.offset],
            Span::new(mark.offset, self.state.offset),
            mark.line,
            mark.column,
        )
    }

    // --- Scanning ---

    /// Skips whitespace and comments. Returns an error token for an
    /// unterminated block comment.
    fn skip_trivia(&mut self) -> Option<Token<'a>> {
        loop {
            self.eat_while(is_whitespace);

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                self.eat_while(|c| c != '\n');
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                let mark = self.mark();
                self.bump();
                self.bump();
                loop {
                    match self.bump() {
                        Some('*') if self.bump_if('/') => break,
                        Some(_) => {}
                        None => {
                            return Some(self.make_token(
                                TokenKind::Error(LexError::UnterminatedComment),
                                mark,
                            ))
                        }
                    }
                }
                continue;
            }

            return None;
        }
    }

    fn scan(&mut self) -> Token<'a> {
        if let Some(error) = self.skip_trivia() {
            return error;
        }
        let mark = self.mark();
        let Some(c) = self.bump() else {
            return self.make_token(TokenKind::Eof, mark);
        };

        let kind = match c {
            '^' => TokenKind::Caret,
            '%' => TokenKind::Percent,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '?' => TokenKind::Question,
            '=' => TokenKind::Eq,
            '!' => {
                if self.bump_if('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Error(LexError::LoneBang)
                }
            }
            '|' => {
                if self.bump_if('|') {
                    TokenKind::Concat
                } else {
                    TokenKind::Error(LexError::LonePipe)
                }
            }
            '<' => {
                if self.bump_if('=') {
                    TokenKind::LtEq
                } else if self.bump_if('>') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.bump_if('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '.' => match self.peek() {
                Some(next) if next.is_ascii_digit() => self.scan_number('.'),
                Some(next) if is_identifier_start(next) || matches!(next, '"' | '[' | '*') => {
                    TokenKind::Dot
                }
                _ => TokenKind::Error(LexError::BareDot),
            },
            '\'' => {
                if self.scan_quoted('\'') {
                    TokenKind::String
                } else {
                    TokenKind::Error(LexError::UnterminatedString)
                }
            }
            '"' => {
                if self.scan_quoted('"') {
                    TokenKind::Identifier
                } else {
                    TokenKind::Error(LexError::UnterminatedQuotedIdentifier)
                }
            }
            '[' => {
                if self.scan_quoted(']') {
                    TokenKind::Identifier
                } else {
                    TokenKind::Error(LexError::UnterminatedBracketIdentifier)
                }
            }
            c if c.is_ascii_digit() => self.scan_number(c),
            c if is_identifier_start(c) => self.scan_word(mark),
            c => TokenKind::Error(LexError::UnexpectedCharacter(c)),
        };

        self.make_token(kind, mark)
    }

    /// Consumes a delimited lexeme whose opening delimiter is already
    /// consumed. A doubled closing delimiter stands for itself.
    fn scan_quoted(&mut self, close: char) -> bool {
        loop {
            match self.bump() {
                Some(c) if c == close => {
                    if !self.bump_if(close) {
                        return true;
                    }
                }
                Some(_) => {}
                None => return false,
            }
        }
    }

    /// Scans a number whose first character (a digit or `.`) is consumed.
    fn scan_number(&mut self, first: char) -> TokenKind {
        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.bump();
            if self.eat_while(|c| c.is_ascii_hexdigit()) == 0 {
                return TokenKind::Error(LexError::HexWithoutDigits);
            }
            if self.peek().is_some_and(|c| c == '.' || is_identifier_char(c)) {
                self.bump();
                return TokenKind::Error(LexError::InvalidHexLiteral);
            }
            return TokenKind::Number;
        }

        self.eat_while(|c| c.is_ascii_digit());
        if first != '.' && self.bump_if('.') {
            self.eat_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.eat_while(|c| c.is_ascii_digit()) == 0 {
                return TokenKind::Error(LexError::MalformedExponent);
            }
        }

        TokenKind::Number
    }

    /// Scans a keyword or a bare identifier.
    fn scan_word(&mut self, mark: Mark) -> TokenKind {
        self.eat_while(is_identifier_char);
        let text = &self.input[mark.offset..self.state.offset];
        Keyword::from_str(text).map_or(TokenKind::Identifier, TokenKind::Keyword)
    }
}

const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c')
}

const fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
