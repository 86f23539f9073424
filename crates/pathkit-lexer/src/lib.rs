//! # Pathkit Lexer
//!
//! Tokenizer for SVG attribute micro-syntaxes: path data (`M10,20 L30,40`),
//! transform lists (`matrix(1,0,0,1,5,5)`) and number lists (`0 0 100 100`).
//!
//! The lexer is a pull tokenizer: callers ask for one token at a time with
//! [`Lexer::next_token`], look one token ahead with [`Lexer::peek`], and skip
//! separators with [`Lexer::consume_while`]. A lexer is single-use; once it has
//! produced [`TokenKind::EndOfStream`] or [`TokenKind::Error`] it yields nothing
//! more.

use std::fmt;

use tracing::trace;

/// Token types emitted by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Unrecognized character. Always the last token.
    Error,
    /// Clean end of input. Always the last token.
    EndOfStream,
    /// A lone alphabetic character, e.g. a path command.
    Letter,
    /// Two or more consecutive alphabetic characters, e.g. `matrix`.
    Word,
    /// Numeric literal, possibly signed, fractional, hex or with an exponent.
    Number,
    /// A single `,`.
    Comma,
    /// A run of whitespace.
    Whitespace,
    /// `(` or `)`.
    Parenthesis,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Error => "Error",
            TokenKind::EndOfStream => "EndOfStream",
            TokenKind::Letter => "Letter",
            TokenKind::Word => "Word",
            TokenKind::Number => "Number",
            TokenKind::Comma => "Comma",
            TokenKind::Whitespace => "Whitespace",
            TokenKind::Parenthesis => "Parenthesis",
        };
        f.write_str(name)
    }
}

/// A lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. Empty for `EndOfStream`.
    pub text: String,
    /// Byte offset of the token in the input.
    pub offset: usize,
}

impl Token {
    fn new(kind: TokenKind, text: &str, offset: usize) -> Self {
        Self {
            kind,
            text: text.to_string(),
            offset,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// True for the two kinds that end a stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfStream | TokenKind::Error)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfStream | TokenKind::Whitespace | TokenKind::Comma => {
                write!(f, "{} at {}", self.kind, self.offset)
            }
            _ => write!(f, "{} {:?} at {}", self.kind, self.text, self.offset),
        }
    }
}

/// Lexer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    /// The terminal token has been produced.
    Finished,
}

/// Pull tokenizer over one input string.
pub struct Lexer<'a> {
    name: String,
    input: &'a str,
    /// Byte offset where the pending token starts.
    start: usize,
    /// Byte offset of the next unread character.
    pos: usize,
    state: State,
    peeked: Option<Token>,
}

/// Create a lexer for `input`. `name` only shows up in diagnostics.
pub fn lex<'a>(name: impl Into<String>, input: &'a str) -> Lexer<'a> {
    Lexer {
        name: name.into(),
        input,
        start: 0,
        pos: 0,
        state: State::Running,
        peeked: None,
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0C')
}

impl<'a> Lexer<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Consume and return the next token.
    ///
    /// Returns `None` once the terminal token has been handed out.
    pub fn next_token(&mut self) -> Option<Token> {
        if let Some(token) = self.peeked.take() {
            return Some(token);
        }
        self.scan()
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Option<&Token> {
        if self.peeked.is_none() {
            self.peeked = self.scan();
        }
        self.peeked.as_ref()
    }

    /// Kind of the next token, if any.
    pub fn peek_kind(&mut self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Skip tokens of `kind`, returning how many were skipped.
    pub fn consume_while(&mut self, kind: TokenKind) -> usize {
        let mut skipped = 0;
        while self.peek_kind() == Some(kind) {
            self.next_token();
            skipped += 1;
        }
        skipped
    }

    /// Skip any mix of whitespace and commas.
    pub fn skip_separators(&mut self) -> usize {
        let mut skipped = 0;
        while matches!(
            self.peek_kind(),
            Some(TokenKind::Whitespace) | Some(TokenKind::Comma)
        ) {
            self.next_token();
            skipped += 1;
        }
        skipped
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.input[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn accept(&mut self, valid: impl Fn(char) -> bool) -> bool {
        match self.peek_char() {
            Some(c) if valid(c) => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn accept_run(&mut self, valid: impl Fn(char) -> bool) -> usize {
        let mut n = 0;
        while self.accept(&valid) {
            n += 1;
        }
        n
    }

    fn emit(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, &self.input[self.start..self.pos], self.start);
        self.start = self.pos;
        token
    }

    fn scan(&mut self) -> Option<Token> {
        if self.state == State::Finished {
            return None;
        }

        let Some(c) = self.next_char() else {
            self.state = State::Finished;
            return Some(self.emit(TokenKind::EndOfStream));
        };

        let token = match c {
            c if is_whitespace(c) => {
                self.accept_run(is_whitespace);
                self.emit(TokenKind::Whitespace)
            }
            c if c.is_alphabetic() => self.lex_letter(),
            '+' | '-' | '.' => self.lex_number(c),
            c if c.is_ascii_digit() => self.lex_number(c),
            ',' => self.emit(TokenKind::Comma),
            '(' | ')' => self.emit(TokenKind::Parenthesis),
            _ => {
                self.state = State::Finished;
                let token = self.emit(TokenKind::Error);
                trace!(lexer = %self.name, offset = token.offset, found = %token.text, "Unrecognized character");
                token
            }
        };
        Some(token)
    }

    fn lex_letter(&mut self) -> Token {
        if self.accept_run(char::is_alphabetic) > 0 {
            self.emit(TokenKind::Word)
        } else {
            self.emit(TokenKind::Letter)
        }
    }

    /// Scan the rest of a number whose first character `first` is consumed.
    fn lex_number(&mut self, first: char) -> Token {
        let mut leading = first;
        if matches!(first, '+' | '-') {
            match self.peek_char() {
                Some(c) => {
                    leading = c;
                    if c.is_ascii_digit() || c == '.' {
                        self.pos += c.len_utf8();
                    }
                }
                None => return self.emit(TokenKind::Number),
            }
        }

        if leading == '0' && self.accept(|c| c == 'x' || c == 'X') {
            self.accept_run(|c| c.is_ascii_hexdigit());
            return self.emit(TokenKind::Number);
        }

        if leading != '.' {
            self.accept_run(|c| c.is_ascii_digit());
            if self.accept(|c| c == '.') {
                self.accept_run(|c| c.is_ascii_digit());
            }
        } else {
            self.accept_run(|c| c.is_ascii_digit());
        }

        if self.accept(|c| c == 'e' || c == 'E') {
            self.accept(|c| c == '+' || c == '-');
            self.accept_run(|c| c.is_ascii_digit());
        }

        self.emit(TokenKind::Number)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
