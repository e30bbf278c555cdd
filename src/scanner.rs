use peekmore::{PeekMore, PeekMoreIterator};
use substring::Substring;

use crate::error::ScanError;
use crate::token::{keyword, Literal, Token, Type};

pub struct Scanner<'a> {
    source: &'a str,
    chars: PeekMoreIterator<std::str::Chars<'a>>,
    length: usize,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            chars: source.chars().peekmore(),
            length: source.chars().count(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<ScanError>) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::new(Type::Eof, String::new(), None, self.line));
        (self.tokens, self.errors)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.length
    }

    fn advance(&mut self) -> char {
        let c = self.chars.next().expect("advance past end of source");
        self.current += 1;
        c
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_next(&mut self) -> Option<char> {
        self.chars.peek_nth(1).copied()
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() != Some(expected) {
            return false;
        }
        self.advance();
        true
    }

    fn lexeme(&self) -> String {
        self.source.substring(self.start, self.current).to_string()
    }

    fn add_token(&mut self, kind: Type) {
        self.add_token_literal(kind, None);
    }

    fn add_token_literal(&mut self, kind: Type, literal: Option<Literal>) {
        self.tokens.push(Token::new(kind, self.lexeme(), literal, self.line));
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(ScanError { line: self.line, message: message.into() });
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(Type::LeftParen),
            ')' => self.add_token(Type::RightParen),
            '{' => self.add_token(Type::LeftBrace),
            '}' => self.add_token(Type::RightBrace),
            ',' => self.add_token(Type::Comma),
            '.' => self.add_token(Type::Dot),
            '-' => self.add_token(Type::Minus),
            '+' => self.add_token(Type::Plus),
            ';' => self.add_token(Type::Semicolon),
            ':' => self.add_token(Type::Colon),
            '*' => self.add_token(Type::Star),
            '!' => {
                let kind = if self.matches('=') { Type::BangEqual } else { Type::Bang };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.matches('=') { Type::EqualEqual } else { Type::Equal };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('=') { Type::LessEqual } else { Type::Less };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('=') { Type::GreaterEqual } else { Type::Greater };
                self.add_token(kind);
            }
            '/' => {
                if self.matches('/') {
                    while self.peek() != Some('\n') && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(Type::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
            other => self.error(format!("Unexpected character '{other}'.")),
        }
    }

    fn string(&mut self) {
        while self.peek() != Some('"') && !self.is_at_end() {
            if self.peek() == Some('\n') {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.error("Unterminated string.");
            return;
        }

        // closing quote
        self.advance();

        let value = self.source.substring(self.start + 1, self.current - 1).to_string();
        self.add_token_literal(Type::String, Some(Literal::Str(value)));
    }

    fn number(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = self.lexeme();
        let value: f64 = text.parse().expect("number lexeme must parse as f64");
        self.add_token_literal(Type::Number, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = self.lexeme();
        let kind = keyword(&text).unwrap_or(Type::Identifier);
        self.add_token(kind);
    }
}
