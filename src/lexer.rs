// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Lexer for 8080 assembly source.

use crate::error::{AsmError, AsmErrorKind};
use crate::instructions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Mnemonic,
    Register,
    Number,
    Label,
    Comma,
    Colon,
    Str,
    Eof,
}

impl TokenKind {
    /// Human-readable name used when a token shows up in an error message.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Mnemonic => "mnemonic",
            TokenKind::Register => "register",
            TokenKind::Number => "number",
            TokenKind::Label => "label",
            TokenKind::Comma => "comma",
            TokenKind::Colon => "colon",
            TokenKind::Str => "string",
            TokenKind::Eof => "end of input",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }
}

#[derive(Debug)]
pub struct Lexer {
    chars: Vec<char>,
    cursor: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            cursor: 0,
        }
    }

    /// Tokenise the whole input. The returned stream always ends in exactly
    /// one `Eof` token.
    pub fn lex(mut self) -> Result<Vec<Token>, AsmError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, AsmError> {
        self.skip_blanks_and_comments();

        let c = match self.current() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, "")),
        };

        if is_letter(c) || c == '_' {
            return Ok(self.read_identifier());
        }
        if c.is_ascii_digit() {
            return Ok(self.read_number());
        }

        match c {
            ',' => {
                self.cursor += 1;
                Ok(Token::new(TokenKind::Comma, ","))
            }
            ':' => {
                self.cursor += 1;
                Ok(Token::new(TokenKind::Colon, ":"))
            }
            '\'' | '"' => self.read_string(),
            _ => Err(AsmError::new(
                AsmErrorKind::IllegalChar,
                "Illegal character, cannot start a token",
                Some(&c.to_string()),
            )),
        }
    }

    // Identifiers are upper-cased and classified against the mnemonic and
    // register sets; anything else is a label.
    fn read_identifier(&mut self) -> Token {
        let start = self.cursor;
        while let Some(c) = self.current() {
            if !is_ident_char(c) {
                break;
            }
            self.cursor += 1;
        }
        let literal: String = self.chars[start..self.cursor]
            .iter()
            .collect::<String>()
            .to_uppercase();

        if instructions::has_mnemonic(&literal) {
            Token::new(TokenKind::Mnemonic, literal)
        } else if is_register(&literal) {
            Token::new(TokenKind::Register, literal)
        } else {
            Token::new(TokenKind::Label, literal)
        }
    }

    // Numbers keep their textual form (any 0X prefix or H suffix included);
    // numeric interpretation happens in the parser.
    fn read_number(&mut self) -> Token {
        let start = self.cursor;
        if self.current() == Some('0') && matches!(self.peek(1), Some('x') | Some('X')) {
            self.cursor += 2;
        }
        while let Some(c) = self.current() {
            if !c.is_ascii_alphanumeric() {
                break;
            }
            self.cursor += 1;
        }
        let literal: String = self.chars[start..self.cursor]
            .iter()
            .collect::<String>()
            .to_uppercase();
        Token::new(TokenKind::Number, literal)
    }

    fn read_string(&mut self) -> Result<Token, AsmError> {
        let quote = self.chars[self.cursor];
        self.cursor += 1;
        let start = self.cursor;
        while let Some(c) = self.current() {
            if c == quote {
                let literal: String = self.chars[start..self.cursor].iter().collect();
                self.cursor += 1;
                return Ok(Token::new(TokenKind::Str, literal));
            }
            self.cursor += 1;
        }
        Err(AsmError::new(
            AsmErrorKind::IllegalChar,
            "Unterminated string literal",
            Some(&quote.to_string()),
        ))
    }

    fn skip_blanks_and_comments(&mut self) {
        loop {
            match self.current() {
                Some(' ') | Some('\t') | Some('\n') | Some('\r') => self.cursor += 1,
                Some(';') => {
                    while let Some(c) = self.current() {
                        if c == '\n' {
                            break;
                        }
                        self.cursor += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.cursor + offset).copied()
    }
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    is_letter(c) || c.is_ascii_digit() || c == '_'
}

fn is_register(name: &str) -> bool {
    matches!(
        name,
        "A" | "B" | "C" | "D" | "E" | "H" | "L" | "M" | "SP" | "PSW"
    )
}
