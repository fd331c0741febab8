// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Parser and emitter: token stream to machine code.
//
// Instructions are emitted in source order. A label operand of a three-byte
// shape reserves two placeholder bytes and records a fixup; all fixups are
// resolved in a terminal back-patch pass, so labels are visible to
// references on either side of their definition.

use crate::error::{AsmError, AsmErrorKind};
use crate::instructions::{self, Shape};
use crate::lexer::{Token, TokenKind};
use crate::symbol_table::{DefineResult, FixupList, SymbolTable};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    output: Vec<u8>,
    symbols: SymbolTable,
    fixups: FixupList,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens;
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, ""));
        }
        Self {
            tokens,
            position: 0,
            output: Vec::new(),
            symbols: SymbolTable::new(),
            fixups: FixupList::new(),
        }
    }

    /// Drive the token stream to completion and return the assembled bytes.
    pub fn parse(mut self) -> Result<Vec<u8>, AsmError> {
        loop {
            match self.current().kind {
                TokenKind::Eof => break,
                TokenKind::Mnemonic => self.parse_instruction()?,
                TokenKind::Label => self.define_label()?,
                _ => {
                    return Err(self.unexpected("a mnemonic or label definition"));
                }
            }
        }
        self.backpatch()?;
        Ok(self.output)
    }

    fn parse_instruction(&mut self) -> Result<(), AsmError> {
        let mnemonic = self.current().literal.clone();
        let entry = instructions::lookup(&mnemonic).ok_or_else(|| {
            AsmError::new(
                AsmErrorKind::UnknownMnemonic,
                "No instruction with this name",
                Some(&mnemonic),
            )
        })?;
        self.advance();

        match entry.shape {
            Shape::Implied => {
                self.output.push(entry.base);
                Ok(())
            }
            Shape::Imm8 => {
                let literal = self.expect_number(&mnemonic)?;
                let data = parse_byte(&literal)?;
                self.output.push(entry.base);
                self.output.push(data);
                Ok(())
            }
            Shape::Imm16 => self.emit_addr_operand(entry.base, &mnemonic),
            Shape::Reg8 { shift } => {
                let name = self.expect_register(&mnemonic)?;
                let code = instructions::reg8_code(&name).ok_or_else(|| {
                    invalid_register(&mnemonic, &name)
                })?;
                self.output.push(entry.base | (code << shift));
                Ok(())
            }
            Shape::MovReg8Reg8 => {
                let dst = self.expect_register(&mnemonic)?;
                self.expect_comma(&mnemonic)?;
                let src = self.expect_register(&mnemonic)?;
                let dst_code = instructions::reg8_code(&dst)
                    .ok_or_else(|| invalid_register(&mnemonic, &dst))?;
                let src_code = instructions::reg8_code(&src)
                    .ok_or_else(|| invalid_register(&mnemonic, &src))?;
                self.output.push(entry.base | (dst_code << 3) | src_code);
                Ok(())
            }
            Shape::Reg8Imm8 => {
                let dst = self.expect_register(&mnemonic)?;
                self.expect_comma(&mnemonic)?;
                let literal = self.expect_number(&mnemonic)?;
                let code = instructions::reg8_code(&dst)
                    .ok_or_else(|| invalid_register(&mnemonic, &dst))?;
                let data = parse_byte(&literal)?;
                self.output.push(entry.base | (code << 3));
                self.output.push(data);
                Ok(())
            }
            Shape::Reg16Imm16 => {
                let dst = self.expect_register(&mnemonic)?;
                self.expect_comma(&mnemonic)?;
                let code = instructions::reg16_code(&dst)
                    .ok_or_else(|| invalid_register(&mnemonic, &dst))?;
                self.emit_addr_operand(entry.base | (code << 4), &mnemonic)
            }
            Shape::RegPair { slot3 } => {
                let name = self.expect_register(&mnemonic)?;
                let code = instructions::pair_code(&name, slot3)
                    .ok_or_else(|| invalid_register(&mnemonic, &name))?;
                self.output.push(entry.base | (code << 4));
                Ok(())
            }
            Shape::IndexPair => {
                let name = self.expect_register(&mnemonic)?;
                let code = instructions::index_pair_code(&name)
                    .ok_or_else(|| invalid_register(&mnemonic, &name))?;
                self.output.push(entry.base | (code << 4));
                Ok(())
            }
            Shape::RstVector => {
                let literal = self.expect_number(&mnemonic)?;
                let vector = match parse_word(&literal) {
                    Ok(v) if v <= 7 => v as u8,
                    _ => {
                        return Err(AsmError::new(
                            AsmErrorKind::BadRestVector,
                            "RST vector must be in the range 0-7",
                            Some(&literal),
                        ));
                    }
                };
                self.output.push(entry.base | (vector << 3));
                Ok(())
            }
            Shape::DataBytes => self.emit_data_bytes(),
            Shape::DataWords => self.emit_data_words(),
        }
    }

    // A label in statement position defines a symbol at the current output
    // length; the colon after it is optional.
    fn define_label(&mut self) -> Result<(), AsmError> {
        let name = self.current().literal.clone();
        if self.symbols.define(&name, self.output.len() as u16) == DefineResult::Duplicate {
            return Err(AsmError::new(
                AsmErrorKind::DuplicateLabel,
                "Label defined more than once",
                Some(&name),
            ));
        }
        self.advance();
        if self.current().kind == TokenKind::Colon {
            self.advance();
        }
        Ok(())
    }

    // Emit opcode + 16-bit operand. A numeric operand lands little-endian
    // immediately; a label reserves two placeholder bytes and records the
    // low-byte offset for the back-patch pass.
    fn emit_addr_operand(&mut self, opcode: u8, mnemonic: &str) -> Result<(), AsmError> {
        match self.current().kind {
            TokenKind::Number => {
                let value = parse_word(&self.current().literal)?;
                self.advance();
                self.output.push(opcode);
                self.output.push((value & 0xFF) as u8);
                self.output.push((value >> 8) as u8);
                Ok(())
            }
            TokenKind::Label => {
                let label = self.current().literal.clone();
                self.advance();
                self.output.push(opcode);
                self.fixups.record(&label, self.output.len() as u16);
                self.output.push(0x00);
                self.output.push(0x00);
                Ok(())
            }
            TokenKind::Eof => Err(missing_operand(mnemonic, "an address or label")),
            _ => Err(self.unexpected("an address or label")),
        }
    }

    // DB: numbers become single bytes, strings their raw bytes; commas
    // between operands are optional. Stops at the first token that is
    // neither.
    fn emit_data_bytes(&mut self) -> Result<(), AsmError> {
        loop {
            match self.current().kind {
                TokenKind::Number => {
                    let data = parse_byte(&self.current().literal)?;
                    self.output.push(data);
                    self.advance();
                }
                TokenKind::Str => {
                    let literal = self.current().literal.clone();
                    self.output.extend_from_slice(literal.as_bytes());
                    self.advance();
                }
                _ => return Ok(()),
            }
            if self.current().kind == TokenKind::Comma {
                self.advance();
            }
        }
    }

    // DW: numbers become little-endian words; labels go through the fixup
    // machinery like any other address operand.
    fn emit_data_words(&mut self) -> Result<(), AsmError> {
        loop {
            match self.current().kind {
                TokenKind::Number => {
                    let value = parse_word(&self.current().literal)?;
                    self.output.push((value & 0xFF) as u8);
                    self.output.push((value >> 8) as u8);
                    self.advance();
                }
                TokenKind::Label => {
                    let label = self.current().literal.clone();
                    self.fixups.record(&label, self.output.len() as u16);
                    self.output.push(0x00);
                    self.output.push(0x00);
                    self.advance();
                }
                _ => return Ok(()),
            }
            if self.current().kind == TokenKind::Comma {
                self.advance();
            }
        }
    }

    // Resolve every recorded fixup against the symbol table, low byte first.
    fn backpatch(&mut self) -> Result<(), AsmError> {
        for (label, offsets) in self.fixups.iter() {
            let addr = self.symbols.lookup(label).ok_or_else(|| {
                AsmError::new(
                    AsmErrorKind::UndefinedLabel,
                    "Label is never defined",
                    Some(label),
                )
            })?;
            for &offset in offsets {
                let p = offset as usize;
                self.output[p] = (addr & 0xFF) as u8;
                self.output[p + 1] = (addr >> 8) as u8;
            }
        }
        Ok(())
    }

    fn expect_register(&mut self, mnemonic: &str) -> Result<String, AsmError> {
        match self.current().kind {
            TokenKind::Register => {
                let name = self.current().literal.clone();
                self.advance();
                Ok(name)
            }
            TokenKind::Eof => Err(missing_operand(mnemonic, "a register")),
            _ => Err(self.unexpected("a register")),
        }
    }

    fn expect_comma(&mut self, mnemonic: &str) -> Result<(), AsmError> {
        match self.current().kind {
            TokenKind::Comma => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Err(missing_operand(mnemonic, "a comma")),
            _ => Err(self.unexpected("a comma")),
        }
    }

    fn expect_number(&mut self, mnemonic: &str) -> Result<String, AsmError> {
        match self.current().kind {
            TokenKind::Number => {
                let literal = self.current().literal.clone();
                self.advance();
                Ok(literal)
            }
            TokenKind::Eof => Err(missing_operand(mnemonic, "a number")),
            _ => Err(self.unexpected("a number")),
        }
    }

    fn unexpected(&self, expected: &str) -> AsmError {
        let token = self.current();
        AsmError::new(
            AsmErrorKind::UnexpectedToken,
            &format!("Expected {expected}, found {}", token.kind.describe()),
            Some(&token.literal),
        )
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }
}

fn invalid_register(mnemonic: &str, name: &str) -> AsmError {
    AsmError::new(
        AsmErrorKind::InvalidRegister,
        &format!("Register not valid for {mnemonic}"),
        Some(name),
    )
}

fn missing_operand(mnemonic: &str, expected: &str) -> AsmError {
    AsmError::new(
        AsmErrorKind::MissingOperand,
        &format!("{mnemonic} needs {expected} before end of input"),
        None,
    )
}

// Numeric literals are stored upper-cased by the lexer; strip the optional
// 0X prefix and H suffix, then read the body as base-16.
fn parse_word(literal: &str) -> Result<u16, AsmError> {
    let mut digits = literal;
    if let Some(rest) = digits.strip_prefix("0X") {
        digits = rest;
    }
    if let Some(rest) = digits.strip_suffix('H') {
        digits = rest;
    }
    if digits.is_empty() {
        return Err(bad_number(literal));
    }
    u16::from_str_radix(digits, 16).map_err(|_| bad_number(literal))
}

fn parse_byte(literal: &str) -> Result<u8, AsmError> {
    let value = parse_word(literal)?;
    if value > 0xFF {
        return Err(AsmError::new(
            AsmErrorKind::BadNumber,
            "Value does not fit in one byte",
            Some(literal),
        ));
    }
    Ok(value as u8)
}

fn bad_number(literal: &str) -> AsmError {
    AsmError::new(
        AsmErrorKind::BadNumber,
        "Not a valid 16-bit hex constant",
        Some(literal),
    )
}
