// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Assembler front: source text in, machine code out.

use crate::error::AsmError;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Assemble a complete 8080 source program into its machine-code bytes.
///
/// The returned vector is the flat memory image for load address 0x0000;
/// its length is exactly the sum of the encoded instruction sizes. The
/// first error encountered aborts the whole assembly.
pub fn assemble(source: &str) -> Result<Vec<u8>, AsmError> {
    let tokens = Lexer::new(source).lex()?;
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::assemble;
    use crate::error::AsmErrorKind;

    #[test]
    fn assembles_a_small_program() {
        let bytes = assemble("MVI A, 34H\nMOV B, C\nLDA 1234H\nHLT").expect("assembles");
        assert_eq!(bytes, vec![0x3E, 0x34, 0x41, 0x3A, 0x34, 0x12, 0x76]);
    }

    #[test]
    fn empty_source_assembles_to_nothing() {
        assert_eq!(assemble("").expect("assembles"), Vec::<u8>::new());
        assert_eq!(assemble("; nothing here\n").expect("assembles"), Vec::<u8>::new());
    }

    #[test]
    fn first_error_wins() {
        let err = assemble("PUSH A\nJMP NOWHERE").unwrap_err();
        assert_eq!(err.kind(), AsmErrorKind::InvalidRegister);
    }
}
