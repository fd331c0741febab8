// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Static instruction catalogue for the Intel 8080.
//!
//! Each entry carries the base opcode byte and the operand [`Shape`] that
//! tells the parser how to fold operands into the emitted bytes. Adding a
//! mnemonic is a table edit, never a parser change.

/// Which register name occupies pair slot 3 for a [`Shape::RegPair`]
/// instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSlot3 {
    Psw,
    Sp,
}

/// Operand shape: the arity and bit-assembly recipe shared by a group of
/// mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Single opcode byte, no operands.
    Implied,
    /// Opcode byte followed by one immediate data byte.
    Imm8,
    /// Opcode byte followed by a little-endian 16-bit address or a label.
    Imm16,
    /// One 8-bit register folded into the opcode at `shift`.
    Reg8 { shift: u8 },
    /// MOV dst,src: both registers folded into base 0x40.
    MovReg8Reg8,
    /// MVI r,d8: register at bit 3, then one data byte.
    Reg8Imm8,
    /// LXI rp,d16: pair at bit 4, then address or label.
    Reg16Imm16,
    /// PUSH/POP/INX/DCX/DAD: pair at bit 4; slot 3 is PSW or SP.
    RegPair { slot3: PairSlot3 },
    /// STAX/LDAX: pair limited to B or D, folded in at bit 4.
    IndexPair,
    /// RST n: vector 0..=7 folded into base 0xC7 at bit 3.
    RstVector,
    /// DB: inline data bytes and strings.
    DataBytes,
    /// DW: inline little-endian data words.
    DataWords,
}

pub struct InstructionEntry {
    pub mnemonic: &'static str,
    pub shape: Shape,
    pub base: u8,
}

const fn entry(mnemonic: &'static str, shape: Shape, base: u8) -> InstructionEntry {
    InstructionEntry {
        mnemonic,
        shape,
        base,
    }
}

// Grouped by instruction set group as per "Table 2. Instruction Set Summary"
// in the Intel 8080A datasheet.
pub static INSTRUCTION_TABLE: &[InstructionEntry] = &[
    // MOVE, LOAD AND STORE
    entry("MOV", Shape::MovReg8Reg8, 0x40),
    entry("MVI", Shape::Reg8Imm8, 0x06),
    entry("LXI", Shape::Reg16Imm16, 0x01),
    entry("STAX", Shape::IndexPair, 0x02),
    entry("LDAX", Shape::IndexPair, 0x0A),
    entry("STA", Shape::Imm16, 0x32),
    entry("LDA", Shape::Imm16, 0x3A),
    entry("SHLD", Shape::Imm16, 0x22),
    entry("LHLD", Shape::Imm16, 0x2A),
    entry("XCHG", Shape::Implied, 0xEB),
    // STACK OPERATIONS
    entry("PUSH", Shape::RegPair { slot3: PairSlot3::Psw }, 0xC5),
    entry("POP", Shape::RegPair { slot3: PairSlot3::Psw }, 0xC1),
    entry("XTHL", Shape::Implied, 0xE3),
    entry("SPHL", Shape::Implied, 0xF9),
    // JUMP
    entry("JMP", Shape::Imm16, 0xC3),
    entry("JC", Shape::Imm16, 0xDA),
    entry("JNC", Shape::Imm16, 0xD2),
    entry("JZ", Shape::Imm16, 0xCA),
    entry("JNZ", Shape::Imm16, 0xC2),
    entry("JP", Shape::Imm16, 0xF2),
    entry("JM", Shape::Imm16, 0xFA),
    entry("JPE", Shape::Imm16, 0xEA),
    entry("JPO", Shape::Imm16, 0xE2),
    entry("PCHL", Shape::Implied, 0xE9),
    // CALL
    entry("CALL", Shape::Imm16, 0xCD),
    entry("CC", Shape::Imm16, 0xDC),
    entry("CNC", Shape::Imm16, 0xD4),
    entry("CZ", Shape::Imm16, 0xCC),
    entry("CNZ", Shape::Imm16, 0xC4),
    entry("CP", Shape::Imm16, 0xF4),
    entry("CM", Shape::Imm16, 0xFC),
    entry("CPE", Shape::Imm16, 0xEC),
    entry("CPO", Shape::Imm16, 0xE4),
    // RETURN
    entry("RET", Shape::Implied, 0xC9),
    entry("RC", Shape::Implied, 0xD8),
    entry("RNC", Shape::Implied, 0xD0),
    entry("RZ", Shape::Implied, 0xC8),
    entry("RNZ", Shape::Implied, 0xC0),
    entry("RP", Shape::Implied, 0xF0),
    entry("RM", Shape::Implied, 0xF8),
    entry("RPE", Shape::Implied, 0xE8),
    entry("RPO", Shape::Implied, 0xE0),
    // RESTART
    entry("RST", Shape::RstVector, 0xC7),
    // INCREMENT AND DECREMENT
    entry("INR", Shape::Reg8 { shift: 3 }, 0x04),
    entry("DCR", Shape::Reg8 { shift: 3 }, 0x05),
    entry("INX", Shape::RegPair { slot3: PairSlot3::Sp }, 0x03),
    entry("DCX", Shape::RegPair { slot3: PairSlot3::Sp }, 0x0B),
    // ADD
    entry("ADD", Shape::Reg8 { shift: 0 }, 0x80),
    entry("ADC", Shape::Reg8 { shift: 0 }, 0x88),
    entry("ADI", Shape::Imm8, 0xC6),
    entry("ACI", Shape::Imm8, 0xCE),
    entry("DAD", Shape::RegPair { slot3: PairSlot3::Sp }, 0x09),
    // SUBTRACT
    entry("SUB", Shape::Reg8 { shift: 0 }, 0x90),
    entry("SBB", Shape::Reg8 { shift: 0 }, 0x98),
    entry("SUI", Shape::Imm8, 0xD6),
    entry("SBI", Shape::Imm8, 0xDE),
    // LOGICAL
    entry("ANA", Shape::Reg8 { shift: 0 }, 0xA0),
    entry("XRA", Shape::Reg8 { shift: 0 }, 0xA8),
    entry("ORA", Shape::Reg8 { shift: 0 }, 0xB0),
    entry("CMP", Shape::Reg8 { shift: 0 }, 0xB8),
    entry("ANI", Shape::Imm8, 0xE6),
    entry("XRI", Shape::Imm8, 0xEE),
    entry("ORI", Shape::Imm8, 0xF6),
    entry("CPI", Shape::Imm8, 0xFE),
    // ROTATE
    entry("RLC", Shape::Implied, 0x07),
    entry("RRC", Shape::Implied, 0x0F),
    entry("RAL", Shape::Implied, 0x17),
    entry("RAR", Shape::Implied, 0x1F),
    // SPECIALS
    entry("CMA", Shape::Implied, 0x2F),
    entry("STC", Shape::Implied, 0x37),
    entry("CMC", Shape::Implied, 0x3F),
    entry("DAA", Shape::Implied, 0x27),
    // INPUT/OUTPUT
    entry("IN", Shape::Imm8, 0xDB),
    entry("OUT", Shape::Imm8, 0xD3),
    // CONTROL
    entry("EI", Shape::Implied, 0xFB),
    entry("DI", Shape::Implied, 0xF3),
    entry("NOP", Shape::Implied, 0x00),
    entry("HLT", Shape::Implied, 0x76),
    // DATA
    entry("DB", Shape::DataBytes, 0x00),
    entry("DW", Shape::DataWords, 0x00),
];

/// Look up a mnemonic's table entry. The argument must already be
/// upper-cased, which the lexer guarantees.
pub fn lookup(mnemonic: &str) -> Option<&'static InstructionEntry> {
    INSTRUCTION_TABLE.iter().find(|e| e.mnemonic == mnemonic)
}

pub fn has_mnemonic(mnemonic: &str) -> bool {
    lookup(mnemonic).is_some()
}

/// 8-bit register encoding: B=0, C=1, D=2, E=3, H=4, L=5, M=6, A=7.
pub fn reg8_code(name: &str) -> Option<u8> {
    match name {
        "B" => Some(0),
        "C" => Some(1),
        "D" => Some(2),
        "E" => Some(3),
        "H" => Some(4),
        "L" => Some(5),
        "M" => Some(6),
        "A" => Some(7),
        _ => None,
    }
}

/// 16-bit register-pair encoding for LXI: B=0, D=1, H=2, SP=3.
pub fn reg16_code(name: &str) -> Option<u8> {
    match name {
        "B" => Some(0),
        "D" => Some(1),
        "H" => Some(2),
        "SP" => Some(3),
        _ => None,
    }
}

/// Register-pair encoding with the slot-3 name picked per mnemonic:
/// PSW for PUSH/POP, SP for INX/DCX/DAD.
pub fn pair_code(name: &str, slot3: PairSlot3) -> Option<u8> {
    match (name, slot3) {
        ("B", _) => Some(0),
        ("D", _) => Some(1),
        ("H", _) => Some(2),
        ("PSW", PairSlot3::Psw) => Some(3),
        ("SP", PairSlot3::Sp) => Some(3),
        _ => None,
    }
}

/// STAX/LDAX pair encoding: B=0, D=1 only.
pub fn index_pair_code(name: &str) -> Option<u8> {
    match name {
        "B" => Some(0),
        "D" => Some(1),
        _ => None,
    }
}
