// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Binary and Intel HEX output helpers.

use std::io::{self, Write};

/// Write the raw binary image.
pub fn write_bin<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)
}

/// Write the image as Intel HEX: 16-byte type-00 data records starting at
/// address 0000, terminated by the type-01 end-of-file record.
pub fn write_hex<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    for (index, chunk) in bytes.chunks(16).enumerate() {
        let addr = (index * 16) as u16;
        let mut sum = chunk.len() as u8;
        sum = sum.wrapping_add((addr >> 8) as u8);
        sum = sum.wrapping_add((addr & 0xFF) as u8);
        write!(out, ":{:02X}{:04X}00", chunk.len(), addr)?;
        for &b in chunk {
            sum = sum.wrapping_add(b);
            write!(out, "{:02X}", b)?;
        }
        writeln!(out, "{:02X}", sum.wrapping_neg())?;
    }
    writeln!(out, ":00000001FF")
}
