// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for asm80.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use serde_json::json;

use asm80::assembler::assemble;
use asm80::error::{AsmError, AsmErrorKind};
use asm80::output;

const VERSION: &str = "1.0";
const LONG_ABOUT: &str = "Intel 8080 two-pass assembler.

Outputs are opt-in: specify at least one of -b/--bin or -x/--hex.
Use -o/--outfile to set the output base name when filenames are omitted.
The assembled image always starts at address 0000.";

#[derive(Parser, Debug)]
#[command(
    name = "asm80",
    version = VERSION,
    about = "Intel 8080 two-pass assembler",
    long_about = LONG_ABOUT
)]
struct Cli {
    #[arg(
        short = 'b',
        long = "bin",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Emit the raw binary image. FILE is optional; when omitted, the output base is used and a .bin extension is added."
    )]
    bin_name: Option<String>,
    #[arg(
        short = 'x',
        long = "hex",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Emit an Intel Hex file. FILE is optional; when omitted, the output base is used and a .hex extension is added."
    )]
    hex_name: Option<String>,
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "BASE",
        long_help = "Output filename base when -b/-x omit filenames. Defaults to the input base."
    )]
    outfile: Option<String>,
    #[arg(
        long = "json",
        action = ArgAction::SetTrue,
        long_help = "Report errors as a JSON object on stderr instead of plain text."
    )]
    json: bool,
    #[arg(
        short = 'i',
        long = "infile",
        value_name = "FILE",
        long_help = "Input assembly file. Must end with .asm."
    )]
    infile: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        report_error(&err, cli.json);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AsmError> {
    let bin_requested = cli.bin_name.is_some();
    let hex_requested = cli.hex_name.is_some();
    if !bin_requested && !hex_requested {
        return Err(AsmError::new(
            AsmErrorKind::Cli,
            "No outputs selected. Specify at least one of -b/--bin or -x/--hex",
            None,
        ));
    }

    let (asm_name, input_base) = input_base_from_path(&cli.infile)?;
    let out_base = cli.outfile.as_deref().unwrap_or(&input_base);

    let source = fs::read_to_string(&asm_name)
        .map_err(|err| AsmError::new(AsmErrorKind::Io, &err.to_string(), Some(&asm_name)))?;
    let bytes = assemble(&source)?;

    if let Some(path) = resolve_output_path(out_base, cli.bin_name.clone(), "bin") {
        let mut file = create_output(&path)?;
        output::write_bin(&mut file, &bytes)
            .map_err(|err| AsmError::new(AsmErrorKind::Io, &err.to_string(), Some(&path)))?;
    }
    if let Some(path) = resolve_output_path(out_base, cli.hex_name.clone(), "hex") {
        let mut file = create_output(&path)?;
        output::write_hex(&mut file, &bytes)
            .map_err(|err| AsmError::new(AsmErrorKind::Io, &err.to_string(), Some(&path)))?;
    }

    Ok(())
}

fn create_output(path: &str) -> Result<File, AsmError> {
    File::create(path)
        .map_err(|_| AsmError::new(AsmErrorKind::Io, "Error opening file for write", Some(path)))
}

fn input_base_from_path(path: &Path) -> Result<(String, String), AsmError> {
    let asm_name = path.to_string_lossy().to_string();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(name) => name,
        None => {
            return Err(AsmError::new(
                AsmErrorKind::Cli,
                "Invalid input file name",
                None,
            ))
        }
    };
    if !file_name.ends_with(".asm") {
        return Err(AsmError::new(
            AsmErrorKind::Cli,
            "Input file must end with .asm",
            None,
        ));
    }
    let base = file_name.strip_suffix(".asm").unwrap_or(file_name);
    Ok((asm_name, base.to_string()))
}

fn resolve_output_path(base: &str, name: Option<String>, extension: &str) -> Option<String> {
    let name = name?;
    if name.is_empty() {
        return Some(format!("{base}.{extension}"));
    }
    let mut path = PathBuf::from(&name);
    if path.extension().is_none() {
        path = PathBuf::from(format!("{name}.{extension}"));
    }
    Some(path.to_string_lossy().to_string())
}

fn report_error(err: &AsmError, as_json: bool) {
    if as_json {
        let value = json!({
            "severity": "error",
            "kind": err.kind().code(),
            "message": err.message(),
        });
        eprintln!("{value}");
    } else {
        eprintln!("ERROR: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::{input_base_from_path, resolve_output_path, Cli};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn cli_parses_outputs_and_input() {
        let cli = Cli::parse_from(["asm80", "-i", "prog.asm", "-b", "-x", "-o", "out"]);
        assert_eq!(cli.infile, PathBuf::from("prog.asm"));
        assert_eq!(cli.bin_name, Some(String::new()));
        assert_eq!(cli.hex_name, Some(String::new()));
        assert_eq!(cli.outfile, Some("out".to_string()));
        assert!(!cli.json);
    }

    #[test]
    fn input_must_end_with_asm() {
        assert!(input_base_from_path(&PathBuf::from("prog.s")).is_err());
        let (name, base) = input_base_from_path(&PathBuf::from("prog.asm")).expect("valid");
        assert_eq!(name, "prog.asm");
        assert_eq!(base, "prog");
    }

    #[test]
    fn output_paths_get_default_extensions() {
        assert_eq!(
            resolve_output_path("prog", Some(String::new()), "bin"),
            Some("prog.bin".to_string())
        );
        assert_eq!(
            resolve_output_path("prog", Some("image".to_string()), "hex"),
            Some("image.hex".to_string())
        );
        assert_eq!(
            resolve_output_path("prog", Some("image.ihx".to_string()), "hex"),
            Some("image.ihx".to_string())
        );
        assert_eq!(resolve_output_path("prog", None, "bin"), None);
    }
}
