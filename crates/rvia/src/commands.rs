//! Command implementations.

use std::path::Path;

use rayon::prelude::*;
use rvia_analysis::RiscvInstrInfo;
use rvia_isa::{Opcode, Rv32, Rv64, Xlen};
use tracing::{debug, error, info, warn};

use crate::cli::{Cli, Commands, EXIT_FAILURE, EXIT_SUCCESS, OutputFormat, XlenArg};
use crate::error::{Error, Result};
use crate::report::{Report, analyze_word, render};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    let result = match &cli.command {
        Commands::Analyze {
            words,
            bin,
            xlen,
            format,
        } => cmd_analyze(words, bin.as_deref(), *xlen, *format),
        Commands::Opcodes { xlen } => {
            cmd_opcodes(*xlen);
            Ok(())
        }
    };
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            error!("{err}");
            EXIT_FAILURE
        }
    }
}

fn cmd_analyze(
    words: &[String],
    bin: Option<&Path>,
    xlen: XlenArg,
    format: OutputFormat,
) -> Result<()> {
    let code = match bin {
        Some(path) => read_code(path)?,
        None => words.iter().map(|w| parse_word(w)).collect::<Result<Vec<_>>>()?,
    };
    if code.is_empty() {
        return Err(Error::NoInput);
    }

    let reports = match xlen {
        XlenArg::Rv32 => analyze_all::<Rv32>(&code),
        XlenArg::Rv64 => analyze_all::<Rv64>(&code),
    };
    for report in &reports {
        println!("{}", render(report, format));
    }

    let mut decoded = 0usize;
    let mut add_imm = 0usize;
    let mut memory = 0usize;
    for report in &reports {
        match &report.outcome {
            Ok(facts) => {
                decoded += 1;
                add_imm += usize::from(facts.add_imm.is_some());
                memory += usize::from(facts.mem.is_some());
            }
            Err(err) => warn!(address = report.address, "{err}"),
        }
    }
    info!(
        instructions = reports.len(),
        decoded, add_imm, memory, "analysis complete"
    );
    Ok(())
}

/// Analyze every word; queries are pure so words are processed in parallel.
fn analyze_all<X: Xlen>(code: &[u32]) -> Vec<Report> {
    let tii = RiscvInstrInfo::<X>::new();
    debug!(target_xlen = X::NAME, words = code.len(), "analyzing");
    code.par_iter()
        .enumerate()
        .map(|(i, &raw)| analyze_word(&tii, (i * 4) as u64, raw))
        .collect()
}

fn cmd_opcodes(xlen: XlenArg) {
    match xlen {
        XlenArg::Rv32 => print_opcodes::<Rv32>(),
        XlenArg::Rv64 => print_opcodes::<Rv64>(),
    }
}

fn print_opcodes<X: Xlen>() {
    println!(
        "{:<12} {:<14} {:<18} {:<16} value",
        "mnemonic", "class", "layout", "memory"
    );
    for info in Opcode::ALL
        .iter()
        .map(|op| op.info())
        .filter(|info| info.is_available::<X>())
    {
        println!(
            "{:<12} {:<14} {:<18} {:<16} {}",
            info.opcode.mnemonic(),
            format!("{:?}", info.class),
            format!("{:?}", info.layout),
            format!("{:?}", info.mem),
            info.value_file
        );
    }
}

/// Read a raw little-endian code file as 32-bit words.
fn read_code(path: &Path) -> Result<Vec<u32>> {
    let bytes = std::fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(Error::UnalignedCode(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Parse one hex instruction word, with or without `0x` and `_` separators.
fn parse_word(text: &str) -> Result<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
        .replace('_', "");
    if digits.is_empty() || digits.len() > 8 {
        return Err(Error::InvalidWord(text.to_string()));
    }
    u32::from_str_radix(&digits, 16).map_err(|_| Error::InvalidWord(text.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_word() {
        assert_eq!(parse_word("0xf8010083").unwrap(), 0xF801_0083);
        assert_eq!(parse_word("F801_0083").unwrap(), 0xF801_0083);
        assert_eq!(parse_word("13").unwrap(), 0x13);
        assert!(matches!(parse_word("0x"), Err(Error::InvalidWord(_))));
        assert!(matches!(parse_word("0x123456789"), Err(Error::InvalidWord(_))));
        assert!(matches!(parse_word("addi"), Err(Error::InvalidWord(_))));
    }

    #[test]
    fn test_analyze_all_preserves_order() {
        let code = [0xF801_0083, 0xF801_0093, 0x0000_0073];
        let reports = analyze_all::<Rv64>(&code);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[1].address, 4);
        assert_eq!(reports[1].raw, 0xF801_0093);
        assert!(reports[2].outcome.is_err());
    }

    #[test]
    fn test_read_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0x83, 0x00, 0x01, 0xF8, 0x93, 0x00, 0x01, 0xF8])
            .unwrap();
        drop(file);
        assert_eq!(read_code(&path).unwrap(), vec![0xF801_0083, 0xF801_0093]);

        let unaligned = dir.path().join("unaligned.bin");
        std::fs::write(&unaligned, [0x13, 0x00]).unwrap();
        assert!(matches!(read_code(&unaligned), Err(Error::UnalignedCode(2))));

        assert!(matches!(
            read_code(&dir.path().join("missing.bin")),
            Err(Error::Io(_))
        ));
    }
}
