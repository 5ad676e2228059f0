//! Per-instruction analysis reports.

use std::fmt::Write as _;

use rvia_analysis::{DestSourcePair, RegImmPair, RiscvInstrInfo, TargetInstrInfo};
use rvia_isa::Xlen;
use rvia_mi::{DecodeError, decode_word};

use crate::cli::OutputFormat;

/// Owned copy of a memory operand query result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemFact {
    pub bases: Vec<String>,
    pub offset: i64,
    pub offset_is_scalable: bool,
    pub width: u64,
}

/// Everything the analyses concluded about one decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facts {
    pub asm: String,
    pub add_imm: Option<RegImmPair>,
    pub mem: Option<MemFact>,
    pub copy: Option<DestSourcePair>,
}

impl Facts {
    const fn is_empty(&self) -> bool {
        self.add_imm.is_none() && self.mem.is_none() && self.copy.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub address: u64,
    pub raw: u32,
    pub outcome: Result<Facts, DecodeError>,
}

/// Decode `raw` and run every query on it.
pub fn analyze_word<X: Xlen>(tii: &RiscvInstrInfo<X>, address: u64, raw: u32) -> Report {
    let outcome = decode_word::<X>(raw).map(|mi| {
        let add_imm = mi
            .defined_reg()
            .and_then(|rd| tii.is_add_immediate(&mi, rd));
        let mem = tii
            .get_mem_operands_with_offset_width(&mi)
            .map(|info| MemFact {
                bases: info.base_ops.iter().map(ToString::to_string).collect(),
                offset: info.offset,
                offset_is_scalable: info.offset_is_scalable,
                width: info.width,
            });
        Facts {
            asm: mi.to_string(),
            add_imm,
            mem,
            copy: tii.is_copy_instr(&mi),
        }
    });
    Report {
        address,
        raw,
        outcome,
    }
}

/// Render one report as a single line.
pub fn render(report: &Report, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Kv => render_kv(report),
    }
}

fn render_text(report: &Report) -> String {
    let mut line = format!("{:08x}: {:08x}  ", report.address, report.raw);
    let facts = match &report.outcome {
        Ok(facts) => facts,
        Err(err) => {
            let _ = write!(line, "<{err}>");
            return line;
        }
    };

    let _ = write!(line, "{:<28}", facts.asm);
    if facts.is_empty() {
        line.push_str(" -");
        return line;
    }
    if let Some(RegImmPair { reg, imm }) = facts.add_imm {
        let _ = write!(line, " add-imm(src={reg}, imm={imm})");
    }
    if let Some(mem) = &facts.mem {
        let _ = write!(
            line,
            " mem(base={}, offset={}, width={})",
            mem.bases.join("+"),
            mem.offset,
            mem.width
        );
    }
    if let Some(DestSourcePair { dest, source }) = facts.copy {
        let _ = write!(line, " copy(dst={dest}, src={source})");
    }
    line
}

fn render_kv(report: &Report) -> String {
    let mut line = format!("addr={:#x} raw={:#010x}", report.address, report.raw);
    match &report.outcome {
        Err(err) => {
            let _ = write!(line, " error=\"{err}\"");
        }
        Ok(facts) => {
            let _ = write!(line, " asm=\"{}\"", facts.asm);
            if let Some(RegImmPair { reg, imm }) = facts.add_imm {
                let _ = write!(line, " add_imm_src={reg} add_imm={imm}");
            }
            if let Some(mem) = &facts.mem {
                let _ = write!(
                    line,
                    " mem_base={} mem_offset={} mem_scalable={} mem_width={}",
                    mem.bases.join(","),
                    mem.offset,
                    mem.offset_is_scalable,
                    mem.width
                );
            }
            if let Some(DestSourcePair { dest, source }) = facts.copy {
                let _ = write!(line, " copy_dst={dest} copy_src={source}");
            }
        }
    }
    line
}
