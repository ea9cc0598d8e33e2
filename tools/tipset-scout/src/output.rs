//! Rendering collected data to a writer.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use tipset_collector::Block;

/// How blocks are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One pretty-printed JSON array
    Json,
    /// One JSON document per line
    Ndjson,
    /// One line per tipset, newest first
    Summary,
}

/// Print `blocks` in `format`.
pub fn write_blocks<W: Write>(out: &mut W, blocks: &[Block], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, &blocks),
        OutputFormat::Ndjson => blocks.iter().try_for_each(|b| write_line(out, b)),
        OutputFormat::Summary => write_summary(out, blocks),
    }
}

/// Pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

/// Compact JSON on one line.
pub fn write_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)
}

fn write_summary<W: Write>(out: &mut W, blocks: &[Block]) -> io::Result<()> {
    let mut rows: Vec<&Block> = blocks.iter().collect();
    rows.sort_by(|a, b| {
        b.height
            .cmp(&a.height)
            .then_with(|| a.tipset_hash.cmp(&b.tipset_hash))
    });

    writeln!(out, "{:>10}  {:<64}  {:<12}  {:>8}", "HEIGHT", "TIPSET", "MINER", "MESSAGES")?;
    for block in rows {
        writeln!(
            out,
            "{:>10}  {:<64}  {:<12}  {:>8}",
            block.height,
            block.tipset_hash,
            block.miner,
            block.message_count()
        )?;
    }
    Ok(())
}
