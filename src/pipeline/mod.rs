//! Rewrite pipeline: read the dump, segment it, rewrite every statement and
//! write the result.
//!
//! Statements that cannot be rewritten are left out of the output and
//! reported in [`RewriteStats::skipped`]; they never fail the run.

use crate::config::RewriteConfig;
use crate::progress::StatementProgress;
use crate::rewriter::{RewriteWarning, StatementRewriter};
use crate::segmenter::{Segmented, Segmenter};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Skipped statements that keep a preview of their text
pub const MAX_PREVIEWS: usize = 3;

/// Characters kept in a statement preview
pub const PREVIEW_LEN: usize = 300;

/// Statistics from a rewrite run
#[derive(Debug, Default, Serialize)]
pub struct RewriteStats {
    /// INSERT statements found by the segmenter
    pub statements_found: usize,
    /// Statements written to the output
    pub statements_rewritten: usize,
    /// Statements left out
    pub statements_skipped: usize,
    /// Lines outside any statement
    pub orphan_lines: usize,
    /// Details for every skipped statement
    pub skipped: Vec<SkippedStatement>,
    /// Output file (None on dry runs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// A statement that could not be rewritten
#[derive(Debug, Clone, Serialize)]
pub struct SkippedStatement {
    /// 1-based position among the segmented statements
    pub index: usize,
    pub reason: RewriteWarning,
    /// Truncated statement text, only kept for the first few skips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Rewrite an in-memory document.
///
/// Returns the rewritten statements in input order together with the run
/// statistics.
pub fn rewrite_document(text: &str, rewriter: &StatementRewriter) -> (Vec<String>, RewriteStats) {
    let segmented = Segmenter::new(rewriter.table()).segment(text);
    let progress = StatementProgress::hidden(segmented.statements.len() as u64);
    rewrite_segmented(&segmented, rewriter, &progress)
}

fn rewrite_segmented(
    segmented: &Segmented,
    rewriter: &StatementRewriter,
    progress: &StatementProgress,
) -> (Vec<String>, RewriteStats) {
    let mut stats = RewriteStats {
        statements_found: segmented.statements.len(),
        orphan_lines: segmented.orphan_lines,
        ..Default::default()
    };
    let mut output = Vec::with_capacity(segmented.statements.len());

    for (i, statement) in segmented.statements.iter().enumerate() {
        progress.observe(i as u64);

        match rewriter.rewrite(statement) {
            Ok(rewritten) => {
                output.push(rewritten);
                stats.statements_rewritten += 1;
            }
            Err(reason) => {
                let preview = (stats.skipped.len() < MAX_PREVIEWS).then(|| statement_preview(statement));
                stats.skipped.push(SkippedStatement {
                    index: i + 1,
                    reason,
                    preview,
                });
                stats.statements_skipped += 1;
            }
        }
    }

    progress.finish(stats.statements_rewritten as u64);
    (output, stats)
}

fn statement_preview(statement: &str) -> String {
    let mut chars = statement.chars();
    let head: String = chars.by_ref().take(PREVIEW_LEN).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Run a full rewrite from `config.input` to `config.output`
pub fn run(config: &RewriteConfig) -> anyhow::Result<RewriteStats> {
    if !config.input.exists() {
        anyhow::bail!("Input file {} not found", config.input.display());
    }

    let rewriter = StatementRewriter::from_config(config)?;
    let content = fs::read_to_string(&config.input)?;

    let segmented = Segmenter::new(rewriter.table()).segment(&content);
    let progress = StatementProgress::new(segmented.statements.len() as u64, config.progress);
    progress.start();
    let (statements, mut stats) = rewrite_segmented(&segmented, &rewriter, &progress);

    if !config.dry_run {
        write_output(config, &statements)?;
        stats.output = Some(config.output.clone());
    }

    Ok(stats)
}

fn write_output(config: &RewriteConfig, statements: &[String]) -> anyhow::Result<()> {
    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::with_capacity(256 * 1024, File::create(&config.output)?);
    write_header(&mut writer, config)?;
    for statement in statements {
        writeln!(writer, "{}", statement)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the two-line header comment followed by a blank line
fn write_header<W: Write>(writer: &mut W, config: &RewriteConfig) -> std::io::Result<()> {
    writeln!(writer, "-- {}", config.header)?;
    writeln!(
        writer,
        "-- Generated from {} on {}",
        config.input.display(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(writer)
}
