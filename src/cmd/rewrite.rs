//! CLI handler for the rewrite run.

use super::RewriteArgs;
use crate::config::RewriteConfig;
use crate::pipeline::{self, RewriteStats};
use crate::progress::ProgressMode;

pub fn run(args: RewriteArgs) -> anyhow::Result<()> {
    let progress = if args.json {
        ProgressMode::Hidden
    } else if args.progress {
        ProgressMode::Bar
    } else {
        ProgressMode::Lines
    };

    let config = RewriteConfig::builder()
        .input(args.input)
        .output(args.output)
        .config_file(args.config)
        .table(args.table)
        .sentinel(args.sentinel)
        .progress(progress)
        .dry_run(args.dry_run)
        .build()?;

    if !args.json {
        eprintln!("Processing {}...", config.input.display());
    }

    let stats = pipeline::run(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }

    Ok(())
}

fn print_stats(stats: &RewriteStats) {
    if stats.orphan_lines > 0 {
        eprintln!(
            "Warning: {} line(s) outside any INSERT statement were ignored",
            stats.orphan_lines
        );
    }

    for skipped in &stats.skipped {
        eprintln!(
            "Warning: Could not process statement {}: {}",
            skipped.index, skipped.reason
        );
        if let Some(ref preview) = skipped.preview {
            eprintln!("  Problematic statement: {}", preview);
        }
    }

    eprintln!(
        "Successfully processed {} statements",
        stats.statements_rewritten
    );

    match stats.output {
        Some(ref path) => eprintln!("Output written to {}", path.display()),
        None => eprintln!("(Dry run - no output written)"),
    }
}
