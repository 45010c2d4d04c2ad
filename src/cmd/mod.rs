mod rewrite;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "post-rewriter")]
#[command(version)]
#[command(
    about = "Rewrite legacy post INSERT ... SELECT dumps into INSERT IGNORE statements",
    long_about = None
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub rewrite: RewriteArgs,
}

/// Options for the default rewrite run. With none given, the fixed default
/// paths are used.
#[derive(Args, Debug, Default)]
pub struct RewriteArgs {
    /// Input SQL file [default: cleaned_sql_files/04_posts_cleaned.sql]
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output SQL file, overwritten if present
    /// [default: cleaned_sql_files/04_posts_cleaned_final.sql]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// YAML config file (table names, sentinel, extra substitution rules)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Table whose INSERT statements are rewritten [default: xf_post]
    #[arg(long)]
    pub table: Option<String>,

    /// Value substituted for unresolved lookup subqueries [default: 9999]
    #[arg(long, allow_negative_numbers = true)]
    pub sentinel: Option<i64>,

    /// Show an animated progress bar instead of plain progress lines
    #[arg(short, long)]
    pub progress: bool,

    /// Preview without writing the output file (dry run)
    #[arg(long)]
    pub dry_run: bool,

    /// Print statistics as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Completions { shell }) => {
            generate(
                shell,
                &mut Cli::command(),
                "post-rewriter",
                &mut io::stdout(),
            );
            Ok(())
        }
        None => rewrite::run(cli.rewrite),
    }
}
