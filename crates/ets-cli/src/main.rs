// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `ets`: lex, parse, check, lint and batch-validate ETS sources.

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "ets", version, about = "Front end for ETS declarative UI sources")]
pub struct Cli {
    /// More log output (-v debug, -vv trace). ETS_LOG or RUST_LOG override.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Tokenize a file and print the tokens.
    Lex { file: PathBuf },
    /// Parse a file and print the tree.
    Parse {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
    },
    /// Report syntax diagnostics for a file.
    Check {
        file: PathBuf,
        /// Treat missing `;` as failure.
        #[arg(long)]
        strict: bool,
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
    },
    /// Run lint rules over a file.
    Lint {
        file: PathBuf,
        /// Only run rules matching these patterns (e.g. `decorator/*`).
        #[arg(long = "rule")]
        rules: Vec<String>,
        /// Skip rules matching these patterns.
        #[arg(long = "exclude")]
        excludes: Vec<String>,
        /// Accept project decorators in addition to the framework ones.
        #[arg(long = "decorator")]
        decorators: Vec<String>,
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
    },
    /// Validate every `.ets` file under a directory.
    Validate {
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Treat missing `;` as failure.
        #[arg(long)]
        strict: bool,
        /// Print the run as JSON.
        #[arg(long)]
        json: bool,
        /// Do not write a report or update the history.
        #[arg(long)]
        no_report: bool,
        /// Write the rendered run to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Insert common missing `;` before parsing. Files are not modified.
        #[arg(long)]
        preprocess_asi: bool,
        #[arg(long, default_value = "reports")]
        reports_dir: PathBuf,
        /// Worker threads (0 = one per core).
        #[arg(short, long, default_value_t = 0)]
        jobs: usize,
    },
    /// Show the pass-rate trend of recorded validation runs.
    History {
        #[arg(long, default_value = "reports")]
        reports_dir: PathBuf,
    },
    /// Explain an error code.
    Explain { code: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Human,
    Json,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_env("ETS_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    output::init();
    init_tracing(cli.verbose);
    tracing::debug!(command = ?cli.command, "starting");

    match cli.command {
        Command::Lex { file } => commands::inspect::cmd_lex(&file),
        Command::Parse { file, format } => commands::inspect::cmd_parse(&file, format),
        Command::Check { file, strict, format } => commands::check::cmd_check(&file, strict, format),
        Command::Lint { file, rules, excludes, decorators, format } => {
            let opts = ets_lint::LintOpts { rules, excludes, extra_decorators: decorators };
            commands::check::cmd_lint(&file, &opts, format)
        }
        Command::Validate { dir, strict, json, no_report, output, preprocess_asi, reports_dir, jobs } => {
            let opts = ets_validate::ValidateOptions { strict, json_output: json, preprocess_asi, jobs };
            let persist = commands::validate::Persist { no_report, output, reports_dir };
            commands::validate::cmd_validate(&dir, &opts, &persist, cli.verbose > 0)
        }
        Command::History { reports_dir } => commands::validate::cmd_history(&reports_dir),
        Command::Explain { code } => commands::explain::cmd_explain(&code),
    }
}
