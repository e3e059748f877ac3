//! Command-line interface

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sqlprompt - compose natural-language-to-SQL prompts from SQLite schemas
#[derive(Parser, Debug)]
#[command(name = "sqlprompt")]
#[command(version, long_about = None)]
#[command(about = "Compose text-to-SQL prompts from a SQLite schema, sample data and CSV column descriptions")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a database and compose a first-stage prompt
    Analyze {
        /// Path to the SQLite database file
        #[arg(long, value_name = "PATH")]
        database: Option<PathBuf>,

        /// Directory of CSV column-description files
        #[arg(long, value_name = "DIR")]
        descriptions: Option<PathBuf>,

        /// Prompt template to fill
        #[arg(long, value_enum)]
        template: Option<TemplateArg>,

        /// Deduplicate sample values (with a widening pass)
        #[arg(long)]
        distinct: bool,

        /// Samples per column
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Question(s) for the prompt; prompted interactively when absent
        #[arg(short, long, action = clap::ArgAction::Append)]
        question: Vec<String>,

        /// Write the document to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Compose the second-stage SQL-generation prompt from an
    /// essential-columns analysis
    Chain {
        /// Path to the SQLite database file
        #[arg(long, value_name = "PATH")]
        database: Option<PathBuf>,

        /// File holding the stage-one analysis (table.column per line);
        /// pasted interactively when absent
        #[arg(long, value_name = "PATH")]
        analysis: Option<PathBuf>,

        /// The original question
        #[arg(short, long)]
        question: Option<String>,

        /// Write the document to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Append CSV descriptions as inline comments to a schema dump file,
    /// in place
    Annotate {
        /// Path to the plain-text schema dump
        #[arg(long, value_name = "PATH")]
        schema: Option<PathBuf>,

        /// Directory of CSV column-description files
        #[arg(long, value_name = "DIR")]
        descriptions: Option<PathBuf>,
    },
}

/// Template selection on the command line
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TemplateArg {
    /// Chain-of-thought with one worked example, two questions
    CotFewShot,
    /// Zero-shot, one question
    ZeroShot,
}
