//! sqlprompt: natural-language-to-SQL prompt composition from SQLite
//!
//! Turns a SQLite database's schema and randomized sample contents, plus
//! operator-written CSV column descriptions, into text prompts for
//! text-to-SQL tasks. The pipeline opens the database read-only, introspects
//! tables and columns, extracts a handful of presentable sample values per
//! column, matches descriptions by normalized column name, and fills one of
//! the fixed prompt templates.

pub mod annotate;
pub mod chain;
pub mod cli;
pub mod compose;
pub mod config;
pub mod descriptions;
pub mod error;
pub mod introspect;
pub mod normalize;
pub mod pipeline;
pub mod samples;
pub mod templates;
pub mod ui;

pub use config::Config;
pub use descriptions::{load_descriptions, DescriptionMap};
pub use error::{PromptError, PromptResult};
pub use normalize::normalize;
pub use pipeline::{run_analysis, AnalysisOptions, AnalysisTemplate};
