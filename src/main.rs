use clap::Parser;
use sqlprompt::annotate::annotate_schema_file;
use sqlprompt::chain::run_chain;
use sqlprompt::cli::{Args, Command, TemplateArg};
use sqlprompt::descriptions::load_descriptions;
use sqlprompt::pipeline::{run_analysis, AnalysisOptions, AnalysisTemplate};
use sqlprompt::ui::{ConsoleInput, ConsoleOutput, InputProvider, OutputSink, OutputTarget};
use sqlprompt::{Config, PromptError, PromptResult};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let config = Config::load();
    let mut input = ConsoleInput;
    let mut output = ConsoleOutput;

    if let Err(e) = run(args, &config, &mut input, &mut output).await {
        eprintln!("❌ {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(
    args: Args,
    config: &Config,
    input: &mut dyn InputProvider,
    output: &mut dyn OutputSink,
) -> PromptResult<()> {
    match args.command {
        Command::Analyze {
            database,
            descriptions,
            template,
            distinct,
            limit,
            question,
            output: output_path,
        } => {
            let db_path = resolve_path(database, "SQLite database path:", input)?;
            let descriptions_dir =
                resolve_path(descriptions, "CSV descriptions directory:", input)?;
            let description_map = load_descriptions(&descriptions_dir);

            let template = match template {
                Some(TemplateArg::CotFewShot) => AnalysisTemplate::CotFewShot,
                Some(TemplateArg::ZeroShot) => AnalysisTemplate::ZeroShot,
                None if config.default_template == "zero-shot" => AnalysisTemplate::ZeroShot,
                None => AnalysisTemplate::CotFewShot,
            };

            let mut questions = question;
            let wanted = match template {
                AnalysisTemplate::CotFewShot => 2,
                AnalysisTemplate::ZeroShot => 1,
            };
            for index in questions.len()..wanted {
                questions.push(input.read_line(&format!("Question {}:", index + 1))?);
            }

            let options = AnalysisOptions {
                template,
                sample_limit: limit.unwrap_or(config.sample_limit),
                distinct: distinct || config.distinct_samples,
                questions,
            };
            let document = run_analysis(&db_path, &description_map, &options).await?;
            output.write_document(&target(output_path), &document)
        }

        Command::Chain {
            database,
            analysis,
            question,
            output: output_path,
        } => {
            let db_path = resolve_path(database, "SQLite database path:", input)?;
            let analysis_text = match analysis {
                Some(path) => std::fs::read_to_string(&path)?,
                None => read_column_listing(input)?,
            };
            let question = match question {
                Some(q) => q,
                None => input.read_line("Original question:")?,
            };

            let document = run_chain(
                &db_path,
                &analysis_text,
                &question,
                config.chain_value_cap,
            )
            .await?;
            output.write_document(&target(output_path), &document)
        }

        Command::Annotate {
            schema,
            descriptions,
        } => {
            let schema_path = resolve_path(schema, "Schema dump file:", input)?;
            let descriptions_dir =
                resolve_path(descriptions, "CSV descriptions directory:", input)?;
            let description_map = load_descriptions(&descriptions_dir);
            let count = annotate_schema_file(&schema_path, &description_map)?;
            println!("✅ Annotated {count} column lines in place.");
            Ok(())
        }
    }
}

fn resolve_path(
    value: Option<PathBuf>,
    prompt: &str,
    input: &mut dyn InputProvider,
) -> PromptResult<PathBuf> {
    match value {
        Some(path) => Ok(path),
        None => input.read_path(prompt),
    }
}

/// Read the essential-columns listing line by line; an empty line ends it.
fn read_column_listing(input: &mut dyn InputProvider) -> PromptResult<String> {
    println!("Paste the stage-one analysis (table.column per line, empty line to finish):");
    let mut lines = Vec::new();
    loop {
        match input.read_line("") {
            Ok(line) if line.trim().is_empty() => break,
            Ok(line) => lines.push(line),
            Err(PromptError::UserCancelled) => break,
            Err(e) => return Err(e),
        }
    }
    Ok(lines.join("\n"))
}

fn target(path: Option<PathBuf>) -> OutputTarget {
    match path {
        Some(path) => OutputTarget::File(path),
        None => OutputTarget::Stdout,
    }
}
