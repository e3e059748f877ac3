//! End-to-end analysis pipeline
//!
//! Wires the introspector, sample extractor, description map and composer
//! into one run: open read-only, snapshot the schema, sample every column,
//! merge descriptions by normalized name, fill the chosen template. The
//! result is a finished document; printing or saving it is the caller's
//! concern.

use crate::compose::{annotation_block, schema_dump, ColumnAnnotation, TableAnnotations};
use crate::descriptions::DescriptionMap;
use crate::error::PromptResult;
use crate::introspect::SchemaReader;
use crate::normalize::normalize;
use crate::samples::SampleExtractor;
use crate::templates::{COT_FEW_SHOT_V1, ZERO_SHOT_V1};
use std::path::Path;
use tracing::info;

/// Which analysis template to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisTemplate {
    /// Chain-of-thought with a worked example; takes two questions.
    CotFewShot,
    /// Zero-shot; takes one question.
    ZeroShot,
}

/// Tuning for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub template: AnalysisTemplate,
    /// Samples per column.
    pub sample_limit: usize,
    /// Deduplicate samples by formatted value (with a widening pass).
    pub distinct: bool,
    /// One question for zero-shot, two for the few-shot template. A missing
    /// question renders as an empty slot.
    pub questions: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            template: AnalysisTemplate::CotFewShot,
            sample_limit: 2,
            distinct: false,
            questions: Vec::new(),
        }
    }
}

/// Run the full analysis against `db_path` and return the composed document.
pub async fn run_analysis(
    db_path: &Path,
    descriptions: &DescriptionMap,
    options: &AnalysisOptions,
) -> PromptResult<String> {
    let reader = SchemaReader::open(db_path).await?;
    let result = analyze(&reader, descriptions, options).await;
    reader.close().await;
    result
}

async fn analyze(
    reader: &SchemaReader,
    descriptions: &DescriptionMap,
    options: &AnalysisOptions,
) -> PromptResult<String> {
    let tables = reader.snapshot().await?;
    info!("[run_analysis] Analyzing {} tables", tables.len());

    let extractor = SampleExtractor::new(reader.pool(), options.sample_limit);

    let mut annotated_tables = Vec::with_capacity(tables.len());
    for table in &tables {
        let mut columns = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            let samples = if options.distinct {
                extractor.distinct_samples(&table.name, &column.name).await
            } else {
                extractor.random_samples(&table.name, &column.name).await
            };
            let description = descriptions.get(&normalize(&column.name)).cloned();
            columns.push(ColumnAnnotation {
                table: table.name.clone(),
                column: column.name.clone(),
                samples,
                description,
            });
        }
        annotated_tables.push(TableAnnotations {
            table: table.name.clone(),
            columns,
        });
    }

    let schema = schema_dump(&tables);
    let annotations = annotation_block(&annotated_tables);
    let question = |index: usize| options.questions.get(index).map(String::as_str).unwrap_or("");

    let document = match options.template {
        AnalysisTemplate::CotFewShot => COT_FEW_SHOT_V1.render(&[
            ("schema", &schema),
            ("annotations", &annotations),
            ("question_one", question(0)),
            ("question_two", question(1)),
        ]),
        AnalysisTemplate::ZeroShot => ZERO_SHOT_V1.render(&[
            ("schema", &schema),
            ("annotations", &annotations),
            ("question", question(0)),
        ]),
    };
    Ok(document)
}
