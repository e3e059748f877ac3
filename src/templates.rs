//! Named prompt templates
//!
//! Every emitted document is one of these fixed templates with placeholder
//! substitution; the composer carries no formatting logic of its own beyond
//! filling the placeholders. Templates are versioned so wording changes can
//! ship as new values without touching the pipeline.

/// A fixed prompt template with `{placeholder}` substitution points.
///
/// Placeholders are lowercase (`{schema}`, `{question}`); the uppercase
/// section headers inside the bodies (`{QUESTION}`, `{CURRENT DB SCHEMA}`)
/// are literal text the downstream model is meant to see.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub version: u32,
    pub body: &'static str,
}

impl PromptTemplate {
    /// Substitute each `{key}` token with its value.
    pub fn render(&self, substitutions: &[(&str, &str)]) -> String {
        let mut text = self.body.to_string();
        for (key, value) in substitutions {
            text = text.replace(&format!("{{{key}}}"), value);
        }
        text
    }
}

/// Chain-of-thought template with one worked example from another database.
///
/// Placeholders: `{schema}`, `{annotations}`, `{question_one}`,
/// `{question_two}`.
pub const COT_FEW_SHOT_V1: PromptTemplate = PromptTemplate {
    name: "cot-few-shot",
    version: 1,
    body: r#"You are a SQL expert and your task is to answer the {QUESTIONS} I'm giving you with the correct SQL queries thinking step by step. I'm also giving you the {CURRENT DB SCHEMA}, some {ADDITIONAL INFORMATIONS} about the schema attributes with examples of istances and informations about them, an {EXAMPLE} of a query (belonging to another database) done in the right way with the reasoning steps.

{EXAMPLE}

[EXAMPLE QUESTION]
Among professors with the highest popularity, how many of their
students have research capability of 5?

[STEPS]
**Step 1: Identify the required tables and columns**
--
From the question, we need to find the number of students with
research capability of 5 among professors with the highest
popularity. This implies we need to:
1. Find the highest popularity of professors.
2. Filter professors with the highest popularity.
3. Join the 'ra' table to get the students advised by these
professors.
4. Filter students with research capability of 5.
5. Count the number of students.
Required tables:
* 'prof' (contains professor information)
* 'ra' (maps students to professors)
* 'student' (contains student information)
Required columns:
* 'prof.popularity' (to find the highest popularity)
* 'ra.capability' (to filter students with research capability of
5)
* 'ra.student_id' (to count the number of students)

**Step 2: Find the highest popularity of professors**
--
'''sql
SELECT MAX(popularity) AS max_popularity
FROM prof;
'''
9

**Step 3: Filter professors with the highest popularity**
--
'''sql
SELECT *
FROM prof
WHERE popularity = (SELECT MAX(popularity) FROM prof);
'''

**Step 4: Join the 'ra' table to get the students advised by these
professors**
--
'''sql
SELECT ra.student_id
FROM prof JOIN ra ON prof.prof_id = ra.prof_id
WHERE prof.popularity = (SELECT MAX(popularity) FROM prof);
'''

**Step 5: Filter students with research capability of 5**
--
'''sql
SELECT ra.student_id
FROM prof JOIN ra ON prof.prof_id = ra.prof_id
WHERE prof.popularity = (SELECT MAX(popularity) FROM prof) AND ra.
capability = 5;
'''

**Step 6: Count the number of students**
--
'''sql
SELECT COUNT(ra.student_id) AS num_students
FROM prof JOIN ra ON prof.prof_id = ra.prof_id
WHERE prof.popularity = (SELECT MAX(popularity) FROM prof) AND ra.
capability = 5;
'''
This is the final SQL statement that answers the question.

{CURRENT DB SCHEMA}
{schema}
{ADDITIONAL INFORMATION}
{annotations}
{QUESTIONS}

[QUESTION NUMBER 1]
{question_one}

[QUESTION NUMBER 2]
{question_two}
"#,
};

/// Zero-shot template: schema, annotated samples, then a single question.
///
/// Placeholders: `{schema}`, `{annotations}`, `{question}`.
pub const ZERO_SHOT_V1: PromptTemplate = PromptTemplate {
    name: "zero-shot",
    version: 1,
    body: r#"I'm giving you the {CURRENT DB SCHEMA} with some {ADDITIONAL INFORMATIONS} which are about examples of instances and information about them. Then I give you two {EXAMPLES} of right queries belonging to the same database. Your task is to answer to the {QUESTION} with the correct SQL queries thinking step by step.

{CURRENT DB SCHEMA}
{schema}
{ADDITIONAL INFORMATION}
{annotations}
{EXAMPLES}

{QUESTION}
{question}
"#,
};

/// Stage-one prompt of the two-stage chain: identify essential columns from
/// a commented schema dump.
///
/// Placeholders: `{schema}`, `{question}`.
pub const COLUMN_ANALYSIS_V1: PromptTemplate = PromptTemplate {
    name: "column-analysis",
    version: 1,
    body: r#"*Role*: You are a senior SQL expert trained to analyze databases' schema and data structures.

*Reference*:
You will be provided with:
1. A detailed database schema containing inline comments that provide an **authoritative semantic guidance**.
2. A natural language question related to the database.

*Task*: Your goal is to identify only the **essential columns** required to answer the given question.

*Reasoning Instructions*:
1. Break down the question into **logical components**.
2. Carefully read the **schema** and focus on **inline comments** for guidance.
3. **Map** each question component to specific schema columns.
4. Prioritize columns **directly aligned with comments**.
5. Exclude unnecessary tables or columns.

*Output:*
- Step-by-step reasoning.
- Final essential columns listed in a text block, as: table_name.column_name
(No SQL query or answer generation)

*Rules:*
- **Only** use the schema and comments.
- **No** external assumptions and knowledge.

*Database schema:*
{schema}

*Question:*
{question}"#,
};

/// Stage-two prompt of the chain: write the final SQL from the previous
/// column analysis plus clean sample instances.
///
/// Placeholders: `{analysis}`, `{samples}`, `{question}`.
pub const SQL_GENERATION_V1: PromptTemplate = PromptTemplate {
    name: "sql-generation",
    version: 1,
    body: r#"*Role*: You are a senior SQL expert specialized in writing **highly accurate**, **optimized**, **format-precise** and **schema-faithful** SQL queries.

*Reference*: You will be provided with:
1. Your previous schema analysis identifying the essential tables and columns.
2. Sample data instances for the selected columns (showing actual data **formatting** only, **never semantics**).
3. A natural language question related to the database.

*Task*: Write the most accurate SQL query that answers the question, ensuring:
  - **Full alignment** with the schema.
  - **Careful and accurate handling** of data formats **strictly as observed in the sample data**.
  - **Strict adherence** to SQLite syntax, functions, and conventions.

*Reasoning Step Instructions*:
1. Read the question again to remember exactly what information must be retrieved.
2. Identify only needed columns from the schema analysis.
3. **Meticulously examine** the provided sample data, **character by character** - do **not guess** or assume structure.
4. **Explicitly describe** the observed structure and formatting of the data in each relevant column.
5. Base all logic **only** on the **explicitly described sample data formats**.
6. Use only **SQLite-supported syntax and functions** that are appropriate for the observed data formats.
7. Describe your reasoning step-by-step and output the complete and precise SQL query.

*Output:*
  - Step-by-step reasoning.
  - The final and correct SQL query inside a proper SQL code block.

*Important notes*:
  - Treat every **sample value as definitive evidence**: do not rely at all on assumptions about common data formats or outside knowledge.
  - **Never assume standard formats** (e.g., ISO dates, numeric strings) without explicit validation from the sample data.
  - Avoid SQLite functions that don't directly match the sample format unless a clear transformation (based on sample structure) is shown.
  - Base any format **parsing or filtering logic** **exclusively** on the actual structure of the sample values you have described.
  - Sample data is provided **only to help you understand the structure and format of the fields**, not as source data for filtering.
  - **Do not use the sample values directly in the query** unless they are explicitly required by the question.

---

*Schema Analysis:*
{analysis}

---

*Sample Data:*
{samples}

---

*Question:*
{question}"#,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let template = PromptTemplate {
            name: "test",
            version: 1,
            body: "{QUESTION}\n{question}",
        };
        let rendered = template.render(&[("question", "How many orders?")]);
        assert_eq!(rendered, "{QUESTION}\nHow many orders?");
    }

    #[test]
    fn test_section_headers_survive_rendering() {
        let rendered = ZERO_SHOT_V1.render(&[
            ("schema", "CREATE TABLE t (id INTEGER);"),
            ("annotations", "t.id: 1"),
            ("question", "count rows"),
        ]);
        assert!(rendered.contains("{CURRENT DB SCHEMA}"));
        assert!(rendered.contains("{ADDITIONAL INFORMATION}"));
        assert!(rendered.contains("CREATE TABLE t (id INTEGER);"));
        assert!(rendered.contains("count rows"));
        assert!(!rendered.contains("{schema}"));
    }

    #[test]
    fn test_all_templates_are_versioned() {
        for template in [
            COT_FEW_SHOT_V1,
            ZERO_SHOT_V1,
            COLUMN_ANALYSIS_V1,
            SQL_GENERATION_V1,
        ] {
            assert!(!template.name.is_empty());
            assert_eq!(template.version, 1);
        }
    }
}
