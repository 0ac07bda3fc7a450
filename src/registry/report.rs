use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde_json::Value;

use super::{validate, MetadataError, MetadataValidationError};

const ROOT_SECTION: &str = "(root)";

/// Outcome of validating one metadata document, grouped by top-level section
#[derive(Debug)]
pub struct ValidationReport {
    /// Where the document came from (file path or a label)
    pub source: String,
    /// Top-level sections declared by the schema, in schema order
    pub sections: Vec<String>,
    /// Every violation found
    pub errors: Vec<MetadataValidationError>,
}

impl ValidationReport {
    /// Validate `document` against `schema` and collect the result.
    pub fn build(
        source: impl Into<String>,
        document: &Value,
        schema: &Value,
    ) -> Result<Self, MetadataError> {
        let errors = validate(document, schema)?;
        let sections = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default();
        Ok(Self {
            source: source.into(),
            sections,
            errors,
        })
    }

    /// True when the document has no violations
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Violations located under a top-level section
    pub fn errors_in<'a>(
        &'a self,
        section: &'a str,
    ) -> impl Iterator<Item = &'a MetadataValidationError> + 'a {
        self.errors.iter().filter(move |e| section_of(&e.path) == section)
    }

    fn rows(&self) -> Vec<(&str, Vec<&MetadataValidationError>)> {
        let mut rows: Vec<(&str, Vec<&MetadataValidationError>)> = Vec::new();
        if self.errors_in(ROOT_SECTION).next().is_some() {
            rows.push((ROOT_SECTION, self.errors_in(ROOT_SECTION).collect()));
        }
        for section in &self.sections {
            rows.push((section.as_str(), self.errors_in(section).collect()));
        }
        rows
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Metadata Validation Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("==========================").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("Source").bold(), self.source));

            let rows = self.rows();
            for (section, errors) in &rows {
                if errors.is_empty() {
                    output.push_str(&format!("[{}] {}\n", OK, style(section).green()));
                    continue;
                }
                output.push_str(&format!(
                    "[{}] {} - {}: {} error(s)\n",
                    FAIL,
                    style(section).red(),
                    style("FAILED").red().bold(),
                    errors.len()
                ));
                for error in errors {
                    let path = style(&error.path).dim();
                    output.push_str(&format!("    {}: {}\n", path, error.message));
                }
            }

            let failed = rows.iter().filter(|(_, e)| !e.is_empty()).count();
            output.push('\n');
            output.push_str(&format!(
                "{}: {} passed, {} failed\n",
                style("Summary").bold(),
                style(rows.len() - failed).green(),
                style(failed).red()
            ));
            output.push('\n');
            if self.is_valid() {
                output.push_str(&format!("{}\n", style("Validation PASSED").green().bold()));
            } else {
                output.push_str(&format!("{}\n", style("Validation FAILED").red().bold()));
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Metadata Validation Report")?;
        writeln!(f, "==========================")?;
        writeln!(f, "Source: {}", self.source)?;
        writeln!(f)?;

        let rows = self.rows();
        for (section, errors) in &rows {
            if errors.is_empty() {
                writeln!(f, "[✓] {}", section)?;
                continue;
            }
            writeln!(f, "[✗] {} - FAILED: {} error(s)", section, errors.len())?;
            for error in errors {
                writeln!(f, "    {}: {}", error.path, error.message)?;
            }
        }

        let failed = rows.iter().filter(|(_, e)| !e.is_empty()).count();
        writeln!(f)?;
        writeln!(f, "Summary: {} passed, {} failed", rows.len() - failed, failed)?;
        writeln!(f)?;
        if self.is_valid() {
            writeln!(f, "Validation PASSED")
        } else {
            writeln!(f, "Validation FAILED")
        }
    }
}

/// Top-level key a `$.a.b[0]` path points into.
fn section_of(path: &str) -> &str {
    match path.strip_prefix("$.") {
        Some(rest) => rest.split(['.', '[']).next().unwrap_or(rest),
        None => ROOT_SECTION,
    }
}
