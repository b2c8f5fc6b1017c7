use crate::{
    models::{StatusItem, StatusReport},
    Error, Result,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }
}

/// A column CSV and Markdown output can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    Repository,
    Identifier,
    Preview,
    Reason,
}

impl StatusField {
    pub const ALL: [StatusField; 4] = [
        StatusField::Repository,
        StatusField::Identifier,
        StatusField::Preview,
        StatusField::Reason,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatusField::Repository => "repository",
            StatusField::Identifier => "identifier",
            StatusField::Preview => "preview",
            StatusField::Reason => "reason",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn value<'a>(&self, item: &'a StatusItem) -> &'a str {
        match self {
            StatusField::Repository => &item.repository,
            StatusField::Identifier => &item.identifier,
            StatusField::Preview => &item.preview,
            StatusField::Reason => &item.reason,
        }
    }

    /// Parse a comma-separated field list like `identifier,preview`
    pub fn parse_list(list: &str) -> Result<Vec<StatusField>> {
        let fields = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                Self::from_name(name).ok_or_else(|| {
                    Error::ConfigError(format!(
                        "Unknown field '{}'. Expected one of: repository, identifier, preview, reason",
                        name
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if fields.is_empty() {
            return Err(Error::ConfigError("Field list is empty".to_string()));
        }

        Ok(fields)
    }
}

/// Exporter for status reports
pub struct Exporter;

impl Exporter {
    /// Export a report to a file, picking the format from the extension
    pub fn export_to_file<P: AsRef<Path>>(
        report: &StatusReport,
        fields: &[StatusField],
        path: P,
    ) -> Result<()> {
        let path = path.as_ref();

        // Detect format from extension
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                Error::ConfigError(
                    "Could not determine export format from extension. Use .json, .csv, or .md"
                        .to_string(),
                )
            })?;

        let content = Self::render(report, fields, format)?;

        let mut file = File::create(path)
            .map_err(|e| Error::ConfigError(format!("Failed to create file: {}", e)))?;

        file.write_all(content.as_bytes())
            .map_err(|e| Error::ConfigError(format!("Failed to write file: {}", e)))?;

        Ok(())
    }

    pub fn render(
        report: &StatusReport,
        fields: &[StatusField],
        format: ExportFormat,
    ) -> Result<String> {
        match format {
            ExportFormat::Json => Self::to_json(report),
            ExportFormat::Csv => Ok(Self::to_csv(report, fields)),
            ExportFormat::Markdown => Ok(Self::to_markdown(report, fields)),
        }
    }

    /// Bucket-keyed JSON object. Field selection doesn't apply here; JSON
    /// consumers get whole items.
    pub fn to_json(report: &StatusReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// One row per item with a leading `bucket` column
    pub fn to_csv(report: &StatusReport, fields: &[StatusField]) -> String {
        let mut output = String::from("bucket");
        for field in fields {
            output.push(',');
            output.push_str(field.name());
        }
        output.push('\n');

        for (bucket, items) in report.buckets() {
            for item in items {
                output.push_str(bucket.key());
                for field in fields {
                    output.push(',');
                    output.push_str(&Self::escape_csv(field.value(item)));
                }
                output.push('\n');
            }
        }

        output
    }

    /// One section per bucket, each a table of the chosen fields
    pub fn to_markdown(report: &StatusReport, fields: &[StatusField]) -> String {
        let mut output = String::new();

        if report.login.is_empty() {
            output.push_str("# GitHub Status\n\n");
        } else {
            output.push_str(&format!("# GitHub Status for @{}\n\n", report.login));
        }

        for (bucket, items) in report.buckets() {
            output.push_str(&format!("## {}\n\n", bucket.title()));

            if items.is_empty() {
                output.push_str("Nothing here ^_^\n\n");
                continue;
            }

            let header: Vec<&str> = fields.iter().map(|f| f.name()).collect();
            output.push_str(&format!("| {} |\n", header.join(" | ")));
            output.push_str(&format!("|{}\n", "---|".repeat(fields.len())));

            for item in items {
                let cells: Vec<String> = fields
                    .iter()
                    .map(|f| Self::escape_markdown(f.value(item)))
                    .collect();
                output.push_str(&format!("| {} |\n", cells.join(" | ")));
            }
            output.push('\n');
        }

        output
    }

    /// Escape CSV special characters
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }

    /// Pipes would split the table cell
    fn escape_markdown(s: &str) -> String {
        s.replace('|', "\\|")
    }
}
