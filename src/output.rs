//! Coloured terminal output for the one-shot commands.
//!
//! Everything printed here goes through [`OutputFormatter`] so the styling
//! stays consistent across commands.

use crate::extract::ExtractReport;
use crate::listing::ListReport;
use crate::organize::OrganizeReport;
use crate::summary::Failure;
use colored::*;
use std::collections::BTreeMap;

/// Prints styled messages and summaries.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use filextract::output::OutputFormatter;
    /// OutputFormatter::success("Extraction complete");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    pub fn extract_summary(report: &ExtractReport) {
        let summary = &report.summary;
        Self::info(&format!(
            "{} {} -> {}",
            capitalize(report.mode.as_str()),
            report.source.display(),
            report.target.display()
        ));
        Self::header("SUMMARY");
        println!("  Processed: {}", summary.processed.to_string().green());
        println!("  Conflicts: {}", summary.conflicts.to_string().yellow());
        println!("  Errors:    {}", error_count(summary.errors));
        Self::failures(&summary.failures);
        Self::finish(summary.errors, "Extraction complete");
    }

    pub fn list_summary(report: &ListReport) {
        let inventory = &report.inventory;
        Self::info(&format!("Contents of {}", report.directory.display()));

        let mut records: Vec<_> = inventory.records.iter().collect();
        records.sort_by(|a, b| a.path.cmp(&b.path));
        for record in records {
            let path = record.path.display().to_string();
            if record.is_directory {
                println!("  {}/", path.blue().bold());
            } else {
                println!("  {:<50} {:>12}", path, record.size);
            }
        }

        Self::header("SUMMARY");
        println!("  Entries: {}", inventory.records.len().to_string().green());
        if inventory.errors > 0 {
            println!("  Errors:  {}", error_count(inventory.errors));
        }
        Self::failures(&inventory.failures);
    }

    pub fn organize_summary(report: &OrganizeReport) {
        let summary = &report.summary;
        Self::info(&format!(
            "Organizing {} by {} into {}",
            report.source.display(),
            report.criteria,
            report.target.display()
        ));
        Self::summary_table(&summary.categories, summary.organized);
        if summary.errors > 0 {
            println!("  Errors: {}", error_count(summary.errors));
        }
        Self::failures(&summary.failures);
        Self::finish(summary.errors, "Organization complete");
    }

    /// Prints a table of file counts per category.
    ///
    /// ```no_run
    /// use filextract::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let counts = BTreeMap::from([("txt".to_string(), 15), ("jpg".to_string(), 8)]);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let width = category_counts
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));
        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = width
        );
    }

    fn failures(failures: &[Failure]) {
        for failure in failures {
            eprintln!("    - {}: {}", failure.path.display(), failure.error);
        }
    }

    fn finish(errors: usize, message: &str) {
        if errors == 0 {
            Self::success(message);
        } else {
            Self::warning(&format!("{} with {} errors", message, errors));
        }
    }
}

fn error_count(errors: usize) -> ColoredString {
    if errors == 0 {
        errors.to_string().normal()
    } else {
        errors.to_string().red()
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
