//! Output formatting for spartan
//!
//! Supports text (colored terminal), unified diff and JSON output formats.

use colored::*;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use spartan_engine::Summary as RunSummary;
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Diff,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "diff" => Some(OutputFormat::Diff),
            _ => None,
        }
    }
}

/// One committed edit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditInfo {
    pub tipper: String,
    pub pass: usize,
    /// Arena index of the edited node
    pub node: usize,
    pub message: String,
}

/// Result of processing a single document
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<EditInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn success(path: &Path, edits: Vec<EditInfo>) -> Self {
        Self {
            path: path.display().to_string(),
            edits,
            error: None,
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            edits: Vec::new(),
            error: Some(error),
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_with_changes: usize,
    pub total_edits: usize,
    pub errors: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunSummary>,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    results: Vec<FileResult>,
    summary: Summary,
    run: Option<RunSummary>,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            results: Vec::new(),
            summary: Summary::default(),
            run: None,
        }
    }

    /// Report a document with changes (in check mode - showing what would change)
    pub fn report_check(&mut self, path: &Path, edits: Vec<EditInfo>, old_source: &str, new_source: &str) {
        if edits.is_empty() {
            self.report_skipped(path);
            return;
        }

        self.summary.files_processed += 1;
        self.summary.files_with_changes += 1;
        self.summary.total_edits += edits.len();

        match self.format {
            OutputFormat::Text => {
                println!("{}", path.display().to_string().bold());
                print_diff(old_source, new_source);
                println!();
                for edit in &edits {
                    println!(
                        "  {} {} {}",
                        "->".green(),
                        edit.message,
                        format!("[{}, pass {}]", edit.tipper, edit.pass).dimmed()
                    );
                }
                println!();
            }
            OutputFormat::Diff => {
                print!("{}", unified_diff(path, old_source, new_source));
            }
            OutputFormat::Json => {}
        }

        self.results.push(FileResult::success(path, edits));
    }

    /// Report a document after writing the transformed tree back
    pub fn report_fix(&mut self, path: &Path, edits: Vec<EditInfo>) {
        if edits.is_empty() {
            self.report_skipped(path);
            return;
        }

        self.summary.files_processed += 1;
        self.summary.files_with_changes += 1;
        self.summary.total_edits += edits.len();

        if self.format == OutputFormat::Text {
            println!("{}", path.display().to_string().bold());
            println!("  {} Applied {} change(s)", "OK".green(), edits.len());
            println!();
        }

        self.results.push(FileResult::success(path, edits));
    }

    /// Report a document the driver left untouched
    pub fn report_skipped(&mut self, path: &Path) {
        self.summary.files_processed += 1;
        if self.verbose && self.format == OutputFormat::Text {
            println!("{}: No changes needed", path.display());
        }
        self.results.push(FileResult::success(path, vec![]));
    }

    /// Report an error processing a document
    pub fn report_error(&mut self, path: &Path, error: &str) {
        self.summary.files_processed += 1;
        self.summary.errors += 1;

        if self.format == OutputFormat::Text {
            eprintln!("{}: {} - {}", "Warning".yellow(), path.display(), error);
        }

        self.results.push(FileResult::error(path, error.to_string()));
    }

    /// Attach the driver's run summary
    pub fn report_run(&mut self, run: RunSummary) {
        if self.format == OutputFormat::Text {
            if run.hit_ceiling {
                eprintln!(
                    "{}: {} document(s) still changing after {} pass(es)",
                    "Warning".yellow(),
                    run.still_live.len(),
                    run.passes_run
                );
            }
            if run.was_cancelled {
                eprintln!("{}: run cancelled after {} pass(es)", "Warning".yellow(), run.passes_run);
            }
        }
        self.run = Some(run);
    }

    /// Print final summary/output
    pub fn finish(self, check_mode: bool) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!();
                println!("{}", "Summary".bold().underline());
                println!("  Files processed: {}", self.summary.files_processed);
                println!("  Files with changes: {}", self.summary.files_with_changes);
                println!("  Total edits: {}", self.summary.total_edits);
                if let Some(run) = &self.run {
                    println!("  Passes: {}", run.passes_run);
                    if run.tips_before > 0 || run.tips_after > 0 {
                        println!("  Tips: {} before, {} after", run.tips_before, run.tips_after);
                    }
                }
                if self.summary.errors > 0 {
                    println!("  Errors: {}", self.summary.errors);
                }

                if check_mode && self.summary.total_edits > 0 {
                    println!();
                    println!("{}", "Run with --fix to apply changes".yellow());
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    summary: self.summary,
                    run: self.run,
                    files: self.results,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Diff => {
                // Patch-compatible output carries no summary
            }
        }
        Ok(())
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

/// Print the changed lines of a rendered document in color
fn print_diff(old: &str, new: &str) {
    let diff = TextDiff::from_lines(old, new);
    for change in diff.iter_all_changes() {
        let line = change.to_string_lossy();
        let line = line.trim_end_matches('\n');
        match change.tag() {
            ChangeTag::Delete => println!("  {}", format!("- {}", line).red()),
            ChangeTag::Insert => println!("  {}", format!("+ {}", line).green()),
            ChangeTag::Equal => {}
        }
    }
}

/// Unified diff of two renderings (standard diff -u compatible)
fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let path_str = path.display().to_string();
    diff.unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", path_str), &format!("b/{}", path_str))
        .to_string()
}
