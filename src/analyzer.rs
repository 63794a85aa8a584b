use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use log::{info, warn};

use crate::chart;
use crate::config::AnalysisConfig;
use crate::data::filter;
use crate::data::loader;
use crate::data::model::DataTable;
use crate::data::stats::ColumnStatistics;

// ---------------------------------------------------------------------------
// BatchAnalyzer
// ---------------------------------------------------------------------------

/// Drives the per-file pipeline: load → statistics → filter → charts →
/// save, accumulating a run log that is flushed once into a timestamped
/// report. Every per-file failure becomes a log line; nothing short of a
/// report-write failure aborts the run.
pub struct BatchAnalyzer {
    config: AnalysisConfig,
    /// Append-only run log, never truncated mid-run.
    log: Vec<String>,
}

impl BatchAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        BatchAnalyzer {
            config,
            log: Vec::new(),
        }
    }

    /// Process every configured file and write the aggregate report.
    /// Returns the report path.
    pub fn run(mut self) -> Result<PathBuf> {
        let started = Local::now();

        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "creating output directory {}",
                self.config.output_dir.display()
            )
        })?;

        let files = self.config.files.clone();
        for path in &files {
            // Existence and extension are checked before the per-file
            // banner; a rejected path contributes a single error line.
            if let Err(e) = loader::validate_path(path) {
                warn!("{e}");
                self.log.push(format!("ERROR: {e}"));
                continue;
            }

            if let Some(table) = self.analyze_file(path) {
                self.create_charts(&table, path);
                self.save_filtered(&table, path);
            }
        }

        let report_path = self.config.output_dir.join(format!(
            "analysis_report_{}.txt",
            started.format("%Y%m%d_%H%M%S")
        ));
        self.write_report(&report_path)?;
        Ok(report_path)
    }

    /// Load one file, log its statistics, and apply the filter. Returns
    /// the (possibly filtered) table, or `None` when the file is skipped
    /// for subsequent steps.
    fn analyze_file(&mut self, path: &Path) -> Option<DataTable> {
        self.log.push(format!("\n{}", "=".repeat(50)));
        self.log.push(format!("Analyzing file: {}", path.display()));
        self.log.push("=".repeat(50));
        info!("analyzing {}", path.display());

        let table = match loader::load_csv(path) {
            Ok(table) => table,
            Err(e) => {
                self.log.push(format!(
                    "ERROR: Failed to analyze file {}: {e}",
                    path.display()
                ));
                return None;
            }
        };

        let numeric = table.numeric_columns();
        self.log
            .push(format!("Numeric columns: {}", numeric.join(", ")));
        if numeric.is_empty() {
            self.log
                .push("WARNING: No numeric columns found in the file.".to_string());
            return None;
        }

        self.log.push("\nStatistical Analysis:".to_string());
        for col in &numeric {
            let values = table.numeric_values(col).unwrap_or_default();
            match ColumnStatistics::from_values(col, &values) {
                Some(stats) => self.log.extend(stats.report_lines()),
                None => self
                    .log
                    .push(format!("  Error analyzing column {col}: no values")),
            }
        }

        let mut filtered = table;
        if let Some(condition) = self.config.filter.clone() {
            match filter::compile(&condition).and_then(|expr| filter::apply(&filtered, &expr)) {
                Ok(result) => {
                    self.log
                        .push(format!("\nFiltered data using condition: {condition}"));
                    self.log
                        .push(format!("Number of rows after filtering: {}", result.len()));
                    filtered = result;
                }
                // Invalid filters degrade: the unfiltered table stays.
                Err(e) => self.log.push(format!("Error applying filter: {e}")),
            }
        }

        Some(filtered)
    }

    /// Render the configured bar and scatter charts for one file's
    /// (filtered) table. Missing or non-numeric columns log a warning
    /// and produce no image.
    fn create_charts(&mut self, table: &DataTable, path: &Path) {
        if table.is_empty() {
            self.log
                .push("WARNING: Cannot create plots - No data available.".to_string());
            return;
        }

        let stem = file_stem(path);

        if let Some(col) = self.config.plot_column.clone() {
            if table.column_index(&col).is_none() {
                self.log
                    .push(format!("WARNING: Column {col} not found for bar chart."));
            } else if !table.is_numeric_column(&col) {
                self.log.push(format!(
                    "WARNING: Column {col} is not numeric. Cannot create bar chart."
                ));
            } else {
                let values = table.numeric_values(&col).unwrap_or_default();
                let counts = chart::frequency_counts(&values);
                let out = self
                    .config
                    .output_dir
                    .join(format!("{stem}_{col}_bar.png"));
                match chart::bar_chart(&counts, &col, &out) {
                    Ok(()) => self
                        .log
                        .push(format!("\nBar chart saved to: {}", out.display())),
                    Err(e) => self
                        .log
                        .push(format!("ERROR: Failed to create bar chart: {e}")),
                }
            }
        }

        if let (Some(x), Some(y)) = (
            self.config.scatter_x.clone(),
            self.config.scatter_y.clone(),
        ) {
            if table.column_index(&x).is_none() || table.column_index(&y).is_none() {
                self.log.push(format!(
                    "WARNING: Columns {x} and/or {y} not found for scatter plot."
                ));
            } else if !table.is_numeric_column(&x) || !table.is_numeric_column(&y) {
                self.log.push(format!(
                    "WARNING: Both {x} and {y} must be numeric for scatter plot."
                ));
            } else {
                let (xs, ys) = table.paired_numeric_values(&x, &y).unwrap_or_default();
                let out = self
                    .config
                    .output_dir
                    .join(format!("{stem}_{x}_{y}_scatter.png"));
                match chart::scatter_chart(&xs, &ys, &x, &y, &out) {
                    Ok(()) => self
                        .log
                        .push(format!("Scatter plot saved to: {}", out.display())),
                    Err(e) => self
                        .log
                        .push(format!("ERROR: Failed to create scatter plot: {e}")),
                }
            }
        }
    }

    /// Write the (possibly filtered) table as `<stem>_filtered.csv`.
    /// An empty table produces no file.
    fn save_filtered(&mut self, table: &DataTable, path: &Path) {
        if table.is_empty() {
            return;
        }
        let out = self
            .config
            .output_dir
            .join(format!("{}_filtered.csv", file_stem(path)));
        match table.write_csv(&out) {
            Ok(()) => self
                .log
                .push(format!("\nFiltered data saved to: {}", out.display())),
            Err(e) => self
                .log
                .push(format!("ERROR: Failed to save filtered data: {e}")),
        }
    }

    /// Flush the accumulated log under a fixed header.
    fn write_report(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("creating report file {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "csvbatch - Analysis Report")?;
        writeln!(writer, "Generated by: csvbatch v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(writer, "Date: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(writer)?;
        for line in &self.log {
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Base name without extension, used to derive artifact names.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
