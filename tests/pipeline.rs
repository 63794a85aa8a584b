//! End-to-end runs of the batch pipeline against temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use csvbatch::analyzer::BatchAnalyzer;
use csvbatch::config::AnalysisConfig;

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn config(files: Vec<PathBuf>, output_dir: PathBuf) -> AnalysisConfig {
    AnalysisConfig {
        files,
        output_dir,
        filter: None,
        plot_column: None,
        scatter_x: None,
        scatter_y: None,
    }
}

fn png_count(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .path()
                .extension()
                .is_some_and(|ext| ext == "png")
        })
        .count()
}

#[test]
fn end_to_end_filter_stats_and_charts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "a.csv", "x,y\n1,10\n2,20\n3,30\n");
    let out = dir.path().join("out");

    let mut cfg = config(vec![input], out.clone());
    cfg.filter = Some("x > 1".to_string());
    cfg.plot_column = Some("x".to_string());
    cfg.scatter_x = Some("x".to_string());
    cfg.scatter_y = Some("y".to_string());

    let report_path = BatchAnalyzer::new(cfg).run().unwrap();
    assert!(report_path.exists());

    // Filtered table keeps only rows with x > 1.
    let filtered = fs::read_to_string(out.join("a_filtered.csv")).unwrap();
    assert_eq!(filtered, "x,y\n2,20\n3,30\n");

    // Both charts were rendered.
    assert!(out.join("a_x_bar.png").metadata().unwrap().len() > 0);
    assert!(out.join("a_x_y_scatter.png").metadata().unwrap().len() > 0);

    // The report narrates statistics (over unfiltered data) and artifacts.
    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.starts_with("csvbatch - Analysis Report"));
    assert!(report.contains("Numeric columns: x, y"));
    assert!(report.contains("Column: x"));
    assert!(report.contains("Column: y"));
    assert!(report.contains("  Mean: 2.0000"));
    assert!(report.contains("  Median: 20.0000"));
    assert!(report.contains("  Count: 3"));
    assert!(report.contains("Filtered data using condition: x > 1"));
    assert!(report.contains("Number of rows after filtering: 2"));
    assert!(report.contains("Bar chart saved to:"));
    assert!(report.contains("Scatter plot saved to:"));
    assert!(report.contains("Filtered data saved to:"));
}

#[test]
fn missing_and_non_csv_inputs_are_logged_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.csv");
    let notes = write_file(dir.path(), "notes.txt", "not a table");
    let good = write_file(dir.path(), "good.csv", "v\n5\n7\n");
    let out = dir.path().join("out");

    let report_path = BatchAnalyzer::new(config(vec![missing, notes, good], out.clone()))
        .run()
        .unwrap();

    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("ERROR: File not found:"));
    assert!(report.contains("ERROR: File is not a CSV:"));
    // The good file was still fully processed.
    assert!(report.contains("Column: v"));
    assert!(report.contains("  Sum: 12.0000"));
    assert!(out.join("good_filtered.csv").exists());
}

#[test]
fn invalid_filter_degrades_to_unfiltered_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "a.csv", "x\n1\n2\n3\n");
    let out = dir.path().join("out");

    let mut cfg = config(vec![input], out.clone());
    cfg.filter = Some("x >".to_string());

    let report_path = BatchAnalyzer::new(cfg).run().unwrap();
    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("Error applying filter:"));

    // All rows survive.
    let filtered = fs::read_to_string(out.join("a_filtered.csv")).unwrap();
    assert_eq!(filtered, "x\n1\n2\n3\n");
}

#[test]
fn unknown_filter_column_degrades_to_unfiltered_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "a.csv", "x\n1\n2\n");
    let out = dir.path().join("out");

    let mut cfg = config(vec![input], out.clone());
    cfg.filter = Some("bogus > 1".to_string());

    let report_path = BatchAnalyzer::new(cfg).run().unwrap();
    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("unknown column 'bogus'"));

    let filtered = fs::read_to_string(out.join("a_filtered.csv")).unwrap();
    assert_eq!(filtered, "x\n1\n2\n");
}

#[test]
fn missing_or_text_plot_columns_warn_without_images() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "a.csv", "x,label\n1,a\n2,b\n");
    let out = dir.path().join("out");

    let mut cfg = config(vec![input], out.clone());
    cfg.plot_column = Some("nope".to_string());
    cfg.scatter_x = Some("x".to_string());
    cfg.scatter_y = Some("label".to_string());

    let report_path = BatchAnalyzer::new(cfg).run().unwrap();
    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("WARNING: Column nope not found for bar chart."));
    assert!(report.contains("WARNING: Both x and label must be numeric for scatter plot."));
    assert_eq!(png_count(&out), 0);
}

#[test]
fn no_numeric_columns_skips_everything_after_the_warning() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "words.csv", "a,b\nfoo,bar\nbaz,qux\n");
    let out = dir.path().join("out");

    let mut cfg = config(vec![input], out.clone());
    cfg.plot_column = Some("a".to_string());

    let report_path = BatchAnalyzer::new(cfg).run().unwrap();
    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("WARNING: No numeric columns found in the file."));
    assert!(!report.contains("Statistical Analysis:"));
    assert!(!out.join("words_filtered.csv").exists());
    assert_eq!(png_count(&out), 0);
}

#[test]
fn filter_that_removes_every_row_saves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "a.csv", "x\n1\n2\n");
    let out = dir.path().join("out");

    let mut cfg = config(vec![input], out.clone());
    cfg.filter = Some("x > 100".to_string());
    cfg.plot_column = Some("x".to_string());

    let report_path = BatchAnalyzer::new(cfg).run().unwrap();
    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("Number of rows after filtering: 0"));
    assert!(report.contains("WARNING: Cannot create plots - No data available."));
    assert!(!out.join("a_filtered.csv").exists());
}

#[test]
fn one_report_per_run_covers_all_files() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_file(dir.path(), "first.csv", "n\n1\n");
    let second = write_file(dir.path(), "second.csv", "m\n2\n");
    let out = dir.path().join("out");

    BatchAnalyzer::new(config(vec![first, second], out.clone()))
        .run()
        .unwrap();

    let reports: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("analysis_report_")
        })
        .collect();
    assert_eq!(reports.len(), 1);

    let report = fs::read_to_string(reports[0].path()).unwrap();
    assert!(report.contains("Analyzing file:"));
    assert!(report.contains("Column: n"));
    assert!(report.contains("Column: m"));
}
