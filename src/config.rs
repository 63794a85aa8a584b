use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// The full configuration of a batch run, built once from the CLI and
/// passed explicitly. Never mutated during the run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Input CSV files, processed in order.
    pub files: Vec<PathBuf>,

    /// Directory all artifacts are written to (created if absent).
    pub output_dir: PathBuf,

    /// Optional row filter condition, e.g. `"price > 100 and region == 'EU'"`.
    pub filter: Option<String>,

    /// Column to draw a frequency bar chart for.
    pub plot_column: Option<String>,

    /// X column for the scatter chart.
    pub scatter_x: Option<String>,

    /// Y column for the scatter chart; both X and Y must be set to plot.
    pub scatter_y: Option<String>,
}
