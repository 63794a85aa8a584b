use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use csvbatch::analyzer::BatchAnalyzer;
use csvbatch::config::AnalysisConfig;

/// Batch CSV statistics, filtering, and charting tool.
#[derive(Parser)]
#[command(name = "csvbatch", version, about)]
struct Args {
    /// CSV files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output directory for results
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Filter condition (e.g. "price > 100 and region == 'EU'")
    #[arg(short, long)]
    filter: Option<String>,

    /// Column to create a bar chart for
    #[arg(short, long)]
    plot: Option<String>,

    /// X column for scatter plot
    #[arg(short = 'x', long = "scatter-x")]
    scatter_x: Option<String>,

    /// Y column for scatter plot
    #[arg(short = 'y', long = "scatter-y")]
    scatter_y: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = AnalysisConfig {
        files: args.files,
        output_dir: args.output,
        filter: args.filter,
        plot_column: args.plot,
        scatter_x: args.scatter_x,
        scatter_y: args.scatter_y,
    };

    let report = BatchAnalyzer::new(config).run()?;
    println!("Analysis completed. Report saved to {}", report.display());
    Ok(())
}
