use serde::Serialize;

// ---------------------------------------------------------------------------
// Descriptive statistics for one numeric column
// ---------------------------------------------------------------------------

/// Per-column descriptive statistics. Transient: rendered into report
/// lines, never persisted as a structured record.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStatistics {
    pub name: String,
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    pub sum: f64,
    /// Number of non-null entries.
    pub count: usize,
}

impl ColumnStatistics {
    /// Compute statistics over the non-null values of a column. Returns
    /// `None` for an empty slice; callers only reach here for columns the
    /// table already classified as numeric, which guarantees at least one
    /// value on the unfiltered table.
    pub fn from_values(name: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let mean = sum / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Some(ColumnStatistics {
            name: name.to_string(),
            mean,
            median,
            max,
            min,
            sum,
            count,
        })
    }

    /// Render the statistics block exactly as it appears in the report:
    /// a `Column:` header followed by indented values, reals with four
    /// decimal places.
    pub fn report_lines(&self) -> Vec<String> {
        vec![
            format!("\nColumn: {}", self.name),
            format!("  Mean: {:.4}", self.mean),
            format!("  Median: {:.4}", self.median),
            format!("  Max: {:.4}", self.max),
            format!("  Min: {:.4}", self.min),
            format!("  Sum: {:.4}", self.sum),
            format!("  Count: {}", self.count),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_odd_count() {
        let stats = ColumnStatistics::from_values("x", &[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.mean - 2.0).abs() < 1e-9);
        assert!((stats.median - 2.0).abs() < 1e-9);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert!((stats.sum - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_even_count_median_interpolates() {
        let stats = ColumnStatistics::from_values("x", &[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!((stats.median - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_stats_single_value() {
        let stats = ColumnStatistics::from_values("x", &[7.5]).unwrap();
        assert_eq!(stats.median, 7.5);
        assert_eq!(stats.min, 7.5);
        assert_eq!(stats.max, 7.5);
    }

    #[test]
    fn test_stats_empty_is_none() {
        assert!(ColumnStatistics::from_values("x", &[]).is_none());
    }

    #[test]
    fn test_report_lines_use_four_decimals() {
        let stats = ColumnStatistics::from_values("price", &[1.0, 2.0]).unwrap();
        let lines = stats.report_lines();
        assert_eq!(lines[0], "\nColumn: price");
        assert_eq!(lines[1], "  Mean: 1.5000");
        assert_eq!(lines[6], "  Count: 2");
    }
}
