//! Summary statistics and correlation over observation columns

/// Mean, median, minimum and maximum of one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl FieldSummary {
    /// Compute the four indicators, or `None` when there are no values.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let (_, median, _) = quartiles(&sorted);

        Some(Self {
            mean,
            median,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Calculate quartiles using linear interpolation between ranks
pub fn quartiles(values: &[f64]) -> (f64, f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let n = sorted.len();
    if n == 0 {
        return (0.0, 0.0, 0.0);
    }

    let q1_idx = (n - 1) as f64 * 0.25;
    let q2_idx = (n - 1) as f64 * 0.5;
    let q3_idx = (n - 1) as f64 * 0.75;

    let q1 = interpolate(&sorted, q1_idx);
    let q2 = interpolate(&sorted, q2_idx);
    let q3 = interpolate(&sorted, q3_idx);

    (q1, q2, q3)
}

fn interpolate(sorted: &[f64], idx: f64) -> f64 {
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

/// Pearson correlation coefficient of two columns.
///
/// Mismatched lengths, empty input and zero-variance columns all yield 0.0
/// rather than NaN.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for i in 0..x.len() {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        0.0
    } else {
        cov / (var_x.sqrt() * var_y.sqrt())
    }
}

/// Pairwise Pearson matrix over the given columns: symmetric, unit diagonal.
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = columns.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..n {
            matrix[i][j] = if i == j {
                1.0
            } else {
                pearson(&columns[i], &columns[j])
            };
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    const PM10: [f64; 3] = [10.0, 20.0, 30.0];
    const TEMP: [f64; 3] = [5.0, 15.0, 25.0];
    const HUMI: [f64; 3] = [50.0, 50.0, 50.0];

    #[test]
    fn summary_of_known_fixture() {
        let summary = FieldSummary::compute(&PM10).unwrap();
        assert_eq!(summary.mean, 20.0);
        assert_eq!(summary.median, 20.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 30.0);
    }

    #[test]
    fn summary_of_empty_input_is_none() {
        assert!(FieldSummary::compute(&[]).is_none());
    }

    #[test]
    fn summary_is_ordered() {
        let values = [17.3, 4.1, 25.9, 12.0, 4.1, 31.6];
        let s = FieldSummary::compute(&values).unwrap();
        assert!(s.min <= s.median && s.median <= s.max);
        assert!(s.min <= s.mean && s.mean <= s.max);
    }

    #[test]
    fn quartiles_interpolate_between_ranks() {
        let (q1, q2, q3) = quartiles(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(q1, 1.75);
        assert_eq!(q2, 2.5);
        assert_eq!(q3, 3.25);
    }

    #[test]
    fn perfectly_linear_columns_correlate_to_one() {
        assert!((pearson(&PM10, &TEMP) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_column_yields_zero_not_nan() {
        let r = pearson(&PM10, &HUMI);
        assert_eq!(r, 0.0);
        assert!(!r.is_nan());
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let columns = vec![PM10.to_vec(), TEMP.to_vec(), HUMI.to_vec()];
        let matrix = correlation_matrix(&columns);

        for i in 0..3 {
            assert!((matrix[i][i] - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((matrix[i][j] - matrix[j][i]).abs() < 1e-12);
            }
        }
        assert!((matrix[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(matrix[0][2], 0.0);
    }
}
