/// Replace non-finite cells (NaN, +inf, -inf) with 0 in place.
/// Returns the number of cells replaced.
pub fn sanitize(matrix: &mut [Vec<f64>]) -> usize {
    let mut replaced = 0usize;
    for row in matrix.iter_mut() {
        for cell in row.iter_mut() {
            if !cell.is_finite() {
                *cell = 0.0;
                replaced += 1;
            }
        }
    }
    if replaced > 0 {
        tracing::debug!(cells = replaced, "Non-finite feature values zeroed");
    }
    replaced
}

/// Per-column min-max scaler fit on a single batch.
///
/// Each column is rescaled to [0, 1] with the batch's own min and max; a
/// constant column maps to all zeros. Parameters live only for the run.
#[derive(Debug)]
pub struct MinMaxScaler {
    mins: Vec<f64>,
    maxs: Vec<f64>,
}

impl MinMaxScaler {
    pub fn fit(matrix: &[Vec<f64>]) -> Self {
        let columns = matrix.first().map(|row| row.len()).unwrap_or(0);
        let mut mins = vec![f64::INFINITY; columns];
        let mut maxs = vec![f64::NEG_INFINITY; columns];

        for row in matrix {
            for (column, &value) in row.iter().enumerate() {
                if value < mins[column] {
                    mins[column] = value;
                }
                if value > maxs[column] {
                    maxs[column] = value;
                }
            }
        }

        Self { mins, maxs }
    }

    pub fn transform(&self, matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
        matrix
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(column, &value)| {
                        let range = self.maxs[column] - self.mins[column];
                        if range > 0.0 {
                            (value - self.mins[column]) / range
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
