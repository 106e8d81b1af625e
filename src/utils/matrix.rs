//! Rectangular matrix helpers.

/// Errors raised when a nested vector is not a proper matrix
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    #[error("Matrix must be rectangular: row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Swap rows and columns of a rectangular matrix.
///
/// An empty matrix, or one whose first row is empty, transposes to an
/// empty matrix.
pub fn transpose<T: Clone>(matrix: &[Vec<T>]) -> Result<Vec<Vec<T>>, MatrixError> {
    let Some(first) = matrix.first() else {
        return Ok(Vec::new());
    };
    let cols = first.len();
    if cols == 0 {
        return Ok(Vec::new());
    }

    if let Some((row, r)) = matrix.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(MatrixError::Ragged {
            row,
            expected: cols,
            found: r.len(),
        });
    }

    Ok((0..cols)
        .map(|j| matrix.iter().map(|r| r[j].clone()).collect())
        .collect())
}
