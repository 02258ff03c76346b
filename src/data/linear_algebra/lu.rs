//! # Dense rational LU factorization
//!
//! A PA = LU decomposition with row pivoting over exact rationals, and a rectangular variant
//! that additionally selects a square invertible row subset of a tall matrix. The rectangular
//! form is what the project-and-shift post-processor stores: its columns index the projected
//! basis and the selected rows map those columns into the row space of the LP.
use num_traits::Zero;

use crate::data::number_types::rational::Rational;

#[cfg(test)]
mod test;

/// A PA = LU factorization of a square rational matrix.
///
/// The unit-diagonal multipliers of `L` are stored below the diagonal of `U` in a single dense
/// matrix; `perm` maps factor rows to input rows.
#[derive(Clone, Debug)]
pub struct SquareLu {
    lu: Vec<Vec<Rational>>,
    perm: Vec<usize>,
}

impl SquareLu {
    /// Factor a square matrix given by rows.
    ///
    /// Returns `None` when the matrix is singular.
    pub fn factor(mut matrix: Vec<Vec<Rational>>) -> Option<Self> {
        let n = matrix.len();
        debug_assert!(matrix.iter().all(|row| row.len() == n));

        let mut perm = (0..n).collect::<Vec<_>>();

        for column in 0..n {
            // Any nonzero pivot is exact; take the first one.
            let pivot = (column..n).find(|&row| !matrix[row][column].is_zero())?;
            matrix.swap(column, pivot);
            perm.swap(column, pivot);

            let (pivot_row, rest) = matrix[column..].split_first_mut()
                .expect("column index is in range");
            for row in rest {
                if row[column].is_zero() {
                    continue;
                }
                let multiplier = &row[column] / &pivot_row[column];
                for j in (column + 1)..n {
                    let update = &multiplier * &pivot_row[j];
                    row[j] -= update;
                }
                row[column] = multiplier;
            }
        }

        Some(Self { lu: matrix, perm })
    }

    /// Dimension of the factored matrix.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.lu.len()
    }

    /// Solve `A x = b`.
    #[must_use]
    pub fn solve(&self, b: &[Rational]) -> Vec<Rational> {
        let n = self.dimension();
        debug_assert_eq!(b.len(), n);

        // Forward substitution through the unit lower factor, on the permuted right-hand side.
        let mut x = self.perm.iter().map(|&i| b[i].clone()).collect::<Vec<_>>();
        for i in 0..n {
            for j in 0..i {
                let update = &self.lu[i][j] * &x[j];
                x[i] -= update;
            }
        }

        // Back substitution through the upper factor.
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let update = &self.lu[i][j] * &x[j];
                x[i] -= update;
            }
            x[i] = &x[i] / &self.lu[i][i];
        }

        x
    }

    /// Solve `A^T x = b`.
    #[must_use]
    pub fn solve_transpose(&self, b: &[Rational]) -> Vec<Rational> {
        let n = self.dimension();
        debug_assert_eq!(b.len(), n);

        // A^T = U^T L^T P: forward substitution through U^T, then back through L^T.
        let mut w = b.to_vec();
        for i in 0..n {
            for j in 0..i {
                let update = &self.lu[j][i] * &w[j];
                w[i] -= update;
            }
            w[i] = &w[i] / &self.lu[i][i];
        }

        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let update = &self.lu[j][i] * &w[j];
                w[i] -= update;
            }
        }

        // Undo the row permutation: x[perm[i]] = w[i].
        let mut x = vec![Rational::zero(); n];
        for (i, value) in w.into_iter().enumerate() {
            x[self.perm[i]] = value;
        }
        x
    }
}

/// A factorization of a tall rational matrix through a selected square row subset.
#[derive(Clone, Debug)]
pub struct RectangularLu {
    /// Factorization of the square submatrix on the selected rows.
    square: SquareLu,
    /// The selected input rows, in pivot order.
    rows: Vec<usize>,
}

impl RectangularLu {
    /// Factor a matrix of `columns`, each of length `nr_rows`, selecting an invertible square
    /// row subset.
    ///
    /// Returns `None` when the columns are linearly dependent.
    pub fn factor(nr_rows: usize, columns: &[Vec<Rational>]) -> Option<Self> {
        let nr_columns = columns.len();
        debug_assert!(columns.iter().all(|column| column.len() == nr_rows));
        if nr_columns > nr_rows {
            return None;
        }

        // Greedy elimination on a working copy to discover a set of pivot rows.
        let mut work = (0..nr_rows)
            .map(|i| columns.iter().map(|column| column[i].clone()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let mut used = vec![false; nr_rows];
        let mut rows = Vec::with_capacity(nr_columns);

        for column in 0..nr_columns {
            let pivot = (0..nr_rows).find(|&i| !used[i] && !work[i][column].is_zero())?;
            used[pivot] = true;
            rows.push(pivot);

            let pivot_row = work[pivot].clone();
            for (i, row) in work.iter_mut().enumerate() {
                if used[i] || row[column].is_zero() {
                    continue;
                }
                let multiplier = &row[column] / &pivot_row[column];
                for j in column..nr_columns {
                    let update = &multiplier * &pivot_row[j];
                    row[j] -= update;
                }
            }
        }

        let submatrix = rows.iter()
            .map(|&i| columns.iter().map(|column| column[i].clone()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let square = SquareLu::factor(submatrix)
            .expect("pivoted row subset is invertible");

        Some(Self { square, rows })
    }

    /// The selected input rows, in pivot order.
    #[must_use]
    pub fn selected_rows(&self) -> &[usize] {
        &self.rows
    }

    /// Solve `S^T d = v` for the square submatrix `S` on the selected rows.
    ///
    /// The result is returned in submatrix order; entry `i` belongs to input row
    /// `selected_rows()[i]`.
    #[must_use]
    pub fn solve_transpose(&self, v: &[Rational]) -> Vec<Rational> {
        self.square.solve_transpose(v)
    }

    /// Solve `S x = b` for the square submatrix `S` on the selected rows.
    #[must_use]
    pub fn solve(&self, b: &[Rational]) -> Vec<Rational> {
        self.square.solve(b)
    }
}
