use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{Error, Result};

/// Dense row-major weight storage.
///
/// A layer mapping `n` inputs to `m` outputs stores an `m × n` matrix: one row per
/// output neuron, one column per input.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// Samples every entry from N(0, std_dev).
    pub fn gaussian<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let n: f64 = rng.sample(StandardNormal);
                res.data[i][j] = n * std_dev;
            }
        }
        res
    }

    /// Builds a matrix from nested rows, rejecting empty and ragged input.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = match data.first() {
            None => return Err(Error::config("weight matrix must have at least one row")),
            Some(first) if first.is_empty() => {
                return Err(Error::config("weight matrix rows must not be empty"))
            }
            Some(first) => first.len(),
        };

        if let Some((i, row)) = data.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(Error::config(format!(
                "weight row {i} has length {}, expected {cols}",
                row.len()
            )));
        }

        Ok(Matrix {
            rows: data.len(),
            cols,
            data,
        })
    }

    pub fn map<F>(&self, mut functor: F) -> Matrix
    where
        F: FnMut(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// `W · x` for a vector of length `cols`.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        self.data
            .iter()
            .map(|row| row.iter().zip(x).map(|(w, v)| w * v).sum())
            .collect()
    }

    /// `Wᵀ · v` for a vector of length `rows`.
    pub fn transpose_mul_vec(&self, v: &[f64]) -> Vec<f64> {
        let mut res = vec![0.0; self.cols];
        for (row, &scale) in self.data.iter().zip(v) {
            for (acc, w) in res.iter_mut().zip(row) {
                *acc += w * scale;
            }
        }
        res
    }

    /// In-place `W[i][j] -= scale * left[i] * right[j]`.
    pub fn sub_outer(&mut self, scale: f64, left: &[f64], right: &[f64]) {
        for (row, &l) in self.data.iter_mut().zip(left) {
            for (w, &r) in row.iter_mut().zip(right) {
                *w -= scale * l * r;
            }
        }
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn from_rows_rejects_empty_and_ragged() {
        assert!(Matrix::from_rows(vec![]).is_err());
        assert!(Matrix::from_rows(vec![vec![]]).is_err());
        assert!(Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());

        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!((m.rows, m.cols), (3, 2));
    }

    #[test]
    fn products_agree_with_explicit_transpose() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.mul_vec(&[1.0, 0.0, -1.0]), vec![-2.0, -2.0]);

        let v = [2.0, -1.0];
        assert_eq!(m.transpose_mul_vec(&v), m.transpose().mul_vec(&v));
        assert_eq!(m.transpose_mul_vec(&v), vec![-2.0, -1.0, 0.0]);
    }

    #[test]
    fn sub_outer_applies_rank_one_update() {
        let mut m = Matrix::identity(2);
        m.sub_outer(0.5, &[1.0, 2.0], &[2.0, 4.0]);
        assert_eq!(m.data, vec![vec![0.0, -2.0], vec![-2.0, -3.0]]);
    }

    #[test]
    fn gaussian_is_reproducible_for_a_seed() {
        let a = Matrix::gaussian(3, 4, 0.5, &mut StdRng::seed_from_u64(7));
        let b = Matrix::gaussian(3, 4, 0.5, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(Matrix::gaussian(2, 2, 0.0, &mut StdRng::seed_from_u64(1)), Matrix::zeros(2, 2));
    }
}
