/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Dense matrix and vector operations.

use crate::error::MathError;
use itertools::Itertools;
use num_traits::Float;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    values: Vec<T>,
}

impl<T: Float> Matrix<T> {
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, MathError> {
        let cols = rows.first().map(Vec::len).unwrap_or_default();
        if cols == 0 {
            return Err(MathError::Empty);
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(MathError::DimensionMismatch(format!(
                "row of length {} in a matrix with {} columns",
                bad.len(),
                cols
            )));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        (0..n).for_each(|i| m.values[i * n + i] = T::one());
        m
    }

    fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![T::zero(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.values[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        self.values[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    fn same_shape(&self, other: &Self) -> Result<(), MathError> {
        if self.rows == other.rows && self.cols == other.cols {
            Ok(())
        } else {
            Err(MathError::DimensionMismatch(format!(
                "{}x{} and {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )))
        }
    }

    fn zip_with<F: Fn(T, T) -> T>(&self, other: &Self, f: F) -> Result<Self, MathError> {
        self.same_shape(other)?;
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        })
    }

    pub fn add(&self, other: &Self) -> Result<Self, MathError> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Self) -> Result<Self, MathError> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Self) -> Result<Self, MathError> {
        if self.cols != other.rows {
            return Err(MathError::DimensionMismatch(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut out = Self::zeros(self.rows, other.cols);
        for (i, j) in (0..self.rows).cartesian_product(0..other.cols) {
            let v = (0..self.cols).fold(T::zero(), |acc, k| acc + self.get(i, k) * other.get(k, j));
            out.set(i, j, v);
        }
        Ok(out)
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for (i, j) in (0..self.rows).cartesian_product(0..self.cols) {
            out.set(j, i, self.get(i, j));
        }
        out
    }

    fn require_square(&self) -> Result<usize, MathError> {
        if self.rows == self.cols {
            Ok(self.rows)
        } else {
            Err(MathError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub fn determinant(&self) -> Result<T, MathError> {
        let n = self.require_square()?;
        let m = |i, j| self.get(i, j);
        let det = match n {
            1 => m(0, 0),
            2 => m(0, 0) * m(1, 1) - m(0, 1) * m(1, 0),
            3 => {
                m(0, 0) * (m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1))
                    - m(0, 1) * (m(1, 0) * m(2, 2) - m(1, 2) * m(2, 0))
                    + m(0, 2) * (m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0))
            }
            _ => {
                let mut work = self.clone();
                let mut det = T::one();
                for col in 0..n {
                    let Some(pivot) = work.pivot_row(col) else {
                        return Ok(T::zero());
                    };
                    if pivot != col {
                        work.swap_rows(pivot, col);
                        det = -det;
                    }
                    let p = work.get(col, col);
                    det = det * p;
                    for row in col + 1..n {
                        let factor = work.get(row, col) / p;
                        for k in col..n {
                            work.set(row, k, work.get(row, k) - factor * work.get(col, k));
                        }
                    }
                }
                det
            }
        };
        Ok(det)
    }

    /// Gauss-Jordan elimination with partial pivoting
    pub fn inverse(&self) -> Result<Self, MathError> {
        let n = self.require_square()?;
        let mut work = self.clone();
        let mut inv = Self::identity(n);

        for col in 0..n {
            let pivot = work.pivot_row(col).ok_or(MathError::Singular)?;
            work.swap_rows(pivot, col);
            inv.swap_rows(pivot, col);

            let p = work.get(col, col);
            for k in 0..n {
                work.set(col, k, work.get(col, k) / p);
                inv.set(col, k, inv.get(col, k) / p);
            }
            for row in (0..n).filter(|&r| r != col) {
                let factor = work.get(row, col);
                for k in 0..n {
                    work.set(row, k, work.get(row, k) - factor * work.get(col, k));
                    inv.set(row, k, inv.get(row, k) - factor * inv.get(col, k));
                }
            }
        }
        Ok(inv)
    }

    /// Row at or below `col` with the largest magnitude in that column
    fn pivot_row(&self, col: usize) -> Option<usize> {
        let eps = T::epsilon() * T::from(self.rows).unwrap_or_else(T::one);
        (col..self.rows)
            .max_by(|a, b| {
                self.get(*a, col)
                    .abs()
                    .partial_cmp(&self.get(*b, col).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .filter(|&r| self.get(r, col).abs() > eps)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for k in 0..self.cols {
            self.values.swap(a * self.cols + k, b * self.cols + k);
        }
    }
}

fn same_len<T>(a: &[T], b: &[T]) -> Result<(), MathError> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(MathError::DimensionMismatch(format!(
            "vectors of length {} and {}",
            a.len(),
            b.len()
        )))
    }
}

pub fn vector_add<T: Float>(a: &[T], b: &[T]) -> Result<Vec<T>, MathError> {
    same_len(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| *x + *y).collect())
}

pub fn vector_sub<T: Float>(a: &[T], b: &[T]) -> Result<Vec<T>, MathError> {
    same_len(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| *x - *y).collect())
}

pub fn dot<T: Float>(a: &[T], b: &[T]) -> Result<T, MathError> {
    same_len(a, b)?;
    Ok(a.iter().zip(b).fold(T::zero(), |acc, (x, y)| acc + *x * *y))
}

pub fn cross<T: Float>(a: &[T], b: &[T]) -> Result<[T; 3], MathError> {
    if a.len() != 3 || b.len() != 3 {
        return Err(MathError::DimensionMismatch(
            "cross product requires 3D vectors".to_string(),
        ));
    }
    Ok([
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ])
}

/// Euclidean length
pub fn norm<T: Float>(a: &[T]) -> T {
    a.iter().fold(T::zero(), |acc, x| acc + *x * *x).sqrt()
}

/// Angle between two vectors in radians
pub fn angle<T: Float>(a: &[T], b: &[T]) -> Result<T, MathError> {
    let d = dot(a, b)?;
    let len = norm(a) * norm(b);
    if len.is_zero() {
        return Err(MathError::DimensionMismatch(
            "angle with a zero vector".to_string(),
        ));
    }
    Ok((d / len).max(-T::one()).min(T::one()).acos())
}
