use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{NnError, Result};
use crate::math::vector::Vector;

/// Dense row-major matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Builds a matrix from rows. Ragged input is rejected.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |r| r.len());
        if let Some(bad) = data.iter().find(|r| r.len() != cols) {
            return Err(NnError::mismatch("matrix from_data", (rows, cols), (1, bad.len())));
        }
        Ok(Matrix { rows, cols, data })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    pub fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Xavier initialization: every entry drawn from N(0, 1 / cols).
    ///
    /// `cols` is the fan-in, so the variance of a weighted sum stays close to
    /// the variance of its inputs regardless of layer width.
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (1.0 / cols as f64).sqrt();
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
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

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|x| functor(*x)).collect())
                .collect(),
        }
    }

    fn zip_with<F>(&self, rhs: &Matrix, op: &'static str, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(NnError::mismatch(op, self.shape(), rhs.shape()));
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = f(self.data[i][j], rhs.data[i][j]);
            }
        }

        Ok(res)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "matrix add", |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "matrix sub", |a, b| a - b)
    }

    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "matrix hadamard", |a, b| a * b)
    }

    pub fn scale(&self, k: f64) -> Matrix {
        self.map(|x| x * k)
    }

    pub fn div_scalar(&self, k: f64) -> Matrix {
        self.map(|x| x / k)
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NnError::mismatch("matrix matmul", self.shape(), rhs.shape()));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Matrix-vector product `self · v`.
    pub fn mul_vector(&self, v: &Vector) -> Result<Vector> {
        if self.cols != v.len() {
            return Err(NnError::mismatch("matrix-vector product", self.shape(), v.shape()));
        }

        let x = v.as_slice();
        Ok(Vector::from_vec(
            self.data
                .iter()
                .map(|row| row.iter().zip(x).map(|(w, xi)| w * xi).sum())
                .collect(),
        ))
    }

    /// Outer product `a · bᵀ`, shape `(a.len(), b.len())`.
    pub fn outer(a: &Vector, b: &Vector) -> Matrix {
        Matrix {
            rows: a.len(),
            cols: b.len(),
            data: a.iter().map(|ai| b.iter().map(|bj| ai * bj).collect()).collect(),
        }
    }

    /// Entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter().flat_map(|row| row.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.data.iter_mut().flat_map(|row| row.iter_mut())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn sample() -> Matrix {
        Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn transpose_twice_is_identity() {
        let m = sample();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.data[2][1], 6.0);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn products() {
        let a = sample();
        let b = a.transpose();
        let ab = a.matmul(&b).unwrap();
        assert_eq!(ab.data, vec![vec![14.0, 32.0], vec![32.0, 77.0]]);

        let v = Vector::from(vec![1.0, 0.0, -1.0]);
        assert_eq!(a.mul_vector(&v).unwrap().as_slice(), &[-2.0, -2.0]);
    }

    #[test]
    fn product_is_associative_with_vector() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = Matrix::xavier(4, 3, &mut rng);
        let b = Matrix::xavier(3, 5, &mut rng);
        let v = Vector::from(vec![0.3, -1.2, 2.0, 0.7, -0.4]);

        let left = a.matmul(&b).unwrap().mul_vector(&v).unwrap();
        let right = a.mul_vector(&b.mul_vector(&v).unwrap()).unwrap();
        for (l, r) in left.iter().zip(right.iter()) {
            assert_relative_eq!(*l, *r, epsilon = 1e-12);
        }
    }

    #[test]
    fn elementwise_ops() {
        let a = sample();
        let b = a.scale(2.0);
        assert_eq!(b.sub(&a).unwrap(), a);
        assert_eq!(a.add(&a).unwrap(), b);
        assert_eq!(b.div_scalar(2.0), a);
        assert_eq!(a.hadamard(&b).unwrap(), b.hadamard(&a).unwrap());
        assert_eq!(a.hadamard(&a).unwrap().data[1][2], 36.0);
    }

    #[test]
    fn shape_errors_do_not_mutate() {
        let a = sample();
        let b = a.transpose();
        let before = (a.clone(), b.clone());

        assert!(matches!(
            a.add(&b),
            Err(NnError::DimensionMismatch { left: (2, 3), right: (3, 2), .. })
        ));
        assert!(a.sub(&b).is_err());
        assert!(a.hadamard(&b).is_err());
        assert!(a.matmul(&a).is_err());
        assert!(a.mul_vector(&Vector::zeros(2)).is_err());
        assert_eq!((a, b), before);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
        assert_eq!(Matrix::from_data(vec![]).unwrap().shape(), (0, 0));
    }

    #[test]
    fn xavier_variance_tracks_fan_in() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::xavier(200, 50, &mut rng);
        let n = (m.rows * m.cols) as f64;
        let mean = m.iter().sum::<f64>() / n;
        let var = m.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.01, "mean {mean}");
        assert_relative_eq!(var, 1.0 / 50.0, max_relative = 0.1);
    }
}
