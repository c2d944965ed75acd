use serde::{Serialize, Deserialize};
use std::ops::{Index, IndexMut};

use crate::error::{NnError, Result};

/// Fixed-length column of reals. Index = neuron position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    pub fn zeros(len: usize) -> Vector {
        Vector { data: vec![0.0; len] }
    }

    pub fn from_vec(data: Vec<f64>) -> Vector {
        Vector { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Shape as seen by `DimensionMismatch`.
    pub(crate) fn shape(&self) -> (usize, usize) {
        (self.data.len(), 1)
    }

    fn check_same(&self, rhs: &Vector, op: &'static str) -> Result<()> {
        if self.len() != rhs.len() {
            return Err(NnError::mismatch(op, self.shape(), rhs.shape()));
        }
        Ok(())
    }

    fn zip_with<F>(&self, rhs: &Vector, op: &'static str, f: F) -> Result<Vector>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.check_same(rhs, op)?;
        Ok(Vector {
            data: self.data.iter().zip(rhs.data.iter()).map(|(a, b)| f(*a, *b)).collect(),
        })
    }

    pub fn add(&self, rhs: &Vector) -> Result<Vector> {
        self.zip_with(rhs, "vector add", |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Vector) -> Result<Vector> {
        self.zip_with(rhs, "vector sub", |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Vector) -> Result<Vector> {
        self.zip_with(rhs, "vector hadamard", |a, b| a * b)
    }

    pub fn dot(&self, rhs: &Vector) -> Result<f64> {
        self.check_same(rhs, "vector dot")?;
        Ok(self.data.iter().zip(rhs.data.iter()).map(|(a, b)| a * b).sum())
    }

    pub fn scale(&self, k: f64) -> Vector {
        self.map(|x| x * k)
    }

    pub fn div_scalar(&self, k: f64) -> Vector {
        self.map(|x| x / k)
    }

    pub fn map<F>(&self, functor: F) -> Vector
    where
        F: Fn(f64) -> f64,
    {
        Vector { data: self.data.iter().map(|x| functor(*x)).collect() }
    }

    /// Squared Euclidean norm.
    pub fn norm_squared(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// Index of the largest element; the first one wins on ties.
    /// Returns `None` for an empty vector.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &x) in self.data.iter().enumerate() {
            match best {
                Some((_, b)) if x <= b => {}
                _ => best = Some((i, x)),
            }
        }
        best.map(|(i, _)| i)
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector::from_vec(data)
    }
}

impl From<&[f64]> for Vector {
    fn from(data: &[f64]) -> Self {
        Vector::from_vec(data.to_vec())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elementwise_algebra() {
        let a = Vector::from(vec![1.0, 2.0, 3.0]);
        let b = Vector::from(vec![4.0, 5.0, 6.0]);
        assert_eq!(a.add(&b).unwrap().as_slice(), &[5.0, 7.0, 9.0]);
        assert_eq!(b.sub(&a).unwrap().as_slice(), &[3.0, 3.0, 3.0]);
        assert_eq!(a.hadamard(&b).unwrap().as_slice(), &[4.0, 10.0, 18.0]);
        assert_eq!(a.dot(&b).unwrap(), 32.0);
        assert_eq!(a.scale(2.0).as_slice(), &[2.0, 4.0, 6.0]);
        assert_eq!(b.div_scalar(2.0).as_slice(), &[2.0, 2.5, 3.0]);
    }

    #[test]
    fn hadamard_commutes() {
        let a = Vector::from(vec![0.5, -1.25, 3.0]);
        let b = Vector::from(vec![2.0, 4.0, -0.1]);
        assert_eq!(a.hadamard(&b).unwrap(), b.hadamard(&a).unwrap());
    }

    #[test]
    fn mismatch_leaves_operands_untouched() {
        let a = Vector::from(vec![1.0, 2.0]);
        let b = Vector::from(vec![1.0, 2.0, 3.0]);
        let err = a.add(&b).unwrap_err();
        assert!(matches!(
            err,
            NnError::DimensionMismatch { left: (2, 1), right: (3, 1), .. }
        ));
        assert!(a.hadamard(&b).is_err());
        assert!(a.sub(&b).is_err());
        assert!(a.dot(&b).is_err());
        assert_eq!(a.as_slice(), &[1.0, 2.0]);
        assert_eq!(b.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(Vector::from(vec![0.1, 0.9, 0.9, 0.2]).argmax(), Some(1));
        assert_eq!(Vector::from(vec![-3.0]).argmax(), Some(0));
        assert_eq!(Vector::zeros(0).argmax(), None);
    }
}
