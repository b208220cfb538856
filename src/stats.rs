/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Descriptive statistics over a data set.

use crate::error::MathError;
use itertools::Itertools;
use num_traits::Float;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary<T> {
    pub count: usize,
    pub sum: T,
    pub mean: T,
    pub median: T,
    /// Most frequent values, ascending. Every value when all are unique.
    pub mode: Vec<T>,
    /// Sample variance (n - 1); zero for a single value
    pub variance: T,
    pub std_dev: T,
    pub min: T,
    pub max: T,
    pub range: T,
}

fn sorted<T: Float>(data: &[T]) -> Vec<T> {
    data.iter()
        .copied()
        .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .collect()
}

fn non_empty<T>(data: &[T]) -> Result<(), MathError> {
    if data.is_empty() {
        Err(MathError::Empty)
    } else {
        Ok(())
    }
}

pub fn sum<T: Float>(data: &[T]) -> T {
    data.iter().fold(T::zero(), |acc, x| acc + *x)
}

pub fn mean<T: Float>(data: &[T]) -> Result<T, MathError> {
    non_empty(data)?;
    let n = T::from(data.len()).ok_or(MathError::Empty)?;
    Ok(sum(data) / n)
}

pub fn median<T: Float>(data: &[T]) -> Result<T, MathError> {
    non_empty(data)?;
    let s = sorted(data);
    let mid = s.len() / 2;
    if s.len() % 2 == 0 {
        let two = T::one() + T::one();
        Ok((s[mid - 1] + s[mid]) / two)
    } else {
        Ok(s[mid])
    }
}

pub fn mode<T: Float>(data: &[T]) -> Result<Vec<T>, MathError> {
    non_empty(data)?;
    let runs = sorted(data)
        .into_iter()
        .dedup_with_count()
        .collect::<Vec<_>>();
    let best = runs.iter().map(|(n, _)| *n).max().unwrap_or_default();
    Ok(runs
        .into_iter()
        .filter(|(n, _)| *n == best)
        .map(|(_, v)| v)
        .collect())
}

pub fn variance<T: Float>(data: &[T]) -> Result<T, MathError> {
    let m = mean(data)?;
    if data.len() < 2 {
        return Ok(T::zero());
    }
    let n = T::from(data.len() - 1).ok_or(MathError::Empty)?;
    Ok(data.iter().fold(T::zero(), |acc, x| acc + (*x - m).powi(2)) / n)
}

pub fn std_dev<T: Float>(data: &[T]) -> Result<T, MathError> {
    variance(data).map(|v| v.sqrt())
}

pub fn min<T: Float>(data: &[T]) -> Result<T, MathError> {
    data.iter().copied().reduce(T::min).ok_or(MathError::Empty)
}

pub fn max<T: Float>(data: &[T]) -> Result<T, MathError> {
    data.iter().copied().reduce(T::max).ok_or(MathError::Empty)
}

pub fn summarize<T: Float>(data: &[T]) -> Result<Summary<T>, MathError> {
    let min = min(data)?;
    let max = max(data)?;
    Ok(Summary {
        count: data.len(),
        sum: sum(data),
        mean: mean(data)?,
        median: median(data)?,
        mode: mode(data)?,
        variance: variance(data)?,
        std_dev: std_dev(data)?,
        min,
        max,
        range: max - min,
    })
}
