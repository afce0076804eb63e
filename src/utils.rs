use ndarray::prelude::*;
use ndarray::Data;
use std::cmp::Ordering;

/// True when each value is no greater than its successor.
///
/// Only adjacent pairs are compared, so a sentinel `NaN` never makes a column
/// look unsorted; callers reject missing values separately.
pub fn is_sorted_ascending<S>(values: &ArrayBase<S, Ix1>) -> bool
where
    S: Data<Elem = f64>,
{
    values
        .iter()
        .zip(values.iter().skip(1))
        .all(|(current, next)| current.partial_cmp(next) != Some(Ordering::Greater))
}

/// Stable ascending permutation of `values`. Equal values keep their
/// relative order.
pub fn sort_permutation<S>(values: &ArrayBase<S, Ix1>) -> Vec<usize>
where
    S: Data<Elem = f64>,
{
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

pub fn contains_missing<S>(values: &ArrayBase<S, Ix1>) -> bool
where
    S: Data<Elem = f64>,
{
    values.iter().any(|x| x.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unsorted_pairs() {
        assert!(is_sorted_ascending(&array![-2., -1., -1., 0.5]));
        assert!(is_sorted_ascending(&Array1::<f64>::zeros(0)));
        assert!(!is_sorted_ascending(&array![0., 2., 1.]));
        assert!(is_sorted_ascending(&array![0., f64::NAN, 1.]));
    }

    #[test]
    fn permutation_is_stable() {
        let values = array![3., 1., 2., 1., 0.];
        assert_eq!(sort_permutation(&values), vec![4, 1, 3, 2, 0]);
    }

    #[test]
    fn finds_missing() {
        assert!(contains_missing(&array![1., f64::NAN]));
        assert!(!contains_missing(&array![1., 2.]));
    }
}
