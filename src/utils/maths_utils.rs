use argminmax::ArgMinMax;

/// Both extremes in a single call. Caller guarantees `vec` is non-empty.
pub fn get_min_max(vec: &[f64]) -> (f64, f64) {
    let (min_index, max_index) = vec.argminmax();
    (vec[min_index], vec[max_index])
}

/// Arithmetic mean, `sum(x) / count(x)`.
pub fn mean_value(vec: &[f64]) -> f64 {
    let sum: f64 = vec.iter().sum();
    sum / vec.len() as f64
}

/// Population variance from the sum of squares: `mean(x²) - mean²`.
///
/// Single pass over the data, so it loses precision when the values are large
/// compared to their spread. Tiny negative results from rounding are clamped to zero.
pub fn variance(vec: &[f64], mean: f64) -> f64 {
    let sum_of_squares: f64 = vec.iter().map(|x| x * x).sum();
    (sum_of_squares / vec.len() as f64 - mean * mean).max(0.0)
}

pub fn standard_deviation(vec: &[f64], mean: f64) -> f64 {
    variance(vec, mean).sqrt()
}

/// Elementwise accumulation of `src` into `acc`. Lengths must already match.
pub fn add_assign_elementwise(acc: &mut [f64], src: &[f64]) {
    debug_assert_eq!(acc.len(), src.len());
    acc.iter_mut().zip(src).for_each(|(a, s)| *a += s);
}
