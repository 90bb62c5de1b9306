pub(crate) const POI_WINDOW: usize = 5;

/// `num / den`, or `0.0` when `den` is zero so NaN never reaches sorting or statistics.
pub(crate) fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        return 0.0;
    }
    num as f64 / den as f64
}

pub(crate) fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Forward window sum over `values[idx..idx + window]`, divided by the full window length
/// even when the tail holds fewer samples.
pub(crate) fn sliding_average(values: &[f64], idx: usize, window: usize) -> f64 {
    if window == 0 {
        return 0.0;
    }
    let end = idx.saturating_add(window).min(values.len());
    let sum: f64 = values.get(idx..end).map_or(0.0, |w| w.iter().sum());
    sum / window as f64
}

pub(crate) fn second_derivative(values: &[f64], window: usize) -> Vec<f64> {
    if values.len() <= 2 {
        return Vec::new();
    }
    (0..values.len() - 2)
        .map(|i| {
            sliding_average(values, i, window) - 2.0 * sliding_average(values, i + 1, window)
                + sliding_average(values, i + 2, window)
        })
        .collect()
}

/// Index of the first maximum.
pub(crate) fn max_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Value at the peak curvature of an ascending sample array.
pub(crate) fn point_of_interest(sorted: &[f64]) -> Option<f64> {
    let derv = second_derivative(sorted, POI_WINDOW);
    max_index(&derv).and_then(|idx| sorted.get(idx).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(3, 0), 0.0);
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
    }

    #[test]
    fn sliding_average_divides_by_full_window() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(sliding_average(&values, 0, 5), 6.0 / 5.0);
        assert_eq!(sliding_average(&values, 2, 5), 3.0 / 5.0);
        assert_eq!(sliding_average(&values, 3, 5), 0.0);
    }

    #[test]
    fn second_derivative_needs_three_points() {
        assert!(second_derivative(&[0.1, 0.2], 5).is_empty());
        assert_eq!(second_derivative(&[0.0, 0.0, 0.0], 1), vec![0.0]);
        assert_eq!(second_derivative(&[0.0, 1.0, 4.0, 9.0], 1), vec![2.0, 2.0]);
    }

    #[test]
    fn max_index_prefers_first_maximum() {
        assert_eq!(max_index(&[]), None);
        assert_eq!(max_index(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(max_index(&[-2.0, -1.0]), Some(1));
    }

    #[test]
    fn poi_sits_before_the_jump() {
        let sorted = [0.1, 0.1, 0.1, 0.9, 0.95, 1.0];
        assert_eq!(point_of_interest(&sorted), Some(0.1));
        assert_eq!(point_of_interest(&[0.5, 0.6]), None);
    }
}
