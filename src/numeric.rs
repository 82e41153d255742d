use crate::constants::EPSILON;

/// Divide with the denominator floored at [`EPSILON`].
pub(crate) fn safe_div(numerator: f64, denominator: f64) -> f64 {
    numerator / denominator.max(EPSILON)
}

/// Round to a fixed number of decimals. Only used at result boundaries.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Evenly spaced points from `start` to `end` inclusive, computed by index so the grid
/// does not drift.
pub(crate) fn grid(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = if end >= start && step > 0.0 {
        ((end - start) / step + 1e-9).floor() as usize + 1
    } else {
        0
    };
    (0..count).map(move |i| start + step * i as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_is_inclusive() {
        let points: Vec<f64> = grid(18.0, 45.0, 0.5).collect();
        assert_eq!(points.len(), 55);
        assert_eq!(points[0], 18.0);
        assert_eq!(points[54], 45.0);
    }

    #[test]
    fn test_grid_empty_for_inverted_range() {
        assert_eq!(grid(2.0, 1.0, 0.5).count(), 0);
    }

    #[test]
    fn test_safe_div_floors_denominator() {
        assert!(safe_div(1.0, 0.0).is_finite());
        assert_eq!(safe_div(6.0, 3.0), 2.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(23.6666, 1), 23.7);
        assert_eq!(round_to(0.392149, 4), 0.3921);
    }
}
