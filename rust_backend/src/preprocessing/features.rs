//! Lag, rolling, and fill computations as pure functions.
//!
//! Each function consumes an ordered slice and returns a new vector; nothing
//! here mutates its input. The caller is responsible for ordering each
//! restaurant's series by hour ascending before applying the lag functions.

/// Shift a series backward by `steps`, positionally.
///
/// The first `steps` entries are undefined.
pub fn lag(series: &[f64], steps: usize) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|i| {
            if i >= steps {
                Some(series[i - steps])
            } else {
                None
            }
        })
        .collect()
}

/// Trailing mean over the current value and up to `window - 1` preceding
/// values. The window shrinks at the start of the series; minimum size 1.
pub fn trailing_mean(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..series.len())
        .map(|i| {
            let start = i.saturating_sub(window - 1);
            let slice = &series[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Fill undefined entries from the next defined value.
pub fn backward_fill(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = series.to_vec();
    let mut next = None;
    for value in out.iter_mut().rev() {
        match value {
            Some(v) => next = Some(*v),
            None => *value = next,
        }
    }
    out
}

/// Fill undefined entries from the previous defined value.
pub fn forward_fill(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = series.to_vec();
    let mut prev = None;
    for value in out.iter_mut() {
        match value {
            Some(v) => prev = Some(*v),
            None => *value = prev,
        }
    }
    out
}

/// Round to two decimal places, the precision used for stored rolling means.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lag_by_one_shifts_positionally() {
        let lagged = lag(&[10.0, 20.0, 30.0], 1);
        assert_eq!(lagged, vec![None, Some(10.0), Some(20.0)]);
    }

    #[test]
    fn lag_beyond_length_is_all_undefined() {
        assert_eq!(lag(&[1.0, 2.0], 24), vec![None, None]);
    }

    #[test]
    fn trailing_mean_shrinks_at_series_start() {
        let means = trailing_mean(&[10.0, 20.0, 10.0, 20.0], 3);
        assert_eq!(means[0], 10.0);
        assert_eq!(means[1], 15.0);
        assert!((means[2] - 40.0 / 3.0).abs() < 1e-12);
        assert!((means[3] - 50.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn backward_then_forward_fill_defines_everything_when_possible() {
        let series = vec![None, Some(2.0), None, Some(4.0), None];
        let filled = forward_fill(&backward_fill(&series));
        assert_eq!(
            filled,
            vec![Some(2.0), Some(2.0), Some(4.0), Some(4.0), Some(4.0)]
        );
    }

    #[test]
    fn fills_leave_all_none_series_undefined() {
        let series = vec![None, None];
        assert_eq!(forward_fill(&backward_fill(&series)), vec![None, None]);
    }

    #[test]
    fn round2_truncates_to_cents() {
        assert_eq!(round2(40.0 / 3.0), 13.33);
        assert_eq!(round2(15.0), 15.0);
    }
}
