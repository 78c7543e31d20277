//! Quantile breakpoints and severity classification.

use crime_atlas_crime_models::{QuantileThresholds, SeverityBin};

use crate::index::RegionIndex;

/// Fractional positions of the four interior cuts.
const CUT_FRACTIONS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

/// Computes breakpoints over the strictly positive rates in `index`.
///
/// Returns `None` when no record has a positive rate.
#[must_use]
pub fn compute_thresholds(index: &RegionIndex) -> Option<QuantileThresholds> {
    thresholds_from_rates(index.records().map(|r| r.rate()))
}

/// Computes breakpoints over an arbitrary collection of rates.
///
/// Zero, negative and NaN rates are ignored. Each cut `qk` is the element at
/// zero-based index `floor(n * fraction)` of the ascending sorted rates, so
/// small collections repeat values across cuts (`n = 3` gives `q2 == q3`).
#[must_use]
pub fn thresholds_from_rates(rates: impl IntoIterator<Item = f64>) -> Option<QuantileThresholds> {
    let mut sorted: Vec<f64> = rates.into_iter().filter(|r| *r > 0.0).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let [q1, q2, q3, q4] = CUT_FRACTIONS.map(|f| at_fraction(&sorted, f));

    Some(QuantileThresholds {
        min: sorted[0],
        q1,
        q2,
        q3,
        q4,
        max: sorted[sorted.len() - 1],
    })
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn at_fraction(sorted: &[f64], fraction: f64) -> f64 {
    let idx = (sorted.len() as f64 * fraction).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Classifies `rate` against `thresholds`.
///
/// A zero rate, or missing thresholds, is [`SeverityBin::None`].
#[must_use]
#[allow(clippy::float_cmp)]
pub fn classify(rate: f64, thresholds: Option<&QuantileThresholds>) -> SeverityBin {
    let Some(t) = thresholds else {
        return SeverityBin::None;
    };
    if rate == 0.0 {
        return SeverityBin::None;
    }

    if rate >= t.q4 {
        SeverityBin::VeryHigh
    } else if rate >= t.q3 {
        SeverityBin::High
    } else if rate >= t.q2 {
        SeverityBin::MediumHigh
    } else if rate >= t.q1 {
        SeverityBin::MediumLow
    } else {
        SeverityBin::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crime_atlas_crime_models::{CrimeRecord, GeoLevel};

    fn index_with_rates(rates: &[Option<f64>]) -> RegionIndex {
        RegionIndex::build(
            rates.iter().enumerate().map(|(i, rate)| CrimeRecord {
                geo: format!("Provincia {i:02} Region {i}"),
                total_incidents: 0,
                population: 0,
                rate_per_thousand: *rate,
                categories_count: None,
            }),
            GeoLevel::Province,
        )
    }

    fn assert_ordered(t: &QuantileThresholds) {
        assert!(t.min <= t.q1, "{t:?}");
        assert!(t.q1 <= t.q2, "{t:?}");
        assert!(t.q2 <= t.q3, "{t:?}");
        assert!(t.q3 <= t.q4, "{t:?}");
        assert!(t.q4 <= t.max, "{t:?}");
    }

    #[test]
    fn three_rates_repeat_cuts() {
        let t = thresholds_from_rates([10.0, 1.0, 5.0]).unwrap();
        assert_eq!(
            t,
            QuantileThresholds {
                min: 1.0,
                q1: 1.0,
                q2: 5.0,
                q3: 5.0,
                q4: 10.0,
                max: 10.0,
            }
        );
    }

    #[test]
    fn ten_rates() {
        let rates: Vec<f64> = (1..=10).rev().map(f64::from).collect();
        let t = thresholds_from_rates(rates).unwrap();
        assert_eq!(t.min, 1.0);
        assert_eq!(t.q1, 3.0);
        assert_eq!(t.q2, 5.0);
        assert_eq!(t.q3, 7.0);
        assert_eq!(t.q4, 9.0);
        assert_eq!(t.max, 10.0);
    }

    #[test]
    fn single_rate_fills_every_cut() {
        let t = thresholds_from_rates([4.2]).unwrap();
        for v in [t.min, t.q1, t.q2, t.q3, t.q4, t.max] {
            assert_eq!(v, 4.2);
        }
    }

    #[test]
    fn endpoints_and_ordering_hold_for_many_sizes() {
        for n in 1..=40u32 {
            let rates: Vec<f64> = (0..n).map(|i| f64::from((i * 37) % 17 + 1) * 0.5).collect();
            let mut sorted = rates.clone();
            sorted.sort_by(f64::total_cmp);

            let t = thresholds_from_rates(rates).unwrap();
            assert_eq!(t.min, sorted[0]);
            assert_eq!(t.max, sorted[sorted.len() - 1]);
            assert_ordered(&t);
        }
    }

    #[test]
    fn empty_and_all_zero_have_no_thresholds() {
        assert!(compute_thresholds(&RegionIndex::new()).is_none());
        assert!(compute_thresholds(&index_with_rates(&[Some(0.0), None, Some(0.0)])).is_none());
    }

    #[test]
    fn zero_and_missing_rates_are_excluded() {
        let index = index_with_rates(&[Some(0.0), Some(2.0), None, Some(8.0)]);
        let t = compute_thresholds(&index).unwrap();
        assert_eq!(t.min, 2.0);
        assert_eq!(t.max, 8.0);
    }

    #[test]
    fn zero_rate_is_never_classified() {
        let t = thresholds_from_rates([0.5, 1.0]).unwrap();
        assert_eq!(classify(0.0, Some(&t)), SeverityBin::None);
        assert_eq!(classify(0.0, None), SeverityBin::None);
    }

    #[test]
    fn missing_thresholds_classify_as_none() {
        assert_eq!(classify(12.0, None), SeverityBin::None);
    }

    #[test]
    fn classifies_each_band() {
        let t = thresholds_from_rates((1..=10).map(f64::from)).unwrap();
        assert_eq!(classify(1.0, Some(&t)), SeverityBin::Low);
        assert_eq!(classify(3.0, Some(&t)), SeverityBin::MediumLow);
        assert_eq!(classify(5.5, Some(&t)), SeverityBin::MediumHigh);
        assert_eq!(classify(7.0, Some(&t)), SeverityBin::High);
        assert_eq!(classify(9.0, Some(&t)), SeverityBin::VeryHigh);
        assert_eq!(classify(100.0, Some(&t)), SeverityBin::VeryHigh);
    }

    #[test]
    fn classification_is_monotonic() {
        let t = thresholds_from_rates([0.7, 2.5, 2.5, 4.0, 9.1, 13.0]).unwrap();
        let mut previous = SeverityBin::None;
        for step in 1..=300u32 {
            let rate = f64::from(step) * 0.05;
            let bin = classify(rate, Some(&t));
            assert!(bin >= previous, "rate {rate} gave {bin:?} after {previous:?}");
            previous = bin;
        }
    }
}
