use super::features::FeatureVector;
use crate::data::MarketData;

/// Lorentzian distance: `Σ log(1 + |Δd|)` across feature dimensions.
/// Grows sub-linearly per dimension, so one spiking indicator cannot
/// dominate the ranking the way it would under a Euclidean metric.
pub fn lorentzian_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    debug_assert_eq!(a.dimension(), b.dimension());
    a.values()
        .iter()
        .zip(b.values())
        .map(|(x, y)| (x - y).abs().ln_1p())
        .sum()
}

/// Local price-shape closeness between the trailing `window` closes ending
/// at `current_index` and those ending at `sample_index`. Each offset
/// contributes `1 / (1 + |Δprice|)`; the average lands in (0, 1] when the
/// full window is available, with 1 meaning identical shape.
pub fn pattern_similarity(
    data: &impl MarketData,
    current_index: usize,
    sample_index: usize,
    window: usize,
) -> f64 {
    let mut similarity = 0.0;
    for offset in 0..window {
        let (Some(ci), Some(si)) = (
            current_index.checked_sub(offset),
            sample_index.checked_sub(offset),
        ) else {
            break;
        };
        let diff = (data.close(ci) - data.close(si)).abs();
        similarity += 1.0 / (1.0 + diff);
    }
    similarity / window as f64
}
