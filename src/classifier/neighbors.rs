use super::features::FeatureVector;
use super::metric::{lorentzian_distance, pattern_similarity};
use super::store::{Label, SampleStore};
use crate::data::MarketData;

/// Transient per-evaluation view of one qualifying historical sample
#[derive(Debug, Clone, Copy)]
pub struct NeighborCandidate {
    pub distance: f64,
    pub similarity: f64,
    pub label: Label,
}

#[derive(Debug, Clone)]
pub struct NeighborSelector {
    pub neighbors_count: usize,
    pub subsample_stride: usize,
    pub min_pattern_similarity: f64,
    pub pattern_window: usize,
}

impl NeighborSelector {
    /// Scan the store, qualify candidates, rank them by pattern similarity
    /// (descending) with Lorentzian distance as tie-break (ascending), and
    /// keep the top K. Returns fewer than K, possibly none, when few qualify.
    pub fn select(
        &self,
        data: &impl MarketData,
        store: &SampleStore,
        current: &FeatureVector,
        current_index: usize,
    ) -> Vec<NeighborCandidate> {
        let mut candidates: Vec<NeighborCandidate> = Vec::new();

        for sample in store.iterate(self.subsample_stride) {
            let label = match sample.label {
                Some(Label::Up) => Label::Up,
                Some(Label::Down) => Label::Down,
                _ => continue,
            };

            let similarity =
                pattern_similarity(data, current_index, sample.bar_index, self.pattern_window);
            if similarity < self.min_pattern_similarity {
                continue;
            }

            candidates.push(NeighborCandidate {
                distance: lorentzian_distance(current, &sample.features),
                similarity,
                label,
            });
        }

        // Stable sort keeps ranking deterministic across identical runs
        candidates.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then(a.distance.total_cmp(&b.distance))
        });
        candidates.truncate(self.neighbors_count);
        candidates
    }
}
