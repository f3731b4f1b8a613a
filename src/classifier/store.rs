use std::collections::VecDeque;

use super::features::FeatureVector;
use crate::data::MarketData;

/// Resolved forward direction of a historical bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Up,
    Down,
    /// Forward move stayed inside the volatility noise band
    Flat,
}

impl Label {
    /// Volatility-relative labeling: a move smaller than `threshold` is
    /// noise regardless of sign.
    pub fn from_forward_return(change: f64, threshold: f64) -> Label {
        if !change.is_finite() || !threshold.is_finite() {
            return Label::Flat;
        }
        if change.abs() < threshold {
            return Label::Flat;
        }
        if change > 0.0 {
            Label::Up
        } else if change < 0.0 {
            Label::Down
        } else {
            Label::Flat
        }
    }
}

/// A stored feature vector awaiting (or holding) its forward label
#[derive(Debug, Clone)]
pub struct HistoricalSample {
    pub bar_index: usize,
    pub features: FeatureVector,
    pub label: Option<Label>,
}

impl HistoricalSample {
    /// Eligible as a neighbor candidate: label resolved and directional
    pub fn is_eligible(&self) -> bool {
        matches!(self.label, Some(Label::Up) | Some(Label::Down))
    }
}

/// Bounded chronological buffer of historical samples. Oldest samples are
/// evicted first once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct SampleStore {
    samples: VecDeque<HistoricalSample>,
    capacity: usize,
}

impl SampleStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append an unresolved sample for the given bar
    pub fn append(&mut self, bar_index: usize, features: FeatureVector) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(HistoricalSample {
            bar_index,
            features,
            label: None,
        });
    }

    /// Assign labels to samples whose forward horizon has elapsed. Labels
    /// are computed once and frozen.
    pub fn resolve_labels(
        &mut self,
        data: &impl MarketData,
        current_index: usize,
        future_bars: usize,
        sensitivity: f64,
    ) {
        for sample in self.samples.iter_mut() {
            if sample.label.is_some() {
                continue;
            }
            let i = sample.bar_index;
            if i + future_bars > current_index {
                // chronological order: nothing later is resolvable either
                break;
            }
            let entry = data.close(i);
            if !entry.is_finite() || entry == 0.0 {
                sample.label = Some(Label::Flat);
                continue;
            }
            let change = (data.close(i + future_bars) - entry) / entry;
            let threshold = data.volatility(i) * sensitivity;
            sample.label = Some(Label::from_forward_return(change, threshold));
        }
    }

    /// Force a label in tests that need direct control over eligibility
    #[cfg(test)]
    pub(crate) fn set_label(&mut self, bar_index: usize, label: Label) {
        if let Some(sample) = self.samples.iter_mut().find(|s| s.bar_index == bar_index) {
            sample.label = Some(label);
        }
    }

    /// Lazy pass over stored samples at every `stride`-th chronological
    /// position. Eligibility filtering is the caller's concern.
    pub fn iterate(&self, stride: usize) -> impl Iterator<Item = &HistoricalSample> {
        self.samples
            .iter()
            .enumerate()
            .filter(move |(pos, _)| pos % stride == 0)
            .map(|(_, sample)| sample)
    }
}
