use super::neighbors::NeighborCandidate;
use super::store::Label;

/// Normalized directional probabilities. Both are zero when no neighbor
/// qualified; otherwise they sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probabilities {
    pub long: f64,
    pub short: f64,
}

impl Probabilities {
    pub fn zero() -> Self {
        Self {
            long: 0.0,
            short: 0.0,
        }
    }
}

/// Similarity-weighted vote over the neighbor set
pub fn aggregate(neighbors: &[NeighborCandidate]) -> Probabilities {
    let mut long_weight = 0.0;
    let mut short_weight = 0.0;
    for neighbor in neighbors {
        match neighbor.label {
            Label::Up => long_weight += neighbor.similarity,
            Label::Down => short_weight += neighbor.similarity,
            Label::Flat => {}
        }
    }

    let total = long_weight + short_weight;
    if total <= 0.0 {
        return Probabilities::zero();
    }

    Probabilities {
        long: long_weight / total,
        short: short_weight / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor(label: Label, similarity: f64) -> NeighborCandidate {
        NeighborCandidate {
            distance: 0.0,
            similarity,
            label,
        }
    }

    #[test]
    fn empty_set_returns_zero_zero() {
        let probs = aggregate(&[]);
        assert_eq!(probs, Probabilities::zero());
    }

    #[test]
    fn probabilities_sum_to_one() {
        let neighbors = vec![
            neighbor(Label::Up, 0.9),
            neighbor(Label::Down, 0.8),
            neighbor(Label::Up, 0.7),
            neighbor(Label::Down, 0.95),
        ];
        let probs = aggregate(&neighbors);
        assert!((probs.long + probs.short - 1.0).abs() < 1e-12);
        assert!(probs.long > 0.0 && probs.short > 0.0);
    }

    #[test]
    fn weights_follow_similarity_not_count() {
        // two weak longs against one strong short
        let neighbors = vec![
            neighbor(Label::Up, 0.1),
            neighbor(Label::Up, 0.1),
            neighbor(Label::Down, 0.9),
        ];
        let probs = aggregate(&neighbors);
        assert!(probs.short > probs.long);
    }

    #[test]
    fn unanimous_set_is_certain() {
        let neighbors = vec![neighbor(Label::Up, 0.8), neighbor(Label::Up, 0.6)];
        let probs = aggregate(&neighbors);
        assert_eq!(probs.long, 1.0);
        assert_eq!(probs.short, 0.0);
    }
}
