use serde::{Deserialize, Serialize};

/// Knobs for the candidate ranking step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Candidates scoring within this distance of the best one are ranked by
    /// how lightly loaded their supervisor is instead of by raw score.
    pub tie_threshold: f64,
    /// When set, a supervisor sharing no words with the student is never a
    /// candidate.
    pub require_overlap: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            tie_threshold: 0.1,
            require_overlap: true,
        }
    }
}

/// Bag-of-words overlap between two interest strings, in `0.0..=1.0`.
///
/// A word of `a` counts as common when it contains, or is contained in, some
/// word of `b` (so "network" and "networking" match). The count is divided by
/// the longer word list, which keeps the score bounded by one.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let words_a: Vec<&str> = a.split_whitespace().collect();
    let words_b: Vec<&str> = b.split_whitespace().collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let common = words_a.iter()
        .filter(|wa| words_b.iter().any(|wb| wb.contains(*wa) || wa.contains(wb)))
        .count();

    common as f64 / words_a.len().max(words_b.len()) as f64
}

/// One supervisor still open to the student being placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Position of the supervisor in the working capacity table.
    pub index: usize,
    pub score: f64,
    /// Remaining slots over maximum slots.
    pub free_ratio: f64,
}

/// Picks the winning candidate.
///
/// Everything scoring less than `tie_threshold` below the top score forms the
/// tie window; inside it the larger free ratio wins, then the higher score,
/// then the earlier table position. Outside the window score alone decides,
/// so the winner always comes from the window.
pub fn select(candidates: &[Candidate], config: &MatchConfig) -> Option<Candidate> {
    let top = candidates.iter()
        .map(|c| c.score)
        .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))))?;

    candidates.iter()
        .filter(|c| top - c.score < config.tie_threshold || c.score == top)
        .fold(None, |best: Option<&Candidate>, c| match best {
            Some(b) if !outranks(c, b) => Some(b),
            _ => Some(c),
        })
        .copied()
}

fn outranks(c: &Candidate, incumbent: &Candidate) -> bool {
    c.free_ratio
        .total_cmp(&incumbent.free_ratio)
        .then_with(|| c.score.total_cmp(&incumbent.score))
        .then_with(|| incumbent.index.cmp(&c.index))
        .is_gt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(index: usize, score: f64, free_ratio: f64) -> Candidate {
        Candidate { index, score, free_ratio }
    }

    #[test]
    fn similarity_of_empty_text_is_zero() {
        assert_eq!(similarity("", "machine learning"), 0.0);
        assert_eq!(similarity("machine learning", ""), 0.0);
        assert_eq!(similarity("   ", "machine learning"), 0.0);
        assert_eq!(similarity("", ""), 0.0);
    }

    #[test]
    fn similarity_counts_partial_words_both_ways() {
        // "network" is inside "networking", "systems" contains "system"
        assert_eq!(similarity("network system", "networking systems"), 1.0);
        assert_eq!(similarity("networking systems", "network system"), 1.0);
    }

    #[test]
    fn similarity_divides_by_longer_list() {
        // 3 of 5 student words appear, supervisor has 4 words
        let s = similarity("machine learning and neural networks", "deep learning neural networks");
        assert!((s - 0.6).abs() < 1e-12);
        // 1 common word, longer list has 4 words
        let s = similarity("security", "cloud security and privacy");
        assert!((s - 0.25).abs() < 1e-12);
    }

    #[test]
    fn similarity_ignores_case() {
        assert_eq!(similarity("Machine LEARNING", "machine learning"), 1.0);
    }

    #[test]
    fn similarity_without_overlap_is_zero() {
        assert_eq!(similarity("machine learning", "database systems"), 0.0);
    }

    #[test]
    fn select_on_empty_is_none() {
        assert_eq!(select(&[], &MatchConfig::default()), None);
    }

    #[test]
    fn close_scores_prefer_less_loaded_supervisor() {
        let cands = [candidate(0, 0.55, 0.2), candidate(1, 0.50, 1.0)];
        assert_eq!(select(&cands, &MatchConfig::default()).unwrap().index, 1);
    }

    #[test]
    fn distant_scores_ignore_load() {
        let cands = [candidate(0, 1.0, 0.1), candidate(1, 0.5, 1.0)];
        assert_eq!(select(&cands, &MatchConfig::default()).unwrap().index, 0);
    }

    #[test]
    fn window_is_anchored_on_top_score() {
        // 0.62 and 0.53 are within 0.1 of each other but 0.53 is far below 0.7
        let cands = [
            candidate(0, 0.70, 0.1),
            candidate(1, 0.62, 0.9),
            candidate(2, 0.53, 1.0),
        ];
        assert_eq!(select(&cands, &MatchConfig::default()).unwrap().index, 1);
    }

    #[test]
    fn equal_ratio_falls_back_to_score_then_position() {
        let cands = [candidate(0, 0.50, 0.5), candidate(1, 0.55, 0.5)];
        assert_eq!(select(&cands, &MatchConfig::default()).unwrap().index, 1);
        let cands = [candidate(0, 0.5, 0.5), candidate(1, 0.5, 0.5)];
        assert_eq!(select(&cands, &MatchConfig::default()).unwrap().index, 0);
    }

    #[test]
    fn zero_threshold_is_pure_score_order() {
        let config = MatchConfig { tie_threshold: 0.0, ..MatchConfig::default() };
        let cands = [candidate(0, 0.55, 0.2), candidate(1, 0.50, 1.0)];
        assert_eq!(select(&cands, &config).unwrap().index, 0);
    }
}
