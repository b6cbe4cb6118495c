//! Selection operators for genetic programming.
//!
//! Selection decides which individuals reproduce and which survive verbatim.
//! Deviation is minimized, so "best" always means the lowest score. Parents
//! are drawn by tournament; the top and bottom of the ranking are carried
//! over unchanged (elitism plus explicit diversity preservation).

// Percentages and population sizes convert through f64
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use rand::Rng;
use rand::seq::index;

/// Tournament selection: sample `k` distinct individuals and return the index
/// of the one with the lowest deviation.
///
/// `k` is clamped into `1..=deviations.len()`. Among equal deviations the
/// first sampled individual wins. Returns 0 for an empty population.
#[must_use]
pub fn tournament_select<R: Rng>(deviations: &[f64], k: usize, rng: &mut R) -> usize {
    let pop_size = deviations.len();
    if pop_size == 0 {
        return 0;
    }

    let k = k.clamp(1, pop_size);
    index::sample(rng, pop_size, k)
        .into_iter()
        .min_by(|&a, &b| deviations[a].total_cmp(&deviations[b]))
        .unwrap_or(0)
}

/// Indices ordered by ascending deviation; equal scores keep population order.
#[must_use]
pub fn rank(deviations: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..deviations.len()).collect();
    order.sort_by(|&a, &b| deviations[a].total_cmp(&deviations[b]));
    order
}

/// Index of the lowest deviation, if any.
#[must_use]
pub fn best_index(deviations: &[f64]) -> Option<usize> {
    deviations
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

/// How the next generation's slots are split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    /// Top-ranked individuals copied unchanged.
    pub elite: usize,
    /// Bottom-ranked individuals copied unchanged.
    pub worst: usize,
    /// Slots filled by breeding.
    pub offspring: usize,
}

impl Retention {
    /// Split `population_size` slots by the elite and worst percentages.
    ///
    /// Both counts are floored. If they would exceed the population together,
    /// the worst count gives way so the total stays `population_size`.
    #[must_use]
    pub fn new(population_size: usize, best_percent: f64, worst_percent: f64) -> Self {
        let elite = percent_of(population_size, best_percent).min(population_size);
        let worst = percent_of(population_size, worst_percent).min(population_size - elite);
        Self {
            elite,
            worst,
            offspring: population_size - elite - worst,
        }
    }
}

fn percent_of(count: usize, percent: f64) -> usize {
    (percent.max(0.0) * count as f64 / 100.0).floor() as usize
}

/// Indices of the elite and worst survivors for a ranked population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survivors {
    /// Best individuals, best first.
    pub elite: Vec<usize>,
    /// Worst individuals, in ranking order.
    pub worst: Vec<usize>,
}

/// Pick the individuals that pass to the next generation unchanged.
#[must_use]
pub fn select_survivors(deviations: &[f64], retention: Retention) -> Survivors {
    let ranked = rank(deviations);
    let elite_count = retention.elite.min(ranked.len());
    let worst_count = retention.worst.min(ranked.len() - elite_count);

    Survivors {
        elite: ranked[..elite_count].to_vec(),
        worst: ranked[ranked.len() - worst_count..].to_vec(),
    }
}

/// Summary statistics of a population's deviations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionStats {
    /// Mean deviation.
    pub mean: f64,
    /// Lowest deviation.
    pub best: f64,
    /// Highest deviation.
    pub worst: f64,
    /// Standard deviation of the deviations.
    pub std_dev: f64,
}

impl SelectionStats {
    /// Calculate statistics from deviation values.
    ///
    /// Deviations saturate at `f64::MAX`, so sums are taken in scaled form
    /// to stay finite.
    #[must_use]
    pub fn from_deviations(deviations: &[f64]) -> Self {
        if deviations.is_empty() {
            return Self {
                mean: 0.0,
                best: 0.0,
                worst: 0.0,
                std_dev: 0.0,
            };
        }

        let n = deviations.len() as f64;
        let mean: f64 = deviations.iter().map(|d| d / n).sum();
        let best = deviations.iter().copied().fold(f64::INFINITY, f64::min);
        let worst = deviations.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let scale = worst - best;
        let std_dev = if scale > 0.0 {
            let scaled_variance: f64 = deviations
                .iter()
                .map(|d| {
                    let diff = (d - mean) / scale;
                    diff * diff / n
                })
                .sum();
            scale * scaled_variance.sqrt()
        } else {
            0.0
        };

        Self {
            mean,
            best,
            worst,
            std_dev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_tournament_selection_prefers_fitter() {
        let mut rng = SmallRng::seed_from_u64(42);
        let deviations = vec![0.9, 0.5, 0.1, 0.8, 0.2];

        let mut counts = [0usize; 5];
        for _ in 0..1000 {
            counts[tournament_select(&deviations, 3, &mut rng)] += 1;
        }

        let max_idx = counts.iter().enumerate().max_by_key(|(_, c)| **c).unwrap().0;
        assert_eq!(max_idx, 2);
        // The worst individual can never win a 3-way tournament of distinct entrants
        assert_eq!(counts[0], 0);
    }

    #[test]
    fn test_full_tournament_is_pure_elitism() {
        let mut rng = SmallRng::seed_from_u64(9);
        let deviations = vec![3.0, 1.0, 4.0, 1.5, 9.0, 2.6];
        for _ in 0..100 {
            assert_eq!(tournament_select(&deviations, deviations.len(), &mut rng), 1);
        }
    }

    #[test]
    fn test_rank_is_stable() {
        let deviations = vec![2.0, 1.0, 2.0, 0.5];
        assert_eq!(rank(&deviations), vec![3, 1, 0, 2]);
        assert_eq!(best_index(&deviations), Some(3));
        assert_eq!(best_index(&[]), None);
    }

    #[test]
    fn test_retention_counts() {
        let r = Retention::new(100, 10.0, 10.0);
        assert_eq!(
            r,
            Retention {
                elite: 10,
                worst: 10,
                offspring: 80,
            }
        );

        // Floors rather than rounds
        let r = Retention::new(15, 10.0, 10.0);
        assert_eq!((r.elite, r.worst, r.offspring), (1, 1, 13));

        // Zero percent keeps nobody
        let r = Retention::new(50, 0.0, 0.0);
        assert_eq!((r.elite, r.worst, r.offspring), (0, 0, 50));

        let r = Retention::new(10, 60.0, 40.0);
        assert_eq!((r.elite, r.worst, r.offspring), (6, 4, 0));
    }

    #[test]
    fn test_select_survivors() {
        let deviations = vec![0.3, 0.9, 0.1, 0.8, 0.5];
        let retention = Retention {
            elite: 2,
            worst: 1,
            offspring: 2,
        };
        let survivors = select_survivors(&deviations, retention);

        assert_eq!(survivors.elite, vec![2, 0]);
        assert_eq!(survivors.worst, vec![1]);
    }

    #[test]
    fn test_selection_stats() {
        let stats = SelectionStats::from_deviations(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert!((stats.best - 1.0).abs() < f64::EPSILON);
        assert!((stats.worst - 5.0).abs() < f64::EPSILON);
        assert!((stats.std_dev - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_selection_stats_saturated() {
        let stats = SelectionStats::from_deviations(&[f64::MAX, f64::MAX, 0.0]);
        assert!(stats.mean.is_finite());
        assert!(stats.std_dev.is_finite());
    }
}
