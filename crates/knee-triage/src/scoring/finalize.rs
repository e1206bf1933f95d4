//! Turns accumulated evidence into a [`ScoringResult`].
//!
//! Two different denominators are in play and both are intentional:
//! probabilities divide by the sum of all seven clamped scores (relative
//! likelihood among the candidates), while severity categories divide by the
//! table's nominal `max_score` (absolute strength of the evidence). A
//! diagnosis can therefore hold 100% probability and still be `low`.

use std::collections::BTreeMap;

use tracing::debug;

use super::diagnosis::Diagnosis;
use super::engine::AccumulatorState;
use super::result::{ContributingFactor, ScoringResult, SeverityCategory};
use super::weights::ScoringConfig;

pub const TOP_FACTOR_LIMIT: usize = 3;

pub(crate) fn finalize(config: &ScoringConfig, state: &AccumulatorState) -> ScoringResult {
    let raw_scores = clamp_scores(&state.scores);
    let probabilities = probabilities(&raw_scores);

    let categories: BTreeMap<Diagnosis, SeverityCategory> = raw_scores
        .iter()
        .map(|(&diagnosis, &score)| {
            (diagnosis, config.severity.classify(score, config.max_score))
        })
        .collect();

    let top_factors = Diagnosis::ALL
        .into_iter()
        .map(|diagnosis| (diagnosis, top_factors(&state.factors, diagnosis)))
        .collect();

    let recommendations = categories
        .iter()
        .filter(|(_, category)| **category != SeverityCategory::Low)
        .map(|(&diagnosis, &category)| {
            (
                diagnosis,
                config.recommendations_for(diagnosis, category).to_vec(),
            )
        })
        .collect();

    debug!(
        total = raw_scores.values().sum::<u32>(),
        factors = state.factors.len(),
        red_flags = state.red_flags.len(),
        "finalized scoring state"
    );

    ScoringResult {
        raw_scores,
        probabilities,
        categories,
        top_factors,
        recommendations,
        red_flags: state.red_flags.clone(),
        has_red_flags: !state.red_flags.is_empty(),
    }
}

/// Negative evidence can pull a diagnosis down to zero but never below it.
pub fn clamp_scores(scores: &BTreeMap<Diagnosis, i32>) -> BTreeMap<Diagnosis, u32> {
    Diagnosis::ALL
        .into_iter()
        .map(|diagnosis| {
            let score = scores.get(&diagnosis).copied().unwrap_or(0);
            (diagnosis, score.max(0).unsigned_abs())
        })
        .collect()
}

/// Integer percentages summing to exactly 100 whenever any score is positive.
///
/// Each share is rounded half away from zero on its own; the rounding drift
/// (`100 - total`) is then added to the first diagnosis, in fixed tag order,
/// that holds the largest rounded share.
pub fn probabilities(scores: &BTreeMap<Diagnosis, u32>) -> BTreeMap<Diagnosis, u32> {
    let sum: u64 = scores.values().map(|score| u64::from(*score)).sum();
    let mut shares: BTreeMap<Diagnosis, u32> = Diagnosis::ALL
        .into_iter()
        .map(|diagnosis| {
            let score = u64::from(scores.get(&diagnosis).copied().unwrap_or(0));
            (diagnosis, rounded_percent(score, sum))
        })
        .collect();

    if sum == 0 {
        return shares;
    }

    let total: i64 = shares.values().map(|share| i64::from(*share)).sum();
    let drift = 100 - total;
    if drift != 0 {
        if let Some(leader) = first_maximum(&shares) {
            if let Some(share) = shares.get_mut(&leader) {
                let corrected = (i64::from(*share) + drift).max(0);
                *share = u32::try_from(corrected).unwrap_or(u32::MAX);
            }
        }
    }
    shares
}

fn rounded_percent(score: u64, sum: u64) -> u32 {
    if sum == 0 {
        return 0;
    }
    // round(score / sum * 100) for non-negative operands, exact in integers.
    let percent = (score * 200 + sum) / (sum * 2);
    u32::try_from(percent).unwrap_or(u32::MAX)
}

fn first_maximum(shares: &BTreeMap<Diagnosis, u32>) -> Option<Diagnosis> {
    let mut leader: Option<(Diagnosis, u32)> = None;
    for diagnosis in Diagnosis::ALL {
        let share = shares.get(&diagnosis).copied().unwrap_or(0);
        match leader {
            Some((_, best)) if share <= best => {}
            _ => leader = Some((diagnosis, share)),
        }
    }
    leader.map(|(diagnosis, _)| diagnosis)
}

/// Highest contributions first; equal scores keep their recording order.
pub fn top_factors(factors: &[ContributingFactor], diagnosis: Diagnosis) -> Vec<ContributingFactor> {
    let mut matching: Vec<ContributingFactor> = factors
        .iter()
        .filter(|factor| factor.diagnosis == diagnosis)
        .cloned()
        .collect();
    matching.sort_by(|a, b| b.score.cmp(&a.score));
    matching.truncate(TOP_FACTOR_LIMIT);
    matching
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [u32; 7]) -> BTreeMap<Diagnosis, u32> {
        Diagnosis::ALL.into_iter().zip(values).collect()
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(0, 5), 0);
    }

    #[test]
    fn zero_sum_yields_all_zero() {
        let shares = probabilities(&scores([0; 7]));
        assert!(shares.values().all(|share| *share == 0));
        assert_eq!(shares.len(), 7);
    }

    #[test]
    fn positive_drift_goes_to_first_maximum() {
        // 33 + 33 + 33 = 99 before correction.
        let shares = probabilities(&scores([1, 1, 1, 0, 0, 0, 0]));
        assert_eq!(shares[&Diagnosis::Pes], 34);
        assert_eq!(shares[&Diagnosis::Pfps], 33);
        assert_eq!(shares[&Diagnosis::Plica], 33);
        assert_eq!(shares.values().sum::<u32>(), 100);
    }

    #[test]
    fn negative_drift_comes_off_first_maximum() {
        // 1/6 -> 17 each for six tags: 102 before correction.
        let shares = probabilities(&scores([1, 1, 1, 1, 1, 1, 0]));
        assert_eq!(shares[&Diagnosis::Pes], 15);
        assert_eq!(shares[&Diagnosis::Saphenous], 17);
        assert_eq!(shares.values().sum::<u32>(), 100);
    }

    #[test]
    fn exact_shares_need_no_correction() {
        let shares = probabilities(&scores([0, 0, 0, 1, 3, 0, 0]));
        assert_eq!(shares[&Diagnosis::Hoffa], 25);
        assert_eq!(shares[&Diagnosis::Meniscus], 75);
    }

    #[test]
    fn clamps_negative_totals() {
        let mut raw = BTreeMap::new();
        raw.insert(Diagnosis::Pes, -4);
        raw.insert(Diagnosis::Meniscus, 6);
        let clamped = clamp_scores(&raw);
        assert_eq!(clamped[&Diagnosis::Pes], 0);
        assert_eq!(clamped[&Diagnosis::Meniscus], 6);
        assert_eq!(clamped[&Diagnosis::Other], 0);
    }
}
