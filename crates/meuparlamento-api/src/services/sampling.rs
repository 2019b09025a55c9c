//! Balanced random sampling of proposals.
//!
//! A batch draws about 60% of its proposals from government-authored
//! proposals and 40% from opposition-authored ones. Each cohort is
//! over-drawn by one so that the shuffled, truncated batch still reaches the
//! target size when both cohorts have enough proposals.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::hash::Hash;

/// Share of a batch drawn from government proposals, in percent.
pub const GOVERNMENT_SHARE_PERCENT: usize = 60;

/// Share of a batch drawn from opposition proposals, in percent.
pub const OPPOSITION_SHARE_PERCENT: usize = 40;

/// Per-cohort draw sizes for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePlan {
    pub target: usize,
    pub government: usize,
    pub opposition: usize,
}

impl SamplePlan {
    /// Plan a batch of `target` proposals, `None` when `target <= 0`.
    pub fn for_target(target: i64) -> Option<Self> {
        let target = usize::try_from(target).ok().filter(|t| *t > 0)?;

        Some(Self {
            target,
            government: target.saturating_mul(GOVERNMENT_SHARE_PERCENT) / 100 + 1,
            opposition: target.saturating_mul(OPPOSITION_SHARE_PERCENT) / 100 + 1,
        })
    }
}

/// Combine both cohorts into a shuffled batch of at most `target` proposals.
///
/// A proposal flagged as both government and opposition may be drawn by
/// both cohorts; only the first occurrence of each `key` is kept.
pub fn assemble_batch<T, K, R>(
    government: Vec<T>,
    opposition: Vec<T>,
    target: usize,
    key: impl Fn(&T) -> K,
    rng: &mut R,
) -> Vec<T>
where
    K: Eq + Hash,
    R: Rng + ?Sized,
{
    let mut seen = HashSet::new();
    let mut batch: Vec<T> = government
        .into_iter()
        .chain(opposition)
        .filter(|item| seen.insert(key(item)))
        .collect();

    batch.shuffle(rng);
    batch.truncate(target);
    batch
}
