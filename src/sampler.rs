use std::collections::BTreeMap;
use std::fmt::Display;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::category::Quota;
use crate::{Error, Result};

/// Draws `count` distinct elements of `pool` uniformly at random, without
/// replacement. Returns fewer than `count` only when the pool is smaller.
pub fn sample<T: Clone, R: Rng + ?Sized>(pool: &[T], count: usize, rng: &mut R) -> Vec<T> {
    pool.choose_multiple(rng, count).cloned().collect()
}

/// Draws the requested number of items from every category pool.
///
/// All or nothing: if any requested category has fewer eligible items than
/// asked for, nothing is drawn and the first such category (in category
/// order) is reported. Categories with a zero count are never looked at.
pub fn sample_quota<C, T, R>(
    pools: &BTreeMap<C, Vec<T>>,
    quota: &Quota<C>,
    rng: &mut R,
) -> Result<Vec<(C, T)>>
where
    C: Ord + Copy + Display,
    T: Clone,
    R: Rng + ?Sized,
{
    for (category, requested) in quota.requested() {
        let available = pools.get(&category).map_or(0, Vec::len);
        if available < requested {
            return Err(Error::NotEnoughProblems {
                category: category.to_string(),
                requested,
                available,
            });
        }
    }

    let mut picked = Vec::with_capacity(quota.total());
    for (category, requested) in quota.requested() {
        let pool = pools.get(&category).map(Vec::as_slice).unwrap_or_default();
        debug!(%category, requested, available = pool.len(), "sampling category");
        picked.extend(
            sample(pool, requested, rng)
                .into_iter()
                .map(|item| (category, item)),
        );
    }
    Ok(picked)
}
