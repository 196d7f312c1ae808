//! Fracture criteria: decide whether a boundary entity opens.

use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::topology::point::EntityKey;

/// Decides whether a codimension-1 entity with two element parents opens.
///
/// Implemented for any `FnMut(EntityKey, f64) -> bool`, so a closure can be
/// injected wherever a criterion is expected.
pub trait FractureCriterion {
    fn is_open(&mut self, entity: EntityKey, probability: f64) -> bool;
}

impl<F> FractureCriterion for F
where
    F: FnMut(EntityKey, f64) -> bool,
{
    fn is_open(&mut self, entity: EntityKey, probability: f64) -> bool {
        self(entity, probability)
    }
}

/// Seeded Bernoulli trial: opens with the given probability.
///
/// The generator is consumed once per queried entity, so a fixed seed and a
/// fixed iteration order reproduce the same open set.
#[derive(Clone, Debug)]
pub struct BernoulliCriterion {
    rng: SmallRng,
}

impl BernoulliCriterion {
    pub fn new(seed: u64) -> Self {
        BernoulliCriterion {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl FractureCriterion for BernoulliCriterion {
    fn is_open(&mut self, _entity: EntityKey, probability: f64) -> bool {
        self.rng.gen_range(0.0..1.0) < probability
    }
}

/// Opens exactly the listed entities.
#[derive(Clone, Debug, Default)]
pub struct ForcedCriterion {
    keys: BTreeSet<EntityKey>,
}

impl ForcedCriterion {
    pub fn new(keys: impl IntoIterator<Item = EntityKey>) -> Self {
        ForcedCriterion {
            keys: keys.into_iter().collect(),
        }
    }
}

impl FractureCriterion for ForcedCriterion {
    fn is_open(&mut self, entity: EntityKey, _probability: f64) -> bool {
        self.keys.contains(&entity)
    }
}
