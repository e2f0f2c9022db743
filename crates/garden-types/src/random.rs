//! The pluggable randomness source and sampling helpers.
//!
//! All stochastic behavior in the engine flows through one injected
//! [`RandomSource`] per tick, so a seeded run is reproducible and tests can
//! script exact draws. Only the distributions are normative; no caller may
//! depend on the bit pattern of a particular generator.
//!
//! The derived samplers (weighted picks, position scattering, mutation
//! factors) are free functions over `&mut dyn RandomSource` so the trait
//! stays object-safe.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{GardenBounds, Position};

/// A source of uniform randomness injected into the engine.
///
/// Implementations must produce independent draws; the engine assumes
/// nothing about sequencing beyond "each call consumes one draw".
pub trait RandomSource: Send {
    /// A uniform real in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// A uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    fn next_below(&mut self, bound: u64) -> u64;
}

/// The process-default source: a seedable PRNG over [`StdRng`].
///
/// Seed it from configuration for deterministic replays, or from OS
/// entropy for ordinary runs.
#[derive(Debug)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    /// Create a source from an explicit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a source from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }
}

/// A source that replays a queue of scripted draws, then falls back to a
/// constant.
///
/// Used by tests that need to force a specific branch (a sub-probability
/// wild-spore roll, a zero jitter) without mocking the whole engine.
/// Integer draws are derived from the same queue: `floor(draw * bound)`.
#[derive(Debug)]
pub struct ScriptedSource {
    queue: std::collections::VecDeque<f64>,
    fallback: f64,
}

impl ScriptedSource {
    /// Create a source that pops `draws` in order, then returns `fallback`.
    pub fn new(draws: &[f64], fallback: f64) -> Self {
        Self {
            queue: draws.iter().copied().collect(),
            fallback,
        }
    }

    /// Create a source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(&[], value)
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        self.queue
            .pop_front()
            .unwrap_or(self.fallback)
            .clamp(0.0, 1.0 - f64::EPSILON)
    }

    fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        // Derive from the f64 stream so scripted tests control every draw.
        let draw = self.next_f64();
        let scaled = (draw * bound as f64) as u64;
        scaled.min(bound - 1)
    }
}

/// A uniform real in `[lo, hi)`. Returns `lo` when the range is empty.
pub fn range(rng: &mut dyn RandomSource, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return lo;
    }
    lo + rng.next_f64() * (hi - lo)
}

/// A uniform integer in `[lo, hi]` (both ends inclusive).
pub fn range_inclusive(rng: &mut dyn RandomSource, lo: u64, hi: u64) -> u64 {
    if hi <= lo {
        return lo;
    }
    lo + rng.next_below(hi - lo + 1)
}

/// Bernoulli trial: true with probability `p`.
pub fn chance(rng: &mut dyn RandomSource, p: f64) -> bool {
    rng.next_f64() < p
}

/// Pick a uniformly random element. Returns `None` on an empty slice.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = rng.next_below(items.len() as u64) as usize;
    items.get(index)
}

/// Pick an element by weight.
///
/// Entries with non-positive weight are rejected. Returns `None` when the
/// input is empty or no weight is positive. Ties on the cumulative walk
/// break in input order.
pub fn pick_weighted<'a, T>(
    rng: &mut dyn RandomSource,
    entries: &'a [(T, f64)],
) -> Option<&'a T> {
    let total: f64 = entries.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.next_f64() * total;
    for (value, weight) in entries {
        if *weight <= 0.0 {
            continue;
        }
        if roll < *weight {
            return Some(value);
        }
        roll -= weight;
    }
    // Floating-point crumbs can leave roll a hair past the last weight.
    entries
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|(value, _)| value)
}

/// Fisher-Yates shuffle driven by the injected source.
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    if items.len() < 2 {
        return;
    }
    for i in (1..items.len()).rev() {
        let j = rng.next_below(i as u64 + 1) as usize;
        items.swap(i, j);
    }
}

/// A uniformly random position inside the garden rectangle.
pub fn random_position(rng: &mut dyn RandomSource, bounds: GardenBounds) -> Position {
    Position {
        x: rng.next_f64() * bounds.width,
        y: rng.next_f64() * bounds.height,
    }
}

/// A position scattered near a parent: uniform angle, uniform radius in
/// `[0, radius]`, clamped to the garden rectangle.
pub fn position_near(
    rng: &mut dyn RandomSource,
    parent: Position,
    radius: f64,
    bounds: GardenBounds,
) -> Position {
    let angle = rng.next_f64() * std::f64::consts::TAU;
    let r = rng.next_f64() * radius.max(0.0);
    bounds.clamp(Position {
        x: parent.x + angle.cos() * r,
        y: parent.y + angle.sin() * r,
    })
}

/// Multiply a value by a uniform factor in `[1 - range, 1 + range]`.
pub fn apply_mutation(rng: &mut dyn RandomSource, value: f64, mutation_range: f64) -> f64 {
    let factor = range(rng, 1.0 - mutation_range, 1.0 + mutation_range);
    value * factor
}
