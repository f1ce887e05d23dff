//! Position Key Arithmetic
//!
//! Fractional ordering keys: new cards slot between neighbors without
//! renumbering them. Repeated bisection between the same neighbors
//! halves the gap each time, so `gap_exhausted` flags when a stage
//! needs the renumbering pass before another key is computed.

/// Gap left between keys on append and on renumbering
pub const POSITION_STEP: f64 = 1000.0;

/// Below this gap, bisection is close to f64 resolution and the stage
/// gets resequenced before a new key is assigned
pub const MIN_GAP: f64 = 1e-6;

/// Key for the first card of an empty stage, independent of any other
/// stage's keys
pub fn first_in_stage() -> f64 {
    POSITION_STEP
}

/// Key strictly greater than every existing key in the stage
pub fn append_after(max_existing: f64) -> f64 {
    max_existing + POSITION_STEP
}

/// Key strictly between two neighbors, `prev < next` assumed
pub fn between(prev: f64, next: f64) -> f64 {
    (prev + next) / 2.0
}

/// Key before the current head: synthesizes a predecessor two steps
/// down, then bisects
pub fn at_head(next: f64) -> f64 {
    between(next - 2.0 * POSITION_STEP, next)
}

/// True when the gap between neighbors is too small to keep bisecting
pub fn gap_exhausted(prev: f64, next: f64) -> bool {
    next - prev < MIN_GAP
}

/// Evenly spaced integer keys for renumbering a whole stage
pub fn resequenced(count: usize) -> impl Iterator<Item = f64> {
    (1..=count).map(|i| i as f64 * POSITION_STEP)
}
