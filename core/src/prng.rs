/// Mulberry32: deterministic 32-bit PRNG.
/// Pure function: returns (value_in_0_1, next_state).
///
/// Every procedurally generated quantity (terrain, wind, burst jitter, AI
/// think delays) is drawn from this generator so a seed fully determines the
/// stream on every platform.
pub fn prng_next(state: u32) -> (f64, u32) {
    let mut t = state.wrapping_add(0x6d2b79f5);
    let next_state = t;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    let value = (t ^ (t >> 14)) as f64 / 4294967296.0;
    (value, next_state)
}

/// Stateful wrapper over [`prng_next`] for code that draws many values in
/// sequence (terrain generation, AI pilots).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state, suitable for storing and resuming later.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let (value, next) = prng_next(self.state);
        self.state = next;
        value
    }

    /// Uniform value in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        self.next_f64() * (max - min) + min
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64).floor() as usize).min(len - 1)
    }
}

/// Draw one value from a stored state, advancing it in place.
pub fn draw(state: &mut u32) -> f64 {
    let (value, next) = prng_next(*state);
    *state = next;
    value
}
