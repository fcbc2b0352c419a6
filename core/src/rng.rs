//! Deterministic RNG for battlefield generation
//!
//! The browser seeds it from `getrandom`, tests pass a fixed seed so the same
//! board comes back every time.

/// Trait for random number generation during battle setup
pub trait BattleRng {
    /// Generate a random u32
    fn next_u32(&mut self) -> u32;

    /// Generate a random number in range [0, max)
    fn gen_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Roll a percentage chance
    fn chance(&mut self, percent: u32) -> bool {
        self.gen_range(100) < percent
    }
}

/// XorShift32 RNG - simple, fast, deterministic
#[derive(Debug, Clone)]
pub struct XorShiftRng {
    state: u32,
}

impl XorShiftRng {
    /// Create a new RNG from a u64 seed
    ///
    /// Both halves are folded into the u32 state, which is never 0.
    pub fn seed_from_u64(seed: u64) -> Self {
        let state = ((seed as u32) ^ ((seed >> 32) as u32)).max(1);
        Self { state }
    }
}

impl BattleRng for XorShiftRng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
