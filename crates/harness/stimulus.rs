use rand::{RngCore, SeedableRng, rngs::StdRng};
use tracing::debug;
use wordcheck_common::{
    OperandVector, Word256,
    constants::{BYTE_INDEX_MODULUS, SHIFT_AMOUNT_MODULUS, WORD_BYTES},
    ops,
};

use crate::config::StimulusConfig;

/// Words at the edges of the unsigned, signed, byte-index and shift domains.
pub const BOUNDARY_WORDS: [Word256; 11] = [
    Word256::ZERO,
    Word256::ONE,
    Word256::from_u64(2),
    Word256::from_u64(31),
    Word256::from_u64(32),
    Word256::from_u64(255),
    Word256::from_u64(256),
    Word256::SIGNED_MAX,
    Word256::SIGN_BIT,
    Word256::from_limbs([u64::MAX - 1, u64::MAX, u64::MAX, u64::MAX]),
    Word256::MAX,
];

/// Every `(x, y)` pair of [`BOUNDARY_WORDS`], with `z` rotating through the
/// same set.
pub fn boundary_vectors() -> Vec<OperandVector> {
    let n = BOUNDARY_WORDS.len();
    let mut vectors = Vec::with_capacity(n * n);
    for (i, x) in BOUNDARY_WORDS.iter().enumerate() {
        for (j, y) in BOUNDARY_WORDS.iter().enumerate() {
            let z = BOUNDARY_WORDS[(i + j) % n];
            vectors.push(OperandVector::new(*x, *y, z));
        }
    }
    vectors
}

/// Produces operand vectors from a ChaCha-based generator.
///
/// Full-range words almost never exercise `Byte`/`SignExtend` indices below
/// 32 or shift amounts below 256, so a leading share of the vectors get their
/// `y` reduced modulo 255, and the share after that modulo 30.
pub struct StimulusGenerator {
    rng: StdRng,
    seed: u64,
    byte_index_fraction: f64,
    shift_fraction: f64,
    include_boundaries: bool,
}

impl StimulusGenerator {
    pub fn new(config: &StimulusConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| StdRng::from_entropy().next_u64());
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            byte_index_fraction: config.byte_index_fraction,
            shift_fraction: config.shift_fraction,
            include_boundaries: config.include_boundaries,
        }
    }

    /// Seed in use. Passing it back through the configuration replays the run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn random_word(&mut self) -> Word256 {
        let mut bytes = [0u8; WORD_BYTES];
        self.rng.fill_bytes(&mut bytes);
        Word256::from_be_bytes(bytes)
    }

    /// Generates `count` random vectors, preceded by the boundary corpus when
    /// enabled.
    pub fn generate(&mut self, count: usize) -> Vec<OperandVector> {
        let mut vectors = if self.include_boundaries {
            boundary_vectors()
        } else {
            Vec::new()
        };
        vectors.reserve(count);

        let byte_index_count = leading_share(count, self.byte_index_fraction);
        let shift_count = leading_share(count, self.shift_fraction).min(count - byte_index_count);
        let byte_index_modulus = Word256::from_u64(BYTE_INDEX_MODULUS);
        let shift_modulus = Word256::from_u64(SHIFT_AMOUNT_MODULUS);

        for i in 0..count {
            let x = self.random_word();
            let mut y = self.random_word();
            let z = self.random_word();
            if i < byte_index_count {
                y = ops::modulo(y, byte_index_modulus);
            } else if i < byte_index_count + shift_count {
                y = ops::modulo(y, shift_modulus);
            }
            vectors.push(OperandVector::new(x, y, z));
        }

        debug!(
            seed = self.seed,
            random = count,
            byte_index_restricted = byte_index_count,
            shift_restricted = shift_count,
            total = vectors.len(),
            "Generated operand vectors"
        );
        vectors
    }
}

/// Absorbs the rounding of fractions such as 1/6 before flooring.
const SHARE_EPSILON: f64 = 1e-9;

#[allow(clippy::as_conversions)]
fn leading_share(count: usize, fraction: f64) -> usize {
    ((count as f64 * fraction + SHARE_EPSILON).floor() as usize).min(count)
}
