//! Curl, the ledger's ternary sponge hash.

use crate::trytes;

pub const HASH_LENGTH: usize = 243;
const STATE_LENGTH: usize = 3 * HASH_LENGTH;
const TRUTH_TABLE: [i8; 11] = [1, 0, -1, 2, 1, -1, 0, 2, -1, 1, 0];

#[derive(Clone)]
pub struct Curl {
    state: [i8; STATE_LENGTH],
    rounds: usize,
}

impl Curl {
    pub fn new(rounds: usize) -> Self {
        Self {
            state: [0; STATE_LENGTH],
            rounds,
        }
    }

    /// Absorb trits in rate-sized blocks. An empty input still runs one transform.
    pub fn absorb(&mut self, trits: &[i8]) {
        if trits.is_empty() {
            self.transform();
            return;
        }
        for block in trits.chunks(HASH_LENGTH) {
            self.state[..block.len()].copy_from_slice(block);
            self.transform();
        }
    }

    pub fn squeeze(&mut self) -> [i8; HASH_LENGTH] {
        let mut out = [0; HASH_LENGTH];
        out.copy_from_slice(&self.state[..HASH_LENGTH]);
        self.transform();
        out
    }

    fn transform(&mut self) {
        let mut index = 0usize;
        for _ in 0..self.rounds {
            let scratch = self.state;
            for slot in self.state.iter_mut() {
                let a = scratch[index];
                index = if index < 365 { index + 364 } else { index - 365 };
                let b = scratch[index];
                *slot = TRUTH_TABLE[(a + (b << 2) + 5) as usize];
            }
        }
    }
}

/// Hash a tryte string and return the 81-tryte digest.
pub fn hash(input: &str, rounds: usize) -> String {
    let mut curl = Curl::new(rounds);
    curl.absorb(&trytes::to_trits(input));
    trytes::from_trits(&curl.squeeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_81_trytes() {
        let digest = hash("HELLOWORLD", 81);
        assert_eq!(digest.len(), HASH_LENGTH / 3);
        assert!(digest.chars().all(trytes::is_tryte));
    }

    #[test]
    fn zero_rounds_is_identity_on_the_rate() {
        assert_eq!(hash("ABC", 0), format!("ABC{}", "9".repeat(78)));
    }

    #[test]
    fn rounds_change_the_digest() {
        assert_ne!(hash("IXICHAT", 27), hash("IXICHAT", 81));
        assert_ne!(hash("IXICHAT", 81), hash("IXICHAS", 81));
    }

    #[test]
    fn long_input_absorbs_every_block() {
        let a = "A".repeat(200);
        let mut b = a.clone();
        b.replace_range(190..191, "B");
        // 200 trytes = 600 trits spans three absorb blocks
        assert_ne!(hash(&a, 27), hash(&b, 27));
    }

    #[test]
    fn squeeze_advances_state() {
        let mut curl = Curl::new(27);
        curl.absorb(&trytes::to_trits("SPONGE"));
        let first = curl.squeeze();
        let second = curl.squeeze();
        assert_ne!(first.to_vec(), second.to_vec());
    }
}
