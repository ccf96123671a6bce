use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wavemark_types::RegionId;

const ID_LEN: usize = 20;

/// Generates ids for regions the widget creates itself (insert, cut,
/// import): 20 random lowercase letters.
#[derive(Debug)]
pub struct RegionIdGenerator {
    rng: StdRng,
}

impl Default for RegionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionIdGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence, for tests and log replay.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_id(&mut self) -> RegionId {
        let id: String = (0..ID_LEN)
            .map(|_| self.rng.gen_range(b'a'..=b'z') as char)
            .collect();
        RegionId::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_lowercase_letters() {
        let mut ids = RegionIdGenerator::new();
        let id = ids.next_id();
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn seeded_generators_agree() {
        let mut a = RegionIdGenerator::seeded(7);
        let mut b = RegionIdGenerator::seeded(7);
        assert_eq!(a.next_id(), b.next_id());
        assert_ne!(a.next_id(), a.next_id());
    }
}
