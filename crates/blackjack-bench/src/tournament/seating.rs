use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// One seed per seat, drawn from a stream keyed by the table seed so that
/// seats never share a random stream and a run replays exactly.
pub fn agent_seeds(base_seed: u64, seats: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(base_seed);
    (0..seats).map(|_| rng.next_u64()).collect()
}

#[cfg(test)]
mod tests {
    use super::agent_seeds;

    #[test]
    fn seats_get_distinct_stable_seeds() {
        let seeds = agent_seeds(42, 7);
        assert_eq!(seeds.len(), 7);
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(agent_seeds(42, 4), seeds[..4].to_vec());
        assert_ne!(agent_seeds(43, 1)[0], seeds[0]);
    }
}
