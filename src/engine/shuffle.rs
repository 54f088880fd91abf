use rand::Rng;
use serde::{Deserialize, Serialize};

/// Whether a shuffle may hand back the order it was given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShufflePolicy {
    Uniform,
    #[default]
    AvoidIdentity,
}

impl ShufflePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ShufflePolicy::Uniform => "uniform",
            ShufflePolicy::AvoidIdentity => "avoid-identity",
        }
    }
}

/// Fisher–Yates: walks `i` from the end down to 1, swapping with a uniform
/// pick from `0..=i`. Every permutation is equally likely; the identity
/// included.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(seq: &[T], rng: &mut R) -> Vec<T> {
    let mut out = seq.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// Shuffles under `policy`. `AvoidIdentity` redraws up to `attempts` times
/// while every element of the result is `same` as the input's at that index.
/// A sequence whose elements are all `same` is returned as is.
///
/// `same` must be an equivalence, normally the unit comparison the order is
/// verified with.
pub fn shuffle_with<T, R, F>(
    seq: &[T],
    policy: ShufflePolicy,
    attempts: usize,
    rng: &mut R,
    same: F,
) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
    F: Fn(&T, &T) -> bool,
{
    let mut out = shuffle(seq, rng);
    if policy == ShufflePolicy::Uniform || !seq.windows(2).any(|w| !same(&w[0], &w[1])) {
        return out;
    }
    let mut tries = 1;
    while is_identity(&out, seq, &same) && tries < attempts {
        out = shuffle(seq, rng);
        tries += 1;
    }
    out
}

fn is_identity<T, F: Fn(&T, &T) -> bool>(out: &[T], seq: &[T], same: &F) -> bool {
    out.iter().zip(seq).all(|(a, b)| same(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sorted(mut v: Vec<&str>) -> Vec<&str> {
        v.sort();
        v
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SmallRng::seed_from_u64(7);
        let seq = vec!["a", "b", "b", "c", "d", "e"];
        for _ in 0..50 {
            let out = shuffle(&seq, &mut rng);
            assert_eq!(out.len(), seq.len());
            assert_eq!(sorted(out), sorted(seq.clone()));
        }
    }

    #[test]
    fn test_shuffle_trivial_lengths() {
        let mut rng = SmallRng::seed_from_u64(1);
        let empty: Vec<&str> = Vec::new();
        assert!(shuffle(&empty, &mut rng).is_empty());
        assert_eq!(shuffle(&["only"], &mut rng), vec!["only"]);
    }

    #[test]
    fn test_shuffle_reaches_every_permutation() {
        let mut rng = SmallRng::seed_from_u64(42);
        let seq = [1, 2, 3];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..600 {
            seen.insert(shuffle(&seq, &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_avoid_identity_on_two_elements() {
        let mut rng = SmallRng::seed_from_u64(3);
        let seq = ["first", "second"];
        for _ in 0..100 {
            let out = shuffle_with(&seq, ShufflePolicy::AvoidIdentity, 64, &mut rng, |a, b| a == b);
            assert_eq!(out, vec!["second", "first"]);
        }
    }

    #[test]
    fn test_avoid_identity_gives_up_on_uniform_input() {
        let mut rng = SmallRng::seed_from_u64(3);
        let seq = ["same", "same", "same"];
        let out = shuffle_with(&seq, ShufflePolicy::AvoidIdentity, 8, &mut rng, |a, b| a == b);
        assert_eq!(out, seq.to_vec());
    }

    #[test]
    fn test_avoid_identity_uses_given_equivalence() {
        let mut rng = SmallRng::seed_from_u64(5);
        let trimmed = |a: &&str, b: &&str| a.trim() == b.trim();
        let seq = ["go ", "stop ", "go"];
        for _ in 0..100 {
            let out = shuffle_with(&seq, ShufflePolicy::AvoidIdentity, 64, &mut rng, trimmed);
            // Swapping the two "go" pieces alone is still the same order.
            assert_eq!(out[1].trim(), "go", "dealt {out:?}");
        }

        let repeated = ["go ", "go ", "go"];
        let out = shuffle_with(&repeated, ShufflePolicy::AvoidIdentity, 8, &mut rng, trimmed);
        assert!(out.iter().all(|u| u.trim() == "go"));
    }

    #[test]
    fn test_policy_serde_names() {
        assert_eq!(ShufflePolicy::AvoidIdentity.as_str(), "avoid-identity");
        let parsed: ShufflePolicy = serde_json::from_str("\"uniform\"").unwrap();
        assert_eq!(parsed, ShufflePolicy::Uniform);
    }
}
