//! Strain names - identifiers for a world and its snapshot lineage

use rand::Rng;

/// Suffix appended to a strain each time it is restored from a snapshot
pub const LINEAGE_SUFFIX: &str = "-F2";

/// `"<PREFIX>-NNNN"` with a four digit number
pub fn generate_strain(prefix: &str, rng: &mut impl Rng) -> String {
    format!("{}-{}", prefix, rng.gen_range(1000..=9999))
}

/// Strain name for a world restored from `strain`
pub fn mutate_strain(strain: &str) -> String {
    format!("{strain}{LINEAGE_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_strain_format() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..50 {
            let strain = generate_strain("NEVILLE", &mut rng);
            let (prefix, number) = strain.split_once('-').expect("dash");
            assert_eq!(prefix, "NEVILLE");
            let n: u32 = number.parse().expect("number");
            assert!((1000..=9999).contains(&n));
        }
    }

    #[test]
    fn test_lineage_accumulates() {
        assert_eq!(mutate_strain("NEVILLE-1234"), "NEVILLE-1234-F2");
        assert_eq!(mutate_strain(&mutate_strain("X-1")), "X-1-F2-F2");
    }
}
