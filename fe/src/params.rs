use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};
use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_traits::{One, Zero};
use rand::{SeedableRng, rngs::StdRng};

use crate::error::{Error, Result};
use crate::inverse::mod_inverse;

/// Rounds of the probabilistic primality test.
pub const PRIMALITY_REPS: usize = 50;
/// Minimum width in bits of the random samples used for exponents.
pub const DEFAULT_SAMPLE_BITS: u64 = 64;
/// Toy modulus of the reference demo. Do not use outside of tests and demos.
pub const DEMO_PRIME: u64 = 73;
/// Generator of `Z_73^*` paired with [`DEMO_PRIME`].
pub const DEMO_GENERATOR: u64 = 15;

/// Test `n` for primality with `reps` Miller-Rabin rounds.
pub fn is_probable_prime(n: &BigUint, reps: usize) -> bool {
    let n = num_bigint_dig::BigUint::from_bytes_be(&n.to_bytes_be());
    num_bigint_dig::prime::probably_prime(&n, reps)
}

/// Check that `g` generates `Z_p^*`, given the distinct prime factors of `p - 1`.
///
/// A zero factor is not a factorisation and yields `false`.
pub fn is_generator(g: &BigUint, p: &BigUint, prime_factors: &[BigUint]) -> bool {
    if g.is_zero() || g >= p {
        return false;
    }
    let order = p - 1u8;
    prime_factors
        .iter()
        .all(|f| !f.is_zero() && !g.modpow(&(&order / f), p).is_one())
}

/// Description of the cyclic group shared by every client of the scheme.
///
/// Immutable once built, apart from the randomness source which sits behind a
/// mutex so that one `Arc<GroupParameters>` can be shared between threads.
pub struct GroupParameters {
    p: BigUint,
    g: BigUint,
    sample_bits: u64,
    rng: Mutex<StdRng>,
}

impl fmt::Debug for GroupParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupParameters")
            .field("p", &self.p)
            .field("g", &self.g)
            .field("sample_bits", &self.sample_bits)
            .finish_non_exhaustive()
    }
}

impl GroupParameters {
    /// Build parameters from a prime modulus `p` and a generator `g` in `[1, p)`.
    pub fn new(p: BigUint, g: BigUint, rng: StdRng) -> Result<Self> {
        if p < BigUint::from(3u8) || !is_probable_prime(&p, PRIMALITY_REPS) {
            return Err(Error::InvalidParameters(format!("{p} is not an odd prime")));
        }
        if g.is_zero() || g >= p {
            return Err(Error::InvalidParameters(format!(
                "generator {g} is not in [1, {p})"
            )));
        }
        // Orders 1 and 2
        if g.is_one() || g == &p - 1u8 {
            return Err(Error::InvalidParameters(format!(
                "generator {g} spans a trivial subgroup of Z_{p}^*"
            )));
        }

        let sample_bits = DEFAULT_SAMPLE_BITS.max(p.bits());
        Ok(GroupParameters {
            p,
            g,
            sample_bits,
            rng: Mutex::new(rng),
        })
    }

    /// Generate a `bit_length`-bit safe prime `p = 2q + 1` and a generator of `Z_p^*`.
    pub fn generate(bit_length: u64, reps: usize, mut rng: StdRng) -> Result<Self> {
        if bit_length < 3 {
            return Err(Error::InvalidParameters(format!(
                "cannot generate a {bit_length}-bit safe prime"
            )));
        }

        let top = BigUint::one() << (bit_length - 1);
        let mut candidates = 0u64;
        let (p, q) = loop {
            candidates += 1;
            let p = rng.gen_biguint(bit_length) | &top | BigUint::one();
            if p.bits() != bit_length {
                continue;
            }
            let q: BigUint = &p >> 1;
            if is_probable_prime(&q, reps) && is_probable_prime(&p, reps) {
                break (p, q);
            }
        };
        debug!("Found a {bit_length}-bit safe prime after {candidates} candidates");

        let factors = [BigUint::from(2u8), q];
        let upper = &p - 1u8;
        let g = loop {
            let g = rng.gen_biguint_range(&BigUint::from(2u8), &upper);
            if is_generator(&g, &p, &factors) {
                break g;
            }
        };
        info!("Generated a {bit_length}-bit group");

        GroupParameters::new(p, g, rng)
    }

    /// Override the width of the samples drawn by [`Self::sample_exponent`].
    pub fn with_sample_bits(mut self, bits: u64) -> Self {
        self.sample_bits = bits.max(1);
        self
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    pub fn sample_bits(&self) -> u64 {
        self.sample_bits
    }

    /// Draw a uniform integer of at most `bit_length` bits.
    pub fn sample_uniform(&self, bit_length: u64) -> BigUint {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_biguint(bit_length)
    }

    /// Draw a fresh exponent: a `sample_bits` wide sample reduced modulo `p`.
    pub fn sample_exponent(&self) -> BigUint {
        self.sample_uniform(self.sample_bits) % &self.p
    }

    /// Reject integers outside of `[0, p)`.
    pub fn check_element(&self, value: &BigUint) -> Result<()> {
        if value >= &self.p {
            return Err(Error::InvalidGroupElement(value.clone()));
        }
        Ok(())
    }

    /// `base^exponent mod p`, where a negative exponent goes through the inverse of `base`.
    pub fn pow(&self, base: &BigUint, exponent: &BigInt) -> Result<BigUint> {
        match exponent.sign() {
            Sign::Minus => Ok(mod_inverse(base, &self.p)?.modpow(exponent.magnitude(), &self.p)),
            _ => Ok(base.modpow(exponent.magnitude(), &self.p)),
        }
    }

    /// `g^exponent mod p`
    pub fn pow_g(&self, exponent: &BigInt) -> Result<BigUint> {
        self.pow(&self.g, exponent)
    }

    /// Recover `k` in `[0, bound)` such that `g^k = element`, by exhaustive search.
    pub fn discrete_log(&self, element: &BigUint, bound: u64) -> Option<u64> {
        let mut i = 0u64;
        let mut acc = BigUint::one();
        while i < bound && &acc != element {
            i += 1;
            acc = (acc * &self.g) % &self.p;
        }

        if i == bound { None } else { Some(i) }
    }
}

/// Where the group description comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSource {
    /// A caller supplied prime and generator
    Fixed { p: BigUint, g: BigUint },
    /// A freshly generated safe prime group
    Generated { bit_length: u64, reps: usize },
}

/// Configuration of the group parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
    pub source: GroupSource,
    /// Sampling width for exponents, `max(64, bits(p))` when unset
    pub sample_bits: Option<u64>,
    /// Seed for a reproducible randomness stream, OS entropy when unset
    pub seed: Option<u64>,
}

impl Default for GroupConfig {
    /// The toy `p = 73, g = 15` pair of the demo.
    fn default() -> Self {
        GroupConfig {
            source: GroupSource::Fixed {
                p: BigUint::from(DEMO_PRIME),
                g: BigUint::from(DEMO_GENERATOR),
            },
            sample_bits: None,
            seed: None,
        }
    }
}

impl GroupConfig {
    pub fn generated(bit_length: u64) -> Self {
        GroupConfig {
            source: GroupSource::Generated {
                bit_length,
                reps: PRIMALITY_REPS,
            },
            ..GroupConfig::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(&self) -> Result<Arc<GroupParameters>> {
        let rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let params = match &self.source {
            GroupSource::Fixed { p, g } => GroupParameters::new(p.clone(), g.clone(), rng)?,
            GroupSource::Generated { bit_length, reps } => {
                GroupParameters::generate(*bit_length, *reps, rng)?
            }
        };

        Ok(Arc::new(match self.sample_bits {
            Some(bits) => params.with_sample_bits(bits),
            None => params,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_factors() -> Vec<BigUint> {
        // 72 = 2^3 * 3^2
        vec![BigUint::from(2u8), BigUint::from(3u8)]
    }

    #[test]
    fn test_default_config_is_demo_group() {
        let params = GroupConfig::default().with_seed(1).build().unwrap();
        assert_eq!(params.p(), &BigUint::from(73u8));
        assert_eq!(params.g(), &BigUint::from(15u8));
        assert_eq!(params.sample_bits(), 64);
    }

    #[test]
    fn test_demo_generator_is_primitive_root() {
        let p = BigUint::from(73u8);
        assert!(is_generator(&BigUint::from(15u8), &p, &demo_factors()));
        // 2 has order 9 modulo 73
        assert!(!is_generator(&BigUint::from(2u8), &p, &demo_factors()));
    }

    #[test]
    fn test_rejects_composite_modulus() {
        let config = GroupConfig {
            source: GroupSource::Fixed {
                p: BigUint::from(91u8),
                g: BigUint::from(2u8),
            },
            ..GroupConfig::default()
        };
        assert!(matches!(config.build(), Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn test_rejects_generator_out_of_range() {
        for g in [0u8, 73, 100] {
            let config = GroupConfig {
                source: GroupSource::Fixed {
                    p: BigUint::from(73u8),
                    g: BigUint::from(g),
                },
                ..GroupConfig::default()
            };
            assert!(matches!(config.build(), Err(Error::InvalidParameters(_))));
        }
    }

    #[test]
    fn test_rejects_trivial_generator() {
        // g = 1 has order 1 and g = p - 1 has order 2
        for g in [1u8, 72] {
            let config = GroupConfig {
                source: GroupSource::Fixed {
                    p: BigUint::from(73u8),
                    g: BigUint::from(g),
                },
                ..GroupConfig::default()
            };
            assert!(matches!(config.build(), Err(Error::InvalidParameters(_))));
        }
    }

    #[test]
    fn test_zero_factor_is_not_a_factorisation() {
        let p = BigUint::from(73u8);
        let factors = [BigUint::from(2u8), BigUint::zero()];
        assert!(!is_generator(&BigUint::from(15u8), &p, &factors));
    }

    #[test]
    fn test_generate_safe_prime_group() {
        let params = GroupConfig::generated(32).with_seed(7).build().unwrap();
        let p = params.p();
        let q: BigUint = p >> 1;

        assert_eq!(p.bits(), 32);
        assert!(is_probable_prime(p, PRIMALITY_REPS));
        assert!(is_probable_prime(&q, PRIMALITY_REPS));
        assert!(is_generator(params.g(), p, &[BigUint::from(2u8), q]));
    }

    #[test]
    fn test_generate_is_reproducible() {
        let a = GroupConfig::generated(24).with_seed(3).build().unwrap();
        let b = GroupConfig::generated(24).with_seed(3).build().unwrap();
        assert_eq!(a.p(), b.p());
        assert_eq!(a.g(), b.g());
    }

    #[test]
    fn test_generate_rejects_tiny_bit_length() {
        assert!(matches!(
            GroupConfig::generated(2).build(),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_samples_stay_in_range() {
        let params = GroupConfig::default().with_seed(11).build().unwrap();
        for _ in 0..256 {
            assert!(params.sample_exponent() < BigUint::from(73u8));
            assert!(params.sample_uniform(8) < BigUint::from(256u16));
        }
    }

    #[test]
    fn test_check_element() {
        let params = GroupConfig::default().build().unwrap();
        assert!(params.check_element(&BigUint::from(72u8)).is_ok());
        assert_eq!(
            params.check_element(&BigUint::from(73u8)),
            Err(Error::InvalidGroupElement(BigUint::from(73u8)))
        );
    }

    #[test]
    fn test_negative_exponent() {
        let params = GroupConfig::default().build().unwrap();
        let g_inv = params.pow_g(&BigInt::from(-1)).unwrap();
        assert_eq!((g_inv * params.g()) % params.p(), BigUint::one());
        assert_eq!(
            params.pow_g(&BigInt::from(-24)).unwrap(),
            params.pow_g(&BigInt::from(72 - 24)).unwrap()
        );
    }

    #[test]
    fn test_discrete_log() {
        let params = GroupConfig::default().build().unwrap();
        // 15^24 = 8 (mod 73)
        assert_eq!(params.discrete_log(&BigUint::from(8u8), 72), Some(24));
        assert_eq!(params.discrete_log(&BigUint::from(8u8), 24), None);
        assert_eq!(params.discrete_log(&BigUint::one(), 72), Some(0));
    }
}
