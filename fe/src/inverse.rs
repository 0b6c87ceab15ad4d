use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// Bezout coefficients of `(a, m)`: `a * inverse + m * coinverse = gcd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bezout {
    pub inverse: BigInt,
    pub coinverse: BigInt,
    pub gcd: BigInt,
}

/// Iterative extended Euclid. For `a = 0` this yields `(0, 1, m)`.
pub fn extended_gcd(a: &BigInt, m: &BigInt) -> Bezout {
    let (mut old_r, mut r) = (a.clone(), m.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    Bezout {
        inverse: old_s,
        coinverse: old_t,
        gcd: old_r,
    }
}

/// Return `inv` in `[0, m)` such that `a * inv = 1 (mod m)`.
///
/// Fails loudly when `gcd(a, m) != 1`, which for a prime modulus only
/// happens on `a = 0 (mod m)`. Moduli 0 and 1 are rejected the same way.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m.is_zero() || m.is_one() {
        return Err(Error::ModularInverseUndefined {
            value: a.clone(),
            modulus: m.clone(),
            gcd: if m.is_zero() { a.clone() } else { BigUint::one() },
        });
    }

    let modulus = BigInt::from(m.clone());
    let value = BigInt::from(a % m);
    let bezout = extended_gcd(&value, &modulus);

    if !bezout.gcd.is_one() {
        return Err(Error::ModularInverseUndefined {
            value: a.clone(),
            modulus: m.clone(),
            gcd: bezout.gcd.into_parts().1,
        });
    }

    let inverse = ((bezout.inverse % &modulus) + &modulus) % &modulus;
    Ok(inverse.into_parts().1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_base_case() {
        let b = extended_gcd(&BigInt::zero(), &BigInt::from(73));
        assert_eq!(b.inverse, BigInt::zero());
        assert_eq!(b.coinverse, BigInt::one());
        assert_eq!(b.gcd, BigInt::from(73));
    }

    #[test]
    fn test_bezout_identity() {
        let (a, m) = (BigInt::from(240), BigInt::from(46));
        let b = extended_gcd(&a, &m);
        assert_eq!(b.gcd, BigInt::from(2));
        assert_eq!(&a * &b.inverse + &m * &b.coinverse, b.gcd);
    }

    #[test]
    fn test_inverse_mod_73() {
        // 15 * 39 = 585 = 8 * 73 + 1
        let inv = mod_inverse(&BigUint::from(15u8), &BigUint::from(73u8)).unwrap();
        assert_eq!(inv, BigUint::from(39u8));
    }

    #[test]
    fn test_inverse_of_zero_fails() {
        let err = mod_inverse(&BigUint::zero(), &BigUint::from(73u8)).unwrap_err();
        assert_eq!(
            err,
            Error::ModularInverseUndefined {
                value: BigUint::zero(),
                modulus: BigUint::from(73u8),
                gcd: BigUint::from(73u8),
            }
        );
    }

    #[test]
    fn test_degenerate_modulus_fails() {
        let a = BigUint::from(3u8);
        assert_eq!(
            mod_inverse(&a, &BigUint::zero()).unwrap_err(),
            Error::ModularInverseUndefined {
                value: a.clone(),
                modulus: BigUint::zero(),
                gcd: a.clone(),
            }
        );
        assert!(matches!(
            mod_inverse(&a, &BigUint::one()),
            Err(Error::ModularInverseUndefined { .. })
        ));
    }

    #[test]
    fn test_inverse_composite_modulus_fails() {
        assert!(matches!(
            mod_inverse(&BigUint::from(6u8), &BigUint::from(9u8)),
            Err(Error::ModularInverseUndefined { .. })
        ));
    }

    proptest! {
        #[test]
        fn test_inverse_is_inverse(a in 1u64..18446744073709551557u64) {
            let p = BigUint::from(18446744073709551557u64);
            let a = BigUint::from(a);
            let inv = mod_inverse(&a, &p).unwrap();
            prop_assert!(inv < p);
            prop_assert_eq!((a * inv) % &p, BigUint::one());
        }
    }
}
