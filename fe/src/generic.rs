use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};

use crate::traits::FECipherText;

/// Ephemeral randomness of one encryption, `r` in `[0, p)`.
///
/// Draw a new one for every encryption: reusing `r` breaks semantic security.
/// Not `Clone`, so a vector encryption consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct Commitment {
    pub(crate) r: BigUint,
}

impl Commitment {
    pub fn value(&self) -> &BigUint {
        &self.r
    }
}

/// ElGamal ciphertext `(g^r, h^r * m)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalCiphertext {
    pub c0: BigUint,
    pub c1: BigUint,
}

/// Ciphertext of a whole vector: the shared `g^r` plus one `h_i^r * g^{x_i}` per coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeCiphertext {
    pub c0: BigUint,
    pub c1: Vec<BigUint>,
}

impl FECipherText<BigUint> for FeCiphertext {
    fn get_c0(&self) -> &BigUint {
        &self.c0
    }

    fn get_c1(&self) -> &[BigUint] {
        &self.c1
    }
}

/// Functional key `sk_y = sum(y_i * x_i)`, kept as an unreduced integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalSecretKey {
    pub(crate) sk_y: BigInt,
}

impl FunctionalSecretKey {
    pub fn new(sk_y: BigInt) -> Self {
        FunctionalSecretKey { sk_y }
    }

    pub fn value(&self) -> &BigInt {
        &self.sk_y
    }

    /// Reduce the key modulo the order of `g`.
    ///
    /// Decryption only depends on `sk_y mod ord(g)`, so large instantiations
    /// should decrypt with the reduced key to keep exponents short.
    pub fn reduce_mod(&self, order: &BigUint) -> Self {
        let order = BigInt::from(order.clone());
        FunctionalSecretKey {
            sk_y: ((&self.sk_y % &order) + &order) % &order,
        }
    }
}

/// Read-only view of one coordinate's keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypairInfo {
    pub index: usize,
    pub public_key: BigUint,
    pub secret_key: BigUint,
}
