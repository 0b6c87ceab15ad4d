use std::sync::Arc;

use num_bigint::{BigInt, BigUint};

use crate::error::{Error, Result};
use crate::generic::{Commitment, ElGamalCiphertext};
use crate::inverse::mod_inverse;
use crate::params::GroupParameters;

/// An ElGamal participant owning one keypair `(x, h = g^x mod p)`.
#[derive(Debug, Clone)]
pub struct PkeClient {
    pub(crate) params: Arc<GroupParameters>,
    pub(crate) x: BigUint,
    pub(crate) h: BigUint,
}

impl PkeClient {
    /// Sample a fresh private exponent from the shared randomness source.
    pub fn new(params: Arc<GroupParameters>) -> Self {
        let x = params.sample_exponent();
        let h = params.g().modpow(&x, params.p());
        PkeClient { params, x, h }
    }

    /// Build a client around a known private exponent `x` in `[0, p)`.
    pub fn from_secret(params: Arc<GroupParameters>, x: BigUint) -> Result<Self> {
        params.check_element(&x)?;
        let h = params.g().modpow(&x, params.p());
        Ok(PkeClient { params, x, h })
    }

    pub fn params(&self) -> &Arc<GroupParameters> {
        &self.params
    }

    pub fn public_key(&self) -> &BigUint {
        &self.h
    }

    pub fn secret_key(&self) -> &BigUint {
        &self.x
    }

    /// Check `h == g^x mod p`.
    pub fn is_consistent(&self) -> bool {
        self.params.g().modpow(&self.x, self.params.p()) == self.h
    }

    /// Draw a single-use commitment `r` uniformly modulo `p`.
    pub fn commit(&self) -> Commitment {
        Commitment {
            r: self.params.sample_exponent(),
        }
    }

    /// Encrypt `msg` in `[0, p)` for `recipient` as `(g^r, h_recipient^r * msg)`.
    pub fn encrypt(
        &self,
        msg: &BigUint,
        commitment: &Commitment,
        recipient: &PkeClient,
    ) -> Result<ElGamalCiphertext> {
        let p = self.params.p();
        self.params.check_element(msg)?;
        self.params.check_element(&commitment.r)?;
        if recipient.params.p() != p || recipient.params.g() != self.params.g() {
            return Err(Error::InvalidParameters(
                "recipient belongs to a different group".into(),
            ));
        }

        let c0 = self.params.g().modpow(&commitment.r, p);
        let c1 = (recipient.h.modpow(&commitment.r, p) * msg) % p;

        Ok(ElGamalCiphertext { c0, c1 })
    }

    /// Decrypt with this client's own private exponent.
    pub fn decrypt(&self, ct: &ElGamalCiphertext) -> Result<BigUint> {
        self.decrypt_with(ct, &BigInt::from(self.x.clone()))
    }

    /// Decrypt with an explicit exponent: `c1 * (c0^key)^-1 mod p`.
    ///
    /// A key that does not match the ciphertext yields a wrong element, not an error.
    pub fn decrypt_with(&self, ct: &ElGamalCiphertext, key: &BigInt) -> Result<BigUint> {
        let p = self.params.p();
        self.params.check_element(&ct.c0)?;
        self.params.check_element(&ct.c1)?;

        let shared = self.params.pow(&ct.c0, key)?;
        let inv = mod_inverse(&shared, p)?;

        Ok((&ct.c1 * inv) % p)
    }
}
