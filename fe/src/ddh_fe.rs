use std::sync::Arc;

use log::debug;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::elgamal::PkeClient;
use crate::error::{Error, Result};
use crate::generic::{Commitment, ElGamalCiphertext, FeCiphertext, FunctionalSecretKey, KeypairInfo};
use crate::params::GroupParameters;
use crate::traits::{FECipherText, FEScheme};

// The weight vector is pinned together with the key derived from it
#[derive(Debug, Clone)]
struct CurrentKey {
    y: Vec<BigInt>,
    key: FunctionalSecretKey,
}

/// Inner product functional encryption over `ℓ` independent ElGamal keypairs.
///
/// Setup and master key generation are the same step: the master secret key is
/// the list of every client's private exponent. The scheme holds at most one
/// functional key at a time; each [`FEScheme::key_derive`] replaces it.
#[derive(Debug, Clone)]
pub struct DdhFeScheme {
    params: Arc<GroupParameters>,
    base: PkeClient,
    clients: Vec<PkeClient>,
    current: Option<CurrentKey>,
}

impl DdhFeScheme {
    /// Set up the scheme for vectors of length `len`, with one fresh keypair per coordinate.
    pub fn new(len: usize, params: Arc<GroupParameters>) -> Result<Self> {
        let clients = (0..len).map(|_| PkeClient::new(params.clone())).collect();
        Self::from_clients(params, clients)
    }

    /// Set up the scheme around existing keypairs, one per coordinate.
    pub fn from_clients(params: Arc<GroupParameters>, clients: Vec<PkeClient>) -> Result<Self> {
        if clients.is_empty() {
            return Err(Error::InvalidParameters(
                "vector length must be at least 1".into(),
            ));
        }
        if clients
            .iter()
            .any(|c| c.params().p() != params.p() || c.params().g() != params.g())
        {
            return Err(Error::InvalidParameters(
                "all clients must share the scheme's group".into(),
            ));
        }

        debug!("DDH inner product FE set up for vectors of length {}", clients.len());
        let base = PkeClient::new(params.clone());

        Ok(DdhFeScheme {
            params,
            base,
            clients,
            current: None,
        })
    }

    pub fn params(&self) -> &Arc<GroupParameters> {
        &self.params
    }

    pub fn clients(&self) -> &[PkeClient] {
        &self.clients
    }

    /// Weight vector of the current functional key
    pub fn weights(&self) -> Option<&[BigInt]> {
        self.current.as_ref().map(|c| c.y.as_slice())
    }

    pub fn functional_key(&self) -> Option<&FunctionalSecretKey> {
        self.current.as_ref().map(|c| &c.key)
    }

    /// Draw the single-use commitment for one encryption.
    pub fn commit(&self) -> Commitment {
        self.base.commit()
    }

    /// Encrypt `x` under a caller supplied commitment, consuming it.
    ///
    /// Two vectors encrypted under the same `r` would reveal `g^(x_i - x'_i)`,
    /// so a commitment cannot be used twice:
    ///
    /// ```compile_fail
    /// use ipfe::{DdhFeScheme, GroupConfig};
    /// use num_bigint::BigInt;
    ///
    /// let params = GroupConfig::default().build().unwrap();
    /// let scheme = DdhFeScheme::new(2, params).unwrap();
    /// let x = [BigInt::from(4), BigInt::from(6)];
    ///
    /// let commitment = scheme.commit();
    /// let first = scheme.encrypt_with_commitment(&x, commitment).unwrap();
    /// let second = scheme.encrypt_with_commitment(&x, commitment).unwrap();
    /// ```
    pub fn encrypt_with_commitment(
        &self,
        x: &[BigInt],
        commitment: Commitment,
    ) -> Result<FeCiphertext> {
        self.check_len(x.len())?;
        self.params.check_element(commitment.value())?;

        let c0 = self.params.g().modpow(commitment.value(), self.params.p());
        let c1 = x
            .iter()
            .zip(&self.clients)
            .map(|(x_i, client)| -> Result<BigUint> {
                let gx_i = self.params.pow_g(x_i)?;
                // The component's own c0 equals the shared one
                Ok(self.base.encrypt(&gx_i, &commitment, client)?.c1)
            })
            .collect::<Result<Vec<BigUint>>>()?;

        Ok(FeCiphertext { c0, c1 })
    }

    /// Inspect every coordinate's keypair, failing on the first one where `h != g^x`.
    pub fn info(&self) -> Result<Vec<KeypairInfo>> {
        self.clients
            .iter()
            .enumerate()
            .map(|(index, client)| {
                if !client.is_consistent() {
                    return Err(Error::KeypairIntegrityFailure { index });
                }
                Ok(KeypairInfo {
                    index,
                    public_key: client.public_key().clone(),
                    secret_key: client.secret_key().clone(),
                })
            })
            .collect()
    }

    fn check_len(&self, actual: usize) -> Result<()> {
        if actual != self.clients.len() {
            return Err(Error::LengthMismatch {
                expected: self.clients.len(),
                actual,
            });
        }
        Ok(())
    }
}

impl FEScheme<BigInt, BigUint> for DdhFeScheme {
    type CipherText = FeCiphertext;
    type SecretKey = FunctionalSecretKey;

    fn vector_len(&self) -> usize {
        self.clients.len()
    }

    fn key_derive(&mut self, y: &[BigInt]) -> Result<FunctionalSecretKey> {
        self.check_len(y.len())?;

        let sk_y = y
            .iter()
            .zip(&self.clients)
            .fold(BigInt::zero(), |acc, (y_i, client)| {
                acc + y_i * BigInt::from(client.secret_key().clone())
            });
        let key = FunctionalSecretKey::new(sk_y);

        self.current = Some(CurrentKey {
            y: y.to_vec(),
            key: key.clone(),
        });
        Ok(key)
    }

    fn encrypt(&self, x: &[BigInt]) -> Result<FeCiphertext> {
        self.check_len(x.len())?;
        self.encrypt_with_commitment(x, self.commit())
    }

    fn decrypt(&self, ct: &FeCiphertext) -> Result<BigUint> {
        let current = self.current.as_ref().ok_or(Error::NoFunctionalKey)?;
        self.decrypt_with(ct, &current.key)
    }

    fn decrypt_with(&self, ct: &FeCiphertext, key: &FunctionalSecretKey) -> Result<BigUint> {
        let current = self.current.as_ref().ok_or(Error::NoFunctionalKey)?;
        self.check_len(ct.get_c1().len())?;

        let p = self.params.p();
        let c1 = ct
            .get_c1()
            .iter()
            .zip(&current.y)
            .try_fold(BigUint::one(), |acc, (c_i, y_i)| {
                self.params.check_element(c_i)?;
                Ok::<_, Error>((acc * self.params.pow(c_i, y_i)?) % p)
            })?;

        let combined = ElGamalCiphertext {
            c0: ct.get_c0().clone(),
            c1,
        };
        self.base.decrypt_with(&combined, key.value())
    }
}
