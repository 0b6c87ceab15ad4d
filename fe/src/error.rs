use num_bigint::BigUint;
use thiserror::Error;

/// Errors raised by the functional encryption scheme and its ElGamal layer.
///
/// A wrong key, a stale weight vector or a tampered ciphertext is *not* an
/// error: the algebra has no integrity tag, so such inputs decrypt to a
/// well-formed but meaningless group element. Callers needing authenticated
/// encryption must add a MAC on top.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A vector does not have the length the scheme was set up with
    #[error("Vector length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// An input integer lies outside `[0, p)`
    #[error("Invalid group element: {0} is not reduced modulo p")]
    InvalidGroupElement(BigUint),

    /// A stored public key no longer matches `g^x mod p`
    #[error("Keypair integrity failure for client {index}")]
    KeypairIntegrityFailure { index: usize },

    /// The element has no inverse modulo the given modulus
    #[error("Modular inverse undefined: gcd({value}, {modulus}) = {gcd}")]
    ModularInverseUndefined {
        value: BigUint,
        modulus: BigUint,
        gcd: BigUint,
    },

    /// Decryption was requested before any functional key was derived
    #[error("No functional key has been derived")]
    NoFunctionalKey,

    /// The group description or scheme configuration is unusable
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

pub type Result<T> = std::result::Result<T, Error>;
