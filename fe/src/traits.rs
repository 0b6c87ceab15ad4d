use crate::error::Result;
/*
    S : type of an input vector element (plaintext or weight)
    U : cyclic group element
*/

pub trait FEScheme<S, U> {
    type CipherText: FECipherText<U>;
    type SecretKey;

    /// Length of the vectors the scheme was set up for
    fn vector_len(&self) -> usize;
    /// Derive the functional key for `vector` and make it the current one
    fn key_derive(&mut self, vector: &[S]) -> Result<Self::SecretKey>;
    /// Encrypt the given vector under a fresh commitment
    fn encrypt(&self, vector: &[S]) -> Result<Self::CipherText>;
    /// Recover `g^<x,y>` with the current functional key
    fn decrypt(&self, ct: &Self::CipherText) -> Result<U>;
    /// Recover `g^<x,y>` with an explicit key, combined with the current `y`
    fn decrypt_with(&self, ct: &Self::CipherText, key: &Self::SecretKey) -> Result<U>;
}

pub trait FECipherText<U> {
    fn get_c0(&self) -> &U;
    fn get_c1(&self) -> &[U];
}
