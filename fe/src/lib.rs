//! Inner product functional encryption under DDH, layered on ElGamal.
//!
//! A functional key derived from a weight vector `y` turns the encryption of a
//! vector `x` into `g^<x,y>`, and nothing more about `x`.
//!
//! ```rust
//! use ipfe::traits::FEScheme;
//! use ipfe::{DdhFeScheme, GroupConfig};
//! use num_bigint::BigInt;
//!
//! // Toy p = 73, g = 15 group; use GroupConfig::generated for anything real
//! let params = GroupConfig::default().build().unwrap();
//! let mut scheme = DdhFeScheme::new(2, params.clone()).unwrap();
//!
//! let y = [BigInt::from(3), BigInt::from(2)];
//! let x = [BigInt::from(4), BigInt::from(6)];
//!
//! scheme.key_derive(&y).unwrap();
//! let ct = scheme.encrypt(&x).unwrap();
//! let element = scheme.decrypt(&ct).unwrap();
//!
//! assert_eq!(params.discrete_log(&element, 72), Some(24));
//! ```

mod ddh_fe;
mod elgamal;
mod error;
mod generic;
pub mod inverse;
mod params;
pub mod traits;

pub use ddh_fe::DdhFeScheme;
pub use elgamal::PkeClient;
pub use error::{Error, Result};
pub use generic::{Commitment, ElGamalCiphertext, FeCiphertext, FunctionalSecretKey, KeypairInfo};
pub use params::{
    DEFAULT_SAMPLE_BITS, DEMO_GENERATOR, DEMO_PRIME, GroupConfig, GroupParameters, GroupSource,
    PRIMALITY_REPS, is_generator, is_probable_prime,
};
