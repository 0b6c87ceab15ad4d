use std::sync::Arc;

use anyhow::Result;
use ipfe::traits::FEScheme;
use ipfe::{DdhFeScheme, GroupParameters};
use log::{debug, info};
use num_bigint::{BigInt, BigUint};
use rand::{Rng, SeedableRng, rngs::StdRng};

// Demo ranges, not a constraint of the scheme
const WEIGHT_RANGE: std::ops::RangeInclusive<u32> = 1..=7;
const MESSAGE_RANGE: std::ops::RangeInclusive<u32> = 1..=72;
// Largest inner product recovered by exhaustive search
const DLOG_BOUND: u64 = 1 << 20;

pub struct Outcome {
    pub decrypted: BigUint,
    pub expected: BigUint,
    pub inner_product: Option<u64>,
}

pub struct Driver {
    scheme: DdhFeScheme,
    rng: StdRng,
}

impl Driver {
    pub fn new(len: usize, params: Arc<GroupParameters>, seed: Option<u64>) -> Result<Self> {
        let scheme = DdhFeScheme::new(len, params)?;
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Ok(Self { scheme, rng })
    }

    fn random_vector(&mut self, range: std::ops::RangeInclusive<u32>) -> Vec<BigInt> {
        (0..self.scheme.vector_len())
            .map(|_| BigInt::from(self.rng.gen_range(range.clone())))
            .collect()
    }

    pub fn run(&mut self) -> Result<Outcome> {
        for kp in self.scheme.info()? {
            info!("Client {} public key: {}", kp.index + 1, kp.public_key);
            debug!("Client {} private key: {}", kp.index + 1, kp.secret_key);
        }

        let y = self.random_vector(WEIGHT_RANGE);
        let x = self.random_vector(MESSAGE_RANGE);
        info!("Weights y: {:?}", y);
        info!("Message x: {:?}", x);

        let key = self.scheme.key_derive(&y)?;
        debug!("Functional key sk_y: {}", key.value());

        let commitment = self.scheme.commit();
        debug!("Commitment r: {}", commitment.value());
        let ct = self.scheme.encrypt_with_commitment(&x, commitment)?;
        info!("Ciphertext c0: {}", ct.c0);
        for (i, c) in ct.c1.iter().enumerate() {
            info!("Ciphertext c{}: {}", i + 1, c);
        }

        let decrypted = self.scheme.decrypt(&ct)?;

        let ip: BigInt = x.iter().zip(&y).map(|(a, b)| a * b).sum();
        let params = self.scheme.params();
        let expected = params.pow_g(&ip)?;
        let inner_product = params.discrete_log(&decrypted, DLOG_BOUND);

        Ok(Outcome {
            decrypted,
            expected,
            inner_product,
        })
    }
}
