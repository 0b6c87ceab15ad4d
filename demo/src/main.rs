use anyhow::Result;
use anyhow::anyhow;
use clap::Parser;
use ipfe::{GroupConfig, GroupSource, PRIMALITY_REPS};
use log::info;
use num_bigint::BigUint;

mod driver;
use driver::Driver;

/// Run one key derivation, encryption and decryption round and check the result.
#[derive(Parser)]
struct Cli {
    /// Length of the plaintext and weight vectors
    #[clap(long, short, default_value_t = 2)]
    len: usize,
    /// Prime modulus of the group (defaults to the toy p = 73)
    #[clap(long, requires = "generator", conflicts_with = "bits")]
    prime: Option<BigUint>,
    /// Generator of the group
    #[clap(long, requires = "prime")]
    generator: Option<BigUint>,
    /// Generate a safe prime group of this many bits instead
    #[clap(long)]
    bits: Option<u64>,
    /// Primality test rounds used when generating a group
    #[clap(long, default_value_t = PRIMALITY_REPS)]
    reps: usize,
    /// Seed for reproducible runs
    #[clap(long)]
    seed: Option<u64>,
}

impl Cli {
    fn group_config(&self) -> GroupConfig {
        let source = match (&self.prime, &self.generator, self.bits) {
            (Some(p), Some(g), _) => GroupSource::Fixed {
                p: p.clone(),
                g: g.clone(),
            },
            (_, _, Some(bit_length)) => GroupSource::Generated {
                bit_length,
                reps: self.reps,
            },
            _ => GroupConfig::default().source,
        };

        GroupConfig {
            source,
            sample_bits: None,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let params = args.group_config().build()?;
    info!("Using group p = {}, g = {}", params.p(), params.g());

    let mut driver = Driver::new(args.len, params, args.seed)?;
    let outcome = driver.run()?;

    println!("Decrypted element: {}", outcome.decrypted);
    println!("Expected element:  {}", outcome.expected);
    if let Some(ip) = outcome.inner_product {
        println!("Inner product:     {}", ip);
    }

    if outcome.decrypted != outcome.expected {
        return Err(anyhow!("Decryption does not match g^<x,y>"));
    }
    Ok(())
}
