//! Shared fixtures for the test suite: a deterministic, counter-mode RNG
//! for known-answer vectors (§8, §9 "remove dual-PRNG anti-pattern" — the
//! *only* place a fixed seed is allowed to reach key generation, and only
//! behind `#[cfg(test)]`), plus small helpers for building an onboarded
//! ring of signers.

use rand_core::{CryptoRng, Error, RngCore};
use sha2::{Digest, Sha256};

use crate::curve::Curve;
use crate::identity::RingMember;
use crate::kgc::Kgc;
use crate::params::{self, SystemParams};
use crate::signer::{FullKeyInstalled, ParamsLoaded, Signer};

/// A deterministic RNG seeded from a byte string, used only so that tests
/// can assert bit-exact reproducibility across two runs with the same
/// seed. Not suitable for anything outside `#[cfg(test)]` — production
/// code only ever accepts `R: RngCore + CryptoRng` from the caller, never
/// constructs one of these itself (§5 "Randomness").
pub struct DeterministicRng {
  seed: [u8; 32],
  counter: u64,
  buffer: Vec<u8>,
}

impl DeterministicRng {
  pub fn from_seed(seed: &[u8]) -> Self {
    let digest: [u8; 32] = Sha256::digest(seed).into();
    DeterministicRng { seed: digest, counter: 0, buffer: Vec::new() }
  }

  fn refill(&mut self) {
    let mut hasher = Sha256::new();
    hasher.update(self.seed);
    hasher.update(self.counter.to_be_bytes());
    self.counter += 1;
    self.buffer = hasher.finalize().to_vec();
  }
}

impl RngCore for DeterministicRng {
  fn next_u32(&mut self) -> u32 {
    rand_core::impls::next_u32_via_fill(self)
  }

  fn next_u64(&mut self) -> u64 {
    rand_core::impls::next_u64_via_fill(self)
  }

  fn fill_bytes(&mut self, dest: &mut [u8]) {
    let mut filled = 0;
    while filled < dest.len() {
      if self.buffer.is_empty() {
        self.refill();
      }
      let take = usize::min(self.buffer.len(), dest.len() - filled);
      dest[filled..filled + take].copy_from_slice(&self.buffer[..take]);
      self.buffer.drain(..take);
      filled += take;
    }
  }

  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
    self.fill_bytes(dest);
    Ok(())
  }
}

impl CryptoRng for DeterministicRng {}

/// Run Setup + onboard `ids.len()` signers against a single KGC, all using
/// the same RNG (any `R: RngCore + CryptoRng`, randomized or deterministic).
pub fn onboard_ring<C: Curve, R: RngCore + CryptoRng>(
  ids: &[&str],
  rng: &mut R,
) -> (SystemParams<C>, Kgc<C>, Vec<Signer<FullKeyInstalled, C>>) {
  let (sys_params, secret) = params::setup::<C, _>("SHA-256", rng).unwrap();
  let kgc = Kgc::from_master(sys_params.clone(), secret);

  let signers = ids
    .iter()
    .map(|id| {
      let signer = Signer::<ParamsLoaded, C>::new(*id, sys_params.clone());
      let (signer, request) = signer.generate_partial_key(rng);
      let (y, z) = kgc.issue_partial_key(&request.id, request.x_point, rng).unwrap();
      signer.install_full_key(y, z).unwrap()
    })
    .collect();

  (sys_params, kgc, signers)
}

pub fn members<C: Curve>(signers: &[Signer<FullKeyInstalled, C>]) -> Vec<RingMember<C>> {
  signers.iter().map(|s| s.public_member()).collect()
}
