//! Known-answer-style determinism checks (§8, "Implementations SHOULD
//! publish known-answer test vectors for (P1) with a fixed KGC RNG trace").
//! This crate has no sibling implementation to compare bit-exact output
//! against, so these pin determinism and the (INV-K) relation rather than
//! a hardcoded hex constant: re-running the exact same seed must reproduce
//! the exact same key material, every time.

use super::common::DeterministicRng;
use crate::curve::{Curve, Secp256k1};
use crate::identity::identity_binder;
use crate::kgc::Kgc;
use crate::params::{self, MasterSecret, SystemParams};
use crate::signer::{ParamsLoaded, Signer};

fn run_fixed_trace(seed: &[u8]) -> (SystemParams<Secp256k1>, MasterSecret<Secp256k1>, <Secp256k1 as Curve>::G, <Secp256k1 as Curve>::F) {
  let mut rng = DeterministicRng::from_seed(seed);
  let (sys_params, secret) = params::setup::<Secp256k1, _>("SHA-256", &mut rng).unwrap();
  let kgc = Kgc::from_master(sys_params.clone(), secret.clone());

  let signer = Signer::<ParamsLoaded, Secp256k1>::new("alice", sys_params.clone());
  let (_signer, request) = signer.generate_partial_key(&mut rng);
  let (y, z) = kgc.issue_partial_key(&request.id, request.x_point, &mut rng).unwrap();

  (sys_params, secret, y, z)
}

#[test]
fn fixed_seed_reproduces_identical_trace() {
  let a = run_fixed_trace(b"known-answer-seed-1");
  let b = run_fixed_trace(b"known-answer-seed-1");

  assert_eq!(a.0.p_pub(), b.0.p_pub());
  assert_eq!(a.1.s(), b.1.s());
  assert_eq!(a.2, b.2);
  assert_eq!(a.3, b.3);
}

#[test]
fn different_seeds_diverge() {
  let a = run_fixed_trace(b"known-answer-seed-1");
  let b = run_fixed_trace(b"known-answer-seed-2");
  assert_ne!(a.1.s(), b.1.s());
}

#[test]
fn fixed_trace_satisfies_inv_k() {
  let (sys_params, _secret, y, z) = run_fixed_trace(b"known-answer-seed-1");

  // Recompute X the same way the trace did, from the same seed, to check
  // z*P == Y + h*P_pub (P1) on a pinned, reproducible trace.
  let mut rng = DeterministicRng::from_seed(b"known-answer-seed-1");
  let (_sys_params_2, _secret2) = params::setup::<Secp256k1, _>("SHA-256", &mut rng).unwrap();
  let signer = Signer::<ParamsLoaded, Secp256k1>::new("alice", sys_params.clone());
  let (_signer, request) = signer.generate_partial_key(&mut rng);

  let h = identity_binder::<Secp256k1>(sys_params.hashes(), "alice", &request.x_point, sys_params.p_pub());
  let lhs = Secp256k1::mul(z, Secp256k1::generator());
  let rhs = y + Secp256k1::mul(h, sys_params.p_pub());
  assert_eq!(lhs, rhs);
}
