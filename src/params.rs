//! System parameters and KGC master state (part of component C3), plus
//! their persisted textual forms (§6's public/private system files).
//! Modelled on the serialize/deserialize pair of the teacher's
//! `MultisigKeys` in `key_gen.rs`, but textual (hex-inside-JSON) rather
//! than the teacher's length-prefixed binary form, as SPEC_FULL.md §6
//! requires a deterministic, textual, versioned format.

use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::curve::{self, Curve};
use crate::error::{Result, RingSigError};
use crate::hash::HashFamily;

const STATE_VERSION: u32 = 1;
const HASH_KEY_LEN: usize = 16;

/// Parameters every party needs: the master public key, the hash
/// parameterisation, and the digest tag. Immutable once built (§3
/// lifecycle), `Clone` and safe to share across threads.
#[derive(Clone)]
pub struct SystemParams<C: Curve> {
  hash_alg: String,
  p_pub: C::G,
  hashes: HashFamily,
}

impl<C: Curve> SystemParams<C> {
  pub fn p_pub(&self) -> C::G {
    self.p_pub
  }

  pub fn hashes(&self) -> &HashFamily {
    &self.hashes
  }

  pub fn hash_alg(&self) -> &str {
    &self.hash_alg
  }

  pub fn to_public_state(&self) -> KgcPublicState {
    KgcPublicState {
      version: STATE_VERSION,
      curve_id: curve_id_string::<C>(),
      hash_alg: self.hash_alg.clone(),
      p_pub: curve::point_to_hex::<C>(&self.p_pub),
      hash_keys: hash_keys_hex(self.hashes.keys()),
    }
  }

  pub fn from_public_state(state: &KgcPublicState) -> Result<Self> {
    check_curve_tag::<C>(&state.curve_id)?;
    let p_pub = curve::point_from_hex::<C>(&state.p_pub)?;
    let keys = hash_keys_from_hex(&state.hash_keys)?;
    let hashes = HashFamily::new(&state.hash_alg, keys)?;
    Ok(SystemParams { hash_alg: state.hash_alg.clone(), p_pub, hashes })
  }
}

/// The KGC's private master scalar, held only by the KGC (§3, §4.3).
#[derive(Clone)]
pub struct MasterSecret<C: Curve> {
  s: C::F,
  p_pub: C::G,
}

impl<C: Curve> MasterSecret<C> {
  pub fn s(&self) -> C::F {
    self.s
  }

  pub fn p_pub(&self) -> C::G {
    self.p_pub
  }

  pub fn to_private_state(&self) -> KgcPrivateState {
    KgcPrivateState {
      version: STATE_VERSION,
      curve_id: curve_id_string::<C>(),
      p_pub: curve::point_to_hex::<C>(&self.p_pub),
      s: curve::scalar_to_hex::<C>(&self.s),
    }
  }

  pub fn from_private_state(state: &KgcPrivateState) -> Result<Self> {
    check_curve_tag::<C>(&state.curve_id)?;
    let p_pub = curve::point_from_hex::<C>(&state.p_pub)?;
    let s = curve::scalar_from_hex::<C>(&state.s)?;
    Ok(MasterSecret { s, p_pub })
  }
}

/// Run Setup once: sample the master secret, derive `P_pub`, and sample five
/// pairwise-distinct hash keys (SPEC_FULL.md §4.3).
pub fn setup<C: Curve, R: RngCore + CryptoRng>(
  hash_alg: &str,
  rng: &mut R,
) -> Result<(SystemParams<C>, MasterSecret<C>)> {
  let s = C::random_nonzero_scalar(rng);
  let p_pub = C::mul(s, C::generator());
  let keys = distinct_hash_keys(rng);
  let hashes = HashFamily::new(hash_alg, keys)?;

  Ok((
    SystemParams { hash_alg: hash_alg.to_string(), p_pub, hashes },
    MasterSecret { s, p_pub },
  ))
}

fn distinct_hash_keys<R: RngCore + CryptoRng>(rng: &mut R) -> [Vec<u8>; 5] {
  loop {
    let keys: [Vec<u8>; 5] = core::array::from_fn(|_| {
      let mut buf = [0u8; HASH_KEY_LEN];
      rng.fill_bytes(&mut buf);
      buf.to_vec()
    });
    if (0..5).all(|i| ((i + 1)..5).all(|j| keys[i] != keys[j])) {
      return keys;
    }
  }
}

fn curve_id_string<C: Curve>() -> String {
  String::from_utf8(C::ID.to_vec()).expect("curve IDs are ASCII")
}

fn check_curve_tag<C: Curve>(curve_id: &str) -> Result<()> {
  if curve_id.as_bytes() != C::ID {
    return Err(RingSigError::Config(format!(
      "persisted state is for curve '{curve_id}', this build is compiled for '{}'",
      curve_id_string::<C>()
    )));
  }
  Ok(())
}

fn hash_keys_hex(keys: &[Vec<u8>; 5]) -> [String; 5] {
  core::array::from_fn(|i| hex::encode_upper(&keys[i]))
}

fn hash_keys_from_hex(keys: &[String; 5]) -> Result<[Vec<u8>; 5]> {
  let mut out: [Vec<u8>; 5] = Default::default();
  for (i, k) in keys.iter().enumerate() {
    out[i] = hex::decode(k).map_err(|e| RingSigError::Encoding(format!("bad hash key hex: {e}")))?;
  }
  Ok(out)
}

/// Public system file (§6): `{version, curve_id, hash_alg, p_pub, hash_keys[5]}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KgcPublicState {
  pub version: u32,
  pub curve_id: String,
  pub hash_alg: String,
  pub p_pub: String,
  pub hash_keys: [String; 5],
}

/// Private master file (§6): `{version, curve_id, p_pub, s}`. Never leaves the KGC.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KgcPrivateState {
  pub version: u32,
  pub curve_id: String,
  pub p_pub: String,
  pub s: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::curve::Secp256k1;
  use rand_core::OsRng;

  #[test]
  fn setup_satisfies_p_pub_relation() {
    let (params, secret) = setup::<Secp256k1, _>("SHA-256", &mut OsRng).unwrap();
    assert_eq!(Secp256k1::mul(secret.s(), Secp256k1::generator()), secret.p_pub());
    assert_eq!(params.p_pub(), secret.p_pub());
  }

  #[test]
  fn public_state_round_trips() {
    let (params, _) = setup::<Secp256k1, _>("SHA-256", &mut OsRng).unwrap();
    let state = params.to_public_state();
    let restored = SystemParams::<Secp256k1>::from_public_state(&state).unwrap();
    assert_eq!(restored.p_pub(), params.p_pub());
    assert_eq!(restored.hash_alg(), params.hash_alg());
  }

  #[test]
  fn private_state_round_trips() {
    let (_, secret) = setup::<Secp256k1, _>("SHA-256", &mut OsRng).unwrap();
    let state = secret.to_private_state();
    let restored = MasterSecret::<Secp256k1>::from_private_state(&state).unwrap();
    assert_eq!(restored.s(), secret.s());
  }

  #[test]
  fn mismatched_curve_tag_is_rejected() {
    let (params, _) = setup::<Secp256k1, _>("SHA-256", &mut OsRng).unwrap();
    let mut state = params.to_public_state();
    state.curve_id = "some-other-curve".into();
    assert!(SystemParams::<Secp256k1>::from_public_state(&state).is_err());
  }

  #[test]
  fn setup_samples_pairwise_distinct_hash_keys() {
    let (params, _) = setup::<Secp256k1, _>("SHA-256", &mut OsRng).unwrap();
    let keys = params.hashes().keys();
    for i in 0..5 {
      for j in (i + 1)..5 {
        assert_ne!(keys[i], keys[j]);
      }
    }
  }
}
