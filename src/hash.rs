//! Keyed hash family (component C2): five independent keyed hashes
//! `H0..H4 : bytes -> Z_q`, each realised as an HMAC digest reduced to a
//! scalar. Grounded in the original `Hash::hashToBn` (HMAC-then-BIGNUM) and
//! generalised the way the teacher's `frost::curve::kp256::hash_to_F`
//! reduces a wide digest into the scalar field.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::curve::Curve;
use crate::error::{Result, RingSigError};

type HmacSha256 = Hmac<Sha256>;

/// One of the five call sites `H0..H4`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum HashIndex {
  H0 = 0,
  H1 = 1,
  H2 = 2,
  H3 = 3,
  H4 = 4,
}

/// The five HMAC keys that parameterise `H0..H4`. Keys MUST be distinct
/// byte strings — that's the entire domain-separation mechanism between the
/// five call sites (SPEC_FULL.md §4.2).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HashFamily {
  keys: [Vec<u8>; 5],
}

impl HashFamily {
  /// `hash_alg` is validated here; only SHA-256 is supported today. An
  /// unsupported digest is a configuration error raised at construction
  /// time, never discovered mid-protocol.
  pub fn new(hash_alg: &str, keys: [Vec<u8>; 5]) -> Result<Self> {
    if hash_alg != "SHA-256" {
      return Err(RingSigError::Config(format!("unsupported hash_alg: {hash_alg}")));
    }
    for i in 0..5 {
      for j in (i + 1)..5 {
        if keys[i] == keys[j] {
          return Err(RingSigError::Config(
            "hash keys k0..k4 must be pairwise distinct".into(),
          ));
        }
      }
    }
    Ok(HashFamily { keys })
  }

  pub fn keys(&self) -> &[Vec<u8>; 5] {
    &self.keys
  }

  fn hmac(&self, idx: HashIndex, data: &[u8]) -> [u8; 32] {
    let key = &self.keys[idx as usize];
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
  }

  /// `H_j(data) = int(HMAC(k_j, data)) mod q`.
  pub fn hash<C: Curve>(&self, idx: HashIndex, data: &[u8]) -> C::F {
    C::reduce_wide(&self.hmac(idx, data))
  }

  pub fn h0<C: Curve>(&self, data: &[u8]) -> C::F {
    self.hash::<C>(HashIndex::H0, data)
  }
  pub fn h1<C: Curve>(&self, data: &[u8]) -> C::F {
    self.hash::<C>(HashIndex::H1, data)
  }
  pub fn h2<C: Curve>(&self, data: &[u8]) -> C::F {
    self.hash::<C>(HashIndex::H2, data)
  }
  pub fn h3<C: Curve>(&self, data: &[u8]) -> C::F {
    self.hash::<C>(HashIndex::H3, data)
  }
  pub fn h4<C: Curve>(&self, data: &[u8]) -> C::F {
    self.hash::<C>(HashIndex::H4, data)
  }
}
