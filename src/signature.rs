//! Ring signatures (the output of §4.5) and the verifier (C5, §4.6).
//!
//! Grounded in the `Signer::verify`/`check` routines of the original source,
//! generalised into a pair of free functions the way the teacher exposes
//! Schnorr verification as a free function in `schnorr.rs` rather than a
//! method on a stateful signer — a verifier only ever needs public data.

use group::ff::Field;
use group::Group;

use crate::curve::{self, Curve};
use crate::error::{Result, RingSigError};
use crate::hash::HashFamily;
use crate::identity::{sort_and_validate_ring, RingMember};
use crate::params::SystemParams;

/// `σ = (A_1,…,A_n, φ, ψ, T)` (§4.5 step 10).
#[derive(Clone, Debug)]
pub struct Signature<C: Curve> {
  pub a: Vec<C::G>,
  pub phi: C::F,
  pub psi: C::F,
  pub t: C::G,
}

impl<C: Curve> PartialEq for Signature<C> {
  fn eq(&self, other: &Self) -> bool {
    self.a == other.a && self.phi == other.phi && self.psi == other.psi && self.t == other.t
  }
}
impl<C: Curve> Eq for Signature<C> {}

impl<C: Curve> Signature<C> {
  /// Hex-encoded `(a, phi, psi, t)`, the shape of the `SignatureFile` in §6.
  pub fn to_hex_parts(&self) -> (Vec<String>, String, String, String) {
    (
      self.a.iter().map(curve::point_to_hex::<C>).collect(),
      curve::scalar_to_hex::<C>(&self.phi),
      curve::scalar_to_hex::<C>(&self.psi),
      curve::point_to_hex::<C>(&self.t),
    )
  }

  pub fn from_hex_parts(a: &[String], phi: &str, psi: &str, t: &str) -> Result<Self> {
    let a = a
      .iter()
      .map(|s| curve::point_from_hex::<C>(s))
      .collect::<Result<Vec<_>>>()?;
    Ok(Signature {
      a,
      phi: curve::scalar_from_hex::<C>(phi)?,
      psi: curve::scalar_from_hex::<C>(psi)?,
      t: curve::point_from_hex::<C>(t)?,
    })
  }
}

/// `a_i ← H3(m ‖ evt ‖ id_i ‖ X_i ‖ Y_i ‖ A_i)` — §4.5 steps 3 and 8 use the
/// identical formula for decoys and the signer's own filled-in slot, which
/// is exactly what lets [`verify_strict`] try every index as a candidate
/// signer slot below.
pub(crate) fn decoy_challenge<C: Curve>(
  hashes: &HashFamily,
  m: &[u8],
  evt: &[u8],
  member: &RingMember<C>,
  a_i: &C::G,
) -> C::F {
  let mut data = Vec::new();
  data.extend_from_slice(m);
  data.extend_from_slice(evt);
  data.extend_from_slice(member.id.as_bytes());
  data.extend_from_slice(&C::point_to_bytes(&member.x_point));
  data.extend_from_slice(&C::point_to_bytes(&member.y_point));
  data.extend_from_slice(&C::point_to_bytes(a_i));
  hashes.h3::<C>(&data)
}

fn ring_binding_bytes<C: Curve>(ring: &[RingMember<C>]) -> Vec<u8> {
  let mut data = Vec::new();
  for member in ring {
    data.extend_from_slice(member.id.as_bytes());
    data.extend_from_slice(&C::point_to_bytes(&member.x_point));
    data.extend_from_slice(&C::point_to_bytes(&member.y_point));
  }
  data
}

/// `θ ← H4(m ‖ evt ‖ T ‖ M ‖ N ‖ Σ(id_i‖X_i‖Y_i))` — §4.5 step 6.
pub(crate) fn challenge<C: Curve>(
  hashes: &HashFamily,
  m: &[u8],
  evt: &[u8],
  t: &C::G,
  m_point: &C::G,
  n_point: &C::G,
  ring: &[RingMember<C>],
) -> C::F {
  let mut data = Vec::new();
  data.extend_from_slice(m);
  data.extend_from_slice(evt);
  data.extend_from_slice(&C::point_to_bytes(t));
  data.extend_from_slice(&C::point_to_bytes(m_point));
  data.extend_from_slice(&C::point_to_bytes(n_point));
  data.extend_from_slice(&ring_binding_bytes(ring));
  hashes.h4::<C>(&data)
}

/// Verify `σ` against ring `L` (VER), §4.6. Does not re-derive `θ` — see
/// [`verify_strict`] for the defence-in-depth variant. Any malformed input
/// (wrong-sized ring, identity point, duplicate id, equation mismatch)
/// collapses to `false`, never panics and never returns an error (§7: a
/// verifier predicate has no partial-acceptance outcome).
pub fn verify<C: Curve>(
  params: &SystemParams<C>,
  ring: Vec<RingMember<C>>,
  m: &[u8],
  evt: &[u8],
  sig: &Signature<C>,
) -> bool {
  let ring = match sort_and_validate_ring(ring) {
    Ok(r) => r,
    Err(_) => return false,
  };
  equation_holds(params, &ring, m, evt, sig)
}

/// As [`verify`], but additionally tries every ring index as the candidate
/// signer slot, reconstructing `(M, N, θ)` the way §4.5 steps 5-7 build them
/// for that candidate's decoys, and requires that exactly the (VER)
/// reconstruction holds for at least one slot (§4.6, §9 "θ in verification").
pub fn verify_strict<C: Curve>(
  params: &SystemParams<C>,
  ring: Vec<RingMember<C>>,
  m: &[u8],
  evt: &[u8],
  sig: &Signature<C>,
) -> bool {
  let ring = match sort_and_validate_ring(ring) {
    Ok(r) => r,
    Err(_) => return false,
  };
  if !basic_shape_ok::<C>(&ring, sig) {
    return false;
  }
  if !equation_holds(params, &ring, m, evt, sig) {
    return false;
  }

  let hashes = params.hashes();
  let p_pub = params.p_pub();
  let n = ring.len();

  let a_scalars: Vec<C::F> = ring
    .iter()
    .zip(sig.a.iter())
    .map(|(member, a_i)| decoy_challenge::<C>(hashes, m, evt, member, a_i))
    .collect();
  let h_scalars: Vec<C::F> = ring
    .iter()
    .map(|member| member.identity_binder(hashes, p_pub))
    .collect();

  let sum_a_points: C::G = sig.a.iter().fold(C::G::identity(), |acc, a| acc + *a);

  for candidate in 0..n {
    let mut m_point = C::G::identity();
    let mut n_point = C::G::identity();
    for i in 0..n {
      if i == candidate {
        continue;
      }
      let term = ring[i].x_point + ring[i].y_point + C::mul(h_scalars[i], p_pub);
      m_point += C::mul(a_scalars[i], term);
      n_point += C::mul(a_scalars[i], sig.t);
    }
    let theta = challenge::<C>(hashes, m, evt, &sig.t, &m_point, &n_point, &ring);
    let d_point = m_point + n_point + C::mul(theta, C::generator());
    if d_point == sum_a_points {
      return true;
    }
  }
  false
}

fn basic_shape_ok<C: Curve>(ring: &[RingMember<C>], sig: &Signature<C>) -> bool {
  if ring.len() != sig.a.len() {
    return false;
  }
  if bool::from(sig.t.is_identity()) {
    return false;
  }
  sig.a.iter().all(|a| !bool::from(a.is_identity()))
}

fn equation_holds<C: Curve>(
  params: &SystemParams<C>,
  ring: &[RingMember<C>],
  m: &[u8],
  evt: &[u8],
  sig: &Signature<C>,
) -> bool {
  if !basic_shape_ok::<C>(ring, sig) {
    return false;
  }

  let hashes = params.hashes();
  let p_pub = params.p_pub();
  let e = C::mul(hashes.h0::<C>(evt), C::generator());

  let mut sum_a_points = C::G::identity();
  let mut rhs_members = C::G::identity();
  let mut sum_a_h = C::F::ZERO;

  for (member, a_i) in ring.iter().zip(sig.a.iter()) {
    sum_a_points += *a_i;

    let a_scalar = decoy_challenge::<C>(hashes, m, evt, member, a_i);
    let h_i = member.identity_binder(hashes, p_pub);

    rhs_members += C::mul(a_scalar, member.x_point + member.y_point + sig.t);
    sum_a_h += a_scalar * h_i;
  }

  let rhs = rhs_members + C::mul(sig.psi, e) + C::mul(sum_a_h, p_pub) + C::mul(sig.phi + sig.psi, C::generator());

  sum_a_points == rhs
}
