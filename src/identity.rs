//! Ring members and the identity binder `h = H1(id ‖ X ‖ P_pub)`, shared by
//! the signer (C4) and the verifier (C5) — grounded in the original
//! `Signer::initialize_id`/`id_hash_` computation, generalised into a value
//! type instead of a field recomputed ad hoc in each method.

use crate::curve::Curve;
use crate::error::{Result, RingSigError};
use crate::hash::HashFamily;

/// One ring entry: `(id_i, X_i, Y_i)`.
#[derive(Clone, Debug)]
pub struct RingMember<C: Curve> {
  pub id: String,
  pub x_point: C::G,
  pub y_point: C::G,
}

impl<C: Curve> PartialEq for RingMember<C> {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id && self.x_point == other.x_point && self.y_point == other.y_point
  }
}
impl<C: Curve> Eq for RingMember<C> {}

impl<C: Curve> RingMember<C> {
  pub fn new(id: impl Into<String>, x_point: C::G, y_point: C::G) -> Self {
    RingMember { id: id.into(), x_point, y_point }
  }

  /// `h_i = H1(id_i ‖ X_i ‖ P_pub)`.
  pub fn identity_binder(&self, hashes: &HashFamily, p_pub: C::G) -> C::F {
    identity_binder::<C>(hashes, &self.id, &self.x_point, p_pub)
  }
}

/// Free function form, used both from [`RingMember::identity_binder`] and
/// by a signer computing its own `h` before it has assembled a
/// [`RingMember`] for itself.
pub fn identity_binder<C: Curve>(hashes: &HashFamily, id: &str, x_point: &C::G, p_pub: C::G) -> C::F {
  let mut data = Vec::with_capacity(id.len() + 2 * 65);
  data.extend_from_slice(id.as_bytes());
  data.extend_from_slice(&C::point_to_bytes(x_point));
  data.extend_from_slice(&C::point_to_bytes(&p_pub));
  hashes.h1::<C>(&data)
}

/// Sort a ring ascending by `id` (byte-wise, not locale-aware — §9) and
/// reject it if it is too small or contains a duplicate `id` (I1).
pub fn sort_and_validate_ring<C: Curve>(mut members: Vec<RingMember<C>>) -> Result<Vec<RingMember<C>>> {
  members.sort_by(|a, b| a.id.as_bytes().cmp(b.id.as_bytes()));

  for pair in members.windows(2) {
    if pair[0].id == pair[1].id {
      return Err(RingSigError::Protocol(format!("duplicate ring id: {}", pair[0].id)));
    }
  }
  if members.len() < 2 {
    return Err(RingSigError::Protocol(format!(
      "ring must contain at least 2 members, got {}",
      members.len()
    )));
  }
  Ok(members)
}
