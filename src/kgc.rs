//! The Key Generation Centre (component C3): issues a partial private key
//! `(Y_i, z_i)` for a signer-chosen `(id_i, X_i)`, per SPEC_FULL.md §4.3.
//!
//! Grounded in the original `KeyGenerator::generatePartialKey` (steps 1-5 of
//! §4.3), but fixes the two bugs the reference implementation has: `y_i` is
//! drawn from the RNG rather than derived as `H2(id || "system_state_" ||
//! seed)`, and `z_i = y_i + h_i·s` is computed in the scalar field rather
//! than with non-modular bignum addition/multiplication (SPEC_FULL.md §9).

use group::Group;
use rand_core::{CryptoRng, RngCore};

use crate::curve::Curve;
use crate::error::{Result, RingSigError};
use crate::identity::identity_binder;
use crate::params::{MasterSecret, SystemParams};

/// Holds the system parameters and the master secret. Constructing one
/// requires having run [`crate::params::setup`] (or reloaded its output),
/// mirroring the teacher's pattern of a protocol role wrapping the state a
/// prior phase produced.
pub struct Kgc<C: Curve> {
  params: SystemParams<C>,
  secret: MasterSecret<C>,
}

impl<C: Curve> Kgc<C> {
  pub fn from_master(params: SystemParams<C>, secret: MasterSecret<C>) -> Self {
    Kgc { params, secret }
  }

  pub fn params(&self) -> &SystemParams<C> {
    &self.params
  }

  /// Issue a partial private key for `(id, X)` (§4.3 steps 1-5).
  ///
  /// `X` is the signer's own contribution (`X_i = x_i·P`); the KGC never
  /// sees `x_i` itself. Returns `(Y_i, z_i)`, which the signer must combine
  /// with its own `x_i` and verify against (INV-K) before trusting it.
  pub fn issue_partial_key<R: RngCore + CryptoRng>(
    &self,
    id: &str,
    x_point: C::G,
    rng: &mut R,
  ) -> Result<(C::G, C::F)> {
    if id.is_empty() {
      return Err(RingSigError::Protocol("signer id must not be empty".into()));
    }
    if bool::from(x_point.is_identity()) {
      return Err(RingSigError::Protocol(
        "signer submitted the identity point as X_i".into(),
      ));
    }

    // Step 2: y_i <-$ Z_q*, Y_i = y_i * P.
    let y = C::random_nonzero_scalar(rng);
    let y_point = C::mul(y, C::generator());

    // Step 3: h_i = H1(id_i || X_i || P_pub).
    let h = identity_binder::<C>(self.params.hashes(), id, &x_point, self.params.p_pub());

    // Step 4: z_i = y_i + h_i * s (mod q).
    let z = y + h * self.secret.s();

    Ok((y_point, z))
  }
}
