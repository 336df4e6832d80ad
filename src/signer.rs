//! The signer side of the protocol (component C4): key agreement (§4.4)
//! and ring signing (§4.5), modelled as a Rust type-state machine the way
//! the teacher chains `KeyGenMachine -> SecretShareMachine -> KeyMachine`
//! in `key_gen.rs` — each lifecycle stage exposes only the operations valid
//! in that stage, and `sign`/`verify_key` only exist on the terminal state.

use core::marker::PhantomData;

use group::ff::Field;
use group::Group;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::curve::{self, Curve};
use crate::error::{Result, RingSigError};
use crate::identity::{identity_binder, sort_and_validate_ring, RingMember};
use crate::params::SystemParams;
use crate::signature::{challenge, decoy_challenge, Signature};

/// `Signer::new` produces a `Signer<ParamsLoaded>` directly; there is no
/// separately-constructible `Fresh` value in this crate's surface (§4.7).
pub struct ParamsLoaded;
pub struct PartialKeyGenerated;
pub struct FullKeyInstalled;

struct PartialKeyMaterial<C: Curve> {
  x: C::F,
  x_point: C::G,
  h: C::F,
}

struct FullKeyMaterial<C: Curve> {
  z: C::F,
  y_point: C::G,
}

/// A signer at lifecycle stage `State`. `State` is a zero-sized marker; the
/// compiler, not a runtime flag, enforces that `sign` only exists once a
/// full key has been installed.
pub struct Signer<State, C: Curve> {
  id: String,
  params: SystemParams<C>,
  partial: Option<PartialKeyMaterial<C>>,
  full: Option<FullKeyMaterial<C>>,
  _state: PhantomData<fn() -> State>,
}

/// Signer -> KGC request of the two-message key agreement protocol (§6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartialKeyRequest {
  pub id: String,
  pub x_point: String,
}

/// KGC -> signer response of the two-message key agreement protocol (§6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartialKeyResponse {
  pub y_point: String,
  pub z: String,
}

/// A completed signer's persisted key material (§4.4, §6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignerKeyFile {
  pub version: u32,
  pub id: String,
  pub x: String,
  pub z: String,
  pub x_point: String,
  pub y_point: String,
}

const SIGNER_FILE_VERSION: u32 = 1;

impl<C: Curve> Signer<ParamsLoaded, C> {
  pub fn new(id: impl Into<String>, params: SystemParams<C>) -> Self {
    Signer { id: id.into(), params, partial: None, full: None, _state: PhantomData }
  }

  /// §4.4 `GeneratePartialKey()`: sample `x`, derive `X = x·P` and
  /// `h = H1(id‖X‖P_pub)`, and return the request the KGC needs.
  pub fn generate_partial_key<R: RngCore + CryptoRng>(
    self,
    rng: &mut R,
  ) -> (Signer<PartialKeyGenerated, C>, PartialKeyRequestMaterial<C>) {
    let x = C::random_nonzero_scalar(rng);
    let x_point = C::mul(x, C::generator());
    let h = identity_binder::<C>(self.params.hashes(), &self.id, &x_point, self.params.p_pub());

    let request = PartialKeyRequestMaterial { id: self.id.clone(), x_point };
    let next = Signer {
      id: self.id,
      params: self.params,
      partial: Some(PartialKeyMaterial { x, x_point, h }),
      full: None,
      _state: PhantomData,
    };
    (next, request)
  }
}

/// The in-process form of [`PartialKeyRequest`] (a `C::G` rather than hex),
/// returned by [`Signer::generate_partial_key`] for callers that keep the
/// KGC in the same process; use [`PartialKeyRequestMaterial::to_wire`] to
/// cross a transport boundary.
#[derive(Clone, Debug)]
pub struct PartialKeyRequestMaterial<C: Curve> {
  pub id: String,
  pub x_point: C::G,
}

impl<C: Curve> PartialKeyRequestMaterial<C> {
  pub fn to_wire(&self) -> PartialKeyRequest {
    PartialKeyRequest { id: self.id.clone(), x_point: curve::point_to_hex::<C>(&self.x_point) }
  }

  pub fn from_wire(wire: &PartialKeyRequest) -> Result<Self> {
    Ok(PartialKeyRequestMaterial {
      id: wire.id.clone(),
      x_point: curve::point_from_hex::<C>(&wire.x_point)?,
    })
  }
}

impl<C: Curve> Signer<PartialKeyGenerated, C> {
  /// §4.4 `InstallFullKey(Y, z)`: checks (INV-K) before accepting.
  pub fn install_full_key(self, y_point: C::G, z: C::F) -> Result<Signer<FullKeyInstalled, C>> {
    let partial = self
      .partial
      .as_ref()
      .expect("a Signer<PartialKeyGenerated> always carries partial key material");

    let lhs = C::mul(z, C::generator());
    let rhs = y_point + C::mul(partial.h, self.params.p_pub());
    if lhs != rhs {
      return Err(RingSigError::Protocol(
        "KGC response fails INV-K: KGC dishonest or transport corrupt".into(),
      ));
    }

    Ok(Signer {
      id: self.id,
      params: self.params,
      partial: self.partial,
      full: Some(FullKeyMaterial { z, y_point }),
      _state: PhantomData,
    })
  }
}

impl<C: Curve> Signer<FullKeyInstalled, C> {
  fn partial(&self) -> &PartialKeyMaterial<C> {
    self.partial.as_ref().expect("Signer<FullKeyInstalled> always carries partial key material")
  }

  fn full(&self) -> &FullKeyMaterial<C> {
    self.full.as_ref().expect("Signer<FullKeyInstalled> always carries full key material")
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn params(&self) -> &SystemParams<C> {
    &self.params
  }

  /// This signer's `(id, X, Y)`, the form it contributes to a ring.
  pub fn public_member(&self) -> RingMember<C> {
    RingMember::new(self.id.clone(), self.partial().x_point, self.full().y_point)
  }

  /// §4.4 `VerifyKey()`: recompute (INV-K). Used by tests and before first
  /// signing; loading from a `SignerKeyFile` does not call this implicitly
  /// (§4.4's persistence note) — callers who want to re-validate on load
  /// call it themselves.
  pub fn verify_key(&self) -> bool {
    let lhs = C::mul(self.full().z, C::generator());
    let rhs = self.full().y_point + C::mul(self.partial().h, self.params.p_pub());
    lhs == rhs
  }

  pub fn to_key_file(&self) -> SignerKeyFile {
    SignerKeyFile {
      version: SIGNER_FILE_VERSION,
      id: self.id.clone(),
      x: curve::scalar_to_hex::<C>(&self.partial().x),
      z: curve::scalar_to_hex::<C>(&self.full().z),
      x_point: curve::point_to_hex::<C>(&self.partial().x_point),
      y_point: curve::point_to_hex::<C>(&self.full().y_point),
    }
  }

  /// Reconstructs a `Signer<FullKeyInstalled>` from a persisted key file
  /// without re-running (INV-K) — see §4.4. Call [`Signer::verify_key`]
  /// afterwards if the caller's storage layer is not already
  /// integrity-protected.
  pub fn from_key_file(params: SystemParams<C>, file: &SignerKeyFile) -> Result<Self> {
    let x = curve::scalar_from_hex::<C>(&file.x)?;
    let z = curve::scalar_from_hex::<C>(&file.z)?;
    let x_point = curve::point_from_hex::<C>(&file.x_point)?;
    let y_point = curve::point_from_hex::<C>(&file.y_point)?;
    let h = identity_binder::<C>(params.hashes(), &file.id, &x_point, params.p_pub());

    Ok(Signer {
      id: file.id.clone(),
      params,
      partial: Some(PartialKeyMaterial { x, x_point, h }),
      full: Some(FullKeyMaterial { z, y_point }),
      _state: PhantomData,
    })
  }

  /// §4.5: produce a ring signature over `m` tagged with event `evt`, the
  /// ring being this signer plus `co_signers`.
  pub fn sign<R: RngCore + CryptoRng>(
    &self,
    m: &[u8],
    evt: &[u8],
    co_signers: Vec<RingMember<C>>,
    rng: &mut R,
  ) -> Result<Signature<C>> {
    let mut members = co_signers;
    members.push(self.public_member());
    let ring = sort_and_validate_ring(members)?;

    let omega = ring.iter().position(|member| member.id == self.id).ok_or_else(|| {
      RingSigError::Protocol("signer's own id is missing from its ring after insertion".into())
    })?;
    let n = ring.len();

    let hashes = self.params.hashes();
    let p_pub = self.params.p_pub();

    // Step 1: event point and linking tag.
    let e_scalar = hashes.h0::<C>(evt);
    let e_point = C::mul(e_scalar, C::generator());
    let t = C::mul(self.partial().x, e_point);

    // Step 2: random gaps.
    let mu = C::random_nonzero_scalar(rng);
    let nu = C::random_nonzero_scalar(rng);

    let mut a_points = vec![C::G::identity(); n];
    let mut a_scalars = vec![C::F::ZERO; n];

    let mut m_point = C::mul(mu + nu, C::generator());
    let mut n_point = C::mul(nu, e_point);

    // Step 3: decoys.
    for (i, member) in ring.iter().enumerate() {
      if i == omega {
        continue;
      }
      let r_i = C::random_nonzero_scalar(rng);
      let a_i = C::mul(r_i, C::generator());
      let a_i_scalar = decoy_challenge::<C>(hashes, m, evt, member, &a_i);
      let h_i = member.identity_binder(hashes, p_pub);

      m_point += C::mul(a_i_scalar, member.x_point + member.y_point + C::mul(h_i, p_pub));
      n_point += C::mul(a_i_scalar, t);

      a_points[i] = a_i;
      a_scalars[i] = a_i_scalar;
    }

    // Step 6: challenge.
    let theta = challenge::<C>(hashes, m, evt, &t, &m_point, &n_point, &ring);

    // Step 7: fill the signer's own slot so that the A_i sum to D.
    let d_point = m_point + n_point + C::mul(theta, C::generator());
    let sum_decoys = a_points
      .iter()
      .enumerate()
      .filter(|(i, _)| *i != omega)
      .fold(C::G::identity(), |acc, (_, a)| acc + *a);
    let a_omega = d_point - sum_decoys;
    a_points[omega] = a_omega;

    // Step 8: signer's own challenge scalar, same formula as the decoys'.
    let a_omega_scalar = decoy_challenge::<C>(hashes, m, evt, &ring[omega], &a_omega);
    a_scalars[omega] = a_omega_scalar;

    // Step 9: response scalars.
    let phi = mu + theta - a_omega_scalar * self.full().z;
    let psi = nu - a_omega_scalar * self.partial().x;

    let _ = a_scalars; // only needed transiently; signature carries A_i, not a_i.
    Ok(Signature { a: a_points, phi, psi, t })
  }
}
