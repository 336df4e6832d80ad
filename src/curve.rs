//! Group context (component C1): wraps a named prime-order curve behind a
//! zero-sized marker type, the way the teacher's `frost::curve::Curve` trait
//! wraps `k256`/`p256` for FROST. Curve selection is a compile-time type
//! parameter rather than a runtime value — see the "curve selection" open
//! question in SPEC_FULL.md §9.

use elliptic_curve::bigint::U256;
use elliptic_curve::ops::Reduce;
use elliptic_curve::sec1::{EncodedPoint, FromEncodedPoint, ToEncodedPoint};
use group::{ff::PrimeField, Group, GroupEncoding};
use rand_core::{CryptoRng, RngCore};

use crate::error::{Result, RingSigError};

/// A prime-order group with a fixed generator, plus the encoding rules this
/// crate normatively uses: uppercase hex of the uncompressed SEC1 point
/// encoding, and big-endian fixed-width bytes for scalars (§4.1).
pub trait Curve: Copy + Clone + PartialEq + Eq + core::fmt::Debug + Send + Sync + 'static {
  /// The scalar field, i.e. integers mod the group order `q`.
  type F: PrimeField + Copy + Send + Sync;
  /// The group itself.
  type G: Group<Scalar = Self::F> + GroupEncoding + Copy + Send + Sync;

  /// Short tag embedded in persisted data so a loader can reject a file
  /// written for a different curve (SPEC_FULL.md §9).
  const ID: &'static [u8];

  /// The fixed generator `P`.
  fn generator() -> Self::G;

  /// Sample a scalar uniformly from `[1, q)`. Loops on the (overwhelmingly
  /// unlikely) zero draw rather than ever emitting `0`, since every `←$`
  /// sample in SPEC_FULL.md §4 is drawn from `[1, q)`, not `[0, q)`.
  fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Self::F;

  /// Reduce a 32-byte HMAC digest to a scalar mod `q` (component C2).
  fn reduce_wide(bytes: &[u8; 32]) -> Self::F;

  /// `mul(a, P)` is `a·P`; the single primitive both the generator and the
  /// two-operand forms in SPEC_FULL.md §4.1 boil down to.
  fn mul(a: Self::F, q: Self::G) -> Self::G {
    q * a
  }

  fn scalar_to_bytes(f: &Self::F) -> Vec<u8>;
  fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::F>;

  /// Uncompressed SEC1 encoding of a point. Rejects the identity: every
  /// point this crate serialises is required by (I2) to be non-identity.
  fn point_to_bytes(g: &Self::G) -> Vec<u8>;
  fn point_from_bytes(bytes: &[u8]) -> Result<Self::G>;
}

/// Uppercase hex of [`Curve::point_to_bytes`].
pub fn point_to_hex<C: Curve>(g: &C::G) -> String {
  hex::encode_upper(C::point_to_bytes(g))
}

/// Inverse of [`point_to_hex`].
pub fn point_from_hex<C: Curve>(s: &str) -> Result<C::G> {
  let bytes = hex::decode(s).map_err(|e| RingSigError::Encoding(format!("bad point hex: {e}")))?;
  C::point_from_bytes(&bytes)
}

/// Uppercase hex of [`Curve::scalar_to_bytes`].
pub fn scalar_to_hex<C: Curve>(f: &C::F) -> String {
  hex::encode_upper(C::scalar_to_bytes(f))
}

/// Inverse of [`scalar_to_hex`].
pub fn scalar_from_hex<C: Curve>(s: &str) -> Result<C::F> {
  let bytes = hex::decode(s).map_err(|e| RingSigError::Encoding(format!("bad scalar hex: {e}")))?;
  C::scalar_from_bytes(&bytes)
}

macro_rules! curve_impl {
  (
    $lib:        ident,
    $Marker:     ident,
    $CurveParam: path,
    $id:         literal
  ) => {
    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    pub struct $Marker;

    impl Curve for $Marker {
      type F = $lib::Scalar;
      type G = $lib::ProjectivePoint;

      const ID: &'static [u8] = $id;

      fn generator() -> Self::G {
        $lib::ProjectivePoint::GENERATOR
      }

      fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Self::F {
        loop {
          let candidate = <$lib::Scalar as group::ff::Field>::random(&mut *rng);
          if !bool::from(group::ff::Field::is_zero(&candidate)) {
            return candidate;
          }
        }
      }

      fn reduce_wide(bytes: &[u8; 32]) -> Self::F {
        <$lib::Scalar as Reduce<U256>>::reduce_bytes(bytes.into())
      }

      fn scalar_to_bytes(f: &Self::F) -> Vec<u8> {
        f.to_repr().to_vec()
      }

      fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::F> {
        if bytes.len() != 32 {
          return Err(RingSigError::Encoding(format!(
            "expected a 32-byte scalar, got {}",
            bytes.len()
          )));
        }
        let mut repr = <$lib::Scalar as PrimeField>::Repr::default();
        repr.as_mut().copy_from_slice(bytes);
        let candidate = $lib::Scalar::from_repr(repr);
        if bool::from(candidate.is_some()) {
          Ok(candidate.unwrap())
        } else {
          Err(RingSigError::Encoding("scalar is not in [0, q)".into()))
        }
      }

      fn point_to_bytes(g: &Self::G) -> Vec<u8> {
        g.to_affine().to_encoded_point(false).as_bytes().to_vec()
      }

      fn point_from_bytes(bytes: &[u8]) -> Result<Self::G> {
        let encoded = EncodedPoint::<$CurveParam>::from_bytes(bytes)
          .map_err(|e| RingSigError::Encoding(format!("malformed SEC1 point: {e}")))?;
        let affine = $lib::AffinePoint::from_encoded_point(&encoded);
        if bool::from(affine.is_none()) {
          return Err(RingSigError::Encoding("point is not on the curve".into()));
        }
        let point = Self::G::from(affine.unwrap());
        if bool::from(point.is_identity()) {
          return Err(RingSigError::Encoding("point is the identity".into()));
        }
        Ok(point)
      }
    }
  };
}

curve_impl!(k256, Secp256k1, k256::Secp256k1, b"secp256k1");

#[cfg(feature = "p256-curve")]
curve_impl!(p256, P256, p256::NistP256, b"P-256");

#[cfg(test)]
mod tests {
  use super::*;
  use rand_core::OsRng;

  #[test]
  fn generator_is_not_identity() {
    assert!(!bool::from(Group::is_identity(&Secp256k1::generator())));
  }

  #[test]
  fn random_nonzero_scalar_never_zero() {
    let mut rng = OsRng;
    for _ in 0..64 {
      let f = Secp256k1::random_nonzero_scalar(&mut rng);
      assert!(!bool::from(group::ff::Field::is_zero(&f)));
    }
  }

  #[test]
  fn point_hex_round_trips() {
    let mut rng = OsRng;
    let f = Secp256k1::random_nonzero_scalar(&mut rng);
    let g = Secp256k1::mul(f, Secp256k1::generator());
    let hex = point_to_hex::<Secp256k1>(&g);
    assert_eq!(hex, hex.to_uppercase());
    let back = point_from_hex::<Secp256k1>(&hex).unwrap();
    assert_eq!(back, g);
  }

  #[test]
  fn scalar_hex_round_trips() {
    let mut rng = OsRng;
    let f = Secp256k1::random_nonzero_scalar(&mut rng);
    let hex = scalar_to_hex::<Secp256k1>(&f);
    let back = scalar_from_hex::<Secp256k1>(&hex).unwrap();
    assert_eq!(back, f);
  }

  #[test]
  fn identity_point_is_rejected() {
    let identity = Secp256k1::G::identity();
    let bytes = Secp256k1::point_to_bytes(&identity);
    assert!(Secp256k1::point_from_bytes(&bytes).is_err());
  }

  #[test]
  fn malformed_hex_is_rejected() {
    assert!(point_from_hex::<Secp256k1>("not hex").is_err());
    assert!(scalar_from_hex::<Secp256k1>("zz").is_err());
  }
}
