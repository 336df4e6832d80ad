//! Certificateless linkable ring signatures over a prime-order elliptic
//! curve group.
//!
//! A signer and a Key Generation Centre (KGC) jointly produce the signer's
//! key pair, so neither party alone holds the full private key (C3/C4).
//! A ring signature hides which member of a list signed a message while
//! embedding a linking tag `T`, tied to an event identifier, that lets
//! anyone detect when the same signer has signed twice under the same
//! event without learning who the signer is (C5).
//!
//! ```no_run
//! use rand_core::OsRng;
//! use ringsig_cl::curve::Secp256k1;
//! use ringsig_cl::{kgc::Kgc, params, signer::Signer, signature};
//!
//! let (params, secret) = params::setup::<Secp256k1, _>("SHA-256", &mut OsRng).unwrap();
//! let kgc = Kgc::from_master(params.clone(), secret);
//!
//! let alice = Signer::new("alice", params.clone());
//! let (alice, request) = alice.generate_partial_key(&mut OsRng);
//! let (y, z) = kgc.issue_partial_key(&request.id, request.x_point, &mut OsRng).unwrap();
//! let alice = alice.install_full_key(y, z).unwrap();
//!
//! let bob = Signer::new("bob", params.clone());
//! let (bob, request) = bob.generate_partial_key(&mut OsRng);
//! let (y, z) = kgc.issue_partial_key(&request.id, request.x_point, &mut OsRng).unwrap();
//! let bob = bob.install_full_key(y, z).unwrap();
//!
//! let ring = vec![alice.public_member(), bob.public_member()];
//! let sig = alice.sign(b"hello", b"event-1", vec![bob.public_member()], &mut OsRng).unwrap();
//! assert!(signature::verify(&params, ring, b"hello", b"event-1", &sig));
//! ```

pub mod curve;
pub mod error;
pub mod hash;
pub mod identity;
pub mod kgc;
pub mod params;
pub mod persist;
pub mod signature;
pub mod signer;

pub use curve::Curve;
pub use error::{Result, RingSigError};
pub use identity::RingMember;
pub use kgc::Kgc;
pub use params::{MasterSecret, SystemParams};
pub use signature::{verify, verify_strict, Signature};
pub use signer::Signer;

#[cfg(test)]
mod tests;
