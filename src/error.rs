use thiserror::Error;

/// Every fallible operation in this crate returns one of these variants.
///
/// Callers should match on the variant, not on the message text.
#[derive(Clone, Error, Debug)]
pub enum RingSigError {
  #[error("configuration error: {0}")]
  Config(String),

  #[error("encoding error: {0}")]
  Encoding(String),

  #[error("operation attempted in the wrong lifecycle state: {0}")]
  State(String),

  #[error("protocol error: {0}")]
  Protocol(String),

  #[error("crypto backend error: {0}")]
  CryptoBackend(String),
}

pub type Result<T> = core::result::Result<T, RingSigError>;
