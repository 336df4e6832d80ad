//! Atomic, owner-only-permissions file writes for the persisted JSON state
//! described in §5 ("Shared-resource policy") and §6. The wire *shapes*
//! live next to the types that own them (`KgcPublicState` in `params.rs`,
//! `SignerKeyFile` in `signer.rs`, the hex parts of `Signature` in
//! `signature.rs`); this module only provides the write-side mechanics,
//! since file descriptors and permission bits are this crate's one
//! explicitly out-of-scope external collaborator (§1).

use std::fs;
use std::io;
use std::path::Path;

/// Serialise `value` to pretty JSON and write it to `path` atomically: the
/// bytes land in a sibling temp file first, which is then renamed into
/// place, so a reader never observes a partially-written file. On Unix the
/// temp file is created with `0600` permissions before any secret bytes are
/// written to it.
pub fn write_atomic_json<T: serde::Serialize>(path: impl AsRef<Path>, value: &T) -> io::Result<()> {
  let json = serde_json::to_vec_pretty(value)
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
  write_atomic(path, &json)
}

/// Write `bytes` to `path` atomically via a sibling `.tmp-<pid>` file plus
/// rename. The caller picks the path; this only guarantees the write
/// itself is all-or-nothing from a reader's perspective.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
  let path = path.as_ref();
  let dir = path.parent().unwrap_or_else(|| Path::new("."));
  let tmp_path = dir.join(format!(
    ".{}.tmp-{}",
    path.file_name().and_then(|n| n.to_str()).unwrap_or("state"),
    std::process::id()
  ));

  {
    #[cfg(unix)]
    let file = {
      use std::os::unix::fs::OpenOptionsExt;
      fs::OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(&tmp_path)?
    };
    #[cfg(not(unix))]
    let file = fs::OpenOptions::new().write(true).create(true).truncate(true).open(&tmp_path)?;

    use std::io::Write;
    let mut file = file;
    file.write_all(bytes)?;
    file.sync_all()?;
  }

  fs::rename(&tmp_path, path)
}

/// Read and JSON-deserialise a file written by [`write_atomic_json`].
pub fn read_json<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> io::Result<T> {
  let bytes = fs::read(path)?;
  serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
