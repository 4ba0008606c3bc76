//! Checksum sidecars (SHA-1, SHA-256, MD5) written next to installed files.

use std::path::{Path, PathBuf};

use depot_util::errors::DepotError;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Write `<file>.sha1`, `<file>.sha256` and `<file>.md5` for `path`.
///
/// Returns the sidecar paths in that order.
pub fn write_sidecars(path: &Path) -> miette::Result<Vec<PathBuf>> {
    let data = std::fs::read(path).map_err(DepotError::Io)?;
    let sums = [
        ("sha1", hex_sha1(&data)),
        ("sha256", hex_sha256(&data)),
        ("md5", hex_md5(&data)),
    ];

    let mut written = Vec::with_capacity(sums.len());
    for (ext, hash) in sums {
        let sidecar = sidecar_path(path, ext);
        std::fs::write(&sidecar, hash).map_err(DepotError::Io)?;
        written.push(sidecar);
    }
    Ok(written)
}

/// Check `path` against whichever sidecars exist next to it.
///
/// Returns the number of sidecars checked.
pub fn verify_sidecars(path: &Path) -> miette::Result<usize> {
    let data = std::fs::read(path).map_err(DepotError::Io)?;
    let mut checked = 0;
    for (ext, algo) in [("sha256", "SHA-256"), ("sha1", "SHA-1"), ("md5", "MD5")] {
        let sidecar = sidecar_path(path, ext);
        if !sidecar.is_file() {
            continue;
        }
        let expected = std::fs::read_to_string(&sidecar).map_err(DepotError::Io)?;
        let expected = extract_hash(&expected);
        let actual = match ext {
            "sha256" => hex_sha256(&data),
            "sha1" => hex_sha1(&data),
            _ => hex_md5(&data),
        };
        if !actual.eq_ignore_ascii_case(&expected) {
            return Err(DepotError::Generic {
                message: format!(
                    "{algo} mismatch for {}: expected {expected}, got {actual}",
                    path.display()
                ),
            }
            .into());
        }
        checked += 1;
    }
    Ok(checked)
}

fn sidecar_path(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Extract the hex hash from a checksum file.
///
/// Maven checksum files may contain just the hash, or `hash  filename`.
fn extract_hash(content: &str) -> String {
    content.split_whitespace().next().unwrap_or("").to_string()
}

fn hex_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

fn hex_sha1(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

fn hex_md5(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
