//! # Key Generation
//!
//! `node-runtime keygen <name> <dir>` writes `<dir>/<name>.key` (hex seed)
//! and `<dir>/<name>.json` (self-signed certificate). The certificate is what
//! peers put in their `[contacts]`; the key never leaves the node.

use std::fs;
use std::path::{Path, PathBuf};

use shared_crypto::Ed25519KeyPair;
use tracing::info;
use wn_02_signature_service::NodeIdentity;

use crate::certificate::write_certificate;
use crate::config::ConfigError;

/// Files written by [`keygen`].
#[derive(Debug)]
pub struct GeneratedIdentity {
    pub key_path: PathBuf,
    pub certificate_path: PathBuf,
    pub identity: NodeIdentity,
}

/// Generate a fresh identity for `name` under `dir`.
///
/// Existing files are never overwritten.
pub fn keygen(name: &str, dir: &Path) -> Result<GeneratedIdentity, ConfigError> {
    let key_path = dir.join(format!("{name}.key"));
    let certificate_path = dir.join(format!("{name}.json"));
    for path in [&key_path, &certificate_path] {
        if path.exists() {
            return Err(ConfigError::Write {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "file exists"),
            });
        }
    }

    fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let keypair = Ed25519KeyPair::generate();
    let seed = keypair.to_hex_seed();
    let identity = NodeIdentity::new(name, keypair);

    fs::write(&key_path, seed.as_bytes()).map_err(|source| ConfigError::Write {
        path: key_path.clone(),
        source,
    })?;
    write_certificate(&certificate_path, identity.certificate())?;

    info!(
        node = %name,
        key = %identity.public_key(),
        dir = %dir.display(),
        "Identity generated"
    );
    Ok(GeneratedIdentity {
        key_path,
        certificate_path,
        identity,
    })
}
