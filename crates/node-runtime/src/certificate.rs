//! # Certificate Files
//!
//! On disk a certificate is JSON with hex-encoded key and signature:
//!
//! ```json
//! { "subject": "wilbur", "public_key": "9f3c…", "signature": "51ab…" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shared_types::{NodeCertificate, PublicKey, Signature};

use crate::config::ConfigError;

#[derive(Debug, Serialize, Deserialize)]
struct CertificateFile {
    subject: String,
    public_key: String,
    signature: String,
}

impl From<&NodeCertificate> for CertificateFile {
    fn from(cert: &NodeCertificate) -> Self {
        Self {
            subject: cert.subject.clone(),
            public_key: hex::encode(cert.public_key.0),
            signature: hex::encode(cert.signature.0),
        }
    }
}

impl CertificateFile {
    fn into_certificate(self) -> Result<NodeCertificate, String> {
        Ok(NodeCertificate {
            subject: self.subject,
            public_key: PublicKey(decode_fixed(&self.public_key, "public_key")?),
            signature: Signature(decode_fixed(&self.signature, "signature")?),
        })
    }
}

fn decode_fixed<const N: usize>(encoded: &str, field: &str) -> Result<[u8; N], String> {
    let bytes = hex::decode(encoded.trim()).map_err(|e| format!("{field}: {e}"))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| format!("{field}: expected {N} bytes, got {len}"))
}

/// Read and decode a certificate file. The signature is not checked here.
pub fn read_certificate(path: &Path) -> Result<NodeCertificate, ConfigError> {
    let invalid = |reason: String| ConfigError::Certificate {
        path: path.to_path_buf(),
        reason,
    };

    let text = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let file: CertificateFile = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;
    file.into_certificate().map_err(invalid)
}

/// Write `cert` as pretty-printed JSON.
pub fn write_certificate(path: &Path, cert: &NodeCertificate) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(&CertificateFile::from(cert)).map_err(|e| {
        ConfigError::Certificate {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;
    fs::write(path, json).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
