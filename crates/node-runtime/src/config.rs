//! # Node Configuration
//!
//! TOML file naming the node, its key, where it listens, and the peers it
//! trusts:
//!
//! ```toml
//! name = "wilbur"
//! private_key = "keys/wilbur.key"
//! listen = "0.0.0.0:7100"
//! max_block_size = 1048576
//! request_timeout_ms = 5000
//!
//! [contacts.orville]
//! certificate = "certs/orville.json"
//! host = "127.0.0.1"
//! port = 7101
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
//!
//! ## Startup Checks
//!
//! Loading fails, and the node does not start, if the key file is unreadable
//! or malformed, any certificate fails to decode or validate, any contact
//! address does not resolve, or two contacts collide in the directory.

use std::collections::BTreeMap;
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use shared_types::Contact;
use thiserror::Error;
use tracing::{debug, info};
use wn_01_contact_directory::{ContactDirectory, DirectoryError};
use wn_02_signature_service::{NodeIdentity, SignatureApi, SignatureService};
use wn_03_block_store::StoreConfig;
use wn_06_node_client::ClientConfig;

use crate::certificate::read_certificate;

/// Startup configuration errors. Any of these aborts the node.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid private key {}: {reason}", .path.display())]
    PrivateKey { path: PathBuf, reason: String },

    #[error("Invalid certificate {}: {reason}", .path.display())]
    Certificate { path: PathBuf, reason: String },

    #[error("Cannot resolve address of {peer}: {reason}")]
    Address { peer: String, reason: String },

    #[error("Invalid listen address {0:?}")]
    Listen(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// The file as written.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub name: String,
    pub private_key: PathBuf,
    pub listen: SocketAddr,
    #[serde(default)]
    pub max_block_size: Option<usize>,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    #[serde(default)]
    pub contacts: BTreeMap<String, ContactEntry>,
}

/// One `[contacts.<name>]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactEntry {
    pub certificate: PathBuf,
    pub host: String,
    pub port: u16,
}

impl ConfigFile {
    /// Parse TOML text.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace the listen address, as given by `WN_LISTEN`.
    pub fn override_listen(&mut self, listen: &str) -> Result<(), ConfigError> {
        self.listen = listen
            .parse()
            .map_err(|_| ConfigError::Listen(listen.to_string()))?;
        Ok(())
    }
}

/// Everything the runtime needs, loaded and validated.
pub struct NodeSettings {
    pub identity: Arc<NodeIdentity>,
    pub listen: SocketAddr,
    pub store: StoreConfig,
    pub client: ClientConfig,
    pub directory: ContactDirectory,
}

impl NodeSettings {
    /// Read the file at `path`, applying `listen_override` if given.
    pub fn load(path: &Path, listen_override: Option<&str>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file = ConfigFile::parse(&text, path)?;
        if let Some(listen) = listen_override {
            file.override_listen(listen)?;
        }

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_file(file, base)
    }

    /// Resolve and validate a parsed file. Relative paths are taken from `base`.
    pub fn from_file(file: ConfigFile, base: &Path) -> Result<Self, ConfigError> {
        let key_path = base.join(&file.private_key);
        let seed = fs::read_to_string(&key_path).map_err(|source| ConfigError::Read {
            path: key_path.clone(),
            source,
        })?;
        let identity = NodeIdentity::from_hex_seed(file.name.clone(), &seed).map_err(|e| {
            ConfigError::PrivateKey {
                path: key_path.clone(),
                reason: e.to_string(),
            }
        })?;

        let identity = Arc::new(identity);
        let verifier = SignatureService::new(Arc::clone(&identity));
        let mut contacts = Vec::with_capacity(file.contacts.len());
        for (name, entry) in &file.contacts {
            let cert_path = base.join(&entry.certificate);
            let contact = Contact::new(
                name.clone(),
                resolve(name, &entry.host, entry.port)?,
                read_certificate(&cert_path)?,
            );
            verifier
                .validate_certificate(&contact)
                .map_err(|e| ConfigError::Certificate {
                    path: cert_path,
                    reason: e.to_string(),
                })?;
            debug!(peer = %name, address = %contact.address, key = %contact.public_key(), "Contact loaded");
            contacts.push(contact);
        }
        let directory = ContactDirectory::new(contacts)?;

        let mut store = StoreConfig::default();
        if let Some(max) = file.max_block_size {
            store = store.with_max_block_size(max);
        }
        let mut client = ClientConfig::default();
        if let Some(ms) = file.request_timeout_ms {
            client = client.with_request_timeout(Duration::from_millis(ms));
        }

        info!(
            node = %identity.name(),
            key = %identity.public_key(),
            listen = %file.listen,
            contacts = directory.len(),
            "Configuration loaded"
        );

        Ok(Self {
            identity,
            listen: file.listen,
            store,
            client,
            directory,
        })
    }
}

fn resolve(peer: &str, host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let unresolved = |reason: String| ConfigError::Address {
        peer: peer.to_string(),
        reason,
    };
    (host, port)
        .to_socket_addrs()
        .map_err(|e| unresolved(e.to_string()))?
        .next()
        .ok_or_else(|| unresolved(format!("{host}:{port} has no addresses")))
}
