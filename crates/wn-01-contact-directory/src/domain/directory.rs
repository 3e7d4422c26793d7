//! # Contact Directory
//!
//! A name-keyed table with a secondary index by public key, used to
//! recognise a peer from the key it presents during a handshake.

use std::collections::{BTreeMap, HashMap};

use shared_types::{Contact, PublicKey};
use tracing::debug;

use super::errors::DirectoryError;

/// Immutable peer directory.
#[derive(Debug, Clone, Default)]
pub struct ContactDirectory {
    contacts: BTreeMap<String, Contact>,
    by_key: HashMap<PublicKey, String>,
}

impl ContactDirectory {
    /// Build a directory.
    ///
    /// Fails if two contacts share a name or a key, or if a contact's name
    /// differs from its certificate subject.
    pub fn new(contacts: impl IntoIterator<Item = Contact>) -> Result<Self, DirectoryError> {
        let mut directory = Self::default();

        for contact in contacts {
            if contact.name.is_empty() || contact.name != contact.certificate.subject {
                return Err(DirectoryError::SubjectMismatch {
                    name: contact.name,
                    subject: contact.certificate.subject,
                });
            }
            if directory.contacts.contains_key(&contact.name) {
                return Err(DirectoryError::DuplicateName(contact.name));
            }
            if let Some(first) = directory.by_key.get(contact.public_key()) {
                return Err(DirectoryError::DuplicateKey {
                    first: first.clone(),
                    second: contact.name,
                });
            }

            debug!(peer = %contact.name, address = %contact.address, "Contact loaded");
            directory
                .by_key
                .insert(*contact.public_key(), contact.name.clone());
            directory.contacts.insert(contact.name.clone(), contact);
        }

        Ok(directory)
    }

    /// Look up a contact by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Contact> {
        self.contacts.get(name)
    }

    /// Look up a contact by name, failing with `UnknownContact`.
    pub fn lookup(&self, name: &str) -> Result<&Contact, DirectoryError> {
        self.get(name)
            .ok_or_else(|| DirectoryError::UnknownContact(name.to_string()))
    }

    /// Find the contact holding `key`.
    #[must_use]
    pub fn by_public_key(&self, key: &PublicKey) -> Option<&Contact> {
        self.by_key.get(key).and_then(|name| self.contacts.get(name))
    }

    /// Contacts in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    /// Contact names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contacts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
