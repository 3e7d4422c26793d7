use thiserror::Error;

/// Errors building or querying the contact directory.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// Two contacts share a name.
    #[error("Duplicate contact name: {0}")]
    DuplicateName(String),

    /// Two contacts share a public key.
    #[error("Contacts {first} and {second} share a public key")]
    DuplicateKey { first: String, second: String },

    /// A contact's name is empty or does not match its certificate subject.
    #[error("Contact {name:?} has certificate subject {subject:?}")]
    SubjectMismatch { name: String, subject: String },

    /// No contact with this name.
    #[error("Unknown contact: {0}")]
    UnknownContact(String),
}
