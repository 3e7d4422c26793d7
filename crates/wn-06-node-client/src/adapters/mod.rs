//! TCP transport to peers.

pub(crate) mod connection;
