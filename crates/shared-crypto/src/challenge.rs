//! # Handshake Challenges

use rand::RngCore;

/// A random 32-byte handshake challenge.
pub type Challenge = [u8; 32];

/// Fresh challenge from the thread-local CSPRNG.
pub fn random_challenge() -> Challenge {
    let mut challenge = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut challenge);
    challenge
}
