//! Prompt fingerprinting.
//!
//! Selection and narration prompts are templates compiled into the binary.
//! Logging a digest at startup makes it possible to tell which template
//! produced a given LLM reply when reading logs after a deploy.

use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Compute a lowercase hex SHA-256 fingerprint for a prompt template.
pub fn hash_prompt(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    digest.iter().fold(String::with_capacity(64), |mut hex, byte| {
        let _ = write!(hex, "{:02x}", byte);
        hex
    })
}
