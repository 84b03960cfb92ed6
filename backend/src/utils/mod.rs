//! Collection of general utility modules.
//!
//! This module hosts the password credential codec, the bearer token
//! manager, and small helpers shared between them.

use rand::{Rng, distributions::Alphanumeric};

pub mod credentials;
pub mod jwt;

/// Generates a random alphanumeric string of the given length.
pub fn generate_random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        assert_eq!(generate_random_string(12).len(), 12);
        assert_eq!(generate_random_string(0).len(), 0);
    }
}
