use uuid::Uuid;

/// A fresh handshake nonce (UUID v4, drawn from the OS CSPRNG).
pub fn generate_random_nonce() -> String {
    Uuid::new_v4().to_string()
}

/// A fresh JWT id (UUID v4).
pub fn generate_random_jti() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_values_are_uuids() {
        let nonce = generate_random_nonce();
        let parsed = Uuid::parse_str(&nonce).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_ne!(generate_random_nonce(), nonce);
        assert_ne!(generate_random_jti(), generate_random_jti());
    }
}
