/// Key layout and encoding utilities for Fjall partitions
///
/// Partition structure:
/// - `configs`: config:{config_id} -> EmbedConfig (JSON)
/// - `meta`: meta:order -> config id list (JSON), meta:active -> config id (string)

pub const ORDER_KEY: &str = "meta:order";
pub const ACTIVE_KEY: &str = "meta:active";

/// Encode a config key: config:{config_id}
pub fn encode_config_key(config_id: &str) -> Vec<u8> {
    format!("config:{}", config_id).into_bytes()
}

/// Decode a config key: config:{config_id} -> config_id
pub fn decode_config_key(key: &[u8]) -> Option<String> {
    let key_str = std::str::from_utf8(key).ok()?;
    key_str.strip_prefix("config:").map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_key_encoding() {
        let config_id = "cfg_123";
        let key = encode_config_key(config_id);
        assert_eq!(key, b"config:cfg_123");

        let decoded = decode_config_key(&key).unwrap();
        assert_eq!(decoded, config_id);
    }

    #[test]
    fn test_decode_rejects_foreign_keys() {
        assert!(decode_config_key(b"meta:active").is_none());
    }
}
