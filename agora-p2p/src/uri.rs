//! Peer URI validation.

/// Check that `uri` is a syntactically valid peer URI.
///
/// A valid peer URI is `scheme://host:port` with an alphanumeric scheme, a
/// non-empty host, a non-zero port, and no whitespace. This is a purely
/// syntactic predicate; it says nothing about reachability.
pub fn is_valid_peer_uri(uri: &str) -> bool {
    if uri.is_empty() || uri.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((scheme, rest)) = uri.split_once("://") else {
        return false;
    };
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    let Some((host, port)) = rest.rsplit_once(':') else {
        return false;
    };
    if host.is_empty() {
        return false;
    }
    matches!(port.parse::<u16>(), Ok(p) if p != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_uris() {
        assert!(is_valid_peer_uri("tcp://203.0.113.1:12345"));
        assert!(is_valid_peer_uri("tcp://seed.example.com:12345"));
        assert!(is_valid_peer_uri("tcp://[::1]:12345"));
    }

    #[test]
    fn test_invalid_uris() {
        assert!(!is_valid_peer_uri(""));
        assert!(!is_valid_peer_uri("203.0.113.1:12345"));
        assert!(!is_valid_peer_uri("tcp://203.0.113.1"));
        assert!(!is_valid_peer_uri("tcp://:12345"));
        assert!(!is_valid_peer_uri("tcp://203.0.113.1:0"));
        assert!(!is_valid_peer_uri("tcp://203.0.113.1:99999"));
        assert!(!is_valid_peer_uri("tcp://203.0.113.1:12345 "));
        assert!(!is_valid_peer_uri("://203.0.113.1:12345"));
        assert!(!is_valid_peer_uri("tcp://host:port"));
    }
}
