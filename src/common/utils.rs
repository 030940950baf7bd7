//! Utility functions for replog

use std::time::Duration;

/// Maximum accepted content size for a single write (1 MiB)
pub const MAX_CONTENT_BYTES: usize = 1024 * 1024;

/// Parse duration string (e.g., "500ms", "30s", "5m", "1h")
pub fn parse_duration(s: &str) -> crate::Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(crate::Error::InvalidConfig("empty duration".into()));
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| crate::Error::InvalidConfig(format!("missing duration unit: {}", s)))?;
    let (num_str, unit) = s.split_at(split);

    let num: u64 = num_str
        .parse()
        .map_err(|_| crate::Error::InvalidConfig(format!("invalid duration: {}", s)))?;

    let secs = |factor: u64| {
        num.checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or_else(|| crate::Error::InvalidConfig(format!("duration out of range: {}", s)))
    };

    let duration = match unit {
        "ms" => Duration::from_millis(num),
        "s" => Duration::from_secs(num),
        "m" => secs(60)?,
        "h" => secs(3600)?,
        _ => {
            return Err(crate::Error::InvalidConfig(format!(
                "unknown duration unit: {}",
                unit
            )))
        }
    };

    Ok(duration)
}

/// Validate write content. Content is opaque: anything non-empty up to
/// `MAX_CONTENT_BYTES` is accepted, whitespace included.
pub fn validate_content(content: &str) -> crate::Result<()> {
    if content.is_empty() {
        return Err(crate::Error::InvalidInput("message cannot be empty".into()));
    }

    if content.len() > MAX_CONTENT_BYTES {
        return Err(crate::Error::InvalidInput(format!(
            "message too long (max {} bytes)",
            MAX_CONTENT_BYTES
        )));
    }

    Ok(())
}

/// Normalize a replica address into a URI tonic can dial.
pub fn normalize_replica_addr(addr: &str) -> crate::Result<String> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(crate::Error::InvalidConfig("empty replica address".into()));
    }

    let uri = if addr.contains("://") {
        addr.to_string()
    } else {
        format!("http://{}", addr)
    };

    uri.parse::<axum::http::Uri>()
        .map_err(|e| crate::Error::InvalidConfig(format!("invalid replica address {}: {}", addr, e)))?;

    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration(" 2s ").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("10x").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("1é").is_err());
    }

    #[test]
    fn test_parse_duration_overflow() {
        let err = parse_duration("999999999999999999m").unwrap_err();
        assert!(matches!(err, crate::Error::InvalidConfig(_)));
        assert!(parse_duration("999999999999999999h").is_err());
        assert_eq!(
            parse_duration("999999999999999999s").unwrap(),
            Duration::from_secs(999_999_999_999_999_999)
        );
    }

    #[test]
    fn test_validate_content() {
        assert!(validate_content("hello").is_ok());
        assert!(validate_content("").is_err());
        assert!(validate_content("   ").is_ok());
        assert!(validate_content("\n").is_ok());
        assert!(validate_content(&"x".repeat(MAX_CONTENT_BYTES + 1)).is_err());
    }

    #[test]
    fn test_normalize_replica_addr() {
        assert_eq!(
            normalize_replica_addr("replica-1:50051").unwrap(),
            "http://replica-1:50051"
        );
        assert_eq!(
            normalize_replica_addr("http://127.0.0.1:50051").unwrap(),
            "http://127.0.0.1:50051"
        );
        assert!(normalize_replica_addr("").is_err());
        assert!(normalize_replica_addr("http://bad host:1").is_err());
    }
}
