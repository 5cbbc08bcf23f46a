use uuid::Uuid;

/// Whether `value` looks like a UUID.
///
/// Accepts the hyphenated, simple, braced and `urn:uuid:` forms in any case, as
/// long as stripping those decorations leaves exactly the 32 hex digits of the
/// parsed UUID.
pub fn is_uuid_like(value: &str) -> bool {
    let Ok(parsed) = Uuid::parse_str(value) else {
        return false;
    };

    let lowered = value.to_ascii_lowercase();
    let stripped: String = lowered
        .strip_prefix("urn:uuid:")
        .unwrap_or(&lowered)
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '-'))
        .collect();

    parsed.simple().to_string() == stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_forms() {
        let id = Uuid::new_v4();
        assert!(is_uuid_like(&id.hyphenated().to_string()));
        assert!(is_uuid_like(&id.simple().to_string()));
        assert!(is_uuid_like(&id.braced().to_string()));
        assert!(is_uuid_like(&id.urn().to_string()));
        assert!(is_uuid_like(
            &id.hyphenated().to_string().to_ascii_uppercase()
        ));
    }

    #[test]
    fn rejects_non_uuids() {
        assert!(!is_uuid_like("1234567"));
        assert!(!is_uuid_like("zhongyueluo"));
        assert!(!is_uuid_like(""));
    }
}
