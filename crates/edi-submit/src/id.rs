use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Transaction id: `EDI-{yyyymmddHHMMSS}-{16 uppercase hex}`.
///
/// The hex part is the first 8 bytes of a v4 UUID. Uniqueness is enforced by
/// the store; callers regenerate on conflict.
pub fn generate_transaction_id(now: DateTime<Utc>) -> String {
    let uuid = Uuid::new_v4();
    format!(
        "EDI-{}-{}",
        now.format("%Y%m%d%H%M%S"),
        hex::encode_upper(&uuid.as_bytes()[..8])
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let id = generate_transaction_id(now);
        assert!(id.starts_with("EDI-20240309070501-"), "{id}");
        let suffix = &id["EDI-20240309070501-".len()..];
        assert_eq!(suffix.len(), 16);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_same_second_ids_differ() {
        let now = Utc::now();
        let ids: HashSet<_> = (0..1000).map(|_| generate_transaction_id(now)).collect();
        assert_eq!(ids.len(), 1000);
    }
}
