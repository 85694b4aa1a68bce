//! Expiration policy: pure time arithmetic, evaluated at read time only.

use chrono::{DateTime, Duration, Utc};

/// Expiry instant for a record created at `created_at` with a retention of
/// `retention_days` whole days. Callers validate positivity first.
pub fn compute_expiry(created_at: DateTime<Utc>, retention_days: i64) -> DateTime<Utc> {
    created_at + Duration::days(retention_days)
}

/// A record is expired strictly after `expires_at`; the expiry instant
/// itself is still valid.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expires_at
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn expiry_is_exactly_retention_days_after_creation() {
        for days in [1, 7, 30, 365] {
            let expires = compute_expiry(t0(), days);
            assert_eq!(expires - t0(), Duration::days(days));
        }
    }

    #[test]
    fn not_expired_before_the_deadline() {
        let expires = compute_expiry(t0(), 7);
        assert!(!is_expired(expires, t0()));
        assert!(!is_expired(expires, t0() + Duration::days(1)));
        assert!(!is_expired(expires, expires - Duration::seconds(1)));
    }

    #[test]
    fn the_exact_expiry_instant_is_still_valid() {
        let expires = compute_expiry(t0(), 7);
        assert!(!is_expired(expires, expires));
    }

    #[test]
    fn expired_strictly_after_the_deadline() {
        let expires = compute_expiry(t0(), 7);
        assert!(is_expired(expires, expires + Duration::seconds(1)));
        assert!(is_expired(expires, t0() + Duration::days(8)));
    }
}
