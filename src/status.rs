use chrono::{Duration, NaiveDate};

/// Rolling recency window, in days. Not calendar-year aware.
pub const RECENCY_WINDOW_DAYS: i64 = 365;

/// Outcome of the recency check behind both the customer `is_active` and the
/// product `is_available` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    Recent,
    Lapsed,
}

impl Recency {
    pub fn as_flag(self) -> bool {
        matches!(self, Recency::Recent)
    }

    /// Customer-facing label.
    pub fn activity_label(self) -> &'static str {
        match self {
            Recency::Recent => "Active",
            Recency::Lapsed => "Inactive",
        }
    }

    /// Product-facing label.
    pub fn availability_label(self) -> &'static str {
        match self {
            Recency::Recent => "Available",
            Recency::Lapsed => "Unavailable",
        }
    }
}

/// Classify an entity from its most recent order date.
///
/// An entity that has never been ordered is `Recent` (presumed fine).
/// Otherwise the latest order must fall strictly after `today - 365 days`.
/// `today` is injected by the caller so the check is deterministic in tests.
pub fn classify(latest_order: Option<NaiveDate>, today: NaiveDate) -> Recency {
    let Some(latest) = latest_order else {
        return Recency::Recent;
    };
    let cutoff = today - Duration::days(RECENCY_WINDOW_DAYS);
    if latest > cutoff {
        Recency::Recent
    } else {
        Recency::Lapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn never_ordered_is_recent() {
        assert_eq!(classify(None, date(2025, 6, 1)), Recency::Recent);
    }

    #[test]
    fn order_within_window_is_recent() {
        let today = date(2025, 6, 1);
        assert_eq!(classify(Some(date(2025, 5, 30)), today), Recency::Recent);
        assert_eq!(classify(Some(date(2024, 6, 2)), today), Recency::Recent);
    }

    #[test]
    fn cutoff_is_strict() {
        let today = date(2025, 6, 1);
        // Exactly 365 days ago is not strictly after the cutoff.
        assert_eq!(classify(Some(date(2024, 6, 1)), today), Recency::Lapsed);
        assert_eq!(classify(Some(date(2020, 1, 1)), today), Recency::Lapsed);
    }

    #[test]
    fn classification_is_idempotent() {
        let today = date(2025, 6, 1);
        let latest = Some(date(2023, 2, 14));
        assert_eq!(classify(latest, today), classify(latest, today));
    }

    #[test]
    fn labels() {
        assert_eq!(Recency::Recent.activity_label(), "Active");
        assert_eq!(Recency::Lapsed.activity_label(), "Inactive");
        assert_eq!(Recency::Recent.availability_label(), "Available");
        assert_eq!(Recency::Lapsed.availability_label(), "Unavailable");
        assert!(Recency::Recent.as_flag());
        assert!(!Recency::Lapsed.as_flag());
    }
}
