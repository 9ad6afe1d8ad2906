//! Run identifiers derived from extraction wall-clock time.

use std::fmt;

use chrono::{DateTime, Utc};

/// `ddMMyyyyHHmmss`, two digits per field except a four-digit year.
pub const BATCH_ID_FORMAT: &str = "%d%m%Y%H%M%S";

/// Identifies one pipeline run and names its output object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchId(String);

impl BatchId {
    /// Batch id for the current instant (UTC).
    #[must_use]
    pub fn now() -> Self {
        Self::from_timestamp(Utc::now())
    }

    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.format(BATCH_ID_FORMAT).to_string())
    }

    /// Append `-` and eight hex characters so two runs started within the
    /// same second get distinct keys.
    #[must_use]
    pub fn with_unique_suffix(self) -> Self {
        let token = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}", self.0, &token[..8]))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{id}.csv`
    #[must_use]
    pub fn object_key(&self) -> String {
        format!("{}.csv", self.0)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn formats_fixed_width_digits() {
        let at = Utc.with_ymd_and_hms(2024, 2, 4, 9, 3, 7).unwrap();
        let id = BatchId::from_timestamp(at);
        assert_eq!(id.as_str(), "04022024090307");
        assert_eq!(id.as_str().len(), 14);
        assert!(id.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn object_key_appends_csv() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(BatchId::from_timestamp(at).object_key(), "31122024235959.csv");
    }

    #[test]
    fn unique_suffix_disambiguates_same_second() {
        let at = Utc.with_ymd_and_hms(2024, 2, 14, 0, 0, 0).unwrap();
        let a = BatchId::from_timestamp(at).with_unique_suffix();
        let b = BatchId::from_timestamp(at).with_unique_suffix();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("14022024000000-"));
        assert_eq!(a.as_str().len(), 14 + 1 + 8);
    }
}
