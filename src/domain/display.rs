//! Presentation-only time formatting. Stored timestamps are always UTC; the
//! operator-facing zone is applied here and nowhere else.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Indian Standard Time, in minutes east of UTC.
pub const IST_OFFSET_MINUTES: i32 = 330;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone {
    offset: FixedOffset,
}

impl DisplayZone {
    /// `None` when the offset is outside the valid +/-24h range.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn format_date(&self, ts: DateTime<Utc>) -> String {
        ts.with_timezone(&self.offset).format("%Y-%m-%d").to_string()
    }

    pub fn format_datetime(&self, ts: DateTime<Utc>) -> String {
        ts.with_timezone(&self.offset)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(IST_OFFSET_MINUTES * 60).unwrap_or_else(|| Utc.fix()),
        }
    }
}
