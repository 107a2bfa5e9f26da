//! Wall clock access and bounded, locale-aware time formatting.

use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, Locale};
use thiserror::Error;

/// Shown instead of the time when the format cannot be rendered.
pub const TIME_FALLBACK: &str = "••••";
/// Shown instead of the date when the format cannot be rendered.
pub const DATE_FALLBACK: &str = "Unknown Date";

/// Longest formatted time, in bytes.
pub const TIME_MAX_BYTES: usize = 63;
/// Longest formatted date, in bytes.
pub const DATE_MAX_BYTES: usize = 127;

#[derive(Debug, Error)]
pub enum ClockError {
    #[error("system clock is before the Unix epoch")]
    BeforeEpoch,

    #[error("system clock is out of range")]
    OutOfRange,
}

/// Source of the current local time.
pub trait Clock {
    fn now(&self) -> Result<DateTime<FixedOffset>, ClockError>;
}

/// The real wall clock in the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime<FixedOffset>, ClockError> {
        let since = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ClockError::BeforeEpoch)?;
        let secs = i64::try_from(since.as_secs()).map_err(|_| ClockError::OutOfRange)?;
        let utc = DateTime::from_timestamp(secs, since.subsec_nanos())
            .ok_or(ClockError::OutOfRange)?;
        Ok(utc.with_timezone(&Local).fixed_offset())
    }
}

/// Renders strftime-style formats with the configured locale's day and
/// month names.
#[derive(Debug, Clone, Copy)]
pub struct TimeFormatter {
    locale: Locale,
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::new(Locale::POSIX)
    }
}

impl TimeFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Use `configured` if set, else the first of `LC_ALL`, `LC_TIME` and
    /// `LANG` that is set and non-empty. Unknown names fall back to POSIX.
    pub fn from_environment(configured: Option<&str>) -> Self {
        let name = configured
            .map(str::to_string)
            .or_else(|| {
                ["LC_ALL", "LC_TIME", "LANG"]
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|value| !value.is_empty())
            })
            .unwrap_or_default();

        match parse_locale(&name) {
            Some(locale) => Self::new(locale),
            None => {
                log::warn!("Unknown locale '{}', using POSIX names", name);
                Self::default()
            }
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn format_time(&self, now: &DateTime<FixedOffset>, format: &str) -> String {
        self.format_bounded(now, format, TIME_MAX_BYTES)
            .unwrap_or_else(|| TIME_FALLBACK.to_string())
    }

    pub fn format_date(&self, now: &DateTime<FixedOffset>, format: &str) -> String {
        self.format_bounded(now, format, DATE_MAX_BYTES)
            .unwrap_or_else(|| DATE_FALLBACK.to_string())
    }

    /// `None` for an invalid specifier, empty output or output longer than
    /// `max_bytes`.
    fn format_bounded(
        &self,
        now: &DateTime<FixedOffset>,
        format: &str,
        max_bytes: usize,
    ) -> Option<String> {
        let items: Vec<Item<'_>> = StrftimeItems::new_with_locale(format, self.locale).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            log::debug!("Invalid time format '{}'", format);
            return None;
        }

        let mut out = String::new();
        write!(out, "{}", now.format_localized_with_items(items.iter(), self.locale)).ok()?;
        if out.is_empty() || out.len() > max_bytes {
            log::debug!("Format '{}' produced {} bytes", format, out.len());
            return None;
        }
        Some(out)
    }
}

/// Map a POSIX locale name such as `de_DE.UTF-8@euro` to a [`Locale`].
///
/// Empty, `C` and `POSIX` select the POSIX locale.
pub fn parse_locale(name: &str) -> Option<Locale> {
    let base = name
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    match base {
        "" | "C" | "POSIX" => Some(Locale::POSIX),
        other => Locale::try_from(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn monday() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 4, 9, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_formats_time_and_date() {
        let f = TimeFormatter::default();
        assert_eq!(f.format_time(&monday(), "%H:%M"), "09:05");
        assert_eq!(f.format_time(&monday(), "%H:%M:%S"), "09:05:07");
        assert_eq!(
            f.format_date(&monday(), "%A, %B %d"),
            "Monday, March 04"
        );
    }

    #[test]
    fn test_invalid_specifier_falls_back() {
        let f = TimeFormatter::default();
        assert_eq!(f.format_time(&monday(), "%H:%Q"), TIME_FALLBACK);
        assert_eq!(f.format_date(&monday(), "%"), DATE_FALLBACK);
    }

    #[test]
    fn test_empty_output_falls_back() {
        let f = TimeFormatter::default();
        assert_eq!(f.format_time(&monday(), ""), TIME_FALLBACK);
        assert_eq!(f.format_date(&monday(), ""), DATE_FALLBACK);
    }

    #[test]
    fn test_output_length_limits() {
        let f = TimeFormatter::default();
        // %Y expands to 4 bytes
        assert_eq!(f.format_time(&monday(), &"%Y".repeat(15)).len(), 60);
        assert_eq!(f.format_time(&monday(), &"%Y".repeat(16)), TIME_FALLBACK);
        assert_eq!(f.format_date(&monday(), &"%Y".repeat(31)).len(), 124);
        assert_eq!(f.format_date(&monday(), &"%Y".repeat(32)), DATE_FALLBACK);
    }

    #[test]
    fn test_localized_names() {
        let f = TimeFormatter::new(parse_locale("fr_FR.UTF-8").unwrap());
        assert_eq!(f.format_date(&monday(), "%A %d %B"), "lundi 04 mars");
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(parse_locale(""), Some(Locale::POSIX));
        assert_eq!(parse_locale("C.UTF-8"), Some(Locale::POSIX));
        assert_eq!(parse_locale("de_DE@euro"), Some(Locale::de_DE));
        assert_eq!(parse_locale("xx_YY"), None);
    }

    #[test]
    fn test_system_clock_reads() {
        assert!(SystemClock.now().is_ok());
    }
}
