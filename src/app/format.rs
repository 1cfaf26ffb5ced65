use std::sync::OnceLock;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::warn;

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

const DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[weekday repr:long], [month repr:long] [day padding:none], [year]");

const TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12]:[minute]:[second] [period]");

/// Capture the viewer's UTC offset.
///
/// Must run before any other thread is spawned: on unix the offset can only
/// be read soundly from a single-threaded process.
pub(crate) fn init_local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| match UtcOffset::current_local_offset() {
        Ok(offset) => offset,
        Err(err) => {
            warn!(%err, "could not determine local time zone, falling back to UTC");
            UtcOffset::UTC
        }
    })
}

/// Current time in the offset captured by [`init_local_offset`].
///
/// The offset is not re-read, so a daylight-saving change during a long
/// session shows times off by the shift until the app restarts.
pub(crate) fn local_now() -> OffsetDateTime {
    let offset = LOCAL_OFFSET.get().copied().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset)
}

/// e.g. `Tuesday, March 5, 2024`
pub(crate) fn format_date(at: OffsetDateTime) -> String {
    at.format(DATE_FORMAT).unwrap_or_else(|_| at.date().to_string())
}

/// e.g. `02:07:09 PM`
pub(crate) fn format_time(at: OffsetDateTime) -> String {
    at.format(TIME_FORMAT).unwrap_or_else(|_| at.time().to_string())
}

pub(crate) fn epoch_millis(at: OffsetDateTime) -> i128 {
    at.unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn formats_long_date() {
        assert_eq!(
            format_date(datetime!(2024-03-05 14:07:09 UTC)),
            "Tuesday, March 5, 2024"
        );
        assert_eq!(
            format_date(datetime!(2026-10-19 00:00:00 UTC)),
            "Monday, October 19, 2026"
        );
    }

    #[test]
    fn formats_twelve_hour_time_with_seconds() {
        assert_eq!(format_time(datetime!(2024-03-05 14:07:09 UTC)), "02:07:09 PM");
        assert_eq!(format_time(datetime!(2024-03-05 00:30:00 UTC)), "12:30:00 AM");
    }

    #[test]
    fn formatting_uses_the_timestamp_offset() {
        let at = datetime!(2024-03-05 23:30:00 UTC).to_offset(time::macros::offset!(+2));
        assert_eq!(format_date(at), "Wednesday, March 6, 2024");
        assert_eq!(format_time(at), "01:30:00 AM");
    }

    #[test]
    fn epoch_millis_truncates_nanoseconds() {
        assert_eq!(epoch_millis(datetime!(1970-01-01 00:00:01.5009 UTC)), 1_500);
    }
}
