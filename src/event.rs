use serde::{Deserialize, Serialize};
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, OffsetDateTime,
    UtcOffset,
};
use uuid::Uuid;

pub(crate) static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

static LONG_DATE_FMT: &[BorrowedFormatItem<'_>] = format_description!(
    "[weekday repr:long], [month repr:long] [day padding:none], [year]"
);

/// A single entry on the family calendar.
///
/// The serialized field names match the stored snapshot layout, so a list of
/// events can be written and read back without any translation.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Event {
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) date: OffsetDateTime,
    pub(crate) location: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) url: String,
}

impl Event {
    /// Creates an event at local midnight of `day` with a freshly generated
    /// id.
    pub(crate) fn new(
        title: String,
        day: Date,
        offset: UtcOffset,
        location: String,
        description: String,
        url: String,
    ) -> Event {
        Event {
            id: new_id(),
            title,
            date: day.midnight().assume_offset(offset),
            location,
            description,
            url,
        }
    }

    /// The calendar day of the event, taken in the offset the instant was
    /// stored with
    pub(crate) fn day(&self) -> Date {
        self.date.date()
    }

    /// "Saturday, June 7, 2025"
    pub(crate) fn long_date(&self) -> String {
        long_date(self.day())
    }

    pub(crate) fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

pub(crate) fn long_date(day: Date) -> String {
    day.format(&LONG_DATE_FMT)
        .unwrap_or_else(|_| day.to_string())
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    fn picnic() -> Event {
        Event {
            id: String::from("abc123"),
            title: String::from("Picnic"),
            date: datetime!(2025-06-07 00:00 -5),
            location: String::from("Park"),
            description: String::new(),
            url: String::new(),
        }
    }

    #[test]
    fn test_day_uses_stored_offset() {
        let event = Event {
            date: datetime!(2025-06-07 23:30 -5),
            ..picnic()
        };
        assert_eq!(event.day(), date!(2025 - 06 - 07));
    }

    #[test]
    fn test_long_date() {
        assert_eq!(picnic().long_date(), "Saturday, June 7, 2025");
    }

    #[test]
    fn test_new_starts_at_local_midnight() {
        let event = Event::new(
            String::from("Picnic"),
            date!(2025 - 06 - 07),
            offset!(+2),
            String::from("Park"),
            String::new(),
            String::new(),
        );
        assert_eq!(event.date, datetime!(2025-06-07 00:00 +2));
        assert_eq!(event.day(), date!(2025 - 06 - 07));
        assert_eq!(event.id.len(), 32);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(picnic()).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys = obj.keys().map(String::as_str).collect::<Vec<_>>();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["date", "description", "id", "location", "title", "url"]
        );
        assert_eq!(obj["date"], "2025-06-07T00:00:00-05:00");
    }

    #[test]
    fn test_parse_browser_snapshot_entry() {
        let src = r#"{
            "id": "k2j3h4",
            "title": "Farmers Market",
            "date": "2025-07-12T04:00:00.000Z",
            "location": "Main Street"
        }"#;
        let event = serde_json::from_str::<Event>(src).unwrap();
        assert_eq!(event.day(), date!(2025 - 07 - 12));
        assert_eq!(event.description, "");
        assert!(!event.has_url());
    }
}
