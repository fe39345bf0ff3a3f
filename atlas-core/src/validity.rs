//! Temporal validity windows.
//!
//! A window is "open" when it is structurally well formed: a begin date in
//! `YYYYMMDD` form and, optionally, an end date that is not before it. The
//! check never consults the wall clock.

use chrono::NaiveDate;

use crate::record::Record;

/// Begin of a record's own validity window.
pub const BEGIN_GELDIGHEID: &str = "TijdvakGeldigheid/begindatumTijdvakGeldigheid";
/// End of a record's own validity window.
pub const EIND_GELDIGHEID: &str = "TijdvakGeldigheid/einddatumTijdvakGeldigheid";

const DATE_FORMAT: &str = "%Y%m%d";
const RELATION_BEGIN_SUFFIX: &str = "/TijdvakRelatie/begindatumRelatie";

/// Name of the begin field of relation group `group`.
#[must_use]
pub fn relation_begin_field(group: &str) -> String {
    format!("{group}{RELATION_BEGIN_SUFFIX}")
}

/// Relation group whose begin field is `field`.
pub(crate) fn relation_group_of(field: &str) -> Option<&str> {
    field.strip_suffix(RELATION_BEGIN_SUFFIX)
}

/// Name of the end field of relation group `group`.
#[must_use]
pub fn relation_end_field(group: &str) -> String {
    format!("{group}/TijdvakRelatie/einddatumRelatie")
}

fn date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Whether a begin/end pair forms an open window.
///
/// The begin date is mandatory. An end date equal to the begin date is
/// accepted; one strictly before it is not.
///
/// # Examples
/// ```
/// use atlas_core::validity::window_is_open;
///
/// assert!(window_is_open(Some("20100101"), None));
/// assert!(window_is_open(Some("20100101"), Some("20100101")));
/// assert!(!window_is_open(Some("20100102"), Some("20100101")));
/// assert!(!window_is_open(None, None));
/// ```
#[must_use]
pub fn window_is_open(begin: Option<&str>, end: Option<&str>) -> bool {
    let Some(begin) = begin.and_then(date) else {
        return false;
    };
    match end {
        None => true,
        Some(raw) => date(raw).is_some_and(|end| end >= begin),
    }
}

/// Whether a relation window is open; a fully empty window means the
/// relation is absent, which does not invalidate the row.
#[must_use]
pub fn relation_window_is_open(begin: Option<&str>, end: Option<&str>) -> bool {
    if begin.is_none() && end.is_none() {
        return true;
    }
    window_is_open(begin, end)
}

/// Whether `record`'s own window and the window of every relation group in
/// `relations` are open.
///
/// Rejection here is expected and frequent, so nothing is logged.
#[must_use]
pub fn is_valid(record: &Record, relations: &[&str]) -> bool {
    if !window_is_open(record.value(BEGIN_GELDIGHEID), record.value(EIND_GELDIGHEID)) {
        return false;
    }
    relations.iter().all(|group| {
        relation_window_is_open(
            record.value(&relation_begin_field(group)),
            record.value(&relation_end_field(group)),
        )
    })
}
