//! JSON person-list filtering.
//!
//! Input is a JSON array of `{"data": {...}}` envelopes (see [`crate::types`]). The whole
//! document is buffered and deserialized at once; survivors of the [`PersonFilter`] are written
//! back as a compact JSON array in input order. A leading UTF-8 byte-order mark is dropped, and
//! `null` array elements are skipped like envelopes without `data`.

use std::io::Read;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{TransformError, TransformResult};
use crate::processing::filter;
use crate::types::{PersonEnvelope, PersonRecord};

/// Predicate applied to each [`PersonRecord`].
///
/// A record matches when its `name` contains `name_substring` (case-insensitive) and its `age` is
/// at least `min_age`. Records without a name never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonFilter {
    pub name_substring: String,
    pub min_age: i64,
}

impl Default for PersonFilter {
    fn default() -> Self {
        Self {
            name_substring: "John".to_string(),
            min_age: 30,
        }
    }
}

impl PersonFilter {
    /// Returns `true` if `record` passes the filter.
    pub fn matches(&self, record: &PersonRecord) -> bool {
        let Some(name) = record.name.as_deref() else {
            return false;
        };
        record.age >= self.min_age
            && name
                .to_lowercase()
                .contains(&self.name_substring.to_lowercase())
    }

    /// Returns `true` if the envelope carries a record that passes the filter.
    pub fn matches_envelope(&self, envelope: &PersonEnvelope) -> bool {
        envelope.data.as_ref().is_some_and(|d| self.matches(d))
    }
}

/// Filter the envelopes in `reader` and return the survivors as JSON text.
///
/// ```rust
/// use upload_transform::transform::{transform_json, PersonFilter};
///
/// let input = r#"[{"data":{"name":"Johnny","age":35}},{"data":{"name":"Jane","age":40}}]"#;
/// let out = transform_json(input.as_bytes(), "people.json", &PersonFilter::default()).unwrap();
/// assert_eq!(out, r#"[{"data":{"name":"Johnny","age":35}}]"#);
/// ```
pub fn transform_json<R: Read>(
    mut reader: R,
    filename: &str,
    person_filter: &PersonFilter,
) -> TransformResult<String> {
    let started = Instant::now();
    info!(filename, "reading JSON content");

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| TransformError::Io {
            filename: filename.to_owned(),
            source,
        })?;

    let envelopes = parse_envelopes(&text, filename)?;

    let missing = envelopes.iter().filter(|e| e.data.is_none()).count();
    if missing > 0 {
        warn!(filename, records = missing, "skipping records without a data object");
    }

    let kept = filter(&envelopes, |e| person_filter.matches_envelope(e));
    let out = serde_json::to_string(&kept).map_err(|source| TransformError::Encode {
        filename: filename.to_owned(),
        source,
    })?;

    info!(
        filename,
        records = envelopes.len(),
        kept = kept.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "JSON transformation completed"
    );
    Ok(out)
}

fn parse_envelopes(text: &str, filename: &str) -> TransformResult<Vec<PersonEnvelope>> {
    let empty = || TransformError::EmptyPayload {
        filename: filename.to_owned(),
    };

    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    if text.trim().is_empty() {
        warn!(filename, "JSON content is empty");
        return Err(empty());
    }

    let parsed: Option<Vec<Option<PersonEnvelope>>> =
        serde_json::from_str(text).map_err(|source| TransformError::MalformedJson {
            filename: filename.to_owned(),
            source,
        })?;

    let Some(elements) = parsed else {
        warn!(filename, "deserialized JSON data is null");
        return Err(empty());
    };
    Ok(elements.into_iter().map(Option::unwrap_or_default).collect())
}
