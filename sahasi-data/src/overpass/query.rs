//! Overpass QL rendering for proximity requests.

use std::fmt;
use std::time::Duration;

use sahasi_core::{PoiCategory, ProximityRequest, TagMatch};

/// Characters with special meaning in Overpass (POSIX extended) regexes.
const REGEX_METACHARACTERS: &[char] = &[
    '\\', '.', '^', '$', '|', '?', '*', '+', '(', ')', '[', ']', '{', '}',
];

/// A rendered Overpass QL query asking whether any category matches near a
/// coordinate.
///
/// The query unions one `around` clause per category and ends with `out 1;`
/// so the interpreter stops after the first match.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sahasi_core::{
///     Coordinate, ElementKind, PoiCategory, PoiCategorySet, ProximityRequest, SearchRadius,
/// };
/// use sahasi_data::OverpassQuery;
///
/// let categories =
///     PoiCategorySet::new([PoiCategory::exact(ElementKind::Node, "amenity", "police")])?;
/// let coordinate = Coordinate::new(12.5, 77.25)?;
/// let request = ProximityRequest::new(&categories, coordinate, SearchRadius::DEFAULT);
///
/// let query = OverpassQuery::build(&request, Duration::from_secs(15));
/// assert_eq!(
///     query.as_str(),
///     r#"[out:json][timeout:15];(node["amenity"="police"](around:600,12.5,77.25););out 1;"#
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassQuery {
    text: String,
}

impl OverpassQuery {
    /// Render `request` with a server-side `timeout`.
    ///
    /// Sub-second timeouts are rounded up to one second, the smallest value
    /// the interpreter accepts.
    #[must_use]
    pub fn build(request: &ProximityRequest<'_>, timeout: Duration) -> Self {
        let timeout_secs = timeout.as_secs().max(1);
        let around = format!(
            "(around:{},{},{})",
            request.radius.metres(),
            request.coordinate.latitude(),
            request.coordinate.longitude()
        );

        let mut text = format!("[out:json][timeout:{timeout_secs}];(");
        for category in request.categories {
            push_clause(&mut text, category, &around);
        }
        text.push_str(");out 1;");
        Self { text }
    }

    /// The query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Form fields for an interpreter `POST`.
    #[must_use]
    pub fn form_fields(&self) -> [(&'static str, &str); 1] {
        [("data", self.text.as_str())]
    }

    /// Consume the query and return its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for OverpassQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn push_clause(text: &mut String, category: &PoiCategory, around: &str) {
    let key = escape_literal(category.key());
    let filter = match category.matcher() {
        TagMatch::Exact(value) => format!("[\"{key}\"=\"{}\"]", escape_literal(value)),
        TagMatch::AnyOf(values) => {
            let alternatives = values
                .iter()
                .map(|value| escape_regex(value))
                .collect::<Vec<_>>()
                .join("|");
            format!("[\"{key}\"~\"^({})$\"]", escape_literal(&alternatives))
        }
    };
    text.push_str(category.element().as_str());
    text.push_str(&filter);
    text.push_str(around);
    text.push(';');
}

/// Escape a value for use inside a double-quoted Overpass string.
fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '"') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escape regex metacharacters so `value` matches literally.
fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if REGEX_METACHARACTERS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
