//! Tag predicates describing the kinds of POI that signal a safer area.
//!
//! Categories mirror OpenStreetMap's key/value tagging. A [`PoiCategorySet`]
//! is fixed once built: it exposes no mutating API and clones share the same
//! backing slice.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// OpenStreetMap element type a category applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A single tagged point.
    Node,
    /// A tagged polyline or area outline.
    Way,
    /// A tagged grouping of other elements.
    Relation,
}

impl ElementKind {
    /// Lower-case OSM name of the element type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a category matches the value of its tag key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagMatch {
    /// The tag value must equal the given string.
    Exact(String),
    /// The tag value must equal one of the given strings.
    AnyOf(Vec<String>),
}

/// A single tag predicate such as `node["amenity"="police"]`.
///
/// # Examples
///
/// ```
/// use sahasi_core::{ElementKind, PoiCategory, TagMatch};
///
/// let police = PoiCategory::exact(ElementKind::Node, "amenity", "police");
/// assert_eq!(police.key(), "amenity");
/// assert_eq!(police.matcher(), &TagMatch::Exact("police".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoiCategory {
    element: ElementKind,
    key: String,
    matcher: TagMatch,
}

impl PoiCategory {
    /// Category matching `key=value` exactly.
    #[must_use]
    pub fn exact(element: ElementKind, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            element,
            key: key.into(),
            matcher: TagMatch::Exact(value.into()),
        }
    }

    /// Category matching `key` against any of `values`.
    #[must_use]
    pub fn any_of<I, S>(element: ElementKind, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            element,
            key: key.into(),
            matcher: TagMatch::AnyOf(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Element type the predicate applies to.
    #[must_use]
    pub const fn element(&self) -> ElementKind {
        self.element
    }

    /// Tag key inspected by the predicate.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value matcher for the tag.
    #[must_use]
    pub const fn matcher(&self) -> &TagMatch {
        &self.matcher
    }
}

/// Errors returned by [`PoiCategorySet::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CategorySetError {
    /// No categories were supplied.
    #[error("a category set must contain at least one category")]
    Empty,
}

/// Immutable, ordered collection of [`PoiCategory`] predicates.
///
/// # Examples
///
/// ```
/// use sahasi_core::{ElementKind, PoiCategorySet};
///
/// let set = PoiCategorySet::safety_defaults();
/// assert_eq!(set.len(), 9);
/// assert!(set.iter().all(|c| c.element() == ElementKind::Node));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiCategorySet {
    categories: Arc<[PoiCategory]>,
}

impl PoiCategorySet {
    /// Validate and construct a category set, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`CategorySetError::Empty`] when `categories` yields nothing.
    pub fn new<I>(categories: I) -> Result<Self, CategorySetError>
    where
        I: IntoIterator<Item = PoiCategory>,
    {
        let categories: Arc<[PoiCategory]> = categories.into_iter().collect();
        if categories.is_empty() {
            return Err(CategorySetError::Empty);
        }
        Ok(Self { categories })
    }

    /// Public amenities that indicate a populated, staffed or lit area.
    ///
    /// Police, hospitals, clinics, shelters, ATMs, banks, food and drink
    /// venues, hotels and hostels; all matched on OSM nodes.
    #[must_use]
    pub fn safety_defaults() -> Self {
        let categories: Arc<[PoiCategory]> = Arc::from([
            PoiCategory::exact(ElementKind::Node, "amenity", "police"),
            PoiCategory::exact(ElementKind::Node, "amenity", "hospital"),
            PoiCategory::exact(ElementKind::Node, "amenity", "clinic"),
            PoiCategory::exact(ElementKind::Node, "amenity", "shelter"),
            PoiCategory::exact(ElementKind::Node, "amenity", "atm"),
            PoiCategory::exact(ElementKind::Node, "amenity", "bank"),
            PoiCategory::any_of(
                ElementKind::Node,
                "amenity",
                ["restaurant", "cafe", "fast_food", "bar", "pub"],
            ),
            PoiCategory::exact(ElementKind::Node, "tourism", "hotel"),
            PoiCategory::exact(ElementKind::Node, "tourism", "hostel"),
        ]);
        Self { categories }
    }

    /// Iterate over the categories in their configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, PoiCategory> {
        self.categories.iter()
    }

    /// Number of categories in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always `false`; construction rejects empty sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for PoiCategorySet {
    fn default() -> Self {
        Self::safety_defaults()
    }
}

impl<'a> IntoIterator for &'a PoiCategorySet {
    type Item = &'a PoiCategory;
    type IntoIter = std::slice::Iter<'a, PoiCategory>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
