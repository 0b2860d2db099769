//! Overpass interpreter JSON response types.
//!
//! Only the parts needed for an existence check are decoded: the `elements`
//! array and the optional `remark` the interpreter uses to report runtime
//! errors alongside an HTTP 200.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL>

use serde::Deserialize;
use serde::de::IgnoredAny;

/// Prefix the interpreter uses in `remark` when a query aborted.
const RUNTIME_ERROR_PREFIX: &str = "runtime error";

/// Overpass interpreter response in `[out:json]` format.
#[derive(Debug, Deserialize)]
pub struct InterpreterResponse {
    /// Matched elements; at most one with `out 1;`. Only their presence
    /// matters, so their contents are skipped.
    pub elements: Vec<IgnoredAny>,

    /// Diagnostic message from the interpreter, if any.
    #[serde(default)]
    pub remark: Option<String>,
}

impl InterpreterResponse {
    /// Check whether at least one element was returned.
    #[must_use]
    pub fn has_elements(&self) -> bool {
        !self.elements.is_empty()
    }

    /// The interpreter's runtime error, when the query aborted early.
    ///
    /// A runtime error accompanied by elements is ignored: a match was found
    /// before the interpreter gave up.
    #[must_use]
    pub fn runtime_error(&self) -> Option<&str> {
        if self.has_elements() {
            return None;
        }
        self.remark
            .as_deref()
            .filter(|remark| remark.trim_start().starts_with(RUNTIME_ERROR_PREFIX))
    }
}
