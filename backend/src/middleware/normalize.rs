//! Route label normalization for bounded-cardinality metrics.
//!
//! Raw paths carry resource ids, so a metrics dimension keyed on them would
//! grow with every distinct id ever requested. Collapsing purely numeric
//! segments bounds the label set to the number of route shapes.

/// Replaces every path segment consisting solely of decimal digits with a
/// `*` wildcard. Idempotent; all other segments pass through untouched.
pub fn normalize_route(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                "*"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
