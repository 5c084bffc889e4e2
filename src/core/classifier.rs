//! Environment classification
//!
//! Maps the `environment` value a mod declares to a [`Category`].

use crate::core::models::Category;

/// Classify a declared environment tag.
///
/// `client` and `server` (trimmed, ASCII case-insensitive) select the
/// one-sided categories. A missing tag, `*`, and anything unrecognized fall
/// back to [`Category::Universal`].
pub fn classify(environment: Option<&str>) -> Category {
    let Some(tag) = environment.map(str::trim) else {
        return Category::Universal;
    };

    if tag.eq_ignore_ascii_case("client") {
        Category::ClientOnly
    } else if tag.eq_ignore_ascii_case("server") {
        Category::ServerOnly
    } else {
        Category::Universal
    }
}
