//! Product name normalization.

/// Turn a target name into the product name Xcode gives the built framework.
///
/// Every character outside `[0-9a-zA-Z]` becomes `_`, then a leading digit is
/// replaced with `_`. The result is used for every path component derived
/// from a target name. Applying it twice gives the same result as once.
pub fn normalize_product_name(name: &str) -> String {
    let mut normalized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    if normalized.starts_with(|c: char| c.is_ascii_digit()) {
        normalized.replace_range(..1, "_");
    }

    normalized
}
