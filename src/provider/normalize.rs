//! Name normalization.

/// Replace every run of characters that are neither letters nor digits with `-`.
///
/// Leading and trailing runs are dropped, so `"!web!"` becomes `"web"`.
pub fn normalize(name: &str) -> String {
    name.split(|c: char| !c.is_alphabetic() && !c.is_numeric())
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
