//! Key-name normalization shared by hat-block scanning (load time) and
//! `sensing_keypressed` (run time), so both sides of the active-keys
//! index agree on the same canonical spelling.

use std::sync::Arc;

/// Normalize a raw SB3 key name: single letters are uppercased; named
/// keys (`"space"`, `"up arrow"`, …) are kept verbatim.
pub fn normalize(raw: &str) -> Arc<str> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Arc::from(c.to_ascii_uppercase().to_string().as_str()),
        _ => Arc::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letters_uppercase() {
        assert_eq!(normalize("a").as_ref(), "A");
        assert_eq!(normalize("Z").as_ref(), "Z");
    }

    #[test]
    fn named_keys_kept_verbatim() {
        assert_eq!(normalize("space").as_ref(), "space");
        assert_eq!(normalize("up arrow").as_ref(), "up arrow");
    }
}
