//! Slot-name normalization.

/// Turn a player-supplied save slot name into a store-safe slug.
///
/// ASCII letters and digits are lowercased and kept, `-` and `_` are kept, and any other run
/// of characters becomes a single `-`. Leading and trailing separators are dropped. A name
/// with nothing usable in it becomes `"slot"`.
pub fn sanitize_slug(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut gap = false;
    for ch in raw.trim().chars() {
        match ch {
            c if c.is_ascii_alphanumeric() => {
                if gap && !slug.is_empty() {
                    slug.push('-');
                }
                slug.push(c.to_ascii_lowercase());
                gap = false;
            },
            '-' | '_' => {
                if !slug.is_empty() {
                    slug.push(ch);
                }
                gap = false;
            },
            _ => gap = true,
        }
    }
    let slug = slug.trim_matches(['-', '_']);
    if slug.is_empty() { "slot".to_string() } else { slug.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_and_symbols_become_dashes() {
        assert_eq!(sanitize_slug("Before the Boss!"), "before-the-boss");
        assert_eq!(sanitize_slug("  a//b  "), "a-b");
        assert_eq!(sanitize_slug("run_2"), "run_2");
    }

    #[test]
    fn unusable_names_fall_back() {
        assert_eq!(sanitize_slug(""), "slot");
        assert_eq!(sanitize_slug("???"), "slot");
        assert_eq!(sanitize_slug("--"), "slot");
    }
}
