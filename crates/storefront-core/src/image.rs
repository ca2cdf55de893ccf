//! Image URL resolution.
//!
//! Picks one URL out of an [`ImageRecord`] and makes it absolute. The
//! original upload wins, then the named variants from largest to smallest.
//! Missing or blank fields resolve to `None`; callers render a "no image"
//! placeholder instead of a broken reference.

use url::Url;

use crate::models::ImageRecord;

/// Variant names tried after the original URL, largest first.
pub const VARIANT_PREFERENCE: [&str; 3] = ["large", "medium", "small"];

/// Variant tried first for card thumbnails.
pub const THUMBNAIL_VARIANT: &str = "small";

/// Resolve the best available URL for a single image record.
pub fn resolve(record: &ImageRecord, base_url: &str) -> Option<String> {
    let raw = non_blank(record.url.as_deref()).or_else(|| {
        VARIANT_PREFERENCE
            .iter()
            .find_map(|name| non_blank(record.variant(name).map(|v| v.url.as_str())))
    })?;
    Some(absolutize(raw, base_url))
}

/// Resolve the first record in `images` that yields a URL.
pub fn resolve_first(images: &[ImageRecord], base_url: &str) -> Option<String> {
    images.iter().find_map(|record| resolve(record, base_url))
}

/// Resolve a small rendition for grid cards, falling back to [`resolve`].
pub fn resolve_thumbnail(images: &[ImageRecord], base_url: &str) -> Option<String> {
    images.iter().find_map(|record| {
        non_blank(record.variant(THUMBNAIL_VARIANT).map(|v| v.url.as_str()))
            .map(|raw| absolutize(raw, base_url))
            .or_else(|| resolve(record, base_url))
    })
}

/// Prefix a relative URL with `base_url`; absolute URLs pass through.
pub fn absolutize(raw: &str, base_url: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("//") || Url::parse(raw).is_ok() {
        return raw.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if raw.starts_with('/') {
        format!("{}{}", base, raw)
    } else {
        format!("{}/{}", base, raw)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageVariant;

    const BASE: &str = "http://localhost:1337";

    fn variant(url: &str) -> ImageVariant {
        ImageVariant {
            url: url.to_string(),
            width: None,
            height: None,
        }
    }

    fn record(url: Option<&str>, variants: &[(&str, &str)]) -> ImageRecord {
        ImageRecord {
            url: url.map(str::to_string),
            alternative_text: None,
            formats: variants
                .iter()
                .map(|(name, u)| (name.to_string(), variant(u)))
                .collect(),
        }
    }

    #[test]
    fn test_only_small_relative_gets_prefixed() {
        let r = record(None, &[("small", "/uploads/small_burger.jpg")]);
        assert_eq!(
            resolve(&r, BASE).as_deref(),
            Some("http://localhost:1337/uploads/small_burger.jpg")
        );
    }

    #[test]
    fn test_only_small_absolute_is_unchanged() {
        let r = record(None, &[("small", "https://cdn.example.com/small_burger.jpg")]);
        assert_eq!(
            resolve(&r, BASE).as_deref(),
            Some("https://cdn.example.com/small_burger.jpg")
        );
    }

    #[test]
    fn test_original_beats_large() {
        let r = record(
            Some("/uploads/burger.jpg"),
            &[("large", "/uploads/large_burger.jpg")],
        );
        assert_eq!(
            resolve(&r, BASE).as_deref(),
            Some("http://localhost:1337/uploads/burger.jpg")
        );
    }

    #[test]
    fn test_variant_preference_order() {
        let r = record(
            None,
            &[
                ("small", "/s.jpg"),
                ("medium", "/m.jpg"),
                ("thumbnail", "/t.jpg"),
            ],
        );
        assert_eq!(resolve(&r, BASE).as_deref(), Some("http://localhost:1337/m.jpg"));
    }

    #[test]
    fn test_blank_original_falls_through() {
        let r = record(Some("  "), &[("large", "/l.jpg")]);
        assert_eq!(resolve(&r, BASE).as_deref(), Some("http://localhost:1337/l.jpg"));
    }

    #[test]
    fn test_nothing_resolves_to_none() {
        assert_eq!(resolve(&ImageRecord::default(), BASE), None);
        // thumbnail alone is not part of the preference list
        assert_eq!(resolve(&record(None, &[("thumbnail", "/t.jpg")]), BASE), None);
        assert_eq!(resolve_first(&[], BASE), None);
    }

    #[test]
    fn test_resolve_first_skips_empty_records() {
        let images = vec![ImageRecord::default(), record(Some("/second.jpg"), &[])];
        assert_eq!(
            resolve_first(&images, BASE).as_deref(),
            Some("http://localhost:1337/second.jpg")
        );
    }

    #[test]
    fn test_thumbnail_prefers_small() {
        let images = vec![record(Some("/full.jpg"), &[("small", "/small.jpg")])];
        assert_eq!(
            resolve_thumbnail(&images, BASE).as_deref(),
            Some("http://localhost:1337/small.jpg")
        );
        let no_small = vec![record(Some("/full.jpg"), &[])];
        assert_eq!(
            resolve_thumbnail(&no_small, BASE).as_deref(),
            Some("http://localhost:1337/full.jpg")
        );
    }

    #[test]
    fn test_absolutize_slashes() {
        assert_eq!(absolutize("/a.png", "http://h/"), "http://h/a.png");
        assert_eq!(absolutize("a.png", "http://h"), "http://h/a.png");
        assert_eq!(absolutize("//cdn.h/a.png", "http://h"), "//cdn.h/a.png");
    }
}
