//! SEO slugs for property detail URLs.
//!
//! The slug is derived from the current title on every call and never stored,
//! so a title edit immediately changes the canonical URL. Old links keep
//! working because detail requests are resolved by identifier and redirected
//! when the slug part is stale.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::entity::property;

/// Path prefix of the public catalog.
pub const CATALOG_PATH: &str = "/biens";

const SEPARATOR: char = '-';

/// Outcome of matching a requested slug against a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugResolution {
    /// Requested slug is canonical.
    Serve,
    /// Requested slug is stale or wrong; carries the canonical path.
    RedirectTo(String),
}

/// `{slug}-{id}` path segment of a detail URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailReference {
    pub slug: String,
    pub id: i32,
}

impl DetailReference {
    /// Split a detail path segment at its last separator.
    ///
    /// Returns `None` when the segment does not end with `-<digits>`.
    pub fn parse(segment: &str) -> Option<Self> {
        let (slug, id) = segment.rsplit_once(SEPARATOR)?;
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let id = id.parse::<i32>().ok()?;
        Some(Self {
            slug: slug.to_string(),
            id,
        })
    }
}

struct SlugBuilder {
    slug: String,
    gap: bool,
}

impl SlugBuilder {
    fn push(&mut self, c: char) {
        if c.is_ascii_alphanumeric() {
            if self.gap && !self.slug.is_empty() {
                self.slug.push(SEPARATOR);
            }
            self.gap = false;
            self.slug.push(c.to_ascii_lowercase());
        } else {
            self.gap = true;
        }
    }
}

/// Letters that do not decompose into a base letter plus combining marks.
fn transliterate(c: char) -> Option<&'static str> {
    match c {
        'œ' | 'Œ' => Some("oe"),
        'æ' | 'Æ' => Some("ae"),
        'ß' => Some("ss"),
        'ø' | 'Ø' => Some("o"),
        'ł' | 'Ł' => Some("l"),
        'đ' | 'Đ' => Some("d"),
        _ => None,
    }
}

/// Fold text for case- and accent-insensitive matching.
///
/// Letters are lowercased and stripped of diacritics; every other character
/// is kept as is.
pub fn search_key(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut key = String::with_capacity(lowered.len());
    for c in lowered.nfd().filter(|c| !is_combining_mark(*c)) {
        match transliterate(c) {
            Some(replacement) => key.push_str(replacement),
            None => key.push(c),
        }
    }
    key
}

/// Derive the URL slug of a title.
///
/// Lowercase ASCII, diacritics stripped, every run of other characters
/// collapsed into a single `-`, never a leading or trailing `-`.
pub fn slug_for(title: &str) -> String {
    let mut builder = SlugBuilder {
        slug: String::with_capacity(title.len()),
        gap: false,
    };
    search_key(title).chars().for_each(|c| builder.push(c));
    builder.slug
}

/// Canonical detail path for a slug and identifier.
pub fn detail_path(slug: &str, id: i32) -> String {
    format!("{}/{}{}{}", CATALOG_PATH, slug, SEPARATOR, id)
}

/// Canonical detail path of a property.
pub fn canonical_path(property: &property::Model) -> String {
    detail_path(&slug_for(&property.title), property.id)
}

/// Compare a requested slug with the canonical slug of `property`.
pub fn resolve(requested: &str, property: &property::Model) -> SlugResolution {
    let canonical = slug_for(&property.title);
    if requested == canonical {
        SlugResolution::Serve
    } else {
        SlugResolution::RedirectTo(detail_path(&canonical, property.id))
    }
}
