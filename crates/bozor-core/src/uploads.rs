//! # Upload Paths and Slugs
//!
//! Naming conventions for stored files, plus ad slug generation.
//!
//! ```text
//! uploads/
//! ├── icons/
//! │   └── category_{id}-{filename}
//! └── user_{id}/
//!     ├── avatar_{filename}
//!     └── ad_photos/
//!         └── {filename}
//! ```
//!
//! Paths are relative to the media root. The file-storage collaborator
//! resolves them; this module only names them.

use uuid::Uuid;

use crate::error::{ValidationError, ValidationResult};

/// Field name upload failures are attributed to.
pub const FILENAME_FIELD: &str = "filename";

/// Category icon destination.
///
/// ## Example
/// ```rust
/// use bozor_core::uploads::category_icon_path;
///
/// assert_eq!(category_icon_path(4, "cars.svg").unwrap(), "uploads/icons/category_4-cars.svg");
/// assert!(category_icon_path(4, "icons/").is_err());
/// ```
pub fn category_icon_path(category_id: i64, filename: &str) -> ValidationResult<String> {
    Ok(format!("uploads/icons/category_{}-{}", category_id, base_name(filename)?))
}

/// User avatar destination.
pub fn avatar_path(user_id: i64, filename: &str) -> ValidationResult<String> {
    Ok(format!("uploads/user_{}/avatar_{}", user_id, base_name(filename)?))
}

/// Ad photo destination, grouped under the seller's directory.
pub fn ad_photo_path(seller_id: i64, filename: &str) -> ValidationResult<String> {
    Ok(format!("uploads/user_{}/ad_photos/{}", seller_id, base_name(filename)?))
}

/// Strips any directory components a client may have sent.
///
/// Blank names and `.`/`..` are `Required` on [`FILENAME_FIELD`].
fn base_name(filename: &str) -> ValidationResult<&str> {
    let name = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(ValidationError::required(FILENAME_FIELD));
    }
    Ok(name)
}

// =============================================================================
// Slugs
// =============================================================================

const SLUG_BASE_MAX_LEN: usize = 50;
const SLUG_SUFFIX_LEN: usize = 8;

/// Turns a display name into a lowercase ASCII slug.
///
/// - Transliterate with `deunicode` ("Телефон" → "Telefon")
/// - Keep ASCII alphanumerics, map everything else to `-`
/// - Collapse runs of `-` and trim them from both ends
///
/// ## Example
/// ```rust
/// use bozor_core::uploads::slugify;
///
/// assert_eq!(slugify("Samsung Galaxy S23 / 256GB!"), "samsung-galaxy-s23-256gb");
/// assert_eq!(slugify("Тошкент"), "toshkent");
/// ```
pub fn slugify(name: &str) -> String {
    let transliterated = deunicode::deunicode(name);
    let mut out = String::with_capacity(transliterated.len());

    for ch in transliterated.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
        if out.len() >= SLUG_BASE_MAX_LEN {
            break;
        }
    }

    while out.ends_with('-') {
        out.pop();
    }

    out
}

/// Slug plus a random suffix, so equal names never collide.
pub fn unique_slug(name: &str) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SLUG_SUFFIX_LEN)
        .collect();

    let base = slugify(name);
    if base.is_empty() {
        format!("ad-{suffix}")
    } else {
        format!("{base}-{suffix}")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
