//! # Field Normalization
//!
//! Trims and re-cases free-text fields before they are persisted.
//!
//! ## Pipeline
//! ```text
//! value ──► absent? ──► required? ── yes ──► Required error
//!              │             └────── no  ──► None (pass-through)
//!              ▼
//!            trim
//!              │
//!              ▼
//!           empty? ── and required ──► Required error
//!              │
//!              ▼
//!        casing (first match wins)
//!          1. as_unique_lowercase     → "john@mail.com"
//!          2. as_title_case           → "John Smith"
//!          3. as_capitalized_sentence → "Hello world"
//!          4. none                    → trimmed value
//! ```
//!
//! Lowercase wins over the other casings: a field canonicalized for
//! uniqueness comparisons must never carry display casing. Normalizing is
//! idempotent for a fixed set of options.

use serde_json::Value;

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Options
// =============================================================================

/// Which transforms [`normalize_field`] applies.
///
/// ## Example
/// ```rust
/// use bozor_core::normalize::{normalize_field, NormalizeOptions};
///
/// let opts = NormalizeOptions::new().title();
/// let name = normalize_field("first_name", Some(" john "), opts).unwrap();
/// assert_eq!(name.as_deref(), Some("John"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub as_title_case: bool,
    pub as_capitalized_sentence: bool,
    pub as_unique_lowercase: bool,
    pub required: bool,
}

impl NormalizeOptions {
    /// Trim only, optional field.
    pub const fn new() -> Self {
        NormalizeOptions {
            as_title_case: false,
            as_capitalized_sentence: false,
            as_unique_lowercase: false,
            required: false,
        }
    }

    pub const fn title(self) -> Self {
        NormalizeOptions {
            as_title_case: true,
            ..self
        }
    }

    pub const fn capitalize(self) -> Self {
        NormalizeOptions {
            as_capitalized_sentence: true,
            ..self
        }
    }

    pub const fn unique(self) -> Self {
        NormalizeOptions {
            as_unique_lowercase: true,
            ..self
        }
    }

    pub const fn required(self) -> Self {
        NormalizeOptions {
            required: true,
            ..self
        }
    }

    /// Resolves the casing transform according to precedence.
    pub const fn casing(&self) -> Casing {
        if self.as_unique_lowercase {
            Casing::Lowercase
        } else if self.as_title_case {
            Casing::Title
        } else if self.as_capitalized_sentence {
            Casing::Capitalize
        } else {
            Casing::Keep
        }
    }
}

/// The single casing transform applied after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    Keep,
    Title,
    Capitalize,
    Lowercase,
}

impl Casing {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Casing::Keep => value.to_string(),
            Casing::Title => to_title_case(value),
            Casing::Capitalize => to_capitalized(value),
            Casing::Lowercase => value.to_lowercase(),
        }
    }
}

// =============================================================================
// Normalizers
// =============================================================================

/// Normalizes an optional string field.
///
/// ## Returns
/// * `Ok(None)` - value absent and not required
/// * `Ok(Some(s))` - trimmed and re-cased value (may be empty when not required)
/// * `Err(Required)` - absent or blank and required
pub fn normalize_field(
    field: &str,
    value: Option<&str>,
    options: NormalizeOptions,
) -> ValidationResult<Option<String>> {
    let Some(value) = value else {
        if options.required {
            return Err(ValidationError::required(field));
        }
        return Ok(None);
    };

    let trimmed = value.trim();

    if trimmed.is_empty() && options.required {
        return Err(ValidationError::required(field));
    }

    Ok(Some(options.casing().apply(trimmed)))
}

/// Normalizes a field that must be present.
///
/// ## Example
/// ```rust
/// use bozor_core::normalize::{normalize_required, NormalizeOptions};
///
/// let email = normalize_required("email", "JOHN@MAIL.COM", NormalizeOptions::new().unique());
/// assert_eq!(email.unwrap(), "john@mail.com");
///
/// assert!(normalize_required("email", "   ", NormalizeOptions::new()).is_err());
/// ```
pub fn normalize_required(
    field: &str,
    value: &str,
    options: NormalizeOptions,
) -> ValidationResult<String> {
    normalize_field(field, Some(value), options.required())?
        .ok_or_else(|| ValidationError::required(field))
}

/// Normalizes an optional field, treating blank input as absent.
pub fn normalize_optional(
    field: &str,
    value: Option<&str>,
    options: NormalizeOptions,
) -> ValidationResult<Option<String>> {
    let normalized = normalize_field(field, value, NormalizeOptions { required: false, ..options })?;
    Ok(normalized.filter(|s| !s.is_empty()))
}

/// Normalizes a loosely-typed JSON value from a request body.
///
/// Numbers and booleans are coerced to their string form. `null` is treated
/// as absent. Arrays and objects are rejected with `InvalidFieldType`.
///
/// ## Example
/// ```rust
/// use bozor_core::normalize::{normalize_json_field, NormalizeOptions};
/// use serde_json::json;
///
/// let project = normalize_json_field("project_name", &json!(2024), NormalizeOptions::new());
/// assert_eq!(project.unwrap().as_deref(), Some("2024"));
///
/// assert!(normalize_json_field("project_name", &json!(["a"]), NormalizeOptions::new()).is_err());
/// ```
pub fn normalize_json_field(
    field: &str,
    value: &Value,
    options: NormalizeOptions,
) -> ValidationResult<Option<String>> {
    let text = match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) => {
            return Err(ValidationError::InvalidFieldType {
                field: field.to_string(),
                found: "array".to_string(),
            })
        }
        Value::Object(_) => {
            return Err(ValidationError::InvalidFieldType {
                field: field.to_string(),
                found: "object".to_string(),
            })
        }
    };

    normalize_field(field, text.as_deref(), options)
}

/// Rejects values longer than `max` characters.
pub fn ensure_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// Casing Helpers
// =============================================================================

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word starts at any letter that does not follow another letter, so
/// `"o'neil-smith"` becomes `"O'Neil-Smith"`.
pub fn to_title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_letter = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if prev_letter {
                out.push(lower_one(ch));
            } else {
                push_initial(&mut out, ch);
            }
            prev_letter = true;
        } else {
            out.push(ch);
            prev_letter = false;
        }
    }

    out
}

/// Upper-cases the first character and lower-cases the rest.
pub fn to_capitalized(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(value.len());
            push_initial(&mut out, first);
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

/// Title-cases one word-initial character: `ß` → `Ss`, `ﬁ` → `Fi`.
///
/// Only the first char of the uppercase mapping stays upper. The tail is
/// kept (lowercased) when it is made of letters, so a second pass sees the
/// same word boundaries; a tail of combining marks is dropped.
fn push_initial(out: &mut String, ch: char) {
    let mut upper = ch.to_uppercase();
    let Some(head) = upper.next() else {
        return;
    };
    out.push(head);

    let tail: Vec<char> = upper.collect();
    if tail.iter().all(|c| c.is_alphabetic()) {
        out.extend(tail.into_iter().map(lower_one));
    }
}

/// Single-char lowercase mapping (`İ` → `i`, not `i` + combining dot).
fn lower_one(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const FIELD: &str = "value";

    fn norm(value: Option<&str>, options: NormalizeOptions) -> ValidationResult<Option<String>> {
        normalize_field(FIELD, value, options)
    }

    #[test]
    fn test_title_case() {
        let out = norm(Some(" john "), NormalizeOptions::new().title()).unwrap();
        assert_eq!(out.as_deref(), Some("John"));

        let out = norm(Some("mARY o'neil-SMITH"), NormalizeOptions::new().title()).unwrap();
        assert_eq!(out.as_deref(), Some("Mary O'Neil-Smith"));

        let out = norm(Some("алишер навоий"), NormalizeOptions::new().title()).unwrap();
        assert_eq!(out.as_deref(), Some("Алишер Навоий"));
    }

    #[test]
    fn test_unique_lowercase() {
        let out = norm(Some("JOHN@MAIL.COM"), NormalizeOptions::new().unique()).unwrap();
        assert_eq!(out.as_deref(), Some("john@mail.com"));
    }

    #[test]
    fn test_capitalized_sentence() {
        let out = norm(Some("hello world"), NormalizeOptions::new().capitalize()).unwrap();
        assert_eq!(out.as_deref(), Some("Hello world"));

        let out = norm(Some("  iPHONE 15 PRO "), NormalizeOptions::new().capitalize()).unwrap();
        assert_eq!(out.as_deref(), Some("Iphone 15 pro"));
    }

    #[test]
    fn test_required_and_absent() {
        let err = norm(Some(""), NormalizeOptions::new().required()).unwrap_err();
        assert_eq!(err, ValidationError::required(FIELD));

        let err = norm(Some("   \t"), NormalizeOptions::new().required()).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));

        let err = norm(None, NormalizeOptions::new().required()).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));

        assert_eq!(norm(None, NormalizeOptions::new()).unwrap(), None);
        assert_eq!(norm(Some("  "), NormalizeOptions::new()).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_lowercase_wins_over_other_casings() {
        let opts = NormalizeOptions::new().title().capitalize().unique();
        assert_eq!(opts.casing(), Casing::Lowercase);
        assert_eq!(
            norm(Some("John Smith"), opts).unwrap().as_deref(),
            Some("john smith")
        );

        let opts = NormalizeOptions::new().title().capitalize();
        assert_eq!(opts.casing(), Casing::Title);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            " john SMITH ",
            "JOHN@MAIL.COM",
            "hello WORLD",
            "  ",
            "o'neil-smith 2nd",
            "тошкент шаҳри",
            "ßtraße",
            "ﬁle ﬂow",
            "aİb İstanbul",
            "ᾷ ΐx ŉa",
        ];
        let option_sets = [
            NormalizeOptions::new(),
            NormalizeOptions::new().title(),
            NormalizeOptions::new().capitalize(),
            NormalizeOptions::new().unique(),
            NormalizeOptions::new().title().unique(),
        ];

        for input in inputs {
            for opts in option_sets {
                let once = norm(Some(input), opts).unwrap();
                let twice = norm(once.as_deref(), opts).unwrap();
                assert_eq!(once, twice, "input {input:?} options {opts:?}");
            }
        }
    }

    #[test]
    fn test_multi_char_uppercase_mappings() {
        let title = NormalizeOptions::new().title();
        assert_eq!(norm(Some("ßtraße"), title).unwrap().as_deref(), Some("Sstraße"));
        assert_eq!(norm(Some("ﬁle"), title).unwrap().as_deref(), Some("File"));

        let capitalize = NormalizeOptions::new().capitalize();
        assert_eq!(norm(Some("ßTRASSE"), capitalize).unwrap().as_deref(), Some("Sstrasse"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn prop_normalization_is_idempotent(input in "\\PC{0,24}", casing in 0usize..5) {
            let opts = [
                NormalizeOptions::new(),
                NormalizeOptions::new().title(),
                NormalizeOptions::new().capitalize(),
                NormalizeOptions::new().unique(),
                NormalizeOptions::new().title().capitalize(),
            ][casing];

            let once = norm(Some(&input), opts).unwrap();
            let twice = norm(once.as_deref(), opts).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_normalized_value_is_trimmed(input in "\\PC{0,24}") {
            let out = norm(Some(&input), NormalizeOptions::new().title()).unwrap().unwrap_or_default();
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }

    #[test]
    fn test_normalize_optional_drops_blank() {
        let out = normalize_optional("street", Some("   "), NormalizeOptions::new()).unwrap();
        assert_eq!(out, None);

        let out = normalize_optional("street", Some(" Amir Temur "), NormalizeOptions::new()).unwrap();
        assert_eq!(out.as_deref(), Some("Amir Temur"));
    }

    #[test]
    fn test_json_coercion() {
        let opts = NormalizeOptions::new();
        assert_eq!(
            normalize_json_field(FIELD, &json!(" text "), opts).unwrap().as_deref(),
            Some("text")
        );
        assert_eq!(
            normalize_json_field(FIELD, &json!(12.5), opts).unwrap().as_deref(),
            Some("12.5")
        );
        assert_eq!(
            normalize_json_field(FIELD, &json!(true), opts).unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(normalize_json_field(FIELD, &json!(null), opts).unwrap(), None);

        let err = normalize_json_field(FIELD, &json!({"a": 1}), opts).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFieldType { ref found, .. } if found == "object"));

        let err = normalize_json_field(FIELD, &json!(null), opts.required()).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }

    #[test]
    fn test_ensure_max_len_counts_chars() {
        assert!(ensure_max_len(FIELD, "Тошкент", 7).is_ok());
        assert!(ensure_max_len(FIELD, "Тошкентт", 7).is_err());
    }
}
