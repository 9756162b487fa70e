//! Validation rules for link fields.
//!
//! Each rule only looks at the sub-field that the active link type makes
//! meaningful. Failures are values carrying a message and the path of the
//! sub-field in error; nothing here panics or returns an `Error`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::{AssetLink, Link, LinkValue};

/// Digits, spaces, and hyphens with an optional leading `+`.
#[allow(clippy::expect_used, reason = "hardcoded pattern is a compile-time invariant")]
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s-]*$").expect("valid phone regex"));

/// Characters allowed in a URL fragment, or percent-encoded bytes.
#[allow(clippy::expect_used, reason = "hardcoded pattern is a compile-time invariant")]
static FRAGMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-?/:@._~!$&'()*+,;=a-zA-Z0-9]|%[0-9a-fA-F]{2})*$").expect("valid fragment regex")
});

#[allow(clippy::expect_used, reason = "hardcoded pattern is a compile-time invariant")]
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// URL schemes accepted for external links.
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// A failed rule, shown by the host next to the sub-field at `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// Human-readable message.
    pub message: String,
    /// Sub-field in error. `None` marks the link field as a whole.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidationFailure {
    /// A failure on the link field as a whole.
    pub fn new(message: impl Into<String>) -> Self {
        return Self {
            message: message.into(),
            path: None,
        };
    }

    /// A failure on one sub-field.
    pub fn at(message: impl Into<String>, path: impl Into<String>) -> Self {
        return Self {
            message: message.into(),
            path: Some(path.into()),
        };
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{path}: ")?;
        }
        return f.write_str(&self.message);
    }
}

/// Result of a single rule.
pub type RuleResult = Result<(), ValidationFailure>;

/// Require a link type and a payload for it.
///
/// # Errors
///
/// Returns a failure naming the empty payload field, or a path-less failure
/// when there is no link or no type.
pub fn required_link_field(link: Option<&LinkValue>) -> RuleResult {
    let Some(link) = link else {
        return Err(ValidationFailure::new("Link is required"));
    };

    let (present, message) = match &link.link {
        Link::Custom { link_type, .. } if link_type.is_empty() => {
            return Err(ValidationFailure::new("Link is required"));
        },
        Link::Audio { file, .. } => (has_asset(file.as_ref()), "Audio is required"),
        Link::Custom { value, .. } => (filled(value.as_deref()), "Value is required"),
        Link::Document { file, .. } => (has_asset(file.as_ref()), "Document is required"),
        Link::Email { email } => (filled(email.as_deref()), "E-mail is required"),
        Link::External { url, .. } => (filled(url.as_deref()), "URL is required"),
        Link::Fax { number } => (filled(number.as_deref()), "Fax number is required"),
        Link::Image { image, .. } => (has_asset(image.as_ref()), "Image is required"),
        Link::Internal { reference, .. } => (reference.is_some(), "Link is required"),
        Link::Phone { number } => (filled(number.as_deref()), "Phone is required"),
        Link::Sms { number } => (filled(number.as_deref()), "SMS number is required"),
        Link::Video { file, .. } => (has_asset(file.as_ref()), "Video is required"),
        Link::WhatsApp { number } => (filled(number.as_deref()), "WhatsApp number is required"),
    };

    if present {
        return Ok(());
    }
    return Err(ValidationFailure::at(message, link.link.payload_field()));
}

/// Phone, SMS, WhatsApp, and fax numbers: optional leading `+`, then digits,
/// spaces, and hyphens, not starting or ending with a hyphen.
///
/// # Errors
///
/// Returns `Must be a valid phone number` on the active number field.
pub fn validate_phone_number(link: &LinkValue) -> RuleResult {
    let Some(number) = link.link.phone_like_number().filter(|n| !n.is_empty()) else {
        return Ok(());
    };

    if PHONE_PATTERN.is_match(number) && !number.starts_with('-') && !number.ends_with('-') {
        return Ok(());
    }
    return Err(ValidationFailure::at(
        "Must be a valid phone number",
        link.link.payload_field(),
    ));
}

/// Custom URL parameters must look like `?key=value`.
///
/// # Errors
///
/// Returns a failure on `parameters` when the value does not start with `?`
/// or has nothing after it.
pub fn validate_parameters(link: &LinkValue) -> RuleResult {
    let Some(parameters) = link.link.options().and_then(|o| o.parameters.as_deref()) else {
        return Ok(());
    };
    if parameters.is_empty() {
        return Ok(());
    }

    let Some(rest) = parameters.strip_prefix('?') else {
        return Err(ValidationFailure::at(
            "Must start with ?; eg. ?utm_source=example.com&utm_medium=referral",
            "parameters",
        ));
    };
    if rest.is_empty() {
        return Err(ValidationFailure::at("Must contain at least one parameter", "parameters"));
    }
    return Ok(());
}

/// Anchors must be `#` followed by a valid URL fragment.
///
/// # Errors
///
/// Returns a failure on `anchor` when the value does not start with `#`, has
/// nothing after it, or contains characters not allowed in a fragment.
pub fn validate_anchor(link: &LinkValue) -> RuleResult {
    let Some(anchor) = link.link.options().and_then(|o| o.anchor.as_deref()) else {
        return Ok(());
    };
    if anchor.is_empty() {
        return Ok(());
    }

    let Some(fragment) = anchor.strip_prefix('#') else {
        return Err(ValidationFailure::at("Must start with #; eg. #page-section-1", "anchor"));
    };
    if fragment.is_empty() {
        return Err(ValidationFailure::at("Must contain at least one character", "anchor"));
    }
    if !FRAGMENT_PATTERN.is_match(fragment) {
        return Err(ValidationFailure::at("Invalid URL fragment", "anchor"));
    }
    return Ok(());
}

/// External URLs are relative or use `http`/`https`.
///
/// # Errors
///
/// Returns a failure on `url` for disallowed schemes or unparseable URLs.
pub fn validate_url(link: &LinkValue) -> RuleResult {
    return validate_url_with(link, true, &ALLOWED_SCHEMES);
}

/// External URLs use one of `schemes`, or are relative when `allow_relative`.
///
/// # Errors
///
/// Returns a failure on `url` for disallowed schemes, relative URLs that are
/// not allowed, or unparseable URLs.
pub fn validate_url_with<S: AsRef<str>>(link: &LinkValue, allow_relative: bool, schemes: &[S]) -> RuleResult {
    let Link::External { url: Some(url), .. } = &link.link else {
        return Ok(());
    };
    let url = url.trim();
    if url.is_empty() {
        return Ok(());
    }

    return match url::Url::parse(url) {
        Ok(parsed) if schemes.iter().any(|s| s.as_ref() == parsed.scheme()) => Ok(()),
        Ok(_) => Err(ValidationFailure::at("Does not match allowed protocols/schemes", "url")),
        Err(url::ParseError::RelativeUrlWithoutBase) if allow_relative => Ok(()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Err(ValidationFailure::at("Relative URLs are not allowed", "url"))
        },
        Err(_) => Err(ValidationFailure::at("Not a valid URL", "url")),
    };
}

/// E-mail addresses need a local part, an `@`, and a dotted domain.
///
/// # Errors
///
/// Returns a failure on `email` for malformed addresses.
pub fn validate_email(link: &LinkValue) -> RuleResult {
    let Link::Email { email: Some(email) } = &link.link else {
        return Ok(());
    };
    if email.is_empty() || EMAIL_PATTERN.is_match(email.trim()) {
        return Ok(());
    }
    return Err(ValidationFailure::at("Must be a valid email address", "email"));
}

/// An upload payload counts only once an asset is attached.
fn has_asset(payload: Option<&AssetLink>) -> bool {
    return payload.and_then(AssetLink::asset_ref).is_some();
}

/// Present and not empty.
fn filled(value: Option<&str>) -> bool {
    return value.is_some_and(|v| !v.is_empty());
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn link(value: serde_json::Value) -> LinkValue {
        return serde_json::from_value(value).unwrap();
    }

    #[test]
    fn internal_without_reference_is_required() {
        assert_eq!(
            required_link_field(Some(&link(json!({ "type": "internal" })))),
            Err(ValidationFailure::at("Link is required", "internalLink"))
        );
    }

    #[test]
    fn missing_link_or_type() {
        assert_eq!(required_link_field(None), Err(ValidationFailure::new("Link is required")));
        assert_eq!(
            required_link_field(Some(&link(json!({ "text": "x" })))),
            Err(ValidationFailure::new("Link is required"))
        );
    }

    #[test]
    fn required_messages_per_type() {
        let cases = [
            (json!({ "type": "external", "url": "" }), "URL is required", "url"),
            (json!({ "type": "email" }), "E-mail is required", "email"),
            (json!({ "type": "phone" }), "Phone is required", "phone"),
            (json!({ "type": "archive" }), "Value is required", "value"),
            (json!({ "type": "document" }), "Document is required", "documentLink"),
            (json!({ "type": "whatsapp" }), "WhatsApp number is required", "whatsapp"),
            (
                json!({ "type": "image", "imageLink": { "_type": "image" } }),
                "Image is required",
                "imageLink",
            ),
            (
                json!({ "type": "audio", "audioLink": { "_type": "file", "caption": "x" } }),
                "Audio is required",
                "audioLink",
            ),
        ];
        for (value, message, path) in cases {
            assert_eq!(
                required_link_field(Some(&link(value))),
                Err(ValidationFailure::at(message, path))
            );
        }
    }

    #[test]
    fn attached_asset_passes() {
        let value = link(json!({
            "type": "video",
            "videoLink": { "_type": "file", "asset": { "_ref": "file-abc-mp4" } }
        }));
        assert_eq!(required_link_field(Some(&value)), Ok(()));
    }

    #[test]
    fn filled_phone_passes() {
        let phone = link(json!({ "type": "phone", "phone": "555-1234" }));
        assert_eq!(required_link_field(Some(&phone)), Ok(()));
        assert_eq!(validate_phone_number(&phone), Ok(()));
    }

    #[test]
    fn phone_pattern() {
        for ok in ["+46 70-123 45 67", "0701234567", ""] {
            assert_eq!(validate_phone_number(&link(json!({ "type": "phone", "phone": ok }))), Ok(()));
        }
        for bad in ["-123", "123-", "12a4", "++1"] {
            assert!(validate_phone_number(&link(json!({ "type": "phone", "phone": bad }))).is_err(), "{bad}");
        }
        assert_eq!(
            validate_phone_number(&link(json!({ "type": "fax", "fax": "abc" }))),
            Err(ValidationFailure::at("Must be a valid phone number", "fax"))
        );
    }

    #[test]
    fn anchor_rules() {
        let anchor = |a: &str| validate_anchor(&link(json!({ "type": "external", "anchor": a })));
        assert_eq!(anchor("#section-1"), Ok(()));
        assert_eq!(anchor("#caf%C3%A9"), Ok(()));
        assert_eq!(anchor(""), Ok(()));
        assert_eq!(anchor("#"), Err(ValidationFailure::at("Must contain at least one character", "anchor")));
        assert_eq!(anchor("section"), Err(ValidationFailure::at("Must start with #; eg. #page-section-1", "anchor")));
        assert_eq!(anchor("#a b"), Err(ValidationFailure::at("Invalid URL fragment", "anchor")));
        assert_eq!(anchor("#%zz"), Err(ValidationFailure::at("Invalid URL fragment", "anchor")));
    }

    #[test]
    fn parameter_rules() {
        let params = |p: &str| validate_parameters(&link(json!({ "type": "archive", "parameters": p })));
        assert_eq!(params("?a=1"), Ok(()));
        assert_eq!(params("?"), Err(ValidationFailure::at("Must contain at least one parameter", "parameters")));
        assert!(params("a=1").is_err());
    }

    #[test]
    fn media_links_check_parameters() {
        for name in ["document", "image", "video", "audio"] {
            let value = link(json!({ "type": name, "parameters": "utm_source=x" }));
            assert_eq!(
                validate_parameters(&value),
                Err(ValidationFailure::at(
                    "Must start with ?; eg. ?utm_source=example.com&utm_medium=referral",
                    "parameters"
                )),
                "{name}"
            );
        }
    }

    #[test]
    fn communication_links_skip_parameters_and_anchor() {
        for name in ["email", "phone", "sms", "whatsapp", "fax"] {
            let value = link(json!({ "type": name, "parameters": "nope", "anchor": "nope" }));
            assert_eq!(validate_parameters(&value), Ok(()), "{name}");
            assert_eq!(validate_anchor(&value), Ok(()), "{name}");
        }
    }

    #[test]
    fn relative_urls_can_be_refused() {
        let value = link(json!({ "type": "external", "url": "/about" }));
        assert!(validate_url_with(&value, false, &["https"]).is_err());
        assert_eq!(validate_url_with(&value, true, &["https"]), Ok(()));
    }

    #[test]
    fn url_schemes() {
        let url = |u: &str| validate_url(&link(json!({ "type": "external", "url": u })));
        assert_eq!(url("https://example.com"), Ok(()));
        assert_eq!(url("/relative/path"), Ok(()));
        assert_eq!(
            url("ftp://example.com"),
            Err(ValidationFailure::at("Does not match allowed protocols/schemes", "url"))
        );
    }

    #[test]
    fn malformed_absolute_urls() {
        let url = |u: &str| validate_url(&link(json!({ "type": "external", "url": u })));
        for bad in ["https://exa mple.com", "http://"] {
            assert_eq!(url(bad), Err(ValidationFailure::at("Not a valid URL", "url")), "{bad}");
        }
    }

    #[test]
    fn email_format() {
        assert_eq!(validate_email(&link(json!({ "type": "email", "email": "a@b.se" }))), Ok(()));
        assert!(validate_email(&link(json!({ "type": "email", "email": "nope" }))).is_err());
    }
}
