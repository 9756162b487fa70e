//! Href generation: turn a stored link into something a renderer can navigate to.
//!
//! Every link maps to an href. Links missing their payload map to `#`, an
//! inert anchor, so rendering never has to handle an error.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::types::{AssetLink, Link, LinkOptions, LinkValue};

/// The inert href used when a link has nothing to point at.
pub const FALLBACK_HREF: &str = "#";

/// Object-style URL for routers that keep path, query, and hash apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlObject {
    /// Fragment without the leading `#`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Path, possibly absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathname: Option<String>,
    /// Query parameters, one value per key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,
}

impl UrlObject {
    /// An object with only a path.
    pub fn from_path(pathname: impl Into<String>) -> Self {
        return Self {
            pathname: Some(pathname.into()),
            ..Self::default()
        };
    }

    /// Set one query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        return self;
    }
}

impl fmt::Display for UrlObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pathname) = &self.pathname {
            f.write_str(pathname)?;
        }
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{query}")?;
        }
        if let Some(hash) = &self.hash {
            write!(f, "#{hash}")?;
        }
        return Ok(());
    }
}

/// A resolved link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Href {
    /// Structured URL returned by a resolver.
    Object(UrlObject),
    /// Plain URL string.
    Url(String),
}

impl Href {
    /// The inert `#` href.
    pub fn fallback() -> Self {
        return Self::Url(FALLBACK_HREF.to_string());
    }

    /// Whether this is the inert `#` href.
    pub fn is_fallback(&self) -> bool {
        return matches!(self, Self::Url(url) if url == FALLBACK_HREF);
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Self::Object(object) => fmt::Display::fmt(object, f),
            Self::Url(url) => f.write_str(url),
        };
    }
}

impl From<String> for Href {
    fn from(url: String) -> Self {
        return Self::Url(url);
    }
}

impl From<&str> for Href {
    fn from(url: &str) -> Self {
        return Self::Url(url.to_string());
    }
}

impl From<UrlObject> for Href {
    fn from(object: UrlObject) -> Self {
        return Self::Object(object);
    }
}

/// Maps internal, document, and media links to a route in the consuming
/// application. Implemented for any `Fn(&LinkValue) -> Href`.
pub trait HrefResolver {
    /// Resolve the link's referenced document or asset.
    fn resolve(&self, link: &LinkValue) -> Href;
}

impl<F> HrefResolver for F
where
    F: Fn(&LinkValue) -> Href,
{
    fn resolve(&self, link: &LinkValue) -> Href {
        return self(link);
    }
}

/// Generate the href for a link.
///
/// Internal, document, and media links go through `resolver` when one is
/// given. Stored parameters and anchor are appended to string results and
/// merged into object results, where stored parameters win over keys the
/// resolver already set. Without a resolver, internal links fall back to
/// `/<slug>` and asset links to `#`.
pub fn generate_href(link: &LinkValue, resolver: Option<&dyn HrefResolver>) -> Href {
    return match &link.link {
        Link::Internal { options, reference } => {
            let Some(reference) = reference else {
                return Href::fallback();
            };
            if let Some(resolver) = resolver {
                return apply_options(resolver.resolve(link), options);
            }
            reference.slug().map_or_else(Href::fallback, |slug| {
                let slug = slug.trim_start_matches('/');
                return Href::Url(append_options(&format!("/{slug}"), options));
            })
        },
        Link::Audio { file, options }
        | Link::Document { file, options }
        | Link::Video { file, options } => resolve_asset(link, file.as_ref(), options, resolver),
        Link::Image { image, options } => resolve_asset(link, image.as_ref(), options, resolver),
        Link::External { options, url } => non_blank(url.as_deref())
            .map_or_else(Href::fallback, |url| Href::Url(append_options(url.trim(), options))),
        Link::Custom { options, value, .. } => non_blank(value.as_deref())
            .map_or_else(Href::fallback, |value| Href::Url(append_options(value.trim(), options))),
        Link::Email { email } => non_blank(email.as_deref())
            .map_or_else(Href::fallback, |email| Href::Url(format!("mailto:{}", email.trim()))),
        Link::Phone { number } => dial_href("tel:", number.as_deref()),
        Link::Sms { number } => dial_href("sms:", number.as_deref()),
        Link::Fax { number } => dial_href("fax:", number.as_deref()),
        Link::WhatsApp { number } => whatsapp_href(number.as_deref()),
    };
}

/// `target` attribute for the link: `_blank` when the editor asked for a new
/// window and the link is not a communication link.
pub fn link_target(link: &LinkValue) -> Option<&'static str> {
    let blank = link.link.options().and_then(|o| o.blank).unwrap_or(false);
    return blank.then_some("_blank");
}

/// Document and media links only resolve through a resolver, and only once
/// an asset is attached.
fn resolve_asset(
    link: &LinkValue,
    payload: Option<&AssetLink>,
    options: &LinkOptions,
    resolver: Option<&dyn HrefResolver>,
) -> Href {
    if payload.and_then(AssetLink::asset_ref).is_none() {
        return Href::fallback();
    }
    return resolver.map_or_else(Href::fallback, |resolver| {
        return apply_options(resolver.resolve(link), options);
    });
}

/// `wa.me` link with whitespace and the leading `+` removed. A number with
/// nothing left after that maps to `#`.
fn whatsapp_href(number: Option<&str>) -> Href {
    let digits = number.map(strip_whitespace).unwrap_or_default();
    let digits = digits.strip_prefix('+').unwrap_or(&digits);
    if digits.is_empty() {
        return Href::fallback();
    }
    return Href::Url(format!("https://wa.me/{digits}"));
}

/// Scheme prefix plus the number with all whitespace removed.
fn dial_href(scheme: &str, number: Option<&str>) -> Href {
    return non_blank(number).map_or_else(Href::fallback, |n| {
        Href::Url(format!("{scheme}{}", strip_whitespace(n)))
    });
}

/// Add stored parameters and anchor to a resolver result.
fn apply_options(href: Href, options: &LinkOptions) -> Href {
    return match href {
        Href::Object(object) => Href::Object(merge_options(object, options)),
        Href::Url(url) => Href::Url(append_options(&url, options)),
    };
}

/// Append trimmed parameters and anchor verbatim.
fn append_options(base: &str, options: &LinkOptions) -> String {
    let parameters = options.parameters.as_deref().map_or("", str::trim);
    let anchor = options.anchor.as_deref().map_or("", str::trim);
    return format!("{base}{parameters}{anchor}");
}

/// Merge stored parameters into the object's query and set its hash.
fn merge_options(mut object: UrlObject, options: &LinkOptions) -> UrlObject {
    if let Some(parameters) = non_blank(options.parameters.as_deref()) {
        let parameters = parameters.trim();
        let raw = parameters.strip_prefix('?').unwrap_or(parameters);
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            object.query.insert(key.into_owned(), value.into_owned());
        }
    }
    if let Some(anchor) = non_blank(options.anchor.as_deref()) {
        let anchor = anchor.trim();
        object.hash = Some(anchor.strip_prefix('#').unwrap_or(anchor).to_string());
    }
    return object;
}

/// `Some` only when the value has non-whitespace content.
fn non_blank(value: Option<&str>) -> Option<&str> {
    return value.filter(|v| !v.trim().is_empty());
}

/// Copy of `value` without any whitespace.
fn strip_whitespace(value: &str) -> String {
    return value.chars().filter(|c| !c.is_whitespace()).collect();
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn link(value: serde_json::Value) -> LinkValue {
        return serde_json::from_value(value).unwrap();
    }

    fn href(value: serde_json::Value) -> String {
        return generate_href(&link(value), None).to_string();
    }

    #[test]
    fn email_is_trimmed_mailto() {
        assert_eq!(
            href(json!({ "type": "email", "email": "  hello@example.com " })),
            "mailto:hello@example.com"
        );
    }

    #[test]
    fn phone_drops_all_whitespace() {
        assert_eq!(href(json!({ "type": "phone", "phone": "+1 555 123" })), "tel:+1555123");
        assert_eq!(href(json!({ "type": "sms", "sms": " 555\t12 " })), "sms:55512");
        assert_eq!(href(json!({ "type": "fax", "fax": "+46 8 123" })), "fax:+468123");
    }

    #[test]
    fn whatsapp_drops_plus_and_whitespace() {
        assert_eq!(
            href(json!({ "type": "whatsapp", "whatsapp": "+44 7700 900000" })),
            "https://wa.me/447700900000"
        );
    }

    #[test]
    fn whatsapp_without_digits_is_fallback() {
        assert_eq!(href(json!({ "type": "whatsapp", "whatsapp": "+" })), "#");
        assert_eq!(href(json!({ "type": "whatsapp", "whatsapp": " + " })), "#");
    }

    #[test]
    fn external_appends_parameters_and_anchor() {
        assert_eq!(
            href(json!({
                "type": "external",
                "url": " https://example.com/page ",
                "parameters": " ?utm_source=x ",
                "anchor": "#top"
            })),
            "https://example.com/page?utm_source=x#top"
        );
    }

    #[test]
    fn missing_payload_is_fallback() {
        for value in [
            json!({ "type": "external" }),
            json!({ "type": "email", "email": "" }),
            json!({ "type": "phone", "phone": "   " }),
            json!({ "type": "internal" }),
            json!({ "type": "archive" }),
            json!({}),
        ] {
            assert!(generate_href(&link(value.clone()), None).is_fallback(), "{value}");
        }
    }

    #[test]
    fn internal_without_resolver_uses_slug() {
        assert_eq!(
            href(json!({
                "type": "internal",
                "internalLink": { "_ref": "p1", "slug": { "current": "/about" } },
                "parameters": "?a=1",
                "anchor": "#team"
            })),
            "/about?a=1#team"
        );
        assert_eq!(
            href(json!({ "type": "internal", "internalLink": { "_ref": "p1" } })),
            "#"
        );
    }

    #[test]
    fn resolver_string_gets_options_appended() {
        let value = link(json!({
            "type": "internal",
            "internalLink": { "_ref": "p1", "_type": "reference" },
            "anchor": "#faq"
        }));
        let resolver = |l: &LinkValue| {
            let Link::Internal { reference: Some(r), .. } = &l.link else {
                return Href::fallback();
            };
            Href::from(format!("/pages/{}", r.reference.as_deref().unwrap_or_default()))
        };
        assert_eq!(generate_href(&value, Some(&resolver)).to_string(), "/pages/p1#faq");
    }

    #[test]
    fn resolver_object_merges_stored_parameters_last() {
        let value = link(json!({
            "type": "internal",
            "internalLink": { "_ref": "p1" },
            "parameters": "?lang=sv&utm_source=mail",
            "anchor": "#intro"
        }));
        let resolver = |_: &LinkValue| {
            Href::from(
                UrlObject::from_path("/[slug]")
                    .with_query("slug", "about")
                    .with_query("lang", "en"),
            )
        };
        let Href::Object(object) = generate_href(&value, Some(&resolver)) else {
            panic!("expected object href");
        };
        assert_eq!(object.query.get("slug").map(String::as_str), Some("about"));
        assert_eq!(object.query.get("lang").map(String::as_str), Some("sv"));
        assert_eq!(object.query.get("utm_source").map(String::as_str), Some("mail"));
        assert_eq!(object.hash.as_deref(), Some("intro"));
    }

    #[test]
    fn media_needs_resolver_and_asset() {
        let value = link(json!({
            "type": "document",
            "documentLink": { "_type": "file", "asset": { "_ref": "file-abc-pdf" } }
        }));
        assert!(generate_href(&value, None).is_fallback());

        let resolver = |_: &LinkValue| Href::from("https://cdn.example/file.pdf");
        assert_eq!(
            generate_href(&value, Some(&resolver)).to_string(),
            "https://cdn.example/file.pdf"
        );

        let empty = link(json!({ "type": "image" }));
        assert!(generate_href(&empty, Some(&resolver)).is_fallback());
    }

    #[test]
    fn asset_payload_without_asset_skips_resolver() {
        let value = link(json!({ "type": "image", "imageLink": { "_type": "image" } }));
        let resolver = |_: &LinkValue| -> Href { panic!("resolver called without an asset") };
        assert!(generate_href(&value, Some(&resolver)).is_fallback());
    }

    #[test]
    fn resolver_object_keeps_hash_without_stored_anchor() {
        let value = link(json!({
            "type": "internal",
            "internalLink": { "_ref": "p1" },
            "parameters": "?a=1"
        }));
        let resolver = |_: &LinkValue| {
            let mut object = UrlObject::from_path("/docs");
            object.hash = Some("overview".to_string());
            return Href::from(object);
        };
        let Href::Object(object) = generate_href(&value, Some(&resolver)) else {
            panic!("expected object href");
        };
        assert_eq!(object.hash.as_deref(), Some("overview"));
        assert_eq!(object.query.get("a").map(String::as_str), Some("1"));
    }

    #[test]
    fn custom_value_with_options() {
        assert_eq!(
            href(json!({ "type": "archive", "value": "/blog ", "anchor": "#latest" })),
            "/blog#latest"
        );
    }

    #[test]
    fn generation_is_repeatable() {
        let value = link(json!({ "type": "external", "url": "https://a.b", "parameters": "?x=1" }));
        assert_eq!(generate_href(&value, None), generate_href(&value, None));
    }

    #[test]
    fn target_blank_only_for_non_communication_links() {
        assert_eq!(
            link_target(&link(json!({ "type": "external", "url": "x", "blank": true }))),
            Some("_blank")
        );
        assert_eq!(link_target(&link(json!({ "type": "email", "blank": true }))), None);
        assert_eq!(link_target(&link(json!({ "type": "external", "url": "x" }))), None);
    }

    #[test]
    fn url_object_display() {
        let object = UrlObject {
            hash: Some("top".into()),
            pathname: Some("/search".into()),
            query: BTreeMap::from([("q".to_string(), "a b".to_string())]),
        };
        assert_eq!(object.to_string(), "/search?q=a+b#top");
    }
}
