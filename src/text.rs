//! Fallback labels for links rendered without explicit text.

use crate::href::FALLBACK_HREF;
use crate::types::{Link, LinkValue};

/// The label to render for a link.
///
/// Explicit `text` wins. Otherwise internal links use the referenced
/// document's title, then its slug; document and media links use the asset
/// id; every other link uses its raw payload. Empty strings fall through,
/// and `#` is returned when nothing is left.
pub fn link_text(link: &LinkValue) -> String {
    if let Some(text) = non_empty(link.text.as_deref()) {
        return text.to_string();
    }

    let derived = match &link.link {
        Link::Internal { reference, .. } => reference.as_ref().and_then(|r| {
            return non_empty(r.title.as_deref()).or_else(|| non_empty(r.slug()));
        }),
        Link::External { url, .. } => url.as_deref(),
        Link::Email { email } => email.as_deref(),
        Link::Phone { number }
        | Link::Sms { number }
        | Link::WhatsApp { number }
        | Link::Fax { number } => number.as_deref(),
        Link::Audio { file, .. } | Link::Document { file, .. } | Link::Video { file, .. } => {
            file.as_ref().and_then(|f| f.asset_ref())
        },
        Link::Image { image, .. } => image.as_ref().and_then(|i| i.asset_ref()),
        Link::Custom { value, .. } => value.as_deref(),
    };

    return non_empty(derived).unwrap_or(FALLBACK_HREF).to_string();
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    return value.filter(|v| !v.is_empty());
}
