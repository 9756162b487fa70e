//! Type guards over link values.
//!
//! Built-in guards compare the variant directly. Whether a link counts as
//! custom depends on which type names are reserved, so that guard takes the
//! reserved set explicitly instead of consulting a module-level list.

use std::collections::BTreeSet;

use crate::types::{BuiltInLinkType, Link, LinkValue};

/// The set of `type` strings that are not available to custom link types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedTypes {
    names: BTreeSet<String>,
}

impl ReservedTypes {
    /// Every built-in type name.
    pub fn built_in() -> Self {
        return Self::from_names(BuiltInLinkType::ALL.iter().map(|t| t.as_str()));
    }

    /// An arbitrary reserved set.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        return Self {
            names: names.into_iter().map(Into::into).collect(),
        };
    }

    /// Whether `name` is reserved.
    pub fn contains(&self, name: &str) -> bool {
        return self.names.contains(name);
    }
}

impl Default for ReservedTypes {
    fn default() -> Self {
        return Self::built_in();
    }
}

/// Link to another document.
pub const fn is_internal_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::Internal { .. });
}

/// Link to a URL.
pub const fn is_external_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::External { .. });
}

/// `mailto:` link.
pub const fn is_email_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::Email { .. });
}

/// `tel:` link.
pub const fn is_phone_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::Phone { .. });
}

/// Link to an uploaded file.
pub const fn is_document_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::Document { .. });
}

/// Link to an image asset.
pub const fn is_image_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::Image { .. });
}

/// Link to a video file.
pub const fn is_video_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::Video { .. });
}

/// Link to an audio file.
pub const fn is_audio_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::Audio { .. });
}

/// Image, video, or audio link.
pub const fn is_media_link(link: &LinkValue) -> bool {
    return is_image_link(link) || is_video_link(link) || is_audio_link(link);
}

/// `sms:` link.
pub const fn is_sms_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::Sms { .. });
}

/// `wa.me` link.
pub const fn is_whatsapp_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::WhatsApp { .. });
}

/// `fax:` link.
pub const fn is_fax_link(link: &LinkValue) -> bool {
    return matches!(link.link, Link::Fax { .. });
}

/// Email, phone, SMS, WhatsApp, or fax link.
pub fn is_communication_link(link: &LinkValue) -> bool {
    return link.link.built_in().is_some_and(BuiltInLinkType::is_communication);
}

/// A link whose `type` is not in `reserved`.
pub fn is_custom_link(link: &LinkValue, reserved: &ReservedTypes) -> bool {
    return !reserved.contains(link.type_name());
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn link(value: serde_json::Value) -> LinkValue {
        return serde_json::from_value(value).unwrap();
    }

    #[test]
    fn built_in_guards_match_their_variant() {
        let internal = link(json!({ "type": "internal" }));
        assert!(is_internal_link(&internal));
        assert!(!is_external_link(&internal));
        assert!(!is_custom_link(&internal, &ReservedTypes::built_in()));

        let video = link(json!({ "type": "video" }));
        assert!(is_video_link(&video));
        assert!(is_media_link(&video));
        assert!(!is_document_link(&video));
    }

    #[test]
    fn communication_types() {
        for name in ["email", "phone", "sms", "whatsapp", "fax"] {
            assert!(is_communication_link(&link(json!({ "type": name }))), "{name}");
        }
        for name in ["internal", "external", "document", "archive"] {
            assert!(!is_communication_link(&link(json!({ "type": name }))), "{name}");
        }
    }

    #[test]
    fn custom_depends_on_reserved_set() {
        let archive = link(json!({ "type": "archive", "value": "/blog" }));
        assert!(is_custom_link(&archive, &ReservedTypes::built_in()));

        let reserved = ReservedTypes::from_names(["archive"]);
        assert!(!is_custom_link(&archive, &reserved));
    }

    #[test]
    fn untyped_link_is_custom() {
        let untyped = link(json!({}));
        assert!(is_custom_link(&untyped, &ReservedTypes::default()));
    }
}
