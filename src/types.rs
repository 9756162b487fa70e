/// Core domain types for link values: the variant sum type, payloads, and
/// the mapping to the stored record shape.
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// The built-in link kinds. Any other `type` string is a custom link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltInLinkType {
    /// Reference to another document in the studio.
    Internal,
    /// Absolute or relative URL.
    External,
    /// `mailto:` link.
    Email,
    /// `tel:` link.
    Phone,
    /// Uploaded file.
    Document,
    /// Uploaded image asset.
    Image,
    /// Uploaded video file.
    Video,
    /// Uploaded audio file.
    Audio,
    /// `sms:` link.
    Sms,
    /// `wa.me` link.
    WhatsApp,
    /// `fax:` link.
    Fax,
}

impl BuiltInLinkType {
    /// Every built-in type, in menu order.
    pub const ALL: [Self; 11] = [
        Self::Internal,
        Self::External,
        Self::Email,
        Self::Phone,
        Self::Document,
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::Sms,
        Self::WhatsApp,
        Self::Fax,
    ];

    /// The `type` string stored on the link record.
    pub const fn as_str(self) -> &'static str {
        return match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Document => "document",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Sms => "sms",
            Self::WhatsApp => "whatsapp",
            Self::Fax => "fax",
        };
    }

    /// Parse a stored `type` string. Returns `None` for custom types.
    pub fn parse(name: &str) -> Option<Self> {
        return Self::ALL.into_iter().find(|t| t.as_str() == name);
    }

    /// Name of the sub-field holding this variant's payload.
    pub const fn payload_field(self) -> &'static str {
        return match self {
            Self::Internal => "internalLink",
            Self::External => "url",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Document => "documentLink",
            Self::Image => "imageLink",
            Self::Video => "videoLink",
            Self::Audio => "audioLink",
            Self::Sms => "sms",
            Self::WhatsApp => "whatsapp",
            Self::Fax => "fax",
        };
    }

    /// Menu title shown in the type selector.
    pub const fn title(self) -> &'static str {
        return match self {
            Self::Internal => "Internal",
            Self::External => "URL",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Document => "Document",
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Sms => "SMS",
            Self::WhatsApp => "WhatsApp",
            Self::Fax => "Fax",
        };
    }

    /// Icon name the host renders next to the title.
    pub const fn icon(self) -> &'static str {
        return match self {
            Self::Internal => "link",
            Self::External => "globe",
            Self::Email => "at-sign",
            Self::Phone => "phone",
            Self::Document => "file-text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio-lines",
            Self::Sms => "message-circle",
            Self::WhatsApp => "smartphone",
            Self::Fax => "printer",
        };
    }

    /// Communication links have no parameters, anchor, or new-window flag.
    pub const fn is_communication(self) -> bool {
        return matches!(
            self,
            Self::Email | Self::Phone | Self::Sms | Self::WhatsApp | Self::Fax
        );
    }
}

impl FromStr for BuiltInLinkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return Self::parse(s).ok_or_else(|| Error::UnknownLinkType { name: s.to_string() });
    }
}

/// `slug` object on a dereferenced document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    /// Current slug value, possibly with a leading `/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
}

/// Reference to another document. When the host has dereferenced it, the
/// target's `title`, `slug`, and any other keys are present as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    /// Unknown keys of the referenced document, kept for resolvers.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Id of the referenced document.
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Slug of the referenced document, if dereferenced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<Slug>,
    /// Title of the referenced document, if dereferenced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Host record type, `reference` or the document type when dereferenced.
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Whether the reference is weak.
    #[serde(rename = "_weak", default, skip_serializing_if = "Option::is_none")]
    pub weak: Option<bool>,
}

impl DocumentReference {
    /// The slug string, if the reference carries one.
    pub fn slug(&self) -> Option<&str> {
        return self.slug.as_ref().and_then(|s| s.current.as_deref());
    }
}

/// `asset` reference inside a file or image payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    /// Asset document id.
    #[serde(rename = "_ref")]
    pub reference: String,
    /// Always `reference` in stored records.
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

/// File or image payload of document and media links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLink {
    /// Referenced asset, absent while an upload is pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetReference>,
    /// Unknown keys such as crop or hotspot data.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// `file` or `image`.
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl AssetLink {
    /// The asset document id, if one is attached.
    pub fn asset_ref(&self) -> Option<&str> {
        return self.asset.as_ref().map(|a| a.reference.as_str());
    }
}

/// Optional extras available on non-communication links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Fragment starting with `#`.
    pub anchor: Option<String>,
    /// Open in a new window.
    pub blank: Option<bool>,
    /// Raw query string starting with `?`.
    pub parameters: Option<String>,
}

/// One active link variant. Each variant holds only the payload that its
/// `type` makes meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// Uploaded audio file.
    Audio {
        /// File payload.
        file: Option<AssetLink>,
        /// Parameters, anchor, new-window flag.
        options: LinkOptions,
    },
    /// Caller-defined type. An empty `link_type` means no type was chosen.
    Custom {
        /// The stored `type` string.
        link_type: String,
        /// Parameters, anchor, new-window flag.
        options: LinkOptions,
        /// The selected option value.
        value: Option<String>,
    },
    /// Uploaded file.
    Document {
        /// File payload.
        file: Option<AssetLink>,
        /// Parameters, anchor, new-window flag.
        options: LinkOptions,
    },
    /// E-mail address.
    Email {
        /// Address without `mailto:`.
        email: Option<String>,
    },
    /// URL typed by the editor.
    External {
        /// Parameters, anchor, new-window flag.
        options: LinkOptions,
        /// The URL, absolute or relative.
        url: Option<String>,
    },
    /// Fax number.
    Fax {
        /// Number as typed.
        number: Option<String>,
    },
    /// Uploaded image asset.
    Image {
        /// Image payload.
        image: Option<AssetLink>,
        /// Parameters, anchor, new-window flag.
        options: LinkOptions,
    },
    /// Reference to another document.
    Internal {
        /// Parameters, anchor, new-window flag.
        options: LinkOptions,
        /// The referenced document.
        reference: Option<DocumentReference>,
    },
    /// Phone number.
    Phone {
        /// Number as typed.
        number: Option<String>,
    },
    /// SMS number.
    Sms {
        /// Number as typed.
        number: Option<String>,
    },
    /// Uploaded video file.
    Video {
        /// File payload.
        file: Option<AssetLink>,
        /// Parameters, anchor, new-window flag.
        options: LinkOptions,
    },
    /// WhatsApp number.
    WhatsApp {
        /// Number as typed.
        number: Option<String>,
    },
}

impl Link {
    /// The stored `type` string.
    pub fn type_name(&self) -> &str {
        if let Self::Custom { link_type, .. } = self {
            return link_type;
        }
        return self.built_in().map_or("", BuiltInLinkType::as_str);
    }

    /// The built-in type of this variant, `None` for custom links.
    pub const fn built_in(&self) -> Option<BuiltInLinkType> {
        return match self {
            Self::Audio { .. } => Some(BuiltInLinkType::Audio),
            Self::Custom { .. } => None,
            Self::Document { .. } => Some(BuiltInLinkType::Document),
            Self::Email { .. } => Some(BuiltInLinkType::Email),
            Self::External { .. } => Some(BuiltInLinkType::External),
            Self::Fax { .. } => Some(BuiltInLinkType::Fax),
            Self::Image { .. } => Some(BuiltInLinkType::Image),
            Self::Internal { .. } => Some(BuiltInLinkType::Internal),
            Self::Phone { .. } => Some(BuiltInLinkType::Phone),
            Self::Sms { .. } => Some(BuiltInLinkType::Sms),
            Self::Video { .. } => Some(BuiltInLinkType::Video),
            Self::WhatsApp { .. } => Some(BuiltInLinkType::WhatsApp),
        };
    }

    /// Name of the sub-field holding the active payload.
    pub fn payload_field(&self) -> &'static str {
        return self.built_in().map_or("value", BuiltInLinkType::payload_field);
    }

    /// Parameters, anchor, and new-window flag. `None` for communication links.
    pub const fn options(&self) -> Option<&LinkOptions> {
        return match self {
            Self::Audio { options, .. }
            | Self::Custom { options, .. }
            | Self::Document { options, .. }
            | Self::External { options, .. }
            | Self::Image { options, .. }
            | Self::Internal { options, .. }
            | Self::Video { options, .. } => Some(options),
            Self::Email { .. }
            | Self::Fax { .. }
            | Self::Phone { .. }
            | Self::Sms { .. }
            | Self::WhatsApp { .. } => None,
        };
    }

    /// The raw number of phone, SMS, WhatsApp, and fax links.
    pub fn phone_like_number(&self) -> Option<&str> {
        return match self {
            Self::Fax { number }
            | Self::Phone { number }
            | Self::Sms { number }
            | Self::WhatsApp { number } => number.as_deref(),
            _ => None,
        };
    }

    /// Build a variant from the stored record's `type` and fields.
    fn from_raw(raw: &mut RawLinkValue) -> Self {
        let link_type = raw.link_type.take().unwrap_or_default();
        let options = LinkOptions {
            anchor: raw.anchor.take(),
            blank: raw.blank.take(),
            parameters: raw.parameters.take(),
        };

        let Some(built_in) = BuiltInLinkType::parse(&link_type) else {
            return Self::Custom {
                link_type,
                options,
                value: raw.value.take(),
            };
        };

        return match built_in {
            BuiltInLinkType::Audio => Self::Audio { file: raw.audio_link.take(), options },
            BuiltInLinkType::Document => Self::Document { file: raw.document_link.take(), options },
            BuiltInLinkType::Email => Self::Email { email: raw.email.take() },
            BuiltInLinkType::External => Self::External { options, url: raw.url.take() },
            BuiltInLinkType::Fax => Self::Fax { number: raw.fax.take() },
            BuiltInLinkType::Image => Self::Image { image: raw.image_link.take(), options },
            BuiltInLinkType::Internal => Self::Internal {
                options,
                reference: raw.internal_link.take(),
            },
            BuiltInLinkType::Phone => Self::Phone { number: raw.phone.take() },
            BuiltInLinkType::Sms => Self::Sms { number: raw.sms.take() },
            BuiltInLinkType::Video => Self::Video { file: raw.video_link.take(), options },
            BuiltInLinkType::WhatsApp => Self::WhatsApp { number: raw.whatsapp.take() },
        };
    }

    /// Write the variant's fields onto a stored record.
    fn write_raw(self, raw: &mut RawLinkValue) {
        let type_name = self.type_name().to_string();
        raw.link_type = (!type_name.is_empty()).then_some(type_name);

        let options = match self {
            Self::Audio { file, options } => {
                raw.audio_link = file;
                Some(options)
            },
            Self::Custom { options, value, .. } => {
                raw.value = value;
                Some(options)
            },
            Self::Document { file, options } => {
                raw.document_link = file;
                Some(options)
            },
            Self::Email { email } => {
                raw.email = email;
                None
            },
            Self::External { options, url } => {
                raw.url = url;
                Some(options)
            },
            Self::Fax { number } => {
                raw.fax = number;
                None
            },
            Self::Image { image, options } => {
                raw.image_link = image;
                Some(options)
            },
            Self::Internal { options, reference } => {
                raw.internal_link = reference;
                Some(options)
            },
            Self::Phone { number } => {
                raw.phone = number;
                None
            },
            Self::Sms { number } => {
                raw.sms = number;
                None
            },
            Self::Video { file, options } => {
                raw.video_link = file;
                Some(options)
            },
            Self::WhatsApp { number } => {
                raw.whatsapp = number;
                None
            },
        };

        if let Some(options) = options {
            raw.anchor = options.anchor;
            raw.blank = options.blank;
            raw.parameters = options.parameters;
        }
    }
}

/// A stored link field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLinkValue", into = "RawLinkValue")]
pub struct LinkValue {
    /// Array item key assigned by the host, opaque here.
    pub key: Option<String>,
    /// The active variant and its payload.
    pub link: Link,
    /// Host record type, normally `link`.
    pub record_type: Option<String>,
    /// Explicit display label.
    pub text: Option<String>,
}

impl LinkValue {
    /// Wrap a variant with no label or record identity.
    pub const fn new(link: Link) -> Self {
        return Self {
            key: None,
            link,
            record_type: None,
            text: None,
        };
    }

    /// Set the explicit display label.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        return self;
    }

    /// The stored `type` string.
    pub fn type_name(&self) -> &str {
        return self.link.type_name();
    }
}

/// The link record exactly as the host stores it: every variant's fields
/// side by side, one of them meaningful.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawLinkValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_link: Option<AssetLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blank: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_link: Option<AssetLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_link: Option<AssetLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    internal_link: Option<DocumentReference>,
    #[serde(rename = "_key", skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    link_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    record_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_link: Option<AssetLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    whatsapp: Option<String>,
}

impl From<RawLinkValue> for LinkValue {
    fn from(mut raw: RawLinkValue) -> Self {
        let link = Link::from_raw(&mut raw);
        return Self {
            key: raw.key,
            link,
            record_type: raw.record_type,
            text: raw.text,
        };
    }
}

impl From<LinkValue> for RawLinkValue {
    fn from(value: LinkValue) -> Self {
        let mut raw = Self {
            key: value.key,
            record_type: value.record_type,
            text: value.text,
            ..Self::default()
        };
        value.link.write_raw(&mut raw);
        return raw;
    }
}
