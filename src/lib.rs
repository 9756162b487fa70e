//! A link field for headless content studios.
//!
//! A stored link is one of the built-in variants (internal reference, URL,
//! e-mail, phone, uploaded document or media, SMS, WhatsApp, fax) or a custom
//! type registered by the project. This crate models those values and turns
//! them into hrefs and labels for rendering. It also carries the validation
//! rules and the field schema the studio registers for editing them.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod guards;
pub mod href;
pub mod options;
pub mod scan;
pub mod schema;
pub mod text;
pub mod types;
pub mod validation;

pub use config::{CONFIG_FILE, FieldOptions, PluginConfig};
pub use error::Error;
pub use guards::{
    ReservedTypes, is_audio_link, is_communication_link, is_custom_link, is_document_link,
    is_email_link, is_external_link, is_fax_link, is_image_link, is_internal_link, is_media_link,
    is_phone_link, is_sms_link, is_video_link, is_whatsapp_link,
};
pub use href::{Href, HrefResolver, UrlObject, generate_href, link_target};
pub use options::{CustomLinkOption, CustomLinkType, DynamicOptions, OptionsContext, OptionsProvider};
pub use schema::{LinkFieldPlugin, LinkSchema};
pub use text::link_text;
pub use types::{BuiltInLinkType, Link, LinkOptions, LinkValue};
pub use validation::{
    ValidationFailure, required_link_field, validate_anchor, validate_email, validate_parameters,
    validate_phone_number, validate_url, validate_url_with,
};
