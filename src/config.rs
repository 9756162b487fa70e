//! Plugin configuration loaded from `.linkfield.toml` and per-field overrides.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::guards::ReservedTypes;
use crate::options::CustomLinkOption;
use crate::types::BuiltInLinkType;

/// Name of the configuration file looked up in the project root.
pub const CONFIG_FILE: &str = ".linkfield.toml";

/// Help text shown under each sub-field. Keys missing from a configuration
/// keep their default text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Descriptions {
    /// Help text for the advanced fieldset.
    pub advanced: Option<String>,
    /// Help text for the anchor sub-field.
    pub anchor: Option<String>,
    /// Help text for the audio payload.
    pub audio: Option<String>,
    /// Help text for the new-window toggle.
    pub blank: Option<String>,
    /// Help text for the document payload.
    pub document: Option<String>,
    /// Help text for the e-mail payload.
    pub email: Option<String>,
    /// Help text for the URL payload.
    pub external: Option<String>,
    /// Help text for the fax number.
    pub fax: Option<String>,
    /// Help text for the image payload.
    pub image: Option<String>,
    /// Help text for the internal reference.
    pub internal: Option<String>,
    /// Help text for the parameters sub-field.
    pub parameters: Option<String>,
    /// Help text for the phone number.
    pub phone: Option<String>,
    /// Help text for the SMS number.
    pub sms: Option<String>,
    /// Help text for the text sub-field.
    pub text: Option<String>,
    /// Help text for the video payload.
    pub video: Option<String>,
    /// Help text for the WhatsApp number.
    pub whatsapp: Option<String>,
}

impl Default for Descriptions {
    fn default() -> Self {
        let text = |s: &str| Some(s.to_string());
        return Self {
            advanced: text("Optional. Add anchor links and custom parameters."),
            anchor: text("Optional. Add an anchor to link to a specific section on the page."),
            audio: None,
            blank: None,
            document: None,
            email: text("Link to send an e-mail to the given address."),
            external: text("Link to an absolute URL to a page on another website."),
            fax: None,
            image: None,
            internal: text("Link to another page or document on the website."),
            parameters: text("Optional. Add custom parameters to the URL, such as UTM tags."),
            phone: text("Link to call the given phone number."),
            sms: None,
            text: None,
            video: None,
            whatsapp: None,
        };
    }
}

impl Descriptions {
    /// Description for a built-in link type's payload field.
    pub fn for_link_type(&self, link_type: BuiltInLinkType) -> Option<&str> {
        let description = match link_type {
            BuiltInLinkType::Audio => &self.audio,
            BuiltInLinkType::Document => &self.document,
            BuiltInLinkType::Email => &self.email,
            BuiltInLinkType::External => &self.external,
            BuiltInLinkType::Fax => &self.fax,
            BuiltInLinkType::Image => &self.image,
            BuiltInLinkType::Internal => &self.internal,
            BuiltInLinkType::Phone => &self.phone,
            BuiltInLinkType::Sms => &self.sms,
            BuiltInLinkType::Video => &self.video,
            BuiltInLinkType::WhatsApp => &self.whatsapp,
        };
        return description.as_deref();
    }
}

/// A custom link type with a static option list, as written in `.linkfield.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLinkTypeConfig {
    /// Help text shown under the option selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon name, passed through to the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Options offered by the selector.
    #[serde(default)]
    pub options: Vec<CustomLinkOption>,
    /// Label in the type selector.
    pub title: String,
    /// Stored `type` string, must not be a built-in name.
    pub value: String,
}

/// Plugin-wide options, supplied once at setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    /// Custom link types with static options.
    #[serde(alias = "custom_link_types")]
    pub custom_link_types: Vec<CustomLinkTypeConfig>,
    /// Sub-field help texts.
    pub descriptions: Descriptions,
    /// Offer the anchor sub-field.
    #[serde(alias = "enable_anchor_links")]
    pub enable_anchor_links: bool,
    /// Offer the parameters sub-field.
    #[serde(alias = "enable_link_parameters")]
    pub enable_link_parameters: bool,
    /// Built-in types offered by the type selector, in selector order.
    #[serde(alias = "enabled_built_in_link_types")]
    pub enabled_built_in_link_types: Vec<BuiltInLinkType>,
    /// Icon for the link type, passed through to the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Document types that internal links may point at.
    #[serde(alias = "linkable_schema_types")]
    pub linkable_schema_types: Vec<String>,
    /// Preview configuration, passed through to the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Value>,
    /// Filter for the reference picker, passed through to the host.
    #[serde(alias = "reference_filter_options", skip_serializing_if = "Option::is_none")]
    pub reference_filter_options: Option<Value>,
    /// Store internal references as weak references.
    #[serde(alias = "weak_references")]
    pub weak_references: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        return Self {
            custom_link_types: Vec::new(),
            descriptions: Descriptions::default(),
            enable_anchor_links: true,
            enable_link_parameters: true,
            enabled_built_in_link_types: BuiltInLinkType::ALL.to_vec(),
            icon: None,
            linkable_schema_types: vec!["page".to_string()],
            preview: None,
            reference_filter_options: None,
            weak_references: false,
        };
    }
}

impl PluginConfig {
    /// Load config from `.linkfield.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; a config file the
    /// user wrote is never silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed, or the errors of
    /// [`PluginConfig::validate`].
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            },
            Err(e) => return Err(Error::Io(e)),
        };

        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            custom_link_types = config.custom_link_types.len(),
            "loaded config"
        );
        return Ok(config);
    }

    /// Check that custom link types neither reuse built-in names nor each other.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReservedLinkType` or `Error::DuplicateLinkType`.
    pub fn validate(&self) -> Result<(), Error> {
        return check_custom_type_names(self.custom_link_types.iter().map(|t| t.value.as_str()));
    }

    /// Resolve per-field overrides against the plugin-wide options.
    pub fn effective(&self, field: &FieldOptions) -> EffectiveOptions {
        return EffectiveOptions {
            descriptions: self.descriptions.clone(),
            enable_anchor_links: self.enable_anchor_links,
            enable_link_parameters: self.enable_link_parameters,
            enable_text: field.enable_text,
            enabled_built_in_link_types: field
                .enabled_built_in_link_types
                .clone()
                .unwrap_or_else(|| self.enabled_built_in_link_types.clone()),
            linkable_schema_types: field
                .linkable_schema_types
                .clone()
                .unwrap_or_else(|| self.linkable_schema_types.clone()),
            reference_filter_options: field
                .reference_filter_options
                .clone()
                .or_else(|| self.reference_filter_options.clone()),
            text_label: field.text_label.clone().unwrap_or_else(|| "Text".to_string()),
            weak_references: field.weak_references.unwrap_or(self.weak_references),
        };
    }
}

/// Options set on an individual link field. `None` inherits the plugin value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldOptions {
    /// Show the optional text/label sub-field.
    pub enable_text: bool,
    /// Overrides the plugin's built-in type list.
    pub enabled_built_in_link_types: Option<Vec<BuiltInLinkType>>,
    /// Overrides the plugin's linkable document types.
    pub linkable_schema_types: Option<Vec<String>>,
    /// Overrides the plugin's reference filter.
    pub reference_filter_options: Option<Value>,
    /// Reject links without a type or payload.
    pub required: bool,
    /// Label of the text sub-field, `Text` by default.
    pub text_label: Option<String>,
    /// Overrides the plugin's weak reference setting.
    pub weak_references: Option<bool>,
}

/// Plugin options with field overrides applied.
#[allow(clippy::struct_excessive_bools, reason = "each flag maps to a separate plugin option")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveOptions {
    /// Sub-field help texts.
    pub descriptions: Descriptions,
    /// Show the anchor sub-field.
    pub enable_anchor_links: bool,
    /// Show the parameters sub-field.
    pub enable_link_parameters: bool,
    /// Show the text sub-field.
    pub enable_text: bool,
    /// Built-in types offered by the type selector.
    pub enabled_built_in_link_types: Vec<BuiltInLinkType>,
    /// Document types internal links may point at.
    pub linkable_schema_types: Vec<String>,
    /// Filter for the reference picker.
    pub reference_filter_options: Option<Value>,
    /// Label of the text sub-field.
    pub text_label: String,
    /// Store internal references as weak references.
    pub weak_references: bool,
}

impl Default for EffectiveOptions {
    fn default() -> Self {
        return PluginConfig::default().effective(&FieldOptions::default());
    }
}

/// Reject custom type values that are built-in names or repeated.
///
/// # Errors
///
/// Returns `Error::ReservedLinkType` or `Error::DuplicateLinkType` for the
/// first offending value.
pub fn check_custom_type_names<'a>(values: impl IntoIterator<Item = &'a str>) -> Result<(), Error> {
    let reserved = ReservedTypes::built_in();
    let mut seen = BTreeSet::new();
    for value in values {
        if reserved.contains(value) {
            return Err(Error::ReservedLinkType {
                value: value.to_string(),
            });
        }
        if !seen.insert(value) {
            return Err(Error::DuplicateLinkType {
                value: value.to_string(),
            });
        }
    }
    return Ok(());
}
