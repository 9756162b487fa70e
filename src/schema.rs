//! The `link` object type as the host studio registers it.
//!
//! This is the editor expressed as data: the sub-fields with their
//! visibility predicates and rules, the link type menu, and the description
//! shown under the active payload field. Rendering stays with the host.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::config::{EffectiveOptions, FieldOptions, PluginConfig, check_custom_type_names};
use crate::error::Error;
use crate::guards::{ReservedTypes, is_communication_link, is_custom_link};
use crate::options::{CustomLinkType, find_custom_type};
use crate::types::{BuiltInLinkType, LinkValue};
use crate::validation::{
    self, RuleResult, ValidationFailure, required_link_field, validate_anchor, validate_email,
    validate_parameters, validate_phone_number,
};

/// When a sub-field is hidden, evaluated against the parent link value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "when", rename_all = "camelCase")]
pub enum Visibility {
    /// Never shown.
    Hidden,
    /// Shown only for links of this type.
    #[serde(rename_all = "camelCase")]
    LinkType {
        /// The stored `type` string.
        link_type: String,
    },
    /// Shown only for custom links.
    CustomLink,
    /// Shown for everything but communication links.
    NotCommunication,
    /// Always shown.
    Visible,
}

impl Visibility {
    /// Whether the sub-field is hidden for `parent`.
    pub fn is_hidden(&self, parent: Option<&LinkValue>, reserved: &ReservedTypes) -> bool {
        return match self {
            Self::Hidden => true,
            Self::LinkType { link_type } => parent.is_none_or(|p| p.type_name() != link_type),
            Self::CustomLink => parent.is_none_or(|p| !is_custom_link(p, reserved)),
            Self::NotCommunication => parent.is_some_and(is_communication_link),
            Self::Visible => false,
        };
    }
}

/// A validation rule attached to a sub-field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum Rule {
    /// `#` plus a valid URL fragment.
    Anchor,
    /// A plausible e-mail address.
    Email,
    /// `?` plus at least one character.
    Parameters,
    /// Optional leading `+`, digits, spaces, hyphens.
    PhoneNumber,
    /// The field must have a value.
    Required,
    /// A URL with one of `schemes`, or a relative URL when allowed.
    #[serde(rename_all = "camelCase")]
    Uri {
        /// Accept URLs without a scheme.
        allow_relative: bool,
        /// Accepted schemes, without `:`.
        schemes: Vec<String>,
    },
}

impl Rule {
    /// Check the rule against the parent link value.
    ///
    /// # Errors
    ///
    /// Returns the failure reported by the underlying validator.
    pub fn check(&self, field: &str, link: &LinkValue) -> RuleResult {
        return match self {
            Self::Anchor => validate_anchor(link),
            Self::Email => validate_email(link),
            Self::Parameters => validate_parameters(link),
            Self::PhoneNumber if link.link.payload_field() != field => Ok(()),
            Self::PhoneNumber => validate_phone_number(link),
            Self::Required if link.type_name().is_empty() => {
                Err(ValidationFailure::at("Required", field))
            },
            Self::Required => Ok(()),
            Self::Uri { allow_relative, schemes } => {
                validation::validate_url_with(link, *allow_relative, schemes)
            },
        };
    }
}

/// Collapsible group of sub-fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fieldset {
    /// Starts collapsed.
    pub collapsed: bool,
    /// Can be toggled by the editor.
    pub collapsible: bool,
    /// Help text under the fieldset title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name sub-fields refer to.
    pub name: String,
    /// Heading shown in the editor.
    pub title: String,
}

/// One sub-field of the link object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Help text under the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name of the enclosing fieldset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fieldset: Option<String>,
    /// When the sub-field is hidden.
    pub hidden: Visibility,
    /// Value set on new links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<Value>,
    /// Key of the sub-field in the stored record.
    pub name: String,
    /// Input options, passed through to the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    /// Label above the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Document types a reference may point at.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    /// Host field type such as `string` or `reference`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Rules run on validation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<Rule>,
    /// Weak reference flag for reference fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weak: Option<bool>,
}

impl FieldDefinition {
    /// Sub-field with no description, options, or rules.
    fn new(name: &str, type_name: &str, hidden: Visibility) -> Self {
        return Self {
            description: None,
            fieldset: None,
            hidden,
            initial_value: None,
            name: name.to_string(),
            options: None,
            title: None,
            to: Vec::new(),
            type_name: type_name.to_string(),
            validation: Vec::new(),
            weak: None,
        };
    }

    /// Sub-field shown only while `link_type` is selected.
    fn payload(link_type: BuiltInLinkType, type_name: &str, options: &EffectiveOptions) -> Self {
        let mut field = Self::new(
            link_type.payload_field(),
            type_name,
            Visibility::LinkType {
                link_type: link_type.as_str().to_string(),
            },
        );
        field.description = options.descriptions.for_link_type(link_type).map(str::to_string);
        return field;
    }

    /// Append a validation rule.
    fn with_rule(mut self, rule: Rule) -> Self {
        self.validation.push(rule);
        return self;
    }

    /// Set the input options.
    fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        return self;
    }
}

/// An entry of the link type menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkTypeEntry {
    /// Icon name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Label in the menu.
    pub title: String,
    /// The `type` string stored when picked.
    pub value: String,
}

/// The configured plugin: options plus custom link types, including ones
/// with dynamic option providers that cannot come from a config file.
#[derive(Debug, Clone)]
pub struct LinkFieldPlugin {
    /// Plugin-wide options.
    config: PluginConfig,
    /// Config-file types followed by ones added in code.
    custom_link_types: Vec<CustomLinkType>,
}

impl LinkFieldPlugin {
    /// Set up the plugin from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReservedLinkType` or `Error::DuplicateLinkType` for bad
    /// custom type values.
    pub fn new(config: PluginConfig) -> Result<Self, Error> {
        config.validate()?;
        let custom_link_types = config.custom_link_types.iter().cloned().map(CustomLinkType::from).collect();
        return Ok(Self {
            config,
            custom_link_types,
        });
    }

    /// Add a custom link type, typically one with a dynamic provider.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReservedLinkType` or `Error::DuplicateLinkType` when
    /// the type's value is taken.
    pub fn with_custom_link_type(mut self, link_type: CustomLinkType) -> Result<Self, Error> {
        check_custom_type_names(
            self.custom_link_types
                .iter()
                .map(|t| t.value.as_str())
                .chain(std::iter::once(link_type.value.as_str())),
        )?;
        self.custom_link_types.push(link_type);
        return Ok(self);
    }

    /// The plugin-wide options.
    pub const fn config(&self) -> &PluginConfig {
        return &self.config;
    }

    /// Every registered custom link type, in menu order.
    pub fn custom_link_types(&self) -> &[CustomLinkType] {
        return &self.custom_link_types;
    }

    /// The schema for one link field.
    pub fn schema(&self, field: &FieldOptions) -> LinkSchema {
        return LinkSchema::new(self.config.effective(field), self.custom_link_types.clone(), field.required);
    }
}

/// The `link` object type for one field.
#[derive(Debug, Clone, Serialize)]
pub struct LinkSchema {
    /// Custom types offered after the built-ins.
    #[serde(skip)]
    custom_link_types: Vec<CustomLinkType>,
    /// Sub-fields in editor order.
    fields: Vec<FieldDefinition>,
    /// The collapsible `advanced` group.
    fieldsets: Vec<Fieldset>,
    /// Always `link`.
    name: &'static str,
    /// Options the schema was built from.
    #[serde(skip)]
    options: EffectiveOptions,
    /// The whole link is mandatory.
    #[serde(skip)]
    required: bool,
    /// Type names custom types may not use.
    #[serde(skip)]
    reserved: ReservedTypes,
    /// Always `Link`.
    title: &'static str,
    /// Always `object`.
    #[serde(rename = "type")]
    type_name: &'static str,
}

impl LinkSchema {
    /// Build the object type. `required` makes the whole link mandatory.
    pub fn new(options: EffectiveOptions, custom_link_types: Vec<CustomLinkType>, required: bool) -> Self {
        let fieldsets = vec![Fieldset {
            collapsed: true,
            collapsible: true,
            description: options.descriptions.advanced.clone(),
            name: "advanced".to_string(),
            title: "Advanced".to_string(),
        }];
        let fields = build_fields(&options);
        return Self {
            custom_link_types,
            fields,
            fieldsets,
            name: "link",
            options,
            required,
            reserved: ReservedTypes::built_in(),
            title: "Link",
            type_name: "object",
        };
    }

    /// Every sub-field, hidden ones included.
    pub fn fields(&self) -> &[FieldDefinition] {
        return &self.fields;
    }

    /// The sub-field called `name`.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        return self.fields.iter().find(|f| f.name == name);
    }

    /// Options with field overrides applied.
    pub const fn options(&self) -> &EffectiveOptions {
        return &self.options;
    }

    /// Names of the sub-fields the editor shows for `link`, in order.
    pub fn visible_fields(&self, link: Option<&LinkValue>) -> Vec<&str> {
        return self
            .fields
            .iter()
            .filter(|f| !f.hidden.is_hidden(link, &self.reserved))
            .map(|f| f.name.as_str())
            .collect();
    }

    /// The sub-field holding the active payload.
    pub fn active_field(&self, link: &LinkValue) -> Option<&FieldDefinition> {
        return self.field(link.link.payload_field());
    }

    /// Link types offered by the type selector: enabled built-ins (internal
    /// only when something is linkable), then custom types.
    pub fn link_type_menu(&self) -> Vec<LinkTypeEntry> {
        let built_in = BuiltInLinkType::ALL
            .into_iter()
            .filter(|t| self.options.enabled_built_in_link_types.contains(t))
            .filter(|t| *t != BuiltInLinkType::Internal || !self.options.linkable_schema_types.is_empty())
            .map(|t| LinkTypeEntry {
                icon: Some(t.icon().to_string()),
                title: t.title().to_string(),
                value: t.as_str().to_string(),
            });
        let custom = self.custom_link_types.iter().map(|t| LinkTypeEntry {
            icon: t.icon.clone(),
            title: t.title.clone(),
            value: t.value.clone(),
        });
        return built_in.chain(custom).collect();
    }

    /// The menu entry for `value`, or the first entry when nothing matches.
    pub fn selected_link_type(&self, value: &str) -> Option<LinkTypeEntry> {
        let mut menu = self.link_type_menu();
        let index = menu.iter().position(|e| e.value == value).unwrap_or(0);
        return (index < menu.len()).then(|| menu.swap_remove(index));
    }

    /// Help text under the payload input: the custom type's own description
    /// for custom links, otherwise the active field's description.
    pub fn active_description(&self, link: &LinkValue) -> Option<&str> {
        if is_custom_link(link, &self.reserved) {
            return find_custom_type(&self.custom_link_types, link).and_then(|t| t.description.as_deref());
        }
        return self.active_field(link).and_then(|f| f.description.as_deref());
    }

    /// Run the rules of every sub-field, plus the required-link check when
    /// this field is required.
    pub fn validate(&self, link: Option<&LinkValue>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        if self.required {
            failures.extend(required_link_field(link).err());
        }
        let Some(link) = link else {
            return failures;
        };

        for field in &self.fields {
            for rule in &field.validation {
                failures.extend(rule.check(&field.name, link).err());
            }
        }
        return failures;
    }
}

/// Sub-fields in editor order.
fn build_fields(options: &EffectiveOptions) -> Vec<FieldDefinition> {
    let mut fields = Vec::new();

    let mut text = FieldDefinition::new(
        "text",
        "string",
        if options.enable_text { Visibility::Visible } else { Visibility::Hidden },
    );
    text.title = Some(options.text_label.clone());
    text.description = options.descriptions.text.clone();
    fields.push(text);

    let mut link_type = FieldDefinition::new("type", "string", Visibility::Visible).with_rule(Rule::Required);
    link_type.title = Some("Type".to_string());
    link_type.initial_value = Some(json!(BuiltInLinkType::Internal.as_str()));
    fields.push(link_type);

    let mut internal = FieldDefinition::payload(BuiltInLinkType::Internal, "reference", options)
        .with_options(reference_options(options));
    internal.to.clone_from(&options.linkable_schema_types);
    internal.weak = Some(options.weak_references);
    fields.push(internal);

    fields.push(
        FieldDefinition::payload(BuiltInLinkType::External, "url", options).with_rule(Rule::Uri {
            allow_relative: true,
            schemes: vec!["https".to_string(), "http".to_string()],
        }),
    );
    fields.push(FieldDefinition::payload(BuiltInLinkType::Email, "email", options).with_rule(Rule::Email));
    fields.push(
        FieldDefinition::payload(BuiltInLinkType::Phone, "string", options).with_rule(Rule::PhoneNumber),
    );
    fields.push(FieldDefinition::payload(BuiltInLinkType::Document, "file", options));
    fields.push(FieldDefinition::payload(BuiltInLinkType::Image, "image", options));
    fields.push(
        FieldDefinition::payload(BuiltInLinkType::Video, "file", options)
            .with_options(json!({ "accept": "video/*" })),
    );
    fields.push(
        FieldDefinition::payload(BuiltInLinkType::Audio, "file", options)
            .with_options(json!({ "accept": "audio/*" })),
    );
    for number in [BuiltInLinkType::Sms, BuiltInLinkType::WhatsApp, BuiltInLinkType::Fax] {
        fields.push(FieldDefinition::payload(number, "string", options).with_rule(Rule::PhoneNumber));
    }

    let mut value = FieldDefinition::new("value", "string", Visibility::CustomLink);
    value.description = options.descriptions.external.clone();
    fields.push(value);

    let mut blank = FieldDefinition::new("blank", "boolean", Visibility::NotCommunication);
    blank.title = Some("Open in new window".to_string());
    blank.initial_value = Some(Value::Bool(false));
    blank.description = options.descriptions.blank.clone();
    fields.push(blank);

    if options.enable_link_parameters {
        let mut parameters =
            FieldDefinition::new("parameters", "string", Visibility::NotCommunication).with_rule(Rule::Parameters);
        parameters.title = Some("Parameters".to_string());
        parameters.description = options.descriptions.parameters.clone();
        parameters.fieldset = Some("advanced".to_string());
        fields.push(parameters);
    }

    if options.enable_anchor_links {
        let mut anchor =
            FieldDefinition::new("anchor", "string", Visibility::NotCommunication).with_rule(Rule::Anchor);
        anchor.title = Some("Anchor".to_string());
        anchor.description = options.descriptions.anchor.clone();
        anchor.fieldset = Some("advanced".to_string());
        fields.push(anchor);
    }

    return fields;
}

/// Reference picker options: new documents cannot be created from the link,
/// and any configured filter is passed through.
fn reference_options(options: &EffectiveOptions) -> Value {
    let mut map = Map::new();
    map.insert("disableNew".to_string(), Value::Bool(true));
    if let Some(Value::Object(filter)) = &options.reference_filter_options {
        map.extend(filter.clone());
    }
    return Value::Object(map);
}
