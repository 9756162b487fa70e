//! Custom link types and the options their editors offer.
//!
//! Options come from an [`OptionsProvider`]: a static list or an async
//! function of the current document, field path, and user. The editor shows a
//! loading state until the provider answers.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CustomLinkTypeConfig;
use crate::error::Error;
use crate::types::LinkValue;

/// One selectable value of a custom link type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLinkOption {
    /// Label shown in the select.
    pub title: String,
    /// Value stored on the link.
    pub value: String,
}

impl CustomLinkOption {
    /// Option with the given label and stored value.
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        return Self {
            title: title.into(),
            value: value.into(),
        };
    }
}

/// The studio user editing the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// E-mail address, if the host exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Host user id.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role names granted to the user.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// What a dynamic provider gets to look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsContext {
    /// The user editing the document, if signed in.
    pub current_user: Option<CurrentUser>,
    /// The whole document being edited.
    pub document: Value,
    /// Path of the `value` sub-field within the document.
    pub field_path: Vec<String>,
}

/// Source of the option list for a custom link type.
#[async_trait]
pub trait OptionsProvider: Send + Sync {
    /// The options to offer, in display order.
    ///
    /// # Errors
    ///
    /// Returns whatever the provider fails with, usually `Error::OptionsFailed`.
    async fn options(&self, context: &OptionsContext) -> Result<Vec<CustomLinkOption>, Error>;
}

#[async_trait]
impl OptionsProvider for Vec<CustomLinkOption> {
    async fn options(&self, _context: &OptionsContext) -> Result<Vec<CustomLinkOption>, Error> {
        return Ok(self.clone());
    }
}

/// Provider backed by an async function of the editing context.
pub struct DynamicOptions<F>(pub F);

#[async_trait]
impl<F, Fut> OptionsProvider for DynamicOptions<F>
where
    F: Fn(OptionsContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<CustomLinkOption>, Error>> + Send + 'static,
{
    async fn options(&self, context: &OptionsContext) -> Result<Vec<CustomLinkOption>, Error> {
        return (self.0)(context.clone()).await;
    }
}

/// A caller-defined link type shown after the built-ins in the type menu.
#[derive(Clone)]
pub struct CustomLinkType {
    /// Replaces the field description while this type is selected.
    pub description: Option<String>,
    /// Icon name, passed through to the host.
    pub icon: Option<String>,
    /// Where the option list comes from.
    pub options: Arc<dyn OptionsProvider>,
    /// Label in the type selector.
    pub title: String,
    /// The `type` string stored on links of this kind.
    pub value: String,
}

impl fmt::Debug for CustomLinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("CustomLinkType")
            .field("value", &self.value)
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("description", &self.description)
            .finish_non_exhaustive();
    }
}

impl CustomLinkType {
    /// Type with no icon or description.
    pub fn new(
        value: impl Into<String>,
        title: impl Into<String>,
        options: impl OptionsProvider + 'static,
    ) -> Self {
        return Self {
            description: None,
            icon: None,
            options: Arc::new(options),
            title: title.into(),
            value: value.into(),
        };
    }

    /// Set the description shown while this type is selected.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        return self;
    }

    /// Set the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        return self;
    }

    /// Ask the provider for options. A failing provider leaves the editor
    /// loading; the failure is logged, not returned.
    pub async fn load_options(&self, context: &OptionsContext) -> OptionsState {
        return match self.options.options(context).await {
            Ok(options) => OptionsState::Ready(options),
            Err(e) => {
                tracing::warn!(link_type = %self.value, %e, "custom link options unavailable");
                OptionsState::Loading
            },
        };
    }
}

impl From<CustomLinkTypeConfig> for CustomLinkType {
    fn from(config: CustomLinkTypeConfig) -> Self {
        return Self {
            description: config.description,
            icon: config.icon,
            options: Arc::new(config.options),
            title: config.title,
            value: config.value,
        };
    }
}

/// Editor state of a custom type's option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsState {
    /// Waiting on the provider; the editor shows a spinner.
    Loading,
    /// Options available for selection.
    Ready(Vec<CustomLinkOption>),
}

/// One `<option>` of the custom value select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectEntry {
    /// Cannot be picked.
    pub disabled: bool,
    /// Not listed in the open select.
    pub hidden: bool,
    /// Matches the stored value.
    pub selected: bool,
    /// Option label.
    pub title: String,
    /// Option value.
    pub value: String,
}

/// Find the custom type a link uses.
pub fn find_custom_type<'a>(types: &'a [CustomLinkType], link: &LinkValue) -> Option<&'a CustomLinkType> {
    return types.iter().find(|t| t.value == link.type_name());
}

/// Entries for the custom value select: an empty, hidden placeholder that is
/// selected while nothing is chosen, then one entry per option.
pub fn select_entries(options: &[CustomLinkOption], current: &str) -> Vec<SelectEntry> {
    let placeholder = SelectEntry {
        disabled: true,
        hidden: true,
        selected: current.is_empty(),
        title: String::new(),
        value: String::new(),
    };
    let entries = options.iter().map(|option| SelectEntry {
        disabled: false,
        hidden: false,
        selected: option.value == current,
        title: option.title.clone(),
        value: option.value.clone(),
    });
    return std::iter::once(placeholder).chain(entries).collect();
}
