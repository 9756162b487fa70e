//! CLI commands: href, text, validate, check, schema, types.

use std::io::Read as _;
use std::path::Path;
use std::process::ExitCode;

use linkfield::config::{FieldOptions, PluginConfig};
use linkfield::error::Error;
use linkfield::href::{FALLBACK_HREF, Href, generate_href};
use linkfield::scan;
use linkfield::schema::{LinkFieldPlugin, LinkSchema};
use linkfield::text::link_text;
use linkfield::types::{BuiltInLinkType, LinkValue};
use linkfield::validation::ValidationFailure;

/// Path printed for failures that concern the link as a whole.
const WHOLE_LINK: &str = "link";

/// Print one href per link.
///
/// # Errors
///
/// Returns errors from config loading or input parsing.
pub fn href(root: &Path, file: &Path) -> Result<ExitCode, Error> {
    // Validates custom type names even though hrefs do not depend on them.
    PluginConfig::load(root)?;
    for link in read_links(file)? {
        let href = link.as_ref().map_or_else(Href::fallback, |l| generate_href(l, None));
        println!("{href}");
    }
    return Ok(ExitCode::SUCCESS);
}

/// Print one label per link.
///
/// # Errors
///
/// Returns errors from config loading or input parsing.
pub fn text(root: &Path, file: &Path) -> Result<ExitCode, Error> {
    PluginConfig::load(root)?;
    for link in read_links(file)? {
        let label = link.as_ref().map_or_else(|| FALLBACK_HREF.to_string(), link_text);
        println!("{label}");
    }
    return Ok(ExitCode::SUCCESS);
}

/// Validate every link in the input; exit 1 when any fails.
///
/// # Errors
///
/// Returns errors from config loading or input parsing.
pub fn validate(root: &Path, file: &Path, required: bool) -> Result<ExitCode, Error> {
    let schema = load_schema(root, required, &[])?;
    let links = read_links(file)?;

    let mut invalid = 0_usize;
    for (index, link) in links.iter().enumerate() {
        for failure in schema.validate(link.as_ref()) {
            invalid = invalid.saturating_add(1);
            println!("INVALID  [{index}] {}", describe(&failure));
        }
    }

    return Ok(summarize(invalid, links.len()));
}

/// Validate every link found in the documents under `dir`. Link objects that
/// are not valid link records count as invalid.
///
/// # Errors
///
/// Returns errors from config loading or `Error::FileNotFound` for a
/// missing directory.
pub fn check(root: &Path, dir: &Path, required: bool) -> Result<ExitCode, Error> {
    let schema = load_schema(root, required, &[])?;
    let found = scan::scan(dir)?;

    let mut invalid = 0_usize;
    for link in &found {
        let location = format!("{}#{}", link.file.display(), link.pointer);
        let value = match &link.value {
            Ok(value) => value,
            Err(e) => {
                invalid = invalid.saturating_add(1);
                println!("INVALID  {location} {WHOLE_LINK}: {e}");
                continue;
            },
        };
        for failure in schema.validate(Some(value)) {
            invalid = invalid.saturating_add(1);
            println!("INVALID  {location} {}", describe(&failure));
        }
    }

    return Ok(summarize(invalid, found.len()));
}

/// Print the object type definition.
///
/// # Errors
///
/// Returns errors from config loading, `Error::UnknownLinkType` for a bad
/// `--types` entry, or `Error::Json` if serialization fails.
pub fn schema(root: &Path, text: bool, types: &[String]) -> Result<ExitCode, Error> {
    let config = PluginConfig::load(root)?;
    let field = FieldOptions {
        enable_text: text,
        enabled_built_in_link_types: parse_types(types)?,
        ..FieldOptions::default()
    };
    let schema = LinkFieldPlugin::new(config)?.schema(&field);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    return Ok(ExitCode::SUCCESS);
}

/// Print the type selector entries, one per line.
///
/// # Errors
///
/// Returns errors from config loading or `Error::UnknownLinkType`.
pub fn types(root: &Path, types: &[String]) -> Result<ExitCode, Error> {
    let schema = load_schema(root, false, types)?;
    for entry in schema.link_type_menu() {
        println!("{:<12} {}", entry.value, entry.title);
    }
    return Ok(ExitCode::SUCCESS);
}

/// Build the schema for a field with default options.
///
/// # Errors
///
/// Returns errors from config loading or type parsing.
fn load_schema(root: &Path, required: bool, types: &[String]) -> Result<LinkSchema, Error> {
    let config = PluginConfig::load(root)?;
    let field = FieldOptions {
        enabled_built_in_link_types: parse_types(types)?,
        required,
        ..FieldOptions::default()
    };
    return Ok(LinkFieldPlugin::new(config)?.schema(&field));
}

/// An empty list keeps the plugin-wide setting.
///
/// # Errors
///
/// Returns `Error::UnknownLinkType` for the first unknown name.
fn parse_types(types: &[String]) -> Result<Option<Vec<BuiltInLinkType>>, Error> {
    if types.is_empty() {
        return Ok(None);
    }
    let parsed = types.iter().map(|t| t.trim().parse()).collect::<Result<Vec<_>, _>>()?;
    return Ok(Some(parsed));
}

/// Read a link, an array of links, or `null` entries from a file or stdin.
///
/// # Errors
///
/// Returns `Error::FileNotFound`, `Error::Io`, or `Error::Json`.
fn read_links(file: &Path) -> Result<Vec<Option<LinkValue>>, Error> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        if !file.exists() {
            return Err(Error::FileNotFound {
                path: file.to_path_buf(),
            });
        }
        std::fs::read_to_string(file)?
    };

    let value: serde_json::Value = serde_json::from_str(&content)?;
    if value.is_array() {
        return Ok(serde_json::from_value(value)?);
    }
    return Ok(vec![serde_json::from_value(value)?]);
}

/// `<path>: <message>`, naming the whole link when the failure has no path.
fn describe(failure: &ValidationFailure) -> String {
    let path = failure.path.as_deref().unwrap_or(WHOLE_LINK);
    return format!("{path}: {}", failure.message);
}

/// Print the summary line and pick the exit code.
fn summarize(invalid: usize, total: usize) -> ExitCode {
    if invalid > 0 {
        println!();
        println!("{invalid} invalid");
        return ExitCode::from(1);
    }
    println!("All {total} links valid");
    return ExitCode::SUCCESS;
}
