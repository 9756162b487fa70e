use std::fmt::Write as _;

use crate::config::CONFIG_FILE;
use crate::error::Error;
use crate::types::BuiltInLinkType;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic: what happened and,
/// where there is one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::ReservedLinkType { value } => render_reserved_link_type(value),
        Error::DuplicateLinkType { value } => render_duplicate_link_type(value),
        Error::UnknownLinkType { name } => render_unknown_link_type(name),
        _ => render_generic(e),
    };
}

fn render_generic(e: &Error) -> String {
    return match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::Json(e) => format!("\
# Error: Invalid JSON

{e}

## Fix

Pass a single link object or an array of link objects.
"),

        Error::OptionsFailed { link_type, reason } => format!("\
# Error: Options Unavailable

Options for link type `{link_type}` could not be loaded: {reason}
"),

        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Check `{CONFIG_FILE}`.
"),

        _ => format!("\
# Error

{e}
"),
    };
}

fn render_reserved_link_type(value: &str) -> String {
    return format!("\
# Error: Reserved Link Type

Custom link type `{value}` has the same name as a built-in link type.

## Fix

Rename it in `{CONFIG_FILE}`:

    [[customLinkTypes]]
    value = \"my-{value}\"
");
}

fn render_duplicate_link_type(value: &str) -> String {
    return format!("\
# Error: Duplicate Link Type

More than one custom link type uses `{value}`.

## Fix

Give each `[[customLinkTypes]]` entry in `{CONFIG_FILE}` its own `value`.
");
}

fn render_unknown_link_type(name: &str) -> String {
    let mut out = format!("\
# Error: Unknown Link Type

`{name}` is not a built-in link type.

## Built-in types

");
    for link_type in BuiltInLinkType::ALL {
        let _ = writeln!(out, "- `{}`", link_type.as_str());
    }
    return out;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_type_suggests_rename() {
        let md = render_error(&Error::ReservedLinkType {
            value: "phone".into(),
        });
        assert!(md.starts_with("# Error: Reserved Link Type"));
        assert!(md.contains("value = \"my-phone\""));
    }

    #[test]
    fn unknown_type_lists_built_ins() {
        let md = render_error(&Error::UnknownLinkType { name: "telegram".into() });
        assert!(md.contains("- `whatsapp`"));
        assert!(md.contains("- `internal`"));
    }
}
