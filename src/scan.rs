use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::error::Error;
use crate::types::LinkValue;

/// Record type that marks an object as a link field value.
const LINK_RECORD_TYPE: &str = "link";

/// A link object found inside a content document.
#[derive(Debug)]
pub struct FoundLink {
    /// Document file, relative to the scanned root.
    pub file: PathBuf,
    /// JSON pointer to the link object within the document.
    pub pointer: String,
    /// The parsed link, or why the object is not a valid link record.
    pub value: Result<LinkValue, serde_json::Error>,
}

/// Scan all `.json` documents under `root` and extract link objects.
/// Files that cannot be read or parsed are skipped with a warning, so one bad
/// export does not hide the links in every other document. Link objects
/// that do not deserialize are returned with their error.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if `root` does not exist.
pub fn scan(root: &Path) -> Result<Vec<FoundLink>, Error> {
    if !root.exists() {
        return Err(Error::FileNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
    {
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();

        let document = match read_document(path) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "skipping unreadable document");
                continue;
            },
        };

        let before = found.len();
        extract_links_from_value(&document, &relative, "", &mut found);
        tracing::debug!(
            path = %relative.display(),
            links = found.len().saturating_sub(before),
            "scanned document"
        );
    }

    return Ok(found);
}

/// Parse a JSON document from disk.
///
/// # Errors
///
/// Returns `Error::Io` or `Error::Json`.
fn read_document(path: &Path) -> Result<Value, Error> {
    let content = std::fs::read_to_string(path)?;
    return Ok(serde_json::from_str(&content)?);
}

/// Walk a JSON value depth-first, collecting every object whose `_type` is
/// `link`. Link objects are not searched further.
fn extract_links_from_value(value: &Value, file: &Path, pointer: &str, found: &mut Vec<FoundLink>) {
    match value {
        Value::Object(map) => {
            if map.get("_type").and_then(Value::as_str) == Some(LINK_RECORD_TYPE) {
                push_link(value, file, pointer, found);
                return;
            }
            for (key, child) in map {
                let child_pointer = format!("{pointer}/{}", escape_pointer_token(key));
                extract_links_from_value(child, file, &child_pointer, found);
            }
        },
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                extract_links_from_value(child, file, &format!("{pointer}/{index}"), found);
            }
        },
        _ => {},
    }
}

/// Record one link object, keeping deserialization failures.
fn push_link(value: &Value, file: &Path, pointer: &str, found: &mut Vec<FoundLink>) {
    let parsed = serde_json::from_value::<LinkValue>(value.clone());
    if let Err(e) = &parsed {
        tracing::debug!(path = %file.display(), pointer, %e, "malformed link");
    }
    found.push(FoundLink {
        file: file.to_path_buf(),
        pointer: pointer.to_string(),
        value: parsed,
    });
}

/// Escape `~` and `/` per RFC 6901.
fn escape_pointer_token(token: &str) -> String {
    return token.replace('~', "~0").replace('/', "~1");
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn finds_nested_links_with_pointers() {
        let document = json!({
            "_type": "page",
            "cta": { "_type": "link", "type": "external", "url": "https://a.b" },
            "sections": [
                { "links": [{ "_type": "link", "type": "email", "email": "a@b.c" }] }
            ],
            "a/b": { "_type": "link", "type": "phone" }
        });
        let mut found = Vec::new();
        extract_links_from_value(&document, Path::new("page.json"), "", &mut found);

        let mut pointers: Vec<&str> = found.iter().map(|f| f.pointer.as_str()).collect();
        pointers.sort_unstable();
        assert_eq!(pointers, vec!["/a~1b", "/cta", "/sections/0/links/0"]);
    }

    #[test]
    fn malformed_link_is_kept_with_its_error() {
        let document = json!({
            "_type": "page",
            "l": { "_type": "link", "type": "phone", "phone": 12345 }
        });
        let mut found = Vec::new();
        extract_links_from_value(&document, Path::new("page.json"), "", &mut found);

        assert_eq!(found.len(), 1);
        let link = found.first().unwrap();
        assert_eq!(link.pointer, "/l");
        assert!(link.value.is_err());
    }

    #[test]
    fn scan_skips_invalid_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pages")).unwrap();
        std::fs::write(
            dir.path().join("pages/home.json"),
            r#"{ "link": { "_type": "link", "type": "internal" } }"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), r#"{ "_type": "link" }"#).unwrap();

        let found = scan(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        let link = found.first().unwrap();
        assert_eq!(link.file, PathBuf::from("pages/home.json"));
        assert_eq!(link.pointer, "/link");
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(scan(&dir.path().join("nope")), Err(Error::FileNotFound { .. })));
    }
}
