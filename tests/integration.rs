use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};

fn linkfield_cmd(fixture: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_linkfield"));
    cmd.current_dir(Path::new("tests/fixtures").join(fixture));
    cmd.env_remove("LINKFIELD_LOG");
    cmd
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect()
}

#[test]
fn href_prints_one_line_per_link() {
    let output = linkfield_cmd("site")
        .args(["href", "links/valid.json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "href failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout_lines(&output),
        vec![
            "/about?ref=nav",
            "tel:+15550100",
            "sms:+15550101",
            "https://example.com"
        ]
    );
}

#[test]
fn href_reads_stdin() {
    let mut child = linkfield_cmd("site")
        .args(["href", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{ "type": "whatsapp", "whatsapp": "+31 6 1234 5678" }"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["https://wa.me/31612345678"]);
}

#[test]
fn text_prefers_explicit_text_then_title() {
    let output = linkfield_cmd("site")
        .args(["text", "links/valid.json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec!["About us", "+1 555 0100", "+1 555 0101", "Example"]
    );
}

#[test]
fn validate_passes_optional_empty_links() {
    let output = linkfield_cmd("site")
        .args(["validate", "links/empty.json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("All 2 links valid"));
}

#[test]
fn validate_required_reports_missing_values() {
    let output = linkfield_cmd("site")
        .args(["validate", "links/empty.json", "--required"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("INVALID  [0] link: Link is required"), "{stdout}");
    assert!(stdout.contains("INVALID  [1] email: E-mail is required"), "{stdout}");
    assert!(stdout.contains("2 invalid"), "{stdout}");
}

#[test]
fn check_reports_invalid_links_with_pointers() {
    let output = linkfield_cmd("site").args(["check", "content"]).output().unwrap();
    assert_eq!(
        output.status.code(),
        Some(1),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("INVALID  pages/contact.json#/links/0 phone: Must be a valid phone number"));
    assert!(stdout.contains(
        "INVALID  pages/contact.json#/links/1 url: Does not match allowed protocols/schemes"
    ));
    assert!(stdout.contains("INVALID  pages/contact.json#/links/1 anchor: Must start with #"));
    assert!(!stdout.contains("home.json"), "{stdout}");
    assert!(stdout.contains("3 invalid"));
}

#[test]
fn check_counts_malformed_link_objects() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("page.json"),
        r#"{ "_type": "page", "l": { "_type": "link", "type": "phone", "phone": 12345 } }"#,
    )
    .unwrap();

    let output = linkfield_cmd("site")
        .arg("check")
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("INVALID  page.json#/l link: invalid type"), "{stdout}");
    assert!(stdout.contains("1 invalid"), "{stdout}");
    assert!(!stdout.contains("links valid"), "{stdout}");
}

#[test]
fn check_missing_directory_fails() {
    let output = linkfield_cmd("site").args(["check", "nope"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("File Not Found"));
}

#[test]
fn types_lists_enabled_and_custom_types() {
    let output = linkfield_cmd("site").arg("types").output().unwrap();
    assert!(output.status.success());

    let values: Vec<String> = stdout_lines(&output)
        .iter()
        .filter_map(|l| l.split_whitespace().next().map(String::from))
        .collect();
    assert_eq!(
        values,
        vec!["internal", "external", "email", "phone", "whatsapp", "archive"]
    );
}

#[test]
fn types_rejects_unknown_built_in() {
    let output = linkfield_cmd("site")
        .args(["types", "--types", "email,telegram"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown Link Type"), "{stderr}");
    assert!(stderr.contains("`telegram`"), "{stderr}");
}

#[test]
fn schema_prints_object_definition() {
    let output = linkfield_cmd("site")
        .args(["schema", "--text"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["name"], "link");
    assert_eq!(schema["type"], "object");
    let names: Vec<&str> = schema["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["name"].as_str())
        .collect();
    assert_eq!(names.first(), Some(&"text"));
    assert!(names.contains(&"internalLink"));
    assert!(names.contains(&"anchor"));
}

#[test]
fn reserved_custom_type_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".linkfield.toml"),
        "[[customLinkTypes]]\ntitle = \"Call\"\nvalue = \"phone\"\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_linkfield"))
        .arg("--config")
        .arg(dir.path())
        .arg("types")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Reserved Link Type"), "{stderr}");
    assert!(stderr.contains("my-phone"), "{stderr}");
}
