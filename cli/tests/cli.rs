use std::process::Command;

use serde_json::Value;

struct Output {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn splitq(args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_splitq"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    Output {
        code: output.status.code(),
        stdout: String::from_utf8(output.stdout).unwrap(),
        stderr: String::from_utf8(output.stderr).unwrap(),
    }
}

fn query(file: &str, args: &[&str]) -> Output {
    let path = fixture(file);
    let mut full = vec![path.as_str()];
    full.extend_from_slice(args);
    splitq(&full)
}

fn assert_prints(output: Output, expected: &str) {
    assert_eq!(Some(0), output.code, "stderr: {}", output.stderr);
    assert_eq!(format!("{}\n", expected), output.stdout);
}

#[test]
fn validate() {
    assert_prints(query("splits.json", &["validate"]), "valid");
    assert_prints(query("no_splits.json", &["validate"]), "valid");
}

#[test]
fn invalid_json() {
    for query_name in ["validate", "count", "get_split", "nonsense"] {
        let output = query("invalid.json", &[query_name]);
        assert_eq!(Some(1), output.code);
        assert!(output.stdout.is_empty());
        assert!(
            output.stderr.starts_with("Invalid JSON: "),
            "stderr: {}",
            output.stderr
        );
        assert!(output.stderr.contains("line 3"));
    }
}

#[test]
fn undecodable_bytes() {
    let output = query("invalid_utf8.json", &["validate"]);
    assert_eq!(Some(1), output.code);
    assert!(output.stdout.is_empty());
    assert!(
        output.stderr.starts_with("Invalid JSON: "),
        "stderr: {}",
        output.stderr
    );
    assert!(output.stderr.contains("UTF-8"));
}

#[test]
fn nesting_too_deep() {
    let output = query("too_deep.json", &["count"]);
    assert_eq!(Some(1), output.code);
    assert!(output.stdout.is_empty());
    assert_eq!(
        "Invalid JSON: nesting deeper than 512 levels at line 2 column 511\n",
        output.stderr
    );

    let output = splitq(&["--explain", &fixture("too_deep.json"), "count"]);
    assert_eq!(Some(1), output.code);
    assert!(output.stderr.contains("too_deep.json"));
}

#[test]
fn numbers_beyond_f64() {
    assert_prints(query("big_numbers.json", &["validate"]), "valid");
    assert_prints(
        query("big_numbers.json", &["get_split", "0"]),
        r#"{"name":"long","gain":1e400,"id":123456789012345678901234567890}"#,
    );
    assert_prints(query("big_numbers.json", &["get_field", "0", "gain"]), "1e400");
    assert_prints(
        query("big_numbers.json", &["get_field", "0", "id"]),
        "123456789012345678901234567890",
    );
}

#[test]
fn explain_shows_the_offending_line() {
    let output = splitq(&["--explain", &fixture("invalid.json"), "validate"]);
    assert_eq!(Some(1), output.code);
    assert!(output.stderr.starts_with("Invalid JSON: "));
    assert!(output.stderr.contains("invalid.json"));
    assert!(output.stderr.contains(r#"{ "name": "intro", "start": 0 },,"#));
}

#[test]
fn missing_file() {
    let path = fixture("missing.json");
    for query_name in ["validate", "nonsense"] {
        let output = splitq(&[&path, query_name]);
        assert_eq!(Some(1), output.code);
        assert!(output.stdout.is_empty());
        assert_eq!(format!("File not found: {}\n", path), output.stderr);
    }
}

#[test]
fn directory_instead_of_file() {
    let output = splitq(&[env!("CARGO_MANIFEST_DIR"), "validate"]);
    assert_eq!(Some(1), output.code);
    assert!(output.stderr.starts_with("Failed to open file '"));
}

#[test]
fn has_splits_and_count() {
    assert_prints(query("splits.json", &["has_splits"]), "true");
    assert_prints(query("splits.json", &["count"]), "3");
    assert_prints(query("no_splits.json", &["has_splits"]), "false");
    assert_prints(query("no_splits.json", &["count"]), "0");
}

#[test]
fn splits_that_are_not_an_array() {
    assert_prints(query("splits_object.json", &["has_splits"]), "false");
    assert_prints(query("splits_object.json", &["get_split", "0"]), "{}");

    let output = query("splits_object.json", &["count"]);
    assert_eq!(Some(0), output.code);
    assert_eq!("0\n", output.stdout);
    assert!(output.stderr.contains("not an array"));
}

#[test]
fn get_split() {
    assert_prints(
        query("splits.json", &["get_split", "2"]),
        r#"{"name":"outro","start":1804,"end":1830}"#,
    );
    assert_prints(query("splits.json", &["get_split", "3"]), "{}");
    assert_prints(query("splits.json", &["get_split", "-1"]), "{}");
    assert_prints(query("no_splits.json", &["get_split", "0"]), "{}");
}

#[test]
fn get_split_round_trips() {
    let original: Value =
        serde_json::from_str(&std::fs::read_to_string(fixture("splits.json")).unwrap()).unwrap();

    for index in 0..3usize {
        let output = query("splits.json", &["get_split", &index.to_string()]);
        assert_eq!(Some(0), output.code);
        let printed = output.stdout.strip_suffix('\n').unwrap();
        assert!(!printed.contains('\n'));
        let reparsed: Value = serde_json::from_str(printed).unwrap();
        assert_eq!(original["splits"][index], reparsed);
    }
}

#[test]
fn get_field() {
    assert_prints(query("splits.json", &["get_field", "0", "name"]), "intro");
    assert_prints(query("splits.json", &["get_field", "0", "end"]), "31.5");
    assert_prints(query("splits.json", &["get_field", "1", "end"]), "1804");
    assert_prints(query("splits.json", &["get_field", "1", "keep"]), "true");
    assert_prints(query("splits.json", &["get_field", "0", "note"]), "");
    assert_prints(
        query("splits.json", &["get_field", "0", "tags"]),
        r#"["music","jingle"]"#,
    );
    assert_prints(
        query("splits.json", &["get_field", "1", "speaker"]),
        r#"{"name":"Dana","mic":2}"#,
    );
    assert_prints(query("splits.json", &["get_field", "0", "missing"]), "");
    assert_prints(query("splits.json", &["get_field", "9", "name"]), "");
    assert_prints(query("no_splits.json", &["get_field", "0", "name"]), "");
}

#[test]
fn missing_query_arguments() {
    let output = query("splits.json", &["get_split"]);
    assert_eq!(Some(1), output.code);
    assert!(output.stdout.is_empty());
    assert_eq!("Missing split index\n", output.stderr);

    for args in [&["get_field"][..], &["get_field", "0"][..]] {
        let output = query("splits.json", args);
        assert_eq!(Some(1), output.code);
        assert_eq!("Missing split index or field name\n", output.stderr);
    }
}

#[test]
fn invalid_index() {
    let output = query("splits.json", &["get_split", "first"]);
    assert_eq!(Some(1), output.code);
    assert_eq!("Invalid split index: first\n", output.stderr);
}

#[test]
fn unknown_query() {
    let output = query("splits.json", &["length"]);
    assert_eq!(Some(1), output.code);
    assert!(output.stdout.is_empty());
    assert_eq!("Unknown query: length\n", output.stderr);
}

#[test]
fn too_few_arguments() {
    for args in [&[][..], &["splits.json"][..]] {
        let output = splitq(args);
        assert_eq!(Some(1), output.code);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.contains("Usage:"));
        for query_name in ["validate", "count", "has_splits", "get_split", "get_field"] {
            assert!(output.stderr.contains(query_name), "stderr: {}", output.stderr);
        }
    }
}

#[test]
fn help_lists_queries() {
    let output = splitq(&["--help"]);
    assert_eq!(Some(0), output.code);
    assert!(output.stdout.contains("get_field N field"));
}

#[test]
fn byte_order_marks() {
    assert_prints(query("utf8_bom.json", &["get_field", "0", "name"]), "café");
    assert_prints(query("utf16le_bom.json", &["get_field", "0", "name"]), "café");
    assert_prints(query("utf16le_bom.json", &["count"]), "1");
    assert_prints(
        query("utf8_bom.json", &["get_split", "0"]),
        r#"{"name":"café"}"#,
    );
}

#[test]
fn verbose_logging_stays_off_stdout() {
    let output = splitq(&["-vv", &fixture("splits.json"), "count"]);
    assert_eq!(Some(0), output.code);
    assert_eq!("3\n", output.stdout);
    assert!(output.stderr.contains("running count"));
}
