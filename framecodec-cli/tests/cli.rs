use assert_cmd::Command;
use predicates::str::contains;
use std::fs;

fn schema_json() -> &'static str {
    r#"{
        "version": 1,
        "stream_compression": null,
        "custom_header": null,
        "blocks": [
            { "type": "Numeric", "index": 0, "property_name": "hp", "custom": ["u8"], "compression": "", "compression_custom": [] },
            { "type": "String", "index": 1, "property_name": "name", "custom": ["UTF-8"], "compression": "", "compression_custom": [] }
        ]
    }"#
}

#[test]
fn encode_then_decode_round_trips_records() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("schema.json");
    let input_path = dir.path().join("records.json");
    let stream_path = dir.path().join("stream.bin");
    let output_path = dir.path().join("decoded.json");

    fs::write(&schema_path, schema_json()).unwrap();
    fs::write(&input_path, r#"[{"hp": 100, "name": "alpha"}, {"hp": 90, "name": "bravo"}]"#).unwrap();

    Command::cargo_bin("framecodec")
        .unwrap()
        .args([
            "encode",
            "--schema",
            schema_path.to_str().unwrap(),
            input_path.to_str().unwrap(),
            "--output",
            stream_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    Command::cargo_bin("framecodec")
        .unwrap()
        .args([
            "decode",
            "--schema",
            schema_path.to_str().unwrap(),
            stream_path.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let decoded: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(decoded[0]["hp"], 100);
    assert_eq!(decoded[0]["name"], "alpha");
    assert_eq!(decoded[1]["hp"], 90);
    assert_eq!(decoded[1]["name"], "bravo");
}

#[test]
fn inspect_prints_schema_summary() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("schema.json");
    fs::write(&schema_path, schema_json()).unwrap();

    Command::cargo_bin("framecodec")
        .unwrap()
        .args(["inspect", schema_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("hp"))
        .stdout(contains("name"));
}

#[test]
fn decode_rejects_version_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("schema.json");
    let stream_path = dir.path().join("stream.bin");
    let output_path = dir.path().join("decoded.json");

    fs::write(&schema_path, schema_json()).unwrap();
    fs::write(&stream_path, [0x02u8, 0x0A]).unwrap(); // wrong version byte

    Command::cargo_bin("framecodec")
        .unwrap()
        .args([
            "decode",
            "--schema",
            schema_path.to_str().unwrap(),
            stream_path.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ])
        .assert()
        .failure();
}
