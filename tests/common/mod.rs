//! Shared fixtures for the integration tests: archive builders and mocks of
//! the contents API and the download host.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::json;
use tar::{Builder, EntryType, Header};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const METADATA_PATH: &str =
    "/repos/opencybersecurityalliance/data-bucket-kestrel/contents/elasticsearch/sample.tar.gz";
pub const DOWNLOAD_PATH: &str = "/raw/sample.tar.gz";

pub const SAMPLE_MAPPING: &str = r#"{"sample": {"mappings": {"properties": {"process": {"properties": {"parent": {"properties": {"command_line": {"fields": {"keyword": {"ignore_above": 256}}}}}, "command_line": {"fields": {"keyword": {"ignore_above": 256}}}}}}}}}"#;

/// `SAMPLE_MAPPING` with both limits raised to 1024.
pub fn patched_sample_mapping() -> serde_json::Value {
    let mut expected: serde_json::Value = serde_json::from_str(SAMPLE_MAPPING).unwrap();
    let process = &mut expected["sample"]["mappings"]["properties"]["process"]["properties"];
    process["parent"]["properties"]["command_line"]["fields"]["keyword"]["ignore_above"] =
        json!(1024);
    process["command_line"]["fields"]["keyword"]["ignore_above"] = json!(1024);
    expected
}

pub fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, data) in files {
        let mut header = Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(EntryType::Regular);
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

pub async fn mount_metadata(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(METADATA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "sample.tar.gz",
            "path": "elasticsearch/sample.tar.gz",
            "size": 1234,
            "type": "file",
            "download_url": format!("{}{DOWNLOAD_PATH}", server.uri())
        })))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_download(server: &MockServer, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(DOWNLOAD_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/octet-stream")
                .set_body_bytes(body),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Download mock that fails the test if the download is ever requested.
pub async fn forbid_download(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(DOWNLOAD_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}
