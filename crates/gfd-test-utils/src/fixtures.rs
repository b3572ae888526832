//! Response bodies shaped like the GitLab repository API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Base64 body of `settings.json` in the public test project.
pub const SETTINGS_JSON_BASE64: &str =
    "ewogICAgImZydWl0IjogIkFwcGxlIiwKICAgICJzaXplIjogIkxhcmdlIiwKICAgICJjb2xvciI6ICJSZWQiCn0K";

/// SHA-256 of the decoded `settings.json`.
pub const SETTINGS_JSON_SHA256: &str =
    "3de0a34a2cd8d60061f9ac2feda73053b0b8de80995d3fd167c2c225f73817a4";

/// Decoded bytes of `settings.json`.
pub fn settings_json_bytes() -> Vec<u8> {
    STANDARD
        .decode(SETTINGS_JSON_BASE64)
        .expect("fixture is valid base64")
}

/// File envelope for `content`, with the digest a well-behaved server reports.
pub fn file_envelope(remote_path: &str, content: &[u8]) -> String {
    file_envelope_with_digest(remote_path, content, &gfd_fs::digest_bytes(content))
}

/// File envelope for `content` with an arbitrary `content_sha256`.
pub fn file_envelope_with_digest(remote_path: &str, content: &[u8], digest: &str) -> String {
    raw_file_envelope(remote_path, &STANDARD.encode(content), digest)
}

/// File envelope with a verbatim `content` string, e.g. invalid base64.
pub fn raw_file_envelope(remote_path: &str, content: &str, digest: &str) -> String {
    let file_name = remote_path.rsplit('/').next().unwrap_or(remote_path);
    serde_json::json!({
        "file_name": file_name,
        "file_path": remote_path,
        "size": content.len(),
        "encoding": "base64",
        "content_sha256": digest,
        "ref": "master",
        "blob_id": "79f7bbd25901e8334750839545a9bd021f0e4c83",
        "last_commit_id": "570e7b2abdd848b95f2f578043fc23bd6f6fd24d",
        "content": content,
    })
    .to_string()
}

/// Tree listing body from `(path, type)` pairs, in the given order.
pub fn tree_listing(entries: &[(&str, &str)]) -> String {
    let items: Vec<_> = entries
        .iter()
        .enumerate()
        .map(|(i, (path, kind))| {
            let name = path.rsplit('/').next().unwrap_or(path);
            let mode = if *kind == "tree" { "040000" } else { "100644" };
            serde_json::json!({
                "id": format!("{:040x}", i + 1),
                "name": name,
                "type": kind,
                "path": path,
                "mode": mode,
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}
