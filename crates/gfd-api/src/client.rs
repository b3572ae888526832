//! Repository client for the two read endpoints the downloader consumes

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use secrecy::SecretString;

use crate::models::{RemoteFileRecord, RemoteFolderEntry};
use crate::transport::{ApiRequest, HttpResponse, Transport};
use crate::{Error, Result};

/// Characters left as-is when escaping a path or query component.
///
/// Everything else, `/` included, is percent-encoded so a nested file path
/// stays a single URL segment.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Entries requested per page of a tree listing.
pub const TREE_PAGE_SIZE: u32 = 100;

/// Upper bound on followed pages, guarding against a server that never
/// stops advertising a next page.
const MAX_TREE_PAGES: u32 = 10_000;

/// Default `User-Agent` sent with every request.
pub fn default_user_agent() -> String {
    format!("gitlab-file-downloader/{}", env!("CARGO_PKG_VERSION"))
}

/// Escape a single path segment or query value.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Where and as whom the client talks to the API.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// API v4 base, e.g. `https://gitlab.example.com/api/v4`
    pub base_url: String,
    /// Numeric project id or `namespace/project` path
    pub project: String,
    pub token: SecretString,
    pub user_agent: String,
}

impl Endpoint {
    pub fn new(
        base_url: impl Into<String>,
        project: impl Into<String>,
        token: SecretString,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            project: project.into(),
            token,
            user_agent: default_user_agent(),
        }
    }

    fn project_root(&self) -> String {
        format!(
            "{}/projects/{}/repository",
            self.base_url.trim_end_matches('/'),
            encode_component(&self.project)
        )
    }
}

/// Read-only client for the repository files and tree endpoints.
pub struct RepositoryClient<T: Transport> {
    transport: T,
    endpoint: Endpoint,
}

impl<T: Transport> RepositoryClient<T> {
    pub fn new(transport: T, endpoint: Endpoint) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL of the files endpoint for `path` at `branch`.
    pub fn file_url(&self, path: &str, branch: &str) -> String {
        format!(
            "{}/files/{}?ref={}",
            self.endpoint.project_root(),
            encode_component(path),
            encode_component(branch)
        )
    }

    /// URL of one page of the tree endpoint for `folder` at `branch`.
    pub fn tree_url(&self, folder: &str, branch: &str, page: u32) -> String {
        format!(
            "{}/tree/?ref={}&path={}&per_page={}&page={}",
            self.endpoint.project_root(),
            encode_component(branch),
            encode_component(folder),
            TREE_PAGE_SIZE,
            page
        )
    }

    /// Fetch a single file with its server-side digest.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if no response was received
    /// - [`Error::Api`] for a non-success status
    /// - [`Error::Decode`] if the body is not a file envelope
    pub fn get_file(&self, path: &str, branch: &str) -> Result<RemoteFileRecord> {
        if path.is_empty() {
            return Err(Error::InvalidRequest {
                message: "remote file path is empty".to_string(),
            });
        }
        let url = self.file_url(path, branch);
        let response = self.fetch(url)?;
        RemoteFileRecord::from_json(&response.body)
    }

    /// List the direct children of `folder`, in the order the server returns
    /// them. Paginated listings are followed via the `X-Next-Page` header.
    pub fn list_folder(&self, folder: &str, branch: &str) -> Result<Vec<RemoteFolderEntry>> {
        let mut entries = Vec::new();
        let mut page = 1;

        loop {
            let url = self.tree_url(folder, branch, page);
            let response = self.fetch(url)?;
            entries.extend(RemoteFolderEntry::list_from_json(&response.body)?);

            match next_page(&response) {
                Some(next) if next > page && next <= MAX_TREE_PAGES => page = next,
                _ => break,
            }
        }

        tracing::debug!(folder, count = entries.len(), "Listed remote folder");
        Ok(entries)
    }

    fn fetch(&self, url: String) -> Result<HttpResponse> {
        tracing::debug!(%url, "GET");
        let request = ApiRequest {
            url,
            token: self.endpoint.token.clone(),
            user_agent: self.endpoint.user_agent.clone(),
        };

        let response = self.transport.get(&request)?;
        if !response.is_success() {
            return Err(Error::Api {
                url: request.url,
                status_code: response.status,
                status_text: response.status_text.clone(),
                message: error_message(&response.body),
            });
        }
        Ok(response)
    }
}

fn next_page(response: &HttpResponse) -> Option<u32> {
    response
        .header("x-next-page")
        .and_then(|v| v.trim().parse().ok())
}

/// Extract the `message` of a GitLab JSON error body.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("settings.json", "settings.json")]
    #[case("src/main.go", "src%2Fmain.go")]
    #[case("docs/read me.md", "docs%2Fread%20me.md")]
    #[case("feature/x+y", "feature%2Fx%2By")]
    #[case("a~b_c-d.e", "a~b_c-d.e")]
    fn test_encode_component(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(encode_component(input), expected);
    }

    #[test]
    fn error_message_from_json_body() {
        assert_eq!(
            error_message(br#"{"message":"404 File Not Found"}"#),
            Some("404 File Not Found".to_string())
        );
        assert_eq!(
            error_message(br#"{"message":{"ref":["is missing"]}}"#),
            Some(r#"{"ref":["is missing"]}"#.to_string())
        );
        assert_eq!(error_message(b"<html>bad gateway</html>"), None);
    }
}
