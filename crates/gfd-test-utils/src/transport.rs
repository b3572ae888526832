//! In-memory [`Transport`] for deterministic sync tests.
//!
//! Responses are keyed by a URL fragment. The most recently registered route
//! whose fragment occurs in the request URL wins, so a test can register a
//! general reply and then override one path.

use std::cell::RefCell;

use gfd_api::{ApiRequest, HttpResponse, Transport, encode_component};

use crate::fixtures;

enum Reply {
    Response(HttpResponse),
    TransportFailure(String),
}

/// One request the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub url: String,
    pub user_agent: String,
}

/// Scripted transport answering from registered routes.
///
/// Unmatched requests get a GitLab-style `404 File Not Found`.
#[derive(Default)]
pub struct FakeTransport {
    routes: RefCell<Vec<(String, Reply)>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for the file at `remote_path`, with a correct digest.
    pub fn serve_file(&self, remote_path: &str, content: &[u8]) -> &Self {
        self.serve_file_record(remote_path, fixtures::file_envelope(remote_path, content))
    }

    /// Serve a verbatim file envelope body for `remote_path`.
    pub fn serve_file_record(&self, remote_path: &str, body: impl Into<String>) -> &Self {
        let body: String = body.into();
        self.route(
            file_fragment(remote_path),
            Reply::Response(HttpResponse::ok(body.into_bytes())),
        )
    }

    /// Serve a single-page tree listing for `folder`.
    pub fn serve_tree(&self, folder: &str, entries: &[(&str, &str)]) -> &Self {
        let body = fixtures::tree_listing(entries);
        self.route(
            tree_fragment(folder),
            Reply::Response(HttpResponse::ok(body.into_bytes())),
        )
    }

    /// Answer URLs containing `fragment` with `status` and a JSON message.
    pub fn respond_status(
        &self,
        fragment: &str,
        status: u16,
        status_text: &str,
        message: &str,
    ) -> &Self {
        let body = serde_json::json!({ "message": message }).to_string();
        self.route(
            fragment.to_string(),
            Reply::Response(HttpResponse::with_status(status, status_text, body.into_bytes())),
        )
    }

    /// Fail URLs containing `fragment` as if no response arrived.
    pub fn fail(&self, fragment: &str, message: &str) -> &Self {
        self.route(fragment.to_string(), Reply::TransportFailure(message.to_string()))
    }

    /// Answer the file request for `remote_path` with `status`.
    pub fn fail_file(&self, remote_path: &str, status: u16, status_text: &str) -> &Self {
        let fragment = file_fragment(remote_path);
        self.respond_status(&fragment, status, status_text, &format!("{status} {status_text}"))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// URLs requested so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.url.clone()).collect()
    }

    fn route(&self, fragment: String, reply: Reply) -> &Self {
        self.routes.borrow_mut().push((fragment, reply));
        self
    }
}

impl Transport for FakeTransport {
    fn get(&self, request: &ApiRequest) -> gfd_api::Result<HttpResponse> {
        self.calls.borrow_mut().push(RecordedCall {
            url: request.url.clone(),
            user_agent: request.user_agent.clone(),
        });

        let routes = self.routes.borrow();
        let matched = routes
            .iter()
            .rev()
            .find(|(fragment, _)| request.url.contains(fragment.as_str()));

        match matched {
            Some((_, Reply::Response(response))) => Ok(response.clone()),
            Some((_, Reply::TransportFailure(message))) => {
                Err(gfd_api::Error::transport(&request.url, message))
            }
            None => Ok(HttpResponse::with_status(
                404,
                "Not Found",
                br#"{"message":"404 File Not Found"}"#.to_vec(),
            )),
        }
    }
}

/// URL fragment identifying the files endpoint for `remote_path`.
pub fn file_fragment(remote_path: &str) -> String {
    format!("/repository/files/{}?", encode_component(remote_path))
}

/// URL fragment identifying the tree endpoint for `folder`.
pub fn tree_fragment(folder: &str) -> String {
    format!("&path={}&", encode_component(folder))
}
