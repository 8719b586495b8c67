//! Shared wiremock helpers for the cloud client tests.

use wiremock::matchers::{method, path};
use wiremock::{MockBuilder, MockServer};

pub const ANNOTATE_PATH: &str = "/v1/images:annotate";
pub const SYNTHESIZE_PATH: &str = "/v1/text:synthesize";

pub fn post_path(p: &str) -> MockBuilder {
    wiremock::Mock::given(method("POST")).and(path(p))
}

pub fn annotate_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), ANNOTATE_PATH)
}

pub fn synthesize_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), SYNTHESIZE_PATH)
}
