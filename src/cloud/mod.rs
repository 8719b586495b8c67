//! Cloud service integration for image annotation and speech synthesis
//!
//! Provides interfaces to Google's Cloud Vision `images:annotate` and
//! Text-to-Speech `text:synthesize` REST endpoints, plus in-memory mocks.

pub mod http;
pub mod mock;
pub mod speech;
pub mod types;
pub mod vision;

#[cfg(test)]
pub(crate) mod test_support;

pub use http::GoogleApiClient;
pub use mock::{MockAnnotationClient, MockSpeechClient};
pub use speech::CloudSpeechClient;
pub use vision::{AnnotationKind, AnnotationRequest, AnnotationResult, CloudVisionClient};

use crate::models::SpeechRequest;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AnnotationService: Send + Sync {
    /// Runs exactly one annotation feature; the result variant mirrors `request.kind`.
    async fn annotate(&self, request: &AnnotationRequest) -> Result<AnnotationResult>;
}

#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Returns `None` when the service answered successfully without audio.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Option<Vec<u8>>>;
}
