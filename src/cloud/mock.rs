use super::{AnnotationKind, AnnotationRequest, AnnotationResult, AnnotationService, SpeechService};
use crate::error::Endpoint;
use crate::models::{DetectedObject, Label, SpeechRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Failure a mock should answer with instead of a result.
#[derive(Debug, Clone)]
struct MockFailure {
    status: u16,
    body: Vec<u8>,
}

impl MockFailure {
    fn to_error(&self, endpoint: Endpoint) -> Error {
        Error::RemoteService {
            endpoint,
            status: Some(self.status),
            body: self.body.clone(),
        }
    }
}

/// Answers each annotation kind from a canned value; unset kinds come back empty.
pub struct MockAnnotationClient {
    labels: Vec<Label>,
    objects: Vec<DetectedObject>,
    text: Option<String>,
    failure: Option<MockFailure>,
    requests: Arc<Mutex<Vec<AnnotationKind>>>,
}

impl MockAnnotationClient {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            objects: Vec::new(),
            text: None,
            failure: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_objects(mut self, objects: Vec<DetectedObject>) -> Self {
        self.objects = objects;
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_failure(mut self, status: u16, body: &str) -> Self {
        self.failure = Some(MockFailure {
            status,
            body: body.as_bytes().to_vec(),
        });
        self
    }

    /// Handle onto the recorded request kinds, usable after the mock is boxed.
    pub fn requests(&self) -> Arc<Mutex<Vec<AnnotationKind>>> {
        Arc::clone(&self.requests)
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockAnnotationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnnotationService for MockAnnotationClient {
    async fn annotate(&self, request: &AnnotationRequest) -> Result<AnnotationResult> {
        self.requests.lock().unwrap().push(request.kind);

        if let Some(failure) = &self.failure {
            return Err(failure.to_error(Endpoint::Vision));
        }

        Ok(match request.kind {
            AnnotationKind::SceneLabels { max_results } => AnnotationResult::Labels(
                self.labels.iter().take(max_results as usize).cloned().collect(),
            ),
            AnnotationKind::ObjectLocalization { max_results } => AnnotationResult::Objects(
                self.objects.iter().take(max_results as usize).cloned().collect(),
            ),
            AnnotationKind::TextDetection => AnnotationResult::Text(self.text.clone()),
        })
    }
}

pub struct MockSpeechClient {
    audio: Option<Vec<u8>>,
    failure: Option<MockFailure>,
    requests: Arc<Mutex<Vec<SpeechRequest>>>,
}

impl MockSpeechClient {
    /// Mock that returns a short fake MP3 header for every request.
    pub fn new() -> Self {
        Self {
            audio: Some(vec![0x49, 0x44, 0x33, 0x04, 0x00]),
            failure: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_audio(mut self, audio: Option<Vec<u8>>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_failure(mut self, status: u16, body: &str) -> Self {
        self.failure = Some(MockFailure {
            status,
            body: body.as_bytes().to_vec(),
        });
        self
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<SpeechRequest>>> {
        Arc::clone(&self.requests)
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockSpeechClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechService for MockSpeechClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Option<Vec<u8>>> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(failure) = &self.failure {
            return Err(failure.to_error(Endpoint::Speech));
        }

        Ok(self.audio.clone())
    }
}
