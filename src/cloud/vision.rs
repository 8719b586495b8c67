use super::http::GoogleApiClient;
use super::types::{
    AnnotateImageRequest, AnnotateImageResponse, AnnotateRequest, AnnotateResponse, Feature,
    FeatureType, ImageContent,
};
use super::AnnotationService;
use crate::error::Endpoint;
use crate::image::ImageAsset;
use crate::models::{BoundingRegion, DetectedObject, Label, Vertex};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// The single annotation feature a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    SceneLabels { max_results: u32 },
    ObjectLocalization { max_results: u32 },
    TextDetection,
}

impl AnnotationKind {
    fn feature(&self) -> Feature {
        match *self {
            AnnotationKind::SceneLabels { max_results } => Feature {
                feature_type: FeatureType::LabelDetection,
                max_results: Some(max_results),
            },
            AnnotationKind::ObjectLocalization { max_results } => Feature {
                feature_type: FeatureType::ObjectLocalization,
                max_results: Some(max_results),
            },
            AnnotationKind::TextDetection => Feature {
                feature_type: FeatureType::TextDetection,
                max_results: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnnotationRequest {
    pub kind: AnnotationKind,
    /// Base64 of the canonical image bytes.
    pub content: String,
}

impl AnnotationRequest {
    pub fn new(asset: &ImageAsset, kind: AnnotationKind) -> Self {
        Self {
            kind,
            content: asset.to_base64(),
        }
    }

    fn to_wire(&self) -> AnnotateRequest {
        AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: self.content.clone(),
                },
                features: vec![self.kind.feature()],
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationResult {
    Labels(Vec<Label>),
    Objects(Vec<DetectedObject>),
    Text(Option<String>),
}

impl AnnotationResult {
    /// Reads only the response field that matches `kind`.
    fn from_response(kind: AnnotationKind, response: AnnotateImageResponse) -> Self {
        match kind {
            AnnotationKind::SceneLabels { .. } => AnnotationResult::Labels(
                response
                    .label_annotations
                    .into_iter()
                    .map(|a| Label {
                        description: a.description,
                        score: a.score,
                    })
                    .collect(),
            ),
            AnnotationKind::ObjectLocalization { .. } => AnnotationResult::Objects(
                response
                    .localized_object_annotations
                    .into_iter()
                    .map(|a| DetectedObject {
                        name: a.name,
                        score: a.score,
                        region: BoundingRegion {
                            vertices: a
                                .bounding_poly
                                .normalized_vertices
                                .into_iter()
                                .map(|v| Vertex { x: v.x, y: v.y })
                                .collect(),
                        },
                    })
                    .collect(),
            ),
            // The first entry is the whole-image text block.
            AnnotationKind::TextDetection => AnnotationResult::Text(
                response
                    .text_annotations
                    .into_iter()
                    .next()
                    .map(|a| a.description)
                    .filter(|text| !text.trim().is_empty()),
            ),
        }
    }
}

pub struct CloudVisionClient {
    http: GoogleApiClient,
    url: String,
}

impl CloudVisionClient {
    pub fn new(api_key: String, url: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, url, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        url: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GoogleApiClient::new_with_client(api_key, timeout, client),
            url,
        }
    }
}

#[async_trait]
impl AnnotationService for CloudVisionClient {
    async fn annotate(&self, request: &AnnotationRequest) -> Result<AnnotationResult> {
        tracing::debug!(
            "Annotating image ({} base64 chars) with {:?}",
            request.content.len(),
            request.kind
        );

        let response: AnnotateResponse = self
            .http
            .post_json(Endpoint::Vision, &self.url, &request.to_wire())
            .await?;

        let first = response.responses.into_iter().next().unwrap_or_default();

        if let Some(status) = &first.error {
            if status.code != 0 {
                tracing::error!(
                    "Vision annotation error (code {}): {}",
                    status.code,
                    status.message
                );
                return Err(Error::Annotation {
                    code: status.code,
                    message: status.message.clone(),
                });
            }
        }

        Ok(AnnotationResult::from_response(request.kind, first))
    }
}
