//! Wire payloads for the Vision and Text-to-Speech REST APIs.

use crate::models::{AudioEncoding, SsmlGender};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

/// Base64 image payload.
#[derive(Debug, Serialize)]
pub struct ImageContent {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    LabelDetection,
    ObjectLocalization,
    TextDetection,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

/// One entry per requested image. Absent arrays mean "nothing found".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    #[serde(default)]
    pub label_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    pub localized_object_annotations: Vec<LocalizedObjectAnnotation>,
    #[serde(default)]
    pub text_annotations: Vec<EntityAnnotation>,
    pub error: Option<Status>,
}

#[derive(Debug, Deserialize)]
pub struct EntityAnnotation {
    #[serde(default)]
    pub description: String,
    // Text annotations carry no score.
    #[serde(default)]
    pub score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedObjectAnnotation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingPoly {
    #[serde(default)]
    pub normalized_vertices: Vec<NormalizedVertex>,
}

/// Zero coordinates are omitted by the service.
#[derive(Debug, Default, Deserialize)]
pub struct NormalizedVertex {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

#[derive(Debug, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelectionParams,
    pub audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
pub struct SynthesisInput {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelectionParams {
    pub language_code: String,
    pub ssml_gender: SsmlGender,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: AudioEncoding,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeResponse {
    pub audio_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_detection_feature_omits_max_results() {
        let request = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: "AAAA".to_string(),
                },
                features: vec![Feature {
                    feature_type: FeatureType::TextDetection,
                    max_results: None,
                }],
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "requests": [{
                    "image": { "content": "AAAA" },
                    "features": [{ "type": "TEXT_DETECTION" }]
                }]
            })
        );
    }

    #[test]
    fn test_synthesize_request_shape() {
        let request = SynthesizeRequest {
            input: SynthesisInput {
                text: "hello".to_string(),
            },
            voice: VoiceSelectionParams {
                language_code: "en-US".to_string(),
                ssml_gender: SsmlGender::Neutral,
            },
            audio_config: AudioConfig {
                audio_encoding: AudioEncoding::Mp3,
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "input": { "text": "hello" },
                "voice": { "languageCode": "en-US", "ssmlGender": "NEUTRAL" },
                "audioConfig": { "audioEncoding": "MP3" }
            })
        );
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: AnnotateResponse = serde_json::from_value(serde_json::json!({
            "responses": [{
                "localizedObjectAnnotations": [{
                    "name": "Chair",
                    "score": 0.9,
                    "boundingPoly": { "normalizedVertices": [{}, { "x": 0.5 }, { "x": 0.5, "y": 1.0 }] }
                }]
            }]
        }))
        .unwrap();

        let first = &response.responses[0];
        assert!(first.label_annotations.is_empty());
        assert!(first.text_annotations.is_empty());
        assert!(first.error.is_none());

        let vertices = &first.localized_object_annotations[0]
            .bounding_poly
            .normalized_vertices;
        assert_eq!(vertices.len(), 3);
        assert_eq!((vertices[0].x, vertices[0].y), (0.0, 0.0));
        assert_eq!((vertices[1].x, vertices[1].y), (0.5, 0.0));
    }
}
