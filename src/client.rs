//! Orchestration of one user action against the cloud services.
//!
//! Each [`Command`] encodes the upload once, issues at most one annotation
//! call and, for read-aloud, one dependent speech call.

use crate::cloud::{
    AnnotationKind, AnnotationRequest, AnnotationResult, AnnotationService, CloudSpeechClient,
    CloudVisionClient, SpeechService,
};
use crate::guidance::{classify_guidance, Guidance, GuidanceRules};
use crate::image::{self as imaging, ImageAsset};
use crate::models::{AudioEncoding, Config, DetectedObject, Label, SpeechRequest, VoiceConfig};
use crate::Result;
use tracing::info;

/// One action a user can trigger from the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    DescribeScene,
    DetectObjects,
    ReadAloud,
    Guidance,
}

/// A successful call that found nothing to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyResult {
    NoLabels,
    NoObjects,
    NoText,
    /// Text was found but the speech service returned no audio.
    NoAudio { text: String },
}

impl EmptyResult {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyResult::NoLabels => "No scene description could be generated.",
            EmptyResult::NoObjects => "No objects or obstacles detected.",
            EmptyResult::NoText => "No text found in the image.",
            EmptyResult::NoAudio { .. } => {
                "No audio content received from the Text-to-Speech API."
            }
        }
    }
}

/// Display-ready outcome of a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutput {
    SceneDescription(Vec<String>),
    Objects(Vec<DetectedObject>),
    Speech {
        text: String,
        audio: Vec<u8>,
        encoding: AudioEncoding,
    },
    Guidance {
        text: String,
        guidance: Guidance,
    },
    Empty(EmptyResult),
}

/// Injectable service bundle used to construct [`VisionClient`] in tests/harnesses.
pub struct VisionServices {
    pub annotator: Box<dyn AnnotationService>,
    pub speech: Box<dyn SpeechService>,
}

pub struct VisionClient {
    annotator: Box<dyn AnnotationService>,
    speech: Box<dyn SpeechService>,
    voice: VoiceConfig,
    max_results: u32,
    rules: GuidanceRules,
}

impl VisionClient {
    pub fn with_services(
        services: VisionServices,
        voice: VoiceConfig,
        max_results: u32,
        rules: GuidanceRules,
    ) -> Self {
        Self {
            annotator: services.annotator,
            speech: services.speech,
            voice,
            max_results,
            rules,
        }
    }

    /// Build the cloud-backed client, loading custom guidance rules if configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        // Reuse one HTTP connection pool across both endpoints.
        let http_client = reqwest::Client::new();

        let annotator = Box::new(CloudVisionClient::new_with_client(
            config.api_key.clone(),
            config.vision_endpoint.clone(),
            config.request_timeout,
            http_client.clone(),
        ));
        let speech = Box::new(CloudSpeechClient::new_with_client(
            config.api_key.clone(),
            config.speech_endpoint.clone(),
            config.request_timeout,
            http_client,
        ));

        let rules = match &config.guidance_rules_path {
            Some(path) => GuidanceRules::from_file(path)?,
            None => GuidanceRules::default(),
        };

        info!(
            "Vision endpoint: {}, speech endpoint: {}",
            config.vision_endpoint, config.speech_endpoint
        );

        Ok(Self::with_services(
            VisionServices { annotator, speech },
            config.voice.clone(),
            config.max_results,
            rules,
        ))
    }

    pub fn voice(&self) -> &VoiceConfig {
        &self.voice
    }

    pub fn rules(&self) -> &GuidanceRules {
        &self.rules
    }

    pub fn encode(&self, image: &[u8]) -> Result<ImageAsset> {
        imaging::encode(image)
    }

    pub async fn detect_labels(&self, asset: &ImageAsset, max_results: u32) -> Result<Vec<Label>> {
        let request = AnnotationRequest::new(asset, AnnotationKind::SceneLabels { max_results });
        match self.annotator.annotate(&request).await? {
            AnnotationResult::Labels(labels) => {
                info!("Detected {} labels", labels.len());
                Ok(labels)
            }
            other => Err(mismatched(request.kind, &other)),
        }
    }

    pub async fn detect_objects(
        &self,
        asset: &ImageAsset,
        max_results: u32,
    ) -> Result<Vec<DetectedObject>> {
        let request =
            AnnotationRequest::new(asset, AnnotationKind::ObjectLocalization { max_results });
        match self.annotator.annotate(&request).await? {
            AnnotationResult::Objects(objects) => {
                info!("Detected {} objects", objects.len());
                Ok(objects)
            }
            other => Err(mismatched(request.kind, &other)),
        }
    }

    pub async fn detect_text(&self, asset: &ImageAsset) -> Result<Option<String>> {
        let request = AnnotationRequest::new(asset, AnnotationKind::TextDetection);
        match self.annotator.annotate(&request).await? {
            AnnotationResult::Text(text) => {
                info!(
                    "Text detection found {} chars",
                    text.as_deref().map_or(0, |t| t.chars().count())
                );
                Ok(text)
            }
            other => Err(mismatched(request.kind, &other)),
        }
    }

    pub async fn synthesize_speech(
        &self,
        text: &str,
        voice: &VoiceConfig,
    ) -> Result<Option<Vec<u8>>> {
        let request = SpeechRequest {
            text: text.to_string(),
            voice: voice.clone(),
        };
        self.speech.synthesize(&request).await
    }

    pub fn classify_guidance(&self, text: &str) -> Guidance {
        classify_guidance(text, &self.rules)
    }

    /// Encode the upload and dispatch `command` to the matching operation.
    pub async fn run(&self, command: Command, image: &[u8]) -> Result<ActionOutput> {
        let asset = self.encode(image)?;
        let (width, height) = asset.dimensions();
        info!("Running {:?} on {}x{} image", command, width, height);

        match command {
            Command::DescribeScene => {
                let labels = self.detect_labels(&asset, self.max_results).await?;
                if labels.is_empty() {
                    return Ok(ActionOutput::Empty(EmptyResult::NoLabels));
                }
                Ok(ActionOutput::SceneDescription(
                    labels.into_iter().map(|l| l.description).collect(),
                ))
            }
            Command::DetectObjects => {
                let objects = self.detect_objects(&asset, self.max_results).await?;
                if objects.is_empty() {
                    return Ok(ActionOutput::Empty(EmptyResult::NoObjects));
                }
                Ok(ActionOutput::Objects(objects))
            }
            Command::ReadAloud => {
                let Some(text) = self.detect_text(&asset).await? else {
                    return Ok(ActionOutput::Empty(EmptyResult::NoText));
                };
                match self.synthesize_speech(&text, &self.voice).await? {
                    Some(audio) => Ok(ActionOutput::Speech {
                        text,
                        audio,
                        encoding: self.voice.audio_encoding,
                    }),
                    None => Ok(ActionOutput::Empty(EmptyResult::NoAudio { text })),
                }
            }
            Command::Guidance => {
                let Some(text) = self.detect_text(&asset).await? else {
                    return Ok(ActionOutput::Empty(EmptyResult::NoText));
                };
                let guidance = self.classify_guidance(&text);
                Ok(ActionOutput::Guidance { text, guidance })
            }
        }
    }
}

fn mismatched(kind: AnnotationKind, result: &AnnotationResult) -> crate::Error {
    crate::Error::Invariant(format!(
        "Annotation service answered {:?} with {:?}",
        kind, result
    ))
}
