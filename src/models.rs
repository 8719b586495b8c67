//! Data models and structures
//!
//! Defines the domain values returned to the presentation layer, the speech
//! voice selection, and the environment-backed configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";
pub const DEFAULT_SPEECH_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
pub const DEFAULT_MAX_RESULTS: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Scene label with its confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub description: String,
    pub score: f32,
}

/// Normalized (0.0..=1.0) polygon corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    pub vertices: Vec<Vertex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub name: String,
    pub score: f32,
    pub region: BoundingRegion,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SsmlGender {
    #[default]
    Neutral,
    Male,
    Female,
    SsmlVoiceGenderUnspecified,
}

impl FromStr for SsmlGender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NEUTRAL" => Ok(Self::Neutral),
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            "SSML_VOICE_GENDER_UNSPECIFIED" => Ok(Self::SsmlVoiceGenderUnspecified),
            other => Err(Error::Config(format!("Unknown voice gender '{}'", other))),
        }
    }
}

/// Output encoding requested from the speech service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    #[default]
    Mp3,
    Linear16,
    OggOpus,
    Mulaw,
    Alaw,
}

impl AudioEncoding {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Linear16 | Self::Mulaw | Self::Alaw => "audio/wav",
            Self::OggOpus => "audio/ogg",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Linear16 | Self::Mulaw | Self::Alaw => "wav",
            Self::OggOpus => "ogg",
        }
    }
}

impl FromStr for AudioEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MP3" => Ok(Self::Mp3),
            "LINEAR16" => Ok(Self::Linear16),
            "OGG_OPUS" => Ok(Self::OggOpus),
            "MULAW" => Ok(Self::Mulaw),
            "ALAW" => Ok(Self::Alaw),
            other => Err(Error::Config(format!("Unknown audio encoding '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub language_code: String,
    pub ssml_gender: SsmlGender,
    pub audio_encoding: AudioEncoding,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language_code: "en-US".to_string(),
            ssml_gender: SsmlGender::Neutral,
            audio_encoding: AudioEncoding::Mp3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: VoiceConfig,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub vision_endpoint: String,
    pub speech_endpoint: String,
    pub voice: VoiceConfig,
    pub max_results: u32,
    pub request_timeout: Duration,
    pub guidance_rules_path: Option<PathBuf>,
}

impl Config {
    /// Configuration with default endpoints and voice for the given key.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            vision_endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            speech_endpoint: DEFAULT_SPEECH_ENDPOINT.to_string(),
            voice: VoiceConfig::default(),
            max_results: DEFAULT_MAX_RESULTS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            guidance_rules_path: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GOOGLE_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("GOOGLE_API_KEY not set".to_string()))?;

        let mut config = Self::new(api_key);

        if let Some(url) = lookup("VISION_ENDPOINT") {
            config.vision_endpoint = url;
        }
        if let Some(url) = lookup("SPEECH_ENDPOINT") {
            config.speech_endpoint = url;
        }
        if let Some(code) = lookup("SPEECH_LANGUAGE_CODE") {
            config.voice.language_code = code;
        }
        if let Some(gender) = lookup("SPEECH_VOICE_GENDER") {
            config.voice.ssml_gender = gender.parse()?;
        }
        if let Some(encoding) = lookup("SPEECH_AUDIO_ENCODING") {
            config.voice.audio_encoding = encoding.parse()?;
        }
        if let Some(max) = lookup("VISION_MAX_RESULTS") {
            config.max_results = max
                .trim()
                .parse()
                .ok()
                .filter(|n: &u32| *n > 0)
                .ok_or_else(|| {
                    Error::Config(format!(
                        "VISION_MAX_RESULTS must be a positive integer, got '{}'",
                        max
                    ))
                })?;
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!("REQUEST_TIMEOUT_SECS must be an integer, got '{}'", secs))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        config.guidance_rules_path = lookup("GUIDANCE_RULES_PATH").map(PathBuf::from);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "abc")])).unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.vision_endpoint, DEFAULT_VISION_ENDPOINT);
        assert_eq!(config.speech_endpoint, DEFAULT_SPEECH_ENDPOINT);
        assert_eq!(config.voice, VoiceConfig::default());
        assert_eq!(config.max_results, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.guidance_rules_path.is_none());
    }

    #[test]
    fn test_config_requires_key() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "abc"),
            ("SPEECH_LANGUAGE_CODE", "de-DE"),
            ("SPEECH_VOICE_GENDER", "female"),
            ("SPEECH_AUDIO_ENCODING", "ogg_opus"),
            ("VISION_MAX_RESULTS", "5"),
            ("REQUEST_TIMEOUT_SECS", "3"),
            ("GUIDANCE_RULES_PATH", "rules.json"),
        ]))
        .unwrap();

        assert_eq!(config.voice.language_code, "de-DE");
        assert_eq!(config.voice.ssml_gender, SsmlGender::Female);
        assert_eq!(config.voice.audio_encoding, AudioEncoding::OggOpus);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.guidance_rules_path, Some(PathBuf::from("rules.json")));
    }

    #[test]
    fn test_config_rejects_bad_numbers() {
        let err = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "abc"),
            ("VISION_MAX_RESULTS", "ten"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("VISION_MAX_RESULTS"));

        let err = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "abc"),
            ("VISION_MAX_RESULTS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_voice_serialization() {
        let json = serde_json::to_string(&VoiceConfig::default()).unwrap();
        assert!(json.contains("\"NEUTRAL\""));
        assert!(json.contains("\"MP3\""));

        let json = serde_json::to_string(&AudioEncoding::OggOpus).unwrap();
        assert_eq!(json, "\"OGG_OPUS\"");
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        assert!("FLAC".parse::<AudioEncoding>().is_err());
        assert_eq!("linear16".parse::<AudioEncoding>().unwrap(), AudioEncoding::Linear16);
    }
}
