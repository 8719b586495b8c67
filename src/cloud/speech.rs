use super::http::GoogleApiClient;
use super::types::{
    AudioConfig, SynthesisInput, SynthesizeRequest, SynthesizeResponse, VoiceSelectionParams,
};
use super::SpeechService;
use crate::error::Endpoint;
use crate::models::SpeechRequest;
use crate::Result;
use async_trait::async_trait;
use base64::Engine as _;
use std::time::Duration;

pub struct CloudSpeechClient {
    http: GoogleApiClient,
    url: String,
}

impl CloudSpeechClient {
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
impl SpeechService for CloudSpeechClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Option<Vec<u8>>> {
        tracing::debug!(
            "Synthesizing {} chars of speech ({}, {:?})",
            request.text.chars().count(),
            request.voice.language_code,
            request.voice.audio_encoding
        );

        let body = SynthesizeRequest {
            input: SynthesisInput {
                text: request.text.clone(),
            },
            voice: VoiceSelectionParams {
                language_code: request.voice.language_code.clone(),
                ssml_gender: request.voice.ssml_gender,
            },
            audio_config: AudioConfig {
                audio_encoding: request.voice.audio_encoding,
            },
        };

        let response: SynthesizeResponse = self
            .http
            .post_json(Endpoint::Speech, &self.url, &body)
            .await?;

        match response.audio_content.filter(|c| !c.is_empty()) {
            Some(content) => {
                let audio = base64::engine::general_purpose::STANDARD.decode(content)?;
                tracing::info!("Received {} bytes of audio", audio.len());
                Ok(Some(audio))
            }
            None => {
                tracing::warn!("Text-to-Speech response carried no audio content");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::test_support;
    use crate::models::{AudioEncoding, SsmlGender, VoiceConfig};
    use crate::Error;
    use wiremock::matchers::{body_json, query_param};
    use wiremock::{MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> CloudSpeechClient {
        CloudSpeechClient::new(
            "tts-key".to_string(),
            test_support::synthesize_url(server),
            Duration::from_secs(5),
        )
    }

    fn speech(text: &str) -> SpeechRequest {
        SpeechRequest {
            text: text.to_string(),
            voice: VoiceConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_synthesize_decodes_audio() {
        let server = MockServer::start().await;
        let fake_mp3 = vec![0x49, 0x44, 0x33, 0x04];
        let b64 = base64::engine::general_purpose::STANDARD.encode(&fake_mp3);

        test_support::post_path(test_support::SYNTHESIZE_PATH)
            .and(query_param("key", "tts-key"))
            .and(body_json(serde_json::json!({
                "input": { "text": "Take two tablets" },
                "voice": { "languageCode": "en-US", "ssmlGender": "NEUTRAL" },
                "audioConfig": { "audioEncoding": "MP3" }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "audioContent": b64 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let audio = make_client(&server)
            .synthesize(&speech("Take two tablets"))
            .await
            .unwrap();

        assert_eq!(audio, Some(fake_mp3));
    }

    #[tokio::test]
    async fn test_voice_config_is_forwarded() {
        let server = MockServer::start().await;

        test_support::post_path(test_support::SYNTHESIZE_PATH)
            .and(body_json(serde_json::json!({
                "input": { "text": "Hallo" },
                "voice": { "languageCode": "de-DE", "ssmlGender": "FEMALE" },
                "audioConfig": { "audioEncoding": "OGG_OPUS" }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "audioContent": "AA==" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = SpeechRequest {
            text: "Hallo".to_string(),
            voice: VoiceConfig {
                language_code: "de-DE".to_string(),
                ssml_gender: SsmlGender::Female,
                audio_encoding: AudioEncoding::OggOpus,
            },
        };

        let audio = make_client(&server).synthesize(&request).await.unwrap();
        assert_eq!(audio, Some(vec![0x00]));
    }

    #[tokio::test]
    async fn test_empty_text_sends_well_formed_request_and_handles_missing_audio() {
        let server = MockServer::start().await;

        test_support::post_path(test_support::SYNTHESIZE_PATH)
            .and(body_json(serde_json::json!({
                "input": { "text": "" },
                "voice": { "languageCode": "en-US", "ssmlGender": "NEUTRAL" },
                "audioConfig": { "audioEncoding": "MP3" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let audio = make_client(&server).synthesize(&speech("")).await.unwrap();
        assert_eq!(audio, None);
    }

    #[tokio::test]
    async fn test_empty_audio_content_is_absent() {
        let server = MockServer::start().await;

        test_support::post_path(test_support::SYNTHESIZE_PATH)
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "audioContent": "" })),
            )
            .mount(&server)
            .await;

        let audio = make_client(&server).synthesize(&speech("hi")).await.unwrap();
        assert_eq!(audio, None);
    }

    #[tokio::test]
    async fn test_non_200_preserves_status_and_body() {
        let server = MockServer::start().await;

        test_support::post_path(test_support::SYNTHESIZE_PATH)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = make_client(&server).synthesize(&speech("hi")).await.unwrap_err();

        match err {
            Error::RemoteService {
                endpoint,
                status,
                body,
            } => {
                assert_eq!(endpoint, Endpoint::Speech);
                assert_eq!(status, Some(429));
                assert_eq!(body, b"quota exceeded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_base64_is_decode_error() {
        let server = MockServer::start().await;

        test_support::post_path(test_support::SYNTHESIZE_PATH)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "audioContent": "!!!invalid-base64!!!" })),
            )
            .mount(&server)
            .await;

        let err = make_client(&server).synthesize(&speech("hi")).await.unwrap_err();
        assert!(matches!(err, Error::Base64(_)));
    }
}
