//! Text-to-speech through the backend.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::backend::BackendClient;
use super::error::ServiceError;

const ROUTE: &str = "tts";

/// Locale used when a language code has no voice mapping.
pub const FALLBACK_VOICE_LOCALE: &str = "en-US";

const VOICE_LOCALES: &[(&str, &str)] = &[
    ("ar", "ar-XA"),
    ("bn", "bn-IN"),
    ("zh", "cmn-CN"),
    ("en", "en-US"),
    ("fa", "fa-IR"),
    ("tl", "fil-PH"),
    ("fr", "fr-FR"),
    ("de", "de-DE"),
    ("hi", "hi-IN"),
    ("id", "id-ID"),
    ("it", "it-IT"),
    ("ja", "ja-JP"),
    ("ko", "ko-KR"),
    ("ml", "ml-IN"),
    ("ms", "ms-MY"),
    ("nl", "nl-NL"),
    ("pa", "pa-IN"),
    ("pl", "pl-PL"),
    ("pt", "pt-PT"),
    ("ru", "ru-RU"),
    ("sw", "sw-KE"),
    ("ta", "ta-IN"),
    ("te", "te-IN"),
    ("th", "th-TH"),
    ("tr", "tr-TR"),
    ("ur", "ur-IN"),
    ("vi", "vi-VN"),
];

/// Map a short language code (`ms`) to the voice locale the speech
/// service expects (`ms-MY`).
pub fn voice_locale(short_code: &str) -> &'static str {
    let code = short_code.trim().to_lowercase();
    VOICE_LOCALES
        .iter()
        .find(|(short, _)| *short == code)
        .map(|(_, locale)| *locale)
        .unwrap_or(FALLBACK_VOICE_LOCALE)
}

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TtsResponse {
    #[serde(default)]
    audio: Option<String>,
}

/// Synthesized speech.
#[derive(Debug, Clone)]
pub struct SpeechClip {
    /// MP3 bytes
    pub audio: Vec<u8>,
    /// Voice locale the clip was synthesized with
    pub locale: String,
    /// Playback rate to apply when playing the clip
    pub playback_rate: f32,
}

impl SpeechClip {
    pub fn at_speed(mut self, playback_rate: f32) -> Self {
        self.playback_rate = playback_rate;
        self
    }
}

impl BackendClient {
    /// Synthesize `text` in the language `lang` (short code such as `ms`).
    pub async fn synthesize_speech(
        &self,
        text: &str,
        lang: &str,
    ) -> Result<SpeechClip, ServiceError> {
        if text.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("Nothing to speak.".to_string()));
        }

        let locale = voice_locale(lang);
        let response = self
            .post_json(ROUTE, &TtsRequest { text, lang: locale })
            .await?;
        let body: TtsResponse = response.json().await?;

        let encoded = body
            .audio
            .filter(|a| !a.is_empty())
            .ok_or_else(|| ServiceError::NoResult("No audio returned.".to_string()))?;
        let audio = STANDARD.decode(encoded.as_bytes())?;

        log::debug!("Synthesized {} bytes of {} speech", audio.len(), locale);
        Ok(SpeechClip {
            audio,
            locale: locale.to_string(),
            playback_rate: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_locale_known_codes() {
        assert_eq!(voice_locale("ms"), "ms-MY");
        assert_eq!(voice_locale("zh"), "cmn-CN");
        assert_eq!(voice_locale(" TL "), "fil-PH");
    }

    #[test]
    fn test_voice_locale_falls_back() {
        assert_eq!(voice_locale("xx"), FALLBACK_VOICE_LOCALE);
        assert_eq!(voice_locale(""), FALLBACK_VOICE_LOCALE);
    }

    #[test]
    fn test_at_speed() {
        let clip = SpeechClip {
            audio: vec![1],
            locale: "en-US".to_string(),
            playback_rate: 1.0,
        }
        .at_speed(1.5);
        assert_eq!(clip.playback_rate, 1.5);
    }
}
