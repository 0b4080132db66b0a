//! Remote service wrappers.
//!
//! Recognition, translation and speech all happen on remote services; this
//! module only shapes requests and turns responses into typed results or a
//! [`ServiceError`]. Rendering the result is left to the caller.

mod backend;
mod error;
mod ocr;
mod road_sign;
mod sign_language;
mod translate;
mod tts;

pub use backend::{BackendClient, DEFAULT_BACKEND_URL};
pub use error::ServiceError;
pub use ocr::clean_ocr_text;
pub use road_sign::Prediction;
pub use sign_language::{LetterSign, SignPrediction, PLACEHOLDER_IMAGE};
pub use translate::{
    api_key_from_env, TranslateClient, Translation, DEFAULT_TARGET_LANGUAGE, QUICK_TRANSLATE_BASE_URL,
    TRANSLATE_API_BASE_URL, TRANSLATE_API_KEY_ENV,
};
pub use tts::{voice_locale, SpeechClip, FALLBACK_VOICE_LOCALE};
