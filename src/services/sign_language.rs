//! Sign-language lookups: text to alphabet images, webcam frame to letter.

use serde::{Deserialize, Serialize};

use super::backend::BackendClient;
use super::error::ServiceError;
use crate::camera::Frame;
use crate::preprocess::{crop_and_resize, encode_jpeg, SIGN_INPUT_SIZE, SIGN_REGION};

const LETTERS_ROUTE: &str = "predict-letters";
const SIGN_IMAGE_ROUTE: &str = "predict-sign-image";

/// Image shown for a letter the backend has no picture for.
pub const PLACEHOLDER_IMAGE: &str = "assets/sign-alphabet-image/placeholder.jpg";

#[derive(Debug, Serialize)]
struct LettersRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct LettersResponse {
    #[serde(default)]
    images: Vec<LetterSign>,
}

/// One letter of the input and the backend path of its sign image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LetterSign {
    pub letter: String,
    pub url: Option<String>,
}

impl LetterSign {
    /// Image path, falling back to the placeholder.
    pub fn image_path(&self) -> &str {
        self.url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }
}

#[derive(Debug, Deserialize)]
struct SignImageResponse {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Letter recognized in a webcam frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SignPrediction {
    pub label: String,
    /// Percentage in `0.0..=100.0`
    pub confidence: f64,
}

impl BackendClient {
    /// Look up the alphabet sign images for `text`.
    pub async fn predict_letters(&self, text: &str) -> Result<Vec<LetterSign>, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::InvalidRequest(
                "Please type or speak something.".to_string(),
            ));
        }

        let response = self
            .post_json(LETTERS_ROUTE, &LettersRequest { text })
            .await?;
        let body: LettersResponse = response.json().await?;

        if body.images.is_empty() {
            return Err(ServiceError::NoResult("No valid letters found.".to_string()));
        }
        Ok(body.images)
    }

    /// Recognize a hand sign in a webcam frame.
    ///
    /// The hand region of the frame is cropped and scaled to the
    /// classifier's 64x64 input before upload.
    pub async fn predict_sign_image(&self, frame: &Frame) -> Result<SignPrediction, ServiceError> {
        let input = crop_and_resize(frame, SIGN_REGION, SIGN_INPUT_SIZE).ok_or_else(|| {
            ServiceError::InvalidRequest(format!(
                "Frame of {} does not cover the hand region",
                frame.resolution()
            ))
        })?;
        let jpeg = encode_jpeg(&input)?;

        let response = self
            .post_image(SIGN_IMAGE_ROUTE, jpeg, "frame.jpg", "image/jpeg")
            .await?;
        let body: SignImageResponse = response.json().await?;

        match body.label.filter(|l| !l.is_empty()) {
            Some(label) => {
                let prediction = SignPrediction {
                    label,
                    confidence: body.confidence.unwrap_or(0.0),
                };
                log::info!(
                    "Sign predicted: {} ({:.2}%)",
                    prediction.label,
                    prediction.confidence
                );
                Ok(prediction)
            }
            None => Err(ServiceError::NoResult("Prediction failed.".to_string())),
        }
    }
}
