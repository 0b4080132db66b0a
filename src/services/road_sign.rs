//! Road-sign classification.

use serde::Deserialize;
use std::fmt;

use super::backend::BackendClient;
use super::error::ServiceError;
use crate::input::UploadedImage;

const ROUTE: &str = "predict-road-sign";

/// Raw classifier response. The backend answers either with a single
/// prediction or with a ranked `topk` list.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RoadSignResponse {
    #[serde(default)]
    prediction: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    topk: Vec<RankedLabel>,
}

#[derive(Debug, Deserialize)]
struct RankedLabel {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// A classifier verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Probability in `0.0..=1.0`, when the backend reports one
    pub confidence: Option<f64>,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Detected: {}", self.label)?;
        if let Some(conf) = self.confidence {
            write!(f, " ({:.1}%)", conf * 100.0)?;
        }
        Ok(())
    }
}

impl RoadSignResponse {
    /// Pick the verdict: the top-level prediction if present, otherwise the
    /// first ranked entry.
    pub(crate) fn into_prediction(self) -> Result<Prediction, ServiceError> {
        if let Some(label) = self.prediction.filter(|l| !l.is_empty()) {
            return Ok(Prediction {
                label,
                confidence: self.confidence,
            });
        }

        match self.topk.into_iter().next() {
            Some(best) => Ok(Prediction {
                label: best
                    .label
                    .or(best.name)
                    .unwrap_or_else(|| "Unknown".to_string()),
                confidence: best.confidence,
            }),
            None => Err(ServiceError::NoResult("No prediction returned.".to_string())),
        }
    }
}

impl BackendClient {
    /// Classify a road sign photo.
    ///
    /// The image is sent as uploaded (not binarized); the backend does its
    /// own resizing.
    ///
    /// # Errors
    ///
    /// `ServiceError::PayloadTooLarge` on HTTP 413, `ServiceError::Rejected`
    /// on other failure statuses, `ServiceError::NoResult` if the response
    /// carries no label, or `ServiceError::Http` if the request fails.
    pub async fn predict_road_sign(
        &self,
        image: &UploadedImage,
    ) -> Result<Prediction, ServiceError> {
        let response = self
            .post_image(
                ROUTE,
                image.bytes().to_vec(),
                image.file_name(),
                image.encoding().mime(),
            )
            .await?;

        let body: RoadSignResponse = response.json().await?;
        let prediction = body.into_prediction()?;
        log::info!("Road sign: {}", prediction);
        Ok(prediction)
    }
}
