use analysis_core::{AnalysisError, PriceModel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Standardised linear regressor loaded from a JSON artifact.
///
/// ```json
/// { "feature_means": [...], "feature_stds": [...], "weights": [...], "intercept": 0.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPriceModel {
    pub feature_means: Vec<f64>,
    pub feature_stds: Vec<f64>,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LinearPriceModel {
    pub fn new(
        feature_means: Vec<f64>,
        feature_stds: Vec<f64>,
        weights: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, AnalysisError> {
        let model = Self { feature_means, feature_stds, weights, intercept };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::ModelError(format!("invalid model artifact: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::ModelError(format!("cannot read {}: {}", path.display(), e)))?;
        let model = Self::from_json(&json)?;
        tracing::info!("Loaded price model from {} ({} features)", path.display(), model.feature_count());
        Ok(model)
    }

    pub fn feature_count(&self) -> usize {
        self.weights.len()
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        let n = self.weights.len();
        if n == 0 || self.feature_means.len() != n || self.feature_stds.len() != n {
            return Err(AnalysisError::ModelError(format!(
                "artifact shape mismatch: {} means, {} stds, {} weights",
                self.feature_means.len(),
                self.feature_stds.len(),
                n
            )));
        }

        let all_finite = self
            .feature_means
            .iter()
            .chain(&self.feature_stds)
            .chain(&self.weights)
            .chain(std::iter::once(&self.intercept))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(AnalysisError::ModelError("artifact contains non-finite values".to_string()));
        }

        Ok(())
    }
}

impl PriceModel for LinearPriceModel {
    fn predict(&self, features: &[f64]) -> Result<f64, AnalysisError> {
        if features.len() != self.feature_count() {
            return Err(AnalysisError::ModelError(format!(
                "expected {} features, got {}",
                self.feature_count(),
                features.len()
            )));
        }

        let dot: f64 = features
            .iter()
            .zip(&self.feature_means)
            .zip(&self.feature_stds)
            .zip(&self.weights)
            .map(|(((x, mean), std), w)| {
                // Constant features carry no signal
                let z = if *std == 0.0 { 0.0 } else { (x - mean) / std };
                z * w
            })
            .sum();

        Ok(self.intercept + dot)
    }
}
