use serde::{Deserialize, Serialize};

use crate::features::FeatureWindow;

/// Optional annotations attached to a network spec.
/// All fields are Option<> so specs written without metadata deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    /// Sampling window the feature extractor used to build the inputs.
    pub input_window: Option<FeatureWindow>,
    /// Ink fraction for P-tile binarization of input glyphs.
    pub ink_fraction: Option<f64>,
    /// Human-readable class labels for the output layer (e.g. ["A","B",...]).
    pub output_labels: Option<Vec<String>>,
}

impl ModelMetadata {
    pub fn label_for(&self, class: usize) -> Option<&str> {
        self.output_labels.as_ref()?.get(class).map(String::as_str)
    }
}
