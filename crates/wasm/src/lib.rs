//! swish-wasm - WebAssembly entry points for in-browser shot analysis.

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use swish_analysis::synthetic::{generate, ShotProfile};
use swish_analysis::{AnalysisResult, AnalyzerConfig, ShotAnalyzer};
use swish_core::{FlawType, FrameLandmarks};

#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct JsAnalyzerConfig {
    inner: AnalyzerConfig,
}

#[wasm_bindgen]
impl JsAnalyzerConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: AnalyzerConfig::default(),
        }
    }

    #[wasm_bindgen(js_name = rightHanded)]
    pub fn right_handed() -> Self {
        Self::new()
    }

    #[wasm_bindgen(js_name = leftHanded)]
    pub fn left_handed() -> Self {
        Self {
            inner: AnalyzerConfig::left_handed(),
        }
    }

    /// Parses a (possibly partial) JSON config. Missing fields keep their
    /// defaults.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<JsAnalyzerConfig, JsError> {
        let inner = AnalyzerConfig::from_json_str(json).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { inner })
    }

    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsError> {
        self.inner
            .to_json_string()
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(getter, js_name = parallelDetectors)]
    pub fn parallel_detectors(&self) -> bool {
        self.inner.parallel_detectors
    }

    #[wasm_bindgen(getter, js_name = severityWeight)]
    pub fn severity_weight(&self) -> f32 {
        self.inner.selector.severity_weight
    }
}

impl Default for JsAnalyzerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Flattened result for JavaScript consumers.
#[derive(Serialize, Deserialize)]
pub struct JsAnalysisResult {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub flaw_keys: Vec<String>,
}

impl From<AnalysisResult> for JsAnalysisResult {
    fn from(result: AnalysisResult) -> Self {
        let flaw_keys = result
            .findings
            .iter()
            .map(|f| f.flaw_type.key().to_string())
            .collect();
        Self { result, flaw_keys }
    }
}

/// Analyzes `frames` (an array of `{ frame_number, joints, motion_energy? }`)
/// with the default configuration.
#[wasm_bindgen]
pub fn analyze_shot(frames: JsValue, fps: f32) -> Result<JsValue, JsError> {
    run(ShotAnalyzer::default(), frames, fps)
}

#[wasm_bindgen]
pub fn analyze_shot_with_config(
    frames: JsValue,
    fps: f32,
    config: &JsAnalyzerConfig,
) -> Result<JsValue, JsError> {
    let analyzer =
        ShotAnalyzer::new(config.inner.clone()).map_err(|e| JsError::new(&e.to_string()))?;
    run(analyzer, frames, fps)
}

/// The default configuration as a plain object.
#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsError> {
    to_js(&AnalyzerConfig::default())
}

/// Every flaw key the analyzer can report, in report order.
#[wasm_bindgen]
pub fn flaw_keys() -> Vec<String> {
    FlawType::ALL.iter().map(|f| f.key().to_string()).collect()
}

/// A synthetic demo clip; `profile` names one of the built-in shot profiles.
#[wasm_bindgen]
pub fn synthetic_shot(profile: &str) -> Result<JsValue, JsError> {
    let profile = match profile {
        "clean" => ShotProfile::clean(),
        "flared_elbow" => ShotProfile::flared_elbow(),
        "shallow_knees" => ShotProfile::shallow_knees(),
        "deep_knees" => ShotProfile::deep_knees(),
        "stiff_wrist" => ShotProfile::stiff_wrist(),
        "guide_hand_on_top" => ShotProfile::guide_hand_on_top(),
        "thumb_flick" => ShotProfile::thumb_flick(),
        other => return Err(JsError::new(&format!("unknown shot profile: {other}"))),
    };
    to_js(&generate(&profile))
}

fn run(analyzer: ShotAnalyzer, frames: JsValue, fps: f32) -> Result<JsValue, JsError> {
    let frames: Vec<FrameLandmarks> = serde_wasm_bindgen::from_value(frames)
        .map_err(|e| JsError::new(&format!("invalid frames: {e}")))?;
    let result = analyzer
        .analyze(&frames, fps)
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&JsAnalysisResult::from(result))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}
