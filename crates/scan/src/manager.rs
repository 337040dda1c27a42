use std::{path::Path, sync::Arc};

use image::{GrayImage, RgbaImage};
use crate::{
    algorithms::{answer_question, DominantColorSampler, OcrPreprocessor},
    config::{ColorConfig, DetectorConfig, OcrPrepConfig},
    error::{Result, ScanError},
    pipeline::{Pipeline, builder::PipelineBuilder},
    types::{DominantColor, MathAnswer, RegionSet},
};
use serde::{Serialize, Deserialize};
use schemars::JsonSchema;
use strum::{Display, EnumString, IntoStaticStr, VariantNames};
use tracing::info;

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params")]
#[strum(serialize_all = "snake_case")]
pub enum ScanCommand {
    /// Count objects with the manager's pipeline
    #[serde(rename = "count_objects")]
    CountObjects,

    /// Count objects with one-off filter thresholds
    #[serde(rename = "count_objects_with")]
    CountObjectsWith {
        #[schemars(range(min = 0))]
        min_area: u32,
        #[schemars(range(min = 0))]
        area_tolerance: u32,
    },

    /// Report the most frequent sampled color
    #[serde(rename = "dominant_color")]
    DominantColor,

    /// Produce a binarized, resized image for an OCR engine
    #[serde(rename = "prepare_for_ocr")]
    PrepareForOcr,

    /// Answer an arithmetic question, optionally about recognized text.
    /// Does not need a loaded image.
    #[serde(rename = "answer_question")]
    AnswerQuestion {
        question: String,
        /// Overrides the text stored on the manager
        #[serde(default)]
        extracted_text: Option<String>,
    },
}

impl ScanCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ScanCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    /// One example of every command, with default parameters
    pub fn examples() -> Vec<ScanCommand> {
        let detector = DetectorConfig::default();
        vec![
            Self::CountObjects,
            Self::CountObjectsWith {
                min_area: detector.min_area,
                area_tolerance: detector.area_tolerance,
            },
            Self::DominantColor,
            Self::PrepareForOcr,
            Self::AnswerQuestion {
                question: "Quanto é 2 + 2?".to_string(),
                extracted_text: None,
            },
        ]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CountObjects => "Count edge-bounded objects using the configured thresholds",
            Self::CountObjectsWith { .. } => "Count edge-bounded objects with explicit minimum area and duplicate tolerance",
            Self::DominantColor => "Sample the image on a grid and report the most frequent color",
            Self::PrepareForOcr => "Resize, snap contrast, normalize, blur and binarize the image for text recognition",
            Self::AnswerQuestion { .. } => "Evaluate a simple arithmetic question, or the first expression in the extracted text",
        }
    }

    /// (name, description, required) for each parameter
    pub fn parameters_info(&self) -> Vec<(&'static str, &'static str, bool)> {
        match self {
            Self::CountObjectsWith { .. } => vec![
                ("min_area", "Regions with this many pixels or fewer are ignored", true),
                ("area_tolerance", "Overlapping regions closer in area than this are dropped as duplicates", true),
            ],
            Self::AnswerQuestion { .. } => vec![
                ("question", "Free-form question, e.g. \"Quanto é 2 + 2?\" or \"Qual é o resultado do texto?\"", true),
                ("extracted_text", "Text to search when the question refers to it", false),
            ],
            Self::CountObjects | Self::DominantColor | Self::PrepareForOcr => vec![],
        }
    }
}

/// Result of one executed command
#[derive(Debug, Clone)]
pub enum ScanOutput {
    Regions(RegionSet),
    Color(DominantColor),
    OcrImage(GrayImage),
    Answer(MathAnswer),
}

impl ScanOutput {
    /// Short human-readable result
    pub fn summary(&self) -> String {
        match self {
            Self::Regions(regions) => regions.summary(),
            Self::Color(color) => color.summary(),
            Self::OcrImage(image) => format!("OCR-ready image {}x{}", image.width(), image.height()),
            Self::Answer(answer) => answer.summary(),
        }
    }
}

/// Holds one loaded image, plus any text recognized from it, and runs
/// commands against them
#[derive(Clone)]
pub struct ScanManager {
    image: Option<RgbaImage>,
    extracted_text: String,
    pipeline: Arc<Pipeline>,
    color: ColorConfig,
    ocr: OcrPrepConfig,
}

impl ScanManager {
    pub fn new() -> Self {
        Self::with_pipeline(Pipeline::default())
    }

    /// Create a new ScanManager with a custom pipeline
    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            image: None,
            extracted_text: String::new(),
            pipeline: Arc::new(pipeline),
            color: ColorConfig::default(),
            ocr: OcrPrepConfig::default(),
        }
    }

    /// Create a manager from the three config sections
    pub fn from_configs(detector: &DetectorConfig, color: ColorConfig, ocr: OcrPrepConfig) -> Self {
        Self {
            image: None,
            extracted_text: String::new(),
            pipeline: Arc::new(PipelineBuilder::build_with_config(detector)),
            color,
            ocr,
        }
    }

    /// Load an image from file
    pub fn load_image<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let img = image::open(path)?;
        self.image = Some(img.to_rgba8());
        Ok(())
    }

    /// Load an image from memory
    pub fn load_image_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let img = image::load_from_memory(bytes)?;
        self.image = Some(img.to_rgba8());
        Ok(())
    }

    /// Set the image directly
    pub fn set_image(&mut self, image: RgbaImage) {
        self.image = Some(image);
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Store text recognized from the current image
    pub fn set_extracted_text(&mut self, text: impl Into<String>) {
        self.extracted_text = text.into();
    }

    pub fn extracted_text(&self) -> &str {
        &self.extracted_text
    }

    /// Drop the loaded image and its text
    pub fn reset(&mut self) {
        self.image = None;
        self.extracted_text.clear();
    }

    fn loaded_image(&self) -> Result<&RgbaImage> {
        self.image.as_ref().ok_or(ScanError::NoImageLoaded)
    }

    pub fn execute(&self, command: ScanCommand) -> Result<ScanOutput> {
        info!(command = %command, "executing scan command");

        match command {
            ScanCommand::CountObjects => {
                self.pipeline.process(self.loaded_image()?).map(ScanOutput::Regions)
            }
            ScanCommand::CountObjectsWith { min_area, area_tolerance } => {
                let pipeline = PipelineBuilder::new()
                    .with_min_area(min_area)
                    .with_area_tolerance(area_tolerance)
                    .build();
                pipeline.process(self.loaded_image()?).map(ScanOutput::Regions)
            }
            ScanCommand::DominantColor => {
                DominantColorSampler::new(self.color.clone())
                    .sample(self.loaded_image()?)
                    .map(ScanOutput::Color)
            }
            ScanCommand::PrepareForOcr => {
                OcrPreprocessor::new(self.ocr.clone())
                    .prepare(self.loaded_image()?)
                    .map(ScanOutput::OcrImage)
            }
            ScanCommand::AnswerQuestion { question, extracted_text } => {
                let text = extracted_text.as_deref().unwrap_or(&self.extracted_text);
                Ok(ScanOutput::Answer(answer_question(&question, text)))
            }
        }
    }
}

impl Default for ScanManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::squares_image;
    use std::io::Cursor;

    #[test]
    fn test_execute_without_image() {
        let manager = ScanManager::new();
        let result = manager.execute(ScanCommand::CountObjects);
        assert!(matches!(result, Err(ScanError::NoImageLoaded)));
    }

    #[test]
    fn test_count_objects() {
        let mut manager = ScanManager::new();
        manager.set_image(squares_image(200, 200, &[(20, 20, 80)]));

        match manager.execute(ScanCommand::CountObjects).expect("Should count") {
            ScanOutput::Regions(regions) => assert_eq!(regions.count(), 1),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_count_objects_with_thresholds() {
        let mut manager = ScanManager::new();
        // 40x40 square: edge band of 8 * 40 - 4 = 316 pixels
        manager.set_image(squares_image(100, 100, &[(30, 30, 40)]));

        let default = manager.execute(ScanCommand::CountObjects).expect("Should count");
        assert_eq!(default.summary(), "0 objects detected");

        let lowered = manager
            .execute(ScanCommand::CountObjectsWith { min_area: 300, area_tolerance: 200 })
            .expect("Should count");
        assert_eq!(lowered.summary(), "1 object detected");
    }

    #[test]
    fn test_dominant_color_and_ocr() {
        let mut manager = ScanManager::new();
        manager.set_image(squares_image(120, 60, &[(10, 10, 20)]));

        match manager.execute(ScanCommand::DominantColor).expect("Should sample") {
            ScanOutput::Color(color) => assert_eq!(color.hex, "#000000"),
            other => panic!("unexpected output: {:?}", other),
        }

        match manager.execute(ScanCommand::PrepareForOcr).expect("Should prepare") {
            ScanOutput::OcrImage(image) => assert_eq!(image.dimensions(), (1200, 600)),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_load_image_from_bytes() {
        let image = squares_image(150, 150, &[(30, 30, 70)]);
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("Should encode PNG");

        let mut manager = ScanManager::new();
        manager.load_image_from_bytes(&bytes).expect("Should decode");
        assert_eq!(manager.image().map(|img| img.dimensions()), Some((150, 150)));

        manager.reset();
        assert!(manager.image().is_none());
    }

    #[test]
    fn test_load_garbage_bytes() {
        let mut manager = ScanManager::new();
        let result = manager.load_image_from_bytes(b"not an image");
        assert!(matches!(result, Err(ScanError::ImageLoad(_))));
    }

    #[test]
    fn test_command_metadata() {
        assert_eq!(
            ScanCommand::command_names(),
            &[
                "count_objects",
                "count_objects_with",
                "dominant_color",
                "prepare_for_ocr",
                "answer_question",
            ]
        );
        assert_eq!(ScanCommand::DominantColor.to_string(), "dominant_color");
        assert_eq!(
            ScanCommand::CountObjectsWith { min_area: 1, area_tolerance: 1 }.parameters_info().len(),
            2
        );
        assert!(ScanCommand::schema().schema.subschemas.is_some());
    }

    #[test]
    fn test_examples_cover_every_command() {
        let names: Vec<&'static str> = ScanCommand::examples().iter().map(Into::into).collect();
        assert_eq!(names, ScanCommand::command_names());

        for command in ScanCommand::examples() {
            assert!(!command.description().is_empty());
        }
        assert_eq!(
            ScanCommand::CountObjectsWith { min_area: 1, area_tolerance: 1 }.parameters_info()[1].1,
            "Overlapping regions closer in area than this are dropped as duplicates"
        );
    }

    #[test]
    fn test_answer_question_without_image() {
        let manager = ScanManager::new();
        let output = manager
            .execute(ScanCommand::AnswerQuestion {
                question: "Quanto é 2 + 2?".to_string(),
                extracted_text: None,
            })
            .expect("Should answer");
        assert_eq!(output.summary(), "Resultado: 2+2 = 4");
    }

    #[test]
    fn test_answer_question_uses_stored_text() {
        let mut manager = ScanManager::new();
        manager.set_extracted_text("Conta: 15 / 4 =");

        let ask = |text: Option<&str>| ScanCommand::AnswerQuestion {
            question: "Qual é o resultado do texto?".to_string(),
            extracted_text: text.map(str::to_string),
        };

        let stored = manager.execute(ask(None)).expect("Should answer");
        assert_eq!(stored.summary(), "No texto extraído: 15/4 = 3.75");

        let overridden = manager.execute(ask(Some("3 * 3"))).expect("Should answer");
        assert_eq!(overridden.summary(), "No texto extraído: 3*3 = 9");

        manager.reset();
        assert_eq!(manager.extracted_text(), "");
        match manager.execute(ask(None)).expect("Should answer") {
            ScanOutput::Answer(answer) => assert_eq!(answer.kind, crate::types::AnswerKind::NotUnderstood),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_command_json() {
        let command: ScanCommand = serde_json::from_str(
            r#"{"type": "count_objects_with", "params": {"min_area": 100, "area_tolerance": 50}}"#,
        )
        .expect("Should parse");
        assert_eq!(command, ScanCommand::CountObjectsWith { min_area: 100, area_tolerance: 50 });

        let json = serde_json::to_string(&ScanCommand::CountObjects).expect("Should serialize");
        assert_eq!(json, r#"{"type":"count_objects"}"#);

        let command: ScanCommand = serde_json::from_str(
            r#"{"type": "answer_question", "params": {"question": "7/2"}}"#,
        )
        .expect("Should parse");
        assert_eq!(
            command,
            ScanCommand::AnswerQuestion { question: "7/2".to_string(), extracted_text: None }
        );
    }
}
