//! Forge Detect Common Library
//!
//! CLIと将来のフロントエンドで共有される型と結果合成ロジック（非同期ランタイム非依存）

pub mod types;
pub mod error;
pub mod stages;
pub mod entropy;
pub mod synthesizer;

pub use types::{
    AnalysisDetails, Classification, CnnFeatures, DetectionResult, DpFeature, DpFeatures,
    ImageFile, ImageMetadata, ScoreBand, Stage, StageStatus,
};
pub use error::{Error, Result};
pub use stages::{check_partition, initial_stages, stage_progress};
pub use entropy::{ScoreSource, ScriptedSource, SeededSource};
pub use synthesizer::{classify, image_format, image_size_label, synthesize};
