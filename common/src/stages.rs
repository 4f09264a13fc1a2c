//! 解析ステージのカタログ
//!
//! 挿入順 = 実行順。ラベルと説明は不変。

use crate::types::{Stage, StageStatus};

/// (id, label, description)
const STAGE_CATALOG: &[(&str, &str, &str)] = &[
    (
        "preprocessing",
        "Image Preprocessing",
        "Resizing, normalization, and format standardization",
    ),
    (
        "ela",
        "Error Level Analysis",
        "Detecting compression artifacts and inconsistencies",
    ),
    (
        "dct",
        "DCT Coefficient Analysis",
        "Analyzing frequency domain characteristics",
    ),
    (
        "dwt",
        "Wavelet Transform",
        "Multi-scale texture and edge analysis",
    ),
    (
        "lbp",
        "Local Binary Patterns",
        "Texture consistency analysis",
    ),
    (
        "cnn",
        "CNN Feature Extraction",
        "Deep learning feature extraction using ResNet-18",
    ),
    (
        "fusion",
        "Feature Fusion",
        "Combining CNN and digital processing features",
    ),
    (
        "classification",
        "Final Classification",
        "Generating final forgery probability and confidence",
    ),
];

/// 初期状態（全てpending、所要時間なし）のステージ一覧
pub fn initial_stages() -> Vec<Stage> {
    STAGE_CATALOG
        .iter()
        .map(|(id, label, description)| Stage::pending(id, label, description))
        .collect()
}

/// 完了済みステージの割合 (0.0-1.0)
pub fn stage_progress(steps: &[Stage]) -> f32 {
    if steps.is_empty() {
        return 0.0;
    }
    let completed = steps
        .iter()
        .filter(|s| s.status == StageStatus::Completed)
        .count();
    completed as f32 / steps.len() as f32
}

/// 連続区分の不変条件を検証
///
/// completedの接頭辞、running高々1つ、残りはpending。
/// durationはcompletedのステージにのみ存在する。
pub fn check_partition(steps: &[Stage]) -> bool {
    let mut floor = StageStatus::Completed;
    let mut running = 0;

    for step in steps {
        if step.status > floor {
            return false;
        }
        match step.status {
            StageStatus::Completed => {
                if step.duration.is_none() {
                    return false;
                }
            }
            StageStatus::Running => {
                running += 1;
                floor = StageStatus::Pending;
                if step.duration.is_some() {
                    return false;
                }
            }
            StageStatus::Pending => {
                floor = StageStatus::Pending;
                if step.duration.is_some() {
                    return false;
                }
            }
        }
    }

    running <= 1
}
