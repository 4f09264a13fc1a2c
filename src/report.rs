//! 検出結果のテキスト表示とJSON保存

use crate::error::Result;
use chrono::{DateTime, Utc};
use forge_detect_common::{Classification, DetectionResult, ImageFile, ScoreBand, Stage, StageStatus};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::path::Path;

fn band_mark(score: f64) -> &'static str {
    match ScoreBand::of(score) {
        ScoreBand::Low => "低",
        ScoreBand::Medium => "中",
        ScoreBand::High => "高",
    }
}

fn verdict_mark(classification: Classification) -> &'static str {
    match classification {
        Classification::Pristine => "✔",
        Classification::Suspicious => "⚠",
        Classification::Forged => "✖",
    }
}

/// ステージ一覧を1行ずつ表示用に整形
pub fn render_steps(steps: &[Stage]) -> String {
    let mut out = String::new();
    for step in steps {
        let mark = match step.status {
            StageStatus::Completed => "✔",
            StageStatus::Running => "…",
            StageStatus::Pending => "○",
        };
        let _ = match step.duration {
            Some(ms) if step.status == StageStatus::Completed => {
                writeln!(out, "  {} {} ({}ms)", mark, step.label, ms)
            }
            _ => writeln!(out, "  {} {}", mark, step.label),
        };
    }
    out
}

/// 検出結果を表示用に整形
pub fn render_text(result: &DetectionResult) -> String {
    let details = &result.analysis_details;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {}",
        verdict_mark(result.classification),
        result.classification.to_string().to_uppercase()
    );
    let _ = writeln!(
        out,
        "  Forgery probability: {:.1}% • Confidence: {:.1}%",
        result.overall_score, result.confidence
    );

    let _ = writeln!(out, "\nCNN特徴");
    let _ = writeln!(
        out,
        "  Neural Network Score: {:.1}% [{}]",
        details.cnn_features.score,
        band_mark(details.cnn_features.score)
    );
    let _ = writeln!(
        out,
        "  Key Features: {}",
        details.cnn_features.key_features.join(", ")
    );

    let _ = writeln!(out, "\nデジタル処理特徴");
    for (name, feature) in details.dp_features.iter() {
        let _ = writeln!(
            out,
            "  {:<6} {:>5.1}% [{}] {}",
            name.to_uppercase(),
            feature.score,
            band_mark(feature.score),
            feature.description
        );
    }

    let _ = writeln!(
        out,
        "\nLate Fusion Score: {:.1}% [{}]",
        details.fusion_score,
        band_mark(details.fusion_score)
    );

    let meta = &result.image_metadata;
    let _ = writeln!(out, "\n処理時間: {}ms", result.processing_time);
    let _ = writeln!(
        out,
        "画像: {} / {} / {}",
        meta.size, meta.format, meta.compression
    );

    out
}

/// 保存用のレポート
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFile {
    pub generated_at: DateTime<Utc>,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    pub steps: Vec<Stage>,
    pub result: DetectionResult,
}

impl ReportFile {
    pub fn new(file: &ImageFile, steps: Vec<Stage>, result: DetectionResult) -> Self {
        Self {
            generated_at: Utc::now(),
            file_name: file.name.clone(),
            sha256: None,
            steps,
            result,
        }
    }

    /// 元画像のSHA-256を付与
    pub fn with_digest_of(mut self, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        self.sha256 = Some(hex::encode(Sha256::digest(&bytes)));
        Ok(self)
    }
}

pub fn save_reports(reports: &[ReportFile], output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = if reports.len() == 1 {
        serde_json::to_string_pretty(&reports[0])?
    } else {
        serde_json::to_string_pretty(reports)?
    };
    std::fs::write(output, json)?;
    Ok(())
}
