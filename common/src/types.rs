//! 解析ステージと検出結果の型定義
//!
//! CLIと表示層で共有される型:
//! - Stage: 擬似解析パイプラインの1ステップ（状態と所要時間）
//! - DetectionResult: 最終出力（合成されたスコア一式）
//! - ImageFile: アップロード層から渡されるファイルハンドル

use serde::{Deserialize, Serialize};
use std::fmt;

/// ステージの進行状態（pending → running → completed の単調遷移）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    #[default]
    Pending,
    Running,
    Completed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Pending => write!(f, "pending"),
            StageStatus::Running => write!(f, "running"),
            StageStatus::Completed => write!(f, "completed"),
        }
    }
}

/// 解析ステージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub label: String,
    pub description: String,
    pub status: StageStatus,

    /// 完了時に一度だけ記録される所要時間（ミリ秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl Stage {
    pub fn pending(id: &str, label: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            status: StageStatus::Pending,
            duration: None,
        }
    }
}

/// 判定区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Pristine,
    Suspicious,
    Forged,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Pristine => write!(f, "pristine"),
            Classification::Suspicious => write!(f, "suspicious"),
            Classification::Forged => write!(f, "forged"),
        }
    }
}

/// スコアの表示帯（30未満: 低, 70未満: 中, それ以上: 高）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score < 30.0 {
            ScoreBand::Low
        } else if score < 70.0 {
            ScoreBand::Medium
        } else {
            ScoreBand::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnnFeatures {
    pub score: f64,
    pub confidence: f64,
    pub key_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpFeature {
    pub score: f64,
    pub description: String,
}

/// デジタル処理系の6つのサブ解析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpFeatures {
    pub ela: DpFeature,
    pub dct: DpFeature,
    pub dwt: DpFeature,
    pub lbp: DpFeature,
    pub edges: DpFeature,
    pub color: DpFeature,
}

impl DpFeatures {
    /// 表示順に (名前, 特徴) を返す
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DpFeature)> {
        [
            ("ela", &self.ela),
            ("dct", &self.dct),
            ("dwt", &self.dwt),
            ("lbp", &self.lbp),
            ("edges", &self.edges),
            ("color", &self.color),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetails {
    pub cnn_features: CnnFeatures,
    pub dp_features: DpFeatures,
    pub fusion_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub size: String,
    pub format: String,
    pub compression: String,
}

/// 検出結果（完成した状態でのみ公開される）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub overall_score: f64,
    pub classification: Classification,
    pub confidence: f64,
    pub analysis_details: AnalysisDetails,
    /// 実測の処理時間（ミリ秒）
    pub processing_time: u64,
    pub image_metadata: ImageMetadata,
}

impl DetectionResult {
    /// 結果に含まれる全スコア（overall, cnn, fusion, dp×6）
    pub fn all_scores(&self) -> Vec<f64> {
        let details = &self.analysis_details;
        let mut scores = vec![
            self.overall_score,
            details.cnn_features.score,
            details.fusion_score,
        ];
        scores.extend(details.dp_features.iter().map(|(_, f)| f.score));
        scores
    }
}

/// 解析対象ファイル（アップロード層が検証済みのもの）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFile {
    pub name: String,
    pub byte_length: u64,
    /// 例: "image/png"
    pub media_type: String,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, byte_length: u64, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_length,
            media_type: media_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_status_ordering() {
        assert!(StageStatus::Pending < StageStatus::Running);
        assert!(StageStatus::Running < StageStatus::Completed);
    }

    #[test]
    fn test_stage_serialize_without_duration() {
        let stage = Stage::pending("ela", "Error Level Analysis", "desc");
        let json = serde_json::to_string(&stage).expect("シリアライズ失敗");
        assert!(json.contains("\"status\":\"pending\""));
        assert!(!json.contains("duration"));
    }

    #[test]
    fn test_stage_deserialize() {
        let json = r#"{
            "id": "dct",
            "label": "DCT Coefficient Analysis",
            "description": "Analyzing frequency domain characteristics",
            "status": "completed",
            "duration": 812
        }"#;

        let stage: Stage = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(stage.status, StageStatus::Completed);
        assert_eq!(stage.duration, Some(812));
    }

    #[test]
    fn test_score_band() {
        assert_eq!(ScoreBand::of(0.0), ScoreBand::Low);
        assert_eq!(ScoreBand::of(29.9), ScoreBand::Low);
        assert_eq!(ScoreBand::of(30.0), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(69.9), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(70.0), ScoreBand::High);
    }

    #[test]
    fn test_classification_serialize() {
        let json = serde_json::to_string(&Classification::Suspicious).unwrap();
        assert_eq!(json, "\"suspicious\"");
        assert_eq!(Classification::Forged.to_string(), "forged");
    }
}
