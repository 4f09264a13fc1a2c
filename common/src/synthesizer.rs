//! 検出結果の合成
//!
//! 1つの基準スコア（overallScore）から相関したサブスコア群を生成する。
//! 乱数はすべて引数の `ScoreSource` から引くため、同じ列を与えれば同じ結果になる。
//!
//! 乱数の消費順:
//! overall, confidence, cnn, fusion, keyFeatures×3, ela, dct, dwt, lbp, edges, color, compression

use crate::entropy::ScoreSource;
use crate::error::{Error, Result};
use crate::types::{
    AnalysisDetails, Classification, CnnFeatures, DetectionResult, DpFeature, DpFeatures,
    ImageFile, ImageMetadata,
};

const PRISTINE_BELOW: f64 = 25.0;
const FORGED_ABOVE: f64 = 75.0;

const CONFIDENCE_FLOOR: f64 = 70.0;
const CONFIDENCE_SPAN: f64 = 30.0;

// ジッター幅（全幅）。オフセットは ±幅/2
const CNN_JITTER: f64 = 20.0;
const FUSION_JITTER: f64 = 15.0;
const ELA_JITTER: f64 = 30.0;
const DCT_JITTER: f64 = 25.0;
const DWT_JITTER: f64 = 20.0;
const LBP_JITTER: f64 = 35.0;
const EDGES_JITTER: f64 = 25.0;
const COLOR_JITTER: f64 = 30.0;

pub const KEY_FEATURE_CATALOG: &[&str] = &[
    "Edge inconsistencies",
    "Compression artifacts",
    "Noise patterns",
    "Color channel analysis",
    "Texture variations",
];
pub const KEY_FEATURE_COUNT: usize = 3;

pub const COMPRESSION_JPEG: &str = "JPEG (Quality: 85)";
pub const COMPRESSION_LOSSLESS: &str = "Lossless";

/// 基準スコアから判定区分を決定（閾値は固定）
pub fn classify(score: f64) -> Classification {
    if score < PRISTINE_BELOW {
        Classification::Pristine
    } else if score > FORGED_ABOVE {
        Classification::Forged
    } else {
        Classification::Suspicious
    }
}

/// バイト数をKB表記に変換（四捨五入）
pub fn image_size_label(byte_length: u64) -> String {
    format!("{}KB", (byte_length as f64 / 1024.0).round() as u64)
}

/// メディアタイプのサブタイプを大文字で返す
///
/// ```
/// use forge_detect_common::image_format;
/// assert_eq!(image_format("image/png").unwrap(), "PNG");
/// assert!(image_format("image").is_err());
/// ```
pub fn image_format(media_type: &str) -> Result<String> {
    let subtype = media_type
        .split_once('/')
        .map(|(_, sub)| sub.split(';').next().unwrap_or_default().trim())
        .filter(|sub| !sub.is_empty())
        .ok_or_else(|| Error::InvalidMediaType(media_type.to_string()))?;

    Ok(subtype.to_uppercase())
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn jittered(base: f64, width: f64, source: &mut dyn ScoreSource) -> f64 {
    clamp_percent(base + (source.next_unit() - 0.5) * width)
}

/// カタログから重複なしで3つ選び、順序もランダムにする
fn pick_key_features(source: &mut dyn ScoreSource) -> Vec<String> {
    let mut pool: Vec<&str> = KEY_FEATURE_CATALOG.to_vec();

    for i in 0..KEY_FEATURE_COUNT {
        let remaining = pool.len() - i;
        let offset = ((source.next_unit() * remaining as f64) as usize).min(remaining - 1);
        pool.swap(i, i + offset);
    }

    pool.into_iter()
        .take(KEY_FEATURE_COUNT)
        .map(String::from)
        .collect()
}

fn dp_feature(base: f64, width: f64, description: &str, source: &mut dyn ScoreSource) -> DpFeature {
    DpFeature {
        score: jittered(base, width, source),
        description: description.to_string(),
    }
}

/// 検出結果を合成
///
/// メディアタイプにサブタイプがない場合は乱数を引く前に失敗する。
pub fn synthesize(
    file: &ImageFile,
    elapsed_ms: u64,
    source: &mut dyn ScoreSource,
) -> Result<DetectionResult> {
    let format = image_format(&file.media_type)?;

    let overall_score = clamp_percent(source.next_unit() * 100.0);
    let confidence = CONFIDENCE_FLOOR.max(source.next_unit() * CONFIDENCE_SPAN + CONFIDENCE_FLOOR);
    let classification = classify(overall_score);

    let cnn_score = jittered(overall_score, CNN_JITTER, source);
    let fusion_score = jittered(overall_score, FUSION_JITTER, source);
    let key_features = pick_key_features(source);

    let dp_features = DpFeatures {
        ela: dp_feature(overall_score, ELA_JITTER, "Low compression artifacts detected", source),
        dct: dp_feature(overall_score, DCT_JITTER, "Frequency domain analysis shows normal patterns", source),
        dwt: dp_feature(overall_score, DWT_JITTER, "Wavelet coefficients within expected range", source),
        lbp: dp_feature(overall_score, LBP_JITTER, "Texture patterns consistent across regions", source),
        edges: dp_feature(overall_score, EDGES_JITTER, "Edge density analysis completed", source),
        color: dp_feature(overall_score, COLOR_JITTER, "Color consistency analysis passed", source),
    };

    let compression = if source.next_unit() > 0.5 {
        COMPRESSION_JPEG
    } else {
        COMPRESSION_LOSSLESS
    };

    Ok(DetectionResult {
        overall_score,
        classification,
        confidence,
        analysis_details: AnalysisDetails {
            cnn_features: CnnFeatures {
                score: cnn_score,
                confidence,
                key_features,
            },
            dp_features,
            fusion_score,
        },
        processing_time: elapsed_ms,
        image_metadata: ImageMetadata {
            size: image_size_label(file.byte_length),
            format,
            compression: compression.to_string(),
        },
    })
}
