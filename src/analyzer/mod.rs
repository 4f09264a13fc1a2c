//! 解析オーケストレーション
//!
//! - sequencer: ステージを順に進めるステートマシン
//! - observer: 遷移ごとのスナップショット通知先

pub mod observer;
pub mod sequencer;

pub use observer::{ProgressBarObserver, RecordingObserver, StageObserver, TracingObserver};
pub use sequencer::StageSequencer;

pub use forge_detect_common::{DetectionResult, ImageFile, Stage, StageStatus};

use crate::error::Result;
use std::sync::Arc;

/// 1ファイル分の解析結果
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub file: ImageFile,
    /// 実行後のステージ一覧
    pub steps: Vec<Stage>,
    /// 入力エラーでスキップした場合は理由
    pub outcome: std::result::Result<DetectionResult, String>,
}

/// 複数ファイルを順番に解析する
///
/// 各ファイルの前にステージ一覧をリセットする。入力エラーのファイルは
/// スキップして理由を記録し、他のエラーはそこで中断する。
pub async fn analyze_files(
    sequencer: &StageSequencer,
    files: &[ImageFile],
    verbose: bool,
) -> Result<Vec<FileAnalysis>> {
    let mut analyses = Vec::with_capacity(files.len());

    for (idx, file) in files.iter().enumerate() {
        if verbose {
            println!("  [{}/{}] {}", idx + 1, files.len(), file.name);
        }

        sequencer.reset();
        let outcome = match sequencer.run(Some(file)).await {
            Ok(result) => Ok(result),
            Err(e) if e.is_input_error() => {
                tracing::warn!(file = %file.name, error = %e, "skipped");
                Err(e.to_string())
            }
            Err(e) => return Err(e),
        };

        analyses.push(FileAnalysis {
            file: file.clone(),
            steps: sequencer.steps(),
            outcome,
        });
    }

    Ok(analyses)
}

/// tracingへの遷移ログを購読済みのシーケンサを作る
pub fn build_sequencer(seed: Option<u64>) -> StageSequencer {
    let sequencer = match seed {
        Some(seed) => StageSequencer::with_seed(seed),
        None => StageSequencer::new(),
    };
    sequencer.add_observer(Arc::new(TracingObserver));
    sequencer
}
