//! ステージシーケンサ
//!
//! 固定順のステージを1つずつ running → completed に進め、全ステージ完了後に
//! 検出結果を合成する。待機はtokioのタイマーで行い、`reset` で中断できる。
//!
//! 1インスタンスで同時に実行できる解析は1つだけ。並行した `run` 呼び出しは
//! サポートしておらず、`AlreadyRunning` で拒否される。

use super::observer::StageObserver;
use crate::error::{ForgeDetectError, Result};
use forge_detect_common::{
    image_format, initial_stages, synthesize, DetectionResult, ImageFile, ScoreSource,
    SeededSource, Stage, StageStatus,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// 1ステージあたりの待機時間 [MIN, MIN + SPAN) ミリ秒
pub const STAGE_DELAY_MIN_MS: f64 = 500.0;
pub const STAGE_DELAY_SPAN_MS: f64 = 1000.0;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct RunState {
    steps: Vec<Stage>,
    result: Option<DetectionResult>,
    /// run開始とresetのたびに増える。古い実行の書き込みを弾くために使う
    generation: u64,
    running: bool,
}

pub struct StageSequencer {
    catalog: Vec<Stage>,
    state: Mutex<RunState>,
    source: Mutex<Box<dyn ScoreSource + Send>>,
    observers: Mutex<Vec<Arc<dyn StageObserver>>>,
    cancel_tx: watch::Sender<u64>,
}

impl Default for StageSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl StageSequencer {
    pub fn new() -> Self {
        Self::with_source(SeededSource::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_source(SeededSource::from_seed(seed))
    }

    pub fn with_source(source: impl ScoreSource + Send + 'static) -> Self {
        let catalog = initial_stages();
        let (cancel_tx, _) = watch::channel(0);

        Self {
            state: Mutex::new(RunState {
                steps: catalog.clone(),
                result: None,
                generation: 0,
                running: false,
            }),
            catalog,
            source: Mutex::new(Box::new(source)),
            observers: Mutex::new(Vec::new()),
            cancel_tx,
        }
    }

    pub fn add_observer(&self, observer: Arc<dyn StageObserver>) {
        lock(&self.observers).push(observer);
    }

    /// 現在のステージ一覧のスナップショット
    pub fn steps(&self) -> Vec<Stage> {
        lock(&self.state).steps.clone()
    }

    /// 最後に完了した解析結果（reset または新しいrunでクリアされる）
    pub fn result(&self) -> Option<DetectionResult> {
        lock(&self.state).result.clone()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).running
    }

    pub fn stage_count(&self) -> usize {
        self.catalog.len()
    }

    /// 全ステージを初期状態に戻す
    ///
    /// 実行中の解析があれば無効化され、その `run` は `Cancelled` を返す。
    pub fn reset(&self) {
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.running = false;
            state.result = None;
            state.steps = self.catalog.clone();
            self.emit(&state.steps);
            state.generation
        };

        self.cancel_tx.send_replace(generation);
        tracing::debug!(generation, "sequencer reset");
    }

    /// 解析を実行
    ///
    /// ファイル未指定やサブタイプのないメディアタイプは、どのステージも
    /// 変化させずに `InvalidInput` を返す。
    pub async fn run(&self, file: Option<&ImageFile>) -> Result<DetectionResult> {
        let file = file
            .ok_or_else(|| ForgeDetectError::InvalidInput("ファイルが指定されていません".into()))?;
        image_format(&file.media_type)
            .map_err(|e| ForgeDetectError::InvalidInput(e.to_string()))?;

        let generation = self.begin()?;
        let _guard = RunGuard {
            sequencer: self,
            generation,
        };
        let mut cancel_rx = self.cancel_tx.subscribe();
        let started = Instant::now();

        tracing::info!(file = %file.name, bytes = file.byte_length, generation, "analysis started");

        for index in 0..self.catalog.len() {
            self.transition(generation, index, StageStatus::Running, None)?;

            let delay = self.draw_stage_delay();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel_rx.changed() => {}
            }

            let duration_ms = (delay.as_secs_f64() * 1000.0).round() as u64;
            self.transition(generation, index, StageStatus::Completed, Some(duration_ms))?;
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let result = {
            let mut source = lock(&self.source);
            synthesize(file, elapsed_ms, &mut **source)?
        };

        self.finish(generation, result)
    }

    fn begin(&self) -> Result<u64> {
        let mut state = lock(&self.state);
        if state.running {
            tracing::warn!("run requested while another run is active");
            return Err(ForgeDetectError::AlreadyRunning);
        }

        state.generation += 1;
        state.running = true;
        state.result = None;
        state.steps = self.catalog.clone();
        self.emit(&state.steps);
        Ok(state.generation)
    }

    fn draw_stage_delay(&self) -> Duration {
        let unit = lock(&self.source).next_unit();
        Duration::from_secs_f64((STAGE_DELAY_MIN_MS + unit * STAGE_DELAY_SPAN_MS) / 1000.0)
    }

    fn transition(
        &self,
        generation: u64,
        index: usize,
        status: StageStatus,
        duration: Option<u64>,
    ) -> Result<()> {
        let mut state = lock(&self.state);
        if state.generation != generation {
            tracing::warn!(generation, stage = index, "run invalidated by reset");
            return Err(ForgeDetectError::Cancelled);
        }

        let stage = &mut state.steps[index];
        stage.status = status;
        if status == StageStatus::Completed {
            stage.duration = duration;
        }
        self.emit(&state.steps);
        Ok(())
    }

    fn finish(&self, generation: u64, result: DetectionResult) -> Result<DetectionResult> {
        let mut state = lock(&self.state);
        if state.generation != generation {
            return Err(ForgeDetectError::Cancelled);
        }

        state.running = false;
        state.result = Some(result.clone());
        tracing::info!(
            classification = %result.classification,
            overall_score = result.overall_score,
            processing_ms = result.processing_time,
            "analysis finished"
        );
        Ok(result)
    }

    fn emit(&self, steps: &[Stage]) {
        for observer in lock(&self.observers).iter() {
            observer.on_snapshot(steps);
        }
    }
}

/// run終了時（エラー・中断・future破棄を含む）に実行中フラグを下ろす
struct RunGuard<'a> {
    sequencer: &'a StageSequencer,
    generation: u64,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(&self.sequencer.state);
        if state.generation == self.generation {
            state.running = false;
        }
    }
}
