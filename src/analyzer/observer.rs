//! ステージ遷移の通知先
//!
//! シーケンサは遷移のたびにステージ一覧全体のスナップショットを送る。
//! 1ステージにつき running / completed の2回。

use forge_detect_common::{stage_progress, Stage, StageStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};

/// スナップショットの受け取り口
///
/// シーケンサの内部ロック中に呼ばれるため、シーケンサのメソッドを呼び返してはならない。
pub trait StageObserver: Send + Sync {
    fn on_snapshot(&self, steps: &[Stage]);
}

/// 受け取ったスナップショットを全て保持する
#[derive(Debug, Default)]
pub struct RecordingObserver {
    snapshots: Mutex<Vec<Vec<Stage>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<Vec<Stage>> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StageObserver for RecordingObserver {
    fn on_snapshot(&self, steps: &[Stage]) {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(steps.to_vec());
    }
}

/// 遷移をtracingに記録する
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
    fn on_snapshot(&self, steps: &[Stage]) {
        if let Some(stage) = steps.iter().find(|s| s.status == StageStatus::Running) {
            tracing::debug!(stage = %stage.id, "stage running");
        } else if let Some(stage) = steps.iter().rev().find(|s| s.status == StageStatus::Completed) {
            tracing::debug!(stage = %stage.id, duration_ms = ?stage.duration, "stage completed");
        } else {
            tracing::trace!("stages reset to pending");
        }
    }
}

/// indicatifのプログレスバー表示
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new(stage_count: usize) -> Self {
        let style = ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");

        let bar = ProgressBar::new(stage_count as u64);
        bar.set_style(style);
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }

    /// 表示を閉じる（中断時など）
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl StageObserver for ProgressBarObserver {
    fn on_snapshot(&self, steps: &[Stage]) {
        let completed = steps
            .iter()
            .filter(|s| s.status == StageStatus::Completed)
            .count();
        self.bar.set_position(completed as u64);

        match steps.iter().find(|s| s.status == StageStatus::Running) {
            Some(stage) => self.bar.set_message(stage.label.clone()),
            None if stage_progress(steps) >= 1.0 => self.bar.set_message("completed"),
            None => self.bar.set_message(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_detect_common::initial_stages;

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        assert!(observer.is_empty());

        let mut steps = initial_stages();
        observer.on_snapshot(&steps);
        steps[0].status = StageStatus::Running;
        observer.on_snapshot(&steps);

        let snapshots = observer.snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0][0].status, StageStatus::Pending);
        assert_eq!(snapshots[1][0].status, StageStatus::Running);
    }

    #[test]
    fn test_progress_bar_observer_tracks_position() {
        let observer = ProgressBarObserver::new(8);
        let mut steps = initial_stages();
        steps[0].status = StageStatus::Completed;
        steps[0].duration = Some(900);
        steps[1].status = StageStatus::Running;

        observer.on_snapshot(&steps);
        assert_eq!(observer.bar.position(), 1);
        assert_eq!(observer.bar.message(), "Error Level Analysis");
    }
}
