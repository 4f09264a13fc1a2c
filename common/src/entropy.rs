//! 乱数源
//!
//! スコア合成とステージ待機時間はすべてこのトレイト経由で乱数を引く。
//! テストでは固定列を与えて境界値を再現する。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// [0, 1) の一様乱数を返す乱数源
pub trait ScoreSource {
    fn next_unit(&mut self) -> f64;
}

/// StdRngによる乱数源
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ScoreSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// 固定列を循環して返す乱数源
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// 値は [0, 1) に丸められる。空の場合は常に0.0を返す。
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// 同じ値を返し続ける
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl ScoreSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
