use crate::error::{ForgeDetectError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SEED_ENV: &str = "FORGE_DETECT_SEED";
const DEFAULT_MAX_UPLOAD_MB: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// アップロード上限（MB）
    pub max_upload_mb: u64,
    /// 固定シード（未設定なら毎回ランダム）
    pub seed: Option<u64>,
    /// JSON形式でログ出力
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            seed: None,
            log_json: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ForgeDetectError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("forge-detect").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if self.max_upload_mb == 0 {
            return Err(ForgeDetectError::Config(
                "max_upload_mb は1以上を指定してください".into(),
            ));
        }
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }

    /// 有効なシード（環境変数を優先）
    pub fn effective_seed(&self) -> Result<Option<u64>> {
        match std::env::var(SEED_ENV) {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| ForgeDetectError::Config(format!("{} が数値ではありません: {}", SEED_ENV, value))),
            Err(_) => Ok(self.seed),
        }
    }

    pub fn set_seed(&mut self, seed: Option<u64>) -> Result<()> {
        self.seed = seed;
        self.save()
    }

    pub fn set_max_upload_mb(&mut self, mb: u64) -> Result<()> {
        self.max_upload_mb = mb;
        self.save()
    }
}
