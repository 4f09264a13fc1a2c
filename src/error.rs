use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeDetectError {
    #[error("入力が不正です: {0}")]
    InvalidInput(String),

    #[error("解析はすでに実行中です（同時実行は未サポート）")]
    AlreadyRunning,

    #[error("解析はリセットにより中断されました")]
    Cancelled,

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("ファイルサイズが上限を超えています: {path} ({size} bytes > {limit} bytes)")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    #[error("画像ファイルではありません: {0}")]
    UnsupportedMediaType(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] forge_detect_common::Error),
}

impl ForgeDetectError {
    /// 実行前に検出される入力エラーかどうか（ステージは一切変化しない）
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ForgeDetectError::InvalidInput(_)
                | ForgeDetectError::FileNotFound(_)
                | ForgeDetectError::FileTooLarge { .. }
                | ForgeDetectError::UnsupportedMediaType(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ForgeDetectError>;
