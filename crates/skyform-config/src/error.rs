use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ファイルが見つかりません: {}", .0.display())]
    NotFound(PathBuf),

    #[error(
        "設定ファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリ: sky.json, sky.local.json, .sky.json, .sky.local.json\n\
        - ./.skyform/ ディレクトリ\n\
        または SKY_CONFIG_PATH 環境変数で直接指定できます"
    )]
    ConfigFileNotFound,

    #[error("{} のJSONが不正です: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("環境 '{0}' が設定の context に存在しません")]
    UnknownEnvironment(String),

    #[error("環境 '{0}' に region が設定されていません")]
    MissingRegion(String),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
