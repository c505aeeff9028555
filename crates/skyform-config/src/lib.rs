//! Skyform の設定管理
//!
//! `sky.json` から環境ごとの設定（リージョン、VPC、S3 バケット）を読み込み、
//! デフォルト値を適用した型付きモデルとして提供します。
//! ネストしたキーの存在チェックはロード時に一度だけ行い、
//! 以降の利用側は構造体フィールドとして参照します。

pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn default_project() -> String {
    "skyform".to_string()
}

fn default_cidr() -> String {
    "10.0.0.0/16".to_string()
}

fn default_max_azs() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

/// 設定ファイル全体
///
/// トップレベルの `context` が環境名 → 環境設定のマップになっています。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyConfig {
    /// タグ付けに使うプロジェクト名
    #[serde(default = "default_project")]
    pub project: String,

    /// 環境名 → 環境設定
    #[serde(default)]
    pub context: HashMap<String, EnvConfig>,
}

/// 環境ごとの設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvConfig {
    /// デプロイ先リージョン
    pub region: Option<String>,

    /// VPC 設定（ない場合はネットワークスタックを構築できない）
    pub vpc: Option<VpcConfig>,

    /// S3 バケット定義のリスト（定義順に構築される）
    #[serde(default)]
    pub s3: Vec<BucketConfig>,
}

impl EnvConfig {
    /// すべて未設定の空環境かどうか
    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.vpc.is_none() && self.s3.is_empty()
    }
}

/// VPC 設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpcConfig {
    /// VPC の CIDR ブロック
    #[serde(default = "default_cidr")]
    pub cidr: String,

    /// 使用するアベイラビリティゾーン数
    #[serde(default = "default_max_azs")]
    pub max_azs: u32,

    #[serde(default = "default_true")]
    pub enable_dns_hostnames: bool,

    #[serde(default = "default_true")]
    pub enable_dns_support: bool,

    /// NAT ゲートウェイを作成するか（プライベートサブネットの外向き経路）
    #[serde(default = "default_true")]
    pub enable_nat_gateway: bool,
}

impl Default for VpcConfig {
    fn default() -> Self {
        Self {
            cidr: default_cidr(),
            max_azs: default_max_azs(),
            enable_dns_hostnames: true,
            enable_dns_support: true,
            enable_nat_gateway: true,
        }
    }
}

/// S3 バケット定義
///
/// `bucket_name` を持たないエントリは構築時に警告付きでスキップされます。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketConfig {
    pub bucket_name: Option<String>,

    /// 将来の拡張用フィールド（受け付けるが現状は未使用）
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl SkyConfig {
    /// 指定パスの JSON 設定ファイルを読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 環境設定を取得する
    ///
    /// エントリが存在しない、または空（region も vpc も s3 もない）場合は
    /// `UnknownEnvironment` を返します。
    pub fn environment(&self, name: &str) -> Result<&EnvConfig> {
        match self.context.get(name) {
            Some(env) if !env.is_empty() => Ok(env),
            _ => Err(ConfigError::UnknownEnvironment(name.to_string())),
        }
    }

    /// リージョンを解決する（明示的なオーバーライドが最優先）
    pub fn region_for(&self, name: &str, override_region: Option<&str>) -> Result<String> {
        if let Some(region) = override_region {
            return Ok(region.to_string());
        }

        self.environment(name)?
            .region
            .clone()
            .ok_or_else(|| ConfigError::MissingRegion(name.to_string()))
    }
}

/// プロジェクトの設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 SKY_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: sky.local.json, .sky.local.json, sky.json, .sky.json
/// 3. ./.skyform/ ディレクトリ内: 同様の順序
pub fn find_config_file() -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var("SKY_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    let candidates = ["sky.local.json", ".sky.local.json", "sky.json", ".sky.json"];

    // 2. カレントディレクトリで検索
    for filename in &candidates {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. ./.skyform/ ディレクトリで検索
    let sky_dir = current_dir.join(".skyform");
    if sky_dir.is_dir() {
        for filename in &candidates {
            let path = sky_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}
