mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sky")]
#[command(about = "描く。畳む。クラウドは、宣言になった。", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 環境のテンプレートを合成
    Synth {
        /// 環境名 (development, staging, production など)
        env: Option<String>,
        /// 環境名 (-e/--env フラグ、SKY_ENV 環境変数)
        #[arg(
            short = 'e',
            long = "env",
            env = "SKY_ENV",
            conflicts_with = "env",
            hide = true
        )]
        env_flag: Option<String>,
        /// 設定ファイルのパス（省略時は自動検出）
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// テンプレートの出力先ディレクトリ
        #[arg(short, long, default_value = "sky.out")]
        output: PathBuf,
    },
    /// 設定を検証
    Validate {
        /// 環境名（省略時は全環境のサマリーを表示）
        env: Option<String>,
        /// 設定ファイルのパス（省略時は自動検出）
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// バージョン情報を表示
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrに出力（RUST_LOGで制御）
    tracing_subscriber::fmt::init();

    match cli.command {
        Commands::Synth {
            env,
            env_flag,
            config,
            output,
        } => {
            let env = env.or(env_flag);
            commands::synth::handle(env, config, output)?;
        }
        Commands::Validate { env, config } => {
            commands::validate::handle(env, config)?;
        }
        Commands::Version => {
            println!("skyform {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
