use colored::Colorize;
use skyform_config::{EnvConfig, SkyConfig};
use std::path::PathBuf;

pub fn handle(env: Option<String>, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    println!("{}", "設定を検証中...".blue());

    let config_path = match config_path {
        Some(path) => path,
        None => skyform_config::find_config_file()?,
    };
    println!(
        "設定ファイル: {}",
        config_path.display().to_string().cyan()
    );

    let config = SkyConfig::load(&config_path)?;

    if let Some(env_name) = &env {
        let env_config = config.environment(env_name)?;
        println!("{}", "✓ 設定ファイルは正常です！".green().bold());
        println!();
        print_environment(env_name, env_config);
    } else {
        println!("{}", "✓ 設定ファイルは正常です！".green().bold());
        println!();
        println!("サマリー:");
        println!("  プロジェクト: {}", config.project.cyan());
        println!("  環境: {}個", config.context.len());

        let mut names: Vec<_> = config.context.keys().collect();
        names.sort();
        for name in names {
            let env_config = &config.context[name];
            let region = env_config.region.as_deref().unwrap_or("(未設定)");
            let vpc = if env_config.vpc.is_some() {
                "あり"
            } else {
                "なし"
            };
            println!(
                "    - {} (region: {}, vpc: {}, バケット: {}個)",
                name.cyan(),
                region,
                vpc,
                env_config.s3.len()
            );
        }
    }

    Ok(())
}

fn print_environment(name: &str, env_config: &EnvConfig) {
    println!("環境 {}:", name.cyan());
    println!(
        "  region: {}",
        env_config.region.as_deref().unwrap_or("(未設定)")
    );

    match &env_config.vpc {
        Some(vpc) => {
            println!("  vpc: {} (AZ x{})", vpc.cidr.cyan(), vpc.max_azs);
            if !vpc.enable_nat_gateway {
                println!("    NATゲートウェイ: 無効");
            }
        }
        None => println!("  vpc: なし"),
    }

    println!("  バケット: {}個", env_config.s3.len());
    for bucket in &env_config.s3 {
        match &bucket.bucket_name {
            Some(bucket_name) => println!("    - {}", bucket_name.cyan()),
            None => println!("    - {}", "(bucket_name なし、スキップされます)".yellow()),
        }
    }
}
