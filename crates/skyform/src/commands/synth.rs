use anyhow::Context;
use colored::Colorize;
use skyform_config::SkyConfig;
use skyform_synth::{App, DeployEnv, NetworkBuilder, Stack, StorageBuilder};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_ENV: &str = "development";

pub fn handle(
    env: Option<String>,
    config_path: Option<PathBuf>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let env_name = env.unwrap_or_else(|| DEFAULT_ENV.to_string());

    let config_path = match config_path {
        Some(path) => path,
        None => skyform_config::find_config_file()?,
    };
    let config = SkyConfig::load(&config_path)?;

    let env_config = config.environment(&env_name)?;

    // アカウントはプロセス環境から、リージョンはオーバーライド優先で解決
    let account = std::env::var("SKY_ACCOUNT")
        .context("SKY_ACCOUNT 環境変数でアカウントIDを指定してください")?;
    let region_override = std::env::var("SKY_REGION").ok();
    let region = config.region_for(&env_name, region_override.as_deref())?;

    info!(env = %env_name, region = %region, account = %account, "synthesizing");
    println!("環境: {}", env_name.cyan());
    println!("リージョン: {}", region.cyan());
    println!("アカウント: {}", account.cyan());

    let deploy_env = DeployEnv {
        account,
        region: region.clone(),
    };

    // VPCスタック
    let mut vpc_stack = Stack::new(
        format!("VpcStack-{env_name}"),
        format!("VPC infrastructure for {env_name} environment"),
        deploy_env.clone(),
    );
    NetworkBuilder::new(&env_name, env_config.vpc.as_ref())?.build(&mut vpc_stack)?;

    // S3スタック
    let mut s3_stack = Stack::new(
        format!("S3Stack-{env_name}"),
        format!("S3 buckets for {env_name} environment"),
        deploy_env,
    );
    StorageBuilder::new(&env_name, &env_config.s3).build(&mut s3_stack)?;

    // 両スタックの全リソースに共通タグを付与
    for stack in [&mut vpc_stack, &mut s3_stack] {
        stack.set_tag("Environment", env_name.as_str());
        stack.set_tag("Project", config.project.as_str());
        stack.set_tag("Region", region.as_str());
    }

    println!();
    let mut app = App::new(&output);
    for stack in [vpc_stack, s3_stack] {
        println!(
            "  {} ({}リソース)",
            stack.name().cyan(),
            stack.resource_count()
        );
        app.add_stack(stack);
    }

    let written = app.synth()?;

    println!();
    println!("{}", "✓ テンプレートを出力しました".green().bold());
    for path in &written {
        println!("  • {}", path.display().to_string().cyan());
    }

    Ok(())
}
