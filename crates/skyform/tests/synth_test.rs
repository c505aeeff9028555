#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"{
    "project": "pycon",
    "context": {
        "development": {
            "region": "ap-northeast-1",
            "vpc": { "cidr": "10.0.0.0/16", "max_azs": 2 },
            "s3": [
                { "bucket_name": "logs-bucket" },
                { "purpose": "misconfigured entry without a name" }
            ]
        },
        "noregion": {
            "vpc": {}
        }
    }
}"#;

fn sky(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sky").unwrap();
    cmd.current_dir(dir)
        .env_remove("SKY_CONFIG_PATH")
        .env_remove("SKY_ENV")
        .env_remove("SKY_REGION")
        .env("SKY_ACCOUNT", "123456789012");
    cmd
}

fn read_template(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn count_resources(template: &Value, resource_type: &str) -> usize {
    template["Resources"]
        .as_object()
        .unwrap()
        .values()
        .filter(|r| r["Type"] == resource_type)
        .count()
}

/// 一通りのsynthが両スタックのテンプレートを出力することを確認
#[test]
fn test_synth_emits_both_templates() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sky.json"), CONFIG).unwrap();

    sky(dir.path())
        .arg("synth")
        .arg("development")
        .assert()
        .success();

    let vpc_path = dir
        .path()
        .join("sky.out/VpcStack-development.template.json");
    let s3_path = dir.path().join("sky.out/S3Stack-development.template.json");
    assert!(vpc_path.exists());
    assert!(s3_path.exists());

    let vpc = read_template(&vpc_path);
    assert_eq!(count_resources(&vpc, "AWS::EC2::Subnet"), 6);
    assert_eq!(count_resources(&vpc, "AWS::EC2::VPCEndpoint"), 2);

    let outputs = vpc["Outputs"].as_object().unwrap();
    for id in [
        "VpcIdDevelopment",
        "VpcCidrDevelopment",
        "PublicSubnetIdsDevelopment",
        "PrivateSubnetIdsDevelopment",
        "WebSecurityGroupIdDevelopment",
        "DatabaseSecurityGroupIdDevelopment",
    ] {
        assert!(outputs.contains_key(id), "missing output {id}");
    }

    // 名前のないs3エントリはスキップされる
    let s3 = read_template(&s3_path);
    assert_eq!(count_resources(&s3, "AWS::S3::Bucket"), 1);
    assert_eq!(
        s3["Resources"]["LogsBucket"]["DeletionPolicy"],
        "Retain"
    );
}

/// 共通タグが両スタックのリソースに付与されることを確認
#[test]
fn test_synth_applies_common_tags() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sky.json"), CONFIG).unwrap();

    sky(dir.path())
        .arg("synth")
        .arg("development")
        .assert()
        .success();

    let s3 = read_template(&dir.path().join("sky.out/S3Stack-development.template.json"));
    let tags = s3["Resources"]["LogsBucket"]["Properties"]["Tags"]
        .as_array()
        .unwrap();

    let tag_value = |key: &str| {
        tags.iter()
            .find(|t| t["Key"] == key)
            .map(|t| t["Value"].clone())
    };
    assert_eq!(tag_value("Environment").unwrap(), "development");
    assert_eq!(tag_value("Project").unwrap(), "pycon");
    assert_eq!(tag_value("Region").unwrap(), "ap-northeast-1");
}

/// 存在しない環境を指定するとエラーになることを確認
#[test]
fn test_synth_unknown_environment() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sky.json"), CONFIG).unwrap();

    sky(dir.path())
        .arg("synth")
        .arg("staging")
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

/// SKY_ACCOUNT未設定でエラーになることを確認
#[test]
fn test_synth_requires_account() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sky.json"), CONFIG).unwrap();

    sky(dir.path())
        .env_remove("SKY_ACCOUNT")
        .arg("synth")
        .arg("development")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SKY_ACCOUNT"));
}

/// regionのない環境はエラーになることを確認
#[test]
fn test_synth_missing_region() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sky.json"), CONFIG).unwrap();

    sky(dir.path())
        .arg("synth")
        .arg("noregion")
        .assert()
        .failure()
        .stderr(predicate::str::contains("region"));
}

/// SKY_ENV環境変数で環境を選べることを確認
#[test]
fn test_env_variable_selects_environment() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sky.json"), CONFIG).unwrap();

    sky(dir.path())
        .env("SKY_ENV", "development")
        .arg("synth")
        .assert()
        .success();

    assert!(
        dir.path()
            .join("sky.out/VpcStack-development.template.json")
            .exists()
    );
}

/// SKY_REGIONオーバーライドがエンドポイント名まで反映されることを確認
#[test]
fn test_region_override() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sky.json"), CONFIG).unwrap();

    sky(dir.path())
        .env("SKY_REGION", "us-west-2")
        .arg("synth")
        .arg("development")
        .assert()
        .success();

    let vpc = read_template(
        &dir.path()
            .join("sky.out/VpcStack-development.template.json"),
    );
    assert_eq!(
        vpc["Resources"]["S3GatewayEndpoint"]["Properties"]["ServiceName"],
        "com.amazonaws.us-west-2.s3"
    );
}

/// validateが設定のサマリーを表示することを確認
#[test]
fn test_validate_summary() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sky.json"), CONFIG).unwrap();

    sky(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("development"))
        .stdout(predicate::str::contains("pycon"));
}

/// validateで存在しない環境を指定するとエラーになることを確認
#[test]
fn test_validate_unknown_environment() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sky.json"), CONFIG).unwrap();

    sky(dir.path())
        .arg("validate")
        .arg("staging")
        .assert()
        .failure();
}
