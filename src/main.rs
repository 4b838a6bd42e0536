// ==========================================
// Courtier CRM - 命令行入口
// ==========================================
// 用法:
//   broker-crm <db_path> <fichier> <operator_id>   导入客户文件，输出 JSON 响应
//   broker-crm --template                          输出导入模板
// db_path 为 "-" 时使用默认路径（BROKER_CRM_DB_PATH 或用户数据目录）
// ==========================================

use anyhow::{bail, Context};
use broker_crm::app::{get_default_db_path, AppState};
use broker_crm::importer::TEMPLATE_CSV;
use broker_crm::logging;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [flag] if flag == "--template" => {
            print!("{}", TEMPLATE_CSV);
            Ok(())
        }
        [db_path, file, operator_id] => run_import(db_path, file, operator_id).await,
        _ => {
            eprintln!("{} {}", broker_crm::APP_NAME, broker_crm::VERSION);
            eprintln!("usage: broker-crm <db_path|-> <fichier> <operator_id>");
            eprintln!("       broker-crm --template");
            bail!("arguments invalides")
        }
    }
}

async fn run_import(db_path: &str, file: &str, operator_id: &str) -> anyhow::Result<()> {
    let operator_id: i64 = operator_id
        .trim()
        .parse()
        .with_context(|| format!("operator_id invalide: {}", operator_id))?;

    let db_path = if db_path == "-" {
        get_default_db_path()
    } else {
        db_path.to_string()
    };

    let state = AppState::new(db_path)
        .await
        .map_err(anyhow::Error::msg)
        .context("initialisation impossible")?;

    // 上传模拟：复制到暂存目录，原文件保持不变
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("lecture impossible: {}", file))?;
    let original_name = Path::new(file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file);
    let upload = state.import_api.upload_store().stage(&bytes, original_name).await?;

    let response = state
        .import_api
        .import_clients(Some(upload), Some(operator_id))
        .await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
