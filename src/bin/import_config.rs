// Small dev utility: read or override import settings stored in config_kv.
//
// Usage:
//   cargo run --bin import_config -- <db_path>                 # print effective settings
//   cargo run --bin import_config -- <db_path> <key> <value>   # set a global key
//
// Keys: import/max_upload_bytes, import/allowed_extensions, import/upload_dir, app/locale

use broker_crm::config::{config_keys, ConfigManager, ImportSettings};

const KNOWN_KEYS: [&str; 4] = [
    config_keys::MAX_UPLOAD_BYTES,
    config_keys::ALLOWED_EXTENSIONS,
    config_keys::UPLOAD_DIR,
    config_keys::LOCALE,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let db_path = args.next().unwrap_or_else(|| "broker_crm.db".to_string());

    let config = ConfigManager::new(&db_path)?;

    if let (Some(key), Some(value)) = (args.next(), args.next()) {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            return Err(format!("Unknown key: {} (expected one of {:?})", key, KNOWN_KEYS).into());
        }
        config.set_global_config_value(&key, &value)?;
        println!("{}={}", key, value);
    }

    let settings = ImportSettings::load(&config).await?;
    println!("max_upload_bytes={}", settings.max_upload_bytes);
    println!(
        "allowed_extensions={}",
        settings
            .allowed_formats
            .iter()
            .map(|f| f.extension())
            .collect::<Vec<_>>()
            .join(",")
    );
    println!("upload_dir={}", settings.upload_dir.display());
    println!("locale={}", settings.locale);
    Ok(())
}
