use asset_config::config;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let snapshot = config::initialize();
    info!(
        "Serving {} on {} (production: {})",
        snapshot.app.name,
        config::server_address(),
        config::is_production()
    );

    // 输出生效配置，密钥已脱敏
    println!("{}", serde_json::to_string_pretty(&snapshot.redacted())?);

    Ok(())
}
