use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines

use checkout_store::{
    config::Config,
    database::{create_pool, run_migrations},
    schema::SchemaRegistry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml()?;

    let pool = create_pool(&config.database).await?;
    run_migrations(&pool).await?;
    log::info!("Database schema is up to date");

    let registry = SchemaRegistry::checkout();
    for table in registry.tables() {
        log::info!(
            "Table {}: {}",
            table.name,
            table.constraint_names().join(", ")
        );
    }

    Ok(())
}
