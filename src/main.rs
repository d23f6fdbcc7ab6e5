use clap::Parser;
use serde::Serialize;
use sp_rest::core::ConnectionProvider;
use sp_rest::utils::error::ErrorCategory;
use sp_rest::utils::{logger, validation::Validate};
use sp_rest::{
    CliConfig, CollectionQuery, Command, ConnectionSettings, Folders, Projection, ReqwestTransport,
    Resource, SpRest, TomlConfig, Web,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let profile = match &cli.config {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };

    // 初始化日誌：旗標優先於設定檔
    let format = cli
        .log_format
        .or_else(|| profile.log_format().and_then(|f| f.parse().ok()))
        .unwrap_or_default();
    logger::init_cli_logger(cli.verbose, profile.log_level(), format);

    tracing::debug!("CLI config: {:?}", cli.command);

    let settings = ConnectionSettings::from_toml(&profile).with_overrides(
        cli.site_url.clone(),
        cli.token.clone(),
        cli.timeout_seconds,
    );

    if let Err(e) = profile.validate().and_then(|_| settings.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let transport = Arc::new(ReqwestTransport::from_connection(&settings));
    let sp = SpRest::new(settings.site_url(), transport);

    match run(&sp.web(), cli.command).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!("❌ Request failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.category() {
                ErrorCategory::Configuration => 1,
                ErrorCategory::Remote => 2,
                ErrorCategory::Network => 3,
                ErrorCategory::Data => 4,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn sub_folders(web: &Web, parent: Option<&str>) -> Folders {
    match parent {
        Some(path) => web.get_folder_by_server_relative_url(path).folders(),
        None => web.folders(),
    }
}

fn pretty<T: Serialize>(value: &T) -> sp_rest::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

async fn run(web: &Web, command: Command) -> sp_rest::Result<String> {
    match command {
        Command::Folders { path, top, select } => {
            let mut folders = sub_folders(web, path.as_deref());
            if !select.is_empty() {
                let fields: Vec<&str> = select.iter().map(String::as_str).collect();
                folders = folders.select(&fields);
            }
            if let Some(top) = top {
                folders = folders.top(top);
            }
            pretty(&folders.get().await?)
        }
        Command::Info { path } => pretty(&web.get_folder_by_server_relative_url(&path).get().await?),
        Command::Files { path } => pretty(
            &web.get_folder_by_server_relative_url(&path)
                .files()
                .get()
                .await?,
        ),
        Command::ItemCount { path } => {
            let count = web
                .get_folder_by_server_relative_url(&path)
                .item_count()
                .get_property()
                .await?;
            Ok(count.to_string())
        }
        Command::Add { parent, name } => {
            let result = sub_folders(web, parent.as_deref()).add(&name).await?;
            tracing::info!("✅ Folder available at {}", result.folder.to_url());
            pretty(&result.data)
        }
        Command::Delete { path, etag } => {
            web.get_folder_by_server_relative_url(&path)
                .delete_if_match(&etag)
                .await?;
            Ok(format!("Deleted {}", path))
        }
        Command::Recycle { path } => web.get_folder_by_server_relative_url(&path).recycle().await,
        Command::Cat { path } => web.get_file_by_server_relative_url(&path).get_text().await,
    }
}
