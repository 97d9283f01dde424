use account_ui::client::{byte_progress_bar, ApiClient};
use account_ui::{cli, config, error, scanner};
use account_ui_common::{AddressApi, NominatimApi, PasswordCheck};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use dialoguer::Confirm;
use error::{AccountUiError, Result};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut config = Config::load()?;

    match cli.command {
        Commands::Upload { folder, endpoint, csrf_token, yes } => {
            println!("📸 account-ui - 写真アップロード\n");

            // 1. スキャン
            println!("[1/2] 写真をスキャン中...");
            let pending = scanner::pending_from_folder(&folder, config.endpoints.max_pending_files)?;
            let endpoint = config.upload_endpoint(endpoint)?;
            println!("✔ {}\n", pending.total_label());

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("{} に送信しますか?", endpoint))
                    .default(true)
                    .interact()
                    .map_err(|e| AccountUiError::Prompt(e.to_string()))?;
                if !confirmed {
                    return Err(AccountUiError::Cancelled);
                }
            }

            // 2. 送信
            println!("[2/2] 送信中...");
            let total: u64 = pending.files().iter().map(|image| image.size).sum();
            let progress = byte_progress_bar(total);
            let client = ApiClient::new()?;
            let outcome = client
                .upload_photos(&endpoint, pending.files(), csrf_token.as_deref(), &progress)
                .await;
            progress.finish_and_clear();

            match outcome? {
                account_ui_common::UploadOutcome::Success { message, redirect_url } => {
                    println!("✅ {}", message);
                    if let Some(url) = redirect_url {
                        println!("→ {}", url);
                    }
                }
                account_ui_common::UploadOutcome::Failure { message } => {
                    return Err(AccountUiError::ApiCall(message));
                }
            }
        }

        Commands::CheckPhone { number, base_url } => {
            let base = match base_url {
                Some(base) => base,
                None => config.phone_check_base()?,
            };
            let client = ApiClient::new()?;
            let exists = client.check_phone(&base, &number).await?;
            if exists {
                println!("✔ {}: exists", number.trim());
            } else {
                println!("✘ {}: {}", number.trim(), account_ui_common::contacts::MSG_UNKNOWN_NUMBER);
            }
        }

        Commands::SearchAddress { query, limit } => {
            let api = AddressApi::new(config.endpoints.address_api_base.clone());
            let client = ApiClient::new()?;
            let candidates = client.search_address(&api, &query, limit).await?;
            if candidates.is_empty() {
                println!("候補なし");
            }
            for candidate in candidates {
                println!(
                    "{}\t{}, {}",
                    candidate.label, candidate.latitude, candidate.longitude
                );
            }
        }

        Commands::Reverse { lat, lon } => {
            let api = AddressApi::new(config.endpoints.address_api_base.clone());
            let client = ApiClient::new()?;
            match client.reverse(&api, lat, lon).await? {
                Some(candidate) => println!("{}", candidate.search_text()),
                None => println!("候補なし"),
            }
        }

        Commands::Geocode { address, postal_code, city } => {
            let api = NominatimApi::new(config.endpoints.nominatim_base.clone());
            let client = ApiClient::new()?;
            match client.geocode_company(&api, &address, &postal_code, &city).await? {
                Some((lat, lon)) => println!("{}, {}", lat, lon),
                None => println!("座標が見つかりません"),
            }
        }

        Commands::CheckPassword { password } => {
            let check = PasswordCheck::new(&password);
            for (rule, passed) in check.rules() {
                println!("{} {}", if passed { "✔" } else { "✘" }, rule.description());
            }
            if !check.is_valid() {
                let failed: Vec<&str> = check.failed_rules().iter().map(|r| r.element_id()).collect();
                return Err(AccountUiError::WeakPassword(failed.join(", ")));
            }
        }

        Commands::Config { show, set_server, set_upload_endpoint } => {
            if let Some(server) = set_server {
                config.set_server(server)?;
                println!("✔ サーバーを保存しました");
            }
            if let Some(endpoint) = set_upload_endpoint {
                config.set_upload_endpoint(endpoint)?;
                println!("✔ アップロード先を保存しました");
            }

            if show {
                println!("設定ファイル: {}", Config::config_path()?.display());
                println!(
                    "server: {}",
                    config.server().unwrap_or_else(|| "(未設定)".into())
                );
                println!("{}", config.endpoints.to_json_pretty()?);
            }
        }
    }

    Ok(())
}
