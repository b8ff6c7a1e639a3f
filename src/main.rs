use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use meme_gen::{cli, client, config, download, generate, monitor, prompt, resize, upload};
use meme_gen_common::input::MAX_DESCRIPTION_CHARS;
use meme_gen_common::validator::ACCEPTED_MIME_TYPES;
use meme_gen_common::{
    GenerationBackend, MemoryHandleStore, ResizeOptions, ServerStatus, Session,
};
use cli::{Cli, Commands};
use client::HttpBackend;
use config::{Config, API_URL_ENV};
use std::sync::Arc;
use std::time::Duration;
use upload::LocalImage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::load()?;

    match cli.command {
        Commands::Health => {
            let endpoint = config.endpoint(cli.api_url.as_deref())?;
            let backend = HttpBackend::new(endpoint)?;

            if backend.check_health().await {
                println!("✔ サーバーはオンラインです ({})", backend.endpoint().base_url());
            } else {
                println!("✖ サーバーに接続できません ({})", backend.endpoint().base_url());
                std::process::exit(1);
            }
        }

        Commands::Generate { image, description, output, resize, strict_decode } => {
            println!("🎨 meme-gen - ミーム生成\n");

            let endpoint = config.endpoint(cli.api_url.as_deref())?;
            let timeout = config.timeout_seconds.map(Duration::from_secs);
            let backend = HttpBackend::with_timeout(endpoint, timeout)?;

            let mut session: Session<LocalImage, String> =
                Session::new().with_decode_policy(config.decode_policy(strict_decode));
            let mut store = MemoryHandleStore::new();

            // 1. サーバー確認
            println!("[1/3] サーバーを確認中...");
            session.record_health(backend.check_health().await);
            if session.server_status() == ServerStatus::Online {
                println!("✔ オンライン\n");
            }

            // 2. 入力
            let mut file = LocalImage::open(&image)?;
            if resize && ACCEPTED_MIME_TYPES.contains(&file.mime_type.as_str()) {
                file = resize::resize_image(&file, &ResizeOptions::default())?;
                println!("✔ 縮小済み: {} bytes", file.bytes.len());
            }
            session.select_image(Some(file.into_selected()));

            let description = match description {
                Some(text) => text,
                None => prompt::ask_description()?,
            };
            if description.chars().count() > MAX_DESCRIPTION_CHARS {
                log::warn!("description truncated to {} characters", MAX_DESCRIPTION_CHARS);
            }
            session.set_description(&description);

            // 3. 生成
            println!("[2/3] 生成中...（30〜60秒ほどかかります）");
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")?);
            spinner.set_message("ミームを生成しています");
            spinner.enable_steady_tick(Duration::from_millis(120));

            let now_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;
            let outcome = generate::run(&mut session, &backend, &mut store, now_ms).await;
            spinner.finish_and_clear();

            let (installed, skipped) = match outcome {
                Ok(counts) => counts,
                Err(e) => {
                    session.teardown(&mut store);
                    return Err(e.into());
                }
            };
            println!("✔ {}枚生成{}\n", installed, if skipped > 0 {
                format!("（{}枚は破損のため除外）", skipped)
            } else {
                String::new()
            });

            // 4. 保存
            println!("[3/3] 保存中...");
            let output_dir = output
                .or_else(|| config.output_dir.clone())
                .unwrap_or_else(|| std::path::PathBuf::from("."));
            let saved = download::save_all(&store, session.results(), &output_dir)?;
            for path in &saved {
                println!("  {}", path.display());
            }
            session.teardown(&mut store);

            println!("\n✅ 完了");
        }

        Commands::Watch { interval } => {
            let endpoint = config.endpoint(cli.api_url.as_deref())?;
            let backend = Arc::new(HttpBackend::new(endpoint)?);
            let period = Duration::from_secs(interval.unwrap_or(config.poll_interval_secs).max(1));

            println!("👀 {} を監視中（{}秒間隔、Ctrl+Cで終了）", backend.endpoint().base_url(), period.as_secs());

            let ping_backend = Arc::clone(&backend);
            let mut health = monitor::HealthMonitor::start(
                move || {
                    let backend = Arc::clone(&ping_backend);
                    async move { backend.ping_health().await }
                },
                period,
            );

            loop {
                tokio::select! {
                    status = health.changed() => {
                        let stamp = chrono::Local::now().format("%H:%M:%S");
                        match status {
                            ServerStatus::Online => println!("[{}] ✔ オンライン", stamp),
                            ServerStatus::Offline => println!("[{}] ✖ オフライン", stamp),
                            ServerStatus::Unknown => {}
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            health.stop();
            println!("\n監視を終了しました");
        }

        Commands::Config { set_api_url, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_base_url(url)?;
                println!("✔ バックエンドURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  バックエンド: {}", config.resolve_base_url(cli.api_url.as_deref(), std::env::var(API_URL_ENV).ok().as_deref()));
                println!("  監視間隔: {}秒", config.poll_interval_secs);
                println!("  タイムアウト: {}", config.timeout_seconds.map(|s| format!("{}秒", s)).unwrap_or_else(|| "なし".into()));
                println!("  厳格デコード: {}", if config.strict_decode { "有効" } else { "無効" });
                if let Some(dir) = &config.output_dir {
                    println!("  出力先: {}", dir.display());
                }
            }
        }
    }

    Ok(())
}
