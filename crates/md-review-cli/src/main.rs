use anyhow::Result;
use clap::Parser;
use md_review_cli::args::{Args, Command, Settings};
use md_review_cli::server::{self, AppState};
use md_review_cli::{browser, delivery, skill};
use md_review_config::Config;
use md_review_engine::io;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = Args::parse();

    if let Some(Command::InstallSkill { dir }) = args.command.take() {
        let dir = dir.unwrap_or_else(skill::default_skills_dir);
        let dest = skill::install_skill(&dir)?;
        println!("✓ Skill installed to {}", dest.display());
        return Ok(());
    }
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let settings = match Settings::resolve(args, config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: md-review <file.md | folder>");
            process::exit(1);
        }
    };

    let target = match io::validate_review_path(&settings.path) {
        Ok(target) => target,
        Err(e) => {
            let source = if settings.path_from_config {
                format!(" from config file '{}'", config_path.display())
            } else {
                String::new()
            };
            eprintln!(
                "Error: Review path '{}'{} is invalid: {e}",
                settings.path.display(),
                source
            );
            process::exit(1);
        }
    };

    let (state, completion) = AppState::new(target, &settings.ignore)?;
    let listener = server::bind_free_port(settings.port).await?;
    let url = format!("http://{}", listener.local_addr()?);
    log::info!("Reviewing {}", settings.path.display());
    println!("md-review running at {url}");

    if settings.open_browser
        && let Err(e) = browser::open_url(&url)
    {
        log::warn!("Failed to open browser: {e}");
    }

    match server::serve(listener, Arc::new(state), completion).await? {
        Some(feedback) => delivery::deliver(&feedback, settings.copy_to_clipboard),
        None => log::info!("Review ended without feedback"),
    }
    Ok(())
}
