mod app;
mod cli;
mod config;
mod effects;
mod explore;
mod render;

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use gazette_core::{DocumentUpload, Msg, Phase};
use gazette_engine::{JobClient, ReqwestJobClient};
use gazette_logging::{gazette_info, LogDestination, LogSettings};
use log::LevelFilter;

use crate::app::App;
use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::effects::EffectRunner;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("reading working directory")?;
    let mut config = AppConfig::load(cli.config.as_deref(), &cwd)?;
    config.apply(&cli.overrides());
    config.validate()?;

    gazette_logging::initialize(&log_settings(&config, cli.verbose));
    gazette_info!("Using API at {}", config.api_url);

    let client = ReqwestJobClient::new(&config.client_settings())
        .with_context(|| format!("configuring client for {}", config.api_url))?;

    match cli.command {
        Command::Process {
            pdf,
            search,
            keyword,
            interactive,
        } => process(&config, client, &pdf, search, keyword, interactive),
        Command::Search { query, limit } => {
            let limit = limit.unwrap_or(config.search_limit);
            let hits = block_on(client.search(&query, limit))?
                .with_context(|| format!("searching for \"{query}\""))?;
            println!("{}", render::search_hits(&hits));
            Ok(())
        }
        Command::Keyword { keyword, limit } => {
            let limit = limit.unwrap_or(config.keyword_article_limit);
            let articles = block_on(client.articles_for_keyword(&keyword, limit))?
                .with_context(|| format!("listing articles for keyword \"{keyword}\""))?;
            println!("{}", render::article_list(&articles));
            Ok(())
        }
        Command::Article { id } => {
            let article =
                block_on(client.article(&id))?.with_context(|| format!("loading article {id}"))?;
            println!("{}", render::article(&article));
            Ok(())
        }
    }
}

fn log_settings(config: &AppConfig, verbose: bool) -> LogSettings {
    let level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    let destination = match (&config.log_file, verbose) {
        (Some(path), true) => LogDestination::Both(path.clone()),
        (Some(path), false) => LogDestination::File(path.clone()),
        (None, _) => LogDestination::Terminal,
    };
    LogSettings { level, destination }
}

fn block_on<F: std::future::Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    Ok(runtime.block_on(future))
}

fn process(
    config: &AppConfig,
    client: ReqwestJobClient,
    pdf: &Path,
    search: Option<String>,
    keyword: Option<String>,
    interactive: bool,
) -> anyhow::Result<()> {
    let bytes = fs::read(pdf).with_context(|| format!("reading {}", pdf.display()))?;
    let file_name = pdf
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| pdf.display().to_string());

    let client: Arc<dyn JobClient> = Arc::new(client);
    let mut app = App::new(EffectRunner::new(client, config.poll_settings()));
    let stdout = io::stdout();
    let mut out = stdout.lock();

    app.dispatch(Msg::DocumentSubmitted(DocumentUpload::new(file_name, bytes)));
    if let Some(rejection) = app.state().rejection() {
        bail!("{} was not submitted: {rejection}", pdf.display());
    }

    if app.run_until_settled(&mut out)? == Phase::Failed {
        let view = app.view();
        bail!(render::failure(&view).unwrap_or_else(|| "Processing failed".to_string()));
    }

    if let Some(query) = search {
        app.dispatch(Msg::SearchChanged(query));
    }
    if let Some(keyword) = keyword {
        app.dispatch(Msg::KeywordToggled(keyword));
    }
    if let Some(exploration) = app.view().exploration {
        writeln!(out, "\n{}", render::exploration(&exploration))?;
    }

    if interactive {
        explore::run(&mut app, io::stdin().lock(), &mut out)?;
    }
    Ok(())
}
