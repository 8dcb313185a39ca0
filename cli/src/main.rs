mod cli;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use form_controller::{
    ControllerConfig, FormController, NoopRenderer, Question, Renderer, ResponseOrder, UploadFile,
};
use render::{page_json, TerminalRenderer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

const UPLOAD_COMMAND: &str = ":upload";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("docqa: {:#}", e);
            std::process::exit(2);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli)?;
    log::info!("Using backend at {}", config.base_url);

    match cli.command {
        Commands::Ask { ref question } => {
            let controller = FormController::new(config, Arc::new(NoopRenderer))?;
            let result = controller.ask(Question::new(question.clone())).await;

            let page = controller.page();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&page_json(&page))?);
            } else {
                println!("{}", page.answer_text());
            }
            Ok(exit_code(result.is_ok()))
        }
        Commands::Upload { ref files } => {
            let controller = FormController::new(config, Arc::new(NoopRenderer))?;
            let result = controller.upload(read_files(files).await?).await;

            let page = controller.page();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&page_json(&page))?);
            } else {
                println!("{}", page.status_text().unwrap_or_default());
            }
            Ok(exit_code(result.is_ok()))
        }
        Commands::Shell => {
            let renderer: Arc<dyn Renderer> = Arc::new(TerminalRenderer);
            let controller = FormController::new(config, renderer)?;
            shell(&controller).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&page_json(&controller.page()))?);
            }
            Ok(0)
        }
    }
}

fn load_config(cli: &Cli) -> Result<ControllerConfig> {
    let mut config = ControllerConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Some(Duration::from_secs(secs));
    }
    if cli.latest_wins {
        config.response_order = ResponseOrder::LatestIssued;
    }
    Ok(config)
}

async fn read_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = UploadFile::from_path(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        files.push(file);
    }
    Ok(files)
}

/// One line of shell input.
#[derive(Debug, PartialEq)]
enum ShellInput {
    Upload(Option<PathBuf>),
    Question(String),
}

fn parse_line(line: String) -> ShellInput {
    let Some(rest) = line.strip_prefix(UPLOAD_COMMAND) else {
        return ShellInput::Question(line);
    };
    if rest.is_empty() {
        return ShellInput::Upload(None);
    }
    if !rest.starts_with(char::is_whitespace) {
        return ShellInput::Question(line);
    }
    match rest.trim() {
        "" => ShellInput::Upload(None),
        path => ShellInput::Upload(Some(PathBuf::from(path))),
    }
}

/// Every stdin line is one form submission. Submissions are spawned, so a
/// slow answer does not hold up the next line.
async fn shell(controller: &FormController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut submissions = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        let controller = controller.clone();
        match parse_line(line) {
            ShellInput::Upload(path) => {
                let files = match path {
                    Some(path) => match read_files(&[path]).await {
                        Ok(files) => files,
                        Err(e) => {
                            eprintln!("docqa: {:#}", e);
                            continue;
                        }
                    },
                    None => Vec::new(),
                };
                submissions.spawn(async move {
                    let _ = controller.upload(files).await;
                });
            }
            ShellInput::Question(question) => {
                submissions.spawn(async move {
                    let _ = controller.ask(Question::new(question)).await;
                });
            }
        }
    }

    while let Some(joined) = submissions.join_next().await {
        joined.context("submission task panicked")?;
    }
    Ok(())
}

fn exit_code(success: bool) -> i32 {
    if success {
        0
    } else {
        1
    }
}
