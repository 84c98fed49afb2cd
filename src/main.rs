mod cli;

use std::fs;
use std::path::Path;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;

use cli::{Cli, Commands};
use tenantimport_lib::client::{HttpGateway, ImportGateway};
use tenantimport_lib::config::Config;
use tenantimport_lib::exporters::{export_error_report_csv, export_template_csv};
use tenantimport_lib::models::Block;
use tenantimport_lib::parsers::parse_import_file;
use tenantimport_lib::reporter::{render, WizardView};
use tenantimport_lib::wizard::{run_import, ImportOutcome, ImportWizard, WizardState};

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(2);
        }
    }
}

/// Returns whether the command succeeded from the user's point of view.
async fn run(cli: Cli) -> Result<bool> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Check {
            file,
            blocks,
            fetch_blocks,
            errors_out,
        } => {
            let blocks = match (blocks, fetch_blocks) {
                (Some(path), _) => read_blocks(&path)?,
                (None, true) => gateway(config_path)?
                    .fetch_blocks()
                    .await
                    .context("Failed to load blocks")?,
                (None, false) => Vec::new(),
            };
            check(&file, &blocks, errors_out.as_deref())
        }

        Commands::Import { file, dry_run } => import(&file, dry_run, config_path).await,

        Commands::Init {
            base_url,
            tenant_id,
            admin_id,
            token,
            timeout_secs,
        } => {
            let path = match config_path {
                Some(path) => path.to_path_buf(),
                None => Config::default_path()?,
            };
            Config::update_api(&path, |api| {
                api.base_url = base_url;
                api.tenant_id = tenant_id;
                api.admin_id = admin_id;
                if token.is_some() {
                    api.token = token;
                }
                if let Some(secs) = timeout_secs {
                    api.timeout_secs = secs;
                }
            })?;
            println!("Configuration written to {}", path.display());
            Ok(true)
        }

        Commands::Template { out } => {
            fs::write(&out, export_template_csv()?)
                .with_context(|| format!("Failed to write '{}'", out.display()))?;
            println!("Template written to {}", out.display());
            Ok(true)
        }

        #[cfg(feature = "desktop")]
        Commands::Gui => {
            tenantimport_lib::run();
            Ok(true)
        }
    }
}

fn gateway(config_path: Option<&Path>) -> Result<HttpGateway> {
    let config = Config::resolve(config_path)?;
    Ok(HttpGateway::new(config.api_context(), config.timeout())?)
}

fn read_blocks(path: &Path) -> Result<Vec<Block>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse block list '{}'", path.display()))
}

fn upload(file: &Path, blocks: &[Block]) -> Result<ImportWizard> {
    let mut wizard = ImportWizard::new();
    wizard.accept_upload(parse_import_file(file), blocks)?;
    Ok(wizard)
}

fn check(file: &Path, blocks: &[Block], errors_out: Option<&Path>) -> Result<bool> {
    let wizard = upload(file, blocks)?;
    println!("{}", render(&wizard));

    match wizard.state() {
        WizardState::Preview {
            records,
            errors,
            partition,
        } => {
            if let Some(out) = errors_out {
                fs::write(out, export_error_report_csv(records, errors)?)
                    .with_context(|| format!("Failed to write '{}'", out.display()))?;
                println!("Error report written to {}", out.display());
            }
            Ok(partition.invalid_count() == 0)
        }
        _ => Ok(false),
    }
}

async fn import(file: &Path, dry_run: bool, config_path: Option<&Path>) -> Result<bool> {
    let gateway = gateway(config_path)?;

    let blocks = match gateway.fetch_blocks().await {
        Ok(blocks) => blocks,
        Err(err) => {
            warn!(error = %err, "block list unavailable; skipping block validation");
            Vec::new()
        }
    };

    let mut wizard = upload(file, &blocks)?;
    let view = render(&wizard);
    println!("{view}");

    match view {
        WizardView::Preview(preview) if preview.can_import => {}
        WizardView::Preview(_) => bail!("there are no valid records to import"),
        _ => return Ok(false),
    }
    if dry_run {
        return Ok(true);
    }

    run_import(&mut wizard, &gateway).await?;
    println!("{}", render(&wizard));

    Ok(!matches!(
        wizard.state(),
        WizardState::Results {
            outcome: ImportOutcome::Failed(_)
        }
    ))
}
