use std::sync::{Arc, Mutex, MutexGuard};

use tauri::State;
use tracing::{info, warn};

use crate::client::{submit_import, HttpGateway, ImportGateway};
use crate::config::Config;
use crate::exporters;
use crate::models::{AppError, Block, ParsedRecord};
use crate::parsers;
use crate::reporter::{render, WizardView};
use crate::wizard::{ImportWizard, WizardState};

pub struct AppState {
    wizard: Mutex<ImportWizard>,
    blocks: Mutex<Vec<Block>>,
    gateway: Option<Arc<dyn ImportGateway>>,
}

impl AppState {
    fn new(gateway: Option<Arc<dyn ImportGateway>>) -> Self {
        Self {
            wizard: Mutex::new(ImportWizard::new()),
            blocks: Mutex::new(Vec::new()),
            gateway,
        }
    }

    fn wizard(&self) -> Result<MutexGuard<'_, ImportWizard>, AppError> {
        self.wizard
            .lock()
            .map_err(|_| AppError::new("The import state is unavailable."))
    }

    fn blocks(&self) -> Result<Vec<Block>, AppError> {
        self.blocks
            .lock()
            .map(|blocks| blocks.clone())
            .map_err(|_| AppError::new("The block list is unavailable."))
    }

    fn gateway(&self) -> Result<Arc<dyn ImportGateway>, AppError> {
        self.gateway
            .clone()
            .ok_or_else(|| AppError::new("The backend is not configured."))
    }
}

fn wizard_error(err: impl std::fmt::Display) -> AppError {
    AppError::new(err.to_string())
}

/// Parses a file without touching the wizard.
#[tauri::command]
fn parse_import_file(path: String) -> Result<Vec<ParsedRecord>, AppError> {
    parsers::parse_import_file(path).map_err(|failure| AppError::new(failure.message))
}

/// Parses the selected file and moves the wizard to the preview step
///
/// # Arguments
/// * `path` - file chosen in the upload step
///
/// # Returns
/// The view of the resulting step (upload with an inline error, or preview)
#[tauri::command]
fn upload_import_file(state: State<'_, AppState>, path: String) -> Result<WizardView, AppError> {
    let blocks = state.blocks()?;
    let parsed = parsers::parse_import_file(path);
    let mut wizard = state.wizard()?;
    wizard.accept_upload(parsed, &blocks).map_err(wizard_error)?;
    Ok(render(&wizard))
}

/// Reloads the block snapshot from the backend and revalidates an open preview.
#[tauri::command]
async fn load_blocks(state: State<'_, AppState>) -> Result<Vec<Block>, AppError> {
    let gateway = state.gateway()?;
    let blocks = gateway
        .fetch_blocks()
        .await
        .map_err(|err| AppError::new(format!("Failed to load blocks: {err}")))?;
    info!(blocks = blocks.len(), "block list loaded");

    {
        let mut snapshot = state
            .blocks
            .lock()
            .map_err(|_| AppError::new("The block list is unavailable."))?;
        *snapshot = blocks.clone();
    }

    let mut wizard = state.wizard()?;
    if matches!(wizard.state(), WizardState::Preview { .. }) {
        wizard.revalidate(&blocks).map_err(wizard_error)?;
    }
    Ok(blocks)
}

#[tauri::command]
fn revalidate_import(state: State<'_, AppState>) -> Result<WizardView, AppError> {
    let blocks = state.blocks()?;
    let mut wizard = state.wizard()?;
    wizard.revalidate(&blocks).map_err(wizard_error)?;
    Ok(render(&wizard))
}

#[tauri::command]
fn import_preview(state: State<'_, AppState>) -> Result<WizardView, AppError> {
    let wizard = state.wizard()?;
    Ok(render(&wizard))
}

/// Submits the valid rows and returns the results view
///
/// The wizard shows the loading state while the request is in flight.
#[tauri::command]
async fn start_import(state: State<'_, AppState>) -> Result<WizardView, AppError> {
    let gateway = state.gateway()?;
    let valid = {
        let mut wizard = state.wizard()?;
        wizard.begin_import().map_err(wizard_error)?
    };

    let result = submit_import(gateway.as_ref(), &valid).await;

    let mut wizard = state.wizard()?;
    wizard.finish_import(result).map_err(wizard_error)?;
    Ok(render(&wizard))
}

#[tauri::command]
fn reset_import(state: State<'_, AppState>) -> Result<WizardView, AppError> {
    let mut wizard = state.wizard()?;
    wizard.reset().map_err(wizard_error)?;
    Ok(render(&wizard))
}

#[tauri::command]
fn close_import(state: State<'_, AppState>) -> Result<WizardView, AppError> {
    let mut wizard = state.wizard()?;
    wizard.close().map_err(wizard_error)?;
    Ok(render(&wizard))
}

#[tauri::command]
fn export_template(format: String) -> Result<String, AppError> {
    exporters::export_template(&format)
}

#[tauri::command]
fn export_error_report(state: State<'_, AppState>) -> Result<String, AppError> {
    let wizard = state.wizard()?;
    match wizard.state() {
        WizardState::Preview {
            records, errors, ..
        } => exporters::export_error_report_csv(records, errors),
        _ => Err(AppError::new("There is no validated file to report on.")),
    }
}

fn build_gateway() -> Option<Arc<dyn ImportGateway>> {
    let config = match Config::resolve(None) {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "failed to load configuration");
            return None;
        }
    };

    match HttpGateway::new(config.api_context(), config.timeout()) {
        Ok(gateway) => Some(Arc::new(gateway)),
        Err(err) => {
            warn!(error = %err, "backend unavailable");
            None
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .manage(AppState::new(build_gateway()))
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .invoke_handler(tauri::generate_handler![
            parse_import_file,
            upload_import_file,
            load_blocks,
            revalidate_import,
            import_preview,
            start_import,
            reset_import,
            close_import,
            export_template,
            export_error_report
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
