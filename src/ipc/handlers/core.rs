use crate::ipc::error::{err, ok, ErrCode};
use crate::ipc::types::{AppState, Request};
use crate::store;
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "dataFile": state.data_file.as_ref().map(|p| p.to_string_lossy().to_string()),
            "studentCount": state.roster.len(),
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, ErrCode::BadParams, "missing params.path", None);
    };
    let file_name = req
        .params
        .get("fileName")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(store::DEFAULT_DATA_FILE);
    let data_file = path.join(file_name);

    match store::load_roster(&data_file) {
        Ok(outcome) => {
            let warnings: Vec<serde_json::Value> = outcome
                .warnings
                .iter()
                .map(|w| {
                    json!({
                        "lineNo": w.line_no,
                        "raw": w.raw,
                        "message": w.message,
                    })
                })
                .collect();

            state.workspace = Some(path.clone());
            state.data_file = Some(data_file.clone());
            state.roster = outcome.roster;

            ok(
                &req.id,
                json!({
                    "workspacePath": path.to_string_lossy(),
                    "dataFile": data_file.to_string_lossy(),
                    "studentCount": state.roster.len(),
                    "warnings": warnings,
                }),
            )
        }
        // Previous workspace (if any) stays selected.
        Err(e) => {
            tracing::warn!("load failed: {e:#}");
            err(
                &req.id,
                ErrCode::LoadFailed,
                format!("{e:#}"),
                Some(json!({ "dataFile": data_file.to_string_lossy() })),
            )
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
