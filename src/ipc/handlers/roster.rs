use crate::ipc::error::{err, no_workspace, ok, ErrCode};
use crate::ipc::types::{AppState, Request};
use crate::store;
use serde_json::json;

fn handle_roster_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(path) = state.data_file.as_ref() else {
        return no_workspace(&req.id);
    };

    match store::save_roster(path, &state.roster) {
        Ok(()) => ok(
            &req.id,
            json!({ "saved": true, "studentCount": state.roster.len() }),
        ),
        Err(e) => {
            tracing::warn!("save failed: {e:#}");
            err(
                &req.id,
                ErrCode::SaveFailed,
                format!("{e:#}"),
                Some(json!({ "dataFile": path.to_string_lossy() })),
            )
        }
    }
}

fn handle_roster_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let s = state.roster.summary();
    ok(
        &req.id,
        json!({
            "count": s.count,
            "passed": s.passed,
            "failed": s.failed,
            "other": s.other,
            "classAverage": s.class_average,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.save" => Some(handle_roster_save(state, req)),
        "roster.summary" => Some(handle_roster_summary(state, req)),
        _ => None,
    }
}
