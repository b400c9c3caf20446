use std::path::PathBuf;

use serde::Deserialize;

use crate::roster::Roster;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Everything the sidecar keeps between requests. The roster is only ever
/// handed to the shell as serialized snapshots.
#[derive(Default)]
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
    pub roster: Roster,
}
