use serde_json::json;

/// Error codes the shell switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrCode {
    BadJson,
    BadParams,
    NoWorkspace,
    NotFound,
    LoadFailed,
    SaveFailed,
    NotImplemented,
}

impl ErrCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrCode::BadJson => "bad_json",
            ErrCode::BadParams => "bad_params",
            ErrCode::NoWorkspace => "no_workspace",
            ErrCode::NotFound => "not_found",
            ErrCode::LoadFailed => "load_failed",
            ErrCode::SaveFailed => "save_failed",
            ErrCode::NotImplemented => "not_implemented",
        }
    }
}

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: ErrCode,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code.as_str(),
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Reply to a line that did not parse as a request; there is no id to echo.
pub fn bad_json(message: impl Into<String>) -> serde_json::Value {
    json!({
        "ok": false,
        "error": {
            "code": ErrCode::BadJson.as_str(),
            "message": message.into(),
        },
    })
}

pub fn no_workspace(id: &str) -> serde_json::Value {
    err(id, ErrCode::NoWorkspace, "select a workspace first", None)
}
