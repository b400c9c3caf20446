use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::{err, ErrCode};

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    tracing::debug!("request {} {}", req.id, req.method);

    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::students::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::roster::try_handle(state, &req) {
        return resp;
    }

    tracing::warn!("unknown method: {}", req.method);
    err(
        &req.id,
        ErrCode::NotImplemented,
        format!("unknown method: {}", req.method),
        None,
    )
}
