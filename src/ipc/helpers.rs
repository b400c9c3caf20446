use serde_json::json;

use crate::ipc::error::{err, ErrCode};
use crate::ipc::types::{AppState, Request};
use crate::store;
use crate::student::{Grades, Student};

/// Trimmed, non-empty string param. On failure returns the error response.
pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    let Some(v) = req.params.get(key).and_then(|v| v.as_str()) else {
        return Err(err(&req.id, ErrCode::BadParams, format!("missing {key}"), None));
    };
    let v = v.trim();
    if v.is_empty() {
        return Err(err(
            &req.id,
            ErrCode::BadParams,
            format!("{key} must not be empty"),
            None,
        ));
    }
    Ok(v.to_string())
}

pub fn optional_str<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Numbers may arrive as JSON numbers or as the raw text the user typed.
pub fn required_number(req: &Request, key: &str) -> Result<f64, serde_json::Value> {
    let parsed = match req.params.get(key) {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => {
            return Err(err(&req.id, ErrCode::BadParams, format!("missing {key}"), None));
        }
    };
    parsed.ok_or_else(|| {
        err(
            &req.id,
            ErrCode::BadParams,
            format!("{key} must be a number"),
            Some(json!({ "field": key })),
        )
    })
}

pub fn required_grades(req: &Request) -> Result<Grades, serde_json::Value> {
    Ok(Grades {
        midterm: required_number(req, "midterm")?,
        final_exam: required_number(req, "final")?,
        attendance: required_number(req, "attendance")?,
        project: required_number(req, "project")?,
    })
}

pub fn required_name(req: &Request) -> Result<(String, String), serde_json::Value> {
    Ok((required_str(req, "firstName")?, required_str(req, "lastName")?))
}

pub fn student_json(s: &Student) -> serde_json::Value {
    let g = s.grades();
    json!({
        "firstName": s.first_name(),
        "lastName": s.last_name(),
        "midterm": g.midterm,
        "final": g.final_exam,
        "attendance": g.attendance,
        "project": g.project,
        "average": s.average(),
        "averageDisplay": format!("{:.2}", s.average()),
        "status": s.status().as_str(),
        "display": s.to_display_string(),
    })
}

pub fn students_json<'a, I>(students: I) -> Vec<serde_json::Value>
where
    I: IntoIterator<Item = &'a Student>,
{
    students.into_iter().map(student_json).collect()
}

/// Persists after a mutation. The mutation stands either way; the outcome is
/// folded into the response so the shell can report a failed save.
pub fn save_after_mutation(state: &AppState, result: &mut serde_json::Value) {
    let Some(path) = state.data_file.as_ref() else {
        result["saved"] = json!(false);
        return;
    };
    match store::save_roster(path, &state.roster) {
        Ok(()) => {
            result["saved"] = json!(true);
        }
        Err(e) => {
            tracing::warn!("save failed: {e:#}");
            result["saved"] = json!(false);
            result["saveError"] = json!(format!("{e:#}"));
        }
    }
}
