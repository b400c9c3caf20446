use crate::ipc::error::{err, no_workspace, ok, ErrCode};
use crate::ipc::helpers::{
    optional_str, required_grades, required_name, required_str, save_after_mutation,
    student_json, students_json,
};
use crate::ipc::types::{AppState, Request};
use crate::student::Student;
use serde_json::json;

macro_rules! try_param {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(resp) => return resp,
        }
    };
}

/// Current display sequence. An empty query means everyone; `status`
/// narrows whatever the query matched.
fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let rows = match (optional_str(req, "query"), optional_str(req, "status")) {
        (Some(q), Some(status)) => {
            let mut rows = state.roster.search_partial(q);
            rows.retain(|s| s.status().matches(status));
            rows
        }
        (Some(q), None) => state.roster.search_partial(q),
        (None, Some(status)) => state.roster.filter_by_status(status),
        (None, None) => state.roster.students().iter().collect(),
    };
    ok(&req.id, json!({ "students": students_json(rows) }))
}

fn handle_students_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (first, last) = try_param!(required_name(req));
    let student = state.roster.find_student(&first, &last).map(student_json);
    ok(&req.id, json!({ "student": student }))
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.data_file.is_none() {
        return no_workspace(&req.id);
    }
    let (first, last) = try_param!(required_name(req));
    let grades = try_param!(required_grades(req));

    let student = Student::new(first, last, grades, None);
    let snapshot = student_json(&student);
    if !state.roster.add_student(student) {
        return ok(&req.id, json!({ "added": false }));
    }

    let mut result = json!({ "added": true, "student": snapshot });
    save_after_mutation(state, &mut result);
    ok(&req.id, result)
}

fn handle_students_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.data_file.is_none() {
        return no_workspace(&req.id);
    }
    let (first, last) = try_param!(required_name(req));
    let grades = try_param!(required_grades(req));

    if !state.roster.update_student(&first, &last, grades) {
        return err(&req.id, ErrCode::NotFound, "student not found", None);
    }
    let Some(updated) = state.roster.find_student(&first, &last) else {
        return err(&req.id, ErrCode::NotFound, "student not found", None);
    };

    let mut result = json!({ "student": student_json(updated) });
    save_after_mutation(state, &mut result);
    ok(&req.id, result)
}

fn handle_students_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.data_file.is_none() {
        return no_workspace(&req.id);
    }
    let (first, last) = try_param!(required_name(req));

    if !state.roster.delete_student(&first, &last) {
        return ok(&req.id, json!({ "deleted": false }));
    }
    let mut result = json!({ "deleted": true });
    save_after_mutation(state, &mut result);
    ok(&req.id, result)
}

/// Reorders the roster itself; the order is persisted by the next save.
fn handle_students_sort(state: &mut AppState, req: &Request) -> serde_json::Value {
    let by = try_param!(required_str(req, "by"));
    match by.to_ascii_lowercase().as_str() {
        "name" => state.roster.sort_by_name(),
        "average" => state.roster.sort_by_average(),
        _ => {
            return err(
                &req.id,
                ErrCode::BadParams,
                "by must be \"name\" or \"average\"",
                Some(json!({ "by": by })),
            )
        }
    }
    ok(
        &req.id,
        json!({ "students": students_json(state.roster.students()) }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.get" => Some(handle_students_get(state, req)),
        "students.create" => Some(handle_students_create(state, req)),
        "students.update" => Some(handle_students_update(state, req)),
        "students.delete" => Some(handle_students_delete(state, req)),
        "students.sort" => Some(handle_students_sort(state, req)),
        _ => None,
    }
}
