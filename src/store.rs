use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::roster::Roster;
use crate::student::Student;

pub const DEFAULT_DATA_FILE: &str = "students.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct LoadWarning {
    /// 1-based.
    pub line_no: usize,
    pub raw: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub roster: Roster,
    pub warnings: Vec<LoadWarning>,
}

/// Reads the roster file. A missing file yields an empty roster; bad lines are
/// skipped and reported as warnings rather than failing the whole load.
pub fn load_roster(path: &Path) -> anyhow::Result<LoadOutcome> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("no roster file at {}, starting empty", path.display());
            return Ok(LoadOutcome::default());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read roster file {}", path.display()))
        }
    };

    let mut out = LoadOutcome::default();
    for (i, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let line_no = i + 1;
        let message = match Student::parse_line(raw) {
            Ok(student) => {
                if out.roster.add_student(student) {
                    continue;
                }
                "duplicate student name".to_string()
            }
            Err(e) => e.to_string(),
        };
        tracing::warn!("skipping line {} of {}: {}", line_no, path.display(), message);
        out.warnings.push(LoadWarning {
            line_no,
            raw: raw.trim().to_string(),
            message,
        });
    }

    tracing::info!(
        "loaded {} students from {} ({} skipped)",
        out.roster.len(),
        path.display(),
        out.warnings.len()
    );
    Ok(out)
}

/// Rewrites the whole file in current roster order. The file is truncated
/// before writing, so a failure part-way leaves it short.
pub fn save_roster(path: &Path, roster: &Roster) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("failed to create roster file {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for s in roster.students() {
        writeln!(w, "{}", s.to_line())
            .with_context(|| format!("failed to write roster file {}", path.display()))?;
    }
    w.flush()
        .with_context(|| format!("failed to flush roster file {}", path.display()))?;

    tracing::debug!("saved {} students to {}", roster.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::{Grades, Status};

    fn grades(midterm: f64, final_exam: f64, attendance: f64, project: f64) -> Grades {
        Grades {
            midterm,
            final_exam,
            attendance,
            project,
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let out = load_roster(&dir.path().join("students.txt")).expect("load");
        assert!(out.roster.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn directory_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_roster(dir.path()).is_err());
    }

    #[test]
    fn bad_lines_are_skipped_with_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("students.txt");
        std::fs::write(
            &p,
            "Ann,Lee,90,90,80,90,Passed\nOnlyOneField\n\nDan,Ng,x,1,1,1\nann,LEE,1,1,1,1\nBen,Oz,50,50,90,50\n",
        )
        .unwrap();

        let out = load_roster(&p).expect("load");
        let names: Vec<&str> = out.roster.students().iter().map(|s| s.first_name()).collect();
        assert_eq!(names, vec!["Ann", "Ben"]);

        assert_eq!(out.warnings.len(), 3);
        assert_eq!(out.warnings[0].line_no, 2);
        assert_eq!(out.warnings[0].raw, "OnlyOneField");
        assert!(out.warnings[0].message.contains("OnlyOneField"));
        assert_eq!(out.warnings[1].line_no, 4);
        assert_eq!(out.warnings[2].line_no, 5);
        assert_eq!(out.warnings[2].message, "duplicate student name");
    }

    #[test]
    fn save_then_load_preserves_records_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("nested").join("students.txt");

        let mut r = Roster::new();
        r.add_student(Student::new("Zoe", "Adams", grades(55.5, 61.25, 99.0, 50.0), None));
        r.add_student(Student::new("Ann", "Lee", grades(90.0, 90.0, 80.0, 90.0), None));
        r.add_student(Student::new(
            "Old",
            "Record",
            grades(0.0, 0.0, 0.0, 0.0),
            Some(Status::Passed),
        ));

        save_roster(&p, &r).expect("save");
        let text = std::fs::read_to_string(&p).unwrap();
        assert!(text.starts_with("Zoe,Adams,55.5,61.25,99,50,Failed\n"));

        let out = load_roster(&p).expect("load");
        assert!(out.warnings.is_empty());
        assert_eq!(out.roster.students(), r.students());
    }

    #[test]
    fn stored_status_text_survives_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("students.txt");
        std::fs::write(&p, "Ann,Lee,90,90,80,90,passed\nBob,Ray,10,10,10,10,Pending\n").unwrap();

        let out = load_roster(&p).expect("load");
        assert!(out.warnings.is_empty());
        assert_eq!(out.roster.len(), 2);

        save_roster(&p, &out.roster).expect("save");
        assert_eq!(
            std::fs::read_to_string(&p).unwrap(),
            "Ann,Lee,90,90,80,90,passed\nBob,Ray,10,10,10,10,Pending\n"
        );
    }

    #[test]
    fn save_into_a_directory_fails_and_keeps_roster() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = Roster::new();
        r.add_student(Student::new("Ann", "Lee", grades(90.0, 90.0, 80.0, 90.0), None));

        let e = save_roster(dir.path(), &r).unwrap_err();
        assert!(format!("{e:#}").contains("failed to create roster file"));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn legacy_lines_are_rewritten_with_status() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("students.txt");
        std::fs::write(&p, "Ann,Lee,90,90,80,90\n").unwrap();

        let out = load_roster(&p).expect("load");
        assert_eq!(out.roster.students()[0].status(), &Status::Passed);

        save_roster(&p, &out.roster).expect("save");
        assert_eq!(
            std::fs::read_to_string(&p).unwrap(),
            "Ann,Lee,90,90,80,90,Passed\n"
        );
    }
}
