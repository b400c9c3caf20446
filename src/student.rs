use std::fmt;
use std::num::ParseFloatError;
use thiserror::Error;

pub const PASS_AVERAGE: f64 = 60.0;
pub const PASS_ATTENDANCE: f64 = 70.0;

/// On-disk field order. Parser and writer both follow it; swapping two numeric
/// columns would not fail to parse, it would silently change averages.
pub const FIELD_ORDER: [&str; 7] = [
    "first",
    "last",
    "midterm",
    "final",
    "attendance",
    "project",
    "status",
];

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid line format in student data file: {line}")]
    FieldCount { line: String },

    #[error("invalid {field} value {value:?} in line: {line}")]
    InvalidNumber {
        line: String,
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },
}

impl FormatError {
    /// Raw text of the offending line.
    #[allow(dead_code)]
    pub fn line(&self) -> &str {
        match self {
            FormatError::FieldCount { line } | FormatError::InvalidNumber { line, .. } => line,
        }
    }
}

/// Pass/fail classification. Text read back from a data file that is not
/// spelled exactly `Passed` or `Failed` is kept as `Other` so it is written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Passed,
    Failed,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Passed => "Passed",
            Status::Failed => "Failed",
            Status::Other(s) => s,
        }
    }

    pub fn from_stored(s: &str) -> Status {
        match s {
            "Passed" => Status::Passed,
            "Failed" => Status::Failed,
            other => Status::Other(other.to_string()),
        }
    }

    /// Case-insensitive comparison with free text, as the status filter uses it.
    pub fn matches(&self, text: &str) -> bool {
        self.as_str().to_lowercase() == text.trim().to_lowercase()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grades {
    pub midterm: f64,
    pub final_exam: f64,
    pub attendance: f64,
    pub project: f64,
}

/// One student record. Grades are private so that every change goes through
/// `set_grades`, which keeps `status` in sync with the pass rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    first_name: String,
    last_name: String,
    grades: Grades,
    status: Status,
}

impl Student {
    /// `status: None` derives it from the grades. A supplied status is trusted
    /// as-is (records reloaded from disk keep what was computed when saved).
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        grades: Grades,
        status: Option<Status>,
    ) -> Self {
        let mut s = Student {
            first_name: first_name.into(),
            last_name: last_name.into(),
            grades,
            status: Status::Failed,
        };
        s.status = status.unwrap_or_else(|| s.calculate_status());
        s
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn grades(&self) -> Grades {
        self.grades
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Weighted: 40% midterm, 40% final, 20% project. Attendance is not part of it.
    pub fn average(&self) -> f64 {
        let g = &self.grades;
        g.midterm * 0.4 + g.final_exam * 0.4 + g.project * 0.2
    }

    pub fn calculate_status(&self) -> Status {
        if self.average() >= PASS_AVERAGE && self.grades.attendance >= PASS_ATTENDANCE {
            Status::Passed
        } else {
            Status::Failed
        }
    }

    pub fn set_grades(&mut self, grades: Grades) {
        self.grades = grades;
        self.status = self.calculate_status();
    }

    pub fn matches_name(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name.to_lowercase() == first_name.to_lowercase()
            && self.last_name.to_lowercase() == last_name.to_lowercase()
    }

    pub fn to_display_string(&self) -> String {
        self.to_string()
    }

    /// Accepts the current 7-field shape and the older 6-field shape without
    /// status (status is then computed). Every field is trimmed, names included,
    /// so `Ann, Lee` loads the same as `Ann,Lee`. A stored status is kept as
    /// written.
    pub fn parse_line(line: &str) -> Result<Student, FormatError> {
        let raw = line.trim();
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        if parts.len() != 7 && parts.len() != 6 {
            return Err(FormatError::FieldCount {
                line: raw.to_string(),
            });
        }

        let mut nums = [0.0f64; 4];
        for (i, slot) in nums.iter_mut().enumerate() {
            let idx = i + 2;
            let v = parts[idx];
            *slot = v.parse::<f64>().map_err(|e| FormatError::InvalidNumber {
                line: raw.to_string(),
                field: FIELD_ORDER[idx],
                value: v.to_string(),
                source: e,
            })?;
        }
        let grades = Grades {
            midterm: nums[0],
            final_exam: nums[1],
            attendance: nums[2],
            project: nums[3],
        };

        let status = parts.get(6).map(|v| Status::from_stored(v));
        Ok(Student::new(parts[0], parts[1], grades, status))
    }

    /// Storage form, no trailing newline.
    pub fn to_line(&self) -> String {
        let g = &self.grades;
        format!(
            "{},{},{},{},{},{},{}",
            self.first_name,
            self.last_name,
            g.midterm,
            g.final_exam,
            g.attendance,
            g.project,
            self.status
        )
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - Avg: {:.2}, Status: {}",
            self.first_name,
            self.last_name,
            self.average(),
            self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grades(midterm: f64, final_exam: f64, attendance: f64, project: f64) -> Grades {
        Grades {
            midterm,
            final_exam,
            attendance,
            project,
        }
    }

    #[test]
    fn average_is_weighted_and_ignores_attendance() {
        let s = Student::new("Ann", "Lee", grades(80.0, 70.0, 0.0, 50.0), None);
        assert!((s.average() - (0.4 * 80.0 + 0.4 * 70.0 + 0.2 * 50.0)).abs() < 1e-9);

        let t = Student::new("Ann", "Lee", grades(80.0, 70.0, 100.0, 50.0), None);
        assert_eq!(s.average(), t.average());
    }

    #[test]
    fn status_needs_both_average_and_attendance() {
        let at_limit = Student::new("A", "B", grades(60.0, 60.0, 70.0, 60.0), None);
        assert_eq!(at_limit.status(), &Status::Passed);

        let low_attendance = Student::new("A", "B", grades(60.0, 60.0, 69.0, 60.0), None);
        assert_eq!(low_attendance.status(), &Status::Failed);

        // 59.99 average
        let low_average = Student::new("A", "B", grades(59.99, 59.99, 100.0, 59.99), None);
        assert!(low_average.average() < 60.0);
        assert_eq!(low_average.status(), &Status::Failed);

        let strong_but_absent = Student::new("A", "B", grades(100.0, 100.0, 10.0, 100.0), None);
        assert_eq!(strong_but_absent.status(), &Status::Failed);
    }

    #[test]
    fn supplied_status_is_kept() {
        let s = Student::new(
            "A",
            "B",
            grades(10.0, 10.0, 10.0, 10.0),
            Some(Status::Passed),
        );
        assert_eq!(s.status(), &Status::Passed);
        assert_eq!(s.calculate_status(), Status::Failed);
    }

    #[test]
    fn set_grades_recomputes_status() {
        let mut s = Student::new(
            "A",
            "B",
            grades(10.0, 10.0, 10.0, 10.0),
            Some(Status::Passed),
        );
        s.set_grades(grades(90.0, 90.0, 95.0, 90.0));
        assert_eq!(s.status(), &Status::Passed);
        s.set_grades(grades(90.0, 90.0, 50.0, 90.0));
        assert_eq!(s.status(), &Status::Failed);
    }

    #[test]
    fn display_uses_two_decimals() {
        let s = Student::new("John", "Doe", grades(80.0, 75.0, 90.0, 85.0), None);
        assert_eq!(s.to_display_string(), "John Doe - Avg: 79.00, Status: Passed");
    }

    #[test]
    fn parse_seven_fields_keeps_stored_status() {
        let s = Student::parse_line("John,Doe,10,10,10,10,Passed\n").expect("parse");
        assert_eq!(s.first_name(), "John");
        assert_eq!(s.last_name(), "Doe");
        assert_eq!(s.status(), &Status::Passed);
    }

    #[test]
    fn parse_six_fields_computes_status() {
        let s = Student::parse_line("Ann,Lee,90,90,80,90").expect("parse");
        assert_eq!(s.grades().attendance, 80.0);
        assert_eq!(s.grades().project, 90.0);
        assert_eq!(s.status(), &s.calculate_status());
        assert_eq!(s.status(), &Status::Passed);
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        let e = Student::parse_line("OnlyOneField").unwrap_err();
        assert!(matches!(e, FormatError::FieldCount { .. }));
        assert_eq!(e.line(), "OnlyOneField");
        assert!(e.to_string().contains("OnlyOneField"));
    }

    #[test]
    fn parse_rejects_bad_number_with_source() {
        let e = Student::parse_line("Ann,Lee,90,abc,80,90,Passed").unwrap_err();
        match &e {
            FormatError::InvalidNumber { field, value, .. } => {
                assert_eq!(*field, "final");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn parse_keeps_unrecognised_status_text() {
        let s = Student::parse_line("Bob,Ray,10,10,10,10,Pending").expect("parse");
        assert_eq!(s.status(), &Status::Other("Pending".to_string()));
        assert_eq!(s.to_line(), "Bob,Ray,10,10,10,10,Pending");

        let lower = Student::parse_line("Ann,Lee,90,90,80,90,passed").expect("parse");
        assert!(lower.status().matches("Passed"));
        assert_eq!(lower.to_line(), "Ann,Lee,90,90,80,90,passed");
    }

    #[test]
    fn parse_trims_names() {
        let s = Student::parse_line("Ann , Lee,90,90,80,90,Passed").expect("parse");
        assert_eq!(s.first_name(), "Ann");
        assert_eq!(s.last_name(), "Lee");
        assert!(s.matches_name("ann", "lee"));
    }

    #[test]
    fn to_line_roundtrips() {
        let s = Student::new("Ann", "Lee", grades(90.5, 88.0, 79.25, 91.0), None);
        let line = s.to_line();
        assert_eq!(line, "Ann,Lee,90.5,88,79.25,91,Passed");
        assert_eq!(Student::parse_line(&line).expect("reparse"), s);
    }
}
