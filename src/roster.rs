use crate::student::{Grades, Student};

/// The students of one classroom, in display order.
///
/// Insertion order is the display order until one of the sorts is applied; the
/// sorted order then sticks. (first, last) is unique case-insensitively at
/// insertion time.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterSummary {
    pub count: usize,
    pub passed: usize,
    pub failed: usize,
    /// Stored status text that is neither passed nor failed.
    pub other: usize,
    pub class_average: f64,
}

impl Roster {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Returns false (and leaves the roster alone) when the name is taken.
    pub fn add_student(&mut self, student: Student) -> bool {
        if self
            .students
            .iter()
            .any(|s| s.matches_name(student.first_name(), student.last_name()))
        {
            return false;
        }
        self.students.push(student);
        true
    }

    pub fn delete_student(&mut self, first_name: &str, last_name: &str) -> bool {
        let before = self.students.len();
        self.students
            .retain(|s| !s.matches_name(first_name, last_name));
        self.students.len() < before
    }

    pub fn find_student(&self, first_name: &str, last_name: &str) -> Option<&Student> {
        self.students
            .iter()
            .find(|s| s.matches_name(first_name, last_name))
    }

    pub fn find_student_mut(&mut self, first_name: &str, last_name: &str) -> Option<&mut Student> {
        self.students
            .iter_mut()
            .find(|s| s.matches_name(first_name, last_name))
    }

    /// Replaces grades and attendance of the named student; status follows.
    pub fn update_student(&mut self, first_name: &str, last_name: &str, grades: Grades) -> bool {
        match self.find_student_mut(first_name, last_name) {
            Some(s) => {
                s.set_grades(grades);
                true
            }
            None => false,
        }
    }

    /// Substring match on either name, ignoring case. An empty query matches
    /// everyone; callers decide whether that is what they want.
    pub fn search_partial(&self, query: &str) -> Vec<&Student> {
        let q = query.to_lowercase();
        self.students
            .iter()
            .filter(|s| {
                s.first_name().to_lowercase().contains(&q)
                    || s.last_name().to_lowercase().contains(&q)
            })
            .collect()
    }

    pub fn filter_by_status(&self, status: &str) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|s| s.status().matches(status))
            .collect()
    }

    /// Ascending by (last, first), case-insensitive. Stable.
    pub fn sort_by_name(&mut self) {
        self.students.sort_by_cached_key(|s| {
            (s.last_name().to_lowercase(), s.first_name().to_lowercase())
        });
    }

    /// Highest average first. Stable, so equal averages keep their order.
    pub fn sort_by_average(&mut self) {
        self.students
            .sort_by(|a, b| b.average().total_cmp(&a.average()));
    }

    pub fn summary(&self) -> RosterSummary {
        let count = self.students.len();
        let count_status = |text: &str| {
            self.students
                .iter()
                .filter(|s| s.status().matches(text))
                .count()
        };
        let passed = count_status("passed");
        let failed = count_status("failed");
        let class_average = if count > 0 {
            self.students.iter().map(Student::average).sum::<f64>() / (count as f64)
        } else {
            0.0
        };
        RosterSummary {
            count,
            passed,
            failed,
            other: count - passed - failed,
            class_average,
        }
    }
}
