use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One subject of the exam: stable id, display name, and question count.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubjectSpec {
    pub id: String,
    pub name: String,
    pub total_questions: u32,
}

impl SubjectSpec {
    fn new(id: &str, name: &str, total_questions: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            total_questions,
        }
    }
}

/// Fixed, ordered set of subjects. Order is display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    subjects: Vec<SubjectSpec>,
}

impl Default for Catalog {
    /// The experimental-sciences booklet: 8 subjects, 200 questions.
    fn default() -> Self {
        Self {
            subjects: vec![
                SubjectSpec::new("math", "ریاضی", 35),
                SubjectSpec::new("physics", "فیزیک", 25),
                SubjectSpec::new("chemistry", "شیمی", 25),
                SubjectSpec::new("biology", "زیست‌شناسی", 25),
                SubjectSpec::new("literature", "ادبیات", 25),
                SubjectSpec::new("arabic", "عربی", 20),
                SubjectSpec::new("religious", "دینی", 20),
                SubjectSpec::new("english", "زبان انگلیسی", 25),
            ],
        }
    }
}

impl Catalog {
    /// Build a catalog from configured subjects, rejecting anything
    /// [`validate_catalog`] would.
    pub fn from_subjects(subjects: Vec<SubjectSpec>) -> Result<Self, Vec<String>> {
        validate_catalog(&subjects)?;
        Ok(Self { subjects })
    }

    pub fn subjects(&self) -> &[SubjectSpec] {
        &self.subjects
    }

    pub fn get(&self, id: &str) -> Option<&SubjectSpec> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn total_questions(&self) -> u32 {
        self.subjects.iter().map(|s| s.total_questions).sum()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.subjects.iter().map(|s| s.id.as_str()).collect()
    }
}

/// Validate a subject list. Returns all errors at once.
pub fn validate_catalog(subjects: &[SubjectSpec]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if subjects.is_empty() {
        errors.push("subjects: at least one subject is required".to_string());
    }

    let mut seen = HashSet::new();
    for (i, subject) in subjects.iter().enumerate() {
        if subject.id.trim().is_empty() {
            errors.push(format!("subjects[{}].id: must not be empty", i));
        } else if !seen.insert(subject.id.as_str()) {
            errors.push(format!("subjects[{}].id: duplicate id '{}'", i, subject.id));
        }
        if subject.total_questions == 0 {
            errors.push(format!(
                "subjects[{}].total_questions: must be positive",
                i
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 8);
        assert_eq!(
            catalog.ids(),
            vec!["math", "physics", "chemistry", "biology", "literature", "arabic", "religious", "english"]
        );
        assert_eq!(catalog.get("math").unwrap().total_questions, 35);
        assert_eq!(catalog.get("arabic").unwrap().total_questions, 20);
        assert_eq!(catalog.total_questions(), 200);
    }

    #[test]
    fn test_default_catalog_is_valid() {
        assert!(validate_catalog(Catalog::default().subjects()).is_ok());
    }

    #[test]
    fn test_get_unknown() {
        assert!(Catalog::default().get("history").is_none());
    }

    #[test]
    fn test_parse_subject_list() {
        let yaml = r#"
- id: math
  name: Math
  total_questions: 30
- id: physics
  name: Physics
  total_questions: 30
"#;
        let subjects: Vec<SubjectSpec> = serde_saphyr::from_str(yaml).unwrap();
        let catalog = Catalog::from_subjects(subjects).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("physics").unwrap().name, "Physics");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let errors = Catalog::from_subjects(vec![]).unwrap_err();
        assert!(errors[0].contains("at least one"));
    }

    #[test]
    fn test_collects_all_errors() {
        let subjects = vec![
            SubjectSpec::new("math", "Math", 0),
            SubjectSpec::new("math", "Math again", 10),
            SubjectSpec::new(" ", "Blank", 10),
        ];
        let errors = validate_catalog(&subjects).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("subjects[0].total_questions"));
        assert!(errors[1].contains("duplicate id 'math'"));
        assert!(errors[2].contains("subjects[2].id"));
    }
}
