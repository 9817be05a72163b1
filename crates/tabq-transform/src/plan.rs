//! Saved query plans.
//!
//! A plan is stored as a JSON array of token lines, one per transformation:
//!
//! ```json
//! [["FilterBy", "Age", "GreaterThan", "30"], ["SortBy", "Age", "Ascending"]]
//! ```

use std::fs;
use std::path::Path;

use crate::error::PlanError;
use crate::registry::build_from_tokens;
use crate::transformation::Transformation;

/// An ordered list of committed transformations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    steps: Vec<Transformation>,
}

impl QueryPlan {
    pub fn new(steps: Vec<Transformation>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Transformation] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Transformation> {
        self.steps
    }

    pub fn push(&mut self, transformation: Transformation) {
        self.steps.push(transformation);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn token_lines(&self) -> Vec<Vec<String>> {
        self.steps.iter().map(Transformation::to_tokens).collect()
    }

    /// Rebuild a plan from token lines.
    ///
    /// # Errors
    ///
    /// Fails on an empty line or a line the registry rejects.
    pub fn from_token_lines<S: AsRef<str>>(lines: &[Vec<S>]) -> Result<Self, PlanError> {
        let mut steps = Vec::with_capacity(lines.len());
        for (step, line) in lines.iter().enumerate() {
            if line.is_empty() {
                return Err(PlanError::EmptyStep { step });
            }
            let transformation =
                build_from_tokens(line).map_err(|source| PlanError::Build { step, source })?;
            steps.push(transformation);
        }
        Ok(Self { steps })
    }

    pub fn to_json(&self) -> Result<String, PlanError> {
        Ok(serde_json::to_string_pretty(&self.token_lines())?)
    }

    pub fn from_json(text: &str) -> Result<Self, PlanError> {
        let lines: Vec<Vec<String>> = serde_json::from_str(text)?;
        Self::from_token_lines(&lines)
    }

    pub fn save(&self, path: &Path) -> Result<(), PlanError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let text = fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

impl From<Vec<Transformation>> for QueryPlan {
    fn from(steps: Vec<Transformation>) -> Self {
        Self::new(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;

    #[test]
    fn test_json_rebuilds_plan() {
        let json = r#"[["FilterBy","Age",">","30"],["SortBy","Age","Asc"],["Empty"]]"#;
        let plan = QueryPlan::from_json(json).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(
            plan.token_lines()[1],
            vec!["SortBy".to_string(), "Age".into(), "Ascending".into()]
        );
        let again = QueryPlan::from_json(&plan.to_json().unwrap()).unwrap();
        assert_eq!(again, plan);
    }

    #[test]
    fn test_bad_step_is_located() {
        let error = QueryPlan::from_json(r#"[["Empty"],["SortBy","Age"]]"#).unwrap_err();
        assert!(matches!(
            error,
            PlanError::Build {
                step: 1,
                source: TransformError::ArgumentMissing { .. }
            }
        ));
        assert!(matches!(
            QueryPlan::from_json("[[]]"),
            Err(PlanError::EmptyStep { step: 0 })
        ));
        assert!(matches!(
            QueryPlan::from_json("{"),
            Err(PlanError::Json(_))
        ));
    }
}
