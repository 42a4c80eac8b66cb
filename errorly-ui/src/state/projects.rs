//! Project summaries listed for the signed-in user.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 64-bit identifier, always held as its decimal string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(transparent)]
pub struct Snowflake(String);

impl Snowflake {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnowflakeVisitor;

        impl<'de> Visitor<'de> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer id or its decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Snowflake, E> {
                Ok(Snowflake(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Snowflake, E> {
                Ok(Snowflake(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Snowflake, E> {
                let digits = v.strip_prefix('-').unwrap_or(v);
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    Ok(Snowflake(v.to_string()))
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub open_issues: u64,
    #[serde(default)]
    pub active_issues: u64,
    #[serde(default)]
    pub resolved_issues: u64,
}

/// Projects whose name contains `filter`, ignoring case, in original order
pub fn filter_projects(projects: &[ProjectSummary], filter: &str) -> Vec<ProjectSummary> {
    let needle = filter.to_lowercase();
    projects
        .iter()
        .filter(|project| project.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::decode::decode_as;

    fn project(name: &str) -> ProjectSummary {
        ProjectSummary {
            id: Snowflake(name.len().to_string()),
            name: name.to_string(),
            description: String::new(),
            archived: false,
            private: false,
            open_issues: 0,
            active_issues: 0,
            resolved_issues: 0,
        }
    }

    fn names(projects: &[ProjectSummary]) -> Vec<&str> {
        projects.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_filter_case_insensitive() {
        let projects = vec![project("Alpha"), project("beta"), project("Gamma")];

        assert_eq!(names(&filter_projects(&projects, "a")), vec!["Alpha", "beta", "Gamma"]);
        assert_eq!(names(&filter_projects(&projects, "A")), vec!["Alpha", "beta", "Gamma"]);
        assert_eq!(names(&filter_projects(&projects, "GAM")), vec!["Gamma"]);
        assert!(filter_projects(&projects, "z").is_empty());
        assert_eq!(filter_projects(&projects, ""), projects);
    }

    #[test]
    fn test_snowflake_from_number_or_string() {
        let projects: Vec<ProjectSummary> = decode_as(
            r#"[
                {"id": 1152921504606846976, "name": "big"},
                {"id": "739602763612161123", "name": "string"},
                {"id": 12, "name": "small", "open_issues": 4}
            ]"#,
        )
        .unwrap();

        assert_eq!(projects[0].id.as_str(), "1152921504606846976");
        assert_eq!(projects[1].id.as_str(), "739602763612161123");
        assert_eq!(projects[2].id.to_string(), "12");
        assert_eq!(projects[2].open_issues, 4);
    }

    #[test]
    fn test_snowflake_rejects_garbage() {
        assert!(serde_json::from_str::<Snowflake>(r#""12abc""#).is_err());
        assert!(serde_json::from_str::<Snowflake>(r#""""#).is_err());
        assert!(serde_json::from_str::<Snowflake>(r#""-""#).is_err());
        assert!(serde_json::from_str::<Snowflake>(r#""--1""#).is_err());
        assert_eq!(
            serde_json::from_str::<Snowflake>(r#""-12""#).unwrap().as_str(),
            "-12"
        );
    }
}
