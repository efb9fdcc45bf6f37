//! Condition groups: which labs ran which method for each reaction.
//!
//! Derived from the conditions table through the lab lookup and used only to
//! build reaction labels.

use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use crate::tables::{ConditionRow, LabRow};

/// Contributor label for conditions without a group reference.
pub const EXTERNAL_GROUP: &str = "External";

/// Lab group id → contributor display name with the leading honorific dropped
/// ("Dr. Jane Smith" → "Jane Smith", "Prof. Smith" → "Smith").
pub fn lab_display_names(labs: &[LabRow]) -> HashMap<String, String> {
    labs.iter()
        .filter_map(|lab| {
            let professor = lab.professor.as_deref()?;
            Some((normalize_group(&lab.group), strip_honorific(professor).to_string()))
        })
        .collect()
}

fn strip_honorific(name: &str) -> &str {
    match name.trim().split_once(char::is_whitespace) {
        Some((_, rest)) if !rest.trim().is_empty() => rest.trim(),
        _ => name.trim(),
    }
}

/// Group ids arrive as `7` from the lab table and `7.0` from a conditions
/// column that also holds blanks.
pub fn normalize_group(raw: &str) -> String {
    let raw = raw.trim();
    match raw.strip_suffix(".0") {
        Some(int) if !int.is_empty() && int.chars().all(|c| c.is_ascii_digit()) => int.to_string(),
        _ => raw.to_string(),
    }
}

/// reaction id → method → distinct contributor names.
/// Methods keep first-seen order; names are kept sorted.
#[derive(Debug, Clone, Default)]
pub struct ConditionGroups {
    by_reaction: HashMap<String, Vec<(String, BTreeSet<String>)>>,
}

impl ConditionGroups {
    pub fn fold(conditions: &[ConditionRow], lab_names: &HashMap<String, String>) -> Self {
        let mut groups = Self::default();
        for row in conditions {
            let Some(method) = row.method() else {
                debug!(reaction = %row.reaction, "Condition without method skipped");
                continue;
            };
            let contributor = match row.group.as_deref() {
                None => EXTERNAL_GROUP.to_string(),
                Some(group) => {
                    let key = normalize_group(group);
                    match lab_names.get(&key) {
                        Some(name) => name.clone(),
                        None => {
                            warn!(reaction = %row.reaction, group = %key, "Condition references unknown lab group");
                            key
                        }
                    }
                }
            };
            groups.insert(&row.reaction, method, contributor);
        }
        groups
    }

    fn insert(&mut self, reaction: &str, method: &str, contributor: String) {
        let methods = self.by_reaction.entry(reaction.to_string()).or_default();
        match methods.iter_mut().find(|(m, _)| m == method) {
            Some((_, names)) => {
                names.insert(contributor);
            }
            None => methods.push((method.to_string(), BTreeSet::from([contributor]))),
        }
    }

    /// `"{method} ({name},{name})"` per method, in first-seen order.
    pub fn segments(&self, reaction: &str) -> Vec<String> {
        self.by_reaction
            .get(reaction)
            .map(|methods| {
                methods
                    .iter()
                    .map(|(method, names)| {
                        let names: Vec<&str> = names.iter().map(String::as_str).collect();
                        format!("{method} ({})", names.join(","))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn contributors(&self, reaction: &str) -> BTreeSet<&str> {
        self.by_reaction
            .get(reaction)
            .into_iter()
            .flatten()
            .flat_map(|(_, names)| names.iter().map(String::as_str))
            .collect()
    }

    pub fn reaction_count(&self) -> usize {
        self.by_reaction.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab(group: &str, professor: &str) -> LabRow {
        LabRow { group: group.into(), professor: Some(professor.into()) }
    }

    fn cond(reaction: &str, method: &str, group: Option<&str>) -> ConditionRow {
        ConditionRow {
            reaction: reaction.into(),
            method: Some(method.into()),
            group: group.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_honorific_is_stripped() {
        let names = lab_display_names(&[lab("7", "Dr. Smith"), lab("8", "Prof. Ada Lee"), lab("9", "Jones")]);
        assert_eq!(names["7"], "Smith");
        assert_eq!(names["8"], "Ada Lee");
        assert_eq!(names["9"], "Jones");
    }

    #[test]
    fn test_normalize_group() {
        assert_eq!(normalize_group("7.0"), "7");
        assert_eq!(normalize_group(" 12 "), "12");
        assert_eq!(normalize_group("lab.0"), "lab.0");
    }

    #[test]
    fn test_fold_groups_by_method() {
        let names = lab_display_names(&[lab("7", "Dr. Smith"), lab("8", "Dr. Jones")]);
        let groups = ConditionGroups::fold(
            &[
                cond("R1", "hydrolysis", Some("8")),
                cond("R1", "hydrolysis", Some("7.0")),
                cond("R1", "hydrolysis", Some("7")),
                cond("R1", "glycolysis", None),
                cond("R2", "methanolysis", Some("99")),
            ],
            &names,
        );
        assert_eq!(
            groups.segments("R1"),
            vec!["hydrolysis (Jones,Smith)".to_string(), "glycolysis (External)".to_string()]
        );
        assert_eq!(groups.segments("R2"), vec!["methanolysis (99)".to_string()]);
        assert!(groups.segments("R3").is_empty());
        assert_eq!(groups.contributors("R1").len(), 3);
        assert_eq!(groups.reaction_count(), 2);
    }

    #[test]
    fn test_condition_without_method_skipped() {
        let row = ConditionRow { reaction: "R1".into(), ..Default::default() };
        let groups = ConditionGroups::fold(&[row], &HashMap::new());
        assert!(groups.segments("R1").is_empty());
    }
}
