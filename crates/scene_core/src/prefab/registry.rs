use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

use super::PrefabDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefabRegistryError {
    #[error("prefab '{id}' would form a dependency cycle: {}", .cycle.join(" -> "))]
    CyclicDependency { id: String, cycle: Vec<String> },
}

impl PrefabRegistryError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::CyclicDependency { .. } => DiagnosticCode::CyclicDependency,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::CyclicDependency { id, .. } => {
                Diagnostic::new(self.code(), self.to_string()).with_entity(id.clone())
            }
        }
    }
}

/// Templates by id.
///
/// Filled completely before an instantiation pass starts and only read
/// during it. Dependencies on ids that are not registered are allowed; they
/// cannot take part in a cycle until they are.
#[derive(Debug, Clone, Default)]
pub struct PrefabRegistry {
    prefabs: BTreeMap<String, PrefabDefinition>,
}

impl PrefabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `definition`. Rejected when its dependencies would
    /// close a cycle; the registry is left untouched in that case.
    pub fn register(&mut self, definition: PrefabDefinition) -> Result<(), PrefabRegistryError> {
        if let Some(cycle) = self.find_cycle_through(&definition) {
            warn!(
                prefab_id = %definition.id,
                cycle = %cycle.join(" -> "),
                "prefab_registration_rejected"
            );
            return Err(PrefabRegistryError::CyclicDependency {
                id: definition.id,
                cycle,
            });
        }

        let id = definition.id.clone();
        let version = definition.version;
        match self.prefabs.insert(id.clone(), definition) {
            Some(previous) => info!(
                prefab_id = %id,
                previous_version = previous.version,
                version,
                "prefab_replaced"
            ),
            None => debug!(prefab_id = %id, version, "prefab_registered"),
        }
        Ok(())
    }

    /// Registers every definition in order. Rejections are reported to `sink`
    /// and do not stop the remaining registrations. Returns how many landed.
    pub fn register_all(
        &mut self,
        definitions: impl IntoIterator<Item = PrefabDefinition>,
        sink: &mut dyn DiagnosticSink,
    ) -> usize {
        let mut registered = 0;
        for definition in definitions {
            match self.register(definition) {
                Ok(()) => registered += 1,
                Err(error) => sink.emit(error.to_diagnostic()),
            }
        }
        registered
    }

    pub fn get(&self, id: &str) -> Option<&PrefabDefinition> {
        self.prefabs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.prefabs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.prefabs.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrefabDefinition> {
        self.prefabs.values()
    }

    /// Walks dependency edges as they would look with `candidate` installed
    /// and returns the path that leads back to it, if any.
    fn find_cycle_through(&self, candidate: &PrefabDefinition) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut path = vec![candidate.id.clone()];
        if self.walk(candidate, &candidate.dependencies, &mut visited, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn walk(
        &self,
        candidate: &PrefabDefinition,
        dependencies: &[String],
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> bool {
        for dependency in dependencies {
            path.push(dependency.clone());
            if *dependency == candidate.id {
                return true;
            }
            if visited.insert(dependency.clone()) {
                if let Some(next) = self.prefabs.get(dependency) {
                    if self.walk(candidate, &next.dependencies, visited, path) {
                        return true;
                    }
                }
            }
            path.pop();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefab::PrefabEntity;

    fn prefab(id: &str, dependencies: &[&str]) -> PrefabDefinition {
        dependencies.iter().fold(
            PrefabDefinition::new(id, PrefabEntity::new(id)),
            |definition, dependency| definition.with_dependency(*dependency),
        )
    }

    #[test]
    fn mutual_dependency_is_rejected_and_prior_state_kept() {
        let mut registry = PrefabRegistry::new();
        registry.register(prefab("a", &["b"])).expect("a");
        let err = registry.register(prefab("b", &["a"])).expect_err("cycle");

        assert_eq!(
            err,
            PrefabRegistryError::CyclicDependency {
                id: "b".to_string(),
                cycle: vec!["b".to_string(), "a".to_string(), "b".to_string()],
            }
        );
        assert!(registry.contains("a"));
        assert!(!registry.contains("b"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut registry = PrefabRegistry::new();
        let err = registry.register(prefab("loop", &["loop"])).expect_err("cycle");
        assert_eq!(err.code(), DiagnosticCode::CyclicDependency);
        assert!(registry.is_empty());
    }

    #[test]
    fn rejected_replacement_keeps_previous_version() {
        let mut registry = PrefabRegistry::new();
        registry.register(prefab("a", &[])).expect("a");
        registry.register(prefab("b", &["a"])).expect("b");

        let mut replacement = prefab("a", &["b"]);
        replacement.version = 2;
        registry.register(replacement).expect_err("cycle");

        assert_eq!(registry.get("a").map(|a| a.version), Some(1));
        assert!(registry.get("a").is_some_and(|a| a.dependencies.is_empty()));
    }

    #[test]
    fn last_write_wins() {
        let mut registry = PrefabRegistry::new();
        registry.register(prefab("tree", &[])).expect("v1");
        let mut v2 = prefab("tree", &[]);
        v2.version = 2;
        registry.register(v2).expect("v2");

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("tree").map(|tree| tree.version), Some(2));
    }

    #[test]
    fn diamond_dependencies_are_not_cycles() {
        let mut registry = PrefabRegistry::new();
        registry.register(prefab("base", &[])).expect("base");
        registry.register(prefab("left", &["base"])).expect("left");
        registry.register(prefab("right", &["base"])).expect("right");
        registry.register(prefab("top", &["left", "right"])).expect("top");
        assert_eq!(registry.ids(), vec!["base", "left", "right", "top"]);
    }

    #[test]
    fn long_cycle_reports_full_path() {
        let mut registry = PrefabRegistry::new();
        registry.register(prefab("a", &["b"])).expect("a");
        registry.register(prefab("b", &["c"])).expect("b");
        let err = registry.register(prefab("c", &["a"])).expect_err("cycle");
        assert_eq!(
            err.to_string(),
            "prefab 'c' would form a dependency cycle: c -> a -> b -> c"
        );
    }

    #[test]
    fn register_all_reports_and_continues() {
        let mut registry = PrefabRegistry::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let registered = registry.register_all(
            vec![prefab("a", &["b"]), prefab("b", &["a"]), prefab("c", &[])],
            &mut diagnostics,
        );

        assert_eq!(registered, 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::CyclicDependency);
        assert_eq!(diagnostics[0].entity.as_deref(), Some("b"));
        assert_eq!(registry.ids(), vec!["a", "c"]);
    }

    #[test]
    fn unknown_dependencies_are_allowed() {
        let mut registry = PrefabRegistry::new();
        registry.register(prefab("house", &["door"])).expect("house");
        assert!(registry.get("door").is_none());
        assert_eq!(registry.iter().count(), 1);
    }
}
