use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;

use crate::coordinate::{DependencyKey, DependencyManagementEntry, Gav, GroupArtifact};
use crate::effective::InterpolatedDependency;
use crate::error::CrateError;
use crate::interpolate::{interpolate_inner, ValueResolution};
use crate::plugin_management::InterpolatedPlugin;
use crate::pom::RawPom;
use crate::properties::quick_substitute;
use crate::universe::ProjectContainer;

// HashSet isn't Hash, so the per-project caches normalize the active-profile set to a
// sorted Vec to use as a cache key.
pub(crate) fn profile_key(active_profile_ids: &HashSet<String>) -> Vec<String> {
    let mut key: Vec<String> = active_profile_ids.iter().cloned().collect();
    key.sort();
    key
}

pub struct Project {
    pub pom_file: PathBuf,
    pub is_external: bool,
    pub raw: RawPom,
    pub gav: Gav,
    pub parent_gav: Option<Gav>,
    pub properties: HashMap<String, String>,

    pub(crate) interpolation_cache: RefCell<HashMap<String, ValueResolution>>,
    pub(crate) dm_cache: RefCell<HashMap<Vec<String>, Rc<HashMap<DependencyKey, DependencyManagementEntry>>>>,
    pub(crate) plugin_dm_cache: RefCell<Option<Rc<HashMap<GroupArtifact, String>>>>,
    pub(crate) declared_dependencies_cache: RefCell<HashMap<Vec<String>, Rc<Vec<InterpolatedDependency>>>>,
    pub(crate) declared_plugins_cache: RefCell<Option<Rc<Vec<InterpolatedPlugin>>>>,
    pub(crate) unresolved_properties: RefCell<HashSet<String>>,
}

impl Project {
    // Computes the project's canonical GAV (inheriting groupId/version from the parent when
    // omitted — artifactId is never inherited) and checks the fatal-error conditions. Doesn't
    // register the project anywhere; that's the caller's job.
    pub fn new(
        pom_file: PathBuf,
        is_external: bool,
        raw: RawPom,
        container: &dyn ProjectContainer,
    ) -> Result<Rc<Project>, CrateError> {
        let properties = raw.properties.clone();

        // Parent coordinates are interpolated against this project's own local properties
        // only: at this point the project's own GAV (and thus its built-in properties)
        // doesn't exist yet, and parent coordinates referencing it would be nonsensical.
        let parent_gav = raw.parent.as_ref().map(|p| Gav {
            group_id: quick_substitute(p.group_id.as_deref().unwrap_or_default(), &properties),
            artifact_id: quick_substitute(p.artifact_id.as_deref().unwrap_or_default(), &properties),
            version: quick_substitute(p.version.as_deref().unwrap_or_default(), &properties),
        });

        // throwaway instance, just so interpolate() has a project to run against while we're
        // still figuring out this project's own gav
        let bootstrap = Project {
            pom_file: pom_file.clone(),
            is_external,
            raw: raw.clone(),
            gav: Gav::placeholder(),
            parent_gav: parent_gav.clone(),
            properties: properties.clone(),
            interpolation_cache: RefCell::new(HashMap::new()),
            dm_cache: RefCell::new(HashMap::new()),
            plugin_dm_cache: RefCell::new(None),
            declared_dependencies_cache: RefCell::new(HashMap::new()),
            declared_plugins_cache: RefCell::new(None),
            unresolved_properties: RefCell::new(HashSet::new()),
        };

        let resolve_component = |raw_value: &Option<String>, inherited: Option<&str>| -> String {
            match raw_value {
                Some(v) if v.contains("${") => bootstrap.interpolate(container, v).resolved,
                Some(v) => v.clone(),
                None => inherited.map(|s| s.to_owned()).unwrap_or_default(),
            }
        };

        let group_id = resolve_component(&raw.group_id, parent_gav.as_ref().map(|p| p.group_id.as_str()));
        // artifactId is never inherited from the parent in Maven.
        let artifact_id = resolve_component(&raw.artifact_id, None);
        let version = resolve_component(&raw.version, parent_gav.as_ref().map(|p| p.version.as_str()));

        if group_id.is_empty() && parent_gav.is_none() {
            return Err(CrateError::MissingGroupId { path: pom_file });
        }
        if version.is_empty() && parent_gav.is_none() {
            return Err(CrateError::MissingVersion { path: pom_file });
        }

        let gav = Gav::new(group_id, artifact_id, version);
        if !gav.is_resolved() {
            return Err(CrateError::UnresolvedGav {
                path: pom_file,
                gav_display: gav.to_string(),
            });
        }
        if let Some(pg) = &parent_gav {
            if !pg.is_resolved() {
                return Err(CrateError::UnresolvedParentGav {
                    path: pom_file,
                    gav_display: pg.to_string(),
                });
            }
        }

        Ok(Rc::new(Project {
            pom_file,
            is_external,
            raw,
            gav,
            parent_gav,
            properties,
            interpolation_cache: RefCell::new(HashMap::new()),
            dm_cache: RefCell::new(HashMap::new()),
            plugin_dm_cache: RefCell::new(None),
            declared_dependencies_cache: RefCell::new(HashMap::new()),
            declared_plugins_cache: RefCell::new(None),
            unresolved_properties: RefCell::new(HashSet::new()),
        }))
    }

    // cache keyed by the raw input string, so a hit returns exactly what was computed the
    // first time
    pub fn interpolate(&self, container: &dyn ProjectContainer, raw: &str) -> ValueResolution {
        if let Some(cached) = self.interpolation_cache.borrow().get(raw) {
            return cached.clone();
        }
        let resolution = interpolate_inner(self, container, raw, true, 0);
        self.interpolation_cache.borrow_mut().insert(raw.to_owned(), resolution.clone());
        resolution
    }

    pub fn unresolved_properties(&self) -> HashSet<String> {
        self.unresolved_properties.borrow().clone()
    }

    pub(crate) fn get_or_compute_dm(
        &self,
        key: Vec<String>,
        compute: impl FnOnce() -> HashMap<DependencyKey, DependencyManagementEntry>,
    ) -> Rc<HashMap<DependencyKey, DependencyManagementEntry>> {
        if let Some(cached) = self.dm_cache.borrow().get(&key) {
            return Rc::clone(cached);
        }
        let computed = Rc::new(compute());
        self.dm_cache.borrow_mut().insert(key, Rc::clone(&computed));
        computed
    }

    pub(crate) fn get_or_compute_plugin_dm(
        &self,
        compute: impl FnOnce() -> HashMap<GroupArtifact, String>,
    ) -> Rc<HashMap<GroupArtifact, String>> {
        if let Some(cached) = self.plugin_dm_cache.borrow().as_ref() {
            return Rc::clone(cached);
        }
        let computed = Rc::new(compute());
        *self.plugin_dm_cache.borrow_mut() = Some(Rc::clone(&computed));
        computed
    }

    pub(crate) fn get_or_compute_declared_dependencies(
        &self,
        key: Vec<String>,
        compute: impl FnOnce() -> Vec<InterpolatedDependency>,
    ) -> Rc<Vec<InterpolatedDependency>> {
        if let Some(cached) = self.declared_dependencies_cache.borrow().get(&key) {
            return Rc::clone(cached);
        }
        let computed = Rc::new(compute());
        self.declared_dependencies_cache.borrow_mut().insert(key, Rc::clone(&computed));
        computed
    }

    pub(crate) fn get_or_compute_declared_plugins(
        &self,
        compute: impl FnOnce() -> Vec<InterpolatedPlugin>,
    ) -> Rc<Vec<InterpolatedPlugin>> {
        if let Some(cached) = self.declared_plugins_cache.borrow().as_ref() {
            return Rc::clone(cached);
        }
        let computed = Rc::new(compute());
        *self.declared_plugins_cache.borrow_mut() = Some(Rc::clone(&computed));
        computed
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("gav", &self.gav)
            .field("parent_gav", &self.parent_gav)
            .field("is_external", &self.is_external)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::InMemoryProjectContainer;

    #[test]
    fn initialized_project_has_a_resolved_gav() {
        let container = InMemoryProjectContainer::new();
        let raw = RawPom {
            group_id: Some("com.x".to_owned()),
            artifact_id: Some("lib".to_owned()),
            version: Some("1.0".to_owned()),
            ..Default::default()
        };
        let project = Project::new(PathBuf::from("pom.xml"), false, raw, &container).unwrap();
        assert!(project.gav.is_resolved());
    }

    #[test]
    fn missing_group_id_without_parent_is_fatal() {
        let container = InMemoryProjectContainer::new();
        let raw = RawPom {
            artifact_id: Some("lib".to_owned()),
            version: Some("1.0".to_owned()),
            ..Default::default()
        };
        let err = Project::new(PathBuf::from("pom.xml"), false, raw, &container).unwrap_err();
        assert!(matches!(err, CrateError::MissingGroupId { .. }));
    }

    #[test]
    fn child_inherits_group_id_and_version_from_parent() {
        let mut container = InMemoryProjectContainer::new();
        let parent_raw = RawPom {
            group_id: Some("com.x".to_owned()),
            artifact_id: Some("parent".to_owned()),
            version: Some("2.0".to_owned()),
            ..Default::default()
        };
        let parent = Project::new(PathBuf::from("parent/pom.xml"), false, parent_raw, &container).unwrap();
        container.insert(Rc::clone(&parent));

        let child_raw = RawPom {
            artifact_id: Some("child".to_owned()),
            parent: Some(crate::pom::RawParent {
                group_id: Some("com.x".to_owned()),
                artifact_id: Some("parent".to_owned()),
                version: Some("2.0".to_owned()),
            }),
            ..Default::default()
        };
        let child = Project::new(PathBuf::from("child/pom.xml"), false, child_raw, &container).unwrap();
        assert_eq!(child.gav, Gav::new("com.x", "child", "2.0"));
    }

    #[test]
    fn parent_version_placeholder_is_replaced_during_initialization() {
        let mut container = InMemoryProjectContainer::new();
        let parent_raw = RawPom {
            group_id: Some("com.x".to_owned()),
            artifact_id: Some("parent".to_owned()),
            version: Some("2.0".to_owned()),
            ..Default::default()
        };
        let parent = Project::new(PathBuf::from("parent/pom.xml"), false, parent_raw, &container).unwrap();
        container.insert(Rc::clone(&parent));

        let child_raw = RawPom {
            artifact_id: Some("child".to_owned()),
            version: Some("${parent.version}".to_owned()),
            parent: Some(crate::pom::RawParent {
                group_id: Some("com.x".to_owned()),
                artifact_id: Some("parent".to_owned()),
                version: Some("2.0".to_owned()),
            }),
            ..Default::default()
        };
        let child = Project::new(PathBuf::from("child/pom.xml"), false, child_raw, &container).unwrap();
        assert_eq!(child.gav.version, "2.0");
    }
}
