//! Plugin dependency management: the same nearest-wins ancestor fold as
//! [`crate::dependency_management`], but keyed by `(groupId, artifactId)`, version-only,
//! and explicitly blind to profiles.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::warn;

use crate::coordinate::GroupArtifact;
use crate::pom::RawPlugin;
use crate::project::Project;
use crate::universe::ProjectContainer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolatedPlugin {
    pub group_artifact: GroupArtifact,
    pub version: Option<String>,
}

fn interpolate_plugin_entry(project: &Project, container: &dyn ProjectContainer, raw: &RawPlugin) -> (GroupArtifact, Option<String>) {
    let group_id = raw
        .group_id
        .as_deref()
        .map(|s| project.interpolate(container, s).resolved)
        .unwrap_or_default();
    let artifact_id = raw
        .artifact_id
        .as_deref()
        .map(|s| project.interpolate(container, s).resolved)
        .unwrap_or_default();
    let version_resolution = raw.version.as_deref().map(|s| project.interpolate(container, s));
    // Unresolvable versions are dropped silently here; local_plugin_dependencies is where
    // a still-missing version actually gets warned about.
    let version = version_resolution.and_then(|r| if r.has_unresolved_properties { None } else { Some(r.resolved) });
    (GroupArtifact::new(group_id, artifact_id), version)
}

fn compute_full(project: &Rc<Project>, container: &dyn ProjectContainer) -> HashMap<GroupArtifact, String> {
    let mut chain: Vec<Rc<Project>> = Vec::new();
    let mut current = Some(Rc::clone(project));
    while let Some(p) = current {
        current = container.parent_of(&p);
        chain.push(p);
    }

    let mut acc: HashMap<GroupArtifact, String> = HashMap::new();
    for chain_project in &chain {
        for raw in &chain_project.raw.plugin_management {
            let (key, version) = interpolate_plugin_entry(chain_project, container, raw);
            if let Some(version) = version {
                acc.entry(key).or_insert(version);
            }
        }
    }
    acc
}

/// The plugin-management view visible to `project`: its own `<pluginManagement>` plus every
/// ancestor's, nearest-wins. Profiles are never consulted here, even if active — Maven's
/// own plugin management does not honor profile-scoped declarations either.
pub fn hierarchical_plugin_management(project: &Rc<Project>, container: &dyn ProjectContainer) -> HashMap<GroupArtifact, String> {
    let project_for_compute = Rc::clone(project);
    let full = project.get_or_compute_plugin_dm(move || compute_full(&project_for_compute, container));
    (*full).clone()
}

/// The project's own declared build plugins, interpolated, with missing versions filled in
/// from hierarchical plugin management.
pub fn local_plugin_dependencies(project: &Rc<Project>, container: &dyn ProjectContainer) -> Vec<InterpolatedPlugin> {
    let plugin_dm = hierarchical_plugin_management(project, container);
    let project_for_compute = Rc::clone(project);
    (*project.get_or_compute_declared_plugins(move || {
        project_for_compute
            .raw
            .build_plugins
            .iter()
            .map(|raw| {
                let (group_artifact, declared_version) = interpolate_plugin_entry(&project_for_compute, container, raw);
                let version = declared_version.or_else(|| plugin_dm.get(&group_artifact).cloned());
                if version.is_none() {
                    warn!(plugin = %group_artifact, project = %project_for_compute.gav, "unresolvable plugin dependency");
                }
                InterpolatedPlugin { group_artifact, version }
            })
            .collect()
    }))
    .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pom::{RawParent, RawPom};
    use crate::universe::InMemoryProjectContainer;

    #[test]
    fn plugin_management_ignores_profiles() {
        let container = InMemoryProjectContainer::new();
        let raw = RawPom {
            group_id: Some("g".to_owned()),
            artifact_id: Some("a".to_owned()),
            version: Some("1.0".to_owned()),
            // `RawProfile` has no `pluginManagement` field at all: the model itself enforces
            // "plugin management does not honor profiles". An active profile's own build
            // plugins must still not leak into `hierarchical_plugin_management`, which only
            // ever reads the project's own top-level `plugin_management`.
            profiles: vec![crate::pom::RawProfile {
                id: "p1".to_owned(),
                active_by_default: true,
                build_plugins: vec![RawPlugin {
                    group_id: Some("pg".to_owned()),
                    artifact_id: Some("pa".to_owned()),
                    version: Some("9.9".to_owned()),
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let project = Project::new(std::path::PathBuf::from("pom.xml"), false, raw, &container).unwrap();
        let dm = hierarchical_plugin_management(&project, &container);
        assert!(dm.is_empty());
    }

    #[test]
    fn nearest_wins_for_plugin_management() {
        let mut container = InMemoryProjectContainer::new();
        let parent_raw = RawPom {
            group_id: Some("g".to_owned()),
            artifact_id: Some("parent".to_owned()),
            version: Some("1.0".to_owned()),
            plugin_management: vec![RawPlugin {
                group_id: Some("pg".to_owned()),
                artifact_id: Some("pa".to_owned()),
                version: Some("1.0".to_owned()),
            }],
            ..Default::default()
        };
        let parent = Project::new(std::path::PathBuf::from("parent/pom.xml"), false, parent_raw, &container).unwrap();
        container.insert(Rc::clone(&parent));

        let child_raw = RawPom {
            artifact_id: Some("child".to_owned()),
            parent: Some(RawParent {
                group_id: Some("g".to_owned()),
                artifact_id: Some("parent".to_owned()),
                version: Some("1.0".to_owned()),
            }),
            plugin_management: vec![RawPlugin {
                group_id: Some("pg".to_owned()),
                artifact_id: Some("pa".to_owned()),
                version: Some("2.0".to_owned()),
            }],
            ..Default::default()
        };
        let child = Project::new(std::path::PathBuf::from("child/pom.xml"), false, child_raw, &container).unwrap();
        let dm = hierarchical_plugin_management(&child, &container);
        assert_eq!(dm[&GroupArtifact::new("pg", "pa")], "2.0");
    }
}
