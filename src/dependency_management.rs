//! Hierarchical dependency-management composition: walking the ancestor chain, folding in
//! each project's own `<dependencyManagement>` plus active-profile DM, and recursively
//! importing BOMs.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::warn;

use crate::coordinate::{DependencyKey, DependencyManagementEntry, Gav, GroupArtifact, Scope, VersionScope};
use crate::pom::{is_profile_active, RawDependency};
use crate::project::{profile_key, Project};
use crate::universe::ProjectContainer;

fn interpolate_group_artifact(project: &Project, container: &dyn ProjectContainer, pair: &(String, String)) -> GroupArtifact {
    GroupArtifact::new(
        project.interpolate(container, &pair.0).resolved,
        project.interpolate(container, &pair.1).resolved,
    )
}

/// `(key, entry, is_import)` for a single raw `<dependencyManagement>` entry, fully
/// interpolated against `project`'s own properties.
fn interpolate_dm_entry(
    project: &Project,
    container: &dyn ProjectContainer,
    raw: &RawDependency,
) -> (DependencyKey, DependencyManagementEntry, bool) {
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
    let classifier = raw.classifier.as_deref().map(|s| project.interpolate(container, s).resolved);
    let r#type = raw
        .r#type
        .as_deref()
        .map(|s| project.interpolate(container, s).resolved)
        .unwrap_or_else(|| crate::coordinate::DEFAULT_TYPE.to_owned());

    let version_resolution = raw.version.as_deref().map(|s| project.interpolate(container, s));
    let version = version_resolution.as_ref().map(|r| r.resolved.clone());
    let version_self_managed = version_resolution.as_ref().map(|r| r.self_managed).unwrap_or(true);

    // dependencyManagement is the only context where `import` is a legal scope.
    let scope_str = raw.scope.as_deref().map(|s| project.interpolate(container, s).resolved);
    let scope = Scope::from_str_opt(scope_str.as_deref(), true);
    let is_import = scope == Scope::Import;

    let exclusions = raw
        .exclusions
        .iter()
        .map(|pair| interpolate_group_artifact(project, container, pair))
        .collect();

    let key = DependencyKey {
        group_id,
        artifact_id,
        classifier,
        r#type,
    };
    let entry = DependencyManagementEntry {
        version_scope: VersionScope::new(version, scope, version_self_managed),
        exclusions,
    };
    (key, entry, is_import)
}

/// The project's own `<dependencyManagement>` plus active-profile DM, in nearest-wins
/// order (own declarations first). Profile DM is folded in eagerly here rather than left
/// as a lazily-constructed iterator that the caller might never force.
fn fold_local_dm(
    project: &Project,
    container: &dyn ProjectContainer,
    active_profile_ids: &HashSet<String>,
) -> Vec<(DependencyKey, DependencyManagementEntry, bool)> {
    let mut entries: Vec<(DependencyKey, DependencyManagementEntry, bool)> = project
        .raw
        .dependency_management
        .iter()
        .map(|raw| interpolate_dm_entry(project, container, raw))
        .collect();

    for profile in &project.raw.profiles {
        if is_profile_active(profile, active_profile_ids) {
            entries.extend(
                profile
                    .dependency_management
                    .iter()
                    .map(|raw| interpolate_dm_entry(project, container, raw)),
            );
        }
    }

    entries
}

fn demote(entry: &DependencyManagementEntry) -> DependencyManagementEntry {
    DependencyManagementEntry {
        version_scope: VersionScope {
            version_self_managed: false,
            ..entry.version_scope.clone()
        },
        exclusions: entry.exclusions.clone(),
    }
}

fn compute_full(
    project: &Rc<Project>,
    container: &dyn ProjectContainer,
    active_profile_ids: &HashSet<String>,
) -> HashMap<DependencyKey, DependencyManagementEntry> {
    let mut chain: Vec<Rc<Project>> = Vec::new();
    let mut current = Some(Rc::clone(project));
    while let Some(p) = current {
        current = container.parent_of(&p);
        chain.push(p);
    }

    let mut acc: HashMap<DependencyKey, DependencyManagementEntry> = HashMap::new();

    for (idx, chain_project) in chain.iter().enumerate() {
        let is_first = idx == 0;
        let local_entries = fold_local_dm(chain_project, container, active_profile_ids);

        let mut bom_gavs: Vec<Gav> = Vec::new();
        for (key, mut entry, is_import) in local_entries {
            if is_import {
                match &entry.version_scope.version {
                    Some(version) => bom_gavs.push(Gav::new(key.group_id.clone(), key.artifact_id.clone(), version.clone())),
                    None => warn!(bom = %key, project = %chain_project.gav, "BOM import entry has no resolvable version"),
                }
            }
            // Only the nearest project in the chain may contribute self-managed versions;
            // every ancestor beyond it is demoted before insertion.
            if !is_first {
                entry.version_scope.version_self_managed = false;
            }
            acc.entry(key).or_insert(entry);
        }

        for bom_gav in bom_gavs {
            match container.for_gav(&bom_gav) {
                Some(bom_project) => {
                    let bom_dm = hierarchical_dependency_management(&bom_project, container, active_profile_ids, false);
                    for (key, entry) in bom_dm {
                        acc.entry(key).or_insert(entry);
                    }
                }
                None => warn!(bom = %bom_gav, "missing project when importing a BOM"),
            }
        }
    }

    acc
}

/// A project's full, effective `<dependencyManagement>`: its own DM folded with every
/// ancestor's DM and all BOMs transitively imported by any of them, nearest-wins.
///
/// The underlying per-project cache always holds the "as if self-managed were allowed"
/// view; when `version_can_be_self_managed` is `false` the caller gets a shallow demoted
/// copy rather than a separately cached computation.
pub fn hierarchical_dependency_management(
    project: &Rc<Project>,
    container: &dyn ProjectContainer,
    active_profile_ids: &HashSet<String>,
    version_can_be_self_managed: bool,
) -> HashMap<DependencyKey, DependencyManagementEntry> {
    let key = profile_key(active_profile_ids);
    let project_for_compute = Rc::clone(project);
    let full = project.get_or_compute_dm(key, move || compute_full(&project_for_compute, container, active_profile_ids));

    if version_can_be_self_managed {
        (*full).clone()
    } else {
        full.iter().map(|(k, v)| (k.clone(), demote(v))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pom::{RawParent, RawPom};
    use crate::universe::InMemoryProjectContainer;

    fn leaf_project(container: &InMemoryProjectContainer, gid: &str, aid: &str, version: &str, dm_version: Option<&str>, parent: Option<(&str, &str, &str)>) -> Rc<Project> {
        let raw = RawPom {
            group_id: if parent.is_none() { Some(gid.to_owned()) } else { None },
            artifact_id: Some(aid.to_owned()),
            version: if parent.is_none() { Some(version.to_owned()) } else { None },
            parent: parent.map(|(pg, pa, pv)| RawParent {
                group_id: Some(pg.to_owned()),
                artifact_id: Some(pa.to_owned()),
                version: Some(pv.to_owned()),
            }),
            dependency_management: dm_version
                .map(|v| {
                    vec![RawDependency {
                        group_id: Some("k.g".to_owned()),
                        artifact_id: Some("k.a".to_owned()),
                        version: Some(v.to_owned()),
                        ..Default::default()
                    }]
                })
                .unwrap_or_default(),
            ..Default::default()
        };
        Project::new(std::path::PathBuf::from(format!("{}/pom.xml", aid)), false, raw, container).unwrap()
    }

    #[test]
    fn nearest_wins_across_three_generations() {
        let mut container = InMemoryProjectContainer::new();
        let grandparent = leaf_project(&container, "g", "grandparent", "1.0", Some("vC"), None);
        container.insert(Rc::clone(&grandparent));
        let parent = leaf_project(&container, "g", "parent", "1.0", Some("vB"), Some(("g", "grandparent", "1.0")));
        container.insert(Rc::clone(&parent));
        let child = leaf_project(&container, "g", "child", "1.0", Some("vA"), Some(("g", "parent", "1.0")));
        container.insert(Rc::clone(&child));

        let dm = hierarchical_dependency_management(&child, &container, &HashSet::new(), true);
        let key = DependencyKey::new("k.g", "k.a");
        assert_eq!(dm[&key].version_scope.version.as_deref(), Some("vA"));

        // If the child omits the key, the nearer ancestor (parent) wins over the
        // grandparent.
        let child_no_dm = leaf_project(&container, "g", "child2", "1.0", None, Some(("g", "parent", "1.0")));
        let dm2 = hierarchical_dependency_management(&child_no_dm, &container, &HashSet::new(), true);
        assert_eq!(dm2[&key].version_scope.version.as_deref(), Some("vB"));
    }

    #[test]
    fn bom_import_demotes_self_managed() {
        let mut container = InMemoryProjectContainer::new();
        let bom_raw = RawPom {
            group_id: Some("boms".to_owned()),
            artifact_id: Some("bom".to_owned()),
            version: Some("1.0".to_owned()),
            dependency_management: vec![RawDependency {
                group_id: Some("x".to_owned()),
                artifact_id: Some("y".to_owned()),
                version: Some("3.1".to_owned()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let bom = Project::new(std::path::PathBuf::from("bom/pom.xml"), false, bom_raw, &container).unwrap();
        container.insert(Rc::clone(&bom));

        let q_raw = RawPom {
            group_id: Some("g".to_owned()),
            artifact_id: Some("q".to_owned()),
            version: Some("1.0".to_owned()),
            dependency_management: vec![RawDependency {
                group_id: Some("boms".to_owned()),
                artifact_id: Some("bom".to_owned()),
                version: Some("1.0".to_owned()),
                scope: Some("import".to_owned()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let q = Project::new(std::path::PathBuf::from("q/pom.xml"), false, q_raw, &container).unwrap();
        container.insert(Rc::clone(&q));

        let dm = hierarchical_dependency_management(&q, &container, &HashSet::new(), true);
        let key = DependencyKey::new("x", "y");
        assert_eq!(dm[&key].version_scope.version.as_deref(), Some("3.1"));
        assert!(!dm[&key].version_scope.version_self_managed);
    }

    #[test]
    fn hierarchical_dm_is_idempotent() {
        let mut container = InMemoryProjectContainer::new();
        let p = leaf_project(&container, "g", "p", "1.0", Some("1.0"), None);
        container.insert(Rc::clone(&p));
        let first = hierarchical_dependency_management(&p, &container, &HashSet::new(), true);
        let second = hierarchical_dependency_management(&p, &container, &HashSet::new(), true);
        assert_eq!(first, second);
    }
}
