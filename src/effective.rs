//! Computing the effective `(version, scope, versionSelfManaged)` of a declared dependency,
//! consulting dependency management when the declaration itself is silent.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::warn;

use crate::coordinate::{Dependency, DependencyKey, DependencyManagementEntry, GroupArtifact, Scope, VersionScope};
use crate::dependency_management::hierarchical_dependency_management;
use crate::pom::{is_profile_active, RawDependency};
use crate::project::{profile_key, Project};
use crate::universe::ProjectContainer;

/// A declared dependency after GAV/scope interpolation, before dependency management has
/// been consulted. `version`/`scope` are `None` exactly when the POM left them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolatedDependency {
    pub key: DependencyKey,
    pub version: Option<String>,
    pub scope: Option<Scope>,
    pub version_self_managed: bool,
    pub optional: bool,
    pub exclusions: HashSet<GroupArtifact>,
}

fn interpolate_group_artifact(project: &Project, container: &dyn ProjectContainer, pair: &(String, String)) -> GroupArtifact {
    GroupArtifact::new(
        project.interpolate(container, &pair.0).resolved,
        project.interpolate(container, &pair.1).resolved,
    )
}

pub(crate) fn interpolate_declared_dependency(
    project: &Project,
    container: &dyn ProjectContainer,
    raw: &RawDependency,
) -> InterpolatedDependency {
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

    // Declared (non-management) dependencies never allow `import`.
    let scope = raw
        .scope
        .as_deref()
        .map(|s| Scope::from_str_opt(Some(&project.interpolate(container, s).resolved), false));

    let exclusions = raw
        .exclusions
        .iter()
        .map(|pair| interpolate_group_artifact(project, container, pair))
        .collect();

    InterpolatedDependency {
        key: DependencyKey {
            group_id,
            artifact_id,
            classifier,
            r#type,
        },
        version,
        scope,
        version_self_managed,
        optional: raw.optional.unwrap_or(false),
        exclusions,
    }
}

/// The project's own `<dependencies>` plus those of every active profile, interpolated.
/// Memoized on the project, keyed by the active-profile set.
pub fn interpolated_dependencies(
    project: &Rc<Project>,
    container: &dyn ProjectContainer,
    active_profile_ids: &HashSet<String>,
) -> Rc<Vec<InterpolatedDependency>> {
    let key = profile_key(active_profile_ids);
    let project_ref = Rc::clone(project);
    project.get_or_compute_declared_dependencies(key, move || {
        let mut out: Vec<InterpolatedDependency> = project_ref
            .raw
            .dependencies
            .iter()
            .map(|raw| interpolate_declared_dependency(&project_ref, container, raw))
            .collect();
        for profile in &project_ref.raw.profiles {
            if is_profile_active(profile, active_profile_ids) {
                out.extend(
                    profile
                        .dependencies
                        .iter()
                        .map(|raw| interpolate_declared_dependency(&project_ref, container, raw)),
                );
            }
        }
        out
    })
}

/// Falls back from the declaration's own version/scope to dependency management, then to
/// Maven's compile-scope default, in that order; a version still missing at the end is
/// logged and left `None` rather than treated as an error.
pub fn effective_version_scope(
    declared: &InterpolatedDependency,
    hierarchical_dm: &HashMap<DependencyKey, DependencyManagementEntry>,
    caller_allows_self_managed: bool,
) -> VersionScope {
    if declared.version.is_some() && declared.scope.is_some() {
        return VersionScope::new(
            declared.version.clone(),
            declared.scope.unwrap(),
            declared.version_self_managed && caller_allows_self_managed,
        );
    }

    let dm_entry = hierarchical_dm.get(&declared.key);

    let (version, version_self_managed) = match &declared.version {
        Some(v) => (Some(v.clone()), declared.version_self_managed),
        None => match dm_entry {
            Some(entry) => (entry.version_scope.version.clone(), entry.version_scope.version_self_managed),
            None => (None, false),
        },
    };

    if version.is_none() {
        warn!(dependency = %declared.key, "missing version, no dependency management entry covers this dependency");
    }

    let scope = declared
        .scope
        .or_else(|| dm_entry.map(|entry| entry.version_scope.scope))
        .unwrap_or_default();

    VersionScope::new(version, scope, version_self_managed && caller_allows_self_managed)
}

/// Local declared dependencies with their effective version/scope computed against the
/// project's hierarchical dependency management.
pub fn declared_dependencies_with_effective_version_scope(
    project: &Rc<Project>,
    container: &dyn ProjectContainer,
    active_profile_ids: &HashSet<String>,
) -> Vec<Dependency> {
    let declared = interpolated_dependencies(project, container, active_profile_ids);
    let dm = hierarchical_dependency_management(project, container, active_profile_ids, true);

    declared
        .iter()
        .map(|d| Dependency {
            key: d.key.clone(),
            version_scope: effective_version_scope(d, &dm, true),
            optional: d.optional,
            exclusions: d.exclusions.clone(),
        })
        .collect()
}
