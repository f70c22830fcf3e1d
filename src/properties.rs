//! Resolves a single `${name}` reference against a project's own properties, a small
//! built-in table, and the ancestor chain.

use std::collections::HashMap;

use tracing::warn;

use crate::interpolate::interpolate_inner;
use crate::project::Project;
use crate::universe::ProjectContainer;

// self-referential property definitions aren't detected as cycles, just bounded by depth
pub(crate) const MAX_RECURSION_DEPTH: u32 = 64;

/// The outcome of a single property lookup: which project defined it, its value, and
/// whether the whole chain that produced it stayed inside the querying project's own
/// properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLocation {
    pub defining_project: crate::coordinate::Gav,
    pub name: String,
    pub value: String,
    pub self_managed: bool,
}

const MAVEN_VERSION: &str = "3.1.1";

// substitutes ${...} using only `properties` (no built-ins, no ancestor chain); used to
// bootstrap a project's own and its parent's GAV fields before the project exists yet.
// leaves unresolved references in place so is_resolved() still catches them.
pub(crate) fn quick_substitute(raw: &str, properties: &HashMap<String, String>) -> String {
    let mut out = String::new();
    let mut rest = raw;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match properties.get(name) {
                    Some(v) => out.push_str(v),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str("${");
                rest = after;
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

fn builtin_lookup(project: &Project, name: &str) -> Option<(String, bool)> {
    // (value, "is this an illegal/deprecated shorthand that should log a warning")
    match name {
        "project.version" | "pom.version" => Some((project.gav.version.clone(), false)),
        "version" => Some((project.gav.version.clone(), true)),
        "project.groupId" | "pom.groupId" => Some((project.gav.group_id.clone(), false)),
        "groupId" | "@project.groupId@" => Some((project.gav.group_id.clone(), true)),
        "project.artifactId" | "pom.artifactId" => Some((project.gav.artifact_id.clone(), false)),
        "artifactId" => Some((project.gav.artifact_id.clone(), true)),
        "project.prerequisites.maven" => project.raw.prerequisites_maven.clone().map(|v| (v, false)),
        "mavenVersion" => Some((MAVEN_VERSION.to_owned(), false)),
        // known quirk: this doesn't return an actual JVM version, just the literal name
        "java.version" => Some(("java.version".to_owned(), false)),
        _ => None,
    }
}

// walks, in order: a literal ${...} wrapper, the project's own properties, the built-in
// table, the project.parent.*/parent.* rewrite, and finally the parent project itself.
pub(crate) fn resolve_property(
    project: &Project,
    container: &dyn ProjectContainer,
    name: &str,
    can_be_self_managed: bool,
    depth: u32,
) -> Option<PropertyLocation> {
    if depth > MAX_RECURSION_DEPTH {
        warn!(property = name, "property recursion depth exceeded, treating as unresolved");
        return None;
    }

    // strip an enclosing ${...} wrapper if the caller passed one in verbatim
    let name = name
        .strip_prefix("${")
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(name);

    // the project's own properties
    if let Some(raw_value) = project.properties.get(name) {
        if raw_value.contains("${") {
            let nested = interpolate_inner(project, container, raw_value, can_be_self_managed, depth + 1);
            if nested.has_unresolved_properties {
                // a property value that itself references something unresolved counts as
                // unresolved overall
                return None;
            }
            return Some(PropertyLocation {
                defining_project: project.gav.clone(),
                name: name.to_owned(),
                value: nested.resolved,
                self_managed: can_be_self_managed && nested.self_managed,
            });
        }
        return Some(PropertyLocation {
            defining_project: project.gav.clone(),
            name: name.to_owned(),
            value: raw_value.clone(),
            self_managed: can_be_self_managed,
        });
    }

    // the built-in table
    if let Some((value, illegal_shorthand)) = builtin_lookup(project, name) {
        if illegal_shorthand {
            warn!(property = name, project = %project.gav, "illegal property");
        }
        return Some(PropertyLocation {
            defining_project: project.gav.clone(),
            name: name.to_owned(),
            value,
            self_managed: can_be_self_managed,
        });
    }

    // project.parent.* and the parent.* shorthand both rewrite to project.* on the parent
    let rewritten = name
        .strip_prefix("project.parent.")
        .or_else(|| name.strip_prefix("parent."))
        .map(|suffix| format!("project.{}", suffix));

    if let Some(rewritten_name) = rewritten {
        return match container.parent_of(project) {
            Some(parent) => resolve_property(parent.as_ref(), container, &rewritten_name, false, depth + 1),
            None => {
                warn!(property = name, project = %project.gav, "missing parent project during property resolution");
                project.unresolved_properties.borrow_mut().insert(name.to_owned());
                None
            }
        };
    }

    // delegate to the parent
    if project.parent_gav.is_some() {
        if let Some(parent) = container.parent_of(project) {
            return resolve_property(parent.as_ref(), container, name, false, depth + 1);
        }
        warn!(property = name, project = %project.gav, "missing parent project during property resolution");
    }

    // nothing left to try
    project.unresolved_properties.borrow_mut().insert(name.to_owned());
    None
}
