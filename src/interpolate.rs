//! Expands arbitrary strings and GAV triples against a project's properties. Nested
//! `${${x}}` expressions are not supported.

use std::collections::HashMap;

use crate::coordinate::Gav;
use crate::properties::resolve_property;
use crate::project::Project;
use crate::universe::ProjectContainer;

/// The result of expanding a single raw string: the resolved text, whether the whole
/// expansion stayed self-managed, whether anything was left unresolved, and which
/// properties were consulted along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueResolution {
    pub raw: String,
    pub resolved: String,
    pub self_managed: bool,
    pub has_unresolved_properties: bool,
    pub properties_referenced: HashMap<String, Option<String>>,
}

const UNRESOLVED_LITERAL: &str = "null";

// left-to-right scan, callable recursively — a property value that itself contains ${...}
// is expanded through this same routine from resolve_property
pub(crate) fn interpolate_inner(
    project: &Project,
    container: &dyn ProjectContainer,
    raw: &str,
    can_be_self_managed: bool,
    depth: u32,
) -> ValueResolution {
    let mut resolved = String::new();
    let mut self_managed = can_be_self_managed;
    let mut has_unresolved_properties = false;
    let mut properties_referenced = HashMap::new();

    let mut rest = raw;
    while let Some(start) = rest.find("${") {
        resolved.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // no closing brace: emit the rest verbatim, same as Maven's own interpolator
            resolved.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let name = &after[..end];
        rest = &after[end + 1..];

        match resolve_property(project, container, name, can_be_self_managed, depth) {
            Some(location) => {
                resolved.push_str(&location.value);
                self_managed = self_managed && location.self_managed;
                properties_referenced.insert(name.to_owned(), Some(location.value));
            }
            None => {
                resolved.push_str(UNRESOLVED_LITERAL);
                has_unresolved_properties = true;
                self_managed = false;
                properties_referenced.insert(name.to_owned(), None);
            }
        }
    }
    resolved.push_str(rest);

    ValueResolution {
        raw: raw.to_owned(),
        resolved,
        self_managed,
        has_unresolved_properties,
        properties_referenced,
    }
}

pub fn interpolate_gav(
    project: &Project,
    container: &dyn ProjectContainer,
    group_id: Option<&str>,
    artifact_id: Option<&str>,
    version: Option<&str>,
) -> (Option<String>, Option<String>, Option<String>) {
    let one = |raw: Option<&str>| -> Option<String> {
        raw.map(|s| project.interpolate(container, s).resolved)
    };
    (one(group_id), one(artifact_id), one(version))
}

pub(crate) fn gav_from_parts(group_id: Option<String>, artifact_id: Option<String>, version: Option<String>) -> Gav {
    Gav {
        group_id: group_id.unwrap_or_default(),
        artifact_id: artifact_id.unwrap_or_default(),
        version: version.unwrap_or_default(),
    }
}
