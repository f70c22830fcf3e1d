use std::collections::HashMap;
use std::path::Path;

use crate::error::CrateError;

#[derive(Debug, Clone, Default)]
pub struct RawParent {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RawDependency {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub r#type: Option<String>,
    pub scope: Option<String>,
    pub optional: Option<bool>,
    // (groupId, artifactId) pairs; either side may still be a ${...} expression
    pub exclusions: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct RawPlugin {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RawProfile {
    pub id: String,
    pub active_by_default: bool,
    pub properties: HashMap<String, String>,
    pub dependencies: Vec<RawDependency>,
    pub dependency_management: Vec<RawDependency>,
    pub build_plugins: Vec<RawPlugin>,
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RawPom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub parent: Option<RawParent>,
    pub properties: HashMap<String, String>,
    pub dependency_management: Vec<RawDependency>,
    pub dependencies: Vec<RawDependency>,
    pub build_plugins: Vec<RawPlugin>,
    pub plugin_management: Vec<RawPlugin>,
    pub profiles: Vec<RawProfile>,
    pub modules: Vec<String>,
    pub prerequisites_maven: Option<String>,
}

// a profile is active by explicit id or activeByDefault; no OS/JDK/file activation
pub fn is_profile_active(profile: &RawProfile, active_profile_ids: &std::collections::HashSet<String>) -> bool {
    active_profile_ids.contains(&profile.id) || profile.active_by_default
}

pub trait PomReader {
    fn read(&self, path: &Path) -> Result<RawPom, CrateError>;
}
