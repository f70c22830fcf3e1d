use std::collections::HashSet;
use std::fmt;

pub const UNRESOLVED_MARKER: &str = "${";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Gav {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Gav {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
        Gav {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    // only used while a Project is still figuring out its own GAV, never handed out otherwise
    pub(crate) fn placeholder() -> Self {
        Gav::default()
    }

    pub fn is_resolved(&self) -> bool {
        [&self.group_id, &self.artifact_id, &self.version]
            .into_iter()
            .all(|s| !s.is_empty() && !s.contains(UNRESOLVED_MARKER))
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupArtifact {
    pub group_id: String,
    pub artifact_id: String,
}

impl GroupArtifact {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        GroupArtifact {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for GroupArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

pub const DEFAULT_TYPE: &str = "jar";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyKey {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: Option<String>,
    pub r#type: String,
}

impl DependencyKey {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        DependencyKey {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: None,
            r#type: DEFAULT_TYPE.to_owned(),
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_type(mut self, r#type: impl Into<String>) -> Self {
        self.r#type = r#type.into();
        self
    }

    pub fn group_artifact(&self) -> GroupArtifact {
        GroupArtifact::new(self.group_id.clone(), self.artifact_id.clone())
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.r#type)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        Ok(())
    }
}

// Compile is the default once resolution is complete; Import is only legal inside
// <dependencyManagement>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Compile
    }
}

impl Scope {
    // case-insensitive; None/unknown falls back to Compile. `import` only parses when the
    // caller is looking at a dependencyManagement entry.
    pub fn from_str_opt(s: Option<&str>, allow_import: bool) -> Scope {
        match s.map(|s| s.to_ascii_lowercase()) {
            Some(ref s) if s == "provided" => Scope::Provided,
            Some(ref s) if s == "runtime" => Scope::Runtime,
            Some(ref s) if s == "test" => Scope::Test,
            Some(ref s) if s == "system" => Scope::System,
            Some(ref s) if s == "import" && allow_import => Scope::Import,
            Some(ref s) if s == "compile" => Scope::Compile,
            _ => Scope::Compile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionScope {
    pub version: Option<String>,
    pub scope: Scope,
    pub version_self_managed: bool,
}

impl VersionScope {
    pub fn new(version: Option<String>, scope: Scope, version_self_managed: bool) -> Self {
        VersionScope {
            version,
            scope,
            version_self_managed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyManagementEntry {
    pub version_scope: VersionScope,
    pub exclusions: HashSet<GroupArtifact>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub key: DependencyKey,
    pub version_scope: VersionScope,
    pub optional: bool,
    pub exclusions: HashSet<GroupArtifact>,
}
