//! Submodule enumeration: the GAV of every project referenced by `<modules>`, including
//! every profile's `<modules>` with no activation filtering.

use std::path::Path;

use tracing::warn;

use crate::coordinate::Gav;
use crate::pom::PomReader;
use crate::project::Project;
use crate::universe::ProjectContainer;

pub(crate) fn module_pom_path(parent_dir: &Path, module_name: &str) -> std::path::PathBuf {
    if module_name.ends_with(".pom") {
        parent_dir.join(module_name)
    } else {
        parent_dir.join(module_name).join("pom.xml")
    }
}

/// Reads each referenced module's POM purely to extract its GAV. The transient `Project`
/// this creates is never registered in `container`.
pub fn submodule_gavs(project: &Project, container: &dyn ProjectContainer, reader: &dyn PomReader) -> Vec<Gav> {
    let parent_dir = project.pom_file.parent().unwrap_or_else(|| Path::new("."));

    let mut module_names: Vec<&str> = project.raw.modules.iter().map(String::as_str).collect();
    for profile in &project.raw.profiles {
        module_names.extend(profile.modules.iter().map(String::as_str));
    }

    let mut gavs = Vec::with_capacity(module_names.len());
    for module_name in module_names {
        let path = module_pom_path(parent_dir, module_name);
        let raw = match reader.read(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(module = module_name, path = %path.display(), error = %err, "could not read submodule POM");
                continue;
            }
        };
        match Project::new(path.clone(), project.is_external, raw, container) {
            Ok(submodule) => gavs.push(submodule.gav.clone()),
            Err(err) => warn!(module = module_name, path = %path.display(), error = %err, "could not initialize submodule project"),
        }
    }
    gavs
}
