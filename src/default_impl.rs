// default, filesystem-backed wiring: a PomReader over roxmltree, plus a helper that walks
// <modules> to build an InMemoryProjectContainer for a whole project tree. No network I/O.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::CrateError;
use crate::modules::module_pom_path;
use crate::pom::{PomReader, RawDependency, RawParent, RawPlugin, RawPom, RawProfile};
use crate::project::Project;
use crate::universe::InMemoryProjectContainer;

fn node<'a, 'input: 'a>(parent: &'input roxmltree::Node, tag_name: &'a str) -> Option<roxmltree::Node<'a, 'input>> {
    parent.children().find(|child| child.is_element() && child.has_tag_name(tag_name))
}

fn node_text(parent: &roxmltree::Node, tag_name: &str) -> Option<String> {
    node(parent, tag_name)?.text().map(|t| t.to_owned())
}

fn node_bool(parent: &roxmltree::Node, tag_name: &str) -> Option<bool> {
    node_text(parent, tag_name).map(|t| t.eq_ignore_ascii_case("true"))
}

fn child_elements<'a, 'input: 'a>(
    parent: &'input roxmltree::Node,
    container_tag: &'a str,
    item_tag: &'a str,
) -> Vec<roxmltree::Node<'a, 'input>> {
    match node(parent, container_tag) {
        Some(n) => n.children().filter(|c| c.is_element() && c.has_tag_name(item_tag)).collect(),
        None => Vec::new(),
    }
}

fn parse_properties(parent: &roxmltree::Node) -> std::collections::HashMap<String, String> {
    match node(parent, "properties") {
        Some(props) => props
            .children()
            .filter(|c| c.is_element())
            .filter_map(|c| c.text().map(|t| (c.tag_name().name().to_owned(), t.to_owned())))
            .collect(),
        None => std::collections::HashMap::new(),
    }
}

fn parse_parent(n: &roxmltree::Node) -> Option<RawParent> {
    let n = node(n, "parent")?;
    Some(RawParent {
        group_id: node_text(&n, "groupId"),
        artifact_id: node_text(&n, "artifactId"),
        version: node_text(&n, "version"),
    })
}

fn parse_exclusions(n: &roxmltree::Node) -> Vec<(String, String)> {
    child_elements(n, "exclusions", "exclusion")
        .iter()
        .map(|e| (node_text(e, "groupId").unwrap_or_default(), node_text(e, "artifactId").unwrap_or_default()))
        .collect()
}

fn parse_dependency(n: &roxmltree::Node) -> RawDependency {
    RawDependency {
        group_id: node_text(n, "groupId"),
        artifact_id: node_text(n, "artifactId"),
        version: node_text(n, "version"),
        classifier: node_text(n, "classifier"),
        r#type: node_text(n, "type"),
        scope: node_text(n, "scope"),
        optional: node_bool(n, "optional"),
        exclusions: parse_exclusions(n),
    }
}

fn parse_dependencies(n: &roxmltree::Node) -> Vec<RawDependency> {
    child_elements(n, "dependencies", "dependency").iter().map(parse_dependency).collect()
}

fn parse_plugin(n: &roxmltree::Node) -> RawPlugin {
    RawPlugin {
        group_id: node_text(n, "groupId"),
        artifact_id: node_text(n, "artifactId"),
        version: node_text(n, "version"),
    }
}

fn parse_plugins(n: &roxmltree::Node) -> Vec<RawPlugin> {
    child_elements(n, "plugins", "plugin").iter().map(parse_plugin).collect()
}

fn parse_build_plugins(n: &roxmltree::Node) -> Vec<RawPlugin> {
    match node(n, "build") {
        Some(build) => parse_plugins(&build),
        None => Vec::new(),
    }
}

fn parse_modules(n: &roxmltree::Node) -> Vec<String> {
    match node(n, "modules") {
        Some(modules) => modules
            .children()
            .filter(|c| c.is_element() && c.has_tag_name("module"))
            .filter_map(|c| c.text().map(|t| t.to_owned()))
            .collect(),
        None => Vec::new(),
    }
}

fn parse_profile(n: &roxmltree::Node) -> RawProfile {
    let active_by_default = node(n, "activation")
        .and_then(|a| node_bool(&a, "activeByDefault"))
        .unwrap_or(false);
    RawProfile {
        id: node_text(n, "id").unwrap_or_default(),
        active_by_default,
        properties: parse_properties(n),
        dependencies: parse_dependencies(n),
        dependency_management: match node(n, "dependencyManagement") {
            Some(dm) => parse_dependencies(&dm),
            None => Vec::new(),
        },
        build_plugins: parse_build_plugins(n),
        modules: parse_modules(n),
    }
}

fn parse_profiles(n: &roxmltree::Node) -> Vec<RawProfile> {
    child_elements(n, "profiles", "profile").iter().map(parse_profile).collect()
}

fn parse_prerequisites_maven(n: &roxmltree::Node) -> Option<String> {
    node(n, "prerequisites").and_then(|p| node_text(&p, "maven"))
}

fn parse_raw_pom(input: &str, path: &Path) -> Result<RawPom, CrateError> {
    let doc = roxmltree::Document::parse(input).map_err(|source| CrateError::XmlParse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;

    let project_node = node(&doc.root(), "project").ok_or_else(|| CrateError::InvalidPom {
        path: path.to_path_buf(),
        details: "no <project> element".to_owned(),
    })?;

    let dependency_management = match node(&project_node, "dependencyManagement") {
        Some(dm) => parse_dependencies(&dm),
        None => Vec::new(),
    };

    Ok(RawPom {
        group_id: node_text(&project_node, "groupId"),
        artifact_id: node_text(&project_node, "artifactId"),
        version: node_text(&project_node, "version"),
        parent: parse_parent(&project_node),
        properties: parse_properties(&project_node),
        dependency_management,
        dependencies: parse_dependencies(&project_node),
        build_plugins: parse_build_plugins(&project_node),
        plugin_management: match node(&project_node, "build").and_then(|b| node(&b, "pluginManagement")) {
            Some(pm) => parse_plugins(&pm),
            None => Vec::new(),
        },
        profiles: parse_profiles(&project_node),
        modules: parse_modules(&project_node),
        prerequisites_maven: parse_prerequisites_maven(&project_node),
    })
}

pub struct XmlPomReader;

impl PomReader for XmlPomReader {
    fn read(&self, path: &Path) -> Result<RawPom, CrateError> {
        let text = std::fs::read_to_string(path).map_err(|source| CrateError::PomUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        parse_raw_pom(&text, path)
    }
}

fn load_one(path: &Path, is_external: bool, reader: &dyn PomReader, container: &InMemoryProjectContainer) -> Result<Rc<Project>, CrateError> {
    let raw = reader.read(path)?;
    Project::new(path.to_path_buf(), is_external, raw, container)
}

fn load_children(project: &Rc<Project>, reader: &dyn PomReader, container: &mut InMemoryProjectContainer) -> Result<(), CrateError> {
    let parent_dir: PathBuf = project.pom_file.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();

    let mut module_names: Vec<String> = project.raw.modules.clone();
    for profile in &project.raw.profiles {
        module_names.extend(profile.modules.clone());
    }

    for module_name in module_names {
        let path = module_pom_path(&parent_dir, &module_name);
        let child = load_one(&path, project.is_external, reader, container)?;
        container.insert(Rc::clone(&child));
        load_children(&child, reader, container)?;
    }
    Ok(())
}

// reads root_pom_path plus every POM transitively reachable through <modules> (profile
// modules included, unfiltered), registering each in a fresh InMemoryProjectContainer
pub fn load_project_tree(root_pom_path: &Path, reader: &dyn PomReader) -> Result<(Rc<Project>, InMemoryProjectContainer), CrateError> {
    let mut container = InMemoryProjectContainer::new();
    let root = load_one(root_pom_path, false, reader, &container)?;
    container.insert(Rc::clone(&root));
    load_children(&root, reader, &mut container)?;
    Ok((root, container))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_POM: &str = r#"
        <project>
            <groupId>com.x</groupId>
            <artifactId>lib</artifactId>
            <version>1.2.3</version>
            <properties>
                <lib.version>1.2.3</lib.version>
            </properties>
            <dependencies>
                <dependency>
                    <groupId>com.x</groupId>
                    <artifactId>other</artifactId>
                    <version>${lib.version}</version>
                </dependency>
            </dependencies>
        </project>
    "#;

    #[test]
    fn parses_gav_properties_and_dependencies() {
        let raw = parse_raw_pom(SIMPLE_POM, Path::new("pom.xml")).unwrap();
        assert_eq!(raw.group_id.as_deref(), Some("com.x"));
        assert_eq!(raw.properties.get("lib.version").map(String::as_str), Some("1.2.3"));
        assert_eq!(raw.dependencies.len(), 1);
        assert_eq!(raw.dependencies[0].version.as_deref(), Some("${lib.version}"));
    }

    #[test]
    fn rejects_xml_without_a_project_element() {
        let err = parse_raw_pom("<not-a-pom/>", Path::new("pom.xml")).unwrap_err();
        assert!(matches!(err, CrateError::InvalidPom { .. }));
    }
}
