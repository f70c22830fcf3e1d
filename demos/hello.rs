use std::collections::HashSet;
use std::path::Path;

use pom_resolver::default_impl::{load_project_tree, XmlPomReader};
use pom_resolver::effective::declared_dependencies_with_effective_version_scope;

fn main() {
    let pom_path = std::env::args().nth(1).unwrap_or_else(|| "pom.xml".to_owned());

    let reader = XmlPomReader;
    let (root, container) = load_project_tree(Path::new(&pom_path), &reader).expect("failed to load project tree");

    println!("Resolved {} ({} projects in universe)", root.gav, container.len());

    let deps = declared_dependencies_with_effective_version_scope(&root, &container, &HashSet::new());
    for dep in deps {
        println!(
            "{} -> {} ({:?})",
            dep.key,
            dep.version_scope.version.as_deref().unwrap_or("?"),
            dep.version_scope.scope
        );
    }
}
