//! A POM resolution and dependency-graph engine for Maven-style project universes.
//!
//! Given a set of already-parsed POMs (a "universe"), this crate computes the same
//! artifacts Maven itself computes when building an effective POM: interpolated
//! properties, inherited GAVs, hierarchical dependency and plugin management, and
//! the effective version/scope of every declared dependency. It does not fetch
//! artifacts or resolve transitive dependency graphs across the network — see the
//! module docs for exactly where the boundary sits.
//!
//! # Quick Start
//!
//! ```no_run
//! use pom_resolver::default_impl::XmlPomReader;
//! use pom_resolver::effective::declared_dependencies_with_effective_version_scope;
//! use std::collections::HashSet;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = XmlPomReader;
//! let (root, container) = pom_resolver::default_impl::load_project_tree(Path::new("pom.xml"), &reader)?;
//! let deps = declared_dependencies_with_effective_version_scope(&root, &container, &HashSet::new());
//! for dep in &deps {
//!     println!("{} -> {:?}", dep.key, dep.version_scope.version);
//! }
//! # Ok(())
//! # }
//! ```

pub mod coordinate;
pub mod dependency_management;
pub mod effective;
pub mod error;
pub mod interpolate;
pub mod modules;
pub mod plugin_management;
pub mod pom;
pub mod project;
pub mod properties;
pub mod universe;

#[cfg(feature = "default-impl")]
pub mod default_impl;

pub use coordinate::{
    DEFAULT_TYPE, Dependency, DependencyKey, DependencyManagementEntry, Gav, GroupArtifact, Scope, VersionScope,
};
pub use dependency_management::hierarchical_dependency_management;
pub use effective::{declared_dependencies_with_effective_version_scope, effective_version_scope, InterpolatedDependency};
pub use error::CrateError;
pub use modules::submodule_gavs;
pub use plugin_management::{hierarchical_plugin_management, local_plugin_dependencies, InterpolatedPlugin};
pub use pom::{PomReader, RawDependency, RawParent, RawPlugin, RawPom, RawProfile};
pub use project::Project;
pub use universe::{InMemoryProjectContainer, ProjectContainer};
