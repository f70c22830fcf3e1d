use std::collections::HashMap;
use std::rc::Rc;

use crate::coordinate::Gav;
use crate::project::Project;

/// The universe a resolution session runs against. `for_gav` may legitimately miss (the
/// project isn't known locally); `parent_of` misses at the chain root. Both are ordinary
/// `None`s, never errors.
pub trait ProjectContainer {
    fn for_gav(&self, gav: &Gav) -> Option<Rc<Project>>;
    fn parent_of(&self, project: &Project) -> Option<Rc<Project>>;
}

/// The default, in-memory `ProjectContainer`: a flat map from GAV to `Project`. Parent
/// lookups go back through the same map rather than a direct back-pointer on `Project`.
#[derive(Default)]
pub struct InMemoryProjectContainer {
    projects: HashMap<Gav, Rc<Project>>,
}

impl InMemoryProjectContainer {
    pub fn new() -> Self {
        InMemoryProjectContainer {
            projects: HashMap::new(),
        }
    }

    pub fn insert(&mut self, project: Rc<Project>) {
        self.projects.insert(project.gav.clone(), project);
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ProjectContainer for InMemoryProjectContainer {
    fn for_gav(&self, gav: &Gav) -> Option<Rc<Project>> {
        self.projects.get(gav).cloned()
    }

    fn parent_of(&self, project: &Project) -> Option<Rc<Project>> {
        let parent_gav = project.parent_gav.as_ref()?;
        self.for_gav(parent_gav)
    }
}
