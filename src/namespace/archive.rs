use std::sync::Arc;

use crate::typesystem::ClassDef;

/// A packaged set of class definitions, the unit a [`crate::ModuleLoader`] produces.
///
/// Archives are cheap to clone: definitions are shared, and only loading them into a namespace
/// gives them an identity.
#[derive(Debug, Clone)]
pub struct Archive {
    name: String,
    classes: Vec<Arc<ClassDef>>,
}

impl Archive {
    /// Creates an empty archive.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Archive {
            name: name.into(),
            classes: Vec::new(),
        }
    }

    /// Adds a class definition, builder style.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<Arc<ClassDef>>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Adds a class definition.
    pub fn add_class(&mut self, class: impl Into<Arc<ClassDef>>) {
        self.classes.push(class.into());
    }

    /// Archive name, for diagnostics
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class definitions in archive order
    #[must_use]
    pub fn classes(&self) -> &[Arc<ClassDef>] {
        &self.classes
    }
}
