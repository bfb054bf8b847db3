//! Per-namespace type storage.
//!
//! The [`TypeRegistry`] owns every class of one namespace. It is filled once while the namespace
//! loads and is read-only afterwards, so lookups never block.
//!
//! # Concurrency Design
//!
//! - Lock-free primary storage using `SkipMap`, keyed by [`Token`]
//! - Concurrent name index using `DashMap`
//!
//! # Performance Characteristics
//!
//! - **Token lookup**: O(log n) using skip list
//! - **Name lookup**: O(1) average using the hash index

use std::sync::Arc;

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use strum::IntoEnumIterator;

use crate::{
    namespace::NamespaceId,
    token::Token,
    typesystem::{BuiltinKind, Class, ClassDef, ClassRc},
    Result,
};

/// Storage of all classes visible inside one namespace.
pub struct TypeRegistry {
    /// Primary storage indexed by token
    types: SkipMap<Token, ClassRc>,
    /// Secondary index: fully qualified name to token
    types_by_name: DashMap<String, Token>,
    /// Owning namespace
    namespace: NamespaceId,
}

impl TypeRegistry {
    /// Creates a registry holding only the built-in types.
    #[must_use]
    pub fn new(namespace: NamespaceId) -> Self {
        let registry = TypeRegistry {
            types: SkipMap::new(),
            types_by_name: DashMap::new(),
            namespace,
        };

        for kind in BuiltinKind::iter() {
            registry.insert(Arc::new(Class::new_builtin(kind, namespace)));
        }

        registry
    }

    /// Loads a class definition, unless a class of the same name is already registered.
    ///
    /// Returns the loaded class, or `None` when the name was already taken. The earlier
    /// definition stays visible.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TokensExhausted`] if no token is left for the class or one of
    /// its members. Nothing is registered in that case.
    pub fn register(&self, def: &ClassDef) -> Result<Option<ClassRc>> {
        if self.types_by_name.contains_key(&def.name) {
            return Ok(None);
        }

        let class = Arc::new(Class::load(def, self.namespace)?);
        self.insert(class.clone());
        Ok(Some(class))
    }

    fn insert(&self, class: ClassRc) {
        self.types_by_name
            .insert(class.name().to_string(), class.token());
        self.types.insert(class.token(), class);
    }

    /// Look up a class by token
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<ClassRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up a class by fully qualified name
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<ClassRc> {
        let token = *self.types_by_name.get(name)?;
        self.get(&token)
    }

    /// Token of the class with this name
    #[must_use]
    pub fn token_of(&self, name: &str) -> Option<Token> {
        self.types_by_name.get(name).map(|entry| *entry.value())
    }

    /// Number of registered classes, built-ins included
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All classes loaded from archives, ordered by token
    pub fn loaded(&self) -> impl Iterator<Item = ClassRc> + '_ {
        self.types
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|class| class.builtin().is_none())
    }
}
