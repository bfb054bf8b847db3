use std::{
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
};

use crate::{namespace::Namespace, typesystem::ClassRc, value::Value};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// An object created inside a namespace.
///
/// The instance keeps its namespace alive. Its state is a field table owned by the isolated code
/// that created it.
pub struct Instance {
    id: u64,
    class: ClassRc,
    namespace: Arc<Namespace>,
    fields: RwLock<HashMap<String, Value>>,
}

/// Shared handle to an [`Instance`]. Two handles are equal only if they refer to the same object.
#[derive(Clone)]
pub struct ObjectRef(Arc<Instance>);

impl ObjectRef {
    pub(crate) fn new(class: ClassRc, namespace: Arc<Namespace>) -> Self {
        ObjectRef(Arc::new(Instance {
            id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
            class,
            namespace,
            fields: RwLock::new(HashMap::new()),
        }))
    }

    /// Process-unique instance number
    #[must_use]
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// The class this object was created from
    #[must_use]
    pub fn class(&self) -> &ClassRc {
        &self.0.class
    }

    /// The namespace the object lives in
    #[must_use]
    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.0.namespace
    }

    /// Reads a field, `None` if it was never set.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<Value> {
        read_lock!(self.0.fields).get(name).cloned()
    }

    /// Writes a field, returning the previous value.
    pub fn set_field(&self, name: &str, value: Value) -> Option<Value> {
        write_lock!(self.0.fields).insert(name.to_string(), value)
    }

    /// True if both handles refer to the same object
    #[must_use]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("id", &self.0.id)
            .field("class", &self.0.class.name())
            .field("namespace", &self.0.namespace.id())
            .finish()
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.0.class.name(), self.0.id)
    }
}
