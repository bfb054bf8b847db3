//! Dispatch tables: resolved target methods per (class, interface) pair.
//!
//! A table holds one slot per interface method, in interface declaration order. Slots are filled
//! once, when the first instance of a class is wrapped as an interface, and cached by the
//! namespace. Building never fails: a slot that could not be resolved keeps the reason and raises
//! it when the method is called.

use tracing::{debug, trace};

use crate::{
    adapter::InterfaceRef,
    matcher::{select_overload, Selection},
    namespace::Namespace,
    typesystem::{ClassRc, MethodRc},
    Error, Result,
};

/// Resolved target methods of one class for one interface.
#[derive(Debug)]
pub struct DispatchTable {
    class: ClassRc,
    interface: InterfaceRef,
    slots: Vec<Selection<MethodRc>>,
}

impl DispatchTable {
    /// Resolves every interface method against the public methods of `class`.
    pub(crate) fn build(namespace: &Namespace, class: &ClassRc, interface: &InterfaceRef) -> Self {
        let slots: Vec<Selection<MethodRc>> = interface
            .methods()
            .iter()
            .map(|method| {
                let wanted = method.shape();
                let candidates = class
                    .methods_named(&method.name)
                    .iter()
                    .filter(|candidate| candidate.is_public());

                let slot = select_overload(namespace, namespace.policy(), &wanted, candidates, |c| {
                    c.shape()
                })
                .map(Clone::clone);

                match &slot {
                    Selection::Resolved(target) => trace!(
                        interface = interface.name(),
                        method = %method.name,
                        target = %target.token(),
                        "slot resolved"
                    ),
                    Selection::NoMatch => debug!(
                        interface = interface.name(),
                        class = class.name(),
                        method = %method.name,
                        shape = %wanted,
                        "no structural match"
                    ),
                    Selection::Ambiguous(candidates) => debug!(
                        interface = interface.name(),
                        class = class.name(),
                        method = %method.name,
                        candidates,
                        "ambiguous structural match"
                    ),
                }

                slot
            })
            .collect();

        debug!(
            namespace = %namespace.id(),
            class = class.name(),
            interface = interface.name(),
            resolved = slots.iter().filter(|slot| slot.is_resolved()).count(),
            slots = slots.len(),
            "dispatch table built"
        );

        DispatchTable {
            class: class.clone(),
            interface: interface.clone(),
            slots,
        }
    }

    /// The class whose methods fill the slots
    #[must_use]
    pub fn class(&self) -> &ClassRc {
        &self.class
    }

    /// The interface whose methods define the slots
    #[must_use]
    pub fn interface(&self) -> &InterfaceRef {
        &self.interface
    }

    /// Number of slots, equal to the interface's method count
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True for interfaces without methods
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the target of the interface method at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMatchingMethod`] or [`Error::AmbiguousMatch`] when resolution of this
    /// slot failed.
    pub fn target(&self, index: usize) -> Result<&MethodRc> {
        let method = &self.interface.methods()[index];
        match &self.slots[index] {
            Selection::Resolved(target) => Ok(target),
            Selection::NoMatch => Err(Error::NoMatchingMethod {
                type_name: self.class.name().to_string(),
                method: method.name.clone(),
                shape: method.shape().to_string(),
            }),
            Selection::Ambiguous(candidates) => Err(Error::AmbiguousMatch {
                member: format!("{}.{}", self.class.name(), method.name),
                shape: method.shape().to_string(),
                candidates: *candidates,
            }),
        }
    }
}
