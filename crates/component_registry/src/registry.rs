//! Priority Registry
//!
//! Keeps registered components in a single [`PooledList`], sorted by
//! descending priority. Components with equal priority keep their
//! registration order, and each [`ComponentId`] may appear at most once.

use std::fmt;

use pooled_list::{HandleFault, ListError, NodeHandle, PooledList};
use thiserror::Error;

/// Caller-supplied type tag used for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentId(&'static str);

impl ComponentId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Identity and ordering key of a registered component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentDescriptor {
    pub id: ComponentId,
    /// Higher values initialize first. Fixed once registered.
    pub priority: i32,
}

impl ComponentDescriptor {
    pub const fn new(id: ComponentId, priority: i32) -> Self {
        Self { id, priority }
    }
}

/// Errors that can occur while registering or addressing components
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Component type already registered: {0}")]
    DuplicateRegistration(ComponentId),

    #[error("Invalid component descriptor: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    List(#[from] ListError),
}

/// List entry. `component` is `None` only while the node sits in the pool.
struct Registered<C> {
    descriptor: ComponentDescriptor,
    component: Option<C>,
}

impl<C> Default for Registered<C> {
    fn default() -> Self {
        Self {
            descriptor: ComponentDescriptor::default(),
            component: None,
        }
    }
}

/// Registry of components in initialization order.
pub struct PriorityRegistry<C> {
    entries: PooledList<Registered<C>>,
}

impl<C> PriorityRegistry<C> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: PooledList::new(),
        }
    }

    /// Create a registry whose node pool already holds `capacity` nodes
    pub fn with_pool_capacity(capacity: usize) -> Self {
        Self {
            entries: PooledList::with_pool_capacity(capacity),
        }
    }

    /// Register a component.
    ///
    /// The component is placed after every entry whose priority is greater
    /// than or equal to its own. The whole list is checked for an entry with
    /// the same id, including the part behind the insertion point.
    pub fn register(
        &mut self,
        descriptor: ComponentDescriptor,
        component: C,
    ) -> Result<NodeHandle, RegistryError> {
        if descriptor.id.as_str().is_empty() {
            return Err(RegistryError::InvalidArgument(
                "component id must not be empty".to_string(),
            ));
        }

        let mut insert_before = None;
        for (handle, entry) in self.entries.entries() {
            if entry.descriptor.id == descriptor.id {
                tracing::debug!("Rejected duplicate component type '{}'", descriptor.id);
                return Err(RegistryError::DuplicateRegistration(descriptor.id));
            }
            if insert_before.is_none() && descriptor.priority > entry.descriptor.priority {
                insert_before = Some(handle);
            }
        }

        let entry = Registered {
            descriptor,
            component: Some(component),
        };
        let handle = match insert_before {
            Some(anchor) => self.entries.add_before(anchor, entry)?,
            None => self.entries.add_last(entry),
        };

        tracing::debug!(
            "Registered component '{}' with priority {}",
            descriptor.id,
            descriptor.priority
        );
        Ok(handle)
    }

    /// Remove a component by id, returning it, or `Ok(None)` if no component
    /// with that id is registered.
    pub fn unregister(&mut self, id: ComponentId) -> Result<Option<C>, RegistryError> {
        let Some(handle) = self
            .entries
            .entries()
            .find(|(_, entry)| entry.descriptor.id == id)
            .map(|(handle, _)| handle)
        else {
            return Ok(None);
        };
        let entry = self.entries.remove(handle)?;
        tracing::debug!("Unregistered component '{}'", id);
        Ok(entry.component)
    }

    /// Components in the order they must be initialized (highest priority first).
    ///
    /// Only pooled entries have no component, and the list never yields those.
    pub fn initialization_order(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&ComponentDescriptor, &C)> + '_ {
        self.entries.iter().map(|entry| {
            let component = entry
                .component
                .as_ref()
                .expect("live entry always holds a component");
            (&entry.descriptor, component)
        })
    }

    pub fn descriptors(&self) -> impl DoubleEndedIterator<Item = &ComponentDescriptor> + '_ {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.descriptors().any(|descriptor| descriptor.id == id)
    }

    pub fn get(&self, id: ComponentId) -> Option<&C> {
        self.initialization_order()
            .find(|(descriptor, _)| descriptor.id == id)
            .map(|(_, component)| component)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every component. The node storage stays pooled for reuse.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Handle of the first component to initialize.
    pub fn first(&self) -> Option<NodeHandle> {
        self.entries.first()
    }

    /// Handle of the last component to initialize.
    pub fn last(&self) -> Option<NodeHandle> {
        self.entries.last()
    }

    pub fn next(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, RegistryError> {
        Ok(self.entries.next(handle)?)
    }

    pub fn prev(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, RegistryError> {
        Ok(self.entries.prev(handle)?)
    }

    pub fn entry(&self, handle: NodeHandle) -> Result<(&ComponentDescriptor, &C), RegistryError> {
        let entry = self.entries.get(handle)?;
        let component = entry.component.as_ref().ok_or(stale(handle))?;
        Ok((&entry.descriptor, component))
    }

    pub fn entry_mut(
        &mut self,
        handle: NodeHandle,
    ) -> Result<(&ComponentDescriptor, &mut C), RegistryError> {
        let entry = self.entries.get_mut(handle)?;
        let component = entry.component.as_mut().ok_or(stale(handle))?;
        Ok((&entry.descriptor, component))
    }

    /// Visit every component in initialization order with mutable access.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&ComponentDescriptor, &mut C)) {
        self.entries.for_each_mut(|entry| {
            if let Some(component) = entry.component.as_mut() {
                f(&entry.descriptor, component);
            }
        });
    }
}

impl<C> Default for PriorityRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn stale(handle: NodeHandle) -> RegistryError {
    RegistryError::List(ListError::InvalidHandle {
        handle,
        fault: HandleFault::Stale,
    })
}
