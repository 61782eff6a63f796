//! Game Host
//!
//! Owns the component registry and drives the component lifecycle:
//! - Registration during bootstrap (duplicate handling per [`DuplicatePolicy`])
//! - Initialization in priority order, a few components per step so the
//!   caller can run its own frame work between steps
//! - Per-frame updates in priority order
//! - Shutdown in reverse initialization order

use std::fmt;

use pooled_list::NodeHandle;
use thiserror::Error;

use crate::component::{ComponentError, GameComponent};
use crate::config::{DuplicatePolicy, HostConfig};
use crate::registry::{ComponentDescriptor, ComponentId, PriorityRegistry, RegistryError};

/// Where the host is in its lifecycle. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPhase {
    Registering,
    Initializing,
    Running,
    ShutDown,
}

impl fmt::Display for HostPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostPhase::Registering => "registering",
            HostPhase::Initializing => "initializing",
            HostPhase::Running => "running",
            HostPhase::ShutDown => "shut down",
        };
        f.write_str(name)
    }
}

/// Result of one [`GameHost::step_initialization`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
    /// More components are waiting to be initialized.
    Pending,
    /// Every component is initialized and the host is running.
    Complete,
}

/// Errors that can occur while driving the component lifecycle
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Component '{id}' failed: {source}")]
    Component {
        id: ComponentId,
        #[source]
        source: ComponentError,
    },

    #[error("Host is {actual}, expected {expected}")]
    InvalidPhase {
        expected: HostPhase,
        actual: HostPhase,
    },
}

pub struct GameHost {
    registry: PriorityRegistry<Box<dyn GameComponent>>,
    config: HostConfig,
    phase: HostPhase,
    /// Next component to initialize.
    cursor: Option<NodeHandle>,
    /// Most recently initialized component; shutdown walks back from here.
    last_initialized: Option<NodeHandle>,
    initialized: usize,
}

impl GameHost {
    pub fn new(config: HostConfig) -> Self {
        Self {
            registry: PriorityRegistry::with_pool_capacity(config.pool_prewarm),
            config,
            phase: HostPhase::Registering,
            cursor: None,
            last_initialized: None,
            initialized: 0,
        }
    }

    pub fn phase(&self) -> HostPhase {
        self.phase
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn registry(&self) -> &PriorityRegistry<Box<dyn GameComponent>> {
        &self.registry
    }

    /// Number of components whose `init` has succeeded.
    pub fn initialized_count(&self) -> usize {
        self.initialized
    }

    /// Register a component (must be done before initialization starts).
    ///
    /// Returns `Ok(false)` when the component was a duplicate and the
    /// configured policy is [`DuplicatePolicy::Skip`].
    pub fn register<C: GameComponent + 'static>(&mut self, component: C) -> Result<bool, HostError> {
        self.expect_phase(HostPhase::Registering)?;

        let descriptor = ComponentDescriptor::new(component.id(), component.priority());
        match self.registry.register(descriptor, Box::new(component)) {
            Ok(_) => Ok(true),
            Err(RegistryError::DuplicateRegistration(id))
                if self.config.duplicate_policy == DuplicatePolicy::Skip =>
            {
                tracing::warn!("Component type '{}' is already registered, skipping", id);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Close registration and position the init cursor on the highest priority component.
    pub fn begin_initialization(&mut self) -> Result<(), HostError> {
        self.expect_phase(HostPhase::Registering)?;

        tracing::info!(
            "Component initialization order: {:?}",
            self.registry
                .descriptors()
                .map(|d| d.id.as_str())
                .collect::<Vec<_>>()
        );

        self.phase = HostPhase::Initializing;
        self.cursor = self.registry.first();
        Ok(())
    }

    /// Initialize up to `inits_per_step` components.
    ///
    /// On failure the host stays in [`HostPhase::Initializing`] with the
    /// cursor on the failed component; [`shutdown`](Self::shutdown) still
    /// shuts down everything initialized so far.
    pub fn step_initialization(&mut self) -> Result<InitStep, HostError> {
        self.expect_phase(HostPhase::Initializing)?;

        for _ in 0..self.config.inits_per_step.max(1) {
            let Some(handle) = self.cursor else { break };

            let (descriptor, component) = self.registry.entry_mut(handle)?;
            let id = descriptor.id;
            tracing::debug!("Initializing component: {}", id);
            component
                .init()
                .map_err(|source| HostError::Component { id, source })?;

            self.last_initialized = Some(handle);
            self.initialized += 1;
            self.cursor = self.registry.next(handle)?;
        }

        if self.cursor.is_some() {
            return Ok(InitStep::Pending);
        }

        self.phase = HostPhase::Running;
        tracing::info!("All {} components initialized successfully", self.initialized);
        Ok(InitStep::Complete)
    }

    /// Initialize every remaining component without yielding.
    pub fn initialize_all(&mut self) -> Result<(), HostError> {
        match self.phase {
            HostPhase::Registering => self.begin_initialization()?,
            HostPhase::Initializing => {}
            HostPhase::Running => {
                tracing::warn!("GameHost already initialized, skipping");
                return Ok(());
            }
            HostPhase::ShutDown => {
                return Err(HostError::InvalidPhase {
                    expected: HostPhase::Registering,
                    actual: HostPhase::ShutDown,
                })
            }
        }

        while self.step_initialization()? == InitStep::Pending {}
        Ok(())
    }

    /// Call `update` on every component, highest priority first.
    /// Does nothing until initialization has completed.
    pub fn update(&mut self, elapse_seconds: f32, real_elapse_seconds: f32) {
        if self.phase != HostPhase::Running {
            return;
        }

        self.registry.for_each_mut(|_, component| {
            component.update(elapse_seconds, real_elapse_seconds);
        });
    }

    /// Shut down initialized components in reverse initialization order.
    ///
    /// A failing component does not stop the others from shutting down;
    /// the first failure is returned once all have been visited.
    pub fn shutdown(&mut self) -> Result<(), HostError> {
        if self.phase == HostPhase::ShutDown {
            return Ok(());
        }

        let mut first_error = None;
        let mut cursor = self.last_initialized.take();
        while let Some(handle) = cursor {
            let (descriptor, component) = self.registry.entry_mut(handle)?;
            let id = descriptor.id;
            tracing::debug!("Shutting down component: {}", id);

            if let Err(source) = component.shutdown() {
                tracing::error!("Component '{}' failed to shut down: {}", id, source);
                first_error.get_or_insert(HostError::Component { id, source });
            }
            cursor = self.registry.prev(handle)?;
        }

        self.phase = HostPhase::ShutDown;
        self.cursor = None;
        self.initialized = 0;

        match first_error {
            Some(e) => Err(e),
            None => {
                tracing::info!("All components shut down successfully");
                Ok(())
            }
        }
    }

    fn expect_phase(&self, expected: HostPhase) -> Result<(), HostError> {
        if self.phase != expected {
            return Err(HostError::InvalidPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }
}

impl Default for GameHost {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}
