//! The lifecycle contract every hosted component implements.

use thiserror::Error;

use crate::registry::ComponentId;

/// Errors a component can report from its lifecycle hooks
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    #[error("Shutdown failed: {0}")]
    ShutdownFailed(String),
}

/// A unit of engine functionality driven by [`GameHost`](crate::GameHost).
///
/// Components are registered once during bootstrap, initialized in
/// descending [`priority`](GameComponent::priority) order, updated every frame
/// in that same order, and shut down in reverse.
///
/// # Example
///
/// ```ignore
/// use component_registry::*;
///
/// struct LogComponent;
///
/// impl GameComponent for LogComponent {
///     fn id(&self) -> ComponentId {
///         ComponentId::new("log")
///     }
///
///     // Everything else logs while initializing, so go first.
///     fn priority(&self) -> i32 {
///         1000
///     }
///
///     fn init(&mut self) -> Result<(), ComponentError> {
///         Ok(())
///     }
///
///     fn shutdown(&mut self) -> Result<(), ComponentError> {
///         Ok(())
///     }
/// }
/// ```
pub trait GameComponent {
    /// Type tag; at most one component per id may be registered
    fn id(&self) -> ComponentId;

    /// Higher values initialize earlier. Read once, at registration.
    fn priority(&self) -> i32 {
        0
    }

    fn init(&mut self) -> Result<(), ComponentError>;

    /// Optional per-frame update (default: no-op)
    fn update(&mut self, _elapse_seconds: f32, _real_elapse_seconds: f32) {}

    fn shutdown(&mut self) -> Result<(), ComponentError>;
}
