//! Component Registry
//!
//! Priority-ordered registration and startup for game host components.
//! - `PriorityRegistry`: components sorted by descending priority, one per type
//! - `GameComponent`: init / update / shutdown lifecycle contract
//! - `GameHost`: explicit owner of the registry that drives the lifecycle
//! - `HostConfig` and logging setup for the bootstrap code
//!
//! ## Example
//! ```ignore
//! use component_registry::{logging, GameHost, HostConfig};
//!
//! let config = HostConfig::load("host.toml")?;
//! logging::init(&config.log_filter)?;
//!
//! let mut host = GameHost::new(config);
//! host.register(LogComponent)?;
//! host.register(SceneComponent)?;
//!
//! host.begin_initialization()?;
//! while host.step_initialization()? == InitStep::Pending {
//!     // render a loading frame
//! }
//! ```

pub mod component;
pub mod config;
pub mod host;
pub mod logging;
pub mod registry;

pub use component::{ComponentError, GameComponent};
pub use config::{ConfigError, DuplicatePolicy, HostConfig};
pub use host::{GameHost, HostError, HostPhase, InitStep};
pub use registry::{ComponentDescriptor, ComponentId, PriorityRegistry, RegistryError};

pub use pooled_list::{ListError, NodeHandle};
