//! # GameHost lifecycle tests
//
// Mock components append to a shared journal so each test can assert the
// exact order of init / update / shutdown calls.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use component_registry::*;

type Journal = Rc<RefCell<Vec<String>>>;

struct MockComponent {
    id: ComponentId,
    priority: i32,
    journal: Journal,
    fail_init: bool,
    fail_shutdown: bool,
}

impl MockComponent {
    fn new(id: &'static str, priority: i32, journal: &Journal) -> Self {
        Self {
            id: ComponentId::new(id),
            priority,
            journal: journal.clone(),
            fail_init: false,
            fail_shutdown: false,
        }
    }

    fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    fn failing_shutdown(mut self) -> Self {
        self.fail_shutdown = true;
        self
    }

    fn record(&self, event: &str) {
        self.journal
            .borrow_mut()
            .push(format!("{}:{}", event, self.id));
    }
}

impl GameComponent for MockComponent {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn init(&mut self) -> Result<(), ComponentError> {
        self.record("init");
        if self.fail_init {
            return Err(ComponentError::InitFailed("mock failure".to_string()));
        }
        Ok(())
    }

    fn update(&mut self, _elapse_seconds: f32, _real_elapse_seconds: f32) {
        self.record("update");
    }

    fn shutdown(&mut self) -> Result<(), ComponentError> {
        self.record("shutdown");
        if self.fail_shutdown {
            return Err(ComponentError::ShutdownFailed("mock failure".to_string()));
        }
        Ok(())
    }
}

fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

fn take(journal: &Journal) -> Vec<String> {
    journal.borrow_mut().drain(..).collect()
}

#[test]
fn test_initialization_follows_priority() {
    let log = journal();
    let mut host = GameHost::default();
    host.register(MockComponent::new("x", 0, &log)).unwrap();
    host.register(MockComponent::new("y", 100, &log)).unwrap();
    host.register(MockComponent::new("z", 50, &log)).unwrap();

    host.initialize_all().unwrap();

    assert_eq!(take(&log), vec!["init:y", "init:z", "init:x"]);
    assert_eq!(host.phase(), HostPhase::Running);
    assert_eq!(host.initialized_count(), 3);
}

#[test]
fn test_stepped_initialization_yields_between_components() {
    let log = journal();
    let mut host = GameHost::default();
    host.register(MockComponent::new("a", 2, &log)).unwrap();
    host.register(MockComponent::new("b", 1, &log)).unwrap();

    host.begin_initialization().unwrap();
    assert_eq!(host.step_initialization().unwrap(), InitStep::Pending);
    assert_eq!(take(&log), vec!["init:a"]);

    // Updates are held back until every component is initialized.
    host.update(0.016, 0.016);
    assert!(take(&log).is_empty());

    assert_eq!(host.step_initialization().unwrap(), InitStep::Complete);
    assert_eq!(take(&log), vec!["init:b"]);
}

#[test]
fn test_inits_per_step_batches_components() {
    let log = journal();
    let config = HostConfig {
        inits_per_step: 2,
        ..HostConfig::default()
    };
    let mut host = GameHost::new(config);
    for (id, priority) in [("a", 3), ("b", 2), ("c", 1)] {
        host.register(MockComponent::new(id, priority, &log)).unwrap();
    }

    host.begin_initialization().unwrap();
    assert_eq!(host.step_initialization().unwrap(), InitStep::Pending);
    assert_eq!(host.initialized_count(), 2);
    assert_eq!(host.step_initialization().unwrap(), InitStep::Complete);
    assert_eq!(take(&log), vec!["init:a", "init:b", "init:c"]);
}

#[test]
fn test_update_and_shutdown_order() {
    let log = journal();
    let mut host = GameHost::default();
    host.register(MockComponent::new("low", 1, &log)).unwrap();
    host.register(MockComponent::new("high", 9, &log)).unwrap();
    host.initialize_all().unwrap();
    take(&log);

    host.update(0.5, 0.5);
    assert_eq!(take(&log), vec!["update:high", "update:low"]);

    host.shutdown().unwrap();
    assert_eq!(take(&log), vec!["shutdown:low", "shutdown:high"]);
    assert_eq!(host.phase(), HostPhase::ShutDown);

    // Second shutdown is a no-op.
    host.shutdown().unwrap();
    assert!(take(&log).is_empty());
}

#[test]
fn test_duplicate_rejected_by_default() {
    let log = journal();
    let mut host = GameHost::default();
    host.register(MockComponent::new("audio", 5, &log)).unwrap();

    let result = host.register(MockComponent::new("audio", 50, &log));
    assert!(matches!(
        result,
        Err(HostError::Registry(RegistryError::DuplicateRegistration(_)))
    ));
    assert_eq!(host.registry().len(), 1);
    let priorities: Vec<i32> = host.registry().descriptors().map(|d| d.priority).collect();
    assert_eq!(priorities, vec![5]);
}

#[test]
fn test_duplicate_skipped_with_skip_policy() {
    let log = journal();
    let config = HostConfig::from_toml_str(r#"duplicate_policy = "skip""#).unwrap();
    let mut host = GameHost::new(config);

    assert!(host.register(MockComponent::new("audio", 5, &log)).unwrap());
    assert!(!host.register(MockComponent::new("audio", 50, &log)).unwrap());
    host.initialize_all().unwrap();

    assert_eq!(take(&log), vec!["init:audio"]);
}

#[test]
fn test_registration_closed_after_initialization_begins() {
    let log = journal();
    let mut host = GameHost::default();
    host.begin_initialization().unwrap();

    let result = host.register(MockComponent::new("late", 0, &log));
    assert!(matches!(
        result,
        Err(HostError::InvalidPhase {
            expected: HostPhase::Registering,
            actual: HostPhase::Initializing,
        })
    ));
}

#[test]
fn test_empty_host_initializes_immediately() {
    let mut host = GameHost::default();
    host.begin_initialization().unwrap();
    assert_eq!(host.step_initialization().unwrap(), InitStep::Complete);
    assert_eq!(host.phase(), HostPhase::Running);
}

#[test]
fn test_init_failure_shuts_down_initialized_prefix() {
    let log = journal();
    let mut host = GameHost::default();
    host.register(MockComponent::new("first", 3, &log)).unwrap();
    host.register(MockComponent::new("broken", 2, &log).failing_init())
        .unwrap();
    host.register(MockComponent::new("never", 1, &log)).unwrap();

    let result = host.initialize_all();
    match result {
        Err(HostError::Component { id, .. }) => assert_eq!(id.as_str(), "broken"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(host.phase(), HostPhase::Initializing);
    assert_eq!(host.initialized_count(), 1);

    host.shutdown().unwrap();
    assert_eq!(take(&log), vec!["init:first", "init:broken", "shutdown:first"]);
}

#[test]
fn test_shutdown_failure_does_not_stop_others() {
    let log = journal();
    let mut host = GameHost::default();
    host.register(MockComponent::new("a", 2, &log)).unwrap();
    host.register(MockComponent::new("b", 1, &log).failing_shutdown())
        .unwrap();
    host.initialize_all().unwrap();
    take(&log);

    let result = host.shutdown();
    assert!(matches!(result, Err(HostError::Component { .. })));
    assert_eq!(take(&log), vec!["shutdown:b", "shutdown:a"]);
    assert_eq!(host.phase(), HostPhase::ShutDown);
}

#[test]
fn test_pool_prewarm_from_config() {
    let config = HostConfig {
        pool_prewarm: 4,
        ..HostConfig::default()
    };
    let host = GameHost::new(config);
    assert!(host.registry().is_empty());
    assert_eq!(host.config().pool_prewarm, 4);
}

#[test]
fn test_load_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "inits_per_step = 4").unwrap();
    writeln!(file, "log_filter = \"warn\"").unwrap();

    let config = HostConfig::load(file.path()).unwrap();
    assert_eq!(config.inits_per_step, 4);
    assert_eq!(config.log_filter, "warn");
    assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);

    let missing = HostConfig::load(file.path().with_extension("missing"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));
}

#[test]
fn test_logging_installs_once() {
    logging::init("debug").unwrap();
    assert!(logging::init("debug").is_err());
}
