//! Runtime wiring helpers: course store, observability hooks, and assistant assembly.

use std::sync::Arc;

use lchat::{NoopOrchestratorHooks, OrchestratorHooks, ToolCallOrchestrator};
use lcourse::{CourseCatalog, CourseStore, InMemoryCourseStore, register_course_tools};
use lmemory::{SessionStore, create_session_store};
use lobserve::{
    MetricsObservabilityHooks, SafeOrchestratorHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};
use lprovider::{ModelClient, NoopOperationHooks, ProviderOperationHooks};
use ltooling::{NoopToolRuntimeHooks, ToolRegistry, ToolRuntimeHooks};

use crate::config::ObservabilityMode;
use crate::providers::build_client;
use crate::{Assistant, AssistantConfig, AssistantError};

#[derive(Clone)]
pub struct ObservabilityHooks {
    pub provider: Arc<dyn ProviderOperationHooks>,
    pub tool: Arc<dyn ToolRuntimeHooks>,
    pub orchestrator: Arc<dyn OrchestratorHooks>,
}

impl ObservabilityHooks {
    pub fn for_mode(mode: ObservabilityMode) -> Self {
        match mode {
            ObservabilityMode::Tracing => Self::guarded(TracingObservabilityHooks),
            ObservabilityMode::Metrics => Self::guarded(MetricsObservabilityHooks),
            ObservabilityMode::Disabled => Self {
                provider: Arc::new(NoopOperationHooks),
                tool: Arc::new(NoopToolRuntimeHooks),
                orchestrator: Arc::new(NoopOrchestratorHooks),
            },
        }
    }

    /// Wraps one hook implementation so a panicking hook never aborts a query.
    fn guarded<H>(hooks: H) -> Self
    where
        H: ProviderOperationHooks + ToolRuntimeHooks + OrchestratorHooks + Copy + 'static,
    {
        Self {
            provider: Arc::new(SafeProviderHooks::new(hooks)),
            tool: Arc::new(SafeToolHooks::new(hooks)),
            orchestrator: Arc::new(SafeOrchestratorHooks::new(hooks)),
        }
    }
}

/// Loads `catalog` into an in-memory store honouring `config.max_results`.
pub fn course_store(
    config: &AssistantConfig,
    catalog: CourseCatalog,
) -> Result<Arc<InMemoryCourseStore>, AssistantError> {
    config.validate()?;
    let store = InMemoryCourseStore::new().with_max_results(config.max_results);
    store.add_catalog(catalog)?;
    Ok(Arc::new(store))
}

/// Full production wiring: HTTP Anthropic client, configured session store,
/// both course tools, and the configured observability hooks.
pub fn build_assistant(
    config: AssistantConfig,
    store: Arc<dyn CourseStore>,
) -> Result<Assistant, AssistantError> {
    config.validate()?;
    let hooks = ObservabilityHooks::for_mode(config.observability);
    let client = build_client(&config, Arc::clone(&hooks.provider))?;
    build_assistant_with(config, client, store)
}

pub fn build_assistant_with(
    config: AssistantConfig,
    client: Arc<dyn ModelClient>,
    store: Arc<dyn CourseStore>,
) -> Result<Assistant, AssistantError> {
    config.validate()?;
    let sessions = create_session_store(config.session_store.clone(), config.max_history)?;
    build_assistant_with_sessions(config, client, store, sessions)
}

pub fn build_assistant_with_sessions(
    config: AssistantConfig,
    client: Arc<dyn ModelClient>,
    store: Arc<dyn CourseStore>,
    sessions: Arc<dyn SessionStore>,
) -> Result<Assistant, AssistantError> {
    config.validate()?;
    let hooks = ObservabilityHooks::for_mode(config.observability);

    let mut registry = ToolRegistry::new();
    register_course_tools(&mut registry, store)?;

    let orchestrator = ToolCallOrchestrator::builder(client, Arc::new(registry), config.model.clone())
        .system_prompt(config.system_prompt.clone())
        .policy(config.orchestrator_policy())
        .hooks(hooks.orchestrator)
        .tool_hooks(hooks.tool)
        .build()?;

    Ok(Assistant::new(orchestrator, sessions).with_query_prefix(config.query_prefix))
}
