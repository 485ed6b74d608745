use std::sync::Arc;

use prometheus::Registry;

use cinefile_core::{
    AuditHandle, AuditStore, AvailabilityService, CompletionReconciler, Config, LibraryCatalog,
    MetadataProvider, Notifier, RequestStore, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    metadata: Arc<dyn MetadataProvider>,
    library: Arc<dyn LibraryCatalog>,
    requests: Arc<dyn RequestStore>,
    notifier: Arc<dyn Notifier>,
    availability: AvailabilityService,
    reconciler: CompletionReconciler,
    audit: AuditHandle,
    audit_store: Arc<dyn AuditStore>,
    metrics_registry: Registry,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        metadata: Arc<dyn MetadataProvider>,
        library: Arc<dyn LibraryCatalog>,
        requests: Arc<dyn RequestStore>,
        notifier: Arc<dyn Notifier>,
        availability: AvailabilityService,
        reconciler: CompletionReconciler,
        audit: AuditHandle,
        audit_store: Arc<dyn AuditStore>,
        metrics_registry: Registry,
    ) -> Self {
        Self {
            config,
            metadata,
            library,
            requests,
            notifier,
            availability,
            reconciler,
            audit,
            audit_store,
            metrics_registry,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn metadata(&self) -> &dyn MetadataProvider {
        self.metadata.as_ref()
    }

    pub fn library(&self) -> &dyn LibraryCatalog {
        self.library.as_ref()
    }

    pub fn requests(&self) -> &dyn RequestStore {
        self.requests.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn availability(&self) -> &AvailabilityService {
        &self.availability
    }

    pub fn reconciler(&self) -> &CompletionReconciler {
        &self.reconciler
    }

    pub fn audit(&self) -> &AuditHandle {
        &self.audit
    }

    pub fn audit_store(&self) -> &dyn AuditStore {
        self.audit_store.as_ref()
    }

    pub fn metrics_registry(&self) -> &Registry {
        &self.metrics_registry
    }
}
