//! cinefile-core - movie availability checking and request tracking.
//!
//! The core answers one question - "is this movie already in the library" -
//! and manages the request queue for movies that are not. Noisy filenames
//! are normalized into canonical token form, scored with fuzzy similarity
//! measures, and reconciled against a quota-bounded request lifecycle when
//! new files get ingested.

pub mod audit;
pub mod availability;
pub mod config;
pub mod library;
pub mod matching;
pub mod metadata;
pub mod metrics;
pub mod notify;
pub mod reconcile;
pub mod request;
pub mod testing;
pub mod title;

pub use audit::{
    create_audit_system, AuditError, AuditEvent, AuditFilter, AuditHandle, AuditRecord,
    AuditStore, AuditWriter, SqliteAuditStore,
};
pub use availability::AvailabilityService;
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    MatchingConfig, RequestsConfig, SanitizedConfig, ServerConfig,
};
pub use library::{CatalogEntry, LibraryCatalog, LibraryError, SqliteLibrary};
pub use matching::{Availability, MatchConfig, MatchEngine, MatchResult};
pub use metadata::{
    MetadataError, MetadataProvider, MovieDetails, MovieSummary, TmdbClient, TmdbConfig,
};
pub use notify::{LogNotifier, Notifier, NotifyError, TelegramConfig, TelegramNotifier};
pub use reconcile::{
    CompletionReconciler, IngestionEvent, ReconcileOutcome, ReconcilePath, ReconcilerConfig,
};
pub use request::{
    NewRequest, QuotaStatus, Request, RequestError, RequestStatus, RequestStore,
    SqliteRequestStore,
};
pub use title::{extract_year, normalize, CanonicalTitle};
