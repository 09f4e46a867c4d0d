//! Port definitions - the seams between the core and its adapters.
//!
//! Orchestration code depends on these traits, never on concrete
//! transports, registrars, or HTTP clients; adapters and callers plug in
//! behind them.

mod emitter;
mod fetcher;
mod registrar;

pub use emitter::{BatchEventEmitterPort, LoggingBatchEmitter, NoopBatchEmitter};
pub use fetcher::ArchiveFetcherPort;
pub use registrar::{ArchiveRegistrarPort, ResolvedArchive};
