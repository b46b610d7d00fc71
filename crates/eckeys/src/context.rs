//! Curve context: the precomputed engine behind every operation.
//!
//! Building the engine means filling the generator table, so handles share
//! one engine through an `Arc`. The process-wide engine is registered as a
//! `Weak`: it is built on first use, lives as long as any handle does, and
//! is rebuilt if requested again after the last handle is gone.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use eckeys_crypto::secp256k1::table::GeneratorTable;
use log::debug;

struct Engine {
    table: GeneratorTable,
}

impl Engine {
    fn start() -> Self {
        debug!("secp256k1: building generator table");
        Self {
            table: GeneratorTable::new(),
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        debug!("secp256k1: engine released");
    }
}

fn registry() -> &'static Mutex<Weak<Engine>> {
    static SHARED: OnceLock<Mutex<Weak<Engine>>> = OnceLock::new();
    SHARED.get_or_init(|| Mutex::new(Weak::new()))
}

/// Handle to a secp256k1 engine. Cloning is cheap.
#[derive(Clone)]
pub struct Secp256k1 {
    engine: Arc<Engine>,
}

impl Secp256k1 {
    /// Build a private engine, not shared with any other handle.
    pub fn new() -> Self {
        Self {
            engine: Arc::new(Engine::start()),
        }
    }

    /// Handle to the process-wide engine, building it if no handle is alive.
    ///
    /// Safe to call from many threads at once: exactly one of them builds.
    pub fn shared() -> Self {
        // the registry only holds a Weak, so a poisoned lock has no torn state
        let mut slot = registry().lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(engine) = slot.upgrade() {
            return Self { engine };
        }

        let engine = Arc::new(Engine::start());
        *slot = Arc::downgrade(&engine);
        Self { engine }
    }

    /// True if both handles use the same engine.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine)
    }

    pub(crate) fn table(&self) -> &GeneratorTable {
        &self.engine.table
    }
}

/// Same as [`Secp256k1::shared`], not [`Secp256k1::new`]: a defaulted
/// handle joins the process-wide engine instead of building its own.
impl Default for Secp256k1 {
    fn default() -> Self {
        Self::shared()
    }
}

impl fmt::Debug for Secp256k1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1")
            .field("handles", &Arc::strong_count(&self.engine))
            .finish()
    }
}

/// The handle used by the crate-root functions. Built on first call and
/// never dropped: the engine stays up until the process exits and the OS
/// reclaims it, without running its teardown.
pub fn ensure_initialized() -> &'static Secp256k1 {
    static GLOBAL: OnceLock<Secp256k1> = OnceLock::new();
    GLOBAL.get_or_init(Secp256k1::shared)
}
