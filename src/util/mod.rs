use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

pub mod assets;
pub mod numeric;
pub mod persistence;
pub mod version;

static ID_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Cheap process-local id for ephemeral UI elements (toasts, dialogs).
pub fn generate_id(prefix: &str) -> String {
    let value = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{value}")
}

/// Durable id for entities created on this machine. Remote rows keep the id
/// the backend assigned them instead.
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}
