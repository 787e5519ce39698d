//! Record ID generation.
//!
//! IDs follow the `<prefix>::<epoch_millis>::<sequence>` scheme. Millisecond
//! timestamps alone collide when records are created in quick succession, so
//! every ID carries a process-wide sequence component.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Current epoch milliseconds and the next sequence number
pub fn next_id_parts() -> (u64, u64) {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    (millis, sequence)
}

/// Generate an ID like `weight::1702516122000::3`
pub fn generate_id(prefix: &str) -> String {
    let (millis, sequence) = next_id_parts();
    format!("{}::{}::{}", prefix, millis, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_id("weight");
        let b = generate_id("weight");
        assert_ne!(a, b);
        assert!(a.starts_with("weight::"));
    }
}
