use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Datelike, Utc};

/// Generates human-readable request identifiers of the form
/// `REQ-<year>-<16 digits>`.
///
/// The digit block is a strictly increasing microsecond tick: the current
/// wall clock, bumped past the previous value whenever two calls land in
/// the same microsecond. Identifiers are unique for the life of the
/// process and sort in creation order within a year.
#[derive(Debug, Default)]
pub struct RequestIdGenerator {
    last: AtomicU64,
}

impl RequestIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> String {
        let now = Utc::now();
        let micros = now.timestamp_micros().max(0) as u64;

        let prev = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(prev.saturating_add(1).max(micros))
            })
            .unwrap_or(micros);
        let tick = prev.saturating_add(1).max(micros);

        format!("REQ-{}-{:016}", now.year(), tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_carries_year_prefix() {
        let generator = RequestIdGenerator::new();
        let id = generator.next();
        let expected_prefix = format!("REQ-{}-", Utc::now().year());
        assert!(id.starts_with(&expected_prefix), "unexpected id: {id}");
        assert_eq!(id.len(), expected_prefix.len() + 16);
    }

    #[test]
    fn rapid_sequential_ids_are_unique_and_ascending() {
        let generator = RequestIdGenerator::new();
        let ids: Vec<String> = (0..1000).map(|_| generator.next()).collect();

        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted, "ids must sort in generation order");

        sorted.dedup();
        assert_eq!(sorted.len(), 1000, "ids must be unique");
    }

    #[test]
    fn concurrent_ids_are_unique() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let generator = Arc::new(RequestIdGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || (0..250).map(|_| generator.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id generated");
            }
        }
    }
}
