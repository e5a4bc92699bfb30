//! Named counters shared between concurrent tasks.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A fixed set of named atomic counters.
///
/// Names are registered up front; updates to unknown names are ignored.
pub struct StatsCounter {
    counters: BTreeMap<&'static str, AtomicU64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        let counters = names
            .iter()
            .map(|&name| (name, AtomicU64::new(0)))
            .collect();
        Self { counters }
    }

    pub fn increment(&self, name: &str) {
        self.add(name, 1);
    }

    fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn unknown_names_are_ignored() {
        let stats = StatsCounter::new(&["sent"]);
        stats.increment("sent");
        stats.increment("bogus");
        assert_eq!(stats.get("sent"), 1);
        assert_eq!(stats.get("bogus"), 0);
    }

    #[test]
    fn concurrent_increments() {
        let stats = Arc::new(StatsCounter::new(&["a", "b"]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        s.increment("a");
                    }
                    s.add("b", 2);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(stats.get("a"), 800);
        assert_eq!(stats.get("b"), 16);
    }
}
