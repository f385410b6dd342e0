//! Per-upload progress tracking.
//!
//! The transport gives no transfer-progress events, so [`SimulatedProgress`] advances
//! each entry by a random step on a fixed interval and stops short of 100 until
//! [`ProgressTracker::complete`] is called. Callers only see the trait, so a tracker
//! fed by real transfer events can replace it.
//!
//! Invariants while an entry is ticking: its percentage never decreases and never
//! exceeds the configured cap (at most [`MAX_SIMULATED_PERCENT`]).

use async_trait::async_trait;
use mpi_core::ProgressSettings;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Ceiling for simulated progress; only a completed request reaches 100.
pub const MAX_SIMULATED_PERCENT: f64 = 95.0;

pub const COMPLETE_PERCENT: f64 = 100.0;

#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Create (or reset) the entry for `key` at 0% and start advancing it.
    async fn start(&self, key: &str);

    /// Stop advancing `key` and report it as 100%.
    async fn complete(&self, key: &str);

    /// Stop advancing `key`, leaving its last value in place.
    async fn abandon(&self, key: &str);

    /// Remove every entry.
    async fn clear(&self);

    async fn snapshot(&self) -> BTreeMap<String, f64>;

    async fn percent(&self, key: &str) -> Option<f64> {
        self.snapshot().await.get(key).copied()
    }
}

#[derive(Debug)]
struct Entry {
    percent: f64,
    generation: u64,
    ticking: bool,
}

#[derive(Default)]
struct State {
    entries: HashMap<String, Entry>,
    tickers: HashMap<String, JoinHandle<()>>,
    next_generation: u64,
}

/// Progress tracker that simulates advancement on a timer.
pub struct SimulatedProgress {
    settings: ProgressSettings,
    state: Arc<Mutex<State>>,
}

impl SimulatedProgress {
    pub fn new(mut settings: ProgressSettings) -> Self {
        settings.cap = if settings.cap.is_finite() {
            settings.cap.clamp(0.0, MAX_SIMULATED_PERCENT)
        } else {
            MAX_SIMULATED_PERCENT
        };
        settings.max_step = if settings.max_step.is_finite() {
            settings.max_step.max(0.0)
        } else {
            ProgressSettings::default().max_step
        };
        if settings.interval.is_zero() {
            settings.interval = ProgressSettings::default().interval;
        }
        Self {
            settings,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    async fn tick(state: Arc<Mutex<State>>, key: String, generation: u64, settings: ProgressSettings) {
        let mut interval = tokio::time::interval(settings.interval);
        // The first tick of a tokio interval fires immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            let step = rand::rng().random_range(0.0..=settings.max_step);

            let mut guard = state.lock().await;
            match guard.entries.get_mut(&key) {
                Some(entry) if entry.generation == generation && entry.ticking => {
                    let next = (entry.percent + step).min(settings.cap);
                    if next > entry.percent {
                        entry.percent = next;
                        tracing::debug!(file = %key, percent = next, "upload progress");
                    }
                }
                _ => break,
            }
        }
    }
}

impl Default for SimulatedProgress {
    fn default() -> Self {
        Self::new(ProgressSettings::default())
    }
}

#[async_trait]
impl ProgressTracker for SimulatedProgress {
    async fn start(&self, key: &str) {
        let mut state = self.state.lock().await;
        if let Some(previous) = state.tickers.remove(key) {
            previous.abort();
        }

        let generation = state.next_generation;
        state.next_generation += 1;
        state.entries.insert(
            key.to_string(),
            Entry {
                percent: 0.0,
                generation,
                ticking: true,
            },
        );

        let handle = tokio::spawn(Self::tick(
            Arc::clone(&self.state),
            key.to_string(),
            generation,
            self.settings.clone(),
        ));
        state.tickers.insert(key.to_string(), handle);
    }

    async fn complete(&self, key: &str) {
        let mut state = self.state.lock().await;
        if let Some(ticker) = state.tickers.remove(key) {
            ticker.abort();
        }
        let generation = state.next_generation;
        let entry = state.entries.entry(key.to_string()).or_insert(Entry {
            percent: 0.0,
            generation,
            ticking: false,
        });
        entry.ticking = false;
        entry.percent = COMPLETE_PERCENT;
    }

    async fn abandon(&self, key: &str) {
        let mut state = self.state.lock().await;
        if let Some(ticker) = state.tickers.remove(key) {
            ticker.abort();
        }
        if let Some(entry) = state.entries.get_mut(key) {
            entry.ticking = false;
        }
    }

    async fn clear(&self) {
        let mut state = self.state.lock().await;
        for (_, ticker) in state.tickers.drain() {
            ticker.abort();
        }
        state.entries.clear();
    }

    async fn snapshot(&self) -> BTreeMap<String, f64> {
        let state = self.state.lock().await;
        state
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.percent))
            .collect()
    }
}

impl Drop for SimulatedProgress {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_lock() {
            for (_, ticker) in state.tickers.drain() {
                ticker.abort();
            }
        }
    }
}
