//! Shared utilities for router integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hashroute::lifecycle::{Task, Timer};
use hashroute::{MatchResult, MemoryHistory, Router, RouterConfig};

/// Sink that keeps every emitted result with its event name.
#[derive(Clone, Default)]
pub struct Recorder {
    results: Arc<Mutex<Vec<(String, MatchResult)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: &str, result: MatchResult) {
        self.results.lock().unwrap().push((event.to_string(), result));
    }

    pub fn len(&self) -> usize {
        self.results.lock().unwrap().len()
    }

    pub fn last(&self) -> MatchResult {
        self.results.lock().unwrap().last().cloned().unwrap().1
    }

    pub fn last_event(&self) -> String {
        self.results.lock().unwrap().last().cloned().unwrap().0
    }

    pub fn routes(&self) -> Vec<String> {
        self.results
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.route.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.results.lock().unwrap().clear();
    }
}

/// Timer that holds tasks until the test fires them.
///
/// Tasks fire shortest delay first; equal delays keep scheduling order.
#[derive(Default)]
pub struct ManualTimer {
    queue: Mutex<Vec<(Duration, Task)>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Fire every queued task, including ones scheduled while firing.
    pub fn fire_all(&self) -> usize {
        let mut fired = 0;
        loop {
            let next = {
                let mut queue = self.queue.lock().unwrap();
                if queue.is_empty() {
                    break;
                }
                let index = queue
                    .iter()
                    .enumerate()
                    .min_by_key(|(i, (delay, _))| (*delay, *i))
                    .map(|(i, _)| i)
                    .unwrap();
                queue.remove(index)
            };
            (next.1)();
            fired += 1;
        }
        fired
    }
}

impl Timer for ManualTimer {
    fn schedule(&self, delay: Duration, task: Task) {
        self.queue.lock().unwrap().push((delay, task));
    }
}

/// A router wired to in-memory collaborators.
pub struct Harness {
    pub router: Router,
    pub history: Arc<MemoryHistory>,
    pub recorder: Recorder,
    pub timer: Arc<ManualTimer>,
}

pub fn harness(config: RouterConfig) -> Harness {
    harness_at(config, "/")
}

pub fn harness_at(config: RouterConfig, url: &str) -> Harness {
    let history = Arc::new(MemoryHistory::new(url));
    let recorder = Recorder::new();
    let timer = Arc::new(ManualTimer::new());

    let sink = recorder.clone();
    let router = Router::builder()
        .config(config)
        .memory_history(history.clone())
        .timer(timer.clone())
        .sink(Arc::new(move |event: &str, result: MatchResult| {
            sink.record(event, result)
        }))
        .build();

    Harness {
        router,
        history,
        recorder,
        timer,
    }
}

pub fn quiet() -> RouterConfig {
    RouterConfig {
        debug: false,
        ..RouterConfig::default()
    }
}
