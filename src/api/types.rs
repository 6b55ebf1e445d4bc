//! Shared types for the HTTP layer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;

use crate::config::Settings;
use crate::lab::LabGenerator;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the routers
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware.
///
/// Holds only immutable settings and a request counter. Lab data is never
/// shared between requests: each handler builds its own generator.
#[derive(Clone)]
pub struct ApiContext {
    pub settings: Arc<Settings>,
    requests: Arc<AtomicU64>,
}

impl ApiContext {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Generator for a single request.
    ///
    /// With `LAB_MOCK_SEED` set, request `n` is seeded with `seed + n`, so a
    /// fixed sequence of requests reproduces the same values.
    pub fn generator(&self) -> LabGenerator<StdRng> {
        let n = self.requests.fetch_add(1, Ordering::Relaxed);
        let gen = match self.settings.lab_mock_seed {
            Some(seed) => LabGenerator::seeded(seed.wrapping_add(n)),
            None => LabGenerator::from_entropy(),
        };
        gen.with_abnormal_probability(self.settings.lab_abnormal_probability)
    }

    /// Number of generators handed out so far.
    pub fn requests_served(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}
