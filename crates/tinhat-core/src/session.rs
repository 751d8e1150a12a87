//! Per-session application state.
//!
//! A [`SessionState`] is created once by whatever drives the polling loop
//! and passed to each tick. It holds a bounded exposure history and tracks
//! how long a head-worn device has been connected. Nothing here is
//! persisted.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use tinhat_types::Inventory;

use crate::exposure::{Assessment, ExposureLevel, ExposureThresholds};

/// Maximum number of exposure samples kept per session.
pub const EXPOSURE_LOG_CAPACITY: usize = 100;

/// Default time a headset may stay on before an alert.
pub const DEFAULT_HEADSET_ALERT: Duration = Duration::from_secs(30 * 60);

/// One exposure reading taken during a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureSample {
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    pub level: ExposureLevel,
    pub device_count: usize,
}

/// Explicit state for one monitoring session.
#[derive(Debug, Clone)]
pub struct SessionState {
    exposure_log: VecDeque<ExposureSample>,
    capacity: usize,
    headset_since: Option<OffsetDateTime>,
    thresholds: ExposureThresholds,
    polls: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Create a session with the default history capacity.
    pub fn new() -> Self {
        Self::with_capacity(EXPOSURE_LOG_CAPACITY)
    }

    /// Create a session keeping at most `capacity` samples (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            exposure_log: VecDeque::with_capacity(capacity),
            capacity,
            headset_since: None,
            thresholds: ExposureThresholds::default(),
            polls: 0,
        }
    }

    /// Use custom exposure thresholds.
    #[must_use]
    pub fn thresholds(mut self, thresholds: ExposureThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Record one poll. Returns the assessment that was logged.
    ///
    /// The oldest sample is evicted once the log is full. Head-worn device
    /// tracking starts the first time one is seen connected and resets as
    /// soon as none is.
    pub fn record(&mut self, inventory: &Inventory, now: OffsetDateTime) -> Assessment {
        let assessment = self.thresholds.assess(&inventory.connected);

        if self.exposure_log.len() == self.capacity {
            self.exposure_log.pop_front();
        }
        self.exposure_log.push_back(ExposureSample {
            time: now,
            level: assessment.level,
            device_count: assessment.device_count,
        });

        let head_worn = inventory.connected.iter().any(|d| d.kind().is_head_worn());
        match (head_worn, self.headset_since) {
            (true, None) => self.headset_since = Some(now),
            (false, Some(_)) => self.headset_since = None,
            _ => {}
        }

        self.polls += 1;
        assessment
    }

    /// How long a head-worn device has been connected, if one is.
    pub fn headset_duration(&self, now: OffsetDateTime) -> Option<Duration> {
        let since = self.headset_since?;
        Duration::try_from(now - since).ok()
    }

    /// The headset duration, if it has reached `threshold`.
    pub fn headset_alert(&self, threshold: Duration, now: OffsetDateTime) -> Option<Duration> {
        self.headset_duration(now).filter(|d| *d >= threshold)
    }

    /// Samples, oldest first.
    pub fn exposure_log(&self) -> impl ExactSizeIterator<Item = &ExposureSample> {
        self.exposure_log.iter()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<&ExposureSample> {
        self.exposure_log.back()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of polls recorded, including evicted ones.
    pub fn polls(&self) -> u64 {
        self.polls
    }
}
