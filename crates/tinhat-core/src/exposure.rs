//! Exposure estimates from connected Bluetooth devices.
//!
//! This is a coarse heuristic, not a measurement: each connected device
//! adds a weight by how close to the body it is usually worn, and the total
//! is bucketed into a level.
//!
//! | Device type contains | Weight |
//! |----------------------|--------|
//! | `headset`, `headphone` | 3 |
//! | `watch` | 2 |
//! | `phone` | 2 |
//! | anything else | 1 |
//!
//! # Example
//!
//! ```
//! use tinhat_core::{ExposureLevel, ExposureThresholds};
//! use tinhat_types::DeviceRecord;
//!
//! let devices = vec![
//!     DeviceRecord::new("AA:BB:CC:DD:EE:01", true).with_type("Headphones"),
//!     DeviceRecord::new("AA:BB:CC:DD:EE:02", true).with_type("Keyboard"),
//! ];
//!
//! let assessment = ExposureThresholds::default().assess(&devices);
//! assert_eq!(assessment.score, 4);
//! assert_eq!(assessment.level, ExposureLevel::Moderate);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use tinhat_types::{DeviceKind, DeviceRecord};

/// Exposure category for a set of connected devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExposureLevel {
    Low,
    Moderate,
    High,
}

impl ExposureLevel {
    /// Bucket a score with the default cut-offs.
    pub fn from_score(score: u32) -> Self {
        ExposureThresholds::default().evaluate(score)
    }

    /// Get a human-readable description of the level.
    pub fn description(&self) -> &'static str {
        match self {
            ExposureLevel::Low => "Few or distant devices",
            ExposureLevel::Moderate => "Several devices or one worn on the head",
            ExposureLevel::High => "Many devices close to the body",
        }
    }

    /// Get the suggested action for this level.
    pub fn action(&self) -> &'static str {
        match self {
            ExposureLevel::Low => "No action needed",
            ExposureLevel::Moderate => "Take regular breaks from worn devices",
            ExposureLevel::High => "Disconnect devices you are not using",
        }
    }
}

impl fmt::Display for ExposureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExposureLevel::Low => write!(f, "LOW"),
            ExposureLevel::Moderate => write!(f, "MODERATE"),
            ExposureLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Weight of one connected device by its free-text type.
pub fn device_weight(device_type: &str) -> u32 {
    let lower = device_type.to_lowercase();
    if lower.contains("headset") || lower.contains("headphone") {
        3
    } else if lower.contains("watch") || lower.contains("phone") {
        2
    } else {
        1
    }
}

/// Score cut-offs for [`ExposureLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureThresholds {
    /// Highest score still [`ExposureLevel::Low`].
    pub low_max: u32,
    /// Highest score still [`ExposureLevel::Moderate`].
    pub moderate_max: u32,
}

impl Default for ExposureThresholds {
    fn default() -> Self {
        Self {
            low_max: 2,
            moderate_max: 5,
        }
    }
}

/// Result of an exposure assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub score: u32,
    pub level: ExposureLevel,
    /// Number of connected devices counted.
    pub device_count: usize,
}

impl ExposureThresholds {
    /// Bucket a score.
    pub fn evaluate(&self, score: u32) -> ExposureLevel {
        if score <= self.low_max {
            ExposureLevel::Low
        } else if score <= self.moderate_max {
            ExposureLevel::Moderate
        } else {
            ExposureLevel::High
        }
    }

    /// Assess a device list. Only connected records count.
    pub fn assess<'a, I>(&self, devices: I) -> Assessment
    where
        I: IntoIterator<Item = &'a DeviceRecord>,
    {
        let (score, device_count) = devices
            .into_iter()
            .filter(|d| d.connected)
            .fold((0, 0), |(score, count), d| {
                (score + device_weight(&d.device_type), count + 1)
            });

        Assessment {
            score,
            level: self.evaluate(score),
            device_count,
        }
    }
}

/// How closely a device warrants watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Low,
    Monitor,
}

/// Typical distance of a device from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Proximity {
    /// Display text such as `"~0.5m (desk)"`.
    pub distance: &'static str,
    pub risk: Risk,
}

impl Proximity {
    /// Estimated placement of a device, based on its kind and whether it is
    /// connected.
    pub fn for_device(device: &DeviceRecord) -> Self {
        if !device.connected {
            return Self {
                distance: "2-10m (estimated)",
                risk: Risk::Low,
            };
        }

        match device.kind() {
            DeviceKind::Keyboard | DeviceKind::Mouse => Self {
                distance: "~0.5m (desk)",
                risk: Risk::Low,
            },
            DeviceKind::Headset | DeviceKind::Headphones => Self {
                distance: "~0.1m (on head)",
                risk: Risk::Monitor,
            },
            DeviceKind::Watch => Self {
                distance: "~0m (on body)",
                risk: Risk::Monitor,
            },
            _ => Self {
                distance: "<2m",
                risk: Risk::Low,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected(device_type: &str) -> DeviceRecord {
        DeviceRecord::new("AA:BB:CC:DD:EE:FF", true).with_type(device_type)
    }

    #[test]
    fn test_weights() {
        assert_eq!(device_weight("Headset"), 3);
        assert_eq!(device_weight("Headphones"), 3);
        assert_eq!(device_weight("Watch"), 2);
        assert_eq!(device_weight("Phone"), 2);
        assert_eq!(device_weight("Keyboard"), 1);
        assert_eq!(device_weight("Unknown"), 1);
    }

    #[test]
    fn test_level_boundaries() {
        let t = ExposureThresholds::default();
        assert_eq!(t.evaluate(0), ExposureLevel::Low);
        assert_eq!(t.evaluate(2), ExposureLevel::Low);
        assert_eq!(t.evaluate(3), ExposureLevel::Moderate);
        assert_eq!(t.evaluate(5), ExposureLevel::Moderate);
        assert_eq!(t.evaluate(6), ExposureLevel::High);
        assert_eq!(ExposureLevel::from_score(2), ExposureLevel::Low);
        assert_eq!(ExposureLevel::from_score(6), ExposureLevel::High);
    }

    #[test]
    fn test_assess_counts_only_connected() {
        let devices = vec![
            connected("Headset"),
            connected("Watch"),
            connected("Phone"),
            DeviceRecord::new("AA:BB:CC:DD:EE:00", false).with_type("Headset"),
        ];
        let a = ExposureThresholds::default().assess(&devices);
        assert_eq!(a.score, 7);
        assert_eq!(a.device_count, 3);
        assert_eq!(a.level, ExposureLevel::High);
    }

    #[test]
    fn test_assess_empty() {
        let a = ExposureThresholds::default().assess(&[]);
        assert_eq!(a.score, 0);
        assert_eq!(a.device_count, 0);
        assert_eq!(a.level, ExposureLevel::Low);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = ExposureThresholds {
            low_max: 0,
            moderate_max: 1,
        };
        assert_eq!(t.assess(&[connected("Mouse")]).level, ExposureLevel::Moderate);
    }

    #[test]
    fn test_level_display_and_serde() {
        assert_eq!(ExposureLevel::Moderate.to_string(), "MODERATE");
        assert_eq!(
            serde_json::to_string(&ExposureLevel::High).unwrap(),
            "\"HIGH\""
        );
        assert!(ExposureLevel::Low < ExposureLevel::High);
    }

    #[test]
    fn test_proximity() {
        assert_eq!(Proximity::for_device(&connected("Keyboard")).distance, "~0.5m (desk)");
        assert_eq!(Proximity::for_device(&connected("Headphones")).risk, Risk::Monitor);
        assert_eq!(Proximity::for_device(&connected("Watch")).risk, Risk::Monitor);
        assert_eq!(Proximity::for_device(&connected("Speaker")).distance, "<2m");

        let nearby = DeviceRecord::new("AA:BB:CC:DD:EE:FF", false).with_type("Headset");
        let p = Proximity::for_device(&nearby);
        assert_eq!(p.distance, "2-10m (estimated)");
        assert_eq!(p.risk, Risk::Low);
    }
}
