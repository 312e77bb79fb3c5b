// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

use sim_core::DebugConfig;

use crate::error::ConfigError;

/// The `[debug]` section: the master gate plus a list of per-port debug
/// points (spec §6).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DebugSection {
    pub enabled: bool,
    #[serde(default)]
    pub debug_points: Vec<DebugPoint>,
}

/// One `[[debug.debug_points]]` entry. `action` selects which single field
/// of the derived `DebugConfig` this point populates.
#[derive(Clone, Debug, Deserialize)]
pub struct DebugPoint {
    pub server_port: u16,
    pub point_name: String,
    pub action: DebugAction,
    #[serde(default)]
    pub delay_ms: u32,
    #[serde(default)]
    pub error_code: i32,
    #[serde(default = "default_probability")]
    pub probability: u8,
}

fn default_probability() -> u8 {
    100
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugAction {
    Delay,
    Disconnect,
    Log,
    Error,
}

impl DebugPoint {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.probability > 100 {
            return Err(ConfigError::InvalidDebugPoint {
                server_port: self.server_port,
                point_name: self.point_name.clone(),
                reason: format!("probability {} out of range 0..=100", self.probability),
            });
        }
        if self.action == DebugAction::Error && !(0..=i32::from(u16::MAX)).contains(&self.error_code) {
            return Err(ConfigError::InvalidDebugPoint {
                server_port: self.server_port,
                point_name: self.point_name.clone(),
                reason: format!("error_code {} is not a valid HTTP status", self.error_code),
            });
        }
        Ok(())
    }
}

impl DebugSection {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for point in &self.debug_points {
            point.validate()?;
        }
        Ok(())
    }

    /// Folds every debug point targeting `port` into one [`DebugConfig`],
    /// per the mapping table in spec §6: `delay` sets `delay_ms`,
    /// `disconnect` sets `force_disconnect`, `log` sets `log_packet`, `error`
    /// sets `http_status`. `enabled` is this section's master gate.
    pub fn debug_config_for_port(&self, port: u16) -> DebugConfig {
        let mut config = DebugConfig {
            enabled: self.enabled,
            ..DebugConfig::default()
        };
        for point in self.debug_points.iter().filter(|p| p.server_port == port) {
            match point.action {
                DebugAction::Delay => config.delay_ms = point.delay_ms,
                DebugAction::Disconnect => config.force_disconnect = true,
                DebugAction::Log => config.log_packet = true,
                DebugAction::Error => config.http_status = point.error_code as u16,
            }
        }
        config
    }

    /// The probability (0-100) of the first debug point registered for
    /// `port`, or 100 (always run) if none is registered.
    pub fn probability_for_port(&self, port: u16) -> u8 {
        self.debug_points
            .iter()
            .find(|p| p.server_port == port)
            .map(|p| p.probability)
            .unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_config_for_port_folds_matching_points_only() {
        let section = DebugSection {
            enabled: true,
            debug_points: vec![
                DebugPoint {
                    server_port: 8443,
                    point_name: "a".to_string(),
                    action: DebugAction::Delay,
                    delay_ms: 250,
                    error_code: 0,
                    probability: 100,
                },
                DebugPoint {
                    server_port: 8443,
                    point_name: "b".to_string(),
                    action: DebugAction::Error,
                    delay_ms: 0,
                    error_code: 503,
                    probability: 100,
                },
                DebugPoint {
                    server_port: 9000,
                    point_name: "c".to_string(),
                    action: DebugAction::Disconnect,
                    delay_ms: 0,
                    error_code: 0,
                    probability: 100,
                },
            ],
        };
        let config = section.debug_config_for_port(8443);
        assert!(config.enabled);
        assert_eq!(config.delay_ms, 250);
        assert_eq!(config.http_status, 503);
        assert!(!config.force_disconnect);
    }

    #[test]
    fn unconfigured_port_yields_only_the_master_gate() {
        let section = DebugSection {
            enabled: true,
            debug_points: vec![],
        };
        let config = section.debug_config_for_port(1234);
        assert!(config.enabled);
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.http_status, 200);
    }

    #[test]
    fn probability_out_of_range_fails_validation() {
        let section = DebugSection {
            enabled: true,
            debug_points: vec![DebugPoint {
                server_port: 8443,
                point_name: "bad".to_string(),
                action: DebugAction::Log,
                delay_ms: 0,
                error_code: 0,
                probability: 150,
            }],
        };
        assert!(section.validate().is_err());
    }
}
