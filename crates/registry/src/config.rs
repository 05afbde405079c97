// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of PlexLocker.
//
// PlexLocker is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// PlexLocker is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with PlexLocker. If not, see <https://www.gnu.org/licenses/>.

//! Registry configuration.
//!
//! ## Environment Variables
//! - `PLEXLOCKER_CODE_LENGTH`: digits per access code (default: 6)
//! - `PLEXLOCKER_PICKUP_WINDOW_SECS`: seconds a reservation stays live
//!   before an explicit reclaim may release it (default: unset, no expiry)
//! - `PLEXLOCKER_AUTO_CLOSE`: close the locker immediately after a
//!   successful pickup open (default: true). When false the locker stays
//!   observably OPEN until [`close_locker`] is called.
//!
//! [`close_locker`]: crate::LockerRegistry::close_locker

use plexlocker_lockers::DEFAULT_CODE_LENGTH;
use serde::{Deserialize, Serialize};

/// Tunable policy knobs for [`crate::LockerRegistry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Digits per issued access code.
    pub code_length: usize,

    /// Seconds a reservation stays live. `None` means reservations never
    /// expire; expiry is only ever evaluated at call time.
    pub pickup_window_secs: Option<u64>,

    /// Close the locker in the same pickup call that opened it.
    ///
    /// The default models the atomic "open, retrieve, door auto-closes"
    /// interaction; disabling it makes the OPEN window observable to
    /// other callers, with [`crate::LockerRegistry::close_locker`]
    /// completing the cycle.
    pub auto_close: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            pickup_window_secs: None,
            auto_close: true,
        }
    }
}

impl RegistryConfig {
    /// Build a configuration from `PLEXLOCKER_*` environment variables,
    /// falling back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let code_length = std::env::var("PLEXLOCKER_CODE_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.code_length);
        let pickup_window_secs = std::env::var("PLEXLOCKER_PICKUP_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok());
        let auto_close = std::env::var("PLEXLOCKER_AUTO_CLOSE")
            .ok()
            .and_then(|v| match v.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            })
            .unwrap_or(defaults.auto_close);

        Self {
            code_length,
            pickup_window_secs,
            auto_close,
        }
    }

    /// Pickup window as a `chrono::Duration`, when configured.
    pub fn pickup_window(&self) -> Option<chrono::Duration> {
        self.pickup_window_secs
            .map(|secs| chrono::Duration::seconds(secs as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.code_length, DEFAULT_CODE_LENGTH);
        assert!(config.pickup_window_secs.is_none());
        assert!(config.pickup_window().is_none());
        assert!(config.auto_close);
    }

    #[test]
    fn test_pickup_window_conversion() {
        let config = RegistryConfig {
            pickup_window_secs: Some(90),
            ..Default::default()
        };
        assert_eq!(config.pickup_window(), Some(chrono::Duration::seconds(90)));
    }

    #[test]
    fn test_roundtrips_through_serde() {
        let config = RegistryConfig {
            code_length: 8,
            pickup_window_secs: Some(3600),
            auto_close: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RegistryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.code_length, 8);
        assert_eq!(parsed.pickup_window_secs, Some(3600));
        assert!(!parsed.auto_close);
    }
}
