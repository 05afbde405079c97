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

//! One-time access codes and the pluggable issuer capability.
//!
//! ## Purpose
//! An [`AccessCode`] is the secret a customer presents to open a reserved
//! locker. Codes are opaque fixed-length tokens bound to a single
//! order/locker pairing; issuing a new code for a binding displaces any
//! previous one.
//!
//! ## Design
//! - Codes are generated from the operating-system RNG, never from a
//!   predictable source.
//! - Comparison is constant-time (`subtle`) so a mismatch leaks neither
//!   prefix nor length information through short-circuiting.
//! - `Debug`/`Display` never print the token.

use rand::{rngs::OsRng, Rng};
use std::fmt;
use subtle::ConstantTimeEq;

/// Default number of digits in an issued access code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Opaque one-time access code.
///
/// The wrapped token is a secret: it is excluded from `Debug` and
/// `Display` output, and equality checks go through the constant-time
/// [`AccessCode::matches`] rather than `PartialEq`.
#[derive(Clone)]
pub struct AccessCode(String);

impl AccessCode {
    /// Wrap an already-generated token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Number of characters in the token.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the token is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expose the secret token.
    ///
    /// Only the notification path and tests should need this; everything
    /// else compares via [`AccessCode::matches`].
    pub fn reveal(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a presented token.
    ///
    /// ## Behavior
    /// - Equal-length tokens are compared byte-for-byte with
    ///   `subtle::ConstantTimeEq`, with no early exit on mismatch.
    /// - A length mismatch still performs a full-width comparison over the
    ///   stored token before denying.
    pub fn matches(&self, presented: &str) -> bool {
        let stored = self.0.as_bytes();
        let candidate = presented.as_bytes();
        if stored.len() != candidate.len() {
            // Burn the same comparison work before rejecting.
            let _ = stored.ct_eq(stored);
            return false;
        }
        stored.ct_eq(candidate).into()
    }
}

impl fmt::Debug for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessCode(<redacted>)")
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "******")
    }
}

/// Capability interface for issuing and validating access codes.
///
/// ## Purpose
/// Decouples the registry from the code-generation scheme so a
/// deterministic stub can be injected for testing, mirroring the
/// production/test-double split used for notification delivery.
///
/// ## Behavior
/// Every call to [`AccessCodeIssuer::issue`] produces the code for a fresh
/// binding; the registry stores it on both the order and the locker,
/// displacing any previously issued code for that pairing. A stale code
/// therefore never validates against a new binding.
pub trait AccessCodeIssuer: Send + Sync {
    /// Issue a code for the given order/locker pairing.
    fn issue(&self, order_id: &str, locker_id: &str) -> AccessCode;

    /// Validate a presented token against the issued code.
    ///
    /// The default implementation defers to the constant-time
    /// [`AccessCode::matches`].
    fn validate(&self, issued: &AccessCode, presented: &str) -> bool {
        issued.matches(presented)
    }
}

/// Production issuer: fixed-length random digits from the OS RNG.
pub struct RandomCodeIssuer {
    length: usize,
}

impl RandomCodeIssuer {
    /// Create an issuer producing codes of `length` digits.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeIssuer {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl AccessCodeIssuer for RandomCodeIssuer {
    fn issue(&self, _order_id: &str, _locker_id: &str) -> AccessCode {
        let mut rng = OsRng;
        let token: String = (0..self.length)
            .map(|_| {
                let digit: u8 = rng.gen_range(0..10);
                char::from(b'0' + digit)
            })
            .collect();
        AccessCode::new(token)
    }
}

/// Deterministic issuer for tests: always returns the same token.
pub struct FixedCodeIssuer {
    token: String,
}

impl FixedCodeIssuer {
    /// Create an issuer that always issues `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AccessCodeIssuer for FixedCodeIssuer {
    fn issue(&self, _order_id: &str, _locker_id: &str) -> AccessCode {
        AccessCode::new(self.token.clone())
    }
}
