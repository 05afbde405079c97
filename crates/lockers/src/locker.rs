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

//! Locker compartment state machine.
//!
//! ## Purpose
//! A [`Locker`] is a single lockable compartment cycling through
//! `Available → Reserved → Open → Available`. The cycle has no terminal
//! state: a released locker is indistinguishable from one that was never
//! used.
//!
//! ## Design
//! The mutable portion (state, bound order, issued code, expiry) lives in
//! a cell behind a per-locker `tokio::sync::Mutex`, so transitions on one
//! locker never block transitions on another. The invariant maintained by
//! every transition: the bound order is set **iff** the state is
//! `Reserved` or `Open`.

use crate::code::AccessCode;
use crate::error::{LockerError, LockerResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::Mutex;
use tracing::debug;

/// Categorical compartment capacity shared by packages and lockers.
///
/// Size matching is exact: a package is never silently placed in an
/// oversized compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    /// Small compartment
    Small,
    /// Medium compartment
    Medium,
    /// Large compartment
    Large,
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeClass::Small => write!(f, "SMALL"),
            SizeClass::Medium => write!(f, "MEDIUM"),
            SizeClass::Large => write!(f, "LARGE"),
        }
    }
}

/// Lifecycle state of a locker compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockerState {
    /// Free; no order bound
    Available,
    /// Held for an order, door closed, awaiting the access code
    Reserved,
    /// Door open for the physical interaction
    Open,
}

impl fmt::Display for LockerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockerState::Available => write!(f, "AVAILABLE"),
            LockerState::Reserved => write!(f, "RESERVED"),
            LockerState::Open => write!(f, "OPEN"),
        }
    }
}

/// Point-in-time snapshot of a locker's mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerStatus {
    /// Current lifecycle state
    pub state: LockerState,
    /// Order bound to the locker, when `state` is `Reserved` or `Open`
    pub bound_order: Option<String>,
    /// Reservation deadline, when one was set at allocation time
    pub expires_at: Option<DateTime<Utc>>,
}

/// Mutable state guarded by the per-locker mutex.
struct LockerCell {
    state: LockerState,
    bound_order: Option<String>,
    code: Option<AccessCode>,
    expires_at: Option<DateTime<Utc>>,
}

/// A single lockable compartment of fixed size.
///
/// Owned by exactly one [`crate::LockerLocation`] for its lifetime.
/// Identity and size are immutable; all mutation goes through the
/// state-machine operations below.
pub struct Locker {
    id: String,
    size: SizeClass,
    cell: Mutex<LockerCell>,
}

impl Locker {
    /// Create a new locker in the `Available` state.
    pub fn new(id: impl Into<String>, size: SizeClass) -> Self {
        Self {
            id: id.into(),
            size,
            cell: Mutex::new(LockerCell {
                state: LockerState::Available,
                bound_order: None,
                code: None,
                expires_at: None,
            }),
        }
    }

    /// Locker identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Compartment size class.
    pub fn size(&self) -> SizeClass {
        self.size
    }

    /// Snapshot the current state for inspection.
    pub async fn status(&self) -> LockerStatus {
        let cell = self.cell.lock().await;
        LockerStatus {
            state: cell.state,
            bound_order: cell.bound_order.clone(),
            expires_at: cell.expires_at,
        }
    }

    /// Reserve the locker for an order: `Available → Reserved`.
    ///
    /// Stores the access code issued for this binding; any code issued for
    /// an earlier binding is gone with that binding and can never validate
    /// again.
    ///
    /// ## Errors
    /// [`LockerError::ResourceUnavailable`] when the locker is not
    /// `Available` (double-booking attempt).
    pub async fn reserve(
        &self,
        order_id: &str,
        code: AccessCode,
        expires_at: Option<DateTime<Utc>>,
    ) -> LockerResult<()> {
        let mut cell = self.cell.lock().await;
        if cell.state != LockerState::Available {
            return Err(LockerError::ResourceUnavailable(self.id.clone()));
        }
        cell.state = LockerState::Reserved;
        cell.bound_order = Some(order_id.to_string());
        cell.code = Some(code);
        cell.expires_at = expires_at;
        debug!(locker_id = %self.id, order_id, "locker reserved");
        Ok(())
    }

    /// Open the locker with a presented code: `Reserved → Open`.
    ///
    /// The comparison is constant-time; on mismatch the reservation is
    /// left intact so the caller may retry with the correct code.
    ///
    /// ## Errors
    /// - [`LockerError::InvalidState`] when the locker is not `Reserved`
    /// - [`LockerError::AccessDenied`] on code mismatch (state unchanged)
    pub async fn open(&self, presented: &str) -> LockerResult<()> {
        let mut cell = self.cell.lock().await;
        if cell.state != LockerState::Reserved {
            return Err(LockerError::InvalidState {
                locker_id: self.id.clone(),
                expected: LockerState::Reserved,
                actual: cell.state,
            });
        }
        let authorized = cell
            .code
            .as_ref()
            .map(|issued| issued.matches(presented))
            .unwrap_or(false);
        if !authorized {
            return Err(LockerError::AccessDenied(self.id.clone()));
        }
        cell.state = LockerState::Open;
        debug!(locker_id = %self.id, "locker opened");
        Ok(())
    }

    /// Close the locker and release the binding: `Open → Available`.
    ///
    /// ## Errors
    /// [`LockerError::InvalidState`] when the locker is not `Open`.
    pub async fn close(&self) -> LockerResult<()> {
        let mut cell = self.cell.lock().await;
        if cell.state != LockerState::Open {
            return Err(LockerError::InvalidState {
                locker_id: self.id.clone(),
                expected: LockerState::Open,
                actual: cell.state,
            });
        }
        cell.state = LockerState::Available;
        cell.bound_order = None;
        cell.code = None;
        cell.expires_at = None;
        debug!(locker_id = %self.id, "locker closed and released");
        Ok(())
    }

    /// Release a `Reserved` locker whose deadline has passed.
    ///
    /// Returns `true` when the locker was reclaimed. A locker with no
    /// deadline, or one that is `Open`, is never touched.
    pub(crate) async fn reclaim_if_expired(&self, now: DateTime<Utc>) -> bool {
        let mut cell = self.cell.lock().await;
        let expired = cell.state == LockerState::Reserved
            && cell.expires_at.map(|deadline| deadline < now).unwrap_or(false);
        if expired {
            cell.state = LockerState::Available;
            cell.bound_order = None;
            cell.code = None;
            cell.expires_at = None;
            debug!(locker_id = %self.id, "expired reservation reclaimed");
        }
        expired
    }
}
