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

//! Error types for locker state-machine operations.

use crate::locker::LockerState;
use thiserror::Error;

/// Result type for locker operations.
pub type LockerResult<T> = Result<T, LockerError>;

/// Errors that can occur during locker state transitions.
///
/// All variants are routine, per-request outcomes. Seeing
/// `ResourceUnavailable` or `InvalidState` after the registry's locking
/// discipline is applied indicates a coordination bug, so they are always
/// surfaced to the caller rather than swallowed.
#[derive(Error, Debug)]
pub enum LockerError {
    /// Locker is not AVAILABLE, so it cannot be reserved (double-booking attempt)
    #[error("Locker not available for reservation: {0}")]
    ResourceUnavailable(String),

    /// Operation invoked against the wrong state in the locker lifecycle
    #[error("Locker {locker_id} is in state {actual}, expected {expected}")]
    InvalidState {
        /// Locker the operation targeted
        locker_id: String,
        /// State the operation requires
        expected: LockerState,
        /// State the locker was actually in
        actual: LockerState,
    },

    /// Presented access code did not match the code issued for the current binding
    #[error("Access code rejected for locker {0}")]
    AccessDenied(String),
}
