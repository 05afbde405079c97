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

//! Error types for registry operations.

use plexlocker_lockers::{LockerError, SizeClass};
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors returned by the caller-facing registry operations.
///
/// Capacity exhaustion, unknown locations, and wrong codes are ordinary
/// results here, not faults; nothing in this taxonomy is fatal to the
/// process, and every failure leaves shared state consistent.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No location registered under the given ID
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// A location with this ID is already registered
    #[error("Location already registered: {0}")]
    LocationExists(String),

    /// No available locker of the requested size at the location
    #[error("No available {size} locker at location {location_id}")]
    NoCapacity {
        /// Size class the order's package requires
        size: SizeClass,
        /// Location that was searched
        location_id: String,
    },

    /// Pickup attempted for an order with no live reservation
    #[error("Order {0} has no active locker binding")]
    NoActiveBinding(String),

    /// The order cannot be allocated as presented
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Locker state-machine precondition failure (including `AccessDenied`)
    #[error(transparent)]
    Locker(#[from] LockerError),
}
