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

//! # PlexLocker Domain Model
//!
//! ## Purpose
//! Core entities for the locker allocation service: the compartment state
//! machine ([`Locker`]), the pooled search over compartments
//! ([`LockerLocation`]), one-time access codes ([`AccessCode`] and the
//! pluggable [`AccessCodeIssuer`]), and the supporting order entities.
//!
//! ## Architecture Context
//! This crate holds state and invariants only; the coordination layer
//! (`plexlocker-registry`) composes these pieces into the caller-facing
//! allocation/pickup operations and owns the notification boundary.
//!
//! ## Concurrency Model
//! - Each [`Locker`] guards its mutable cell with its own mutex, so
//!   transitions on different lockers proceed independently.
//! - Each [`LockerLocation`] serializes search-and-reserve under an
//!   admission mutex, closing the find/reserve race.
//!
//! ## Examples
//! ```rust,no_run
//! use plexlocker_lockers::{
//!     FixedCodeIssuer, Locker, LockerLocation, SizeClass,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut location = LockerLocation::new("loc-1", "123 Main Street");
//! location.add_locker(Locker::new("L1", SizeClass::Medium));
//!
//! let issuer = FixedCodeIssuer::new("123456");
//! let reserved = location
//!     .reserve_first_fit(SizeClass::Medium, "order-1", &issuer, None)
//!     .await?;
//! if let Some((locker, code)) = reserved {
//!     locker.open(code.reveal()).await?;
//!     locker.close().await?;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code;
pub mod error;
pub mod location;
pub mod locker;
pub mod order;

pub use code::{
    AccessCode, AccessCodeIssuer, FixedCodeIssuer, RandomCodeIssuer, DEFAULT_CODE_LENGTH,
};
pub use error::{LockerError, LockerResult};
pub use location::LockerLocation;
pub use locker::{Locker, LockerState, LockerStatus, SizeClass};
pub use order::{LockerRef, Order, Package, Person, PersonRole};
