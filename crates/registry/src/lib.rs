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

//! # PlexLocker Registry Service
//!
//! ## Purpose
//! The coordination layer of the locker service: allocation of lockers to
//! delivery/return orders, access-code validation on pickup, and the
//! administrative operations around them. The collaborators (code issuer
//! and notification port) are injected at construction.
//!
//! ## Architecture
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 LockerRegistry                   │
//! │  allocate_for_delivery / allocate_for_return     │
//! │  complete_pickup / close_locker / reclaim        │
//! └──────┬──────────────────┬────────────────┬───────┘
//!        │ owns             │ injects        │ injects
//!   ┌────▼────────┐   ┌─────▼──────────┐ ┌───▼──────────┐
//!   │LockerLocation│  │AccessCodeIssuer│ │   Notifier   │
//!   │ (admission  │   │ (random / test │ │ (tracing /   │
//!   │  mutex)     │   │  stub)         │ │  test double)│
//!   └────┬────────┘   └────────────────┘ └──────────────┘
//!        │ owns
//!   ┌────▼────┐
//!   │ Locker  │  per-locker mutex, AVAILABLE→RESERVED→OPEN cycle
//!   └─────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use plexlocker_lockers::{Locker, LockerLocation, Order, Package, Person, RandomCodeIssuer, SizeClass};
//! use plexlocker_registry::{LockerRegistry, TracingNotifier};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = LockerRegistry::new(
//!     Arc::new(RandomCodeIssuer::default()),
//!     Arc::new(TracingNotifier),
//! );
//!
//! let mut location = LockerLocation::new("loc-1", "123 Main Street");
//! location.add_locker(Locker::new("L1", SizeClass::Medium));
//! registry.add_location(location).await?;
//!
//! let customer = Person::customer("Alice", "555-1234");
//! let package = Package::new("pkg-1", SizeClass::Medium);
//! let mut order = Order::new("order-1", customer, package);
//!
//! let binding = registry.allocate_for_delivery(&mut order, "loc-1").await?;
//! registry
//!     .complete_pickup(&mut order, binding.code.reveal())
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod notify;
pub mod registry;

pub use config::RegistryConfig;
pub use error::{RegistryError, RegistryResult};
pub use notify::{
    FailingNotifier, Notifier, NotifyError, RecordedDelivery, RecordingNotifier, TracingNotifier,
};
pub use registry::{LockerBinding, LockerRegistry};

// Re-export the domain crate so callers need a single dependency.
pub use plexlocker_lockers as lockers;
