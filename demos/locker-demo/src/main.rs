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

//! # PlexLocker End-to-End Walkthrough
//!
//! ## Purpose
//! Demonstrates the whole delivery lifecycle against an in-process
//! registry: location setup, allocation with code issuance and
//! notification, a failed pickup attempt, and the successful pickup that
//! releases the compartment.
//!
//! ## Usage
//! ```bash
//! RUST_LOG=debug cargo run -p locker-demo
//! ```

use anyhow::Result;
use plexlocker_lockers::{
    Locker, LockerLocation, Order, Package, Person, RandomCodeIssuer, SizeClass,
};
use plexlocker_registry::{LockerRegistry, RegistryConfig, TracingNotifier};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // The registry is built once at process start with its collaborators
    // injected, then shared by handle.
    let config = RegistryConfig::from_env();
    let registry = Arc::new(LockerRegistry::with_config(
        config.clone(),
        Arc::new(RandomCodeIssuer::new(config.code_length)),
        Arc::new(TracingNotifier),
    ));

    let mut location = LockerLocation::new("loc-downtown", "123 Main Street");
    location.add_locker(Locker::new("L1", SizeClass::Small));
    location.add_locker(Locker::new("L2", SizeClass::Medium));
    location.add_locker(Locker::new("L3", SizeClass::Large));
    registry.add_location(location).await?;

    let customer = Person::customer("Alice", "555-1234");
    let package = Package::new("PKG1", SizeClass::Medium);
    let mut order = Order::new("ORD1", customer, package);

    let binding = registry
        .allocate_for_delivery(&mut order, "loc-downtown")
        .await?;
    info!(
        locker_id = %binding.locker_id,
        allocation_id = %binding.allocation_id,
        notified = binding.notified,
        "order allocated"
    );

    // A wrong code is an ordinary, retryable outcome.
    if let Err(err) = registry.complete_pickup(&mut order, "000000").await {
        info!(error = %err, "pickup attempt rejected");
    }

    registry
        .complete_pickup(&mut order, binding.code.reveal())
        .await?;
    info!(order_id = %order.id(), "pickup complete; locker back in the pool");

    Ok(())
}
