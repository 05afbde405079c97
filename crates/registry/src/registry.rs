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

//! The central locker registry.
//!
//! ## Purpose
//! [`LockerRegistry`] is the process-wide coordinator: it owns every
//! [`LockerLocation`], injects the access-code issuer and notification
//! port, and exposes the caller-facing allocation, pickup, and
//! administrative operations. All locker state changes flow through it.
//!
//! ## Design
//! The registry is an explicitly constructed service object: built once
//! at process start with its collaborators and shared by `Arc`, never
//! reconstructed. Process-wide uniqueness comes from construction
//! discipline, not hidden global state.
//!
//! ## Locking Discipline
//! - The location map is read-locked only long enough to clone a handle.
//! - Search-and-reserve runs under the location's admission mutex.
//! - Per-locker transitions take only that locker's mutex.
//! - Every lock is dropped before the notification port is awaited, so a
//!   slow or failing transport cannot stall locker traffic.

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::notify::Notifier;
use chrono::Utc;
use plexlocker_lockers::{
    AccessCode, AccessCodeIssuer, LockerLocation, LockerRef, LockerStatus, Order,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use ulid::Ulid;

/// Successful allocation handed back to the caller.
#[derive(Debug, Clone)]
pub struct LockerBinding {
    /// Correlation identifier for this allocation
    pub allocation_id: String,
    /// Location holding the reserved locker
    pub location_id: String,
    /// Reserved locker
    pub locker_id: String,
    /// Access code issued for this binding (also stored on the order)
    pub code: AccessCode,
    /// Whether the notification port accepted the delivery; a `false`
    /// here never unwinds the reservation
    pub notified: bool,
}

/// Whether an allocation fulfils a delivery or a return.
///
/// Mechanically identical paths; only the notification wording differs.
#[derive(Debug, Clone, Copy)]
enum AllocationKind {
    Delivery,
    Return,
}

impl AllocationKind {
    fn message(self) -> &'static str {
        match self {
            AllocationKind::Delivery => "Your locker access code for package delivery.",
            AllocationKind::Return => "Your locker access code for package return.",
        }
    }
}

/// Process-wide locker coordination service.
///
/// ## Example
/// ```rust,no_run
/// use plexlocker_lockers::RandomCodeIssuer;
/// use plexlocker_registry::{LockerRegistry, TracingNotifier};
/// use std::sync::Arc;
///
/// let registry = LockerRegistry::new(
///     Arc::new(RandomCodeIssuer::default()),
///     Arc::new(TracingNotifier),
/// );
/// ```
pub struct LockerRegistry {
    locations: RwLock<HashMap<String, Arc<LockerLocation>>>,
    issuer: Arc<dyn AccessCodeIssuer>,
    notifier: Arc<dyn Notifier>,
    config: RegistryConfig,
}

impl LockerRegistry {
    /// Create a registry with the default configuration.
    pub fn new(issuer: Arc<dyn AccessCodeIssuer>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_config(RegistryConfig::default(), issuer, notifier)
    }

    /// Create a registry with an explicit configuration.
    pub fn with_config(
        config: RegistryConfig,
        issuer: Arc<dyn AccessCodeIssuer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            locations: RwLock::new(HashMap::new()),
            issuer,
            notifier,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a location (administrative setup; assumed not to race
    /// allocation traffic).
    ///
    /// ## Errors
    /// [`RegistryError::LocationExists`] when the ID is already taken.
    pub async fn add_location(&self, location: LockerLocation) -> RegistryResult<()> {
        let mut locations = self.locations.write().await;
        if locations.contains_key(location.id()) {
            return Err(RegistryError::LocationExists(location.id().to_string()));
        }
        info!(
            location_id = %location.id(),
            lockers = location.lockers().len(),
            "location registered"
        );
        locations.insert(location.id().to_string(), Arc::new(location));
        Ok(())
    }

    /// Look up a location handle.
    pub async fn location(&self, location_id: &str) -> Option<Arc<LockerLocation>> {
        self.locations.read().await.get(location_id).cloned()
    }

    /// Allocate a locker for a delivery order at the given location.
    ///
    /// ## Behavior
    /// Finds and reserves a free locker of the package's exact size class,
    /// issues a one-time code, records the binding on the order, then,
    /// with every lock released, notifies the customer. A notification
    /// failure is reported via [`LockerBinding::notified`] and a warning
    /// log; the reservation stands regardless, because the package is
    /// already physically headed into the compartment.
    ///
    /// ## Errors
    /// - [`RegistryError::InvalidOrder`] when the order already holds a
    ///   live binding
    /// - [`RegistryError::LocationNotFound`] for an unknown location
    /// - [`RegistryError::NoCapacity`] when nothing of that size is free
    pub async fn allocate_for_delivery(
        &self,
        order: &mut Order,
        location_id: &str,
    ) -> RegistryResult<LockerBinding> {
        self.allocate(order, location_id, AllocationKind::Delivery)
            .await
    }

    /// Allocate a locker for a return order at the given location.
    ///
    /// Identical mechanics to [`LockerRegistry::allocate_for_delivery`];
    /// only the notification wording differs.
    pub async fn allocate_for_return(
        &self,
        order: &mut Order,
        location_id: &str,
    ) -> RegistryResult<LockerBinding> {
        self.allocate(order, location_id, AllocationKind::Return)
            .await
    }

    async fn allocate(
        &self,
        order: &mut Order,
        location_id: &str,
        kind: AllocationKind,
    ) -> RegistryResult<LockerBinding> {
        let now = Utc::now();
        if order.has_active_binding(now) {
            return Err(RegistryError::InvalidOrder(format!(
                "order {} already holds a locker binding",
                order.id()
            )));
        }

        let location = self
            .location(location_id)
            .await
            .ok_or_else(|| RegistryError::LocationNotFound(location_id.to_string()))?;

        let size = order.package().size();
        let expires_at = self.config.pickup_window().map(|window| now + window);
        let reserved = location
            .reserve_first_fit(size, order.id(), self.issuer.as_ref(), expires_at)
            .await?;
        let Some((locker, code)) = reserved else {
            return Err(RegistryError::NoCapacity {
                size,
                location_id: location_id.to_string(),
            });
        };

        order.bind(
            LockerRef {
                location_id: location_id.to_string(),
                locker_id: locker.id().to_string(),
            },
            code.clone(),
            expires_at,
        );

        let allocation_id = Ulid::new().to_string();
        info!(
            allocation_id = %allocation_id,
            order_id = %order.id(),
            location_id,
            locker_id = %locker.id(),
            %size,
            kind = ?kind,
            "locker allocated"
        );

        // All locks are released here; the notification port may block or
        // fail without holding up locker traffic.
        let notified = match self
            .notifier
            .deliver(order.customer().contact(), &code, kind.message())
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    order_id = %order.id(),
                    contact = %order.customer().contact(),
                    error = %err,
                    "notification delivery failed; allocation stands"
                );
                false
            }
        };

        Ok(LockerBinding {
            allocation_id,
            location_id: location_id.to_string(),
            locker_id: locker.id().to_string(),
            code,
            notified,
        })
    }

    /// Complete a pickup by presenting the access code for the order's
    /// reserved locker.
    ///
    /// ## Behavior
    /// Validates the code in constant time and opens the locker. With
    /// `auto_close` (the default) the locker is closed and released in the
    /// same call, so no OPEN window is observable. With `auto_close`
    /// disabled the locker stays open and the caller finishes via
    /// [`LockerRegistry::close_locker`].
    ///
    /// ## Errors
    /// - [`RegistryError::NoActiveBinding`] when the order has no binding
    ///   or its pickup deadline has passed
    /// - [`RegistryError::Locker`] wrapping `AccessDenied` on a wrong
    ///   code; the reservation stays intact and the caller may retry
    ///   (rate limiting is an external concern)
    pub async fn complete_pickup(
        &self,
        order: &mut Order,
        presented: &str,
    ) -> RegistryResult<()> {
        let now = Utc::now();
        if !order.has_active_binding(now) {
            return Err(RegistryError::NoActiveBinding(order.id().to_string()));
        }
        let locker = self.bound_locker(order).await?;

        locker.open(presented).await?;

        if self.config.auto_close {
            locker.close().await?;
            order.clear_binding();
            info!(
                order_id = %order.id(),
                locker_id = %locker.id(),
                "pickup complete; locker released"
            );
        } else {
            info!(
                order_id = %order.id(),
                locker_id = %locker.id(),
                "locker open for pickup"
            );
        }
        Ok(())
    }

    /// Close an open locker and release its binding.
    ///
    /// Completes the pickup cycle when the registry is configured with an
    /// observable OPEN window (`auto_close = false`).
    ///
    /// ## Errors
    /// - [`RegistryError::NoActiveBinding`] when the order holds no
    ///   binding at all
    /// - [`RegistryError::Locker`] wrapping `InvalidState` when the
    ///   locker is not open
    pub async fn close_locker(&self, order: &mut Order) -> RegistryResult<()> {
        let locker = self.bound_locker(order).await?;
        locker.close().await?;
        order.clear_binding();
        info!(
            order_id = %order.id(),
            locker_id = %locker.id(),
            "locker closed and released"
        );
        Ok(())
    }

    /// Release every expired reservation at a location.
    ///
    /// Explicit administrative sweep; the core runs no timers. Orders
    /// whose lockers are reclaimed fail later pickups with
    /// `NoActiveBinding` through their own deadline check.
    ///
    /// ## Returns
    /// IDs of the lockers that were released.
    pub async fn reclaim_expired(&self, location_id: &str) -> RegistryResult<Vec<String>> {
        let location = self
            .location(location_id)
            .await
            .ok_or_else(|| RegistryError::LocationNotFound(location_id.to_string()))?;
        let reclaimed = location.reclaim_expired(Utc::now()).await;
        if !reclaimed.is_empty() {
            info!(location_id, lockers = ?reclaimed, "expired reservations reclaimed");
        }
        Ok(reclaimed)
    }

    /// Snapshot the state of the locker bound to an order.
    pub async fn locker_status(&self, order: &Order) -> RegistryResult<LockerStatus> {
        let locker = self.bound_locker(order).await?;
        Ok(locker.status().await)
    }

    /// Resolve the locker behind an order's binding.
    async fn bound_locker(
        &self,
        order: &Order,
    ) -> RegistryResult<Arc<plexlocker_lockers::Locker>> {
        let binding = order
            .binding()
            .ok_or_else(|| RegistryError::NoActiveBinding(order.id().to_string()))?;
        let location = self
            .location(&binding.location_id)
            .await
            .ok_or_else(|| RegistryError::LocationNotFound(binding.location_id.clone()))?;
        location
            .locker(&binding.locker_id)
            .ok_or_else(|| RegistryError::NoActiveBinding(order.id().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::TracingNotifier;
    use plexlocker_lockers::{FixedCodeIssuer, Locker, Package, Person, SizeClass};

    fn test_registry() -> LockerRegistry {
        LockerRegistry::new(
            Arc::new(FixedCodeIssuer::new("123456")),
            Arc::new(TracingNotifier),
        )
    }

    fn medium_order(id: &str) -> Order {
        Order::new(
            id,
            Person::customer("Alice", "555-1234"),
            Package::new("pkg-1", SizeClass::Medium),
        )
    }

    #[tokio::test]
    async fn test_add_location_rejects_duplicate_id() {
        let registry = test_registry();
        registry
            .add_location(LockerLocation::new("loc-1", "123 Main Street"))
            .await
            .unwrap();
        let result = registry
            .add_location(LockerLocation::new("loc-1", "456 Elm Street"))
            .await;
        assert!(matches!(result, Err(RegistryError::LocationExists(_))));
    }

    #[tokio::test]
    async fn test_allocate_unknown_location() {
        let registry = test_registry();
        let mut order = medium_order("order-1");
        let result = registry.allocate_for_delivery(&mut order, "nowhere").await;
        assert!(matches!(result, Err(RegistryError::LocationNotFound(_))));
        assert!(order.binding().is_none());
    }

    #[tokio::test]
    async fn test_allocate_rejects_order_with_live_binding() {
        let registry = test_registry();
        let mut location = LockerLocation::new("loc-1", "123 Main Street");
        location.add_locker(Locker::new("L1", SizeClass::Medium));
        location.add_locker(Locker::new("L2", SizeClass::Medium));
        registry.add_location(location).await.unwrap();

        let mut order = medium_order("order-1");
        registry
            .allocate_for_delivery(&mut order, "loc-1")
            .await
            .unwrap();
        let result = registry.allocate_for_delivery(&mut order, "loc-1").await;
        assert!(matches!(result, Err(RegistryError::InvalidOrder(_))));

        // Only one locker was consumed.
        let location = registry.location("loc-1").await.unwrap();
        assert!(location.find_available(SizeClass::Medium).await.is_some());
    }

    #[tokio::test]
    async fn test_pickup_without_binding() {
        let registry = test_registry();
        let mut order = medium_order("order-1");
        let result = registry.complete_pickup(&mut order, "123456").await;
        assert!(matches!(result, Err(RegistryError::NoActiveBinding(_))));
    }
}
