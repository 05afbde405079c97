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

//! Concurrency tests for the registry's locking discipline.
//!
//! These tests verify:
//! - Exclusivity: concurrent allocations for the last locker of a size
//!   class produce exactly one winner
//! - Independence: operations on different lockers do not serialize
//!   against each other
//! - Consistency: racing allocation and pickup traffic never leaves a
//!   locker in a state that violates the binding bijection

use plexlocker_lockers::{
    Locker, LockerLocation, LockerState, Order, Package, Person, RandomCodeIssuer, SizeClass,
};
use plexlocker_registry::{LockerRegistry, RegistryError, TracingNotifier};
use std::sync::Arc;

fn order_for(id: &str, size: SizeClass) -> Order {
    Order::new(
        id,
        Person::customer("Alice", "555-1234"),
        Package::new(format!("pkg-{}", id), size),
    )
}

#[tokio::test]
async fn test_concurrent_allocation_has_exactly_one_winner() {
    let registry = Arc::new(LockerRegistry::new(
        Arc::new(RandomCodeIssuer::default()),
        Arc::new(TracingNotifier),
    ));
    let mut location = LockerLocation::new("loc-1", "123 Main Street");
    location.add_locker(Locker::new("L1", SizeClass::Medium));
    registry.add_location(location).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..10 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            let mut order = order_for(&format!("order-{}", i), SizeClass::Medium);
            registry.allocate_for_delivery(&mut order, "loc-1").await
        }));
    }

    let mut winners = 0;
    let mut exhausted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(binding) => {
                assert_eq!(binding.locker_id, "L1");
                winners += 1;
            }
            Err(RegistryError::NoCapacity { .. }) => exhausted += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(exhausted, 9);

    let location = registry.location("loc-1").await.unwrap();
    let status = location.locker("L1").unwrap().status().await;
    assert_eq!(status.state, LockerState::Reserved);
    assert!(status.bound_order.is_some());
}

#[tokio::test]
async fn test_concurrent_allocations_across_size_classes() {
    // One locker per size class; three racing orders of distinct sizes
    // must all succeed. They contend on the admission mutex but never on
    // capacity.
    let registry = Arc::new(LockerRegistry::new(
        Arc::new(RandomCodeIssuer::default()),
        Arc::new(TracingNotifier),
    ));
    let mut location = LockerLocation::new("loc-1", "123 Main Street");
    location.add_locker(Locker::new("L1", SizeClass::Small));
    location.add_locker(Locker::new("L2", SizeClass::Medium));
    location.add_locker(Locker::new("L3", SizeClass::Large));
    registry.add_location(location).await.unwrap();

    let sizes = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];
    let mut handles = Vec::new();
    for (i, size) in sizes.into_iter().enumerate() {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            let mut order = order_for(&format!("order-{}", i), size);
            registry.allocate_for_delivery(&mut order, "loc-1").await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_concurrent_pickups_on_different_lockers() {
    let registry = Arc::new(LockerRegistry::new(
        Arc::new(RandomCodeIssuer::default()),
        Arc::new(TracingNotifier),
    ));
    let mut location = LockerLocation::new("loc-1", "123 Main Street");
    location.add_locker(Locker::new("L1", SizeClass::Medium));
    location.add_locker(Locker::new("L2", SizeClass::Medium));
    registry.add_location(location).await.unwrap();

    let mut first = order_for("order-1", SizeClass::Medium);
    let mut second = order_for("order-2", SizeClass::Medium);
    let b1 = registry
        .allocate_for_delivery(&mut first, "loc-1")
        .await
        .unwrap();
    let b2 = registry
        .allocate_for_delivery(&mut second, "loc-1")
        .await
        .unwrap();
    assert_ne!(b1.locker_id, b2.locker_id);

    let r1 = registry.clone();
    let h1 = tokio::spawn(async move {
        r1.complete_pickup(&mut first, b1.code.reveal()).await
    });
    let r2 = registry.clone();
    let h2 = tokio::spawn(async move {
        r2.complete_pickup(&mut second, b2.code.reveal()).await
    });

    h1.await.unwrap().unwrap();
    h2.await.unwrap().unwrap();

    let location = registry.location("loc-1").await.unwrap();
    for locker in location.lockers() {
        let status = locker.status().await;
        assert_eq!(status.state, LockerState::Available);
        assert!(status.bound_order.is_none());
    }
}

#[tokio::test]
async fn test_allocation_racing_pickup_stays_consistent() {
    // A pickup releasing the only locker races a fresh allocation. The
    // allocation either wins the freed locker or reports NoCapacity;
    // either way the binding bijection holds afterwards.
    let registry = Arc::new(LockerRegistry::new(
        Arc::new(RandomCodeIssuer::default()),
        Arc::new(TracingNotifier),
    ));
    let mut location = LockerLocation::new("loc-1", "123 Main Street");
    location.add_locker(Locker::new("L1", SizeClass::Medium));
    registry.add_location(location).await.unwrap();

    let mut holder = order_for("order-holder", SizeClass::Medium);
    let binding = registry
        .allocate_for_delivery(&mut holder, "loc-1")
        .await
        .unwrap();

    let r1 = registry.clone();
    let pickup = tokio::spawn(async move {
        r1.complete_pickup(&mut holder, binding.code.reveal()).await
    });
    let r2 = registry.clone();
    let allocate = tokio::spawn(async move {
        let mut contender = order_for("order-contender", SizeClass::Medium);
        r2.allocate_for_delivery(&mut contender, "loc-1").await
    });

    pickup.await.unwrap().unwrap();
    let allocation = allocate.await.unwrap();

    let location = registry.location("loc-1").await.unwrap();
    let status = location.locker("L1").unwrap().status().await;
    match allocation {
        Ok(binding) => {
            assert_eq!(binding.locker_id, "L1");
            assert_eq!(status.state, LockerState::Reserved);
            assert_eq!(status.bound_order.as_deref(), Some("order-contender"));
        }
        Err(RegistryError::NoCapacity { .. }) => {
            assert_eq!(status.state, LockerState::Available);
            assert!(status.bound_order.is_none());
        }
        Err(other) => panic!("unexpected error: {}", other),
    }
}
