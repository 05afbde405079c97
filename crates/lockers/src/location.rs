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

//! Locker locations: named pools of compartments.
//!
//! ## Purpose
//! A [`LockerLocation`] owns a fixed set of lockers and the search logic
//! over them. "Find an available locker" followed by "reserve it" is a
//! check-then-act sequence, so the location serializes the combined
//! search-and-reserve under a single admission mutex: two couriers racing
//! for the last compartment of a size class cannot both win.
//!
//! ## Design
//! - The admission mutex covers search + reserve only. Per-locker
//!   transitions (`open`, `close`) take just the locker's own mutex, so
//!   traffic against different lockers never contends here.
//! - First-fit with the lowest insertion index wins; multiple lockers of
//!   one size are interchangeable, and the deterministic tie-break keeps
//!   outcomes reproducible.
//! - Size matching is exact. A large package never lands in an oversized
//!   compartment silently.

use crate::code::{AccessCode, AccessCodeIssuer};
use crate::error::LockerResult;
use crate::locker::{Locker, LockerState, SizeClass};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// A named pool of lockers at a physical address.
///
/// Lockers are added during setup and never move between locations.
pub struct LockerLocation {
    id: String,
    address: String,
    lockers: Vec<Arc<Locker>>,
    /// Serializes the combined search-and-reserve sequence.
    admission: Mutex<()>,
}

impl LockerLocation {
    /// Create an empty location.
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            lockers: Vec::new(),
            admission: Mutex::new(()),
        }
    }

    /// Location identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Street address of the location.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Add a locker to the pool (setup-time operation).
    pub fn add_locker(&mut self, locker: Locker) {
        self.lockers.push(Arc::new(locker));
    }

    /// All lockers, in insertion order.
    pub fn lockers(&self) -> &[Arc<Locker>] {
        &self.lockers
    }

    /// Look up a locker by ID.
    pub fn locker(&self, locker_id: &str) -> Option<Arc<Locker>> {
        self.lockers
            .iter()
            .find(|locker| locker.id() == locker_id)
            .cloned()
    }

    /// Find the first available locker of exactly the given size.
    ///
    /// Read-only probe; does not hold the admission mutex, so the answer
    /// may be stale by the time the caller acts on it. Allocation paths
    /// use [`LockerLocation::reserve_first_fit`] instead.
    pub async fn find_available(&self, size: SizeClass) -> Option<Arc<Locker>> {
        for locker in &self.lockers {
            if locker.size() != size {
                continue;
            }
            if locker.status().await.state == LockerState::Available {
                return Some(locker.clone());
            }
        }
        None
    }

    /// Atomically search for and reserve the first available locker of the
    /// given size, issuing an access code for the chosen pairing.
    ///
    /// ## Behavior
    /// The admission mutex is held across the whole scan and the
    /// reservation, closing the check-then-act race between concurrent
    /// allocators. The issuer runs inside the scope (pure computation, no
    /// I/O); notification never happens here.
    ///
    /// ## Returns
    /// - `Ok(Some((locker, code)))`: reserved; the code is bound to this
    ///   order/locker pairing
    /// - `Ok(None)`: no available locker of that size (capacity
    ///   exhaustion, an ordinary outcome)
    /// - `Err(_)`: a state-machine precondition failed, which under this
    ///   serialization indicates a coordination bug and is surfaced as-is
    pub async fn reserve_first_fit(
        &self,
        size: SizeClass,
        order_id: &str,
        issuer: &dyn AccessCodeIssuer,
        expires_at: Option<DateTime<Utc>>,
    ) -> LockerResult<Option<(Arc<Locker>, AccessCode)>> {
        let _guard = self.admission.lock().await;
        for locker in &self.lockers {
            if locker.size() != size {
                continue;
            }
            if locker.status().await.state != LockerState::Available {
                continue;
            }
            let code = issuer.issue(order_id, locker.id());
            locker.reserve(order_id, code.clone(), expires_at).await?;
            debug!(
                location_id = %self.id,
                locker_id = %locker.id(),
                order_id,
                "locker reserved via first-fit"
            );
            return Ok(Some((locker.clone(), code)));
        }
        Ok(None)
    }

    /// Release every `Reserved` locker whose deadline has passed.
    ///
    /// Explicit administrative sweep; there is no background timer. Holds
    /// the admission mutex so a sweep and an allocation never interleave.
    /// Returns the IDs of reclaimed lockers.
    pub async fn reclaim_expired(&self, now: DateTime<Utc>) -> Vec<String> {
        let _guard = self.admission.lock().await;
        let mut reclaimed = Vec::new();
        for locker in &self.lockers {
            if locker.reclaim_if_expired(now).await {
                reclaimed.push(locker.id().to_string());
            }
        }
        reclaimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::FixedCodeIssuer;

    fn three_size_location() -> LockerLocation {
        let mut location = LockerLocation::new("loc-1", "123 Main Street");
        location.add_locker(Locker::new("L1", SizeClass::Small));
        location.add_locker(Locker::new("L2", SizeClass::Medium));
        location.add_locker(Locker::new("L3", SizeClass::Medium));
        location.add_locker(Locker::new("L4", SizeClass::Large));
        location
    }

    #[tokio::test]
    async fn test_find_available_is_first_fit_by_insertion_order() {
        let location = three_size_location();
        let found = location.find_available(SizeClass::Medium).await.unwrap();
        assert_eq!(found.id(), "L2");
    }

    #[tokio::test]
    async fn test_find_available_requires_exact_size() {
        let location = three_size_location();
        // A medium locker is free, but a small package gets only L1.
        let found = location.find_available(SizeClass::Small).await.unwrap();
        assert_eq!(found.id(), "L1");
    }

    #[tokio::test]
    async fn test_reserve_first_fit_skips_reserved_lockers() {
        let location = three_size_location();
        let issuer = FixedCodeIssuer::new("123456");

        let (first, _) = location
            .reserve_first_fit(SizeClass::Medium, "order-1", &issuer, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.id(), "L2");

        let (second, _) = location
            .reserve_first_fit(SizeClass::Medium, "order-2", &issuer, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.id(), "L3");

        // Both mediums taken: capacity exhausted.
        let third = location
            .reserve_first_fit(SizeClass::Medium, "order-3", &issuer, None)
            .await
            .unwrap();
        assert!(third.is_none());
    }

    #[tokio::test]
    async fn test_no_implicit_upsizing() {
        let mut location = LockerLocation::new("loc-1", "123 Main Street");
        location.add_locker(Locker::new("L1", SizeClass::Large));
        let issuer = FixedCodeIssuer::new("123456");

        // A free LARGE locker does not satisfy a MEDIUM request.
        let result = location
            .reserve_first_fit(SizeClass::Medium, "order-1", &issuer, None)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_locker_lookup() {
        let location = three_size_location();
        assert_eq!(location.locker("L3").unwrap().id(), "L3");
        assert!(location.locker("missing").is_none());
    }

    #[tokio::test]
    async fn test_reclaim_expired_releases_only_overdue_reservations() {
        let location = three_size_location();
        let issuer = FixedCodeIssuer::new("123456");
        let now = Utc::now();
        let past = now - chrono::Duration::seconds(60);
        let future = now + chrono::Duration::seconds(60);

        location
            .reserve_first_fit(SizeClass::Medium, "order-1", &issuer, Some(past))
            .await
            .unwrap()
            .unwrap();
        location
            .reserve_first_fit(SizeClass::Medium, "order-2", &issuer, Some(future))
            .await
            .unwrap()
            .unwrap();

        let reclaimed = location.reclaim_expired(now).await;
        assert_eq!(reclaimed, vec!["L2".to_string()]);

        // L2 is allocatable again; L3 still holds its reservation.
        let (locker, _) = location
            .reserve_first_fit(SizeClass::Medium, "order-3", &issuer, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(locker.id(), "L2");
        assert_eq!(
            location.locker("L3").unwrap().status().await.bound_order.as_deref(),
            Some("order-2")
        );
    }
}
