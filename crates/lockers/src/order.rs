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

//! Supporting entities: persons, packages, and orders.
//!
//! ## Purpose
//! An [`Order`] is the unit of work handed to the registry: it names the
//! customer and the package, and once allocated it carries the locker
//! binding and the issued access code. The binding fields are private; they form one
//! half of the Order↔Locker relation and are mutated exclusively by
//! registry operations so the bidirectional-consistency invariant cannot
//! be broken from outside.

use crate::code::AccessCode;
use crate::locker::SizeClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a person plays in the locker workflow.
///
/// Customers and couriers differ only by role here; neither carries extra
/// behavior in this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonRole {
    /// Receives (or returns) packages
    Customer,
    /// Deposits packages on behalf of the carrier
    Courier,
}

/// A person with a notification contact address. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    name: String,
    contact: String,
    role: PersonRole,
}

impl Person {
    /// Create a customer.
    pub fn customer(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            role: PersonRole::Customer,
        }
    }

    /// Create a courier.
    pub fn courier(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            role: PersonRole::Courier,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact address notifications are delivered to.
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Role in the workflow.
    pub fn role(&self) -> PersonRole {
        self.role
    }
}

/// A package of a fixed size class. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    id: String,
    size: SizeClass,
}

impl Package {
    /// Create a package.
    pub fn new(id: impl Into<String>, size: SizeClass) -> Self {
        Self {
            id: id.into(),
            size,
        }
    }

    /// Package identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Size class; a locker of exactly this class is required.
    pub fn size(&self) -> SizeClass {
        self.size
    }
}

/// Weak reference to a locker: identifiers only, no ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerRef {
    /// Location that owns the locker
    pub location_id: String,
    /// Locker within that location
    pub locker_id: String,
}

/// A delivery or return order.
///
/// Created by the caller before allocation. The registry binds a locker
/// and stores the issued code on it; callers read the binding but never
/// write it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: String,
    customer: Person,
    package: Package,
    binding: Option<LockerRef>,
    #[serde(skip)]
    access_code: Option<AccessCode>,
    expires_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create an unallocated order.
    pub fn new(id: impl Into<String>, customer: Person, package: Package) -> Self {
        Self {
            id: id.into(),
            customer,
            package,
            binding: None,
            access_code: None,
            expires_at: None,
        }
    }

    /// Order identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Customer the order belongs to.
    pub fn customer(&self) -> &Person {
        &self.customer
    }

    /// Package being delivered or returned.
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Current locker binding, if any.
    pub fn binding(&self) -> Option<&LockerRef> {
        self.binding.as_ref()
    }

    /// Access code issued for the current binding, if any.
    pub fn access_code(&self) -> Option<&AccessCode> {
        self.access_code.as_ref()
    }

    /// Pickup deadline for the current binding, if one was set.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// True when the order holds a binding whose deadline has not passed.
    ///
    /// A binding past its deadline is treated as no binding at all; there
    /// is no active timeout machinery, only this call-time check.
    pub fn has_active_binding(&self, now: DateTime<Utc>) -> bool {
        self.binding.is_some()
            && self.expires_at.map(|deadline| deadline >= now).unwrap_or(true)
    }

    /// Record a locker binding and its issued code.
    ///
    /// Registry-maintained relation: called only by allocation operations,
    /// immediately after the locker side of the binding is set.
    pub fn bind(
        &mut self,
        locker: LockerRef,
        code: AccessCode,
        expires_at: Option<DateTime<Utc>>,
    ) {
        self.binding = Some(locker);
        self.access_code = Some(code);
        self.expires_at = expires_at;
    }

    /// Clear the locker binding and its code.
    ///
    /// Registry-maintained relation: called only by pickup/close
    /// operations, immediately after the locker is released.
    pub fn clear_binding(&mut self) {
        self.binding = None;
        self.access_code = None;
        self.expires_at = None;
    }
}
