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

//! Notification port: delivering access codes to people.
//!
//! ## Purpose
//! The registry needs to hand the issued code to the customer, but the
//! transport (SMS, push, email) is an external collaborator. This module
//! defines the consumed capability interface plus the doubles used in
//! tests. Delivery failure is non-fatal to allocation by policy: the
//! package is already in (or headed into) the compartment, so reversing
//! the locker state would orphan it.

use async_trait::async_trait;
use plexlocker_lockers::AccessCode;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

/// Errors from the notification transport.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The delivery channel is unreachable
    #[error("Notification channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// The channel rejected this particular delivery
    #[error("Notification rejected for {contact}: {reason}")]
    Rejected {
        /// Contact address the delivery targeted
        contact: String,
        /// Transport-supplied rejection reason
        reason: String,
    },
}

/// Capability interface for delivering an access code to a person.
///
/// Implementations must not assume they are called under any lock; the
/// registry always drops its locks before invoking `deliver`, so a slow
/// or failing transport cannot stall locker traffic.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `code` to `contact` with a human-readable context message.
    async fn deliver(
        &self,
        contact: &str,
        code: &AccessCode,
        message: &str,
    ) -> Result<(), NotifyError>;
}

/// Production placeholder: logs the dispatch via `tracing`.
///
/// The real transport lives outside this core; this implementation
/// records that a delivery was handed off without printing the secret.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn deliver(
        &self,
        contact: &str,
        _code: &AccessCode,
        message: &str,
    ) -> Result<(), NotifyError> {
        info!(contact, message, "access code dispatched");
        Ok(())
    }
}

/// A delivery captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDelivery {
    /// Contact address the code was sent to
    pub contact: String,
    /// The delivered token (tests need the cleartext the customer receives)
    pub code: String,
    /// Context message accompanying the code
    pub message: String,
}

/// Test double that records every delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    deliveries: Arc<Mutex<Vec<RecordedDelivery>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All deliveries recorded so far, in order.
    pub async fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(
        &self,
        contact: &str,
        code: &AccessCode,
        message: &str,
    ) -> Result<(), NotifyError> {
        self.deliveries.lock().await.push(RecordedDelivery {
            contact: contact.to_string(),
            code: code.reveal().to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Test double whose deliveries always fail.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn deliver(
        &self,
        contact: &str,
        _code: &AccessCode,
        _message: &str,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::ChannelUnavailable(format!(
            "no route to {}",
            contact
        )))
    }
}
