// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! The SID manager subscriber (§4.6): the `SidManager`/`Subscriber` traits
//! the reconciler is wired through, and the restoration-scan tie-break
//! logic (§4.6, testable scenario 6) as an independent pure function.

mod manager;
mod restore;
mod subscriber;

pub mod inmem;

pub use manager::{SidManager, SidManagerError};
pub use restore::{restore, RestorationPlan, RestoredSid};
pub use subscriber::Subscriber;
