/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! CRUSH topology and cluster health model for the management API.
//!
//! The pieces, bottom-up:
//!
//! - [`snapshot`]: typed payloads, decoded and validated at the HTTP
//!   boundary.
//! - [`topology`]: rebuilds the CRUSH hierarchy from the flat node
//!   listing into one display tree per root.
//! - [`metadata`]: id index for the detail pane and the user's
//!   selection.
//! - [`notify`]: ordered set of active top-bar notifications.
//! - [`summary`]: navigation bar color from the cluster summary.
//! - [`poll`]: periodic fetches whose results are applied freshest-wins.
//! - [`client`]: the REST client that produces snapshots.
//! - [`hostspec`]: host descriptions.
//! - [`config`]: command-line configuration.

pub mod client;
pub mod config;
pub mod hostspec;
pub mod metadata;
pub mod notify;
pub mod poll;
pub mod snapshot;
pub mod summary;
pub mod topology;

pub use client::FetchError;
pub use client::HealthClient;
pub use metadata::MetadataIndex;
pub use metadata::Selection;
pub use metadata::SelectionState;
pub use notify::NotificationSet;
pub use poll::FetchState;
pub use poll::Poller;
pub use snapshot::RawNode;
pub use topology::DisplayNode;
pub use topology::Forest;
pub use topology::TopologyError;
pub use topology::build_forest;
