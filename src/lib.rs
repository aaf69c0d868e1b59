// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! The `sales_model` crate proposes a model to manage bookings and sales
//! data of transit services (trains, flights or buses with their
//! itineraries and stops).
//!
//! A [`Service`] is built from an itinerary and sells one
//! origin-destination pair ([`objects::Od`]) for each trip a passenger can
//! buy. Once the passenger manifest is loaded, each od can report its sales
//! [`history`](objects::Od::history) and a day-by-day
//! [`forecast`](objects::Od::forecast) of bookings and revenue, given a
//! price-level inventory and an expected demand matrix.

#![deny(missing_docs)]

pub mod model;
pub mod model_builder;
pub mod objects;
pub mod report;

/// The error type used by the crate.
pub type Error = anyhow::Error;

/// The corresponding result type used by the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use crate::model::Service;
pub use crate::model_builder::ServiceBuilder;
