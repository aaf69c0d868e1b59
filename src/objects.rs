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

//! The different objects contained in the sales model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use typed_index_collection::{Id, Idx};

/// A station is where a service can stop to let passengers board or
/// disembark.
///
/// Within a service, station identity is the typed index (`Idx<Station>`):
/// two stations are the same station if and only if they share the same
/// index. The name is for display only.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Station {
    /// Unique identifier of the station within a service.
    pub id: String,
    /// Display name of the station.
    pub name: String,
}

impl Id<Station> for Station {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// A leg is a set of two consecutive stops of a service's itinerary.
///
/// Example: a service whose itinerary is A-B-C has two legs: A-B and B-C.
/// Legs are kept in itinerary order; that order defines which legs an
/// origin-destination pair crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    /// Boarding station.
    pub origin: Idx<Station>,
    /// Alighting station.
    pub destination: Idx<Station>,
}

/// An Origin-Destination (od) represents the transportation facility
/// between two stops of a service's itinerary, bought by a passenger.
///
/// Example: a service whose itinerary is A-B-C sells up to three ods:
/// A-B, B-C and A-C.
#[derive(Debug, Clone)]
pub struct Od {
    /// Unique identifier of the od, derived from its station identifiers.
    pub id: String,
    /// Station where the trip starts.
    pub origin: Idx<Station>,
    /// Station where the trip ends.
    pub destination: Idx<Station>,
    /// Bookings made for this exact origin-destination, in loading order.
    pub passengers: Vec<Passenger>,
}

impl Id<Od> for Od {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// A passenger that has a booking on a seat for a particular
/// origin-destination.
///
/// Station indices must come from the service the booking belongs to.
/// Immutable once loaded into a service.
#[derive(Debug, Clone, PartialEq)]
pub struct Passenger {
    /// Station where the passenger boards.
    pub origin: Idx<Station>,
    /// Station where the passenger disembarks.
    pub destination: Idx<Station>,
    /// Day offset relative to the departure date at which the booking was
    /// made (negative before departure).
    pub sale_day_x: i32,
    /// Amount paid for the booking.
    pub price: Decimal,
}
