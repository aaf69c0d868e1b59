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

//! Definition of the service sales model.

use crate::objects::{Leg, Od, Passenger, Station};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};
use typed_index_collection::{Collection, CollectionWithId, Idx};

/// Error raised when a booking references an origin-destination pair that
/// the service does not sell (reversed direction, or stations not part of
/// the itinerary).
#[derive(Debug, Error)]
#[error("no origin-destination pair '{origin}' -> '{destination}' in service '{service}'")]
pub struct UnknownOdError {
    /// Name of the service the manifest was loaded into.
    pub service: String,
    /// Station identifier of the booking's origin.
    pub origin: String,
    /// Station identifier of the booking's destination.
    pub destination: String,
}

/// A service is a facility transporting passengers between two or more
/// stops at a specific departure date.
///
/// A service is composed of legs (its consecutive stops, in itinerary
/// order) and of origin-destination pairs (ods), one for each possible trip
/// that a passenger can buy. Services are created by
/// [`ServiceBuilder`](crate::model_builder::ServiceBuilder), which
/// materializes all legs and ods from the itinerary in one pass.
#[derive(Debug)]
pub struct Service {
    pub(crate) name: String,
    pub(crate) departure_date: NaiveDate,
    pub(crate) stations: CollectionWithId<Station>,
    pub(crate) legs: Collection<Leg>,
    pub(crate) ods: CollectionWithId<Od>,
    pub(crate) od_index: BTreeMap<(Idx<Station>, Idx<Station>), Idx<Od>>,
}

impl Service {
    /// Name of the service.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Departure date of the service.
    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    /// Stations of the service's itinerary.
    pub fn stations(&self) -> &CollectionWithId<Station> {
        &self.stations
    }

    /// Legs of the service, in itinerary order.
    pub fn legs(&self) -> &Collection<Leg> {
        &self.legs
    }

    /// Origin-destination pairs of the service, in creation order.
    pub fn ods(&self) -> &CollectionWithId<Od> {
        &self.ods
    }

    /// Looks up the od selling trips from `origin` to `destination`.
    pub fn od(&self, origin: Idx<Station>, destination: Idx<Station>) -> Option<Idx<Od>> {
        self.od_index.get(&(origin, destination)).copied()
    }

    /// Position of `date` on the day-x scale: number of days since the
    /// departure date, negative before departure and zero on departure day.
    pub fn day_x_from(&self, date: NaiveDate) -> i64 {
        (date - self.departure_date).num_days()
    }

    /// Today's position on the day-x scale.
    ///
    /// In revenue management systems the day-x scale is often preferred
    /// because it is more convenient to manipulate than dates.
    pub fn day_x(&self) -> i64 {
        self.day_x_from(chrono::Local::now().date_naive())
    }

    /// Reads a passenger manifest (the list of all bookings made for this
    /// service) and allocates each booking to the od selling exactly its
    /// (origin, destination) trip.
    ///
    /// The whole manifest is resolved before anything is appended, so on
    /// [`UnknownOdError`] the service is left unchanged. Each call appends:
    /// loading the same manifest twice duplicates its bookings.
    pub fn load_passenger_manifest(&mut self, passengers: Vec<Passenger>) -> crate::Result<()> {
        let mut routed = Vec::with_capacity(passengers.len());
        for passenger in passengers {
            let od_idx = self
                .od(passenger.origin, passenger.destination)
                .ok_or_else(|| UnknownOdError {
                    service: self.name.clone(),
                    origin: self.stations[passenger.origin].id.clone(),
                    destination: self.stations[passenger.destination].id.clone(),
                })?;
            routed.push((od_idx, passenger));
        }
        debug!(
            "loading {} bookings into service '{}'",
            routed.len(),
            self.name
        );
        for (od_idx, passenger) in routed {
            self.ods.index_mut(od_idx).passengers.push(passenger);
        }
        Ok(())
    }

    /// Legs crossed by a passenger travelling on the given od, in itinerary
    /// order.
    ///
    /// Example: with a service whose itinerary is A-B-C, the od A-C crosses
    /// A-B and B-C. Recomputed from the live legs sequence on each call. An
    /// od whose origin never starts a leg yields an empty span.
    pub fn od_legs(&self, od_idx: Idx<Od>) -> Vec<Idx<Leg>> {
        let od = &self.ods[od_idx];
        let mut span = Vec::new();
        let mut legs = self.legs.iter();
        for (leg_idx, leg) in legs.by_ref() {
            if leg.origin == od.origin {
                span.push(leg_idx);
                break;
            }
        }
        for (leg_idx, leg) in legs {
            if leg.origin == od.destination {
                break;
            }
            span.push(leg_idx);
        }
        if span.is_empty() {
            warn!(
                "od '{}' does not span any leg of service '{}'",
                od.id, self.name
            );
        }
        span
    }

    /// Passengers occupying a seat on the given leg.
    ///
    /// A booking on od A-C occupies a seat on both legs A-B and B-C. Ods
    /// are visited in creation order, their passengers in loading order.
    pub fn leg_passengers(&self, leg_idx: Idx<Leg>) -> Vec<&Passenger> {
        self.ods
            .iter()
            .filter(|(od_idx, _)| self.od_legs(*od_idx).contains(&leg_idx))
            .flat_map(|(_, od)| od.passengers.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_builder::ServiceBuilder;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn departure_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 7, 8).unwrap()
    }

    fn paris_marseille() -> Service {
        ServiceBuilder::new("7601", departure_date())
            .stop("ply", "Paris Gare de Lyon")
            .stop("lpd", "Lyon Part-Dieu")
            .stop("msc", "Marseille Saint-Charles")
            .build()
            .unwrap()
    }

    fn booking(service: &Service, origin: &str, destination: &str, price: Decimal) -> Passenger {
        Passenger {
            origin: service.stations.get_idx(origin).unwrap(),
            destination: service.stations.get_idx(destination).unwrap(),
            sale_day_x: -10,
            price,
        }
    }

    mod itinerary {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn legs_and_ods_counts() {
            let service = paris_marseille();
            assert_eq!(2, service.legs().len());
            assert_eq!(3, service.ods().len());
        }

        #[test]
        fn legs_follow_itinerary_order() {
            let service = paris_marseille();
            let ply = service.stations().get_idx("ply").unwrap();
            let lpd = service.stations().get_idx("lpd").unwrap();
            let msc = service.stations().get_idx("msc").unwrap();
            let legs: Vec<&Leg> = service.legs().values().collect();
            assert_eq!(ply, legs[0].origin);
            assert_eq!(lpd, legs[0].destination);
            assert_eq!(lpd, legs[1].origin);
            assert_eq!(msc, legs[1].destination);
        }

        #[test]
        fn four_stops_yield_six_ods() {
            let service = ServiceBuilder::new("6113", departure_date())
                .stop("ply", "Paris Gare de Lyon")
                .stop("lpd", "Lyon Part-Dieu")
                .stop("avg", "Avignon TGV")
                .stop("msc", "Marseille Saint-Charles")
                .build()
                .unwrap();
            assert_eq!(3, service.legs().len());
            assert_eq!(6, service.ods().len());
        }
    }

    mod od_legs {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn adjacent_od_spans_one_leg() {
            let service = paris_marseille();
            let ply = service.stations().get_idx("ply").unwrap();
            let lpd = service.stations().get_idx("lpd").unwrap();
            let od_idx = service.od(ply, lpd).unwrap();
            let span = service.od_legs(od_idx);
            assert_eq!(1, span.len());
            assert_eq!(ply, service.legs()[span[0]].origin);
        }

        #[test]
        fn full_od_spans_every_leg() {
            let service = paris_marseille();
            let ply = service.stations().get_idx("ply").unwrap();
            let msc = service.stations().get_idx("msc").unwrap();
            let od_idx = service.od(ply, msc).unwrap();
            let span = service.od_legs(od_idx);
            let all: Vec<_> = service.legs().iter().map(|(idx, _)| idx).collect();
            assert_eq!(all, span);
        }

        #[test]
        fn tail_od_runs_to_the_last_leg() {
            let service = paris_marseille();
            let lpd = service.stations().get_idx("lpd").unwrap();
            let msc = service.stations().get_idx("msc").unwrap();
            let od_idx = service.od(lpd, msc).unwrap();
            let span = service.od_legs(od_idx);
            assert_eq!(1, span.len());
            assert_eq!(lpd, service.legs()[span[0]].origin);
        }
    }

    mod manifest {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn bookings_are_routed_to_their_od() {
            let mut service = paris_marseille();
            service
                .load_passenger_manifest(vec![
                    booking(&service, "ply", "lpd", dec!(20)),
                    booking(&service, "ply", "msc", dec!(50)),
                    booking(&service, "ply", "lpd", dec!(30)),
                ])
                .unwrap();
            assert_eq!(2, service.ods().get("ply-lpd").unwrap().passengers.len());
            assert_eq!(1, service.ods().get("ply-msc").unwrap().passengers.len());
            assert_eq!(0, service.ods().get("lpd-msc").unwrap().passengers.len());
        }

        #[test]
        fn reversed_booking_fails_and_leaves_the_service_unchanged() {
            let mut service = paris_marseille();
            let result = service.load_passenger_manifest(vec![
                booking(&service, "ply", "lpd", dec!(20)),
                booking(&service, "msc", "ply", dec!(50)),
            ]);
            let error = result.unwrap_err();
            assert_eq!(
                "no origin-destination pair 'msc' -> 'ply' in service '7601'",
                error.to_string()
            );
            for od in service.ods().values() {
                assert_eq!(0, od.passengers.len());
            }
        }

        #[test]
        fn loading_twice_appends() {
            let mut service = paris_marseille();
            let manifest = vec![booking(&service, "ply", "lpd", dec!(20))];
            service.load_passenger_manifest(manifest.clone()).unwrap();
            service.load_passenger_manifest(manifest).unwrap();
            assert_eq!(2, service.ods().get("ply-lpd").unwrap().passengers.len());
        }
    }

    mod leg_passengers {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn crossing_bookings_are_counted_on_every_leg() {
            let mut service = paris_marseille();
            service
                .load_passenger_manifest(vec![
                    booking(&service, "ply", "lpd", dec!(20)),
                    booking(&service, "ply", "msc", dec!(50)),
                    booking(&service, "lpd", "msc", dec!(35)),
                ])
                .unwrap();
            let legs: Vec<_> = service.legs().iter().map(|(idx, _)| idx).collect();
            assert_eq!(2, service.leg_passengers(legs[0]).len());
            assert_eq!(2, service.leg_passengers(legs[1]).len());
        }

        #[test]
        fn leg_count_matches_the_sum_over_spanning_ods() {
            let mut service = paris_marseille();
            service
                .load_passenger_manifest(vec![
                    booking(&service, "ply", "lpd", dec!(20)),
                    booking(&service, "ply", "lpd", dec!(30)),
                    booking(&service, "ply", "msc", dec!(50)),
                ])
                .unwrap();
            for (leg_idx, _) in service.legs().iter() {
                let expected: usize = service
                    .ods()
                    .iter()
                    .filter(|(od_idx, _)| service.od_legs(*od_idx).contains(&leg_idx))
                    .map(|(_, od)| od.passengers.len())
                    .sum();
                assert_eq!(expected, service.leg_passengers(leg_idx).len());
            }
        }
    }

    mod day_x {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn negative_before_departure() {
            let service = paris_marseille();
            let week_before = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
            assert_eq!(-7, service.day_x_from(week_before));
        }

        #[test]
        fn zero_on_departure_day() {
            let service = paris_marseille();
            assert_eq!(0, service.day_x_from(departure_date()));
        }
    }
}
