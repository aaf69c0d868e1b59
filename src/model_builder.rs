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

//! Provides an easy way to create a [`Service`].
//!
//! ```
//! # use sales_model::ServiceBuilder;
//! # use chrono::NaiveDate;
//! let service = ServiceBuilder::new("7601", NaiveDate::from_ymd_opt(2019, 7, 8).unwrap())
//!     .stop("ply", "Paris Gare de Lyon")
//!     .stop("lpd", "Lyon Part-Dieu")
//!     .stop("msc", "Marseille Saint-Charles")
//!     .build()
//!     .unwrap();
//! assert_eq!(2, service.legs().len());
//! assert_eq!(3, service.ods().len());
//! ```

use crate::model::Service;
use crate::objects::{Leg, Od, Station};
use crate::Result;
use anyhow::anyhow;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;
use typed_index_collection::{Collection, CollectionWithId};

/// Builder of [`Service`].
///
/// Stops are appended in itinerary order; [`build`](ServiceBuilder::build)
/// consumes the builder and materializes every leg (one per consecutive
/// pair of stops) and every od (one per forward pair of stops). Consuming
/// the builder is what guarantees the itinerary of a service is loaded
/// exactly once.
pub struct ServiceBuilder {
    name: String,
    departure_date: NaiveDate,
    stops: Vec<(String, String)>,
}

impl ServiceBuilder {
    /// Starts a service with the given name and departure date, and no
    /// stop.
    pub fn new(name: &str, departure_date: NaiveDate) -> Self {
        ServiceBuilder {
            name: name.to_owned(),
            departure_date,
            stops: Vec::new(),
        }
    }

    /// Appends a stop to the itinerary.
    pub fn stop(mut self, id: &str, name: &str) -> Self {
        self.stops.push((id.to_owned(), name.to_owned()));
        self
    }

    /// Builds the service, creating its stations, legs and ods.
    ///
    /// Fails if a stop identifier repeats within the itinerary. An
    /// itinerary with fewer than 2 stops yields a service with zero legs
    /// and zero ods.
    pub fn build(mut self) -> Result<Service> {
        let mut stations = CollectionWithId::default();
        let mut itinerary = Vec::with_capacity(self.stops.len());
        for (id, name) in std::mem::take(&mut self.stops) {
            let idx = stations
                .push(Station {
                    id: id.clone(),
                    name,
                })
                .map_err(|_| {
                    anyhow!(
                        "service '{}': stop '{}' appears twice in the itinerary",
                        self.name,
                        id
                    )
                })?;
            itinerary.push(idx);
        }

        let mut legs = Collection::default();
        let mut ods = CollectionWithId::default();
        let mut od_index = BTreeMap::new();
        for (i, &destination) in itinerary.iter().enumerate() {
            if i == 0 {
                continue;
            }
            for &origin in &itinerary[..i] {
                let od = Od {
                    id: format!("{}-{}", stations[origin].id, stations[destination].id),
                    origin,
                    destination,
                    passengers: Vec::new(),
                };
                let od_idx = ods.push(od).map_err(|e| anyhow!("{}", e))?;
                od_index.insert((origin, destination), od_idx);
            }
            legs.push(Leg {
                origin: itinerary[i - 1],
                destination,
            });
        }
        debug!(
            "service '{}': created {} legs and {} ods from {} stops",
            self.name,
            legs.len(),
            ods.len(),
            stations.len()
        );

        Ok(Service {
            name: self.name,
            departure_date: self.departure_date,
            stations,
            legs,
            ods,
            od_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn departure_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 7, 8).unwrap()
    }

    #[test]
    fn simple_service_creation() {
        let service = ServiceBuilder::new("7601", departure_date())
            .stop("ply", "Paris Gare de Lyon")
            .stop("msc", "Marseille Saint-Charles")
            .build()
            .unwrap();
        assert_eq!("7601", service.name());
        assert_eq!(departure_date(), service.departure_date());
        assert_eq!(1, service.legs().len());
        assert_eq!(1, service.ods().len());
        assert_eq!("ply-msc", service.ods().values().next().unwrap().id);
    }

    #[test]
    fn single_stop_yields_a_degenerate_service() {
        let service = ServiceBuilder::new("7601", departure_date())
            .stop("ply", "Paris Gare de Lyon")
            .build()
            .unwrap();
        assert_eq!(0, service.legs().len());
        assert_eq!(0, service.ods().len());
    }

    #[test]
    fn repeated_stop_is_rejected() {
        let error = ServiceBuilder::new("7601", departure_date())
            .stop("ply", "Paris Gare de Lyon")
            .stop("lpd", "Lyon Part-Dieu")
            .stop("ply", "Paris Gare de Lyon")
            .build()
            .unwrap_err();
        assert_eq!(
            "service '7601': stop 'ply' appears twice in the itinerary",
            error.to_string()
        );
    }

    #[test]
    fn ods_are_created_in_forward_order() {
        let service = ServiceBuilder::new("7601", departure_date())
            .stop("ply", "Paris Gare de Lyon")
            .stop("lpd", "Lyon Part-Dieu")
            .stop("msc", "Marseille Saint-Charles")
            .build()
            .unwrap();
        let ids: Vec<&str> = service.ods().values().map(|od| od.id.as_str()).collect();
        assert_eq!(vec!["ply-lpd", "ply-msc", "lpd-msc"], ids);
    }
}
