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

//! Per-day sales reporting on an origin-destination pair: realized history
//! and price-level-rationed demand forecast.

use crate::objects::{Od, Passenger};
use crate::Result;
use anyhow::bail;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::iter;

/// One point of a sales report: cumulative bookings and revenue at the end
/// of a given day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SalesPoint {
    /// Day offset relative to the departure date.
    pub day_x: i32,
    /// Cumulative number of seats sold at the end of that day.
    pub bookings: u32,
    /// Cumulative revenue at the end of that day.
    pub revenue: Decimal,
}

/// Remaining seat inventory per price level, in strictly ascending price
/// order.
///
/// The ledger is mutable on purpose: [`Od::forecast`] depletes it, and the
/// depletion persists for the rest of the forecast horizon and across calls
/// sharing the same ledger. Callers needing repeatable forecasts must build
/// a fresh ledger per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    levels: Vec<(Decimal, u32)>,
}

impl Inventory {
    /// Builds a ledger from (price level, available seats) pairs.
    ///
    /// Fails unless price levels are strictly ascending.
    pub fn new(levels: Vec<(Decimal, u32)>) -> Result<Self> {
        ensure_ascending(levels.iter().map(|(price, _)| *price), "price level")?;
        Ok(Inventory { levels })
    }

    /// Seats still available at the given price level.
    pub fn remaining(&self, price: Decimal) -> Option<u32> {
        self.levels
            .iter()
            .find(|(level, _)| *level == price)
            .map(|(_, seats)| *seats)
    }

    /// Seats still available over all price levels.
    pub fn total_remaining(&self) -> u32 {
        self.levels.iter().map(|(_, seats)| seats).sum()
    }

    /// Rations one day of demand against the ledger, returning the seats
    /// sold and the revenue made that day.
    ///
    /// Price levels are scanned in ascending order; at each level the
    /// residual demand is the day's cumulative demand at that level minus
    /// what cheaper levels already sold today. Levels with no residual
    /// demand or no seats left are skipped without stopping the scan, since
    /// demand is not assumed monotonic in price.
    fn allocate(&mut self, demand: &DemandCurve) -> (u32, Decimal) {
        let mut sold = 0u32;
        let mut revenue = Decimal::ZERO;
        for (price, seats) in &mut self.levels {
            let want = i64::from(demand.cumulative_at(*price)) - i64::from(sold);
            let fill = want.min(i64::from(*seats));
            if fill <= 0 {
                continue;
            }
            let fill = fill as u32;
            *seats -= fill;
            sold += fill;
            revenue += *price * Decimal::from(fill);
        }
        (sold, revenue)
    }
}

/// Expected cumulative bookings per price level for one day, in the same
/// ascending price order as the inventory.
///
/// Counts are cumulative by tier: the count at a level includes the demand
/// of all cheaper levels. A level present in the inventory but absent from
/// the curve counts as zero demand that day.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandCurve {
    tiers: Vec<(Decimal, u32)>,
}

impl DemandCurve {
    /// Builds a curve from (price level, cumulative expected bookings)
    /// pairs.
    ///
    /// Fails unless price levels are strictly ascending.
    pub fn new(tiers: Vec<(Decimal, u32)>) -> Result<Self> {
        ensure_ascending(tiers.iter().map(|(price, _)| *price), "price level")?;
        Ok(DemandCurve { tiers })
    }

    fn cumulative_at(&self, price: Decimal) -> u32 {
        self.tiers
            .iter()
            .find(|(level, _)| *level == price)
            .map_or(0, |(_, count)| *count)
    }
}

/// Day-by-day expected demand over the forecast horizon, in strictly
/// ascending day-x order, as supplied by an external forecasting model.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandMatrix {
    days: Vec<(i32, DemandCurve)>,
}

impl DemandMatrix {
    /// Builds a demand matrix from (day_x, demand curve) pairs.
    ///
    /// Fails unless days are strictly ascending.
    pub fn new(days: Vec<(i32, DemandCurve)>) -> Result<Self> {
        ensure_ascending(days.iter().map(|(day_x, _)| *day_x), "day_x")?;
        Ok(DemandMatrix { days })
    }

    /// Number of days covered by the forecast horizon.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// `true` when the forecast horizon is empty.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

fn ensure_ascending<T>(values: impl Iterator<Item = T>, what: &str) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    let mut previous: Option<T> = None;
    for value in values {
        if let Some(previous) = &previous {
            if *previous >= value {
                bail!("{} {} is not in strictly ascending order", what, value);
            }
        }
        previous = Some(value);
    }
    Ok(())
}

impl Od {
    /// Returns the history of sales on this od: one point per day with at
    /// least one sale, in ascending day order, carrying the running totals
    /// of seats sold and money made.
    ///
    /// The history is recomputed from the current bookings on each call.
    pub fn history(&self) -> impl Iterator<Item = SalesPoint> + '_ {
        let mut passengers: Vec<&Passenger> = self.passengers.iter().collect();
        passengers.sort_by_key(|passenger| passenger.sale_day_x);
        let mut bookings = 0u32;
        let mut revenue = Decimal::ZERO;
        let mut remaining = passengers.into_iter().peekable();
        iter::from_fn(move || {
            let first = remaining.next()?;
            let day_x = first.sale_day_x;
            bookings += 1;
            revenue += first.price;
            while let Some(passenger) = remaining.next_if(|p| p.sale_day_x == day_x) {
                bookings += 1;
                revenue += passenger.price;
            }
            Some(SalesPoint {
                day_x,
                bookings,
                revenue,
            })
        })
    }

    /// Computes a day-by-day forecast of sales on this od: one point per
    /// day of `demand_matrix`, carrying the running totals of seats sold
    /// and money made, seeded with the bookings already realized.
    ///
    /// Each day's demand is rationed against the inventory ledger (see
    /// [`Inventory`]); seats sold on one day are no longer available on the
    /// following days. Forecasting twice with the same ledger therefore
    /// yields a second forecast on the leftover seats only.
    pub fn forecast<'a>(
        &self,
        inventory: &'a mut Inventory,
        demand_matrix: &'a DemandMatrix,
    ) -> impl Iterator<Item = SalesPoint> + 'a {
        let mut bookings = self.passengers.len() as u32;
        let mut revenue: Decimal = self.passengers.iter().map(|p| p.price).sum();
        demand_matrix.days.iter().map(move |(day_x, demand)| {
            let (sold, money) = inventory.allocate(demand);
            bookings += sold;
            revenue += money;
            SalesPoint {
                day_x: *day_x,
                bookings,
                revenue,
            }
        })
    }
}
