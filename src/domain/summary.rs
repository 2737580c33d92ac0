use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::trip::Trip;

/// What one passenger has ridden and owes across the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FriendSummary {
    pub total_distance: f64,
    pub total_cost: f64,
    pub trip_count: u32,
    pub unpaid_cost: f64,
}

pub type PassengerSummary = BTreeMap<String, FriendSummary>;

/// Folds the trip set into per-passenger totals. Each passenger is charged
/// their own share (`cost_per_person`), not the whole trip.
pub fn summarize_passengers<'a, I>(trips: I) -> PassengerSummary
where
    I: IntoIterator<Item = &'a Trip>,
{
    let mut summary = PassengerSummary::new();

    for trip in trips {
        for passenger in &trip.passengers {
            let entry = summary.entry(passenger.clone()).or_default();
            entry.total_distance += trip.distance_km;
            entry.total_cost += trip.cost_per_person;
            entry.trip_count += 1;
            if !trip.paid {
                entry.unpaid_cost += trip.cost_per_person;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trip::{Location, NewTrip, PaymentMethod};

    fn trip(distance_km: f64, rate: f64, passengers: &[&str], paid: bool) -> Trip {
        let mut trip = Trip::priced(
            NewTrip {
                start_location: Location::default(),
                end_location: Location::default(),
                distance_km,
                passengers: passengers.iter().map(|p| p.to_string()).collect(),
                payment_method: PaymentMethod::Cash,
            },
            rate,
        );
        trip.paid = paid;
        trip
    }

    #[test]
    fn test_empty_ledger_has_no_friends() {
        assert!(summarize_passengers(&Vec::<Trip>::new()).is_empty());
    }

    #[test]
    fn test_shares_and_unpaid_balance() {
        // 500 per person, unpaid
        let first = trip(10.0, 100.0, &["Anna", "Bela"], false);
        // 300 for Anna alone, paid
        let second = trip(3.0, 100.0, &["Anna"], true);

        let summary = summarize_passengers(&[first, second]);

        let anna = &summary["Anna"];
        assert_eq!(anna.trip_count, 2);
        assert_eq!(anna.total_distance, 13.0);
        assert_eq!(anna.total_cost, 800.0);
        assert_eq!(anna.unpaid_cost, 500.0);

        let bela = &summary["Bela"];
        assert_eq!(bela.trip_count, 1);
        assert_eq!(bela.total_cost, 500.0);
        assert_eq!(bela.unpaid_cost, 500.0);
    }

    #[test]
    fn test_trip_without_passengers_is_not_attributed() {
        let summary = summarize_passengers(&[trip(5.0, 50.0, &[], false)]);
        assert!(summary.is_empty());
    }

    #[test]
    fn test_duplicate_names_count_as_separate_entries() {
        let summary = summarize_passengers(&[trip(4.0, 100.0, &["Anna", "Anna"], false)]);
        let anna = &summary["Anna"];
        assert_eq!(anna.trip_count, 2);
        assert_eq!(anna.total_cost, 400.0);
    }
}
