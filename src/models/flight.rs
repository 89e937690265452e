//! Flight domain model.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flight identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(pub i64);

impl FlightId {
    pub fn new(value: i64) -> Self {
        FlightId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<FlightId> for i64 {
    fn from(id: FlightId) -> Self {
        id.0
    }
}

/// A persisted flight record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: FlightId,
    pub flight_number: String,
    pub operation_airlines: String,
    pub departure_city: String,
    pub arrival_city: String,
    /// Departure date, serialized as `YYYY-MM-DD`.
    pub date_of_departure: NaiveDate,
    /// Estimated departure time of day, serialized as `HH:MM:SS`.
    pub estimated_time_departure: NaiveTime,
}

/// The writable fields of a flight.
///
/// Used both as the create input and as the full-replacement update input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightData {
    pub flight_number: String,
    pub operation_airlines: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub date_of_departure: NaiveDate,
    pub estimated_time_departure: NaiveTime,
}

impl Flight {
    /// Assemble a flight from its assigned id and writable fields.
    pub fn from_data(id: FlightId, data: FlightData) -> Self {
        Self {
            id,
            flight_number: data.flight_number,
            operation_airlines: data.operation_airlines,
            departure_city: data.departure_city,
            arrival_city: data.arrival_city,
            date_of_departure: data.date_of_departure,
            estimated_time_departure: data.estimated_time_departure,
        }
    }

    /// Apply a full-replacement update, keeping the id.
    pub fn apply(&mut self, data: FlightData) {
        self.flight_number = data.flight_number;
        self.operation_airlines = data.operation_airlines;
        self.departure_city = data.departure_city;
        self.arrival_city = data.arrival_city;
        self.date_of_departure = data.date_of_departure;
        self.estimated_time_departure = data.estimated_time_departure;
    }

    /// Whether the flight departs strictly after `now`.
    ///
    /// Non-staff listings only show upcoming flights; a flight departing at
    /// exactly `now` is no longer upcoming.
    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        self.date_of_departure > now.date()
            || (self.date_of_departure == now.date()
                && self.estimated_time_departure > now.time())
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.flight_number, self.departure_city, self.arrival_city
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Flight {
        Flight {
            id: FlightId::new(1),
            flight_number: "456dfg".to_string(),
            operation_airlines: "THY".to_string(),
            departure_city: "Istanbul".to_string(),
            arrival_city: "London".to_string(),
            date_of_departure: NaiveDate::from_ymd_opt(2023, 1, 7).unwrap(),
            estimated_time_departure: NaiveTime::from_hms_opt(9, 16, 47).unwrap(),
        }
    }

    #[test]
    fn display_is_number_departure_arrival() {
        let flight = sample();
        assert_eq!(flight.to_string(), "456dfg - Istanbul - London");
    }

    #[test]
    fn date_and_time_serialize_in_wire_format() {
        let flight = sample();
        let json = serde_json::to_value(&flight).unwrap();
        assert_eq!(json["date_of_departure"], "2023-01-07");
        assert_eq!(json["estimated_time_departure"], "09:16:47");
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn flight_data_deserializes_from_wire_payload() {
        let data: FlightData = serde_json::from_str(
            r#"{
                "flight_number": "456df456",
                "operation_airlines": "THY",
                "departure_city": "Istanbul",
                "arrival_city": "Berlin",
                "date_of_departure": "2023-01-07",
                "estimated_time_departure": "09:16:47"
            }"#,
        )
        .unwrap();
        assert_eq!(data.arrival_city, "Berlin");
        assert_eq!(
            data.date_of_departure,
            NaiveDate::from_ymd_opt(2023, 1, 7).unwrap()
        );
    }

    #[test]
    fn flight_data_rejects_missing_fields() {
        let result = serde_json::from_str::<FlightData>(r#"{"flight_number": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn upcoming_is_strict() {
        let flight = sample();
        let before = NaiveDate::from_ymd_opt(2023, 1, 7)
            .unwrap()
            .and_hms_opt(9, 16, 46)
            .unwrap();
        let at_departure = NaiveDate::from_ymd_opt(2023, 1, 7)
            .unwrap()
            .and_hms_opt(9, 16, 47)
            .unwrap();
        let next_day = NaiveDate::from_ymd_opt(2023, 1, 8)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert!(flight.is_upcoming(before));
        assert!(!flight.is_upcoming(at_departure));
        assert!(!flight.is_upcoming(next_day));
    }

    #[test]
    fn apply_replaces_all_fields_but_id() {
        let mut flight = sample();
        flight.apply(FlightData {
            flight_number: "456df456".to_string(),
            operation_airlines: "THY".to_string(),
            departure_city: "Istanbul".to_string(),
            arrival_city: "Berlin".to_string(),
            date_of_departure: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            estimated_time_departure: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        });
        assert_eq!(flight.id, FlightId::new(1));
        assert_eq!(flight.arrival_city, "Berlin");
    }
}
