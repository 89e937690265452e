use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;

use super::schema::{accounts, auth_tokens, flights, reservations};
use crate::models::{
    Account, AccountId, Flight, FlightData, FlightId, NewAccount, NewReservation, Reservation,
    ReservationId,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = flights)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FlightRow {
    pub id: i64,
    pub flight_number: String,
    pub operation_airlines: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub date_of_departure: NaiveDate,
    pub estimated_time_departure: NaiveTime,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            id: FlightId::new(row.id),
            flight_number: row.flight_number,
            operation_airlines: row.operation_airlines,
            departure_city: row.departure_city,
            arrival_city: row.arrival_city,
            date_of_departure: row.date_of_departure,
            estimated_time_departure: row.estimated_time_departure,
        }
    }
}

/// Insert/update payload for the flights table. All writable columns are
/// replaced together, matching the full-replacement update semantics.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = flights)]
pub struct FlightChangeset<'a> {
    pub flight_number: &'a str,
    pub operation_airlines: &'a str,
    pub departure_city: &'a str,
    pub arrival_city: &'a str,
    pub date_of_departure: NaiveDate,
    pub estimated_time_departure: NaiveTime,
}

impl<'a> From<&'a FlightData> for FlightChangeset<'a> {
    fn from(data: &'a FlightData) -> Self {
        Self {
            flight_number: &data.flight_number,
            operation_airlines: &data.operation_airlines,
            departure_city: &data.departure_city,
            arrival_city: &data.arrival_city,
            date_of_departure: data.date_of_departure,
            estimated_time_departure: data.estimated_time_departure,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReservationRow {
    pub id: i64,
    pub flight_id: i64,
    pub passenger_name: String,
    pub reserved_by: String,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation {
            id: ReservationId::new(row.id),
            flight_id: FlightId::new(row.flight_id),
            passenger_name: row.passenger_name,
            reserved_by: row.reserved_by,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reservations)]
pub struct NewReservationRow<'a> {
    pub flight_id: i64,
    pub passenger_name: &'a str,
    pub reserved_by: &'a str,
}

impl<'a> From<&'a NewReservation> for NewReservationRow<'a> {
    fn from(input: &'a NewReservation) -> Self {
        Self {
            flight_id: input.flight_id.value(),
            passenger_name: &input.passenger_name,
            reserved_by: &input.reserved_by,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccountRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: AccountId::new(row.id),
            username: row.username,
            email: row.email,
            is_staff: row.is_staff,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccountRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub is_staff: bool,
    pub is_active: bool,
}

impl<'a> From<&'a NewAccount> for NewAccountRow<'a> {
    fn from(input: &'a NewAccount) -> Self {
        Self {
            username: &input.username,
            email: &input.email,
            is_staff: input.is_staff,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub struct NewTokenRow<'a> {
    pub token_hash: &'a str,
    pub account_id: i64,
}
