//! Wire types for the departures endpoint.
//!
//! The endpoint answers with one JSON object carrying exactly one of
//! `station`, `message` or `error`. These DTOs mirror that shape loosely
//! (everything optional) and are converted to domain types afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Departure, ResponseEnvelope, Station};

/// Raw response body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EnvelopeDto {
    #[serde(default)]
    pub station: Option<StationDto>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Raw station object.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    pub stop_name: String,
    #[serde(default)]
    pub distance_meters: f64,
    /// `null` and missing both mean "no departures"
    #[serde(default)]
    pub departures: Option<Vec<DepartureDto>>,
}

/// Raw departure object.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureDto {
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
    pub departure_iso: String,
}

/// Error converting a DTO into domain types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid departureIso {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("response has none of station, message or error")]
    EmptyEnvelope,
}

impl DepartureDto {
    fn into_domain(self) -> Result<Departure, ConversionError> {
        let departure_time = DateTime::parse_from_rfc3339(&self.departure_iso)
            .map_err(|e| ConversionError::InvalidTimestamp {
                value: self.departure_iso.clone(),
                reason: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(Departure {
            line: self.line,
            destination: self.destination,
            track: self.track,
            departure_time,
        })
    }
}

impl StationDto {
    fn into_domain(self) -> Result<Station, ConversionError> {
        let departures = self
            .departures
            .unwrap_or_default()
            .into_iter()
            .map(DepartureDto::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Station {
            stop_name: self.stop_name,
            distance_meters: self.distance_meters,
            departures,
        })
    }
}

impl EnvelopeDto {
    /// Convert to the domain envelope.
    ///
    /// A populated `station` wins over `error`, which wins over `message`.
    pub fn into_envelope(self) -> Result<ResponseEnvelope, ConversionError> {
        if let Some(station) = self.station {
            return Ok(ResponseEnvelope::Station(station.into_domain()?));
        }
        if let Some(error) = self.error {
            return Ok(ResponseEnvelope::Error(error));
        }
        if let Some(message) = self.message {
            return Ok(ResponseEnvelope::Message(message));
        }
        Err(ConversionError::EmptyEnvelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ResponseEnvelope, ConversionError> {
        let dto: EnvelopeDto = serde_json::from_str(json).unwrap();
        dto.into_envelope()
    }

    #[test]
    fn station_envelope() {
        let envelope = parse(
            r#"{"station":{"stopName":"Tikkurila","distanceMeters":120,"departures":[
                {"line":"K","destination":"Helsinki","track":"3","departureIso":"2024-03-15T08:02:00Z"},
                {"line":"I","destination":"Lahti","track":"1","departureIso":"2024-03-15T10:10:00+02:00"}
            ]}}"#,
        )
        .unwrap();

        let station = envelope.station().unwrap();
        assert_eq!(station.stop_name, "Tikkurila");
        assert_eq!(station.distance_meters, 120.0);
        assert_eq!(station.departures.len(), 2);
        assert_eq!(station.departures[0].line.as_deref(), Some("K"));
        assert_eq!(
            station.departures[1].departure_time,
            DateTime::parse_from_rfc3339("2024-03-15T08:10:00Z").unwrap()
        );
    }

    #[test]
    fn null_departures_is_empty() {
        let envelope =
            parse(r#"{"station":{"stopName":"Kerava","distanceMeters":5,"departures":null}}"#)
                .unwrap();
        assert!(envelope.station().unwrap().departures.is_empty());

        let envelope = parse(r#"{"station":{"stopName":"Kerava","distanceMeters":5}}"#).unwrap();
        assert!(envelope.station().unwrap().departures.is_empty());
    }

    #[test]
    fn missing_optional_fields() {
        let envelope = parse(
            r#"{"station":{"stopName":"Pasila","distanceMeters":40,"departures":[
                {"departureIso":"2024-03-15T08:02:00Z"}
            ]}}"#,
        )
        .unwrap();
        let dep = &envelope.station().unwrap().departures[0];
        assert!(dep.line.is_none());
        assert!(dep.destination.is_none());
        assert!(dep.track.is_none());
    }

    #[test]
    fn message_and_error_forms() {
        assert_eq!(
            parse(r#"{"message":"No stations within 5 km"}"#).unwrap(),
            ResponseEnvelope::Message("No stations within 5 km".into())
        );
        assert_eq!(
            parse(r#"{"error":"Invalid lat/lon"}"#).unwrap(),
            ResponseEnvelope::Error("Invalid lat/lon".into())
        );
    }

    #[test]
    fn empty_object_is_rejected() {
        assert_eq!(parse("{}"), Err(ConversionError::EmptyEnvelope));
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let result = parse(
            r#"{"station":{"stopName":"Pasila","distanceMeters":40,"departures":[
                {"departureIso":"soon"}
            ]}}"#,
        );
        assert!(matches!(
            result,
            Err(ConversionError::InvalidTimestamp { .. })
        ));
    }
}
