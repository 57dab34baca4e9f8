//! Loading network snapshots from the city JSON document.
//!
//! The document format (field names as published by the city):
//!
//! ```json
//! {
//!   "city": "Izmit",
//!   "taxi": { "openingFee": 10.0, "costPerKm": 4.0 },
//!   "duraklar": [
//!     {
//!       "id": "bus_otogar", "name": "Otogar", "type": "bus",
//!       "lat": 40.78259, "lon": 29.94628, "sonDurak": false,
//!       "nextStops": [ { "stopId": "bus_sekapark", "mesafe": 3.5, "sure": 10, "ucret": 3.0 } ],
//!       "transfer": null
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::domain::{Coordinate, NextStopEdge, Stop, StopId, TransferLink, TransitMode};
use crate::fare::TaxiTariff;

use super::NetworkSnapshot;
use super::error::SnapshotError;

#[derive(Debug, Deserialize)]
struct CityDto {
    city: String,
    taxi: TaxiDto,
    #[serde(rename = "duraklar")]
    stops: Vec<StopDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaxiDto {
    opening_fee: f64,
    cost_per_km: f64,
}

#[derive(Debug, Deserialize)]
struct StopDto {
    id: String,
    name: String,
    #[serde(rename = "type")]
    mode: String,
    lat: f64,
    lon: f64,
    #[serde(rename = "sonDurak", default)]
    terminal: bool,
    #[serde(rename = "nextStops", default)]
    next_stops: Vec<NextStopDto>,
    #[serde(default)]
    transfer: Option<TransferDto>,
}

#[derive(Debug, Deserialize)]
struct NextStopDto {
    #[serde(rename = "stopId")]
    stop_id: String,
    #[serde(rename = "mesafe")]
    distance_km: f64,
    #[serde(rename = "sure")]
    time_min: f64,
    #[serde(rename = "ucret")]
    fare: f64,
}

#[derive(Debug, Deserialize)]
struct TransferDto {
    #[serde(rename = "transferStopId")]
    stop_id: String,
    #[serde(rename = "transferSure")]
    time_min: f64,
    #[serde(rename = "transferUcret")]
    fare: f64,
}

/// Read and validate a snapshot file.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<NetworkSnapshot, SnapshotError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&contents)
}

/// Parse and validate a snapshot document.
pub fn parse_snapshot(json: &str) -> Result<NetworkSnapshot, SnapshotError> {
    let dto: CityDto = serde_json::from_str(json)?;

    let taxi = TaxiTariff::new(dto.taxi.opening_fee, dto.taxi.cost_per_km)
        .map_err(|e| SnapshotError::InvalidTariff(e.to_string()))?;

    let stops = dto
        .stops
        .into_iter()
        .map(convert_stop)
        .collect::<Result<Vec<_>, _>>()?;

    NetworkSnapshot::new(dto.city, taxi, stops)
}

fn convert_stop(dto: StopDto) -> Result<Stop, SnapshotError> {
    let invalid = |message: String| SnapshotError::InvalidStop {
        id: dto.id.clone(),
        message,
    };

    let id = StopId::new(dto.id.clone()).map_err(|e| invalid(e.to_string()))?;
    let mode = TransitMode::parse(&dto.mode).map_err(|e| invalid(e.to_string()))?;
    let coord = Coordinate::new(dto.lat, dto.lon).map_err(|e| invalid(e.to_string()))?;

    let next_stops = dto
        .next_stops
        .iter()
        .map(|edge| -> Result<NextStopEdge, SnapshotError> {
            Ok(NextStopEdge {
                target: StopId::new(edge.stop_id.clone()).map_err(|e| invalid(e.to_string()))?,
                distance_km: edge.distance_km,
                time_min: edge.time_min,
                fare: edge.fare,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let transfer = dto
        .transfer
        .as_ref()
        .map(|link| -> Result<TransferLink, SnapshotError> {
            Ok(TransferLink {
                target: StopId::new(link.stop_id.clone()).map_err(|e| invalid(e.to_string()))?,
                transfer_time_min: link.time_min,
                transfer_fare: link.fare,
            })
        })
        .transpose()?;

    Ok(Stop {
        id,
        name: dto.name,
        mode,
        coord,
        terminal: dto.terminal,
        next_stops,
        transfer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "city": "Izmit",
        "taxi": { "openingFee": 10.0, "costPerKm": 4.0 },
        "duraklar": [
            {
                "id": "bus_otogar", "name": "Otogar", "type": "bus",
                "lat": 40.78259, "lon": 29.94628, "sonDurak": false,
                "nextStops": [ { "stopId": "bus_sekapark", "mesafe": 3.5, "sure": 10, "ucret": 3.0 } ],
                "transfer": null
            },
            {
                "id": "bus_sekapark", "name": "Sekapark", "type": "bus",
                "lat": 40.76520, "lon": 29.96190, "sonDurak": true,
                "nextStops": [],
                "transfer": { "transferStopId": "tram_sekapark", "transferSure": 2, "transferUcret": 0.0 }
            },
            {
                "id": "tram_sekapark", "name": "Sekapark (Tram)", "type": "tram",
                "lat": 40.76400, "lon": 29.96300, "sonDurak": false
            }
        ]
    }"#;

    #[test]
    fn parses_sample_document() {
        let snapshot = parse_snapshot(SAMPLE).unwrap();

        assert_eq!(snapshot.city(), "Izmit");
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.taxi_tariff().opening_fee(), 10.0);
        assert_eq!(snapshot.taxi_tariff().cost_per_km(), 4.0);

        let otogar = snapshot.stop(&StopId::new("bus_otogar").unwrap()).unwrap();
        assert_eq!(otogar.mode, TransitMode::Bus);
        assert_eq!(otogar.next_stops.len(), 1);
        assert_eq!(otogar.next_stops[0].target.as_str(), "bus_sekapark");
        assert_eq!(otogar.next_stops[0].time_min, 10.0);
        assert!(otogar.transfer.is_none());

        let sekapark = snapshot.stop(&StopId::new("bus_sekapark").unwrap()).unwrap();
        assert!(sekapark.terminal);
        let link = sekapark.transfer.as_ref().unwrap();
        assert_eq!(link.target.as_str(), "tram_sekapark");
        assert_eq!(link.transfer_time_min, 2.0);

        // Missing optional fields default
        let tram = snapshot.stop(&StopId::new("tram_sekapark").unwrap()).unwrap();
        assert!(tram.next_stops.is_empty());
        assert!(tram.transfer.is_none());
    }

    #[test]
    fn rejects_unknown_mode() {
        let json = SAMPLE.replace(r#""type": "tram""#, r#""type": "ferry""#);
        let err = parse_snapshot(&json).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidStop { ref id, .. } if id == "tram_sekapark"));
    }

    #[test]
    fn rejects_bad_coordinates() {
        let json = SAMPLE.replace("40.78259", "140.78259");
        assert!(matches!(
            parse_snapshot(&json),
            Err(SnapshotError::InvalidStop { .. })
        ));
    }

    #[test]
    fn rejects_negative_tariff() {
        let json = SAMPLE.replace(r#""costPerKm": 4.0"#, r#""costPerKm": -4.0"#);
        assert!(matches!(
            parse_snapshot(&json),
            Err(SnapshotError::InvalidTariff(_))
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_snapshot("{ \"city\": "),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn keeps_dangling_edges() {
        let json = SAMPLE.replace(
            r#""stopId": "bus_sekapark""#,
            r#""stopId": "bus_nowhere""#,
        );
        let snapshot = parse_snapshot(&json).unwrap();
        let otogar = snapshot.stop(&StopId::new("bus_otogar").unwrap()).unwrap();
        assert_eq!(otogar.next_stops[0].target.as_str(), "bus_nowhere");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }

    #[test]
    fn bundled_network_is_valid() {
        let snapshot = parse_snapshot(include_str!("../../data/network.json")).unwrap();
        assert_eq!(snapshot.city(), "Izmit");
        assert_eq!(snapshot.stops_of_mode(TransitMode::Tram).count(), 5);
        for stop in snapshot.stops() {
            for edge in &stop.next_stops {
                assert!(snapshot.stop(&edge.target).is_some(), "{}", edge.target.as_str());
            }
        }
    }
}
