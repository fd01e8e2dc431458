use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bus::{bus_type_for, Bus, Route, Seat, SeatKind};
use crate::layout::{LayoutError, SeatLayout, SeatRecord};

#[derive(Debug, Deserialize)]
struct ObjectId {
    #[serde(rename = "$oid")]
    oid: String,
}

/// Bus entry as exported from the operator database
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BusRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    bus_name: String,
    bus_number: String,
    #[serde(default)]
    image: String,
    from: String,
    to: String,
    departure_time: String,
    arrival_time: String,
    price: i32,
    seats: Vec<SeatRecord>,
}

impl BusRecord {
    fn into_bus(self) -> Result<Bus, LayoutError> {
        let bus_type = bus_type_for(&self.bus_name);
        let kind = SeatKind::for_bus_type(bus_type);
        let seats = SeatLayout::from_records(&self.seats)?
            .into_iter()
            .map(|seat| Seat { kind, ..seat })
            .collect();
        Ok(Bus {
            id: self.id.oid,
            bus_type: bus_type.to_string(),
            name: self.bus_name,
            bus_number: self.bus_number,
            image: format!("/{}", self.image.replace("images/", "")),
            route: Route {
                from: capitalize(&self.from),
                to: capitalize(&self.to),
            },
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            price: self.price,
            seats,
        })
    }
}

fn capitalize(city: &str) -> String {
    let mut chars = city.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Search result row: the bus plus what a listing shows about it
#[derive(Debug, Clone, Serialize)]
pub struct BusSummary {
    pub bus: Bus,
    pub available_seats: usize,
    pub sold_out: bool,
}

impl From<Bus> for BusSummary {
    fn from(bus: Bus) -> Self {
        let available_seats = bus.available_seats();
        Self {
            sold_out: available_seats == 0,
            available_seats,
            bus,
        }
    }
}

/// Read-only bus inventory. Callers always receive clones, never references into the catalog.
pub struct BusCatalog {
    buses: Vec<Bus>,
}

impl BusCatalog {
    /// Build a catalog from already-constructed buses, checking every seat grid
    pub fn new(buses: Vec<Bus>) -> Result<Self, CatalogError> {
        for bus in &buses {
            SeatLayout::validate(&bus.seats).map_err(|source| CatalogError::Layout {
                bus_id: bus.id.clone(),
                source,
            })?;
        }
        Ok(Self { buses })
    }

    /// Parse the seed export format
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<BusRecord> = serde_json::from_str(json)?;
        let mut buses = Vec::with_capacity(records.len());

        for record in records {
            let bus_id = record.id.oid.clone();
            let bus = record
                .into_bus()
                .map_err(|source| CatalogError::Layout { bus_id, source })?;
            buses.push(bus);
        }

        Ok(Self { buses })
    }

    /// Load the seed export from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        info!("Loaded {} buses from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    /// Distinct routes in seed order
    pub fn routes(&self) -> Vec<Route> {
        let mut seen = HashSet::new();
        self.buses
            .iter()
            .filter(|bus| seen.insert(&bus.route))
            .map(|bus| bus.route.clone())
            .collect()
    }

    /// Every city that appears as an origin or destination, sorted
    pub fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self
            .buses
            .iter()
            .flat_map(|bus| [bus.route.from.clone(), bus.route.to.clone()])
            .collect();
        cities.sort();
        cities.dedup();
        cities
    }

    pub fn buses_for_route(&self, from: &str, to: &str) -> Vec<Bus> {
        self.buses
            .iter()
            .filter(|bus| bus.route.matches(from, to))
            .cloned()
            .collect()
    }

    pub fn search(&self, from: &str, to: &str) -> Vec<BusSummary> {
        self.buses_for_route(from, to)
            .into_iter()
            .map(BusSummary::from)
            .collect()
    }

    pub fn bus(&self, id: &str) -> Result<Bus, CatalogError> {
        self.buses
            .iter()
            .find(|bus| bus.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::BusNotFound(id.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Bus not found: {0}")]
    BusNotFound(String),

    #[error("Invalid seat layout for bus {bus_id}: {source}")]
    Layout {
        bus_id: String,
        #[source]
        source: LayoutError,
    },

    #[error("Failed to read seed data {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed seed data: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"[
        {
            "_id": {"$oid": "bus-1"},
            "busName": "SETC Express",
            "busNumber": "TN01AB1234",
            "image": "images/setc.jpg",
            "from": "chennai",
            "to": "madurai",
            "departureTime": "21:00",
            "arrivalTime": "05:30",
            "price": 650,
            "seats": [
                {"seatNumber": "A1", "isBooked": true, "gender": "female"},
                {"seatNumber": "A2", "isBooked": false},
                {"seatNumber": "A3", "isBooked": false},
                {"seatNumber": "A4", "isBooked": false}
            ]
        },
        {
            "_id": {"$oid": "bus-2"},
            "busName": "KPN Travels",
            "busNumber": "TN02CD5678",
            "image": "images/kpn.jpg",
            "from": "chennai",
            "to": "madurai",
            "departureTime": "22:15",
            "arrivalTime": "06:00",
            "price": 720,
            "seats": [
                {"seatNumber": "1", "isBooked": true, "gender": "male"}
            ]
        },
        {
            "_id": {"$oid": "bus-3"},
            "busName": "Parveen",
            "busNumber": "TN03EF9012",
            "image": "images/parveen.jpg",
            "from": "madurai",
            "to": "coimbatore",
            "departureTime": "08:00",
            "arrivalTime": "12:30",
            "price": 400,
            "seats": []
        }
    ]"#;

    #[test]
    fn test_seed_conversion() {
        let catalog = BusCatalog::from_json_str(SEED).unwrap();
        assert_eq!(catalog.len(), 3);

        let bus = catalog.bus("bus-1").unwrap();
        assert_eq!(bus.route.from, "Chennai");
        assert_eq!(bus.image, "/setc.jpg");
        assert_eq!(bus.bus_type, "AC Sleeper");
        assert_eq!(bus.available_seats(), 3);
        assert!(bus.seats.iter().all(|s| s.kind == SeatKind::Sleeper));
    }

    #[test]
    fn test_routes_and_cities() {
        let catalog = BusCatalog::from_json_str(SEED).unwrap();
        assert_eq!(catalog.routes().len(), 2);
        assert_eq!(catalog.cities(), vec!["Chennai", "Coimbatore", "Madurai"]);
    }

    #[test]
    fn test_search_route() {
        let catalog = BusCatalog::from_json_str(SEED).unwrap();

        let results = catalog.search("CHENNAI", "madurai");
        assert_eq!(results.len(), 2);
        assert!(!results[0].sold_out);
        assert!(results[1].sold_out);

        assert!(catalog.search("madurai", "chennai").is_empty());
    }

    #[test]
    fn test_unknown_bus() {
        let catalog = BusCatalog::from_json_str(SEED).unwrap();
        assert!(matches!(catalog.bus("nope"), Err(CatalogError::BusNotFound(_))));
    }

    #[test]
    fn test_bad_layout_names_the_bus() {
        let json = r#"[{
            "_id": {"$oid": "broken"},
            "busName": "X", "busNumber": "Y", "from": "a", "to": "b",
            "departureTime": "1", "arrivalTime": "2", "price": 1,
            "seats": [{"seatNumber": "1"}, {"seatNumber": "1"}]
        }]"#;
        match BusCatalog::from_json_str(json) {
            Err(CatalogError::Layout { bus_id, source }) => {
                assert_eq!(bus_id, "broken");
                assert_eq!(source, LayoutError::DuplicateNumber("1".into()));
            }
            other => panic!("unexpected result: {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_shipped_seed_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/buses.json");
        let catalog = BusCatalog::load(path).unwrap();

        assert!(!catalog.is_empty());
        assert!(catalog.cities().contains(&"Chennai".to_string()));
        assert!(!catalog.buses_for_route("chennai", "madurai").is_empty());

        let buses = catalog
            .routes()
            .into_iter()
            .flat_map(|route| catalog.buses_for_route(&route.from, &route.to));
        for bus in buses {
            let expected = if bus.name.contains("SETC") { SeatKind::Sleeper } else { SeatKind::Normal };
            assert!(bus.seats.iter().all(|s| s.kind == expected), "{}", bus.name);
        }
    }
}
