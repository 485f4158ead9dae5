//! Station description document.

use road_common::{GeographicLocation, RoadLayer, SensorDepth, StationType, VisibleHorizon};
use tracing::debug;

use crate::error::{ProtocolError, ProtocolResult};
use crate::header::DocumentHeader;
use crate::xml::{self, push_element, XML_DECLARATION};

const FILETYPE: &str = "rwis-configuration";

/// Static description of a road station: where it is, what the road body is
/// made of and, optionally, what the surrounding terrain hides of the sky.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDocument {
    header: DocumentHeader,
    location: GeographicLocation,
    station_type: StationType,
    sensor_depth: Option<SensorDepth>,
    layers: Vec<RoadLayer>,
    horizon: Option<VisibleHorizon>,
}

impl StationDocument {
    /// The header must name the station, and the layer list must be
    /// non-empty with positive finite thicknesses.
    pub fn new(
        header: DocumentHeader,
        location: GeographicLocation,
        station_type: StationType,
        layers: Vec<RoadLayer>,
    ) -> ProtocolResult<Self> {
        if header.station_id().map_or(true, str::is_empty) {
            return Err(ProtocolError::InvalidStation(
                "header carries no station id".to_string(),
            ));
        }
        if layers.is_empty() {
            return Err(ProtocolError::InvalidStation(
                "road layer list is empty".to_string(),
            ));
        }
        if let Some((position, layer)) = layers.iter().enumerate().find(|(_, l)| !l.is_valid()) {
            return Err(ProtocolError::InvalidStation(format!(
                "road layer {} ({}) has thickness {} m",
                position + 1,
                layer.material.label(),
                layer.thickness_m
            )));
        }

        Ok(Self {
            header,
            location,
            station_type,
            sensor_depth: None,
            layers,
            horizon: None,
        })
    }

    pub fn with_sensor_depth(mut self, depth: SensorDepth) -> Self {
        self.sensor_depth = Some(depth);
        self
    }

    pub fn with_horizon(mut self, horizon: Option<VisibleHorizon>) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }

    pub fn location(&self) -> &GeographicLocation {
        &self.location
    }

    pub fn station_type(&self) -> StationType {
        self.station_type
    }

    pub fn layers(&self) -> &[RoadLayer] {
        &self.layers
    }

    pub fn horizon(&self) -> Option<&VisibleHorizon> {
        self.horizon.as_ref()
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from(XML_DECLARATION);
        xml::open(&mut out, 0, "station");

        xml::open(&mut out, 1, "header");
        self.header.write_fields(&mut out, 2, FILETYPE);
        push_element(&mut out, 2, "time-zone", "UTC");
        xml::open(&mut out, 2, "coordinate");
        push_element(&mut out, 3, "latitude", &format!("{:.6}", self.location.latitude()));
        push_element(&mut out, 3, "longitude", &format!("{:.6}", self.location.longitude()));
        if let Some(elevation) = self.location.elevation() {
            push_element(&mut out, 3, "elevation", &format!("{:.1}", elevation));
        }
        xml::close(&mut out, 2, "coordinate");
        push_element(&mut out, 2, "station-type", self.station_type.label());
        if let Some(depth) = self.sensor_depth {
            // the model reads the depth in meters
            push_element(
                &mut out,
                2,
                "sst-sensor-depth",
                &format!("{:.2}", f64::from(depth.centimeters()) / 100.0),
            );
        }
        xml::close(&mut out, 1, "header");

        xml::open(&mut out, 1, "roadlayer-list");
        for (position, layer) in self.layers.iter().enumerate() {
            xml::open(&mut out, 2, "roadlayer");
            push_element(&mut out, 3, "position", &(position + 1).to_string());
            push_element(&mut out, 3, "type", layer.material.label());
            push_element(&mut out, 3, "thickness", &format!("{:.3}", layer.thickness_m));
            xml::close(&mut out, 2, "roadlayer");
        }
        xml::close(&mut out, 1, "roadlayer-list");

        if let Some(ref horizon) = self.horizon {
            debug!(directions = horizon.directions().len(), step = horizon.step(), "Writing visible horizon");
            xml::open(&mut out, 1, "visible-horizon");
            for direction in horizon.directions() {
                xml::open(&mut out, 2, "projection");
                push_element(&mut out, 3, "azimuth", &format!("{}", direction.azimuth()));
                push_element(&mut out, 3, "elevation", &format!("{}", direction.elevation()));
                xml::close(&mut out, 2, "projection");
            }
            xml::close(&mut out, 1, "visible-horizon");
        }

        xml::close(&mut out, 0, "station");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_tree;
    use chrono::{TimeZone, Utc};
    use road_common::RoadMaterial;

    fn header() -> DocumentHeader {
        DocumentHeader::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()).with_station("vt4")
    }

    fn location() -> GeographicLocation {
        GeographicLocation::new(60.192059, 24.945831)
            .unwrap()
            .with_elevation(22.0)
    }

    fn layers() -> Vec<RoadLayer> {
        vec![
            RoadLayer::new(RoadMaterial::Asphalt, 0.05),
            RoadLayer::new(RoadMaterial::Crushed, 0.3),
        ]
    }

    #[test]
    fn test_requires_station_id() {
        let anonymous = DocumentHeader::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        assert!(matches!(
            StationDocument::new(anonymous, location(), StationType::Road, layers()),
            Err(ProtocolError::InvalidStation(_))
        ));
    }

    #[test]
    fn test_rejects_layers() {
        assert!(StationDocument::new(header(), location(), StationType::Road, Vec::new()).is_err());
        let bad = vec![RoadLayer::new(RoadMaterial::Sand, 0.0)];
        assert!(StationDocument::new(header(), location(), StationType::Road, bad).is_err());
    }

    #[test]
    fn test_document_structure() {
        let horizon = VisibleHorizon::from_pairs(&[(0.0, 2.0), (180.0, 4.0)]).unwrap();
        let xml = StationDocument::new(header(), location(), StationType::Bridge, layers())
            .unwrap()
            .with_sensor_depth(SensorDepth::Cm40)
            .with_horizon(horizon)
            .to_xml();

        let root = parse_tree(&xml).unwrap();
        let head = root.required_child("header").unwrap();
        assert_eq!(head.required_child("station-type").unwrap().text(), "bridge");
        assert_eq!(head.required_child("sst-sensor-depth").unwrap().text(), "0.40");
        let coordinate = head.required_child("coordinate").unwrap();
        assert_eq!(coordinate.required_child("latitude").unwrap().text(), "60.192059");

        let list = root.required_child("roadlayer-list").unwrap();
        assert_eq!(list.children.len(), 2);
        assert_eq!(list.children[1].required_child("type").unwrap().text(), "crushed rock");
        assert_eq!(list.children[1].required_child("position").unwrap().text(), "2");

        let horizon = root.required_child("visible-horizon").unwrap();
        assert_eq!(horizon.children.len(), 2);
    }

    #[test]
    fn test_horizon_omitted_when_absent() {
        let xml = StationDocument::new(header(), location(), StationType::Road, layers())
            .unwrap()
            .to_xml();
        assert!(!xml.contains("visible-horizon"));
    }
}
