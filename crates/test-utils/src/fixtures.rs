//! Common test fixtures for road-weather tests.
//!
//! Pre-defined inputs that represent the usual shapes of station
//! configuration, grid metadata and model output.

/// Station coordinates used across tests.
pub mod station {
    /// A road station in southern Finland.
    pub const LATITUDE: f64 = 60.192059;
    pub const LONGITUDE: f64 = 24.945831;
    pub const ELEVATION: f64 = 22.0;

    /// A bridge station further north.
    pub const BRIDGE_LATITUDE: f64 = 65.012093;
    pub const BRIDGE_LONGITUDE: f64 = 25.465076;

    pub const STATION_ID: &str = "vt4-ruskeasuo";
}

/// Time-axis unit strings as found in forecast grids.
pub mod units {
    pub const HOURS_2020: &str = "Hour since 2020-01-01T00:00Z";
    pub const MINUTES_2020: &str = "Minute since 2020-01-01T00:00Z";
    pub const SECONDS_2020: &str = "Second since 2020-01-01T00:00Z";
    pub const HOURS_SECONDS_PRECISION: &str = "hours since 2024-01-15T12:00:00Z";

    /// Vertical axis unit of soil/height layers.
    pub const METERS: &str = "m";
    pub const PRESSURE: &str = "hPa";
}

/// Common instants.
pub mod time {
    /// Reference instant of the sample forecast cycle.
    pub const REFERENCE_TIME: &str = "2020-01-01T00:00Z";
}

/// A complete station configuration in the service's YAML layout.
///
/// Every observation tag and the seven forecast tags required without
/// flux data are mapped.
pub const STATION_YAML: &str = r#"
station_id: vt4-ruskeasuo
location:
  latitude: 60.192059
  longitude: 24.945831
  elevation: 22.0
station_type: road
sensor_depth_cm: 40
flux:
  solar: false
  infrared: false
  anthropogenic: false
road_layers:
  - material: asphalt
    thickness_m: 0.05
  - material: crushed
    thickness_m: 0.3
horizon:
  - { azimuth: 0, elevation: 3 }
  - { azimuth: 90, elevation: 5 }
  - { azimuth: 180, elevation: 2 }
  - { azimuth: 270, elevation: 4 }
observation_mapping:
  at:
    - { type: measurement, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: air_temperature, source_id: rws-1001 }
  td:
    - { type: measurement, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: dew_point, source_id: rws-1001 }
  pi:
    - { type: measurement, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: precipitation_intensity, source_id: rws-1001 }
  ws:
    - { type: measurement, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: wind_speed, source_id: rws-1001 }
    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: wind_speed_10m, source_id: meps }
  sc:
    - { type: measurement, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: road_condition, source_id: rws-1001 }
  st:
    - { type: measurement, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: road_surface_temperature, source_id: rws-1001 }
  sst:
    - { type: measurement, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: sub_surface_temperature_40cm, source_id: rws-1001 }
forecast_mapping:
  at:
    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: air_temperature_150cm, source_id: meps }
  td:
    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: dew_point_150cm, source_id: meps }
  ra:
    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: rain_amount, source_id: meps }
  sn:
    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: snow_amount, source_id: meps }
  ws:
    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: wind_speed_10m, source_id: meps }
  ap:
    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: air_pressure, source_id: meps }
  cc:
    - { type: forecast, location: { latitude: 60.192059, longitude: 24.945831 }, parameter: cloud_cover, source_id: meps }
"#;

/// A model output document with two records, deliberately out of order.
pub const ROADCAST_XML: &str = r#"<?xml version="1.0"?>
<roadcast>
  <header>
    <filetype>roadcast</filetype>
    <version>1.0</version>
    <production-date>2020-01-01T00:00Z</production-date>
    <road-station>vt4-ruskeasuo</road-station>
  </header>
  <prediction-list>
    <prediction>
      <roadcast-time>2020-01-01T00:20Z</roadcast-time>
      <hh>0.33</hh>
      <st>-1.5</st>
      <at>-2.0</at>
      <rc>3</rc>
    </prediction>
    <prediction>
      <roadcast-time>2020-01-01T00:00Z</roadcast-time>
      <hh>0.0</hh>
      <st>-1.2</st>
      <at>-2.1</at>
      <rc>2</rc>
    </prediction>
  </prediction-list>
</roadcast>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_yaml_mentions_every_observation_tag() {
        for tag in ["at:", "td:", "pi:", "ws:", "sc:", "st:", "sst:"] {
            assert!(STATION_YAML.contains(tag), "missing {}", tag);
        }
    }

    #[test]
    fn test_roadcast_fixture_has_two_records() {
        assert_eq!(ROADCAST_XML.matches("<prediction>").count(), 2);
    }
}
