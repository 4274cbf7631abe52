//! Response bodies returned by the dashboard backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Typed view of a `/stats` telemetry snapshot.
///
/// Every field is optional and read leniently: a field that is missing or
/// has an unexpected JSON type is `None` instead of failing the whole
/// snapshot. Renderers show `N/A` for such fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VehicleStats {
    #[serde(deserialize_with = "lenient")]
    pub vehicle_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub location: Option<String>,

    // Battery
    #[serde(deserialize_with = "lenient")]
    pub battery_level: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub usable_battery_level: Option<f64>,
    #[serde(alias = "range_miles", deserialize_with = "lenient")]
    pub battery_range: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub charging: Option<bool>,

    // Charging
    #[serde(deserialize_with = "lenient")]
    pub charging_state: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub charge_limit_soc: Option<f64>,
    /// Seconds until the charge limit is reached
    #[serde(deserialize_with = "lenient")]
    pub time_to_full_charge: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub charger_power: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub charge_rate: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub conn_charge_cable: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub fast_charger_present: Option<bool>,

    // Climate
    #[serde(deserialize_with = "lenient")]
    pub inside_temp: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub outside_temp: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub is_climate_on: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub fan_status: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub driver_temp_setting: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub passenger_temp_setting: Option<f64>,

    // Security
    #[serde(deserialize_with = "lenient")]
    pub locked: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub sentry_mode: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub sentry_mode_available: Option<bool>,

    // Doors and closures
    #[serde(deserialize_with = "lenient")]
    pub door_driver_front_open: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub door_passenger_front_open: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub door_driver_rear_open: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub door_passenger_rear_open: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub frunk_open: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub trunk_open: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub window_driver_front_open: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub window_passenger_front_open: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub window_driver_rear_open: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub window_passenger_rear_open: Option<bool>,

    // Drive state
    #[serde(deserialize_with = "lenient")]
    pub shift_state: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub speed: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub power: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub odometer: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub heading: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub longitude: Option<f64>,
}

impl VehicleStats {
    /// Build the typed view from a raw JSON body. Non-object bodies yield an empty view.
    pub fn from_value(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Body of `/camera` and `/dev/camera`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFeed {
    #[serde(default)]
    pub camera_feed_url: Option<String>,
}

/// Body of a lock/unlock response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body of a non-2xx response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
