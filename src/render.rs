//! Text renderers for telemetry snapshots, one per category.
//!
//! Missing or mistyped values render as `N/A`.

use crate::api::VehicleStats;
use std::fmt::Write;

const NA: &str = "N/A";

/// Format a number the way it would read on a dashboard: `75`, not `75.0`.
fn num(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{}{}", num(v), unit))
}

/// Rounded with a unit; zero and missing both mean "no reading".
fn rounded_nonzero(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{}{}", num(v.round()), unit),
        _ => NA.to_string(),
    }
}

fn text(value: Option<&str>) -> String {
    value
        .filter(|s| !s.is_empty())
        .map_or_else(|| NA.to_string(), str::to_string)
}

fn open_closed(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Open",
        Some(false) => "Closed",
        None => NA,
    }
}

fn on_off(value: Option<bool>) -> &'static str {
    if value.unwrap_or(false) { "On" } else { "Off" }
}

fn section(title: &str, lines: &[(&str, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    for (label, value) in lines {
        let _ = writeln!(out, "  {}: {}", label, value);
    }
    out
}

pub fn battery(stats: &VehicleStats) -> String {
    section(
        "Battery",
        &[
            ("Level", with_unit(stats.battery_level, "%")),
            ("Usable", with_unit(stats.usable_battery_level, "%")),
            ("Est. Range", rounded_nonzero(stats.battery_range, " mi")),
            ("Status", text(stats.charging_state.as_deref())),
        ],
    )
}

pub fn charging(stats: &VehicleStats) -> String {
    let time_to_full = stats
        .time_to_full_charge
        .map_or_else(|| NA.to_string(), |secs| format!("{} mins", num((secs / 60.0).round())));
    let fast_charger = if stats.fast_charger_present.unwrap_or(false) {
        "Yes"
    } else {
        "No"
    };

    section(
        "Charging Status",
        &[
            ("State", text(stats.charging_state.as_deref())),
            ("Limit", with_unit(stats.charge_limit_soc, "%")),
            ("Time to Full", time_to_full),
            ("Charger Power", with_unit(stats.charger_power, " kW")),
            (
                "Charge Rate",
                stats
                    .charge_rate
                    .map_or_else(|| NA.to_string(), |r| format!("{} mph", num(r.round()))),
            ),
            ("Cable", text(stats.conn_charge_cable.as_deref())),
            ("Fast Charger", fast_charger.to_string()),
        ],
    )
}

pub fn climate(stats: &VehicleStats) -> String {
    section(
        "Climate Control",
        &[
            ("Inside Temp", with_unit(stats.inside_temp, "°C")),
            ("Outside Temp", with_unit(stats.outside_temp, "°C")),
            ("Climate", on_off(stats.is_climate_on).to_string()),
            ("Fan Level", with_unit(stats.fan_status, "")),
            ("Driver Set", with_unit(stats.driver_temp_setting, "°C")),
            ("Passenger Set", with_unit(stats.passenger_temp_setting, "°C")),
        ],
    )
}

pub fn security(stats: &VehicleStats) -> String {
    let lock = match stats.locked {
        Some(true) => "Locked",
        Some(false) => "Unlocked",
        None => NA,
    };
    let sentry = if stats.sentry_mode_available.unwrap_or(false) {
        on_off(stats.sentry_mode)
    } else {
        "Not Available"
    };

    section(
        "Security",
        &[
            ("Vehicle Lock", lock.to_string()),
            ("Sentry Mode", sentry.to_string()),
        ],
    )
}

pub fn doors(stats: &VehicleStats) -> String {
    let mut out = section(
        "Doors & Closures",
        &[
            ("Driver Front", open_closed(stats.door_driver_front_open).to_string()),
            (
                "Passenger Front",
                open_closed(stats.door_passenger_front_open).to_string(),
            ),
            ("Driver Rear", open_closed(stats.door_driver_rear_open).to_string()),
            (
                "Passenger Rear",
                open_closed(stats.door_passenger_rear_open).to_string(),
            ),
            ("Frunk", open_closed(stats.frunk_open).to_string()),
            ("Trunk", open_closed(stats.trunk_open).to_string()),
        ],
    );
    out.push_str(&section(
        "  Windows",
        &[
            (
                "Driver Front Window",
                open_closed(stats.window_driver_front_open).to_string(),
            ),
            (
                "Passenger Front Window",
                open_closed(stats.window_passenger_front_open).to_string(),
            ),
            (
                "Driver Rear Window",
                open_closed(stats.window_driver_rear_open).to_string(),
            ),
            (
                "Passenger Rear Window",
                open_closed(stats.window_passenger_rear_open).to_string(),
            ),
        ],
    ));
    out
}

pub fn drive(stats: &VehicleStats) -> String {
    let coordinate = |v: Option<f64>| v.map_or_else(|| NA.to_string(), |c| format!("{:.5}", c));

    let mut out = section(
        "Drive Information",
        &[
            ("Gear", text(stats.shift_state.as_deref())),
            ("Speed", with_unit(stats.speed, " mph")),
            ("Power", with_unit(stats.power, " kW")),
            ("Odometer", rounded_nonzero(stats.odometer, " mi")),
        ],
    );
    out.push_str(&section(
        "  Location",
        &[
            ("Heading", with_unit(stats.heading, "°")),
            ("Latitude", coordinate(stats.latitude)),
            ("Longitude", coordinate(stats.longitude)),
            ("Address", text(stats.location.as_deref())),
        ],
    ));
    out
}

/// All categories, preceded by the vehicle name when known.
pub fn dashboard(stats: &VehicleStats) -> String {
    let mut out = String::new();
    if let Some(name) = stats.vehicle_name.as_deref().filter(|n| !n.is_empty()) {
        let _ = writeln!(out, "Vehicle: {}\n", name);
    }
    let sections = [
        battery(stats),
        charging(stats),
        climate(stats),
        security(stats),
        doors(stats),
        drive(stats),
    ];
    out.push_str(&sections.join("\n"));
    out.trim_end().to_string()
}
