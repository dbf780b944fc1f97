/// Assumed per-lane capacity (veh/hr/lane), the denominator of the
/// volume-to-capacity ratio.
pub const CAPACITY_PER_LANE: f32 = 2200.0;

/// Average space a vehicle claims at a sensing point: 5 m vehicle plus
/// ~20 m gap at speed.
pub const AVG_VEHICLE_FOOTPRINT_METERS: f32 = 25.0;

pub const OCCUPANCY_MIN: f32 = 0.01;
pub const OCCUPANCY_MAX: f32 = 0.95;
pub const DENSITY_MIN: f32 = 1.0;
pub const SPEED_FLOOR: f32 = 5.0;

/// Speed-flow relationship in the manner of the Highway Capacity Manual:
/// piecewise-linear in v/c, monotonically decreasing, continuous at the
/// segment boundaries 0.3 / 0.7 / 0.9 / 1.0.
pub fn estimate_speed(hourly_flow: u32, lanes: u16) -> f32 {
    let flow_per_lane = hourly_flow as f32 / lanes as f32;
    let vc_ratio = flow_per_lane / CAPACITY_PER_LANE;

    if vc_ratio < 0.3 {
        // Free flow: 95-100 km/h
        100.0 - vc_ratio * 16.7
    } else if vc_ratio < 0.7 {
        // Stable flow: 70-95 km/h
        95.0 - (vc_ratio - 0.3) * 62.5
    } else if vc_ratio < 0.9 {
        // Approaching capacity: 40-70 km/h
        70.0 - (vc_ratio - 0.7) * 150.0
    } else if vc_ratio < 1.0 {
        // At capacity: 20-40 km/h
        40.0 - (vc_ratio - 0.9) * 200.0
    } else {
        // Over capacity (breakdown): 5-20 km/h
        (20.0 - (vc_ratio - 1.0) * 50.0).max(SPEED_FLOOR)
    }
}

/// Fraction of time a fixed sensing point is covered by a vehicle.
/// Clamped into [OCCUPANCY_MIN, OCCUPANCY_MAX] whatever the inputs.
pub fn estimate_occupancy(hourly_flow: u32, speed: f32, lanes: u16) -> f32 {
    let vehicles_per_second = hourly_flow as f32 / 3600.0;
    let speed_meters_per_second = (speed * 1000.0) / 3600.0;
    let occupancy =
        (vehicles_per_second * AVG_VEHICLE_FOOTPRINT_METERS) / (speed_meters_per_second * lanes as f32);
    occupancy.max(OCCUPANCY_MIN).min(OCCUPANCY_MAX)
}

/// Vehicles per kilometer per lane, floored at DENSITY_MIN.
pub fn estimate_density(hourly_flow: u32, speed: f32, lanes: u16) -> f32 {
    let flow_per_lane = hourly_flow as f32 / lanes as f32;
    let density = flow_per_lane / speed;
    density.max(DENSITY_MIN)
}
