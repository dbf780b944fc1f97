use std::collections::HashMap;

use actix_web::{Error, HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::lib::data_storage::DataStorage;
use crate::lib::rest_api::APIStorage;
use crate::lib::sites::Detection;

/// Aggregates over the stored detection history of one site
#[derive(Debug, Serialize, ToSchema)]
pub struct SiteAggregates {
    pub data_points: usize,
    pub avg_hourly_flow: f32,
    pub avg_speed: f32,
    pub avg_occupancy: f32,
    pub avg_density: f32,
    pub peak_flow: u32,
    pub min_speed: f32,
    pub max_speed: f32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SiteStats {
    #[schema(example = "M3-NB")]
    pub site_id: String,
    pub site_name: String,
    pub corridor: String,
    pub direction: String,
    pub latest: Option<Detection>,
    pub aggregates: Option<SiteAggregates>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AllSitesStats {
    /// Equipment identifier. Should match software configuration
    #[schema(example = "traffic-watch-01")]
    pub equipment_id: String,
    pub data: Vec<SiteStats>,
}

fn aggregate_detections(detections: &Vec<Detection>) -> Option<SiteAggregates> {
    if detections.is_empty() {
        return None;
    }
    let count = detections.len();
    let mut aggregates = SiteAggregates {
        data_points: count,
        avg_hourly_flow: 0.0,
        avg_speed: 0.0,
        avg_occupancy: 0.0,
        avg_density: 0.0,
        peak_flow: 0,
        min_speed: f32::MAX,
        max_speed: f32::MIN,
    };
    for detection in detections.iter() {
        aggregates.avg_hourly_flow += detection.hour_count as f32;
        aggregates.avg_speed += detection.estimated_speed;
        aggregates.avg_occupancy += detection.occupancy;
        aggregates.avg_density += detection.density;
        aggregates.peak_flow = aggregates.peak_flow.max(detection.hour_count);
        aggregates.min_speed = aggregates.min_speed.min(detection.estimated_speed);
        aggregates.max_speed = aggregates.max_speed.max(detection.estimated_speed);
    }
    aggregates.avg_hourly_flow /= count as f32;
    aggregates.avg_speed /= count as f32;
    aggregates.avg_occupancy /= count as f32;
    aggregates.avg_density /= count as f32;
    Some(aggregates)
}

#[utoipa::path(
    get,
    tag = "Statistics",
    path = "/api/stats/all",
    responses(
        (status = 200, description = "Latest detection plus history aggregates per site", body = AllSitesStats)
    )
)]
pub async fn all_sites_stats(data: web::Data<APIStorage>) -> Result<HttpResponse, Error> {
    let ds_guard = data.data_storage.read().expect("DataStorage is poisoned [RWLock]");
    let sites = ds_guard.sites.read().expect("Sites data is poisoned [RWLock]");
    let mut ans = AllSitesStats {
        equipment_id: ds_guard.id.clone(),
        data: vec![],
    };
    for (_, site_guarded) in sites.iter() {
        let site = site_guarded.lock().expect("Site is poisoned [Mutex]");
        ans.data.push(SiteStats {
            site_id: site.id.clone(),
            site_name: site.name.clone(),
            corridor: site.corridor.to_string(),
            direction: site.direction.to_string(),
            latest: site.last_detection.clone(),
            aggregates: aggregate_detections(&site.detections),
        });
        drop(site);
    }
    drop(sites);
    drop(ds_guard);
    return Ok(HttpResponse::Ok().json(ans));
}

/// Live conditions for one monitoring site
#[derive(Debug, Serialize, ToSchema)]
pub struct SiteLive {
    #[schema(example = "M3-NB")]
    pub site_id: String,
    pub site_name: String,
    pub direction: String,
    pub lanes: u16,
    pub distance_km: f32,
    pub latest_detection: Option<Detection>,
}

/// Live conditions for every active site, grouped by corridor
#[derive(Debug, Serialize, ToSchema)]
pub struct LiveConditions {
    /// Equipment identifier. Should match software configuration
    #[schema(example = "traffic-watch-01")]
    pub equipment_id: String,
    #[schema(value_type = Object)]
    pub corridors: HashMap<String, Vec<SiteLive>>,
}

/// Snapshot shared by the REST layer and the Redis publisher.
pub fn collect_live_conditions(data_storage: &DataStorage) -> LiveConditions {
    let sites = data_storage.sites.read().expect("Sites data is poisoned [RWLock]");
    let mut ans = LiveConditions {
        equipment_id: data_storage.id.clone(),
        corridors: HashMap::new(),
    };
    for (_, site_guarded) in sites.iter() {
        let site = site_guarded.lock().expect("Site is poisoned [Mutex]");
        if !site.active {
            continue;
        }
        let entry = ans.corridors.entry(site.corridor.to_string()).or_insert_with(Vec::new);
        entry.push(SiteLive {
            site_id: site.id.clone(),
            site_name: site.name.clone(),
            direction: site.direction.to_string(),
            lanes: site.lanes,
            distance_km: site.distance_km,
            latest_detection: site.last_detection.clone(),
        });
        drop(site);
    }
    drop(sites);
    for (_, group) in ans.corridors.iter_mut() {
        group.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km).then(a.site_id.cmp(&b.site_id)));
    }
    return ans;
}

#[utoipa::path(
    get,
    tag = "Statistics",
    path = "/api/realtime/live",
    responses(
        (status = 200, description = "Live conditions grouped by corridor", body = LiveConditions)
    )
)]
pub async fn live_conditions(data: web::Data<APIStorage>) -> Result<HttpResponse, Error> {
    let ds_guard = data.data_storage.read().expect("DataStorage is poisoned [RWLock]");
    let ans = collect_live_conditions(&ds_guard);
    drop(ds_guard);
    return Ok(HttpResponse::Ok().json(ans));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib::sites::Scenario;

    fn detection(hour_count: u32, speed: f32) -> Detection {
        Detection {
            site_id: "M1-NB".to_string(),
            site_name: "Narrows Interchange (Northbound)".to_string(),
            timestamp: 1_693_386_819_000,
            flow_count: hour_count / 60,
            hour_count,
            minute_count: hour_count / 60,
            estimated_speed: speed,
            occupancy: 0.2,
            density: 12.0,
            avg_confidence: 0.9,
            scenario: Scenario::classify(speed, hour_count),
        }
    }

    #[test]
    fn test_aggregate_empty_history() {
        assert!(aggregate_detections(&vec![]).is_none());
    }

    #[test]
    fn test_aggregate_detections() {
        let history = vec![detection(3000, 90.0), detection(5000, 70.0), detection(7000, 40.0)];
        let aggregates = aggregate_detections(&history).unwrap();
        assert_eq!(aggregates.data_points, 3);
        assert_eq!(aggregates.peak_flow, 7000);
        assert!((aggregates.avg_hourly_flow - 5000.0).abs() < 1e-3);
        assert!((aggregates.avg_speed - (200.0 / 3.0)).abs() < 1e-3);
        assert!((aggregates.min_speed - 40.0).abs() < f32::EPSILON);
        assert!((aggregates.max_speed - 90.0).abs() < f32::EPSILON);
    }
}
