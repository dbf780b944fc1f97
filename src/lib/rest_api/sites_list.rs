use std::str::FromStr;

use actix_web::{Error, HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::lib::rest_api::APIStorage;
use crate::lib::sites::{Corridor, Site};

#[derive(Debug, Deserialize)]
pub struct SitesQuery {
    pub corridor: Option<String>,
}

/// Static metadata of a monitoring site
#[derive(Debug, Serialize, ToSchema)]
pub struct SiteInfo {
    /// Site identifier. Stable across restarts
    #[schema(example = "M3-NB")]
    pub id: String,
    pub name: String,
    #[schema(example = "mitchell")]
    pub corridor: String,
    #[schema(example = "northbound")]
    pub direction: String,
    #[schema(example = 3)]
    pub lanes: u16,
    /// Distance from the reference bridge, kilometers
    #[schema(example = 1.0)]
    pub distance_km: f32,
    pub latitude: f32,
    pub longitude: f32,
    pub speed_limit: u16,
    pub active: bool,
}

impl From<&Site> for SiteInfo {
    fn from(site: &Site) -> Self {
        SiteInfo {
            id: site.id.clone(),
            name: site.name.clone(),
            corridor: site.corridor.to_string(),
            direction: site.direction.to_string(),
            lanes: site.lanes,
            distance_km: site.distance_km,
            latitude: site.latitude,
            longitude: site.longitude,
            speed_limit: site.speed_limit,
            active: site.active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AllSites {
    /// Equipment identifier. Should match software configuration
    #[schema(example = "traffic-watch-01")]
    pub equipment_id: String,
    pub count: usize,
    pub data: Vec<SiteInfo>,
}

#[utoipa::path(
    get,
    tag = "Sites",
    path = "/api/sites/all",
    params(
        ("corridor" = Option<String>, Query, description = "Restrict output to a single corridor")
    ),
    responses(
        (status = 200, description = "List of monitoring sites", body = AllSites)
    )
)]
pub async fn all_sites_list(
    data: web::Data<APIStorage>,
    query: web::Query<SitesQuery>,
) -> Result<HttpResponse, Error> {
    let corridor_filter = match &query.corridor {
        Some(corridor) => Corridor::from_str(corridor).ok(),
        None => None,
    };
    let ds_guard = data.data_storage.read().expect("DataStorage is poisoned [RWLock]");
    let sites = ds_guard.sites.read().expect("Sites data is poisoned [RWLock]");
    let mut ans = AllSites {
        equipment_id: ds_guard.id.clone(),
        count: 0,
        data: vec![],
    };
    for (_, site_guarded) in sites.iter() {
        let site = site_guarded.lock().expect("Site is poisoned [Mutex]");
        if let Some(corridor) = corridor_filter {
            if site.corridor != corridor {
                continue;
            }
        }
        ans.data.push(SiteInfo::from(&*site));
        drop(site);
    }
    // HashMap iteration order is arbitrary; present corridors in road order
    ans.data.sort_by(|a, b| {
        a.corridor
            .cmp(&b.corridor)
            .then(a.distance_km.total_cmp(&b.distance_km))
            .then(a.id.cmp(&b.id))
    });
    ans.count = ans.data.len();
    drop(sites);
    drop(ds_guard);
    return Ok(HttpResponse::Ok().json(ans));
}
