use actix_web::{Error, HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::lib::rest_api::APIStorage;
use crate::lib::sites::Detection;

const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct DetectionsQuery {
    pub site_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DetectionsHistory {
    /// Equipment identifier. Should match software configuration
    #[schema(example = "traffic-watch-01")]
    pub equipment_id: String,
    pub count: usize,
    pub data: Vec<Detection>,
}

#[utoipa::path(
    get,
    tag = "Detections",
    path = "/api/detections/history",
    params(
        ("site_id" = Option<String>, Query, description = "Restrict output to a single site"),
        ("limit" = Option<usize>, Query, description = "Maximum number of rows, most recent first. Default is 100")
    ),
    responses(
        (status = 200, description = "Detection history, most recent first", body = DetectionsHistory)
    )
)]
pub async fn detections_history(
    data: web::Data<APIStorage>,
    query: web::Query<DetectionsQuery>,
) -> Result<HttpResponse, Error> {
    let limit = match query.limit {
        Some(limit) => limit,
        None => DEFAULT_HISTORY_LIMIT,
    };
    let ds_guard = data.data_storage.read().expect("DataStorage is poisoned [RWLock]");
    let sites = ds_guard.sites.read().expect("Sites data is poisoned [RWLock]");
    let mut rows: Vec<Detection> = vec![];
    for (site_id, site_guarded) in sites.iter() {
        if let Some(wanted) = &query.site_id {
            if site_id != wanted {
                continue;
            }
        }
        let site = site_guarded.lock().expect("Site is poisoned [Mutex]");
        rows.extend(site.detections.iter().cloned());
        drop(site);
    }
    drop(sites);
    let equipment_id = ds_guard.id.clone();
    drop(ds_guard);

    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    rows.truncate(limit);

    let ans = DetectionsHistory {
        equipment_id,
        count: rows.len(),
        data: rows,
    };
    return Ok(HttpResponse::Ok().json(ans));
}
