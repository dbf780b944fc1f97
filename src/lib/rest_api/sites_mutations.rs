use actix_web::{Error, HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::lib::rest_api::APIStorage;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_text: String,
}

#[derive(Debug, Serialize)]
pub struct SucccessResponse<'a> {
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SetSiteActiveRequest {
    pub site_id: String,
    pub active: bool,
}

/// The active flag is the only mutable field of a site. Everything else
/// stays as seeded.
pub async fn set_site_active(
    data: web::Data<APIStorage>,
    body: web::Json<SetSiteActiveRequest>,
) -> Result<HttpResponse, Error> {
    let ds_guard = data.data_storage.read().expect("DataStorage is poisoned [RWLock]");
    let sites = ds_guard.sites.read().expect("Sites data is poisoned [RWLock]");
    let site_guarded = match sites.get(&body.site_id) {
        Some(site_guarded) => site_guarded,
        None => {
            return Ok(HttpResponse::NotFound().json(ErrorResponse {
                error_text: format!("No such site: '{}'", body.site_id),
            }));
        }
    };
    let mut site = site_guarded.lock().expect("Site is poisoned [Mutex]");
    site.active = body.active;
    drop(site);
    drop(sites);
    drop(ds_guard);
    return Ok(HttpResponse::Ok().json(SucccessResponse { message: "ok" }));
}
