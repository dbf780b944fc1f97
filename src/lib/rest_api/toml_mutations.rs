use actix_web::{Error, HttpResponse, web};
use serde::Serialize;

use crate::lib::rest_api::APIStorage;
use crate::settings::SiteSettings;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_text: String,
}

#[derive(Debug, Serialize)]
pub struct SucccessResponse<'a> {
    pub message: &'a str,
}

pub async fn save_toml(data: web::Data<APIStorage>) -> Result<HttpResponse, Error> {
    println!("Saving TOML configuration");
    let ds_guard = data.data_storage.read().expect("DataStorage is poisoned [RWLock]");
    let sites = ds_guard.sites.read().expect("Sites data is poisoned [RWLock]");
    let mut setting_cloned = data.app_settings.get_copy_no_sites();
    for (_, site_guarded) in sites.iter() {
        let site = site_guarded.lock().expect("Site is poisoned [Mutex]");
        setting_cloned.sites.push(SiteSettings {
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
        });
        drop(site);
    }
    drop(sites);
    drop(ds_guard);
    setting_cloned.sites.sort_by(|a, b| a.id.cmp(&b.id));
    match setting_cloned.save(&data.settings_filename) {
        Ok(_) => {}
        Err(_err) => {
            return Ok(HttpResponse::InternalServerError().json(ErrorResponse {
                error_text: format!("Can't save TOML due the error: {}", _err),
            }));
        }
    };
    return Ok(HttpResponse::Ok().json(SucccessResponse { message: "ok" }));
}
