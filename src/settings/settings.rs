use std::fs;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use toml;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub equipment_info: EquipmentInfo,
    pub debug: Option<DebugSettings>,
    pub worker: WorkerSettings,
    pub rest_api: RestAPISettings,
    pub redis_publisher: RedisPublisherSettings,
    pub sites: Vec<SiteSettings>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DebugSettings {
    pub enable: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EquipmentInfo {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorkerSettings {
    pub update_interval_milliseconds: i64,
    /// Either "freeway" or "arterial". Default is "freeway"
    #[serde(default = "default_confidence_policy")]
    pub confidence_policy: String,
}

fn default_confidence_policy() -> String {
    "freeway".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RestAPISettings {
    pub enable: bool,
    pub host: String,
    pub back_end_port: i32,
    pub api_scope: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RedisPublisherSettings {
    pub enable: bool,
    pub host: String,
    pub port: i32,
    pub password: String,
    pub db_index: i32,
    pub channel_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SiteSettings {
    pub id: String,
    pub name: String,
    // Either "mitchell", "kwinana", "mounts_bay" or "stirling"
    pub corridor: String,
    // Either "northbound" or "southbound"
    pub direction: String,
    pub lanes: u16,
    pub distance_km: f32,
    pub latitude: f32,
    pub longitude: f32,
    #[serde(default = "default_speed_limit")]
    pub speed_limit: u16,
    #[serde(default = "default_site_active")]
    pub active: bool,
}

fn default_speed_limit() -> u16 {
    100
}
fn default_site_active() -> bool {
    true
}

use crate::lib::estimator::ConfidencePolicy;
use crate::lib::sites::{Corridor, Direction, Site};
use std::convert::From;

impl From<&SiteSettings> for Site {
    fn from(setting: &SiteSettings) -> Self {
        let corridor = Corridor::from_str(&setting.corridor).unwrap_or_default();
        let direction = Direction::from_str(&setting.direction).unwrap_or_default();
        Site::new(
            setting.id.clone(),
            setting.name.clone(),
            corridor,
            direction,
            setting.lanes,
            setting.distance_km,
            setting.longitude,
            setting.latitude,
            setting.speed_limit,
            setting.active,
        )
    }
}

impl AppSettings {
    pub fn new(filename: &str) -> Self {
        let toml_contents = fs::read_to_string(filename)
            .expect(&format!("Something went wrong reading the file: '{}'", &filename));
        let app_settings = match toml::from_str::<AppSettings>(&toml_contents) {
            Ok(result) => result,
            Err(err) => {
                panic!("Can't parse TOML configuration file due the error: {:?}", err);
            }
        };
        // Check if confidence policy is valid
        match app_settings.worker.confidence_policy.as_str() {
            "freeway" => {}
            "arterial" => {}
            _ => {
                panic!(
                    "Invalid confidence policy: '{}'. Supported policies are 'freeway' and 'arterial'.",
                    app_settings.worker.confidence_policy
                );
            }
        }
        if app_settings.worker.update_interval_milliseconds <= 0 {
            panic!(
                "Invalid update interval: '{}'. It should be a positive number of milliseconds.",
                app_settings.worker.update_interval_milliseconds
            );
        }
        // Check every site descriptor before it seeds the storage
        for site in app_settings.sites.iter() {
            if let Err(err) = Corridor::from_str(&site.corridor) {
                panic!("Invalid site '{}': {}", site.id, err);
            }
            if let Err(err) = Direction::from_str(&site.direction) {
                panic!("Invalid site '{}': {}", site.id, err);
            }
            if site.lanes < 1 {
                panic!("Invalid site '{}': lane count should be a positive number", site.id);
            }
            if site.distance_km < 0.0 {
                panic!("Invalid site '{}': distance should be non-negative", site.id);
            }
        }
        return app_settings;
    }
    pub fn get_confidence_policy(&self) -> ConfidencePolicy {
        ConfidencePolicy::from_str(&self.worker.confidence_policy).unwrap_or_default()
    }
    pub fn save(&self, filename: &str) -> Result<(), Box<dyn Error>> {
        fs::copy(
            filename,
            filename.to_owned() + &format!(".{}.bak", Utc::now().format("%Y-%m-%dT%H-%M-%S-%f")),
        )?;
        let docs = toml::to_string(self)?;
        fs::write(filename, docs)?;
        Ok(())
    }
    pub fn get_copy_no_sites(&self) -> AppSettings {
        AppSettings {
            equipment_info: self.equipment_info.clone(),
            debug: self.debug.clone(),
            worker: self.worker.clone(),
            rest_api: self.rest_api.clone(),
            redis_publisher: self.redis_publisher.clone(),
            sites: Vec::new(),
        }
    }
}

impl fmt::Display for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Equipment ID: {}\n\tSites: {}\n\tConfidence policy: {}\n\tRefresh data (millis): {}\n\tBack-end host: {}\n\tBack-end port: {}",
            self.equipment_info.id,
            self.sites.len(),
            self.worker.confidence_policy,
            self.worker.update_interval_milliseconds,
            self.rest_api.host,
            self.rest_api.back_end_port,
        )
    }
}
