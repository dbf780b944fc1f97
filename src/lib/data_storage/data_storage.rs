use std::collections::HashMap;

use std::sync::{Arc, Mutex, RwLock};

use std::thread;
use std::time::Duration as STDDuration;

use chrono::{DateTime, Utc};

use crate::lib::estimator::FlowEstimator;
use crate::lib::sites::Site;

pub type ThreadedDataStorage = Arc<RwLock<DataStorage>>;

#[derive(Clone)]
pub struct DataStorage {
    pub sites: Arc<RwLock<HashMap<String, Mutex<Site>>>>,
    pub id: String,
    pub verbose: bool,
}

impl DataStorage {
    pub fn new_with_id(_id: String, _verbose: bool) -> Self {
        return DataStorage {
            sites: Arc::new(RwLock::new(HashMap::<String, Mutex<Site>>::new())),
            id: _id,
            verbose: _verbose,
        };
    }
    pub fn insert_site(&self, site: Site) {
        let sites = Arc::clone(&self.sites);
        match sites.write() {
            Ok(mut mutex) => {
                mutex.insert(site.id.clone(), Mutex::new(site));
            }
            Err(err) => {
                println!("Can't insert site due PoisonErr: {}", err)
            }
        };
    }
    pub fn get_arc_copy(self) -> Arc<RwLock<Self>> {
        return Arc::new(RwLock::new(self));
    }
    /// One estimation pass: every active site gets exactly one new
    /// detection row stamped with the given simulated instant.
    pub fn run_estimation_tick(&self, estimator: &FlowEstimator, now: DateTime<Utc>) {
        let mut rng = rand::rng();
        let sites = Arc::clone(&self.sites);
        match sites.read() {
            Ok(sites) => {
                for (_, site_guarded) in sites.iter() {
                    let mut site = site_guarded.lock().expect("Site is poisoned [Mutex]");
                    if !site.active {
                        continue;
                    }
                    let detection = estimator.estimate(&site, now, &mut rng);
                    // Log significant rows only, same shape as the field units
                    if detection.flow_count > 5 || detection.estimated_speed < 70.0 {
                        let site_name: String = site.name.chars().take(35).collect();
                        println!(
                            "[ESTIMATOR] {:<35} | {:<12} | {:<10} | {}",
                            site_name,
                            format!("{} veh/hr", detection.hour_count),
                            format!("{} km/h", detection.estimated_speed),
                            detection.scenario.to_string().to_uppercase()
                        );
                    }
                    site.register_detection(detection);
                    drop(site);
                }
            }
            Err(err) => {
                println!("Can't run estimation tick due PoisonErr: {}", err)
            }
        };
    }
    pub fn start_data_worker(this: Arc<RwLock<DataStorage>>, estimator: FlowEstimator, millis: u64, verbose: bool) {
        if verbose {
            println!("Detections would be generated every {} ms", millis);
        }
        // Let the REST API and the publisher come up first
        thread::sleep(STDDuration::from_millis(millis.min(5000)));
        loop {
            let read_mutex = this.read().expect("RwLock poisoned");
            let tick_time = Utc::now();
            read_mutex.run_estimation_tick(&estimator, tick_time);
            if verbose {
                println!("\nTick time: {}", tick_time);
            }
            drop(read_mutex);
            thread::sleep(STDDuration::from_millis(millis));
        }
    }
}
