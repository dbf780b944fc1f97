mod lib;
use lib::data_storage::DataStorage;
use lib::estimator::{FlowEstimator, FlowModel};
use lib::publisher::RedisConnection;
use lib::rest_api;
use lib::sites::Site;

mod settings;
use settings::AppSettings;

use std::env;
use std::process;
use std::thread;
use std::time::Duration as STDDuration;

use ctrlc;

fn main() {
    let args: Vec<String> = env::args().collect();
    let path_to_config = match args.len() {
        2 => &args[1],
        _ => {
            println!("Args should contain exactly one string: path to TOML configuration file. Setting to default './data/conf.toml'");
            "./data/conf.toml"
        }
    };
    let app_settings = AppSettings::new(path_to_config);
    println!("Settings are:\n\t{}", app_settings);

    let verbose = match &app_settings.debug {
        Some(x) => x.enable,
        None => false,
    };

    /* Seed the storage with configured sites */
    let data_storage = DataStorage::new_with_id(app_settings.equipment_info.id.clone(), verbose);
    for site_settings in app_settings.sites.iter() {
        data_storage.insert_site(Site::from(site_settings));
    }

    let estimator = FlowEstimator::new(
        FlowModel::default(),
        app_settings.get_confidence_policy(),
        app_settings.worker.update_interval_milliseconds,
    );
    println!("Estimator is:\n\t{}", estimator);

    println!("Press `Ctrl-C` to stop main programm");
    ctrlc::set_handler(move || {
        println!("Ctrl+C has been pressed! Exit in 2 seconds");
        thread::sleep(STDDuration::from_secs(2));
        process::exit(1);
    })
    .expect("Error setting `Ctrl-C` handler");

    /* Start estimation worker thread */
    let ds_threaded = data_storage.get_arc_copy();
    let update_interval = app_settings.worker.update_interval_milliseconds as u64;
    {
        let ds_worker = ds_threaded.clone();
        let worker_estimator = estimator.clone();
        thread::spawn(move || {
            DataStorage::start_data_worker(ds_worker, worker_estimator, update_interval, verbose);
        });
    }

    /* Start Redis publisher if needed */
    if app_settings.redis_publisher.enable {
        let ds_redis = ds_threaded.clone();
        let redis_settings = app_settings.redis_publisher.clone();
        thread::spawn(move || {
            let mut publisher = match redis_settings.password.is_empty() {
                true => RedisConnection::new(
                    redis_settings.host.clone(),
                    redis_settings.port,
                    redis_settings.db_index,
                ),
                false => RedisConnection::new_with_password(
                    redis_settings.host.clone(),
                    redis_settings.port,
                    redis_settings.db_index,
                    redis_settings.password.clone(),
                ),
            };
            publisher.set_channel(redis_settings.channel_name.clone());
            publisher.start_worker(ds_redis, update_interval, verbose);
        });
    }

    /* Serve REST API in the main thread, or just keep the workers alive */
    if app_settings.rest_api.enable {
        let ds_api = ds_threaded.clone();
        match rest_api::start_rest_api(
            app_settings.rest_api.host.clone(),
            app_settings.rest_api.back_end_port,
            ds_api,
            app_settings.clone(),
            path_to_config,
        ) {
            Ok(_) => {}
            Err(err) => {
                println!("Can't start API due the error: {:?}", err)
            }
        }
    } else {
        loop {
            thread::sleep(STDDuration::from_secs(1));
        }
    }
}
