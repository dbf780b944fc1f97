extern crate redis;

use redis::{Client, Commands};
use std::error::Error;
use std::sync::Arc;
use std::thread;
use std::time::Duration as STDDuration;

use crate::lib::data_storage::ThreadedDataStorage;
use crate::lib::publisher::RedisMessage;
use crate::lib::rest_api::sites_stats::{LiveConditions, collect_live_conditions};

pub struct RedisConnection {
    pub channel_name: String,
    pub client: Arc<Client>,
}

impl RedisConnection {
    pub fn new(host: String, port: i32, db_index: i32) -> RedisConnection {
        let client = Client::open(format!("redis://{}:{}/{}", host, port, db_index)).unwrap();
        return RedisConnection {
            channel_name: "TRAFFIC_WATCH_LIVE".to_string(),
            client: Arc::new(client),
        };
    }
    pub fn new_with_password(host: String, port: i32, db_index: i32, password: String) -> RedisConnection {
        let client = Client::open(format!("redis://:{}@{}:{}/{}", password, host, port, db_index)).unwrap();
        return RedisConnection {
            channel_name: "TRAFFIC_WATCH_LIVE".to_string(),
            client: Arc::new(client),
        };
    }
    pub fn set_channel(&mut self, _channel_name: String) {
        self.channel_name = _channel_name.clone();
    }
    pub fn publish(&self, msg: &dyn RedisMessage) -> Result<(), Box<dyn Error>> {
        let mut redis_conn = match self.client.get_connection() {
            Ok(_conn) => _conn,
            Err(_err) => {
                return Err(_err.into());
            }
        };
        let msg_string = msg.prepare_string()?;
        redis_conn.publish::<_, _, ()>(self.channel_name.to_owned(), msg_string)?;
        Ok(())
    }
    pub fn start_worker(&self, data: ThreadedDataStorage, millis: u64, verbose: bool) {
        thread::sleep(STDDuration::from_millis(millis));
        loop {
            let ds_guard = data.read().expect("DataStorage is poisoned [RWLock]");
            let prepared_message = collect_live_conditions(&ds_guard);
            drop(ds_guard);
            match self.publish(&prepared_message) {
                Err(_err) => {
                    println!("Errors while sending data to Redis: {}", _err);
                }
                Ok(_) => {
                    if verbose {
                        println!("Live conditions have been published to channel '{}'", self.channel_name);
                    }
                }
            };
            thread::sleep(STDDuration::from_millis(millis));
        }
    }
}

impl RedisMessage for LiveConditions {
    fn prepare_string(&self) -> Result<String, Box<dyn Error>> {
        let json = serde_json::to_string(self)?;
        Ok(json)
    }
}
