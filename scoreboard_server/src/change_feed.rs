use std::collections::{HashMap, hash_map};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error, info};


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    events_tx: async_std::channel::Sender<String>,
    logging_id: String,
}

// Clients connected to the push channel. Every change payload is sent to all of them.
pub struct Subscribers {
    map: Mutex<HashMap<SubscriberId, Subscriber>>,
}

impl Subscribers {
    pub fn new() -> Self { Subscribers { map: Mutex::new(HashMap::new()) } }

    pub fn add(
        &self, events_tx: async_std::channel::Sender<String>, logging_id: String,
    ) -> SubscriberId {
        let mut map = self.map.lock().unwrap();
        loop {
            let id = SubscriberId(rand::random());
            if let hash_map::Entry::Vacant(e) = map.entry(id) {
                e.insert(Subscriber { events_tx, logging_id });
                return id;
            }
        }
    }

    // Returns logging id if the subscriber existed.
    pub fn remove(&self, id: SubscriberId) -> Option<String> {
        self.map.lock().unwrap().remove(&id).map(|s| s.logging_id)
    }

    pub fn len(&self) -> usize { self.map.lock().unwrap().len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    // Unbounded fan-out: one copy of the payload per subscriber, nothing is dropped or merged.
    pub fn broadcast(&self, payload: &str) {
        let map = self.map.lock().unwrap();
        debug!("Broadcasting change to {} subscribers: {}", map.len(), payload);
        for subscriber in map.values() {
            // A closed channel means the connection is going away; its handler removes it.
            let _ = subscriber.events_tx.try_send(payload.to_owned());
        }
    }
}

// Forwards Postgres notifications to subscribers verbatim. Runs for the server lifetime.
pub async fn forward_postgres_changes(
    mut listener: sqlx::postgres::PgListener, subscribers: Arc<Subscribers>,
) {
    info!("Listening for score changes");
    loop {
        match listener.recv().await {
            Ok(notification) => subscribers.broadcast(notification.payload()),
            Err(err) => {
                error!("Error receiving score change notification: {}", err);
                async_std::task::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
