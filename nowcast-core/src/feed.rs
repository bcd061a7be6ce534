//! Result channel between the weather client and whatever renders it.
//!
//! Each refresh publishes `Loading` and then exactly one outcome. When
//! refreshes overlap, only the most recently started one may publish its
//! outcome; older results are dropped.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    error::FetchError,
    location::CoordinateSource,
    model::CurrentWeather,
    provider::WeatherProvider,
};

#[derive(Debug, Clone)]
pub enum FeedState {
    Idle,
    Loading,
    Ready {
        reading: CurrentWeather,
        fetched_at: DateTime<Utc>,
    },
    Failed(Arc<FetchError>),
}

impl FeedState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

pub struct WeatherFeed {
    provider: Arc<dyn WeatherProvider>,
    location: Arc<dyn CoordinateSource>,
    generation: AtomicU64,
    tx: watch::Sender<FeedState>,
}

impl WeatherFeed {
    pub fn new(provider: Arc<dyn WeatherProvider>, location: Arc<dyn CoordinateSource>) -> Self {
        let (tx, _rx) = watch::channel(FeedState::Idle);
        Self {
            provider,
            location,
            generation: AtomicU64::new(0),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.tx.subscribe()
    }

    /// Snapshot of the last published state.
    pub fn state(&self) -> FeedState {
        self.tx.borrow().clone()
    }

    /// Fetch once for the coordinates current right now.
    ///
    /// The outcome is returned to the caller even when a newer refresh has
    /// superseded it on the channel.
    pub async fn refresh(&self) -> Result<CurrentWeather, Arc<FetchError>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let coordinates = self.location.current();
        tracing::debug!(generation, %coordinates, "refresh started");

        self.publish(generation, FeedState::Loading);

        let result = self.provider.current(coordinates).await.map_err(Arc::new);

        let state = match &result {
            Ok(reading) => FeedState::Ready {
                reading: reading.clone(),
                fetched_at: Utc::now(),
            },
            Err(e) => FeedState::Failed(Arc::clone(e)),
        };
        if !self.publish(generation, state) {
            tracing::debug!(generation, "dropping stale weather result");
        }
        result
    }

    /// Run [`refresh`](Self::refresh) on the runtime without waiting for it.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let feed = Arc::clone(self);
        tokio::spawn(async move {
            let _ = feed.refresh().await;
        })
    }

    /// Write `state` only if `generation` is still the newest refresh.
    ///
    /// The check runs under the channel's lock, so a newer refresh cannot
    /// publish between the check and the write.
    fn publish(&self, generation: u64, state: FeedState) -> bool {
        self.tx.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = state;
            true
        })
    }
}
