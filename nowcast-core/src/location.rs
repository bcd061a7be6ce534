//! Where the coordinates for a fetch come from.
//!
//! A source is read synchronously at fetch time. A live source may still be
//! answering with its fallback when that happens.

use tokio::sync::watch;

use crate::model::Coordinates;

/// Fallback used when no location is configured and no fix has arrived.
pub const SANTA_MONICA: Coordinates = Coordinates::new(34.0194704, -118.4912273);

pub trait CoordinateSource: Send + Sync {
    fn current(&self) -> Coordinates;
}

/// Always answers with the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

impl CoordinateSource for FixedLocation {
    fn current(&self) -> Coordinates {
        self.0
    }
}

/// Coordinates fed by an external sensor, with a fallback until the first fix.
#[derive(Debug)]
pub struct LiveLocation {
    fallback: Coordinates,
    tx: watch::Sender<Option<Coordinates>>,
}

impl LiveLocation {
    pub fn new(fallback: Coordinates) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { fallback, tx }
    }

    /// Record a new fix from the sensor.
    pub fn update(&self, coordinates: Coordinates) {
        tracing::debug!(%coordinates, "location fix updated");
        self.tx.send_replace(Some(coordinates));
    }

    pub fn has_fix(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Receiver that sees every later fix, for callers that want to refresh on movement.
    pub fn watch(&self) -> watch::Receiver<Option<Coordinates>> {
        self.tx.subscribe()
    }
}

impl Default for LiveLocation {
    fn default() -> Self {
        Self::new(SANTA_MONICA)
    }
}

impl CoordinateSource for LiveLocation {
    fn current(&self) -> Coordinates {
        self.tx.borrow().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_location_is_constant() {
        let src = FixedLocation(Coordinates::new(1.5, -2.5));
        assert_eq!(src.current(), Coordinates::new(1.5, -2.5));
        assert_eq!(src.current(), src.current());
    }

    #[test]
    fn live_location_falls_back_until_fix() {
        let src = LiveLocation::default();
        assert!(!src.has_fix());
        assert_eq!(src.current(), SANTA_MONICA);

        src.update(Coordinates::new(51.5, -0.12));
        assert!(src.has_fix());
        assert_eq!(src.current(), Coordinates::new(51.5, -0.12));

        src.update(Coordinates::new(48.85, 2.35));
        assert_eq!(src.current(), Coordinates::new(48.85, 2.35));
    }

    #[tokio::test]
    async fn live_location_notifies_watchers() {
        let src = LiveLocation::default();
        let mut rx = src.watch();

        src.update(Coordinates::new(10.0, 20.0));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(Coordinates::new(10.0, 20.0)));
    }
}
