//! Device location service boundary.

use crate::polling::LocationError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Source of device positions. Either call may be slow or fail.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_permission(&self) -> Result<Permission, LocationError>;

    async fn current_position(&self) -> Result<Position, LocationError>;
}

#[derive(Debug, Clone)]
enum Step {
    At { latitude: f64, longitude: f64 },
    Fail(LocationError),
    Hang,
}

/// Replays a fixed script of samples.
///
/// Once the script runs out, the last position is repeated (or an error returned if
/// there never was one). `Hang` steps never resolve, which exercises the caller's
/// timeout.
pub struct ScriptedLocationProvider {
    permission: Result<Permission, LocationError>,
    script: Mutex<VecDeque<Step>>,
    last: Mutex<Option<(f64, f64)>>,
    permission_requests: AtomicUsize,
    samples: AtomicUsize,
}

impl ScriptedLocationProvider {
    fn with_permission(permission: Result<Permission, LocationError>) -> Self {
        Self {
            permission,
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            permission_requests: AtomicUsize::new(0),
            samples: AtomicUsize::new(0),
        }
    }

    pub fn granted() -> Self {
        Self::with_permission(Ok(Permission::Granted))
    }

    pub fn denied() -> Self {
        Self::with_permission(Ok(Permission::Denied))
    }

    pub fn unavailable(error: LocationError) -> Self {
        Self::with_permission(Err(error))
    }

    pub fn then_position(self, latitude: f64, longitude: f64) -> Self {
        self.script.lock().push_back(Step::At {
            latitude,
            longitude,
        });
        self
    }

    pub fn then_failure(self, error: LocationError) -> Self {
        self.script.lock().push_back(Step::Fail(error));
        self
    }

    pub fn then_hang(self) -> Self {
        self.script.lock().push_back(Step::Hang);
        self
    }

    /// Appends every coordinate of a route, in order.
    pub fn route(self, points: &[(f64, f64)]) -> Self {
        points
            .iter()
            .fold(self, |provider, &(lat, lon)| provider.then_position(lat, lon))
    }

    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    /// How many times a position was asked for, including failed and hung samples.
    pub fn samples_taken(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocationProvider {
    async fn request_permission(&self) -> Result<Permission, LocationError> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        self.permission.clone()
    }

    async fn current_position(&self) -> Result<Position, LocationError> {
        self.samples.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().pop_front();
        let (latitude, longitude) = match step {
            Some(Step::At {
                latitude,
                longitude,
            }) => {
                *self.last.lock() = Some((latitude, longitude));
                (latitude, longitude)
            }
            Some(Step::Fail(error)) => return Err(error),
            Some(Step::Hang) => std::future::pending().await,
            None => (*self.last.lock()).ok_or_else(|| {
                LocationError::Transport("no position available".to_string())
            })?,
        };
        Ok(Position {
            latitude,
            longitude,
            timestamp: Utc::now(),
        })
    }
}
