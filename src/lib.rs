pub mod clients;
pub mod config;
pub mod distance;
pub mod error;
pub mod gazetteer;
pub mod handlers;
pub mod middleware;
pub mod payment;
pub mod pricing;
pub mod routes;
pub mod session;
pub mod store;
pub mod utils;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, AppResult};

use clients::nominatim::NominatimClient;
use distance::DistanceEstimator;
use session::SessionStore;
use store::LocalStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub geocoder: NominatimClient,
    pub estimator: DistanceEstimator,
    pub sessions: SessionStore,
    pub store: Arc<LocalStore>,
}
