use std::sync::Arc;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tokio::sync::Mutex;

use crate::admin::{AdminGate, AdminSessions};
use crate::auth::session::SESSION_TTL;
use crate::auth::UserSessions;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::db::blob_store::BlobStore;
use crate::planner::{PlanTrackers, Planner};

pub type DbPool = Pool<SqliteConnectionManager>;

/// How long an idle visitor's planner result is kept.
const PLAN_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: CatalogStore,
    pub admin_gate: Arc<AdminGate>,
    pub admin_sessions: Arc<Mutex<AdminSessions>>,
    pub users: Arc<Mutex<UserSessions>>,
    pub planner: Arc<dyn Planner>,
    /// One planner run tracker per visitor cookie.
    pub plans: Arc<Mutex<PlanTrackers>>,
}

impl AppState {
    pub fn new(
        config: Config,
        blobs: Arc<dyn BlobStore>,
        planner: Arc<dyn Planner>,
        admin_gate: AdminGate,
    ) -> Self {
        let session_ttl = config.admin.session_ttl();
        Self {
            config,
            catalog: CatalogStore::new(blobs),
            admin_gate: Arc::new(admin_gate),
            admin_sessions: Arc::new(Mutex::new(AdminSessions::new(session_ttl))),
            users: Arc::new(Mutex::new(UserSessions::new(SESSION_TTL))),
            planner,
            plans: Arc::new(Mutex::new(PlanTrackers::new(PLAN_IDLE_TTL))),
        }
    }
}
