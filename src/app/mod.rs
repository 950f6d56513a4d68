pub mod serve;

// re-export
pub use serve::{app_router, serve, ServeError};

use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::{AppConfig, PageConfig},
    database::DbManager,
    templ_manager::TemplateManager,
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    /// Connects to the database (running the migrations if configured), parses the templates
    /// and binds the listener.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let dm = DbManager::init(&config).await?;
        if config.db_config.migrate_on_startup {
            dm.migrate().await?;
        }
        let tm = TemplateManager::init();

        let app_state = AppState::new(dm, tm, config.page_config);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        Ok(App::new(app_state, listener))
    }
}

pub struct InternalState {
    pub database_mgr: DbManager,
    pub templ_mgr: TemplateManager,
    pub page: PageConfig,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(database_mgr: DbManager, templ_mgr: TemplateManager, page: PageConfig) -> Self {
        AppState(Arc::new(InternalState {
            database_mgr,
            templ_mgr,
            page,
        }))
    }
}
