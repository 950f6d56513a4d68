use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::OnceLock,
};

use anyhow::Result;
use reqwest::Response;
use serde_json::Value;
use tokio::net::TcpListener;
use waitlist::{
    config::get_or_init_config, database::DbManager, init_dbg_tracing, App, AppState,
    TemplateManager,
};

/// Trying to bind port 0 will trigger an OS scan for an available port
/// which will then be bound to the application.
const TEST_SOCK_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 0);

pub struct TestApp {
    pub addr: SocketAddr,
    pub http_client: reqwest::Client,
    pub dm: DbManager,
}

/// Set `TEST_LOG` to see the application logs while testing.
fn init_test_subscriber() {
    static SUBSCRIBER: OnceLock<()> = OnceLock::new();
    SUBSCRIBER.get_or_init(|| {
        if std::env::var("TEST_LOG").is_ok() {
            init_dbg_tracing();
        }
    });
}

impl TestApp {
    /// Spawns the app on a random port, backed by a freshly created and migrated database.
    pub async fn spawn() -> Result<Self> {
        init_test_subscriber();

        let config = get_or_init_config();
        let dm = DbManager::test_init(config).await?;
        let app_state = AppState::new(
            dm.clone(),
            TemplateManager::init(),
            config.page_config.clone(),
        );

        let listener = TcpListener::bind(TEST_SOCK_ADDR).await?;
        let addr = listener.local_addr()?;

        tokio::spawn(waitlist::serve(App::new(app_state, listener)));

        Ok(TestApp {
            addr,
            http_client: reqwest::Client::new(),
            dm,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn post_waitlist(&self, body: &Value) -> Result<Response> {
        let res = self
            .http_client
            .post(format!("{}/api/waitlist", self.base_url()))
            .json(body)
            .send()
            .await?;
        Ok(res)
    }

    /// Posts the body as is, without a `Content-Type` header.
    pub async fn post_waitlist_raw(&self, body: &'static str) -> Result<Response> {
        let res = self
            .http_client
            .post(format!("{}/api/waitlist", self.base_url()))
            .body(body)
            .send()
            .await?;
        Ok(res)
    }

    pub async fn stored_emails(&self) -> Result<Vec<String>> {
        let emails = sqlx::query_scalar("SELECT email FROM waitlist ORDER BY email")
            .fetch_all(self.dm.db())
            .await?;
        Ok(emails)
    }
}
