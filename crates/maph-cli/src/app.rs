use anyhow::Result;
use maph_application::{NavigationShell, Route, SessionContext};
use maph_core::config::ClientConfig;
use maph_core::resource::ResourceClient;
use maph_core::session::Session;
use maph_infrastructure::{ConfigService, FileKeyValueStore, HttpApiClient, MaphPaths};
use std::sync::Arc;

/// Everything a command needs, wired once per invocation.
pub struct App {
    pub config: ClientConfig,
    pub shell: NavigationShell,
    client: Arc<HttpApiClient>,
}

impl App {
    /// Loads the config, builds the HTTP client and restores any stored
    /// session.
    pub async fn start(paths: &MaphPaths) -> Result<Self> {
        let config = ConfigService::new(paths.config_file()).load()?;
        tracing::debug!("[Bootstrap] Backend at {}", config.base_url());

        let client = Arc::new(HttpApiClient::new(&config)?);
        let store = Arc::new(FileKeyValueStore::new(paths.session_file()));
        let context = Arc::new(SessionContext::new(client.clone(), store));

        let shell = NavigationShell::new(context);
        let landing = shell.start().await?;
        tracing::debug!("[Bootstrap] Landed on {}", landing);

        Ok(Self {
            config,
            shell,
            client,
        })
    }

    pub fn resources(&self) -> Arc<dyn ResourceClient> {
        self.client.clone()
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        self.shell.context()
    }

    /// Navigates to an authenticated route and returns the session it runs
    /// under.
    pub async fn open(&self, route: Route) -> Result<Session> {
        self.shell.navigate(route).await?;
        Ok(self.context().require().await?)
    }
}
