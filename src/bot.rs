use std::net::SocketAddr;

use teloxide::prelude::*;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::error::BotResult;
use crate::handler::get_handler;
use crate::server::{self, ServerState};
use crate::state::AppState;
use crate::utils::http;

pub struct BotService {
    pub bot: Bot,
    pub app_state: AppState,
}

impl BotService {
    pub async fn new(config: AppConfig) -> BotResult<Self> {
        info!("Initializing AppState...");
        let app_state = AppState::new(config).await?;
        info!("AppState initialized");

        let bot = http::create_telegram_bot(app_state.config.telegram.0.clone())?;

        Ok(Self { bot, app_state })
    }

    pub async fn start(self, addr: SocketAddr) -> BotResult<()> {
        info!("Testing connection to Telegram API...");
        let me = match self.bot.get_me().await {
            Ok(me) => {
                info!("Successfully connected to Telegram API as @{}", me.username());
                me
            }
            Err(e) => {
                error!("Failed to connect to Telegram API: {:?}", e);
                return Err(e.into());
            }
        };

        if let Err(e) = crate::command::setup_user_commands(&self.bot).await {
            warn!("Failed to register bot commands: {}", e);
        }

        let router = server::router(ServerState {
            bot: self.bot,
            me,
            handler: get_handler(),
            app_state: self.app_state,
            client: http::create_api_client()?,
        });

        info!("Listening for webhooks on {}", addr);
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

#[shuttle_runtime::async_trait]
impl shuttle_runtime::Service for BotService {
    async fn bind(self, addr: SocketAddr) -> Result<(), shuttle_runtime::Error> {
        self.start(addr).await?;
        Ok(())
    }
}
