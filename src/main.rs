mod models;
mod commands;
mod parser;
mod services;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::env;
use std::error;
use std::fs;

use commands::get_framework;
use models::config::Config;
use serenity::{
    async_trait,
    client::{Context, EventHandler},
    http::Http,
    model::{
        application::command::Command,
        application::interaction::Interaction,
        gateway::{GatewayIntents, Ready},
        id::UserId,
    },
    prelude::RwLock,
};
use services::confirmations::PendingCommands;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

type Error = Box<dyn error::Error + Send + Sync>;
type ShepherdContext<'a> = poise::Context<'a, (), Error>;

struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        services::bot_init::ready(&ctx, &ready).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Some(mut component) = interaction.message_component() {
            let custom_id = component.data.custom_id.clone();
            if custom_id != commands::chat::CONFIRM_ID && custom_id != commands::chat::CANCEL_ID {
                return;
            }

            if let Err(ex) = component.defer(&ctx).await {
                error!("Failed to defer component: {}", ex);
                return;
            }

            let result = if custom_id == commands::chat::CONFIRM_ID {
                commands::chat::handle_confirm(&ctx, &mut component).await
            } else {
                commands::chat::handle_cancel(&ctx, &mut component).await
            };

            if let Err(ex) = result {
                error!("Failed to handle {}: {}", custom_id, ex);
            }
        }
    }
}

fn init_logger() -> std::io::Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::hourly("logs", "shepherd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing::subscriber::set_global_default(
        fmt::Subscriber::builder()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .with_ansi(true)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
            .with(fmt::Layer::default().with_writer(non_blocking))
    ).expect("Failed to set global subscriber");

    const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");
    info!("Initializing Shepherd v{}", VERSION.unwrap_or("<unknown>"));
    info!("Reading from {}", env::current_dir()?.display());

    Ok(guard)
}

async fn fetch_bot_info(token: &str) -> (UserId, HashSet<UserId>) {
    let http = Http::new(token);

    let (app_id, owners) = match http.get_current_application_info().await {
        Ok(info) => {
            let mut owners = HashSet::new();

            if let Some(team) = info.team {
                owners.insert(team.owner_user_id);
            } else {
                owners.insert(info.owner.id);
            }

            match http.get_current_user().await {
                Ok(app_id) => (app_id.id, owners),
                Err(ex) => panic!("Are we not a bot? {ex}")
            }
        },
        Err(ex) => panic!("Failed to fetch bot info: {ex}")
    };

    (app_id, owners)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn error::Error>> {
    let _log_guard = match init_logger() {
        Ok(guard) => Some(guard),
        Err(ex) => {
            eprintln!("Failed to initialize logger: {ex}");
            None
        }
    };

    let config_json = fs::read_to_string("config.json").expect("config.json not found");
    let config: Config = serde_json::from_str(&config_json).expect("config.json is malformed");

    let token = config.token;
    let (app_id, owners) = fetch_bot_info(&token).await;
    let framework = get_framework(&config.cmd_prefix, app_id, owners).await;

    let poise = poise::Framework::builder()
        .token(&token)
        .intents(GatewayIntents::all())
        .options(framework)
        .client_settings(move |settings| {
            settings
                .event_handler(Handler)
                .application_id(app_id.0)
        })
        .setup(move |_ctx, _ready, _framework| {
            Box::pin(async move {
                Ok(())
            })
        })
        .build()
        .await
        .expect("Failed to create client");

    {
        let serenity = poise.client();

        {
            let mut data = serenity.data.write().await;
            data.insert::<PendingCommands>(Arc::new(RwLock::new(HashMap::new())));
        }

        let commands = &poise.options().commands;
        let command_builders = poise::builtins::create_application_commands(commands);
        let try_create_commands = Command::set_global_application_commands(&serenity.cache_and_http.http, |commands| {
            *commands = command_builders;
            commands
        }).await;

        if let Err(ex) = try_create_commands {
            error!("Failed to create slash commands: {}", ex);
        }
    }

    if let Err(ex) = poise.start().await {
        error!("Discord bot client error: {:?}", ex);
    }

    Ok(())
}
