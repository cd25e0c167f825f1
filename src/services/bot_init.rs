use serenity::client::Context;
use serenity::model::gateway::Ready;
use tracing::info;

pub async fn ready(_ctx: &Context, ready: &Ready) {
    info!("Logged in as {} on {} guild(s)", ready.user.name, ready.guilds.len());
}
