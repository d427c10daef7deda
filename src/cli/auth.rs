use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::Config, spotify, types::PkceToken};

pub async fn auth(config: Arc<Config>, shared_state: Arc<Mutex<Option<PkceToken>>>) {
    spotify::auth::auth(config, shared_state).await;
}
