use tabled::Table;

use crate::{
    config, error, lineup as festival_lineup, success, types::LineupTableRow, utils,
    warning,
};

pub async fn lineup(url: Option<String>) {
    let url = super::lineup_url(url, config::lineup_url_from_env());
    let artists = load_lineup(&url).await;

    if artists.is_empty() {
        warning!("No artists found in lineup {}", url);
        return;
    }

    let table_rows: Vec<LineupTableRow> = artists
        .into_iter()
        .map(|artist| LineupTableRow { artist })
        .collect();

    println!("{}", Table::new(table_rows));
}

pub(super) async fn load_lineup(url: &str) -> Vec<String> {
    let pb = utils::spinner("Fetching festival lineup...");

    match festival_lineup::fetch_lineup(url).await {
        Ok(artists) => {
            pb.finish_and_clear();
            success!("Found {} artists in lineup", artists.len());
            artists
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch lineup from {}: {}", url, e);
        }
    }
}
