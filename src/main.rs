mod error;
mod forward;
mod log;
mod params;
mod utils;
mod web;

use crate::params::NetParams;

#[tokio::main]
async fn main() {
    // one random draw at startup; requests that omit parameters fall back to it
    let initial = NetParams::new_random();
    log::info("🧠 Initial network parameters drawn");

    web::start_web_server(initial).await;
}
