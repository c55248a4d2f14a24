use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::emulator::Emulator;
use crate::handles::emulator_router;
use crate::settings::Settings;
use crate::simulate::IlluminationModel;

pub mod emulator;
pub mod handles;
pub mod settings;
pub mod simulate;

pub fn create_app(emulator: Arc<Emulator>) -> Router {
    emulator_router(emulator).layer(TraceLayer::new_for_http())
}

pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn Error>> {
    let model = IlluminationModel::new(settings.emulator.utc_offset()?);
    let rng = match settings.emulator.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let emulator = Arc::new(Emulator::new(
        model,
        rng,
        settings.emulator.command_delay_ms(),
    ));

    let ip_addr = settings.server.host.parse::<IpAddr>()?;
    let address = SocketAddr::from((ip_addr, settings.server.port));
    let listener = TcpListener::bind(&address).await?;

    tracing::info!("emulator listening on {:?}", address);

    axum::serve(listener, create_app(emulator)).await?;

    Ok(())
}
