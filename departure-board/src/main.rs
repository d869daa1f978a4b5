use std::io;
use std::process::ExitCode;

use departure_board::app::run_board;
use departure_board::client::{ConfiguredSource, DepartureClient, MockDepartureSource};
use departure_board::config::BoardConfig;
use departure_board::controller::{RefreshController, Services, SystemClock};
use departure_board::location::{FixedSensor, LocationProvider};
use departure_board::render::{RawTerminal, TerminalSink};
use crossterm::event::EventStream;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout belongs to the board.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("departure_board=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match BoardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let source = match &config.mock_file {
        Some(path) => {
            info!(path = %path.display(), "serving departures from file");
            match MockDepartureSource::from_file(path) {
                Ok(mock) => ConfiguredSource::Mock(mock),
                Err(e) => {
                    error!("failed to load mock departures: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            info!(endpoint = %config.client.endpoint(), "using departures backend");
            match DepartureClient::new(config.client.clone()) {
                Ok(client) => ConfiguredSource::Http(client),
                Err(e) => {
                    error!("failed to create departures client: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    let location = match config.position {
        Some(position) => LocationProvider::new(FixedSensor::new(position)),
        None => {
            info!("BOARD_LAT/BOARD_LON not set, location unavailable");
            LocationProvider::unsupported()
        }
    };
    let services = Services::new(source, location);

    let width = config.viewport_width(RawTerminal::width());
    let terminal = match RawTerminal::enter() {
        Ok(terminal) => terminal,
        Err(e) => {
            error!("failed to set up the terminal: {e}");
            return ExitCode::FAILURE;
        }
    };

    let sink = TerminalSink::new(io::stdout(), width).with_clear_screen(true);
    let controller = RefreshController::new(sink, SystemClock, services.location.is_supported())
        .with_helsinki_only(config.helsinki_only);

    run_board(controller, &services, EventStream::new(), config.refresh).await;
    drop(terminal);

    ExitCode::SUCCESS
}
