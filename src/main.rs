//! `curvecut [--config <file.json>] [data.csv]`

use curvecut::{run_curvecut, CurveCutApp, CurveCutConfig};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config_path = None;
    let mut data_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => config_path = args.next(),
            _ => data_path = Some(arg),
        }
    }

    let config = match config_path {
        Some(path) => CurveCutConfig::from_json_path(&path).unwrap_or_else(|e| {
            error!(path = %path, error = %e, "failed to read configuration, using defaults");
            CurveCutConfig::default()
        }),
        None => CurveCutConfig::default(),
    };

    let mut app = CurveCutApp::new(config);
    if let Some(path) = data_path {
        if let Err(e) = app.preload(&path) {
            warn!(path = %path, error = %e, "failed to preload data");
        }
    }
    run_curvecut(app)
}
