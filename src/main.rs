// SPDX-License-Identifier: MPL-2.0
use lens_view::app::{self, Flags};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
lens_view

USAGE:
  lens_view [OPTIONS] [FILE]

OPTIONS:
  --config FILE   Read settings from FILE instead of the default location
  --play          Start animations playing instead of paused
  -h, --help      Print this help
";

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let config_path = match args.opt_value_from_os_str("--config", |s| {
        Ok::<PathBuf, std::convert::Infallible>(PathBuf::from(s))
    }) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("{err}\n\n{HELP}");
            std::process::exit(2);
        }
    };
    let play = args.contains("--play");
    let file_path = args.finish().into_iter().next().map(PathBuf::from);

    tracing::debug!(?file_path, ?config_path, play, "starting");

    app::run(Flags {
        file_path,
        config_path,
        play,
    })
}
