mod app;
mod audio;
mod config;
mod logging;
mod mpris;
mod playlist;
mod runtime;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
