mod app;
mod cat;
mod click;
mod config;
mod debug;
mod ecs;
mod feedback;
mod render;
mod schedule;
mod session;

fn main() {
    env_logger::init();
    log::info!("Silly Cats starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
