mod actions;
mod app;
mod config;
mod destination;
mod error;
mod key_listener;
mod navigation;
mod scanner;
mod viewer;

fn main() -> iced::Result {
    env_logger::init();
    app::run()
}
