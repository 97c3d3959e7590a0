pub mod catalog;
pub mod cli;
mod config;
pub mod domain;
pub mod enrich;
pub mod extract;
pub mod manifest;
pub mod remote;
pub mod sync;

fn main() {
    env_logger::init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
