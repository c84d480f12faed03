use log::{error, info};
use tenancy::town::{scenarios, Settings, Town};

fn init_logging() {
    env_logger::init();
}

fn main() {
    init_logging();

    // Echo by default; a settings file or TENANCY_ECHO can turn it off.
    let town = Town::new(Settings::load_or(Settings::echoing()));
    let summary = scenarios::run_all(&town);
    info!("{:#?}", summary);

    if town.settings().dump_journal {
        match town.journal().to_json() {
            Ok(json) => println!("{json}"),
            Err(err) => error!("Could not serialize journal: {}", err),
        }
    }
}
