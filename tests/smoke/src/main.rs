#[macro_use]
extern crate log;
extern crate cases;
extern crate chrono;
extern crate env_logger;

use chrono::prelude::{DateTime, Local};
use env_logger::Env;
use std::io::Write;
use std::time::Instant;

// Election traffic is logged at debug level; the smoke run defaults to info.
fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            writeln!(buf, "{:5}: {} - {}", record.level(), now.format("%H:%M:%S.%3f"), record.args())
        })
        .init();
}

fn main() {
    init_logger();

    let started = Instant::now();
    info!("Election smoke run: three gateways on the in-process network");

    cases::smoke::run();

    info!("Election smoke run passed in {} ms", started.elapsed().as_millis());
}
