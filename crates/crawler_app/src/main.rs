mod cli;
mod logging;
mod report;
mod settings;

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crawler_engine::build_image_crawler;
use engine_logging::{engine_info, engine_warn};
use log::LevelFilter;
use url::Url;

use crate::cli::Cli;
use crate::report::CrawlSummary;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log, level);

    let config = settings::resolve(&cli)?;
    let seed = Url::parse(&cli.seed).with_context(|| format!("invalid seed url {}", cli.seed))?;
    let mut crawler = build_image_crawler(&config).context("starting crawler")?;

    engine_info!(
        "Crawling {} within {} using {} workers, saving to {}",
        seed,
        config.scope,
        config.threads,
        config.destination_root.display()
    );
    if !crawler.start(seed.clone()) {
        engine_warn!("Seed {} was refused by scope {}", seed, config.scope);
    }

    let mut summary = CrawlSummary::default();
    if cli.until_idle {
        while !crawler.wait_idle(POLL_INTERVAL) {
            summary.drain(&crawler);
        }
    } else {
        println!("Crawler started, press Enter to stop...");
        let enter = wait_for_enter();
        loop {
            summary.drain(&crawler);
            match enter.recv_timeout(POLL_INTERVAL) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    crawler.stop();
    summary.drain(&crawler);
    println!("{summary}");
    Ok(())
}

fn wait_for_enter() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        let _ = tx.send(());
    });
    rx
}
