//! Headless development runner: starts the backend and the reminder
//! scheduler, then waits for Enter to shut down.

use anyhow::Result;
use log::info;

use pregnancy_tracker_backend::domain::SchedulerConfig;
use pregnancy_tracker_backend::Backend;

fn main() -> Result<()> {
    env_logger::init();

    let backend = Backend::new()?;
    info!(
        "Backend ready, data directory: {}",
        backend.connection().base_directory().display()
    );

    let scheduler = backend.start_scheduler(SchedulerConfig::default());
    info!("Reminder scheduler running; press Enter to stop");

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    scheduler.stop();
    Ok(())
}
