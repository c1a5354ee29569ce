mod login;
mod profile;
mod reserve;
mod screenshot;
mod status;
mod timeslots;

use nordbook::{BookingService, Result};

use crate::cli::Commands;

pub async fn dispatch(command: Commands, service: &BookingService) -> Result<()> {
    match command {
        Commands::Status => status::execute(service).await,
        Commands::Profile => profile::execute(service).await,
        Commands::Login { username, password } => {
            login::execute(service, username, password).await
        }
        Commands::Timeslots { discipline } => timeslots::execute(service, &discipline).await,
        Commands::Reserve { url } => reserve::execute(service, &url).await,
        Commands::Screenshot { url, output } => screenshot::execute(service, &url, &output).await,
    }
}
