use nordbook::{BookingService, Result};
use tracing::info;

pub async fn execute(service: &BookingService) -> Result<()> {
    info!(target = "nordbook.cli", "checking login state");
    let logged_in = service.check_logged_in().await?;
    println!("{}", if logged_in { "logged in" } else { "logged out" });
    Ok(())
}
