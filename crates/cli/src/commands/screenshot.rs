use std::path::Path;

use nordbook::{BookingService, Result};

pub async fn execute(service: &BookingService, url: &str, output: &Path) -> Result<()> {
    service.screenshot(url, output).await?;
    println!("saved {}", output.display());
    Ok(())
}
