use nordbook::{BookingService, Result};

pub async fn execute(service: &BookingService) -> Result<()> {
    let status = service.login_status().await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
