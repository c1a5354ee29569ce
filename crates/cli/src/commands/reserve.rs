use nordbook::{BookingService, ReservationOutcome, Result};

pub async fn execute(service: &BookingService, url: &str) -> Result<()> {
    match service.make_reservation(url).await? {
        ReservationOutcome::Confirmed { receipt } => {
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        ReservationOutcome::NotConfirmed => {
            println!("reservation not confirmed: the site did not produce a receipt");
        }
        ReservationOutcome::Unknown => {
            println!(
                "reservation outcome unknown: the confirmation never loaded; \
                 check your existing reservations before retrying"
            );
        }
    }
    Ok(())
}
