use nordbook::{BookingService, Discipline, Result};

pub async fn execute(service: &BookingService, discipline: &str) -> Result<()> {
    let discipline: Discipline = discipline.parse()?;
    let slots = service.list_timeslots(discipline).await?;

    if slots.is_empty() {
        println!("no timeslots posted for {discipline}");
    } else {
        println!("{}", serde_json::to_string_pretty(&slots)?);
    }
    Ok(())
}
