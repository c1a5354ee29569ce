use nordbook::{BookingError, BookingService, Credentials, Result};
use tracing::info;

const USERNAME_ENV: &str = "NORDKRAFT_USERNAME";
const PASSWORD_ENV: &str = "NORDKRAFT_PASSWORD";

pub async fn execute(
    service: &BookingService,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let credentials = resolve_credentials(username, password)?;
    info!(target = "nordbook.cli", username = %credentials.username(), "logging in");

    if service.login(&credentials).await? {
        println!("logged in as {}", credentials.username());
    } else {
        println!("login failed: the site rejected the credentials");
    }
    Ok(())
}

/// Flags win over the environment, matching how the credentials are usually
/// provisioned on the machines this runs on.
fn resolve_credentials(username: Option<String>, password: Option<String>) -> Result<Credentials> {
    let username = username
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .ok_or_else(|| {
            BookingError::InvalidParameter(format!(
                "username missing: pass --username or set {USERNAME_ENV}"
            ))
        })?;
    let password = password
        .or_else(|| std::env::var(PASSWORD_ENV).ok())
        .ok_or_else(|| {
            BookingError::InvalidParameter(format!(
                "password missing: pass --password or set {PASSWORD_ENV}"
            ))
        })?;
    Ok(Credentials::new(username, password))
}
