use fitlog::{Credentials, FitlogClient};
use std::env;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::from_filename("./fitlog/.env.local").ok();

    let email = env::var("FITLOG_EMAIL").expect("FITLOG_EMAIL must be set");
    let password = env::var("FITLOG_PASSWORD").expect("FITLOG_PASSWORD must be set");

    let client = FitlogClient::from_env();
    let auth = client.sign_in(&Credentials::new(&email, &password)?).await?;
    client.set_token(Some(auth.access_token));

    let activities = client.list_activities().await?;
    println!("{} activities:", activities.len());
    for activity in &activities {
        println!(
            "#{} {} | {:>3} min | {:<5} | {}",
            activity.id.unwrap_or_default(),
            activity.date_display(),
            activity.duration_minutes,
            activity.intensity,
            activity.activity_type,
        );
    }

    Ok(())
}
