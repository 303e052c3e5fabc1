use anyhow::{bail, Result};
use fitlog::domain::{Activity, ActivityPatch, Intensity};
use fitlog::{ApiError, Credentials, FitlogClient};
use std::io::Write;

use crate::cli::Commands;
use crate::session::SessionManager;

pub async fn run(
    command: Commands,
    client: &FitlogClient,
    sessions: &SessionManager,
) -> Result<()> {
    match command {
        Commands::Login { email } => login(client, sessions, email).await,
        Commands::Register { email } => register(client, email).await,
        Commands::Logout => logout(client, sessions),
        Commands::Status => status(sessions),
        Commands::List => list(client).await,
        Commands::Show { id } => show(client, id).await,
        Commands::Add {
            activity_type,
            duration,
            date,
            intensity,
            notes,
        } => add(client, activity_type, duration, date, intensity, notes).await,
        Commands::Edit {
            id,
            activity_type,
            duration,
            date,
            intensity,
            notes,
        } => edit(client, id, activity_type, duration, date, intensity, notes).await,
        Commands::Delete { id, yes } => delete(client, id, yes).await,
    }
}

async fn login(
    client: &FitlogClient,
    sessions: &SessionManager,
    email: Option<String>,
) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;
    let credentials = Credentials::new(&email, &password)?;

    match sessions.sign_in(client, &credentials).await {
        Ok(_) => {
            println!("Signed in as {}.", credentials.email);
            Ok(())
        }
        Err(err) => match err.downcast_ref::<ApiError>() {
            Some(ApiError::Unauthorized) | Some(ApiError::Rejected(_)) => {
                bail!("Sign-in rejected: wrong email or password.")
            }
            _ => Err(err),
        },
    }
}

async fn register(client: &FitlogClient, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;
    let credentials = Credentials::registration(&email, &password)?;

    match client.sign_up(&credentials).await {
        Ok(_) => {
            println!("Account created. Sign in with `fitlog-cli login {}`.", credentials.email);
            Ok(())
        }
        Err(ApiError::Rejected(status)) => {
            bail!("Registration rejected (status {status}); the email may already be registered.")
        }
        Err(err) => Err(err.into()),
    }
}

fn logout(client: &FitlogClient, sessions: &SessionManager) -> Result<()> {
    sessions.logout(client)?;
    println!("Logged out.");
    Ok(())
}

fn status(sessions: &SessionManager) -> Result<()> {
    let session = sessions.current()?;
    match session.user_email {
        Some(email) if session.is_logged_in => println!("Signed in as {}.", email),
        _ => println!("Not signed in."),
    }
    Ok(())
}

async fn list(client: &FitlogClient) -> Result<()> {
    let activities = require_auth(client.list_activities().await)?;
    if activities.is_empty() {
        println!("No activities yet.");
        return Ok(());
    }

    for activity in &activities {
        print_activity_row(activity);
    }
    Ok(())
}

async fn show(client: &FitlogClient, id: i64) -> Result<()> {
    match client.activity(id).await {
        Ok(activity) => {
            print_activity_row(&activity);
            if let Some(notes) = activity.notes.as_deref().filter(|n| !n.is_empty()) {
                println!("    {}", notes);
            }
            Ok(())
        }
        Err(err) if err.is_not_found() => bail!("Activity {id} not found."),
        Err(err) => require_auth(Err(err)),
    }
}

async fn add(
    client: &FitlogClient,
    activity_type: String,
    duration: u32,
    date: Option<String>,
    intensity: Intensity,
    notes: Option<String>,
) -> Result<()> {
    let date = match date {
        Some(date) => validated_date(date)?,
        None => chrono::Local::now().format("%Y-%m-%d").to_string(),
    };

    let activity = Activity::new(activity_type, duration, date, intensity, notes);
    let created = require_auth(client.create_activity(&activity).await)?;
    println!("Created activity {}.", created.id.unwrap_or_default());
    print_activity_row(&created);
    Ok(())
}

async fn edit(
    client: &FitlogClient,
    id: i64,
    activity_type: Option<String>,
    duration: Option<u32>,
    date: Option<String>,
    intensity: Option<Intensity>,
    notes: Option<String>,
) -> Result<()> {
    let patch = ActivityPatch {
        activity_type,
        duration_minutes: duration,
        date: date.map(validated_date).transpose()?,
        intensity,
        notes,
    };
    if patch.is_empty() {
        bail!("Nothing to update; pass at least one field.");
    }

    match client.update_activity(id, &patch).await {
        Ok(updated) => {
            println!("Updated activity {id}.");
            print_activity_row(&updated);
            Ok(())
        }
        Err(err) if err.is_not_found() => bail!("Activity {id} not found."),
        Err(err) => require_auth(Err(err)),
    }
}

async fn delete(client: &FitlogClient, id: i64, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Delete activity {id}? [y/N] "))? {
        println!("Cancelled.");
        return Ok(());
    }

    match client.delete_activity(id).await {
        Ok(()) => {
            println!("Activity {id} deleted.");
            Ok(())
        }
        Err(err) if err.is_not_found() => bail!("Activity {id} not found."),
        Err(err) => require_auth(Err(err)),
    }
}

/// Maps the unauthorized case onto a hint about the login command.
fn require_auth<T>(result: Result<T, ApiError>) -> Result<T> {
    result.map_err(|err| match err {
        ApiError::Unauthorized => {
            anyhow::anyhow!("Session expired or missing. Run `fitlog-cli login` to authenticate.")
        }
        other => other.into(),
    })
}

fn validated_date(date: String) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("'{date}' is not a date in YYYY-MM-DD form"))?;
    Ok(date)
}

fn print_activity_row(activity: &Activity) {
    println!(
        "#{} {} | {:>3} min | {:<5} | {}",
        activity.id.unwrap_or_default(),
        activity.date_display(),
        activity.duration_minutes,
        activity.intensity,
        activity.activity_type,
    );
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm(label: &str) -> Result<bool> {
    let answer = prompt(label)?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}
