use busline_core::identity::{Credentials, SignupRequest, User};
use busline_core::CoreError;
use busline_shared::{Gender, Masked};
use clap::Args;

use crate::output::{self, OutputFormat};
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub email: String,
    /// Falls back to BUSLINE_PASSWORD
    #[arg(long, env = "BUSLINE_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub name: String,
    /// 10-digit mobile number
    #[arg(long)]
    pub mobile: String,
    /// male or female
    #[arg(long)]
    pub gender: Gender,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "BUSLINE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn signup(state: &AppState, args: &SignupArgs, format: OutputFormat) -> anyhow::Result<()> {
    let request = SignupRequest {
        email: args.email.clone(),
        password: Masked(args.password.clone()),
        name: args.name.clone(),
        mobile: args.mobile.clone(),
        gender: args.gender,
    };

    let user = state.auth().signup(request).await.map_err(explain)?;
    output::print_success(&format!("Welcome, {}! You are signed in.", user.name));
    print_user(&user, format);
    Ok(())
}

pub async fn login(state: &AppState, args: &LoginArgs, format: OutputFormat) -> anyhow::Result<()> {
    let user = state
        .auth()
        .login(Credentials::new(args.email.clone(), args.password.clone()))
        .await
        .map_err(explain)?;
    output::print_success(&format!("Signed in as {}", user.email));
    print_user(&user, format);
    Ok(())
}

pub async fn logout(state: &AppState) -> anyhow::Result<()> {
    state.auth().logout().await?;
    output::print_success("Signed out");
    Ok(())
}

pub async fn whoami(state: &AppState, format: OutputFormat) -> anyhow::Result<()> {
    match state.auth().current_user().await? {
        Some(user) => print_user(&user, format),
        None => output::print_warning("Not signed in"),
    }
    Ok(())
}

fn print_user(user: &User, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            output::print_kv("Name", &user.name);
            output::print_kv("Email", &user.email);
            output::print_kv("Mobile", &user.mobile);
            output::print_kv("Gender", user.gender.label());
        }
        OutputFormat::Json => output::print_item(user, "", format),
    }
}

/// Spell out each field error instead of the summary line
pub fn explain(err: CoreError) -> anyhow::Error {
    match err {
        CoreError::ValidationError(errors) => {
            for (field, message) in errors.iter() {
                output::print_error(&format!("{}: {}", field, message));
            }
            anyhow::anyhow!("Please correct the fields above")
        }
        other => other.into(),
    }
}

/// Signed-in user or a hint to sign in
pub async fn require_user(state: &AppState) -> anyhow::Result<User> {
    state
        .auth()
        .require_user()
        .await
        .map_err(|e| anyhow::anyhow!("{} (run `busline login`)", e))
}
