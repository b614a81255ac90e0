//! Mint a development token.

use clap::Args;

use campus_auth::JwtEncoder;
use campus_core::config::AppConfig;
use campus_core::error::AppError;
use campus_core::{Actor, ActorKind};

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Actor ID
    #[arg(long)]
    pub id: i64,

    /// Actor kind: primary or operator
    #[arg(long)]
    pub kind: ActorKind,

    /// Display name carried in the token
    #[arg(long)]
    pub name: Option<String>,
}

/// Execute the token command
pub fn execute(args: &TokenArgs, config: &AppConfig) -> Result<(), AppError> {
    let encoder = JwtEncoder::new(&config.auth);
    let token = encoder.issue(Actor::new(args.id, args.kind), args.name.as_deref())?;
    println!("{token}");
    Ok(())
}
