//! Activation and session maintenance commands.

use crate::context::AppContext;
use anyhow::{Result, anyhow};
use chrono::{Local, TimeZone};
use lingo_core::error::ActivationError;
use lingo_core::session::{Session, redact_token};

fn format_expiry(expires_at_ms: i64) -> String {
    Local
        .timestamp_millis_opt(expires_at_ms)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| expires_at_ms.to_string())
}

fn print_session(session: &Session, now_ms: i64) {
    match (&session.token, session.remaining_minutes_at(now_ms)) {
        (Some(token), Some(minutes)) => {
            println!("✅ Authorized");
            println!("  token:     {}", redact_token(token));
            if let Some(expires) = session.expires_at_ms {
                println!("  expires:   {} ({} min left)", format_expiry(expires), minutes);
            }
        }
        _ => println!("❌ Not authorized"),
    }
    println!("  device id: {}", session.device_id);
}

pub async fn activate(ctx: &AppContext, code: &str, user_id: i64) -> Result<()> {
    let code = code.trim();
    if code.is_empty() {
        return Err(anyhow!("Please enter an activation code"));
    }

    let device_id = ctx.session.device_id();
    match ctx.session.activate(code, user_id, &device_id).await {
        Ok(session) => {
            print_session(&session, ctx.session.now_ms());
            Ok(())
        }
        Err(ActivationError::Rejected(reason)) => Err(anyhow!("Activation rejected: {}", reason)),
        Err(ActivationError::Network(detail)) => {
            Err(anyhow!("Network error, please try again ({})", detail))
        }
    }
}

pub async fn status(ctx: &AppContext) -> Result<()> {
    let session = ctx.session.restore().await?;
    print_session(&session, ctx.session.now_ms());
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.invalidate().await?;
    println!("🔒 Stored authorization cleared");
    Ok(())
}

/// Asks the backend whether `user_id` is already activated and adopts the
/// returned token when it is.
pub async fn check(ctx: &AppContext, user_id: i64) -> Result<()> {
    match ctx.backend.check_status(user_id).await {
        Ok(grant) => {
            let session = ctx.session.adopt_grant(grant).await;
            print_session(&session, ctx.session.now_ms());
            Ok(())
        }
        Err(ActivationError::Rejected(reason)) => {
            println!("❌ Not activated: {}", reason);
            Ok(())
        }
        Err(ActivationError::Network(detail)) => Err(anyhow!("Status check failed: {}", detail)),
    }
}
