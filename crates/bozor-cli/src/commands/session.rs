use anyhow::{Context, Result};
use bozor_auth::storage::keys;
use bozor_auth::{
    AuthorizationSnapshot, FileSessionStore, Role, Session, SessionStore, SessionTokens,
    inspect_access_token,
};
use colored::Colorize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::cli::LoginArgs;
use crate::output::{print_error, print_field, print_success, token_preview};

pub async fn login(store: &FileSessionStore, args: &LoginArgs) -> Result<()> {
    if let Err(e) = inspect_access_token(&args.access) {
        print_error(&format!("Access token looks unusable: {e}"));
    }

    let tokens = SessionTokens::new(args.access.trim(), args.refresh.trim());
    Session::login(store, &tokens)
        .await
        .context("Failed to store session")?;
    print_success(&format!(
        "Session saved to {}",
        store.path().display().to_string().cyan()
    ));
    Ok(())
}

pub async fn logout(store: &FileSessionStore) -> Result<()> {
    let has_session = Session::has_access_token(store).await?
        || store.get(keys::REFRESH).await?.is_some();
    if !has_session {
        println!("No session stored at {}", store.path().display());
        return Ok(());
    }
    Session::logout(store)
        .await
        .context("Failed to clear session")?;
    print_success("Logged out (tokens and cached role removed)");
    Ok(())
}

pub async fn whoami(store: &FileSessionStore) -> Result<()> {
    print_field("Session file", &store.path().display().to_string());

    let Some(access) = store.get(keys::ACCESS).await? else {
        print_error("Not logged in");
        return Ok(());
    };
    print_field("Access token", &token_preview(&access));

    match inspect_access_token(&access) {
        Ok(info) => {
            print_field("Subject", info.subject.as_deref().unwrap_or("(none)"));
            let expires = info
                .expires_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| info.expires_at.unix_timestamp().to_string());
            let state = if info.expires_at > OffsetDateTime::now_utc() {
                "valid".green()
            } else {
                "expired".red()
            };
            print_field("Expires", &format!("{expires} ({state})"));
        }
        Err(e) => print_field("Token", &format!("{}", e.to_string().red())),
    }

    let has_refresh = store.get(keys::REFRESH).await?.is_some_and(|r| !r.is_empty());
    print_field("Refresh token", if has_refresh { "present" } else { "missing" });

    let snapshot = AuthorizationSnapshot::load(store).await?;
    let role = match snapshot.role.as_deref() {
        Some(raw) => match Role::from_backend(raw) {
            Some(role) => format!("{role} ({raw})"),
            None => raw.to_string(),
        },
        None => "(not cached)".to_string(),
    };
    print_field("Cached role", &role);
    print_field(
        "Cached company",
        if snapshot.has_company { "yes" } else { "no" },
    );
    Ok(())
}
