//! Command implementations.

use crate::cli::{AddCreditsArgs, ClassifyArgs, ConfigCommand, LookupArgs};
use crate::render::render_report;
use anyhow::{bail, Context, Result};
use atlas_auth::{
    ensure_credit_grant, CreditAdmin, CreditPolicy, MemorySessionProvider, MetadataPatch,
    SessionProvider,
};
use atlas_core::{AppConfig, CreditBalance};
use atlas_lookup::{classify, LookupOrchestrator, Query};
use std::sync::Arc;

/// Account the local session runs as.
const LOCAL_OPERATIVE: &str = "operative@atlas.local";
/// Password for accounts that only exist for the lifetime of one command.
const LOCAL_PASSWORD: &str = "atlas-local";

fn load_config() -> Result<AppConfig> {
    let config = AppConfig::load_with_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub fn classify_query(args: &ClassifyArgs) -> Result<()> {
    let text = args.text.trim();
    if text.is_empty() {
        bail!("Nothing to classify: the query is empty");
    }
    println!("{}", classify(text));
    Ok(())
}

pub async fn lookup(args: LookupArgs) -> Result<()> {
    let config = load_config()?;
    let policy = CreditPolicy::from(&config.credits);
    let provider = Arc::new(MemorySessionProvider::new(policy.clone()));

    let session = provider
        .sign_up(LOCAL_OPERATIVE, LOCAL_PASSWORD, None)
        .await
        .context("Failed to start local session")?;

    let balance = if args.unlimited {
        CreditBalance::Unbounded
    } else if let Some(credits) = args.credits {
        let session = provider.update_metadata(MetadataPatch::credits(credits)).await?;
        policy.balance_for(&session)
    } else {
        let session = ensure_credit_grant(provider.as_ref(), session, &policy).await?;
        policy.balance_for(&session)
    };
    tracing::debug!("Local session balance: {}", balance);

    let orchestrator =
        LookupOrchestrator::from_config(&config)?.with_session_provider(provider.clone());
    let query = Query::new(args.query, args.kind);

    let Some(outcome) = orchestrator.execute(&query, balance).await else {
        bail!("Nothing to look up: the query is empty");
    };

    match outcome.result {
        Ok(report) if args.json => {
            let value = serde_json::json!({
                "kind": outcome.kind,
                "balance": outcome.balance,
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Ok(report) => {
            print!("{}", render_report(&report));
            println!();
            println!("Remaining credit: {}", outcome.balance);
        }
        Err(e) => {
            eprintln!("Remaining credit: {}", outcome.balance);
            bail!("[{}] {}", e.code(), e.user_message());
        }
    }

    Ok(())
}

pub fn config(command: &ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Path => {
            println!("{}", AppConfig::config_path()?.display());
        }
        ConfigCommand::Show => {
            let config = load_config()?;
            print!("{}", config.to_toml()?);
            let key_state = if config.breach.api_key.is_some() {
                "set"
            } else {
                "unset"
            };
            println!("# breach api key: {key_state} (ATLAS_BREACH_API_KEY)");
        }
    }
    Ok(())
}

pub async fn add_credits(args: AddCreditsArgs) -> Result<()> {
    let config = load_config()?;
    let policy = CreditPolicy::from(&config.credits);
    let (before, after) =
        credit_account(policy, &args.email, args.amount, args.caller.as_deref()).await?;
    println!("{}: {} -> {}", args.email, before, after);
    Ok(())
}

/// Register `target`, then credit it as `caller` (the administrator by
/// default). Returns the target's balance before and after.
async fn credit_account(
    policy: CreditPolicy,
    target: &str,
    amount: u32,
    caller: Option<&str>,
) -> Result<(CreditBalance, CreditBalance)> {
    let Some(admin) = policy.admin_email.clone() else {
        bail!("No administrator configured (set credits.admin_email or ATLAS_ADMIN_EMAIL)");
    };
    let provider = MemorySessionProvider::new(policy.clone());

    // The target has to exist before it can be credited.
    let session = provider
        .sign_up(target, LOCAL_PASSWORD, None)
        .await
        .context("Failed to register target account")?;
    ensure_credit_grant(&provider, session, &policy).await?;
    provider.sign_out().await?;

    let before = provider.balance_of(target).await?;

    let caller = caller.unwrap_or(admin.as_str());
    if caller.trim().eq_ignore_ascii_case(target.trim()) {
        provider
            .sign_in(caller, LOCAL_PASSWORD)
            .await
            .context("Failed to sign in calling account")?;
    } else {
        provider
            .sign_up(caller, LOCAL_PASSWORD, None)
            .await
            .context("Failed to register calling account")?;
    }
    provider.add_credits(target, amount).await?;

    let after = provider.balance_of(target).await?;
    Ok((before, after))
}
