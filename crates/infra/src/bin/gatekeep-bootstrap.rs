//! Seeds the root admin from `ADMIN_*` environment variables and prints the
//! resulting account view.

use anyhow::{bail, Context};
use chrono::Utc;

use gatekeep_auth::Argon2Verifier;
use gatekeep_infra::{seed_root_admin, AccountService, InMemoryAccountStore, SeedOutcome, Settings};

fn main() -> anyhow::Result<()> {
    gatekeep_observability::init();

    let settings = Settings::from_env().context("failed to load settings")?;
    let Some(root) = settings.root_admin.clone() else {
        bail!("ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set");
    };

    let store = InMemoryAccountStore::new();
    let outcome = seed_root_admin(
        &store,
        &Argon2Verifier,
        &root,
        &settings.default_avatar,
        Utc::now(),
    )
    .context("failed to seed root admin")?;
    let id = match outcome {
        SeedOutcome::Created(id) | SeedOutcome::AlreadyPresent(id) => id,
    };

    let service = AccountService::with_defaults(store, settings);
    let view = service.get_account(id).context("seeded root admin not readable")?;
    tracing::info!(account_id = %id, "bootstrap complete");

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
