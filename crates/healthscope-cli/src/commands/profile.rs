//! Profile and account command implementations

use anyhow::{Context, Result};
use healthscope_core::{onboarding, AccountService, Confirmation, OnboardingDraft, PersistenceStore};

pub fn cmd_onboard(
    store: &PersistenceStore,
    name: &str,
    age: Option<&str>,
    email: Option<&str>,
) -> Result<()> {
    if store.has_completed_onboarding() {
        println!("⚠️  A profile already exists. It will be replaced.");
    }

    let draft = OnboardingDraft {
        name: name.to_string(),
        age: age.unwrap_or_default().to_string(),
        email: email.unwrap_or_default().to_string(),
    };
    let profile = onboarding::complete(&draft, store).context("Could not create profile")?;

    println!("✅ Welcome, {}!", profile.name);
    println!();
    println!("Next steps:");
    println!("  1. Log a symptom: healthscope log headache --severity mild");
    println!("  2. See insights: healthscope insights");

    Ok(())
}

pub fn cmd_profile(store: &PersistenceStore) -> Result<()> {
    let Some(profile) = store.load_profile() else {
        println!("No profile yet. Create one with:");
        println!("  healthscope onboard --name <NAME>");
        return Ok(());
    };

    println!();
    println!("👤 Profile");
    println!("   ─────────────────────────────");
    println!("   Name:          {}", profile.name);
    if let Some(age) = profile.age {
        println!("   Age:           {}", age);
    }
    if let Some(email) = &profile.email {
        println!("   Email:         {}", email);
    }
    println!(
        "   Member since:  {}",
        profile.created_at.format("%b %-d, %Y")
    );
    println!(
        "   Notifications: {}",
        if profile.notifications_enabled {
            "on"
        } else {
            "off"
        }
    );

    Ok(())
}

pub fn cmd_notifications(account: &AccountService, enabled: bool) -> Result<()> {
    account
        .set_notifications_enabled(enabled)
        .context("No profile yet; run 'healthscope onboard' first")?;
    println!(
        "🔔 Notifications {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub fn cmd_reset(account: &AccountService, confirmation: Confirmation) -> Result<()> {
    if account.reset_symptoms(confirmation)? {
        println!("✅ All symptom data deleted");
    } else {
        println!("Cancelled");
    }
    Ok(())
}

pub fn cmd_delete_account(account: &AccountService, confirmation: Confirmation) -> Result<()> {
    if account.delete_account(confirmation)? {
        println!("✅ Account deleted. Run 'healthscope onboard' to start over.");
    } else {
        println!("Cancelled");
    }
    Ok(())
}
