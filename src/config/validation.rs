use anyhow::Result;

use super::Settings;

pub(crate) fn validate_settings(settings: &Settings) -> Result<()> {
    validate_required(settings.secret_id.as_deref(), "SECRET_ID")?;
    validate_required(settings.project_id.as_deref(), "PROJECT_ID")?;
    if settings.vault_addr.trim().is_empty() {
        anyhow::bail!("vault_addr must not be empty");
    }
    if settings.check_interval.is_zero() {
        anyhow::bail!("check_interval must be greater than 0");
    }
    if settings.request_timeout.is_zero() {
        anyhow::bail!("request_timeout must be greater than 0");
    }
    validate_shares(
        settings.secret_shares,
        settings.secret_threshold,
        "secret_shares",
        "secret_threshold",
    )?;
    validate_shares(
        settings.recovery_shares,
        settings.recovery_threshold,
        "recovery_shares",
        "recovery_threshold",
    )?;
    if settings.kube_namespace.trim().is_empty() {
        anyhow::bail!("kube_namespace must not be empty");
    }
    if settings.kube_secret_key.trim().is_empty() {
        anyhow::bail!("kube_secret_key must not be empty");
    }
    Ok(())
}

fn validate_required(value: Option<&str>, name: &str) -> Result<()> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => anyhow::bail!("{name} must be set and not empty"),
    }
}

fn validate_shares(shares: u8, threshold: u8, shares_label: &str, threshold_label: &str) -> Result<()> {
    if shares == 0 {
        anyhow::bail!("{shares_label} must be greater than 0");
    }
    if threshold == 0 || threshold > shares {
        anyhow::bail!("{threshold_label} must be between 1 and {shares_label}");
    }
    Ok(())
}
