use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::parse_duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to an optional TOML configuration file
    #[arg(long, short, env = "VAULT_INITIALIZE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Vault API address (overrides VAULT_ADDR)
    #[arg(long)]
    pub vault_addr: Option<String>,

    /// Delay between health checks, e.g. 10s or 1m (overrides CHECK_INTERVAL)
    #[arg(long, value_parser = parse_duration)]
    pub check_interval: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_overrides() {
        let args = Args::try_parse_from([
            "vault-initialize",
            "--vault-addr",
            "http://vault:8200",
            "--check-interval",
            "2m",
        ])
        .unwrap();
        assert_eq!(args.vault_addr.as_deref(), Some("http://vault:8200"));
        assert_eq!(args.check_interval, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_rejects_bad_interval() {
        assert!(Args::try_parse_from(["vault-initialize", "--check-interval", "later"]).is_err());
    }
}
