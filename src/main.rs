use std::env;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dota2_match_info::db::ResultCache;
use dota2_match_info::{Config, FieldSelector, MatchInfoService};

const USAGE: &str = "usage: dota2-match-info <match_id> [field ...]";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dota2_match_info=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse arguments
    let args: Vec<String> = env::args().skip(1).collect();
    let (match_id, fields) = parse_args(&args)?;

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Initialize cache
    let cache = ResultCache::new(&config.database_url, config.cache_ttl_secs).await?;

    let service = MatchInfoService::new(&config, cache)?;

    let outcome = service.get_match_info(match_id, &fields).await;
    service.cache().close().await;

    match outcome {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            error!("Failed to get match {}: {}", match_id, e);
            Err(e.into())
        }
    }
}

/// Match id first, then field group names; no names means every group
fn parse_args(args: &[String]) -> Result<(i64, FieldSelector)> {
    let raw_id = args.first().context(USAGE)?;
    let match_id: i64 = raw_id
        .trim()
        .parse()
        .with_context(|| format!("match id must be a number, got '{}'", raw_id))?;

    let fields = if args.len() > 1 {
        FieldSelector::from_names(&args[1..])
    } else {
        FieldSelector::all()
    };

    Ok((match_id, fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dota2_match_info::FieldGroup;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults_to_all_fields() {
        let (match_id, fields) = parse_args(&args(&["2500623971"])).unwrap();
        assert_eq!(match_id, 2500623971);
        assert_eq!(fields, FieldSelector::all());
    }

    #[test]
    fn test_parse_args_with_fields() {
        let (_, fields) = parse_args(&args(&["1", "teams", "nope"])).unwrap();
        assert!(fields.contains(FieldGroup::Teams));
        assert_eq!(fields.iter().count(), 1);
    }

    #[test]
    fn test_parse_args_rejects_garbage() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["abc"])).is_err());
    }
}
