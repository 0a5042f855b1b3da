use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use routemix_client::{ClientConfig, RoutemixClient, TracingNotifier};
use routemix_core::allocation::{AllocationError, Percentage, RowEdit};
use routemix_core::editor::AllocationEditor;

/// Inspect and edit trunk load-balance allocations on a routemix server.
#[derive(Debug, Parser)]
#[command(name = "routemixctl", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the trunk directory.
    Trunks,
    /// Show the stored allocation of one load-balance trunk.
    Show { bucket: String },
    /// Replace the allocation of a load-balance trunk, e.g. `set LB-1 TrunkA=60 TrunkB=40`.
    Set {
        bucket: String,
        #[arg(required = true, value_name = "TRUNK=PERCENT")]
        shares: Vec<String>,
        /// Extra attempts for a save that fails in transit.
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Drop the allocation so the bucket reverts to the implicit default.
    Delete { bucket: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routemix_client=info,routemixctl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!(%message, "routemixctl failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), String> {
    let config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    let client = RoutemixClient::new(config).map_err(|e| e.to_string())?;

    match command {
        Command::Trunks => {
            for trunk in client.trunks().await.map_err(|e| e.to_string())? {
                println!("{}\t{}", trunk.id, trunk.trunkname);
            }
        }
        Command::Show { bucket } => {
            let rows = client
                .bucket_allocation(&bucket)
                .await
                .map_err(|e| e.to_string())?;
            if rows.is_empty() {
                println!("{bucket}: no allocation (100% to a single trunk)");
            }
            for row in rows {
                let state = if row.status { "active" } else { "inactive" };
                println!("{}\t{}%\t{}", row.trunk_name, row.percentage, state);
            }
        }
        Command::Set {
            bucket,
            shares,
            retries,
        } => {
            let shares = shares
                .iter()
                .map(|s| parse_share(s))
                .collect::<Result<Vec<_>, _>>()?;

            let retry = routemix_core::editor::RetryPolicy::bounded(
                retries + 1,
                std::time::Duration::from_secs(1),
            );
            let mut editor =
                AllocationEditor::new(client, TracingNotifier).with_retry_policy(retry);

            editor
                .select_bucket(&bucket)
                .await
                .map_err(|e| e.to_string())?;
            while !editor.rows().is_empty() {
                editor.remove_row(0).map_err(|e| e.to_string())?;
            }
            for (index, (trunk, percent)) in shares.into_iter().enumerate() {
                editor.add_row();
                editor
                    .change_row(index, RowEdit::TrunkName(trunk))
                    .map_err(|e| e.to_string())?;
                editor
                    .change_row(index, RowEdit::Percentage(percent))
                    .map_err(|e| e.to_string())?;
            }

            editor.save().await.map_err(explain_rejection)?;
        }
        Command::Delete { bucket } => {
            if client.delete_bucket(&bucket).await.map_err(|e| e.to_string())? {
                tracing::info!(bucket, "Load balance deleted");
            } else {
                println!("{bucket}: nothing to delete");
            }
        }
    }

    Ok(())
}

/// Split `TRUNK=PERCENT`. The percentage is passed through as typed; the
/// editor decides whether it is acceptable.
fn parse_share(raw: &str) -> Result<(String, String), String> {
    match raw.rsplit_once('=') {
        Some((trunk, percent)) if !trunk.trim().is_empty() => {
            Ok((trunk.trim().to_string(), percent.trim().to_string()))
        }
        _ => Err(format!("Expected TRUNK=PERCENT, got '{raw}'")),
    }
}

/// Render an editor error, listing the selectable percentages when the
/// allocation itself was rejected.
fn explain_rejection(err: AllocationError) -> String {
    if !err.is_validation() {
        return err.to_string();
    }
    let choices: Vec<String> = Percentage::choices().map(|p| p.to_string()).collect();
    format!("{err}. Allowed percentages: {}", choices.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_split_on_last_equals() {
        assert_eq!(
            parse_share("TrunkA=60").unwrap(),
            ("TrunkA".to_string(), "60".to_string())
        );
        assert_eq!(
            parse_share("a=b=40").unwrap(),
            ("a=b".to_string(), "40".to_string())
        );
    }

    #[test]
    fn malformed_shares_are_rejected() {
        assert!(parse_share("TrunkA").is_err());
        assert!(parse_share("=60").is_err());
    }

    #[test]
    fn cli_parses_set() {
        let cli = Cli::try_parse_from(["routemixctl", "set", "LB-1", "A=60", "B=40"]).unwrap();
        match cli.command {
            Command::Set { bucket, shares, retries } => {
                assert_eq!(bucket, "LB-1");
                assert_eq!(shares, vec!["A=60", "B=40"]);
                assert_eq!(retries, 0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejected_allocations_list_the_choices() {
        let message = explain_rejection(AllocationError::TotalMismatch { total: 90.0 });
        assert!(message.starts_with("Total percentage must be exactly 100% (currently 90%)"), "{message}");
        assert!(
            message.ends_with("Allowed percentages: 10%, 20%, 30%, 40%, 50%, 60%, 70%, 80%, 90%, 100%"),
            "{message}"
        );
    }

    #[test]
    fn transport_failures_are_reported_as_is() {
        let err = AllocationError::SaveFailed(Some("connection refused".into()));
        let message = explain_rejection(err.clone());
        assert_eq!(message, err.to_string());
        assert!(!message.contains("Allowed percentages"));
    }
}
