//! Demo agent: runs a full A2E session against a platform.
//!
//! Discover the platform, search for a tea shop, fetch its protocol,
//! authenticate on the user's behalf, and execute an endpoint — narrating
//! each phase as it completes.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use a2e_client::{A2eClient, Orchestrator, PhaseOutcome, SessionConfig, SessionOutcome};

#[derive(Parser)]
#[command(about = "Run a demo A2E agent session")]
struct Args {
    /// Platform base URL
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Search keyword
    #[arg(long, default_value = "奶茶")]
    keyword: String,

    /// Create an order instead of just fetching the menu
    #[arg(long)]
    order: bool,
}

fn narrate(phase: &PhaseOutcome) {
    match phase {
        PhaseOutcome::Discovered { platform, version } => {
            println!("[1] discovered platform: {platform} v{version}");
        }
        PhaseOutcome::DiscoverySkipped { reason } => {
            println!("[1] discovery failed ({reason}), continuing");
        }
        PhaseOutcome::ServicesFound { total, selected } => {
            println!("[2] {total} service(s) found, selected: {}", selected.name);
        }
        PhaseOutcome::NoServices => {
            println!("[2] no services matched the search");
        }
        PhaseOutcome::ProtocolLoaded {
            endpoints,
            payment_endpoints,
        } => {
            println!("[3] protocol loaded: {endpoints} endpoint(s), {payment_endpoints} payment-bearing");
        }
        PhaseOutcome::Authenticated { expires_in } => {
            println!("[4] consumer token obtained (expires in {expires_in}s)");
        }
        PhaseOutcome::PlaceholderToken { reason } => {
            println!("[4] auth failed ({reason}), using placeholder token (demo mode)");
        }
        PhaseOutcome::Executed { status } => {
            println!("[5] execution finished: {status}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();

    let input = if args.order {
        serde_json::json!({
            "action": "create_order",
            "items": [{"product_id": 1, "quantity": 1, "options": {"sugar": "半糖", "ice": "少冰"}}],
            "address": "北京市朝阳区示例路1号",
            "phone": "13800138000",
            "note": "少放吸管"
        })
    } else {
        serde_json::json!({"action": "get_menu"})
    };

    let config = SessionConfig {
        keyword: args.keyword,
        input,
        agent_name: "a2e-demo-agent".to_string(),
        // Demo context: keep going with a placeholder if auth fails.
        allow_placeholder_token: true,
        ..SessionConfig::default()
    };

    let report = Orchestrator::new(A2eClient::new(args.base_url), config)
        .run()
        .await;

    for phase in &report.phases {
        narrate(phase);
    }

    match report.outcome {
        SessionOutcome::Completed(outcome) => {
            if let Some(error) = outcome.error {
                println!(
                    "\nprovider rejected the request: [{}] {}",
                    error.code, error.message
                );
                if !error.suggestion.is_empty() {
                    println!("suggestion: {}", error.suggestion);
                }
            } else {
                println!("\noutput:\n{}", serde_json::to_string_pretty(&outcome.output)?);
            }
        }
        SessionOutcome::NoServices => println!("\nnothing to execute"),
        SessionOutcome::Aborted(err) => println!("\nsession aborted: {err}"),
    }

    Ok(())
}
