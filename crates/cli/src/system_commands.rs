use {anyhow::Result, clap::Subcommand, mmctl_client::Client};

#[derive(Subcommand)]
pub enum SystemAction {
    /// Check that the server is reachable.
    Ping {
        /// Include the server's full health report.
        #[arg(long)]
        full: bool,
    },
    /// Mark the server busy so non-critical background work is deferred.
    Busy {
        #[command(subcommand)]
        action: BusyAction,
    },
    /// Run the database integrity check.
    Integrity,
    /// Print recent server log lines.
    Logs {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 200)]
        per_page: u32,
    },
}

#[derive(Subcommand)]
pub enum BusyAction {
    Set {
        /// How long the busy flag stays up.
        #[arg(long, default_value_t = 3600)]
        seconds: u64,
    },
    Clear,
    Show,
}

pub async fn handle_system(action: SystemAction, client: &dyn Client, json: bool) -> Result<()> {
    match action {
        SystemAction::Ping { full: false } => {
            let (status, resp) = client.get_ping().await?;
            if json {
                return crate::print_json(&serde_json::json!({
                    "status": status,
                    "server_version": resp.server_version,
                }));
            }
            println!("{status} (server {})", resp.server_version);
        },
        SystemAction::Ping { full: true } => {
            let (status, _) = client.get_ping_with_full_server_status().await?;
            if json {
                return crate::print_json(&status);
            }
            let mut keys: Vec<_> = status.keys().collect();
            keys.sort();
            for key in keys {
                println!("{key}: {}", status[key]);
            }
        },
        SystemAction::Busy { action } => match action {
            BusyAction::Set { seconds } => {
                client.set_server_busy(seconds).await?;
                eprintln!("Server marked busy for {seconds}s.");
            },
            BusyAction::Clear => {
                client.clear_server_busy().await?;
                eprintln!("Server busy flag cleared.");
            },
            BusyAction::Show => {
                let (state, _) = client.get_server_busy().await?;
                if json {
                    return crate::print_json(&state);
                }
                if state.busy {
                    println!("busy until {}", state.expires_ts);
                } else {
                    println!("not busy");
                }
            },
        },
        SystemAction::Integrity => {
            let (results, _) = client.check_integrity().await?;
            if json {
                return crate::print_json(&results);
            }
            for result in &results {
                match (&result.data, &result.err) {
                    (_, Some(err)) => println!("check failed: {err}"),
                    (Some(data), None) => println!(
                        "{} -> {}: {} orphaned record(s)",
                        data.child_name,
                        data.parent_name,
                        data.records.len()
                    ),
                    (None, None) => {},
                }
            }
        },
        SystemAction::Logs { page, per_page } => {
            let (lines, _) = client.get_logs(page, per_page).await?;
            if json {
                return crate::print_json(&lines);
            }
            for line in lines {
                println!("{line}");
            }
        },
    }
    Ok(())
}
