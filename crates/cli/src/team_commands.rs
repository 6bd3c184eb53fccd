use {
    anyhow::Result,
    clap::Subcommand,
    mmctl_client::{Client, Error},
    mmctl_model::{TEAM_INVITE, TEAM_OPEN, Team, TeamSearch},
};

#[derive(Subcommand)]
pub enum TeamAction {
    /// List all teams visible to the caller.
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 200)]
        per_page: u32,
    },
    /// Show one team by name or id.
    Get { team: String },
    /// Search teams by name or display name.
    Search { term: String },
    /// Archive a team; `--permanent` deletes it for good.
    Delete {
        team: String,
        #[arg(long)]
        permanent: bool,
    },
    /// Restore an archived team.
    Restore { team: String },
    /// Make a team open to anyone on the server, or invite-only.
    Privacy {
        team: String,
        #[arg(long)]
        invite_only: bool,
    },
    /// Add users (by id) to a team.
    AddUsers {
        team: String,
        #[arg(required = true)]
        user_ids: Vec<String>,
    },
}

pub async fn handle_team(action: TeamAction, client: &dyn Client, json: bool) -> Result<()> {
    match action {
        TeamAction::List { page, per_page } => {
            let (teams, _) = client.get_all_teams(None, page, per_page).await?;
            print_teams(&teams, json)?;
        },
        TeamAction::Get { team } => {
            let team = resolve_team(client, &team).await?;
            if json {
                return crate::print_json(&team);
            }
            print_teams(std::slice::from_ref(&team), false)?;
        },
        TeamAction::Search { term } => {
            let search = TeamSearch {
                term,
                ..TeamSearch::default()
            };
            let (teams, _) = client.search_teams(&search).await?;
            print_teams(&teams, json)?;
        },
        TeamAction::Delete { team, permanent } => {
            let team = resolve_team(client, &team).await?;
            if permanent {
                client.permanent_delete_team(&team.id).await?;
                eprintln!("Deleted team {}.", team.name);
            } else {
                client.soft_delete_team(&team.id).await?;
                eprintln!("Archived team {}.", team.name);
            }
        },
        TeamAction::Restore { team } => {
            let id = match resolve_team(client, &team).await {
                Ok(found) => found.id,
                Err(_) => team,
            };
            let (restored, _) = client.restore_team(&id).await?;
            eprintln!("Restored team {}.", restored.name);
        },
        TeamAction::Privacy { team, invite_only } => {
            let team = resolve_team(client, &team).await?;
            let privacy = if invite_only {
                TEAM_INVITE
            } else {
                TEAM_OPEN
            };
            let (updated, _) = client.update_team_privacy(&team.id, privacy).await?;
            eprintln!("Team {} is now {}.", updated.name, describe_privacy(&updated.team_type));
        },
        TeamAction::AddUsers { team, user_ids } => {
            let team = resolve_team(client, &team).await?;
            for user_id in &user_ids {
                client.add_team_member(&team.id, user_id).await?;
                eprintln!("Added {user_id} to {}.", team.name);
            }
        },
    }
    Ok(())
}

/// Look a team up by name, then by id.
pub(crate) async fn resolve_team(client: &dyn Client, name_or_id: &str) -> Result<Team> {
    match client.get_team_by_name(name_or_id, None).await {
        Ok((team, _)) => Ok(team),
        Err(e) if is_not_found(&e) => {
            let (team, _) = client.get_team(name_or_id, None).await?;
            Ok(team)
        },
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn is_not_found(err: &Error) -> bool {
    matches!(err.status_code(), Some(400 | 404))
}

fn describe_privacy(team_type: &str) -> &'static str {
    if team_type == TEAM_INVITE {
        "invite-only"
    } else {
        "open"
    }
}

fn print_teams(teams: &[Team], json: bool) -> Result<()> {
    if json {
        return crate::print_json(teams);
    }
    for team in teams {
        let state = if team.is_deleted() {
            " (archived)"
        } else {
            ""
        };
        println!("{:<26} {:<24} {}{state}", team.id, team.name, team.display_name);
    }
    Ok(())
}
