use {
    anyhow::Result,
    clap::Subcommand,
    mmctl_client::Client,
    mmctl_model::User,
};

use crate::team_commands::{is_not_found, resolve_team};

#[derive(Subcommand)]
pub enum UserAction {
    /// Show a user by email, username or id.
    Get { user: String },
    /// List users, optionally restricted to one team.
    List {
        #[arg(long)]
        team: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 200)]
        per_page: u32,
    },
    /// Create a user.
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Grant the system admin role.
        #[arg(long)]
        system_admin: bool,
    },
    /// Re-enable a deactivated user.
    Activate { user: String },
    /// Deactivate a user.
    Deactivate { user: String },
    /// Mark a user's email as verified.
    VerifyEmail { user: String },
    /// Send a password reset email.
    ResetPassword { email: String },
    /// Personal access tokens.
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
pub enum TokenAction {
    Create {
        user: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    List { user: String },
    Revoke { token_id: String },
}

pub async fn handle_user(action: UserAction, client: &dyn Client, json: bool) -> Result<()> {
    match action {
        UserAction::Get { user } => {
            let user = resolve_user(client, &user).await?;
            if json {
                return crate::print_json(&user);
            }
            print_users(std::slice::from_ref(&user));
        },
        UserAction::List {
            team,
            page,
            per_page,
        } => {
            let (users, _) = match team {
                Some(team) => {
                    let team = resolve_team(client, &team).await?;
                    client
                        .get_users_in_team(&team.id, page, per_page, None)
                        .await?
                },
                None => client.get_users(page, per_page, None).await?,
            };
            if json {
                return crate::print_json(&users);
            }
            print_users(&users);
        },
        UserAction::Create {
            username,
            email,
            password,
            system_admin,
        } => {
            let draft = User {
                username,
                email,
                password,
                ..User::default()
            };
            let (created, _) = client.create_user(&draft).await?;
            if system_admin {
                client
                    .update_user_roles(&created.id, "system_user system_admin")
                    .await?;
            }
            eprintln!("Created user {} ({}).", created.username, created.id);
        },
        UserAction::Activate { user } => set_active(client, &user, true).await?,
        UserAction::Deactivate { user } => set_active(client, &user, false).await?,
        UserAction::VerifyEmail { user } => {
            let user = resolve_user(client, &user).await?;
            client.verify_user_email_without_token(&user.id).await?;
            eprintln!("Verified email of {}.", user.username);
        },
        UserAction::ResetPassword { email } => {
            client.send_password_reset_email(&email).await?;
            eprintln!("Password reset email sent to {email}.");
        },
        UserAction::Token { action } => handle_token(action, client, json).await?,
    }
    Ok(())
}

async fn handle_token(action: TokenAction, client: &dyn Client, json: bool) -> Result<()> {
    match action {
        TokenAction::Create { user, description } => {
            let user = resolve_user(client, &user).await?;
            let (token, _) = client
                .create_user_access_token(&user.id, &description)
                .await?;
            if json {
                return crate::print_json(&token);
            }
            println!("{} {}", token.id, token.token);
        },
        TokenAction::List { user } => {
            let user = resolve_user(client, &user).await?;
            let (tokens, _) = client
                .get_user_access_tokens_for_user(&user.id, 0, 200)
                .await?;
            if json {
                return crate::print_json(&tokens);
            }
            for token in tokens {
                let state = if token.is_active {
                    "active"
                } else {
                    "inactive"
                };
                println!("{:<26} {state:<8} {}", token.id, token.description);
            }
        },
        TokenAction::Revoke { token_id } => {
            client.revoke_user_access_token(&token_id).await?;
            eprintln!("Revoked token {token_id}.");
        },
    }
    Ok(())
}

async fn set_active(client: &dyn Client, user: &str, active: bool) -> Result<()> {
    let user = resolve_user(client, user).await?;
    client.update_user_active(&user.id, active).await?;
    let verb = if active {
        "Activated"
    } else {
        "Deactivated"
    };
    eprintln!("{verb} {}.", user.username);
    Ok(())
}

/// Emails contain `@`; anything else is tried as a username, then as an id.
pub(crate) async fn resolve_user(client: &dyn Client, key: &str) -> Result<User> {
    if key.contains('@') {
        let (user, _) = client.get_user_by_email(key, None).await?;
        return Ok(user);
    }
    match client.get_user_by_username(key, None).await {
        Ok((user, _)) => Ok(user),
        Err(e) if is_not_found(&e) => {
            let (user, _) = client.get_user(key, None).await?;
            Ok(user)
        },
        Err(e) => Err(e.into()),
    }
}

fn print_users(users: &[User]) {
    for user in users {
        let state = if user.is_deleted() {
            " (deactivated)"
        } else {
            ""
        };
        println!("{:<26} {:<22} {}{state}", user.id, user.username, user.email);
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_support::{ScriptedTransport, api_client},
    };

    #[tokio::test]
    async fn email_lookup_is_used_for_addresses() {
        let fake = ScriptedTransport::new();
        fake.reply(200, r#"{"id":"u1","username":"ann"}"#);
        let client = api_client(&fake);

        let user = resolve_user(&client, "ann@example.com").await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(fake.paths(), vec!["/users/email/ann%40example.com"]);
    }

    #[tokio::test]
    async fn missing_email_does_not_fall_back() {
        let fake = ScriptedTransport::new();
        fake.reply(404, "");
        let client = api_client(&fake);

        assert!(resolve_user(&client, "ann@example.com").await.is_err());
        assert_eq!(fake.paths().len(), 1);
    }

    #[tokio::test]
    async fn username_then_id() {
        let fake = ScriptedTransport::new();
        fake.reply(400, r#"{"id":"api.user.get_by_username.app_error"}"#)
            .reply(200, r#"{"id":"u1","username":"ann"}"#);
        let client = api_client(&fake);

        let user = resolve_user(&client, "u1").await.unwrap();
        assert_eq!(user.username, "ann");
        assert_eq!(fake.paths(), vec!["/users/username/u1", "/users/u1"]);
    }

    #[tokio::test]
    async fn username_match_wins() {
        let fake = ScriptedTransport::new();
        fake.reply(200, r#"{"id":"u2","username":"bob"}"#);
        let client = api_client(&fake);

        let user = resolve_user(&client, "bob").await.unwrap();
        assert_eq!(user.id, "u2");
        assert_eq!(fake.paths(), vec!["/users/username/bob"]);
    }
}
