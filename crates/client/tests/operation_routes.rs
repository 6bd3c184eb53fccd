#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Every `Client` operation against a recording transport: method, route and
//! key parameters on success, and the failure shape on an error status.

mod common;

use std::collections::HashMap;

use {
    common::{client, raw},
    mmctl_client::{ApiClient, Body, Client, Error, Response, Result},
    mmctl_model::{
        Bot, BotPatch, Channel, ChannelPatch, ChannelType, Command, Config, GroupSearchOpts,
        IncomingWebhook, InstallMarketplacePluginRequest, Job, MarketplacePluginFilter,
        OutgoingWebhook, Post, RolePatch, Team, TeamPatch, TeamSearch, UploadSession, User,
        UserPatch,
    },
    reqwest::Method,
    rstest::rstest,
    serde_json::{Value, json},
};

/// Call `op` with fixed arguments and keep only the response metadata.
///
/// Ids follow one pattern throughout: team `t1`, channel `c1`, user `u1`.
async fn invoke(client: &ApiClient, op: &str) -> Result<Response> {
    let ids = vec!["u1".to_string(), "u2".to_string()];
    let opts = GroupSearchOpts::default();
    let team = Team {
        id: "t1".into(),
        ..Team::default()
    };
    let user = User {
        id: "u1".into(),
        ..User::default()
    };
    let command = Command {
        id: "cmd1".into(),
        ..Command::default()
    };
    let incoming = IncomingWebhook {
        id: "h1".into(),
        ..IncomingWebhook::default()
    };
    let outgoing = OutgoingWebhook {
        id: "h1".into(),
        ..OutgoingWebhook::default()
    };
    let mut bundle: &[u8] = b"bundle";
    let mut sink: Vec<u8> = Vec::new();

    let response = match op {
        // Teams
        "get_teams_for_user" => client.get_teams_for_user("u1", None).await?.1,
        "get_team" => client.get_team("t1", None).await?.1,
        "get_team_by_name" => client.get_team_by_name("eng", None).await?.1,
        "get_all_teams" => client.get_all_teams(None, 1, 20).await?.1,
        "create_team" => client.create_team(&team).await?.1,
        "patch_team" => client.patch_team("t1", &TeamPatch::default()).await?.1,
        "update_team" => client.update_team(&team).await?.1,
        "add_team_member" => client.add_team_member("t1", "u1").await?.1,
        "remove_team_member" => client.remove_team_member("t1", "u1").await?,
        "soft_delete_team" => client.soft_delete_team("t1").await?,
        "permanent_delete_team" => client.permanent_delete_team("t1").await?,
        "restore_team" => client.restore_team("t1").await?.1,
        "update_team_privacy" => client.update_team_privacy("t1", "I").await?.1,
        "search_teams" => client.search_teams(&TeamSearch::default()).await?.1,
        "invite_users_to_team" => client.invite_users_to_team("t1", &ids).await?,
        // Channels
        "create_channel" => client.create_channel(&Channel::default()).await?.1,
        "remove_user_from_channel" => client.remove_user_from_channel("c1", "u1").await?,
        "get_channel_members" => client.get_channel_members("c1", 1, 20, None).await?.1,
        "add_channel_member" => client.add_channel_member("c1", "u1").await?.1,
        "delete_channel" => client.delete_channel("c1").await?,
        "permanent_delete_channel" => client.permanent_delete_channel("c1").await?,
        "move_channel" => client.move_channel("c1", "t2", true).await?.1,
        "get_public_channels_for_team" => {
            client
                .get_public_channels_for_team("t1", 1, 20, None)
                .await?
                .1
        },
        "get_deleted_channels_for_team" => {
            client
                .get_deleted_channels_for_team("t1", 1, 20, None)
                .await?
                .1
        },
        "get_private_channels_for_team" => {
            client
                .get_private_channels_for_team("t1", 1, 20, None)
                .await?
                .1
        },
        "get_channels_for_team_for_user" => {
            client
                .get_channels_for_team_for_user("t1", "u1", true, None)
                .await?
                .1
        },
        "restore_channel" => client.restore_channel("c1").await?.1,
        "patch_channel" => client.patch_channel("c1", &ChannelPatch::default()).await?.1,
        "get_channel_by_name" => client.get_channel_by_name("town", "t1", None).await?.1,
        "get_channel_by_name_include_deleted" => {
            client
                .get_channel_by_name_include_deleted("town", "t1", None)
                .await?
                .1
        },
        "get_channel" => client.get_channel("c1", None).await?.1,
        "update_channel_privacy" => {
            client
                .update_channel_privacy("c1", ChannelType::Private)
                .await?
                .1
        },
        // Posts
        "get_post" => client.get_post("p1", None).await?.1,
        "create_post" => client.create_post(&Post::default()).await?.1,
        "get_posts_for_channel" => {
            client
                .get_posts_for_channel("c1", 1, 20, None, true)
                .await?
                .1
        },
        "do_api_post" => client.do_api_post("custom/route", "payload").await?.1,
        // Groups
        "get_ldap_groups" => client.get_ldap_groups().await?.1,
        "get_groups_by_channel" => client.get_groups_by_channel("c1", &opts).await?.1,
        "get_groups_by_team" => client.get_groups_by_team("t1", &opts).await?.1,
        // License
        "upload_license_file" => client.upload_license_file(b"license").await?,
        "remove_license_file" => client.remove_license_file().await?,
        // Logs
        "get_logs" => client.get_logs(1, 20).await?.1,
        // Roles
        "get_role_by_name" => client.get_role_by_name("system_admin").await?.1,
        "patch_role" => client.patch_role("r1", &RolePatch::default()).await?.1,
        // Plugins
        "upload_plugin" => client.upload_plugin(&mut bundle).await?.1,
        "upload_plugin_forced" => client.upload_plugin_forced(&mut bundle).await?.1,
        "remove_plugin" => client.remove_plugin("com.example.demo").await?,
        "enable_plugin" => client.enable_plugin("com.example.demo").await?,
        "disable_plugin" => client.disable_plugin("com.example.demo").await?,
        "get_plugins" => client.get_plugins().await?.1,
        "install_plugin_from_url" => {
            client
                .install_plugin_from_url("https://example.com/p.tar.gz", true)
                .await?
                .1
        },
        "install_marketplace_plugin" => {
            let request = InstallMarketplacePluginRequest {
                id: "com.example.demo".into(),
                version: "1.0.0".into(),
            };
            client.install_marketplace_plugin(&request).await?.1
        },
        "get_marketplace_plugins" => {
            client
                .get_marketplace_plugins(&MarketplacePluginFilter::default())
                .await?
                .1
        },
        // Users
        "get_user" => client.get_user("u1", None).await?.1,
        "get_user_by_username" => client.get_user_by_username("ann", None).await?.1,
        "get_user_by_email" => client.get_user_by_email("ann@example.com", None).await?.1,
        "permanent_delete_user" => client.permanent_delete_user("u1").await?,
        "permanent_delete_all_users" => client.permanent_delete_all_users().await?,
        "create_user" => client.create_user(&user).await?.1,
        "verify_user_email_without_token" => {
            client.verify_user_email_without_token("u1").await?.1
        },
        "update_user_roles" => client.update_user_roles("u1", "system_user").await?,
        "send_password_reset_email" => client.send_password_reset_email("ann@example.com").await?,
        "update_user" => client.update_user(&user).await?.1,
        "update_user_mfa" => client.update_user_mfa("u1", "123456", true).await?,
        "update_user_password" => client.update_user_password("u1", "old", "new").await?,
        "update_user_hashed_password" => {
            client.update_user_hashed_password("u1", "$2a$hash").await?
        },
        "create_user_access_token" => client.create_user_access_token("u1", "ci").await?.1,
        "revoke_user_access_token" => client.revoke_user_access_token("tok1").await?,
        "get_user_access_tokens_for_user" => {
            client
                .get_user_access_tokens_for_user("u1", 1, 20)
                .await?
                .1
        },
        "convert_user_to_bot" => client.convert_user_to_bot("u1").await?.1,
        "convert_bot_to_user" => {
            client
                .convert_bot_to_user("b1", &UserPatch::default(), true)
                .await?
                .1
        },
        "promote_guest_to_user" => client.promote_guest_to_user("u1").await?,
        "demote_user_to_guest" => client.demote_user_to_guest("u1").await?,
        "get_users" => client.get_users(1, 20, None).await?.1,
        "get_users_by_ids" => client.get_users_by_ids(&ids).await?.1,
        "get_users_in_team" => client.get_users_in_team("t1", 1, 20, None).await?.1,
        "update_user_active" => client.update_user_active("u1", false).await?,
        "migrate_auth_to_ldap" => client.migrate_auth_to_ldap("email", "email", true).await?,
        "migrate_auth_to_saml" => {
            let users = HashMap::from([("ann@example.com".to_string(), "ann".to_string())]);
            client.migrate_auth_to_saml("email", &users, false).await?
        },
        "reset_saml_auth_data_to_email" => {
            client
                .reset_saml_auth_data_to_email(true, false, &ids)
                .await?
                .1
        },
        // Commands
        "create_command" => client.create_command(&command).await?.1,
        "list_commands" => client.list_commands("t1", true).await?.1,
        "get_command_by_id" => client.get_command_by_id("cmd1").await?.1,
        "update_command" => client.update_command(&command).await?.1,
        "move_command" => client.move_command("t2", "cmd1").await?,
        "delete_command" => client.delete_command("cmd1").await?,
        // Config
        "get_config" => client.get_config().await?.1,
        "update_config" => client.update_config(&Config::default()).await?.1,
        "patch_config" => client.patch_config(&Config::default()).await?.1,
        "reload_config" => client.reload_config().await?,
        "migrate_config" => client.migrate_config("file.json", "postgres://db").await?,
        // LDAP
        "sync_ldap" => client.sync_ldap(true).await?,
        "migrate_id_ldap" => client.migrate_id_ldap("objectGUID").await?,
        // Bots
        "create_bot" => client.create_bot(&Bot::default()).await?.1,
        "patch_bot" => client.patch_bot("b1", &BotPatch::default()).await?.1,
        "get_bots" => client.get_bots(1, 20, None).await?.1,
        "get_bots_include_deleted" => client.get_bots_include_deleted(1, 20, None).await?.1,
        "get_bots_orphaned" => client.get_bots_orphaned(1, 20, None).await?.1,
        "disable_bot" => client.disable_bot("b1").await?.1,
        "enable_bot" => client.enable_bot("b1").await?.1,
        "assign_bot" => client.assign_bot("b1", "u1").await?.1,
        // System
        "set_server_busy" => client.set_server_busy(600).await?,
        "clear_server_busy" => client.clear_server_busy().await?,
        "get_server_busy" => client.get_server_busy().await?.1,
        "check_integrity" => client.check_integrity().await?.1,
        "get_ping" => client.get_ping().await?.1,
        "get_ping_with_full_server_status" => {
            client.get_ping_with_full_server_status().await?.1
        },
        // Uploads
        "create_upload" => client.create_upload(&UploadSession::default()).await?.1,
        "get_upload" => client.get_upload("up1").await?.1,
        "get_uploads_for_user" => client.get_uploads_for_user("u1").await?.1,
        "upload_data" => client.upload_data("up1", &mut bundle).await?.1,
        // Imports & exports
        "list_imports" => client.list_imports().await?.1,
        "list_exports" => client.list_exports().await?.1,
        "delete_export" => client.delete_export("e.zip").await?,
        "download_export" => client.download_export("e.zip", &mut sink, 0).await?.1,
        // Jobs
        "get_job" => client.get_job("j1").await?.1,
        "get_jobs" => client.get_jobs(1, 20).await?.1,
        "get_jobs_by_type" => client.get_jobs_by_type("migrations", 1, 20).await?.1,
        "create_job" => client.create_job(&Job::default()).await?.1,
        "cancel_job" => client.cancel_job("j1").await?,
        // Webhooks
        "create_incoming_webhook" => client.create_incoming_webhook(&incoming).await?.1,
        "update_incoming_webhook" => client.update_incoming_webhook(&incoming).await?.1,
        "get_incoming_webhooks" => client.get_incoming_webhooks(1, 20, None).await?.1,
        "get_incoming_webhooks_for_team" => {
            client
                .get_incoming_webhooks_for_team("t1", 1, 20, None)
                .await?
                .1
        },
        "get_incoming_webhook" => client.get_incoming_webhook("h1", None).await?.1,
        "delete_incoming_webhook" => client.delete_incoming_webhook("h1").await?,
        "create_outgoing_webhook" => client.create_outgoing_webhook(&outgoing).await?.1,
        "update_outgoing_webhook" => client.update_outgoing_webhook(&outgoing).await?.1,
        "get_outgoing_webhooks" => client.get_outgoing_webhooks(1, 20, None).await?.1,
        "get_outgoing_webhook" => client.get_outgoing_webhook("h1").await?.1,
        "get_outgoing_webhooks_for_channel" => {
            client
                .get_outgoing_webhooks_for_channel("c1", 1, 20, None)
                .await?
                .1
        },
        "get_outgoing_webhooks_for_team" => {
            client
                .get_outgoing_webhooks_for_team("t1", 1, 20, None)
                .await?
                .1
        },
        "regen_outgoing_hook_token" => client.regen_outgoing_hook_token("h1").await?.1,
        "delete_outgoing_webhook" => client.delete_outgoing_webhook("h1").await?,
        other => panic!("no call wired for {other}"),
    };
    Ok(response)
}

const OBJ: &str = "{}";
const LIST: &str = "[]";
const NONE: &[(&str, &str)] = &[];
const PAGED: &[(&str, &str)] = &[("page", "1"), ("per_page", "20")];

#[rstest]
// Teams
#[case("get_teams_for_user", Method::GET, "/users/u1/teams", NONE, LIST)]
#[case("get_team", Method::GET, "/teams/t1", NONE, OBJ)]
#[case("get_team_by_name", Method::GET, "/teams/name/eng", NONE, OBJ)]
#[case("get_all_teams", Method::GET, "/teams", PAGED, LIST)]
#[case("create_team", Method::POST, "/teams", NONE, OBJ)]
#[case("patch_team", Method::PUT, "/teams/t1/patch", NONE, OBJ)]
#[case("update_team", Method::PUT, "/teams/t1", NONE, OBJ)]
#[case("add_team_member", Method::POST, "/teams/t1/members", NONE, OBJ)]
#[case("remove_team_member", Method::DELETE, "/teams/t1/members/u1", NONE, OBJ)]
#[case("soft_delete_team", Method::DELETE, "/teams/t1", NONE, OBJ)]
#[case("permanent_delete_team", Method::DELETE, "/teams/t1", &[("permanent", "true")], OBJ)]
#[case("restore_team", Method::POST, "/teams/t1/restore", NONE, OBJ)]
#[case("update_team_privacy", Method::PUT, "/teams/t1/privacy", NONE, OBJ)]
#[case("search_teams", Method::POST, "/teams/search", NONE, LIST)]
#[case("invite_users_to_team", Method::POST, "/teams/t1/invite/email", NONE, OBJ)]
// Channels
#[case("create_channel", Method::POST, "/channels", NONE, OBJ)]
#[case("remove_user_from_channel", Method::DELETE, "/channels/c1/members/u1", NONE, OBJ)]
#[case("get_channel_members", Method::GET, "/channels/c1/members", PAGED, LIST)]
#[case("add_channel_member", Method::POST, "/channels/c1/members", NONE, OBJ)]
#[case("delete_channel", Method::DELETE, "/channels/c1", NONE, OBJ)]
#[case("permanent_delete_channel", Method::DELETE, "/channels/c1", &[("permanent", "true")], OBJ)]
#[case("move_channel", Method::POST, "/channels/c1/move", NONE, OBJ)]
#[case("get_public_channels_for_team", Method::GET, "/teams/t1/channels", PAGED, LIST)]
#[case("get_deleted_channels_for_team", Method::GET, "/teams/t1/channels/deleted", PAGED, LIST)]
#[case("get_private_channels_for_team", Method::GET, "/teams/t1/channels/private", PAGED, LIST)]
#[case(
    "get_channels_for_team_for_user",
    Method::GET,
    "/users/u1/teams/t1/channels",
    &[("include_deleted", "true")],
    LIST
)]
#[case("restore_channel", Method::POST, "/channels/c1/restore", NONE, OBJ)]
#[case("patch_channel", Method::PUT, "/channels/c1/patch", NONE, OBJ)]
#[case("get_channel_by_name", Method::GET, "/teams/t1/channels/name/town", NONE, OBJ)]
#[case(
    "get_channel_by_name_include_deleted",
    Method::GET,
    "/teams/t1/channels/name/town",
    &[("include_deleted", "true")],
    OBJ
)]
#[case("get_channel", Method::GET, "/channels/c1", NONE, OBJ)]
#[case("update_channel_privacy", Method::PUT, "/channels/c1/privacy", NONE, OBJ)]
// Posts
#[case("get_post", Method::GET, "/posts/p1", NONE, OBJ)]
#[case("create_post", Method::POST, "/posts", NONE, OBJ)]
#[case(
    "get_posts_for_channel",
    Method::GET,
    "/channels/c1/posts",
    &[("page", "1"), ("per_page", "20"), ("collapsedThreads", "true")],
    OBJ
)]
#[case("do_api_post", Method::POST, "/custom/route", NONE, "raw")]
// Groups
#[case("get_ldap_groups", Method::GET, "/ldap/groups", NONE, OBJ)]
#[case("get_groups_by_channel", Method::GET, "/channels/c1/groups", &[("q", "")], OBJ)]
#[case("get_groups_by_team", Method::GET, "/teams/t1/groups", &[("q", "")], OBJ)]
// License
#[case("upload_license_file", Method::POST, "/license", NONE, OBJ)]
#[case("remove_license_file", Method::DELETE, "/license", NONE, OBJ)]
// Logs
#[case("get_logs", Method::GET, "/logs", &[("page", "1"), ("logs_per_page", "20")], LIST)]
// Roles
#[case("get_role_by_name", Method::GET, "/roles/name/system_admin", NONE, OBJ)]
#[case("patch_role", Method::PUT, "/roles/r1/patch", NONE, OBJ)]
// Plugins
#[case("upload_plugin", Method::POST, "/plugins", NONE, OBJ)]
#[case("upload_plugin_forced", Method::POST, "/plugins", NONE, OBJ)]
#[case("remove_plugin", Method::DELETE, "/plugins/com.example.demo", NONE, OBJ)]
#[case("enable_plugin", Method::POST, "/plugins/com.example.demo/enable", NONE, OBJ)]
#[case("disable_plugin", Method::POST, "/plugins/com.example.demo/disable", NONE, OBJ)]
#[case("get_plugins", Method::GET, "/plugins", NONE, OBJ)]
#[case(
    "install_plugin_from_url",
    Method::POST,
    "/plugins/install_from_url",
    &[("plugin_download_url", "https://example.com/p.tar.gz"), ("force", "true")],
    OBJ
)]
#[case("install_marketplace_plugin", Method::POST, "/plugins/marketplace", NONE, OBJ)]
#[case("get_marketplace_plugins", Method::GET, "/plugins/marketplace", NONE, LIST)]
// Users
#[case("get_user", Method::GET, "/users/u1", NONE, OBJ)]
#[case("get_user_by_username", Method::GET, "/users/username/ann", NONE, OBJ)]
#[case("get_user_by_email", Method::GET, "/users/email/ann%40example.com", NONE, OBJ)]
#[case("permanent_delete_user", Method::DELETE, "/users/u1", &[("permanent", "true")], OBJ)]
#[case("permanent_delete_all_users", Method::DELETE, "/users", NONE, OBJ)]
#[case("create_user", Method::POST, "/users", NONE, OBJ)]
#[case("verify_user_email_without_token", Method::POST, "/users/u1/email/verify/member", NONE, OBJ)]
#[case("update_user_roles", Method::PUT, "/users/u1/roles", NONE, OBJ)]
#[case("send_password_reset_email", Method::POST, "/users/password/reset/send", NONE, OBJ)]
#[case("update_user", Method::PUT, "/users/u1", NONE, OBJ)]
#[case("update_user_mfa", Method::PUT, "/users/u1/mfa", NONE, OBJ)]
#[case("update_user_password", Method::PUT, "/users/u1/password", NONE, OBJ)]
#[case("update_user_hashed_password", Method::PUT, "/users/u1/password", NONE, OBJ)]
#[case("create_user_access_token", Method::POST, "/users/u1/tokens", NONE, OBJ)]
#[case("revoke_user_access_token", Method::POST, "/users/tokens/revoke", NONE, OBJ)]
#[case("get_user_access_tokens_for_user", Method::GET, "/users/u1/tokens", PAGED, LIST)]
#[case("convert_user_to_bot", Method::POST, "/users/u1/convert_to_bot", NONE, OBJ)]
#[case(
    "convert_bot_to_user",
    Method::POST,
    "/bots/b1/convert_to_user",
    &[("set_system_admin", "true")],
    OBJ
)]
#[case("promote_guest_to_user", Method::POST, "/users/u1/promote", NONE, OBJ)]
#[case("demote_user_to_guest", Method::POST, "/users/u1/demote", NONE, OBJ)]
#[case("get_users", Method::GET, "/users", PAGED, LIST)]
#[case("get_users_by_ids", Method::POST, "/users/ids", NONE, LIST)]
#[case(
    "get_users_in_team",
    Method::GET,
    "/users",
    &[("in_team", "t1"), ("page", "1"), ("per_page", "20")],
    LIST
)]
#[case("update_user_active", Method::PUT, "/users/u1/active", NONE, OBJ)]
#[case("migrate_auth_to_ldap", Method::POST, "/users/migrate_auth/ldap", NONE, OBJ)]
#[case("migrate_auth_to_saml", Method::POST, "/users/migrate_auth/saml", NONE, OBJ)]
#[case("reset_saml_auth_data_to_email", Method::POST, "/saml/reset_auth_data", NONE, OBJ)]
// Commands
#[case("create_command", Method::POST, "/commands", NONE, OBJ)]
#[case(
    "list_commands",
    Method::GET,
    "/commands",
    &[("team_id", "t1"), ("custom_only", "true")],
    LIST
)]
#[case("get_command_by_id", Method::GET, "/commands/cmd1", NONE, OBJ)]
#[case("update_command", Method::PUT, "/commands/cmd1", NONE, OBJ)]
#[case("move_command", Method::PUT, "/commands/cmd1/move", NONE, OBJ)]
#[case("delete_command", Method::DELETE, "/commands/cmd1", NONE, OBJ)]
// Config
#[case("get_config", Method::GET, "/config", NONE, OBJ)]
#[case("update_config", Method::PUT, "/config", NONE, OBJ)]
#[case("patch_config", Method::PUT, "/config/patch", NONE, OBJ)]
#[case("reload_config", Method::POST, "/config/reload", NONE, OBJ)]
#[case("migrate_config", Method::POST, "/config/migrate", NONE, OBJ)]
// LDAP
#[case("sync_ldap", Method::POST, "/ldap/sync", NONE, OBJ)]
#[case("migrate_id_ldap", Method::POST, "/ldap/migrateid", NONE, OBJ)]
// Bots
#[case("create_bot", Method::POST, "/bots", NONE, OBJ)]
#[case("patch_bot", Method::PUT, "/bots/b1", NONE, OBJ)]
#[case("get_bots", Method::GET, "/bots", PAGED, LIST)]
#[case("get_bots_include_deleted", Method::GET, "/bots", &[("include_deleted", "true")], LIST)]
#[case("get_bots_orphaned", Method::GET, "/bots", &[("only_orphaned", "true")], LIST)]
#[case("disable_bot", Method::POST, "/bots/b1/disable", NONE, OBJ)]
#[case("enable_bot", Method::POST, "/bots/b1/enable", NONE, OBJ)]
#[case("assign_bot", Method::POST, "/bots/b1/assign/u1", NONE, OBJ)]
// System
#[case("set_server_busy", Method::POST, "/server_busy", &[("seconds", "600")], OBJ)]
#[case("clear_server_busy", Method::DELETE, "/server_busy", NONE, OBJ)]
#[case("get_server_busy", Method::GET, "/server_busy", NONE, OBJ)]
#[case("check_integrity", Method::POST, "/integrity", NONE, LIST)]
#[case("get_ping", Method::GET, "/system/ping", NONE, OBJ)]
#[case(
    "get_ping_with_full_server_status",
    Method::GET,
    "/system/ping",
    &[("get_server_status", "true")],
    OBJ
)]
// Uploads
#[case("create_upload", Method::POST, "/uploads", NONE, OBJ)]
#[case("get_upload", Method::GET, "/uploads/up1", NONE, OBJ)]
#[case("get_uploads_for_user", Method::GET, "/users/u1/uploads", NONE, LIST)]
#[case("upload_data", Method::POST, "/uploads/up1", NONE, OBJ)]
// Imports & exports
#[case("list_imports", Method::GET, "/imports", NONE, LIST)]
#[case("list_exports", Method::GET, "/exports", NONE, LIST)]
#[case("delete_export", Method::DELETE, "/exports/e.zip", NONE, OBJ)]
#[case("download_export", Method::GET, "/exports/e.zip", NONE, "zip-bytes")]
// Jobs
#[case("get_job", Method::GET, "/jobs/j1", NONE, OBJ)]
#[case("get_jobs", Method::GET, "/jobs", PAGED, LIST)]
#[case("get_jobs_by_type", Method::GET, "/jobs/type/migrations", PAGED, LIST)]
#[case("create_job", Method::POST, "/jobs", NONE, OBJ)]
#[case("cancel_job", Method::POST, "/jobs/j1/cancel", NONE, OBJ)]
// Webhooks
#[case("create_incoming_webhook", Method::POST, "/hooks/incoming", NONE, OBJ)]
#[case("update_incoming_webhook", Method::PUT, "/hooks/incoming/h1", NONE, OBJ)]
#[case("get_incoming_webhooks", Method::GET, "/hooks/incoming", PAGED, LIST)]
#[case(
    "get_incoming_webhooks_for_team",
    Method::GET,
    "/hooks/incoming",
    &[("team_id", "t1"), ("page", "1")],
    LIST
)]
#[case("get_incoming_webhook", Method::GET, "/hooks/incoming/h1", NONE, OBJ)]
#[case("delete_incoming_webhook", Method::DELETE, "/hooks/incoming/h1", NONE, OBJ)]
#[case("create_outgoing_webhook", Method::POST, "/hooks/outgoing", NONE, OBJ)]
#[case("update_outgoing_webhook", Method::PUT, "/hooks/outgoing/h1", NONE, OBJ)]
#[case("get_outgoing_webhooks", Method::GET, "/hooks/outgoing", PAGED, LIST)]
#[case("get_outgoing_webhook", Method::GET, "/hooks/outgoing/h1", NONE, OBJ)]
#[case(
    "get_outgoing_webhooks_for_channel",
    Method::GET,
    "/hooks/outgoing",
    &[("channel_id", "c1"), ("per_page", "20")],
    LIST
)]
#[case(
    "get_outgoing_webhooks_for_team",
    Method::GET,
    "/hooks/outgoing",
    &[("team_id", "t1"), ("per_page", "20")],
    LIST
)]
#[case("regen_outgoing_hook_token", Method::POST, "/hooks/outgoing/h1/regen_token", NONE, OBJ)]
#[case("delete_outgoing_webhook", Method::DELETE, "/hooks/outgoing/h1", NONE, OBJ)]
#[tokio::test]
async fn operation_routes_and_failure_shape(
    #[case] op: &str,
    #[case] method: Method,
    #[case] path: &str,
    #[case] query: &[(&str, &str)],
    #[case] body: &str,
) {
    let (fake, client) = client();

    fake.reply(Ok(raw(200, body)));
    let response = invoke(&client, op).await.unwrap();
    assert_eq!(response.status_code, 200, "{op}");
    assert_eq!(response.request_id, "req-1", "{op}");

    let req = fake.last();
    assert_eq!(req.method, method, "{op}");
    assert_eq!(req.path, path, "{op}");
    for (key, value) in query {
        assert_eq!(req.query_value(key), Some(*value), "{op}: query {key}");
    }

    fake.reply(Ok(raw(
        403,
        r#"{"id":"api.context.permissions.app_error","message":"denied"}"#,
    )));
    let err = invoke(&client, op).await.unwrap_err();
    assert!(matches!(err, Error::Api { .. }), "{op}: {err}");
    assert_eq!(err.status_code(), Some(403), "{op}");
    assert_eq!(
        err.app_error().map(|e| e.id.as_str()),
        Some("api.context.permissions.app_error"),
        "{op}"
    );
    assert_eq!(fake.request_count(), 2, "{op}");
}

#[rstest]
#[case("update_team_privacy", json!({ "privacy": "I" }))]
#[case("invite_users_to_team", json!(["u1", "u2"]))]
#[case("add_team_member", json!({ "team_id": "t1", "user_id": "u1" }))]
#[case("add_channel_member", json!({ "user_id": "u1" }))]
#[case("move_channel", json!({ "team_id": "t2", "force": true }))]
#[case("update_channel_privacy", json!({ "privacy": "P" }))]
#[case("update_user_roles", json!({ "roles": "system_user" }))]
#[case("send_password_reset_email", json!({ "email": "ann@example.com" }))]
#[case("update_user_mfa", json!({ "activate": true, "code": "123456" }))]
#[case("update_user_password", json!({ "current_password": "old", "new_password": "new" }))]
#[case("update_user_hashed_password", json!({ "already_hashed": true, "new_password": "$2a$hash" }))]
#[case("create_user_access_token", json!({ "description": "ci" }))]
#[case("revoke_user_access_token", json!({ "token_id": "tok1" }))]
#[case("get_users_by_ids", json!(["u1", "u2"]))]
#[case("update_user_active", json!({ "active": false }))]
#[case("migrate_auth_to_ldap", json!({ "from": "email", "force": true, "match_field": "email" }))]
#[case(
    "migrate_auth_to_saml",
    json!({ "from": "email", "auto": false, "matches": { "ann@example.com": "ann" } })
)]
#[case("move_command", json!({ "team_id": "t2" }))]
#[case("migrate_config", json!({ "from": "file.json", "to": "postgres://db" }))]
#[case("sync_ldap", json!({ "include_removed_members": true }))]
#[case("migrate_id_ldap", json!({ "toAttribute": "objectGUID" }))]
#[tokio::test]
async fn mutation_bodies(#[case] op: &str, #[case] expected: Value) {
    let (fake, client) = client();
    fake.reply(Ok(raw(200, "{}")));

    invoke(&client, op).await.unwrap();

    match fake.last().body {
        Body::Json(sent) => assert_eq!(sent, expected, "{op}"),
        other => panic!("{op}: expected a JSON body, got {other:?}"),
    }
}

#[tokio::test]
async fn mfa_deactivation_omits_code() {
    let (fake, client) = client();
    fake.reply(Ok(raw(200, "{}")));

    client.update_user_mfa("u1", "123456", false).await.unwrap();

    assert_eq!(fake.last().body, Body::Json(json!({ "activate": false })));
}

#[tokio::test]
async fn raw_post_sends_text_and_returns_body() {
    let (fake, client) = client();
    fake.reply(Ok(raw(200, "pong")));

    let (body, _) = client.do_api_post("/custom/route", "ping").await.unwrap();

    assert_eq!(&body[..], b"pong");
    let req = fake.last();
    assert_eq!(req.path, "/custom/route");
    assert_eq!(req.body, Body::Text("ping".into()));
}
