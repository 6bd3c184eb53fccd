//! The client capability contract.
//!
//! [`Client`] lists every remote operation a caller may issue against the
//! server. Each method returns the decoded payload together with the
//! [`Response`] metadata, or fails through the crate's [`Error`](crate::Error).
//! A call either fully succeeds or fully fails; there is no partial payload.
//!
//! Methods taking `etag` make a conditional request when it is `Some` and
//! non-empty. When the server answers `304 Not Modified` the payload is the
//! type's empty default and [`Response::is_not_modified`] is `true`.
//!
//! Nothing here retries. Idempotency follows the HTTP method of the route:
//! reads and `update_*`/`patch_*` calls are safe to repeat, `create_*`,
//! `upload_*` and job/token creation are not.

use std::collections::HashMap;

use {
    async_trait::async_trait,
    bytes::Bytes,
    mmctl_model::{
        Bot, BotPatch, Channel, ChannelMember, ChannelMembers, ChannelPatch, ChannelType, Command,
        Config, FileInfo, Group, GroupSearchOpts, GroupWithSchemeAdmin, IncomingWebhook,
        InstallMarketplacePluginRequest, IntegrityCheckResult, Job, Manifest, MarketplacePlugin,
        MarketplacePluginFilter, OutgoingWebhook, PluginsResponse, Post, PostList, Role,
        RolePatch, ServerBusyState, Team, TeamMember, TeamPatch, TeamSearch, UploadSession, User,
        UserAccessToken, UserPatch,
    },
    tokio::io::{AsyncRead, AsyncWrite},
};

use crate::{error::Result, response::Response};

/// Payload plus transport metadata.
pub type ApiResult<T> = Result<(T, Response)>;

/// Byte source for uploads.
pub type UploadReader<'a> = &'a mut (dyn AsyncRead + Send + Unpin);
/// Byte sink for downloads.
pub type DownloadWriter<'a> = &'a mut (dyn AsyncWrite + Send + Unpin);

#[async_trait]
pub trait Client: Send + Sync {
    // ── Teams ───────────────────────────────────────────────────────────────

    async fn get_teams_for_user(&self, user_id: &str, etag: Option<&str>) -> ApiResult<Vec<Team>>;
    async fn get_team(&self, team_id: &str, etag: Option<&str>) -> ApiResult<Team>;
    async fn get_team_by_name(&self, name: &str, etag: Option<&str>) -> ApiResult<Team>;
    async fn get_all_teams(
        &self,
        etag: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Vec<Team>>;
    async fn create_team(&self, team: &Team) -> ApiResult<Team>;
    async fn patch_team(&self, team_id: &str, patch: &TeamPatch) -> ApiResult<Team>;
    async fn update_team(&self, team: &Team) -> ApiResult<Team>;
    async fn add_team_member(&self, team_id: &str, user_id: &str) -> ApiResult<TeamMember>;
    async fn remove_team_member(&self, team_id: &str, user_id: &str) -> Result<Response>;
    async fn soft_delete_team(&self, team_id: &str) -> Result<Response>;
    async fn permanent_delete_team(&self, team_id: &str) -> Result<Response>;
    async fn restore_team(&self, team_id: &str) -> ApiResult<Team>;
    async fn update_team_privacy(&self, team_id: &str, privacy: &str) -> ApiResult<Team>;
    async fn search_teams(&self, search: &TeamSearch) -> ApiResult<Vec<Team>>;
    async fn invite_users_to_team(&self, team_id: &str, user_emails: &[String])
    -> Result<Response>;

    // ── Channels ────────────────────────────────────────────────────────────

    async fn create_channel(&self, channel: &Channel) -> ApiResult<Channel>;
    async fn remove_user_from_channel(&self, channel_id: &str, user_id: &str) -> Result<Response>;
    async fn get_channel_members(
        &self,
        channel_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<ChannelMembers>;
    async fn add_channel_member(&self, channel_id: &str, user_id: &str)
    -> ApiResult<ChannelMember>;
    async fn delete_channel(&self, channel_id: &str) -> Result<Response>;
    async fn permanent_delete_channel(&self, channel_id: &str) -> Result<Response>;
    async fn move_channel(&self, channel_id: &str, team_id: &str, force: bool)
    -> ApiResult<Channel>;
    async fn get_public_channels_for_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Channel>>;
    async fn get_deleted_channels_for_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Channel>>;
    async fn get_private_channels_for_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Channel>>;
    async fn get_channels_for_team_for_user(
        &self,
        team_id: &str,
        user_id: &str,
        include_deleted: bool,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Channel>>;
    async fn restore_channel(&self, channel_id: &str) -> ApiResult<Channel>;
    async fn patch_channel(&self, channel_id: &str, patch: &ChannelPatch) -> ApiResult<Channel>;
    async fn get_channel_by_name(
        &self,
        channel_name: &str,
        team_id: &str,
        etag: Option<&str>,
    ) -> ApiResult<Channel>;
    async fn get_channel_by_name_include_deleted(
        &self,
        channel_name: &str,
        team_id: &str,
        etag: Option<&str>,
    ) -> ApiResult<Channel>;
    async fn get_channel(&self, channel_id: &str, etag: Option<&str>) -> ApiResult<Channel>;
    async fn update_channel_privacy(
        &self,
        channel_id: &str,
        privacy: ChannelType,
    ) -> ApiResult<Channel>;

    // ── Posts ───────────────────────────────────────────────────────────────

    async fn get_post(&self, post_id: &str, etag: Option<&str>) -> ApiResult<Post>;
    async fn create_post(&self, post: &Post) -> ApiResult<Post>;
    async fn get_posts_for_channel(
        &self,
        channel_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
        collapsed_threads: bool,
    ) -> ApiResult<PostList>;
    /// POST `data` verbatim to `url` (relative to the API root) and return the raw body.
    async fn do_api_post(&self, url: &str, data: &str) -> ApiResult<Bytes>;

    // ── Groups ──────────────────────────────────────────────────────────────

    async fn get_ldap_groups(&self) -> ApiResult<Vec<Group>>;
    /// Groups linked to a channel and the server's total count for the query.
    async fn get_groups_by_channel(
        &self,
        channel_id: &str,
        opts: &GroupSearchOpts,
    ) -> ApiResult<(Vec<GroupWithSchemeAdmin>, i64)>;
    /// Groups linked to a team and the server's total count for the query.
    async fn get_groups_by_team(
        &self,
        team_id: &str,
        opts: &GroupSearchOpts,
    ) -> ApiResult<(Vec<GroupWithSchemeAdmin>, i64)>;

    // ── License ─────────────────────────────────────────────────────────────

    async fn upload_license_file(&self, data: &[u8]) -> Result<Response>;
    async fn remove_license_file(&self) -> Result<Response>;

    // ── Logs ────────────────────────────────────────────────────────────────

    async fn get_logs(&self, page: u32, per_page: u32) -> ApiResult<Vec<String>>;

    // ── Roles ───────────────────────────────────────────────────────────────

    async fn get_role_by_name(&self, name: &str) -> ApiResult<Role>;
    async fn patch_role(&self, role_id: &str, patch: &RolePatch) -> ApiResult<Role>;

    // ── Plugins ─────────────────────────────────────────────────────────────

    async fn upload_plugin(&self, file: UploadReader<'_>) -> ApiResult<Manifest>;
    /// Upload a plugin, replacing an installed plugin with the same id.
    async fn upload_plugin_forced(&self, file: UploadReader<'_>) -> ApiResult<Manifest>;
    async fn remove_plugin(&self, id: &str) -> Result<Response>;
    async fn enable_plugin(&self, id: &str) -> Result<Response>;
    async fn disable_plugin(&self, id: &str) -> Result<Response>;
    async fn get_plugins(&self) -> ApiResult<PluginsResponse>;
    async fn install_plugin_from_url(&self, url: &str, force: bool) -> ApiResult<Manifest>;
    async fn install_marketplace_plugin(
        &self,
        request: &InstallMarketplacePluginRequest,
    ) -> ApiResult<Manifest>;
    async fn get_marketplace_plugins(
        &self,
        filter: &MarketplacePluginFilter,
    ) -> ApiResult<Vec<MarketplacePlugin>>;

    // ── Users ───────────────────────────────────────────────────────────────

    async fn get_user(&self, user_id: &str, etag: Option<&str>) -> ApiResult<User>;
    async fn get_user_by_username(&self, user_name: &str, etag: Option<&str>) -> ApiResult<User>;
    async fn get_user_by_email(&self, email: &str, etag: Option<&str>) -> ApiResult<User>;
    async fn permanent_delete_user(&self, user_id: &str) -> Result<Response>;
    async fn permanent_delete_all_users(&self) -> Result<Response>;
    async fn create_user(&self, user: &User) -> ApiResult<User>;
    async fn verify_user_email_without_token(&self, user_id: &str) -> ApiResult<User>;
    /// Replace the user's roles with the space-separated `roles`.
    async fn update_user_roles(&self, user_id: &str, roles: &str) -> Result<Response>;
    async fn send_password_reset_email(&self, email: &str) -> Result<Response>;
    async fn update_user(&self, user: &User) -> ApiResult<User>;
    async fn update_user_mfa(&self, user_id: &str, code: &str, activate: bool)
    -> Result<Response>;
    async fn update_user_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<Response>;
    async fn update_user_hashed_password(
        &self,
        user_id: &str,
        new_hashed_password: &str,
    ) -> Result<Response>;
    async fn create_user_access_token(
        &self,
        user_id: &str,
        description: &str,
    ) -> ApiResult<UserAccessToken>;
    async fn revoke_user_access_token(&self, token_id: &str) -> Result<Response>;
    async fn get_user_access_tokens_for_user(
        &self,
        user_id: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Vec<UserAccessToken>>;
    async fn convert_user_to_bot(&self, user_id: &str) -> ApiResult<Bot>;
    async fn convert_bot_to_user(
        &self,
        user_id: &str,
        user_patch: &UserPatch,
        set_system_admin: bool,
    ) -> ApiResult<User>;
    async fn promote_guest_to_user(&self, user_id: &str) -> Result<Response>;
    async fn demote_user_to_guest(&self, guest_id: &str) -> Result<Response>;
    async fn get_users(&self, page: u32, per_page: u32, etag: Option<&str>)
    -> ApiResult<Vec<User>>;
    async fn get_users_by_ids(&self, user_ids: &[String]) -> ApiResult<Vec<User>>;
    async fn get_users_in_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<User>>;
    async fn update_user_active(&self, user_id: &str, activate: bool) -> Result<Response>;
    async fn migrate_auth_to_ldap(
        &self,
        from_auth_service: &str,
        match_field: &str,
        force: bool,
    ) -> Result<Response>;
    async fn migrate_auth_to_saml(
        &self,
        from_auth_service: &str,
        users_map: &HashMap<String, String>,
        auto: bool,
    ) -> Result<Response>;
    /// Reset SAML users to email auth; returns the number of affected users.
    async fn reset_saml_auth_data_to_email(
        &self,
        include_deleted: bool,
        dry_run: bool,
        user_ids: &[String],
    ) -> ApiResult<i64>;

    // ── Commands ────────────────────────────────────────────────────────────

    async fn create_command(&self, cmd: &Command) -> ApiResult<Command>;
    async fn list_commands(&self, team_id: &str, custom_only: bool) -> ApiResult<Vec<Command>>;
    async fn get_command_by_id(&self, cmd_id: &str) -> ApiResult<Command>;
    async fn update_command(&self, cmd: &Command) -> ApiResult<Command>;
    async fn move_command(&self, team_id: &str, command_id: &str) -> Result<Response>;
    async fn delete_command(&self, command_id: &str) -> Result<Response>;

    // ── Config ──────────────────────────────────────────────────────────────

    async fn get_config(&self) -> ApiResult<Config>;
    async fn update_config(&self, config: &Config) -> ApiResult<Config>;
    async fn patch_config(&self, config: &Config) -> ApiResult<Config>;
    async fn reload_config(&self) -> Result<Response>;
    /// Copy the configuration stored at `from` into the store at `to`.
    async fn migrate_config(&self, from: &str, to: &str) -> Result<Response>;

    // ── LDAP ────────────────────────────────────────────────────────────────

    async fn sync_ldap(&self, include_removed_members: bool) -> Result<Response>;
    async fn migrate_id_ldap(&self, to_attribute: &str) -> Result<Response>;

    // ── Bots ────────────────────────────────────────────────────────────────

    async fn create_bot(&self, bot: &Bot) -> ApiResult<Bot>;
    async fn patch_bot(&self, user_id: &str, patch: &BotPatch) -> ApiResult<Bot>;
    async fn get_bots(&self, page: u32, per_page: u32, etag: Option<&str>) -> ApiResult<Vec<Bot>>;
    async fn get_bots_include_deleted(
        &self,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Bot>>;
    async fn get_bots_orphaned(
        &self,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Bot>>;
    async fn disable_bot(&self, bot_user_id: &str) -> ApiResult<Bot>;
    async fn enable_bot(&self, bot_user_id: &str) -> ApiResult<Bot>;
    async fn assign_bot(&self, bot_user_id: &str, new_owner_id: &str) -> ApiResult<Bot>;

    // ── System ──────────────────────────────────────────────────────────────

    async fn set_server_busy(&self, secs: u64) -> Result<Response>;
    async fn clear_server_busy(&self) -> Result<Response>;
    async fn get_server_busy(&self) -> ApiResult<ServerBusyState>;
    async fn check_integrity(&self) -> ApiResult<Vec<IntegrityCheckResult>>;
    async fn get_ping(&self) -> ApiResult<String>;
    /// Ping with the server's full health report, every value rendered as text.
    async fn get_ping_with_full_server_status(&self) -> ApiResult<HashMap<String, String>>;

    // ── Uploads ─────────────────────────────────────────────────────────────

    async fn create_upload(&self, session: &UploadSession) -> ApiResult<UploadSession>;
    async fn get_upload(&self, upload_id: &str) -> ApiResult<UploadSession>;
    async fn get_uploads_for_user(&self, user_id: &str) -> ApiResult<Vec<UploadSession>>;
    /// Send the next chunk of an upload.
    ///
    /// The payload is `None` while the upload is incomplete and the server
    /// acknowledges the chunk with `204 No Content`.
    async fn upload_data(
        &self,
        upload_id: &str,
        data: UploadReader<'_>,
    ) -> ApiResult<Option<FileInfo>>;

    // ── Imports & exports ───────────────────────────────────────────────────

    async fn list_imports(&self) -> ApiResult<Vec<String>>;
    async fn list_exports(&self) -> ApiResult<Vec<String>>;
    async fn delete_export(&self, name: &str) -> Result<Response>;
    /// Stream export `name` into `writer`, starting at byte `offset`.
    /// Returns the number of bytes written.
    ///
    /// A server that ignores the range answers `200` with the whole file
    /// instead of `206`; callers appending to a partial file must check
    /// `Response::status_code`.
    async fn download_export(
        &self,
        name: &str,
        writer: DownloadWriter<'_>,
        offset: u64,
    ) -> ApiResult<u64>;

    // ── Jobs ────────────────────────────────────────────────────────────────

    async fn get_job(&self, id: &str) -> ApiResult<Job>;
    async fn get_jobs(&self, page: u32, per_page: u32) -> ApiResult<Vec<Job>>;
    async fn get_jobs_by_type(
        &self,
        job_type: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Vec<Job>>;
    async fn create_job(&self, job: &Job) -> ApiResult<Job>;
    async fn cancel_job(&self, job_id: &str) -> Result<Response>;

    // ── Webhooks ────────────────────────────────────────────────────────────

    async fn create_incoming_webhook(&self, hook: &IncomingWebhook)
    -> ApiResult<IncomingWebhook>;
    async fn update_incoming_webhook(&self, hook: &IncomingWebhook)
    -> ApiResult<IncomingWebhook>;
    async fn get_incoming_webhooks(
        &self,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<IncomingWebhook>>;
    async fn get_incoming_webhooks_for_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<IncomingWebhook>>;
    async fn get_incoming_webhook(
        &self,
        hook_id: &str,
        etag: Option<&str>,
    ) -> ApiResult<IncomingWebhook>;
    async fn delete_incoming_webhook(&self, hook_id: &str) -> Result<Response>;
    async fn create_outgoing_webhook(&self, hook: &OutgoingWebhook)
    -> ApiResult<OutgoingWebhook>;
    async fn update_outgoing_webhook(&self, hook: &OutgoingWebhook)
    -> ApiResult<OutgoingWebhook>;
    async fn get_outgoing_webhooks(
        &self,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<OutgoingWebhook>>;
    async fn get_outgoing_webhook(&self, hook_id: &str) -> ApiResult<OutgoingWebhook>;
    async fn get_outgoing_webhooks_for_channel(
        &self,
        channel_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<OutgoingWebhook>>;
    async fn get_outgoing_webhooks_for_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<OutgoingWebhook>>;
    async fn regen_outgoing_hook_token(&self, hook_id: &str) -> ApiResult<OutgoingWebhook>;
    async fn delete_outgoing_webhook(&self, hook_id: &str) -> Result<Response>;
}
