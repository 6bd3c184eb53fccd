//! [`ApiClient`]: the REST v4 implementation of [`Client`].

use std::{collections::HashMap, sync::Arc};

use {
    async_trait::async_trait,
    bytes::Bytes,
    futures::StreamExt,
    mmctl_config::ServerConfig,
    mmctl_model::{
        AppError, Bot, BotPatch, Channel, ChannelMember, ChannelMembers, ChannelPatch,
        ChannelType, Command, Config, FileInfo, Group, GroupSearchOpts, GroupWithSchemeAdmin,
        IncomingWebhook, InstallMarketplacePluginRequest, IntegrityCheckResult, Job, Manifest,
        MarketplacePlugin, MarketplacePluginFilter, OutgoingWebhook, PluginsResponse, Post,
        PostList, Role, RolePatch, ServerBusyState, Team, TeamMember, TeamPatch, TeamSearch,
        UploadSession, User, UserAccessToken, UserPatch,
    },
    serde::{Deserialize, de::DeserializeOwned},
    serde_json::json,
    tokio::io::{AsyncReadExt, AsyncWriteExt},
    tracing::{debug, info},
};

use crate::{
    error::{Error, Result},
    request::{ApiRequest, Body, MultipartBody, segment},
    response::Response,
    traits::{ApiResult, Client, DownloadWriter, UploadReader},
    transport::{HttpTransport, Transport},
};

const LICENSE_FILE_NAME: &str = "test-license.mattermost-license";
const PLUGIN_FILE_NAME: &str = "plugin.tar.gz";

/// Client for a collaboration server's REST API.
///
/// Cheap to clone; clones share the transport and its connection pool.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build an HTTP-backed client from connection settings.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Execute `request` and fail on any status of 300 or above except 304.
    async fn send(&self, request: ApiRequest) -> Result<(Bytes, Response)> {
        let raw = self.transport.execute(request).await?;
        let response = check_status(Response::from_parts(raw.status, raw.headers), &raw.body)?;
        Ok((raw.body, response))
    }

    /// Execute `request` and decode the body as `T`; a 304 yields `T::default()`.
    async fn fetch<T>(&self, request: ApiRequest) -> ApiResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let (body, response) = self.send(request).await?;
        if response.is_not_modified() {
            return Ok((T::default(), response));
        }
        decode(&body, response)
    }

    /// Execute `request` for its status only.
    async fn perform(&self, request: ApiRequest) -> Result<Response> {
        self.send(request).await.map(|(_, response)| response)
    }

    async fn upload_plugin_with(&self, file: UploadReader<'_>, force: bool) -> ApiResult<Manifest> {
        let data = read_all(file).await?;
        let fields = if force {
            vec![("force".to_string(), "true".to_string())]
        } else {
            Vec::new()
        };
        let body = Body::Multipart(MultipartBody {
            file_field: "plugin".into(),
            file_name: PLUGIN_FILE_NAME.into(),
            data,
            fields,
        });
        self.fetch(ApiRequest::post("/plugins").body(body)).await
    }

    async fn get_groups_by_syncable(
        &self,
        path: String,
        opts: &GroupSearchOpts,
    ) -> ApiResult<(Vec<GroupWithSchemeAdmin>, i64)> {
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct GroupsPage {
            groups: Vec<GroupWithSchemeAdmin>,
            total_group_count: i64,
        }

        let req = ApiRequest::get(path)
            .query("q", &opts.q)
            .query("include_member_count", opts.include_member_count)
            .query("filter_allow_reference", opts.filter_allow_reference)
            .paged(opts.page, opts.per_page);
        let (page, response) = self.fetch::<GroupsPage>(req).await?;
        Ok(((page.groups, page.total_group_count), response))
    }
}

fn check_status(response: Response, body: &[u8]) -> Result<Response> {
    if response.status_code < 300 || response.is_not_modified() {
        return Ok(response);
    }
    let app_error = serde_json::from_slice::<AppError>(body)
        .ok()
        .filter(|e| !e.id.is_empty() || !e.message.is_empty());
    Err(Error::Api {
        response: Box::new(response),
        app_error,
    })
}

fn decode<T: DeserializeOwned>(body: &[u8], response: Response) -> ApiResult<T> {
    match serde_json::from_slice(body) {
        Ok(value) => Ok((value, response)),
        Err(source) => Err(Error::Decode {
            response: Box::new(response),
            source,
        }),
    }
}

async fn read_all(reader: UploadReader<'_>) -> Result<Bytes> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(Bytes::from(buf))
}

fn json_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl Client for ApiClient {
    // ── Teams ───────────────────────────────────────────────────────────────

    async fn get_teams_for_user(&self, user_id: &str, etag: Option<&str>) -> ApiResult<Vec<Team>> {
        let req = ApiRequest::get(format!("/users/{}/teams", segment(user_id))).etag(etag);
        self.fetch(req).await
    }

    async fn get_team(&self, team_id: &str, etag: Option<&str>) -> ApiResult<Team> {
        let req = ApiRequest::get(format!("/teams/{}", segment(team_id))).etag(etag);
        self.fetch(req).await
    }

    async fn get_team_by_name(&self, name: &str, etag: Option<&str>) -> ApiResult<Team> {
        let req = ApiRequest::get(format!("/teams/name/{}", segment(name))).etag(etag);
        self.fetch(req).await
    }

    async fn get_all_teams(
        &self,
        etag: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Vec<Team>> {
        let req = ApiRequest::get("/teams").paged(page, per_page).etag(etag);
        self.fetch(req).await
    }

    async fn create_team(&self, team: &Team) -> ApiResult<Team> {
        self.fetch(ApiRequest::post("/teams").json(team)?).await
    }

    async fn patch_team(&self, team_id: &str, patch: &TeamPatch) -> ApiResult<Team> {
        let req = ApiRequest::put(format!("/teams/{}/patch", segment(team_id))).json(patch)?;
        self.fetch(req).await
    }

    async fn update_team(&self, team: &Team) -> ApiResult<Team> {
        let req = ApiRequest::put(format!("/teams/{}", segment(&team.id))).json(team)?;
        self.fetch(req).await
    }

    async fn add_team_member(&self, team_id: &str, user_id: &str) -> ApiResult<TeamMember> {
        let member = TeamMember {
            team_id: team_id.into(),
            user_id: user_id.into(),
            ..TeamMember::default()
        };
        let req = ApiRequest::post(format!("/teams/{}/members", segment(team_id))).json(&member)?;
        self.fetch(req).await
    }

    async fn remove_team_member(&self, team_id: &str, user_id: &str) -> Result<Response> {
        let path = format!("/teams/{}/members/{}", segment(team_id), segment(user_id));
        self.perform(ApiRequest::delete(path)).await
    }

    async fn soft_delete_team(&self, team_id: &str) -> Result<Response> {
        self.perform(ApiRequest::delete(format!("/teams/{}", segment(team_id))))
            .await
    }

    async fn permanent_delete_team(&self, team_id: &str) -> Result<Response> {
        let req = ApiRequest::delete(format!("/teams/{}", segment(team_id))).query("permanent", true);
        self.perform(req).await
    }

    async fn restore_team(&self, team_id: &str) -> ApiResult<Team> {
        self.fetch(ApiRequest::post(format!("/teams/{}/restore", segment(team_id))))
            .await
    }

    async fn update_team_privacy(&self, team_id: &str, privacy: &str) -> ApiResult<Team> {
        let req = ApiRequest::put(format!("/teams/{}/privacy", segment(team_id)))
            .json(&json!({ "privacy": privacy }))?;
        self.fetch(req).await
    }

    async fn search_teams(&self, search: &TeamSearch) -> ApiResult<Vec<Team>> {
        self.fetch(ApiRequest::post("/teams/search").json(search)?)
            .await
    }

    async fn invite_users_to_team(
        &self,
        team_id: &str,
        user_emails: &[String],
    ) -> Result<Response> {
        let req = ApiRequest::post(format!("/teams/{}/invite/email", segment(team_id)))
            .json(&user_emails)?;
        self.perform(req).await
    }

    // ── Channels ────────────────────────────────────────────────────────────

    async fn create_channel(&self, channel: &Channel) -> ApiResult<Channel> {
        self.fetch(ApiRequest::post("/channels").json(channel)?).await
    }

    async fn remove_user_from_channel(&self, channel_id: &str, user_id: &str) -> Result<Response> {
        let path = format!(
            "/channels/{}/members/{}",
            segment(channel_id),
            segment(user_id)
        );
        self.perform(ApiRequest::delete(path)).await
    }

    async fn get_channel_members(
        &self,
        channel_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<ChannelMembers> {
        let req = ApiRequest::get(format!("/channels/{}/members", segment(channel_id)))
            .paged(page, per_page)
            .etag(etag);
        self.fetch(req).await
    }

    async fn add_channel_member(
        &self,
        channel_id: &str,
        user_id: &str,
    ) -> ApiResult<ChannelMember> {
        let req = ApiRequest::post(format!("/channels/{}/members", segment(channel_id)))
            .json(&json!({ "user_id": user_id }))?;
        self.fetch(req).await
    }

    async fn delete_channel(&self, channel_id: &str) -> Result<Response> {
        self.perform(ApiRequest::delete(format!("/channels/{}", segment(channel_id))))
            .await
    }

    async fn permanent_delete_channel(&self, channel_id: &str) -> Result<Response> {
        let req = ApiRequest::delete(format!("/channels/{}", segment(channel_id)))
            .query("permanent", true);
        self.perform(req).await
    }

    async fn move_channel(
        &self,
        channel_id: &str,
        team_id: &str,
        force: bool,
    ) -> ApiResult<Channel> {
        let req = ApiRequest::post(format!("/channels/{}/move", segment(channel_id)))
            .json(&json!({ "team_id": team_id, "force": force }))?;
        self.fetch(req).await
    }

    async fn get_public_channels_for_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Channel>> {
        let req = ApiRequest::get(format!("/teams/{}/channels", segment(team_id)))
            .paged(page, per_page)
            .etag(etag);
        self.fetch(req).await
    }

    async fn get_deleted_channels_for_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Channel>> {
        let req = ApiRequest::get(format!("/teams/{}/channels/deleted", segment(team_id)))
            .paged(page, per_page)
            .etag(etag);
        self.fetch(req).await
    }

    async fn get_private_channels_for_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Channel>> {
        let req = ApiRequest::get(format!("/teams/{}/channels/private", segment(team_id)))
            .paged(page, per_page)
            .etag(etag);
        self.fetch(req).await
    }

    async fn get_channels_for_team_for_user(
        &self,
        team_id: &str,
        user_id: &str,
        include_deleted: bool,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Channel>> {
        let path = format!(
            "/users/{}/teams/{}/channels",
            segment(user_id),
            segment(team_id)
        );
        let req = ApiRequest::get(path)
            .query("include_deleted", include_deleted)
            .etag(etag);
        self.fetch(req).await
    }

    async fn restore_channel(&self, channel_id: &str) -> ApiResult<Channel> {
        self.fetch(ApiRequest::post(format!(
            "/channels/{}/restore",
            segment(channel_id)
        )))
        .await
    }

    async fn patch_channel(&self, channel_id: &str, patch: &ChannelPatch) -> ApiResult<Channel> {
        let req =
            ApiRequest::put(format!("/channels/{}/patch", segment(channel_id))).json(patch)?;
        self.fetch(req).await
    }

    async fn get_channel_by_name(
        &self,
        channel_name: &str,
        team_id: &str,
        etag: Option<&str>,
    ) -> ApiResult<Channel> {
        let path = format!(
            "/teams/{}/channels/name/{}",
            segment(team_id),
            segment(channel_name)
        );
        self.fetch(ApiRequest::get(path).etag(etag)).await
    }

    async fn get_channel_by_name_include_deleted(
        &self,
        channel_name: &str,
        team_id: &str,
        etag: Option<&str>,
    ) -> ApiResult<Channel> {
        let path = format!(
            "/teams/{}/channels/name/{}",
            segment(team_id),
            segment(channel_name)
        );
        let req = ApiRequest::get(path)
            .query("include_deleted", true)
            .etag(etag);
        self.fetch(req).await
    }

    async fn get_channel(&self, channel_id: &str, etag: Option<&str>) -> ApiResult<Channel> {
        let req = ApiRequest::get(format!("/channels/{}", segment(channel_id))).etag(etag);
        self.fetch(req).await
    }

    async fn update_channel_privacy(
        &self,
        channel_id: &str,
        privacy: ChannelType,
    ) -> ApiResult<Channel> {
        let req = ApiRequest::put(format!("/channels/{}/privacy", segment(channel_id)))
            .json(&json!({ "privacy": privacy }))?;
        self.fetch(req).await
    }

    // ── Posts ───────────────────────────────────────────────────────────────

    async fn get_post(&self, post_id: &str, etag: Option<&str>) -> ApiResult<Post> {
        let req = ApiRequest::get(format!("/posts/{}", segment(post_id))).etag(etag);
        self.fetch(req).await
    }

    async fn create_post(&self, post: &Post) -> ApiResult<Post> {
        self.fetch(ApiRequest::post("/posts").json(post)?).await
    }

    async fn get_posts_for_channel(
        &self,
        channel_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
        collapsed_threads: bool,
    ) -> ApiResult<PostList> {
        let mut req = ApiRequest::get(format!("/channels/{}/posts", segment(channel_id)))
            .paged(page, per_page);
        if collapsed_threads {
            req = req.query("collapsedThreads", true);
        }
        self.fetch(req.etag(etag)).await
    }

    async fn do_api_post(&self, url: &str, data: &str) -> ApiResult<Bytes> {
        let path = if url.starts_with('/') {
            url.to_string()
        } else {
            format!("/{url}")
        };
        let req = ApiRequest::post(path).body(Body::Text(data.to_string()));
        self.send(req).await
    }

    // ── Groups ──────────────────────────────────────────────────────────────

    async fn get_ldap_groups(&self) -> ApiResult<Vec<Group>> {
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct LdapGroups {
            groups: Vec<Group>,
        }

        let (page, response) = self
            .fetch::<LdapGroups>(ApiRequest::get("/ldap/groups"))
            .await?;
        Ok((page.groups, response))
    }

    async fn get_groups_by_channel(
        &self,
        channel_id: &str,
        opts: &GroupSearchOpts,
    ) -> ApiResult<(Vec<GroupWithSchemeAdmin>, i64)> {
        self.get_groups_by_syncable(format!("/channels/{}/groups", segment(channel_id)), opts)
            .await
    }

    async fn get_groups_by_team(
        &self,
        team_id: &str,
        opts: &GroupSearchOpts,
    ) -> ApiResult<(Vec<GroupWithSchemeAdmin>, i64)> {
        self.get_groups_by_syncable(format!("/teams/{}/groups", segment(team_id)), opts)
            .await
    }

    // ── License ─────────────────────────────────────────────────────────────

    async fn upload_license_file(&self, data: &[u8]) -> Result<Response> {
        let body = Body::Multipart(MultipartBody {
            file_field: "license".into(),
            file_name: LICENSE_FILE_NAME.into(),
            data: Bytes::copy_from_slice(data),
            fields: Vec::new(),
        });
        self.perform(ApiRequest::post("/license").body(body)).await
    }

    async fn remove_license_file(&self) -> Result<Response> {
        self.perform(ApiRequest::delete("/license")).await
    }

    // ── Logs ────────────────────────────────────────────────────────────────

    async fn get_logs(&self, page: u32, per_page: u32) -> ApiResult<Vec<String>> {
        let req = ApiRequest::get("/logs")
            .query("page", page)
            .query("logs_per_page", per_page);
        self.fetch(req).await
    }

    // ── Roles ───────────────────────────────────────────────────────────────

    async fn get_role_by_name(&self, name: &str) -> ApiResult<Role> {
        self.fetch(ApiRequest::get(format!("/roles/name/{}", segment(name))))
            .await
    }

    async fn patch_role(&self, role_id: &str, patch: &RolePatch) -> ApiResult<Role> {
        let req = ApiRequest::put(format!("/roles/{}/patch", segment(role_id))).json(patch)?;
        self.fetch(req).await
    }

    // ── Plugins ─────────────────────────────────────────────────────────────

    async fn upload_plugin(&self, file: UploadReader<'_>) -> ApiResult<Manifest> {
        self.upload_plugin_with(file, false).await
    }

    async fn upload_plugin_forced(&self, file: UploadReader<'_>) -> ApiResult<Manifest> {
        self.upload_plugin_with(file, true).await
    }

    async fn remove_plugin(&self, id: &str) -> Result<Response> {
        self.perform(ApiRequest::delete(format!("/plugins/{}", segment(id))))
            .await
    }

    async fn enable_plugin(&self, id: &str) -> Result<Response> {
        self.perform(ApiRequest::post(format!("/plugins/{}/enable", segment(id))))
            .await
    }

    async fn disable_plugin(&self, id: &str) -> Result<Response> {
        self.perform(ApiRequest::post(format!("/plugins/{}/disable", segment(id))))
            .await
    }

    async fn get_plugins(&self) -> ApiResult<PluginsResponse> {
        self.fetch(ApiRequest::get("/plugins")).await
    }

    async fn install_plugin_from_url(&self, url: &str, force: bool) -> ApiResult<Manifest> {
        let req = ApiRequest::post("/plugins/install_from_url")
            .query("plugin_download_url", url)
            .query("force", force);
        self.fetch(req).await
    }

    async fn install_marketplace_plugin(
        &self,
        request: &InstallMarketplacePluginRequest,
    ) -> ApiResult<Manifest> {
        self.fetch(ApiRequest::post("/plugins/marketplace").json(request)?)
            .await
    }

    async fn get_marketplace_plugins(
        &self,
        filter: &MarketplacePluginFilter,
    ) -> ApiResult<Vec<MarketplacePlugin>> {
        let mut req = ApiRequest::get("/plugins/marketplace");
        req.query = filter.query_pairs();
        self.fetch(req).await
    }

    // ── Users ───────────────────────────────────────────────────────────────

    async fn get_user(&self, user_id: &str, etag: Option<&str>) -> ApiResult<User> {
        let req = ApiRequest::get(format!("/users/{}", segment(user_id))).etag(etag);
        self.fetch(req).await
    }

    async fn get_user_by_username(&self, user_name: &str, etag: Option<&str>) -> ApiResult<User> {
        let req = ApiRequest::get(format!("/users/username/{}", segment(user_name))).etag(etag);
        self.fetch(req).await
    }

    async fn get_user_by_email(&self, email: &str, etag: Option<&str>) -> ApiResult<User> {
        let req = ApiRequest::get(format!("/users/email/{}", segment(email))).etag(etag);
        self.fetch(req).await
    }

    async fn permanent_delete_user(&self, user_id: &str) -> Result<Response> {
        let req = ApiRequest::delete(format!("/users/{}", segment(user_id))).query("permanent", true);
        self.perform(req).await
    }

    async fn permanent_delete_all_users(&self) -> Result<Response> {
        self.perform(ApiRequest::delete("/users")).await
    }

    async fn create_user(&self, user: &User) -> ApiResult<User> {
        self.fetch(ApiRequest::post("/users").json(user)?).await
    }

    async fn verify_user_email_without_token(&self, user_id: &str) -> ApiResult<User> {
        self.fetch(ApiRequest::post(format!(
            "/users/{}/email/verify/member",
            segment(user_id)
        )))
        .await
    }

    async fn update_user_roles(&self, user_id: &str, roles: &str) -> Result<Response> {
        let req = ApiRequest::put(format!("/users/{}/roles", segment(user_id)))
            .json(&json!({ "roles": roles }))?;
        self.perform(req).await
    }

    async fn send_password_reset_email(&self, email: &str) -> Result<Response> {
        let req = ApiRequest::post("/users/password/reset/send").json(&json!({ "email": email }))?;
        self.perform(req).await
    }

    async fn update_user(&self, user: &User) -> ApiResult<User> {
        let req = ApiRequest::put(format!("/users/{}", segment(&user.id))).json(user)?;
        self.fetch(req).await
    }

    async fn update_user_mfa(
        &self,
        user_id: &str,
        code: &str,
        activate: bool,
    ) -> Result<Response> {
        let body = if activate {
            json!({ "activate": true, "code": code })
        } else {
            json!({ "activate": false })
        };
        let req = ApiRequest::put(format!("/users/{}/mfa", segment(user_id))).json(&body)?;
        self.perform(req).await
    }

    async fn update_user_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<Response> {
        let req = ApiRequest::put(format!("/users/{}/password", segment(user_id))).json(&json!({
            "current_password": current_password,
            "new_password": new_password,
        }))?;
        self.perform(req).await
    }

    async fn update_user_hashed_password(
        &self,
        user_id: &str,
        new_hashed_password: &str,
    ) -> Result<Response> {
        let req = ApiRequest::put(format!("/users/{}/password", segment(user_id))).json(&json!({
            "already_hashed": true,
            "new_password": new_hashed_password,
        }))?;
        self.perform(req).await
    }

    async fn create_user_access_token(
        &self,
        user_id: &str,
        description: &str,
    ) -> ApiResult<UserAccessToken> {
        let req = ApiRequest::post(format!("/users/{}/tokens", segment(user_id)))
            .json(&json!({ "description": description }))?;
        self.fetch(req).await
    }

    async fn revoke_user_access_token(&self, token_id: &str) -> Result<Response> {
        let req = ApiRequest::post("/users/tokens/revoke").json(&json!({ "token_id": token_id }))?;
        self.perform(req).await
    }

    async fn get_user_access_tokens_for_user(
        &self,
        user_id: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Vec<UserAccessToken>> {
        let req =
            ApiRequest::get(format!("/users/{}/tokens", segment(user_id))).paged(page, per_page);
        self.fetch(req).await
    }

    async fn convert_user_to_bot(&self, user_id: &str) -> ApiResult<Bot> {
        self.fetch(ApiRequest::post(format!(
            "/users/{}/convert_to_bot",
            segment(user_id)
        )))
        .await
    }

    async fn convert_bot_to_user(
        &self,
        user_id: &str,
        user_patch: &UserPatch,
        set_system_admin: bool,
    ) -> ApiResult<User> {
        let req = ApiRequest::post(format!("/bots/{}/convert_to_user", segment(user_id)))
            .query("set_system_admin", set_system_admin)
            .json(user_patch)?;
        self.fetch(req).await
    }

    async fn promote_guest_to_user(&self, user_id: &str) -> Result<Response> {
        self.perform(ApiRequest::post(format!(
            "/users/{}/promote",
            segment(user_id)
        )))
        .await
    }

    async fn demote_user_to_guest(&self, guest_id: &str) -> Result<Response> {
        self.perform(ApiRequest::post(format!(
            "/users/{}/demote",
            segment(guest_id)
        )))
        .await
    }

    async fn get_users(
        &self,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<User>> {
        let req = ApiRequest::get("/users").paged(page, per_page).etag(etag);
        self.fetch(req).await
    }

    async fn get_users_by_ids(&self, user_ids: &[String]) -> ApiResult<Vec<User>> {
        self.fetch(ApiRequest::post("/users/ids").json(&user_ids)?)
            .await
    }

    async fn get_users_in_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<User>> {
        let req = ApiRequest::get("/users")
            .query("in_team", team_id)
            .paged(page, per_page)
            .etag(etag);
        self.fetch(req).await
    }

    async fn update_user_active(&self, user_id: &str, activate: bool) -> Result<Response> {
        let req = ApiRequest::put(format!("/users/{}/active", segment(user_id)))
            .json(&json!({ "active": activate }))?;
        self.perform(req).await
    }

    async fn migrate_auth_to_ldap(
        &self,
        from_auth_service: &str,
        match_field: &str,
        force: bool,
    ) -> Result<Response> {
        let req = ApiRequest::post("/users/migrate_auth/ldap").json(&json!({
            "from": from_auth_service,
            "force": force,
            "match_field": match_field,
        }))?;
        self.perform(req).await
    }

    async fn migrate_auth_to_saml(
        &self,
        from_auth_service: &str,
        users_map: &HashMap<String, String>,
        auto: bool,
    ) -> Result<Response> {
        let req = ApiRequest::post("/users/migrate_auth/saml").json(&json!({
            "from": from_auth_service,
            "auto": auto,
            "matches": users_map,
        }))?;
        self.perform(req).await
    }

    async fn reset_saml_auth_data_to_email(
        &self,
        include_deleted: bool,
        dry_run: bool,
        user_ids: &[String],
    ) -> ApiResult<i64> {
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct Affected {
            num_affected: i64,
        }

        let req = ApiRequest::post("/saml/reset_auth_data").json(&json!({
            "include_deleted": include_deleted,
            "dry_run": dry_run,
            "user_ids": user_ids,
        }))?;
        let (affected, response) = self.fetch::<Affected>(req).await?;
        Ok((affected.num_affected, response))
    }

    // ── Commands ────────────────────────────────────────────────────────────

    async fn create_command(&self, cmd: &Command) -> ApiResult<Command> {
        self.fetch(ApiRequest::post("/commands").json(cmd)?).await
    }

    async fn list_commands(&self, team_id: &str, custom_only: bool) -> ApiResult<Vec<Command>> {
        let req = ApiRequest::get("/commands")
            .query("team_id", team_id)
            .query("custom_only", custom_only);
        self.fetch(req).await
    }

    async fn get_command_by_id(&self, cmd_id: &str) -> ApiResult<Command> {
        self.fetch(ApiRequest::get(format!("/commands/{}", segment(cmd_id))))
            .await
    }

    async fn update_command(&self, cmd: &Command) -> ApiResult<Command> {
        let req = ApiRequest::put(format!("/commands/{}", segment(&cmd.id))).json(cmd)?;
        self.fetch(req).await
    }

    async fn move_command(&self, team_id: &str, command_id: &str) -> Result<Response> {
        let req = ApiRequest::put(format!("/commands/{}/move", segment(command_id)))
            .json(&json!({ "team_id": team_id }))?;
        self.perform(req).await
    }

    async fn delete_command(&self, command_id: &str) -> Result<Response> {
        self.perform(ApiRequest::delete(format!(
            "/commands/{}",
            segment(command_id)
        )))
        .await
    }

    // ── Config ──────────────────────────────────────────────────────────────

    async fn get_config(&self) -> ApiResult<Config> {
        self.fetch(ApiRequest::get("/config")).await
    }

    async fn update_config(&self, config: &Config) -> ApiResult<Config> {
        self.fetch(ApiRequest::put("/config").json(config)?).await
    }

    async fn patch_config(&self, config: &Config) -> ApiResult<Config> {
        self.fetch(ApiRequest::put("/config/patch").json(config)?)
            .await
    }

    async fn reload_config(&self) -> Result<Response> {
        self.perform(ApiRequest::post("/config/reload")).await
    }

    async fn migrate_config(&self, from: &str, to: &str) -> Result<Response> {
        let req = ApiRequest::post("/config/migrate").json(&json!({ "from": from, "to": to }))?;
        self.perform(req).await
    }

    // ── LDAP ────────────────────────────────────────────────────────────────

    async fn sync_ldap(&self, include_removed_members: bool) -> Result<Response> {
        let req = ApiRequest::post("/ldap/sync")
            .json(&json!({ "include_removed_members": include_removed_members }))?;
        self.perform(req).await
    }

    async fn migrate_id_ldap(&self, to_attribute: &str) -> Result<Response> {
        let req =
            ApiRequest::post("/ldap/migrateid").json(&json!({ "toAttribute": to_attribute }))?;
        self.perform(req).await
    }

    // ── Bots ────────────────────────────────────────────────────────────────

    async fn create_bot(&self, bot: &Bot) -> ApiResult<Bot> {
        self.fetch(ApiRequest::post("/bots").json(bot)?).await
    }

    async fn patch_bot(&self, user_id: &str, patch: &BotPatch) -> ApiResult<Bot> {
        let req = ApiRequest::put(format!("/bots/{}", segment(user_id))).json(patch)?;
        self.fetch(req).await
    }

    async fn get_bots(&self, page: u32, per_page: u32, etag: Option<&str>) -> ApiResult<Vec<Bot>> {
        let req = ApiRequest::get("/bots").paged(page, per_page).etag(etag);
        self.fetch(req).await
    }

    async fn get_bots_include_deleted(
        &self,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Bot>> {
        let req = ApiRequest::get("/bots")
            .paged(page, per_page)
            .query("include_deleted", true)
            .etag(etag);
        self.fetch(req).await
    }

    async fn get_bots_orphaned(
        &self,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<Bot>> {
        let req = ApiRequest::get("/bots")
            .paged(page, per_page)
            .query("only_orphaned", true)
            .etag(etag);
        self.fetch(req).await
    }

    async fn disable_bot(&self, bot_user_id: &str) -> ApiResult<Bot> {
        self.fetch(ApiRequest::post(format!(
            "/bots/{}/disable",
            segment(bot_user_id)
        )))
        .await
    }

    async fn enable_bot(&self, bot_user_id: &str) -> ApiResult<Bot> {
        self.fetch(ApiRequest::post(format!(
            "/bots/{}/enable",
            segment(bot_user_id)
        )))
        .await
    }

    async fn assign_bot(&self, bot_user_id: &str, new_owner_id: &str) -> ApiResult<Bot> {
        let path = format!(
            "/bots/{}/assign/{}",
            segment(bot_user_id),
            segment(new_owner_id)
        );
        self.fetch(ApiRequest::post(path)).await
    }

    // ── System ──────────────────────────────────────────────────────────────

    async fn set_server_busy(&self, secs: u64) -> Result<Response> {
        self.perform(ApiRequest::post("/server_busy").query("seconds", secs))
            .await
    }

    async fn clear_server_busy(&self) -> Result<Response> {
        self.perform(ApiRequest::delete("/server_busy")).await
    }

    async fn get_server_busy(&self) -> ApiResult<ServerBusyState> {
        self.fetch(ApiRequest::get("/server_busy")).await
    }

    async fn check_integrity(&self) -> ApiResult<Vec<IntegrityCheckResult>> {
        self.fetch(ApiRequest::post("/integrity")).await
    }

    async fn get_ping(&self) -> ApiResult<String> {
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct Ping {
            status: String,
        }

        let (ping, response) = self.fetch::<Ping>(ApiRequest::get("/system/ping")).await?;
        Ok((ping.status, response))
    }

    async fn get_ping_with_full_server_status(&self) -> ApiResult<HashMap<String, String>> {
        let req = ApiRequest::get("/system/ping").query("get_server_status", true);
        let (raw, response) = self
            .fetch::<HashMap<String, serde_json::Value>>(req)
            .await?;
        let status = raw.into_iter().map(|(k, v)| (k, json_text(v))).collect();
        Ok((status, response))
    }

    // ── Uploads ─────────────────────────────────────────────────────────────

    async fn create_upload(&self, session: &UploadSession) -> ApiResult<UploadSession> {
        self.fetch(ApiRequest::post("/uploads").json(session)?).await
    }

    async fn get_upload(&self, upload_id: &str) -> ApiResult<UploadSession> {
        self.fetch(ApiRequest::get(format!("/uploads/{}", segment(upload_id))))
            .await
    }

    async fn get_uploads_for_user(&self, user_id: &str) -> ApiResult<Vec<UploadSession>> {
        self.fetch(ApiRequest::get(format!("/users/{}/uploads", segment(user_id))))
            .await
    }

    async fn upload_data(
        &self,
        upload_id: &str,
        data: UploadReader<'_>,
    ) -> ApiResult<Option<FileInfo>> {
        let data = read_all(data).await?;
        let len = data.len();
        let req = ApiRequest::post(format!("/uploads/{}", segment(upload_id)))
            .body(Body::Bytes(data));
        let (body, response) = self.send(req).await?;
        debug!(upload_id, bytes = len, status = response.status_code, "upload chunk sent");
        if response.status_code == 204 || body.is_empty() {
            return Ok((None, response));
        }
        let (info, response) = decode::<FileInfo>(&body, response)?;
        Ok((Some(info), response))
    }

    // ── Imports & exports ───────────────────────────────────────────────────

    async fn list_imports(&self) -> ApiResult<Vec<String>> {
        self.fetch(ApiRequest::get("/imports")).await
    }

    async fn list_exports(&self) -> ApiResult<Vec<String>> {
        self.fetch(ApiRequest::get("/exports")).await
    }

    async fn delete_export(&self, name: &str) -> Result<Response> {
        self.perform(ApiRequest::delete(format!("/exports/{}", segment(name))))
            .await
    }

    async fn download_export(
        &self,
        name: &str,
        writer: DownloadWriter<'_>,
        offset: u64,
    ) -> ApiResult<u64> {
        let mut req = ApiRequest::get(format!("/exports/{}", segment(name)));
        if offset > 0 {
            req = req.header("Range", format!("bytes={offset}-"));
        }

        let streaming = self.transport.execute_streaming(req).await?;
        let response = Response::from_parts(streaming.status, streaming.headers.clone());
        if response.status_code >= 300 {
            let raw = streaming.into_raw().await?;
            let response = check_status(response, &raw.body)?;
            return Ok((0, response));
        }

        let mut written = 0u64;
        let mut body = streaming.body;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;

        info!(export = name, offset, bytes = written, "export downloaded");
        Ok((written, response))
    }

    // ── Jobs ────────────────────────────────────────────────────────────────

    async fn get_job(&self, id: &str) -> ApiResult<Job> {
        self.fetch(ApiRequest::get(format!("/jobs/{}", segment(id))))
            .await
    }

    async fn get_jobs(&self, page: u32, per_page: u32) -> ApiResult<Vec<Job>> {
        self.fetch(ApiRequest::get("/jobs").paged(page, per_page))
            .await
    }

    async fn get_jobs_by_type(
        &self,
        job_type: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Vec<Job>> {
        let req =
            ApiRequest::get(format!("/jobs/type/{}", segment(job_type))).paged(page, per_page);
        self.fetch(req).await
    }

    async fn create_job(&self, job: &Job) -> ApiResult<Job> {
        self.fetch(ApiRequest::post("/jobs").json(job)?).await
    }

    async fn cancel_job(&self, job_id: &str) -> Result<Response> {
        self.perform(ApiRequest::post(format!("/jobs/{}/cancel", segment(job_id))))
            .await
    }

    // ── Webhooks ────────────────────────────────────────────────────────────

    async fn create_incoming_webhook(
        &self,
        hook: &IncomingWebhook,
    ) -> ApiResult<IncomingWebhook> {
        self.fetch(ApiRequest::post("/hooks/incoming").json(hook)?)
            .await
    }

    async fn update_incoming_webhook(
        &self,
        hook: &IncomingWebhook,
    ) -> ApiResult<IncomingWebhook> {
        let req = ApiRequest::put(format!("/hooks/incoming/{}", segment(&hook.id))).json(hook)?;
        self.fetch(req).await
    }

    async fn get_incoming_webhooks(
        &self,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<IncomingWebhook>> {
        let req = ApiRequest::get("/hooks/incoming")
            .paged(page, per_page)
            .etag(etag);
        self.fetch(req).await
    }

    async fn get_incoming_webhooks_for_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<IncomingWebhook>> {
        let req = ApiRequest::get("/hooks/incoming")
            .paged(page, per_page)
            .query("team_id", team_id)
            .etag(etag);
        self.fetch(req).await
    }

    async fn get_incoming_webhook(
        &self,
        hook_id: &str,
        etag: Option<&str>,
    ) -> ApiResult<IncomingWebhook> {
        let req = ApiRequest::get(format!("/hooks/incoming/{}", segment(hook_id))).etag(etag);
        self.fetch(req).await
    }

    async fn delete_incoming_webhook(&self, hook_id: &str) -> Result<Response> {
        self.perform(ApiRequest::delete(format!(
            "/hooks/incoming/{}",
            segment(hook_id)
        )))
        .await
    }

    async fn create_outgoing_webhook(
        &self,
        hook: &OutgoingWebhook,
    ) -> ApiResult<OutgoingWebhook> {
        self.fetch(ApiRequest::post("/hooks/outgoing").json(hook)?)
            .await
    }

    async fn update_outgoing_webhook(
        &self,
        hook: &OutgoingWebhook,
    ) -> ApiResult<OutgoingWebhook> {
        let req = ApiRequest::put(format!("/hooks/outgoing/{}", segment(&hook.id))).json(hook)?;
        self.fetch(req).await
    }

    async fn get_outgoing_webhooks(
        &self,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<OutgoingWebhook>> {
        let req = ApiRequest::get("/hooks/outgoing")
            .paged(page, per_page)
            .etag(etag);
        self.fetch(req).await
    }

    async fn get_outgoing_webhook(&self, hook_id: &str) -> ApiResult<OutgoingWebhook> {
        self.fetch(ApiRequest::get(format!(
            "/hooks/outgoing/{}",
            segment(hook_id)
        )))
        .await
    }

    async fn get_outgoing_webhooks_for_channel(
        &self,
        channel_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<OutgoingWebhook>> {
        let req = ApiRequest::get("/hooks/outgoing")
            .paged(page, per_page)
            .query("channel_id", channel_id)
            .etag(etag);
        self.fetch(req).await
    }

    async fn get_outgoing_webhooks_for_team(
        &self,
        team_id: &str,
        page: u32,
        per_page: u32,
        etag: Option<&str>,
    ) -> ApiResult<Vec<OutgoingWebhook>> {
        let req = ApiRequest::get("/hooks/outgoing")
            .paged(page, per_page)
            .query("team_id", team_id)
            .etag(etag);
        self.fetch(req).await
    }

    async fn regen_outgoing_hook_token(&self, hook_id: &str) -> ApiResult<OutgoingWebhook> {
        self.fetch(ApiRequest::post(format!(
            "/hooks/outgoing/{}/regen_token",
            segment(hook_id)
        )))
        .await
    }

    async fn delete_outgoing_webhook(&self, hook_id: &str) -> Result<Response> {
        self.perform(ApiRequest::delete(format!(
            "/hooks/outgoing/{}",
            segment(hook_id)
        )))
        .await
    }
}
