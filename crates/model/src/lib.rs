//! Wire records for the collaboration server's REST API (v4).
//!
//! These types mirror the server's JSON shapes. They carry no behaviour beyond
//! serde mapping and a few convenience accessors; the server owns validation.
//! Every struct uses `#[serde(default)]` so that fields added by newer server
//! versions, or omitted by older ones, never fail decoding. Collections the
//! server may send as `null` decode as empty.

pub mod bot;
pub mod channel;
pub mod command;
pub mod config;
pub mod error;
pub mod group;
pub mod job;
mod nullable;
pub mod plugin;
pub mod post;
pub mod role;
pub mod system;
pub mod team;
pub mod upload;
pub mod user;
pub mod webhook;

pub use {
    bot::{Bot, BotPatch},
    channel::{Channel, ChannelMember, ChannelMembers, ChannelPatch, ChannelType},
    command::Command,
    config::Config,
    error::AppError,
    group::{Group, GroupSearchOpts, GroupWithSchemeAdmin},
    job::Job,
    plugin::{
        InstallMarketplacePluginRequest, Manifest, MarketplacePlugin, MarketplacePluginFilter,
        PluginInfo, PluginsResponse,
    },
    post::{Post, PostList},
    role::{Role, RolePatch},
    system::{IntegrityCheckResult, RelationalIntegrityCheckData, ServerBusyState},
    team::{Team, TeamMember, TeamPatch, TeamSearch},
    upload::{FileInfo, UploadSession, UploadType},
    user::{User, UserAccessToken, UserPatch},
    webhook::{IncomingWebhook, OutgoingWebhook},
};

/// Team privacy value for open (public) teams.
pub const TEAM_OPEN: &str = "O";
/// Team privacy value for invite-only teams.
pub const TEAM_INVITE: &str = "I";
