use std::path::PathBuf;

use {
    anyhow::{Context, Result},
    clap::Subcommand,
    mmctl_client::Client,
    mmctl_model::{InstallMarketplacePluginRequest, MarketplacePluginFilter, PluginInfo},
};

#[derive(Subcommand)]
pub enum PluginAction {
    /// List installed plugins.
    List,
    /// Upload a plugin bundle (.tar.gz).
    Add {
        bundle: PathBuf,
        /// Replace an installed plugin with the same id.
        #[arg(long)]
        force: bool,
    },
    /// Install a plugin from a download URL.
    InstallUrl {
        url: String,
        #[arg(long)]
        force: bool,
    },
    /// Install a plugin from the marketplace.
    Install {
        id: String,
        #[arg(long, default_value = "")]
        version: String,
    },
    /// Search the marketplace.
    Marketplace {
        #[arg(long, default_value = "")]
        filter: String,
        #[arg(long)]
        local_only: bool,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 50)]
        per_page: u32,
    },
    Enable { id: String },
    Disable { id: String },
    /// Remove an installed plugin.
    Remove { id: String },
}

pub async fn handle_plugin(action: PluginAction, client: &dyn Client, json: bool) -> Result<()> {
    match action {
        PluginAction::List => {
            let (plugins, _) = client.get_plugins().await?;
            if json {
                return crate::print_json(&plugins);
            }
            println!("Active:");
            print_plugins(&plugins.active);
            println!("Inactive:");
            print_plugins(&plugins.inactive);
        },
        PluginAction::Add { bundle, force } => {
            let mut file = tokio::fs::File::open(&bundle)
                .await
                .with_context(|| format!("cannot open {}", bundle.display()))?;
            let (manifest, _) = if force {
                client.upload_plugin_forced(&mut file).await?
            } else {
                client.upload_plugin(&mut file).await?
            };
            eprintln!("Uploaded plugin {} {}.", manifest.id, manifest.version);
        },
        PluginAction::InstallUrl { url, force } => {
            let (manifest, _) = client.install_plugin_from_url(&url, force).await?;
            eprintln!("Installed plugin {} {}.", manifest.id, manifest.version);
        },
        PluginAction::Install { id, version } => {
            let request = InstallMarketplacePluginRequest { id, version };
            let (manifest, _) = client.install_marketplace_plugin(&request).await?;
            eprintln!("Installed plugin {} {}.", manifest.id, manifest.version);
        },
        PluginAction::Marketplace {
            filter,
            local_only,
            page,
            per_page,
        } => {
            let filter = MarketplacePluginFilter {
                page,
                per_page,
                filter,
                local_only,
                ..MarketplacePluginFilter::default()
            };
            let (plugins, _) = client.get_marketplace_plugins(&filter).await?;
            if json {
                return crate::print_json(&plugins);
            }
            for plugin in plugins {
                let manifest = plugin.manifest.unwrap_or_default();
                println!("{:<40} {:<10} {}", manifest.id, manifest.version, manifest.name);
            }
        },
        PluginAction::Enable { id } => {
            client.enable_plugin(&id).await?;
            eprintln!("Enabled plugin {id}.");
        },
        PluginAction::Disable { id } => {
            client.disable_plugin(&id).await?;
            eprintln!("Disabled plugin {id}.");
        },
        PluginAction::Remove { id } => {
            client.remove_plugin(&id).await?;
            eprintln!("Removed plugin {id}.");
        },
    }
    Ok(())
}

fn print_plugins(plugins: &[PluginInfo]) {
    if plugins.is_empty() {
        println!("  (none)");
    }
    for plugin in plugins {
        let m = &plugin.manifest;
        println!("  {:<40} {:<10} {}", m.id, m.version, m.name);
    }
}
