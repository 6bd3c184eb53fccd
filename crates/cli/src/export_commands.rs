use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result},
    clap::Subcommand,
    mmctl_client::Client,
    tokio::{fs::OpenOptions, io::AsyncWriteExt},
};

#[derive(Subcommand)]
pub enum ExportAction {
    /// List export files on the server.
    List,
    /// Download an export file.
    Download {
        name: String,
        /// Destination path; defaults to `name` in the current directory.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Continue a partial download instead of starting over.
        #[arg(long)]
        resume: bool,
    },
    /// Delete an export file from the server.
    Delete { name: String },
}

pub async fn handle_export(action: ExportAction, client: &dyn Client, json: bool) -> Result<()> {
    match action {
        ExportAction::List => {
            let (exports, _) = client.list_exports().await?;
            if json {
                return crate::print_json(&exports);
            }
            for name in exports {
                println!("{name}");
            }
        },
        ExportAction::Download { name, out, resume } => {
            let path = out.unwrap_or_else(|| PathBuf::from(&name));
            let offset = if resume {
                existing_len(&path).await
            } else {
                0
            };

            let saved = download(client, &name, &path, offset).await?;
            if saved.appended {
                eprintln!(
                    "Appended {} bytes to {} (resumed at byte {offset}).",
                    saved.written,
                    path.display()
                );
            } else {
                eprintln!("Wrote {} bytes to {}.", saved.written, path.display());
            }
        },
        ExportAction::Delete { name } => {
            client.delete_export(&name).await?;
            eprintln!("Deleted export {name}.");
        },
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
struct Saved {
    written: u64,
    appended: bool,
}

/// Download into a temporary sibling of `path`, then move the result into place.
///
/// `path` is untouched unless the download succeeds. A ranged (206) reply is
/// appended to `path`; a full reply replaces it, even when a range was asked for.
async fn download(client: &dyn Client, name: &str, path: &Path, offset: u64) -> Result<Saved> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let staging = tempfile::Builder::new()
        .prefix(".mmctl-download-")
        .tempfile_in(&dir)
        .with_context(|| format!("cannot create a temporary file in {}", dir.display()))?;

    let mut file = tokio::fs::File::from_std(staging.reopen()?);
    let (written, response) = client.download_export(name, &mut file, offset).await?;
    drop(file);

    if offset > 0 && response.status_code == 206 {
        let mut target = OpenOptions::new()
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("cannot open {}", path.display()))?;
        let mut part = tokio::fs::File::open(staging.path()).await?;
        tokio::io::copy(&mut part, &mut target).await?;
        target.flush().await?;
        return Ok(Saved {
            written,
            appended: true,
        });
    }

    staging
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(Saved {
        written,
        appended: false,
    })
}

async fn existing_len(path: &Path) -> u64 {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.len())
        .unwrap_or(0)
}
