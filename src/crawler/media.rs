//! Media asset downloading
//!
//! Assets stream straight from the shared connection session into the
//! storage writer's staged path, then get renamed into place. An asset that
//! is already mirrored costs one `stat`, nothing more.

use crate::fetch::download_into;
use crate::resource::Resource;
use crate::storage::MirrorStore;
use crate::url::UrlParts;
use crate::Result;
use reqwest::Client;

/// Downloads one media asset unless its mirror file already exists
///
/// Returns whether a download happened. The staging path is claimed with a
/// create-new open, so two workers racing on the same asset stream it once:
/// the loser sees the claim and backs off. Failures (non-200, transport,
/// storage) surface as errors for the caller to log; they never have to
/// abort the page that referenced the asset.
pub async fn download_media(
    client: &Client,
    store: &MirrorStore,
    base: &UrlParts,
    resource: &Resource,
) -> Result<bool> {
    let (path, dirs) = store.media_path(base, resource)?;

    if path.is_file() {
        return Ok(false);
    }

    store.ensure_directories(&dirs)?;

    let staged = MirrorStore::stage_path(&path);
    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&staged)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            // Another worker is already streaming this asset
            tracing::debug!("Staging claim held elsewhere for {}", path.display());
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    download_into(client, resource.url.as_str(), &mut file).await?;
    drop(file);
    MirrorStore::promote(&staged, &path)?;

    Ok(true)
}
