use anyhow::{Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Streams `url` into `local_path`, failing on any non-2xx status.
pub async fn download_file(client: &Client, url: &str, local_path: &Path) -> Result<()> {
    let filename = local_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| url.to_string());
    tracing::debug!("Downloading {} to {}", url, local_path.display());

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("cannot fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("cannot fetch {}", url))?;
    let total_size = response.content_length().unwrap_or(0);

    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
            .context("invalid progress bar template")?
            .progress_chars("#>-"),
    );
    pb.set_message(format!("Downloading {}", filename));

    let mut file = fs::File::create(local_path)
        .with_context(|| format!("cannot create {}", local_path.display()))?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("cannot read {}", url))?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }
    file.flush()?;

    pb.finish_and_clear();
    Ok(())
}

/// Downloads the upstream `install.sh` and marks it executable.
pub async fn fetch_installer(client: &Client, installer_url: &str, script_path: &Path) -> Result<()> {
    download_file(client, installer_url, script_path)
        .await
        .context("cannot fetch install script")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(script_path, fs::Permissions::from_mode(0o744))
            .context("cannot chmod install script")?;
    }

    tracing::info!("Downloaded install.sh to {}", script_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versions::http_client;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_installer_writes_script() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/install.sh");
                then.status(200).body("#!/bin/sh\necho hi\n");
            })
            .await;

        let dir = TempDir::new().unwrap();
        let script = dir.path().join("install.sh");
        let client = http_client().unwrap();
        fetch_installer(&client, &server.url("/install.sh"), &script)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(fs::read_to_string(&script).unwrap(), "#!/bin/sh\necho hi\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&script).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o744);
        }
    }

    #[tokio::test]
    async fn test_fetch_installer_fails_on_missing_script() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/install.sh");
                then.status(404);
            })
            .await;

        let dir = TempDir::new().unwrap();
        let client = http_client().unwrap();
        let result = fetch_installer(
            &client,
            &server.url("/install.sh"),
            &dir.path().join("install.sh"),
        )
        .await;

        assert!(result.is_err());
    }
}
