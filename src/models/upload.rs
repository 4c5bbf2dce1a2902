//! Package file upload.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::client::QuetzClient;
use crate::error::{QuetzError, Result};

#[derive(Debug, Serialize)]
struct UploadQuery<'a> {
    force: bool,
    sha256: &'a str,
}

/// Lowercase hex SHA-256 of `content`.
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Upload a package file to a channel.
///
/// Sends `POST /api/channels/{channel}/upload/{filename}?force=<force>&sha256=<hex>`
/// with the file as a multipart part named `files`. With `force` the server
/// replaces an existing file of the same name.
///
/// # Errors
///
/// Returns [`QuetzError::Io`] if the file cannot be read and
/// [`QuetzError::Config`] if `path` has no UTF-8 file name; no request is
/// made in either case.
#[tracing::instrument(skip(client, path))]
pub async fn upload_file(
    client: &QuetzClient,
    channel: &str,
    path: impl AsRef<Path>,
    force: bool,
) -> Result<()> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            QuetzError::Config(format!("'{}' does not name a file", path.display()))
        })?
        .to_string();

    let content = tokio::fs::read(path).await?;
    let sha256 = sha256_hex(&content);
    tracing::debug!(size = content.len(), %sha256, "uploading package file");

    let url_path = format!(
        "api/channels/{}/upload/{}",
        urlencoding::encode(channel),
        urlencoding::encode(&filename)
    );
    let form = Form::new().part("files", Part::bytes(content).file_name(filename));

    client
        .post_multipart(
            &url_path,
            &UploadQuery {
                force,
                sha256: &sha256,
            },
            form,
        )
        .await?;
    Ok(())
}
