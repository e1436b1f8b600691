// API client module: a small blocking HTTP client that talks to the image
// host's upload endpoint on behalf of one user profile.

use crate::config::UserProfile;
use crate::error::{Error, Result};
use log::{debug, info};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

pub const UPLOAD_PATH: &str = "/api/v1/upload";

/// Blocking client bound to the host and credentials of one profile.
pub struct ApiClient {
    client: Client,
    profile: UserProfile,
}

/// Only the part of the upload response we use. Every level defaults so
/// that a body missing some of it still decodes.
#[derive(Deserialize, Debug, Default)]
struct UploadResponse {
    #[serde(default)]
    data: UploadData,
}

#[derive(Deserialize, Debug, Default)]
struct UploadData {
    #[serde(default)]
    links: UploadLinks,
}

#[derive(Deserialize, Debug, Default)]
struct UploadLinks {
    #[serde(default)]
    url: String,
}

impl ApiClient {
    pub fn new(profile: UserProfile) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(ApiClient { client, profile })
    }

    fn upload_url(&self) -> String {
        format!("{}{}", self.profile.host, UPLOAD_PATH)
    }

    /// Build the multipart form: the file itself under `file`, then the
    /// optional profile settings.
    fn form(&self, path: &Path) -> Result<multipart::Form> {
        let file_error = |source: std::io::Error| Error::File {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(file_error)?;
        let len = file.metadata().map_err(file_error)?.len();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let part = multipart::Part::reader_with_length(file, len)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let mut form = multipart::Form::new().part("file", part);
        for (key, value) in self.profile.form_fields() {
            form = form.text(key, value);
        }
        Ok(form)
    }

    /// Upload one file and return the hosted URL. A 200 response whose
    /// body can't be read or decoded gives an empty URL rather than an error.
    pub fn upload(&self, path: &Path) -> Result<String> {
        let form = self.form(path)?;
        let url = self.upload_url();
        info!("uploading {} to {}", path.display(), url);

        let res = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.profile.token.as_str())
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().unwrap_or_default();
            return Err(Error::Upload { status, body });
        }

        let resp: UploadResponse = res.json().unwrap_or_else(|e| {
            debug!("undecodable upload response: {}", e);
            UploadResponse::default()
        });
        Ok(resp.data.links.url)
    }
}
