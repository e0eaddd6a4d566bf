//! Store credentials and endpoint selection
//!
//! The service-account key file supplies the project id. The bearer token is
//! taken from `FIRESTORE_ACCESS_TOKEN` (for example the output of
//! `gcloud auth print-access-token`). When `FIRESTORE_EMULATOR_HOST` is set the
//! emulator is used instead and no token is needed.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const ACCESS_TOKEN_ENV: &str = "FIRESTORE_ACCESS_TOKEN";
pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";

/// Token the Firestore emulator accepts as an admin credential
const EMULATOR_TOKEN: &str = "owner";

/// The subset of a service-account key file that is needed here
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    project_id: String,
    #[serde(default)]
    client_email: Option<String>,
}

/// Where requests go and how they authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Production Firestore over HTTPS
    Cloud { access_token: String },
    /// Local emulator over plain HTTP
    Emulator { host: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub project_id: String,
    pub client_email: Option<String>,
    pub endpoint: Endpoint,
}

impl Credentials {
    /// Load the key file and resolve the endpoint from the environment
    pub fn from_key_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file: {}", path.display()))?;

        Self::from_key_json(
            &content,
            std::env::var(EMULATOR_HOST_ENV).ok(),
            std::env::var(ACCESS_TOKEN_ENV).ok(),
        )
        .with_context(|| format!("Invalid credentials from {}", path.display()))
    }

    fn from_key_json(
        content: &str,
        emulator_host: Option<String>,
        access_token: Option<String>,
    ) -> Result<Self> {
        let key: ServiceAccountKey =
            serde_json::from_str(content).context("Key file is not a service-account JSON")?;

        let project_id = key.project_id.trim().to_string();
        if project_id.is_empty() {
            bail!("Key file has an empty project_id");
        }

        let emulator_host = emulator_host.map(|h| h.trim().to_string()).filter(|h| !h.is_empty());
        let access_token = access_token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

        let endpoint = match (emulator_host, access_token) {
            (Some(host), _) => Endpoint::Emulator { host },
            (None, Some(access_token)) => Endpoint::Cloud { access_token },
            (None, None) => bail!(
                "No access token: set {} (or {} to use the emulator)",
                ACCESS_TOKEN_ENV,
                EMULATOR_HOST_ENV
            ),
        };

        Ok(Self {
            project_id,
            client_email: key.client_email,
            endpoint,
        })
    }

    /// REST base URL, without trailing slash
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Endpoint::Cloud { .. } => "https://firestore.googleapis.com/v1".to_string(),
            Endpoint::Emulator { host } => format!("http://{}/v1", host),
        }
    }

    /// Bearer token sent with every request
    pub fn bearer_token(&self) -> &str {
        match &self.endpoint {
            Endpoint::Cloud { access_token } => access_token,
            Endpoint::Emulator { .. } => EMULATOR_TOKEN,
        }
    }
}
