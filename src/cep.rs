//! Address resolution for Brazilian postal codes
//!
//! `ViaCepClient` looks a CEP up on the ViaCEP API and returns the locality and
//! state it belongs to. The service only depends on the `AddressResolver`
//! trait so tests can swap in deterministic resolvers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::error::ClientError;
use crate::models::{Address, PostalCode};

pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Resolves a postal code into an address
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Look up `code`. A postal code that does not exist is not an error: it
    /// comes back as an address with `found == false` or empty fields.
    async fn lookup(
        &self,
        code: &PostalCode,
        cancel: &CancellationToken,
    ) -> Result<Address, ClientError>;
}

/// ViaCEP API client
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Client,
    base_url: String,
}

/// ViaCEP response body. Only the fields we consume.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default, deserialize_with = "deserialize_erro")]
    erro: bool,
}

/// ViaCEP has sent `"erro": true` and `"erro": "true"` over time
fn deserialize_erro<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => flag,
        Flag::Text(text) => text.eq_ignore_ascii_case("true"),
    })
}

impl From<ViaCepResponse> for Address {
    fn from(response: ViaCepResponse) -> Self {
        Self {
            locality: response.localidade,
            state: response.uf,
            found: !response.erro,
        }
    }
}

impl ViaCepClient {
    /// Create a new client against `base_url` (usually [`DEFAULT_BASE_URL`])
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(concat!("clima-cep/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, code: &PostalCode) -> Result<Address, ClientError> {
        let url = format!("{}/{}/json/", self.base_url, code);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            // ViaCEP reports unknown codes in the body, so keep decoding
            debug!("ViaCEP returned status {}", status);
        }

        let body = response.bytes().await?;
        let decoded: ViaCepResponse = serde_json::from_slice(&body)?;
        Ok(decoded.into())
    }
}

#[async_trait]
impl AddressResolver for ViaCepClient {
    #[instrument(name = "viacep_lookup", skip(self, cancel), fields(cep = %code))]
    async fn lookup(
        &self,
        code: &PostalCode,
        cancel: &CancellationToken,
    ) -> Result<Address, ClientError> {
        let address = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ClientError::Cancelled),
            result = self.fetch(code) => result,
        }?;

        debug!(
            "ViaCEP resolved {} to '{}'/'{}' (found: {})",
            code, address.locality, address.state, address.found
        );
        Ok(address)
    }
}
