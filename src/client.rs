use chrono::{DateTime, Utc};
use reqwest::Client as ReqwestClient;
use reqwest::Method;
use serde_json::{Map, Value};
use url::Url;

use crate::auth;
use crate::config::{Config, Options};
use crate::types::Postcode;
use crate::{PESQUISA_CP_PATH, Result};

/// CTT API client.
///
/// Owns its [`Config`]; every request reads the configuration that is active
/// when the call is made.
#[derive(Clone, Debug)]
pub struct Client {
    host: Url,
    config: Config,
    client: ReqwestClient,
}

impl Client {
    /// Creates a client for `host` with `options` layered over the defaults.
    ///
    /// Use [`crate::PRODUCTION_HOST`] for the live service. `host` should end
    /// with `/` if it carries a path prefix.
    pub fn new(host: &str, options: Options) -> Result<Self> {
        Self::with_client(host, options, ReqwestClient::new())
    }

    /// Creates a client with a custom HTTP client, e.g. one with timeouts set.
    pub fn with_client(host: &str, options: Options, client: ReqwestClient) -> Result<Self> {
        Ok(Self {
            host: Url::parse(host)?,
            config: Config::from_options(options),
            client,
        })
    }

    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Returns a copy of the active configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Replaces the active configuration with `options` layered over the
    /// defaults. Values from earlier `configure` calls are not kept.
    pub fn configure(&mut self, options: Options) -> &mut Self {
        self.config = Config::from_options(options);
        self
    }

    /// Looks up the addresses registered under a 7-digit postcode.
    ///
    /// The response body is returned as-is.
    pub async fn find_address_by_postcode(&self, postcode: &str) -> Result<Value> {
        self.find_address_by_postcode_at(postcode, Utc::now()).await
    }

    /// Same as [`Client::find_address_by_postcode`], signing with `timestamp`
    /// instead of the current time.
    pub async fn find_address_by_postcode_at(
        &self,
        postcode: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Value> {
        let postcode = Postcode::parse(postcode)?;

        let key = auth::create_key(&self.config, &[postcode.as_str()], timestamp)?;
        let mut data = Map::new();
        data.insert("InCodPos".to_owned(), Value::String(postcode.to_string()));

        self.dispatch(PESQUISA_CP_PATH, &key, data).await
    }

    /// Callback flavour of [`Client::find_address_by_postcode`]. `callback`
    /// is invoked exactly once with the outcome.
    pub async fn find_address_by_postcode_with_callback<F>(&self, postcode: &str, callback: F)
    where
        F: FnOnce(Result<Value>),
    {
        callback(self.find_address_by_postcode(postcode).await);
    }

    async fn dispatch(&self, path: &str, key: &str, data: Map<String, Value>) -> Result<Value> {
        let headers = auth::create_headers(&self.config, key)?;
        let body = Value::Object(self.with_identity(data));

        let request = self
            .client
            .request(Method::POST, self.endpoint(path)?)
            .json(&body)
            .build()?;

        crate::request(&self.client, request, Some(headers)).await
    }

    /// Identity fields are inserted last so they win over caller keys.
    fn with_identity(&self, mut data: Map<String, Value>) -> Map<String, Value> {
        let config = &self.config;
        for (name, value) in [
            ("OSName", &config.os_name),
            ("OSVersion", &config.os_version),
            ("AppName", &config.app_name),
            ("AppVersion", &config.app_version),
            ("DeviceName", &config.device_name),
            ("DeviceID", &config.device_id),
        ] {
            data.insert(name.to_owned(), Value::String(value.clone()));
        }
        data
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.host.join(path)?)
    }
}
