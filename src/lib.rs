//! Client for the CTT (Correios de Portugal) postcode lookup API.
//!
//! ```no_run
//! use ctt_client::Client;
//! use ctt_client::config::Options;
//!
//! # async fn run() -> ctt_client::Result<()> {
//! let client = Client::new(
//!     ctt_client::PRODUCTION_HOST,
//!     Options::builder().device_name("kiosk-3").build(),
//! )?;
//! let address = client.find_address_by_postcode("1234567").await?;
//! # let _ = address;
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod client;
pub mod config;
pub mod error;
pub mod types;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Request};
use serde_json::Value;

pub use client::Client;
pub use error::{Error, Kind};
pub use types::Postcode;

pub type Result<T> = std::result::Result<T, Error>;

pub const PRODUCTION_HOST: &str = "https://services.ctt.pt:8085/";

pub const PESQUISA_CP_PATH: &str = "CTTServicesProxyPesquisaCP/api/codigospostais/pesquisacp";

const OPERATION_RESULT: &str = "OperationResult";

/// Executes a prepared request and normalizes the response body.
///
/// A top-level `OperationResult` object in the JSON body turns the call into
/// an [`Kind::Api`] failure whatever the HTTP status was.
async fn request(
    client: &ReqwestClient,
    mut request: Request,
    headers: Option<HeaderMap>,
) -> Result<Value> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    if let Some(h) = headers {
        *request.headers_mut() = h;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(method = %method, path = %path, "sending request");

    let response = client.execute(request).await?;

    let status_code = response.status();
    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        return Err(Error::status(status_code, method, path, message));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(status = %status_code, path = %path, "received response");

    let body = response.json::<Value>().await?;

    match body.get(OPERATION_RESULT) {
        Some(result) => Err(operation_error(result)),
        None => Ok(body),
    }
}

fn operation_error(result: &Value) -> Error {
    Error::api(field_text(result, "Code"), field_text(result, "Description"))
}

fn field_text(result: &Value, field: &str) -> String {
    match result.get(field) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
