use std::sync::LazyLock;

use bon::Builder;
use rand::Rng as _;
use secrecy::SecretString;
use serde::Deserialize;

pub const DEFAULT_OS_NAME: &str = "Android";
pub const DEFAULT_OS_VERSION: &str = "5.1";
pub const DEFAULT_APP_NAME: &str = "ctt.mobile.android.app.ctt";
pub const DEFAULT_APP_VERSION: &str = "1.3.6";
pub const DEFAULT_DEVICE_NAME: &str = "device";
pub const DEFAULT_AUTH_USER: &str = "ANDROID003";
pub const DEFAULT_AUTH_KEY: &str = "59513E6C-CBA9-4ED8-8A63-147DBEA176B5";
pub const DEFAULT_USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_HOMEPAGE"),
    ")"
);

/// Random device id, fixed for the lifetime of the process so that
/// "reset to defaults" always lands on the same identity.
static DEFAULT_DEVICE_ID: LazyLock<String> = LazyLock::new(|| {
    let mut bytes = [0_u8; 8];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
});

/// Identity and auth values sent with every request and fed into the
/// request signature.
///
/// Always fully populated. Build one with [`Config::default`] or
/// [`Config::from_options`].
#[derive(Clone, Debug)]
pub struct Config {
    pub os_name: String,
    pub os_version: String,
    pub app_name: String,
    pub app_version: String,
    pub device_id: String,
    pub device_name: String,
    pub auth_user: String,
    pub auth_key: SecretString,
    pub user_agent: String,
}

impl Config {
    /// Layers `options` over the defaults. Fields left unset fall back to
    /// the defaults, never to any previously active configuration.
    #[must_use]
    pub fn from_options(options: Options) -> Self {
        let defaults = Self::default();

        Self {
            os_name: options.os_name.unwrap_or(defaults.os_name),
            os_version: options.os_version.unwrap_or(defaults.os_version),
            app_name: options.app_name.unwrap_or(defaults.app_name),
            app_version: options.app_version.unwrap_or(defaults.app_version),
            device_id: options.device_id.unwrap_or(defaults.device_id),
            device_name: options.device_name.unwrap_or(defaults.device_name),
            auth_user: options.auth_user.unwrap_or(defaults.auth_user),
            auth_key: options.auth_key.unwrap_or(defaults.auth_key),
            user_agent: options.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            os_name: DEFAULT_OS_NAME.to_owned(),
            os_version: DEFAULT_OS_VERSION.to_owned(),
            app_name: DEFAULT_APP_NAME.to_owned(),
            app_version: DEFAULT_APP_VERSION.to_owned(),
            device_id: DEFAULT_DEVICE_ID.clone(),
            device_name: DEFAULT_DEVICE_NAME.to_owned(),
            auth_user: DEFAULT_AUTH_USER.to_owned(),
            auth_key: SecretString::from(DEFAULT_AUTH_KEY),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl From<Options> for Config {
    fn from(options: Options) -> Self {
        Self::from_options(options)
    }
}

/// Partial configuration, typically passed from app-level config.
///
/// Field names deserialize in camelCase (`osName`, `deviceId`, ...).
#[derive(Clone, Debug, Default, Builder, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    #[builder(into)]
    pub os_name: Option<String>,
    #[builder(into)]
    pub os_version: Option<String>,
    #[builder(into)]
    pub app_name: Option<String>,
    #[builder(into)]
    pub app_version: Option<String>,
    #[builder(into)]
    pub device_id: Option<String>,
    #[builder(into)]
    pub device_name: Option<String>,
    #[builder(into)]
    pub auth_user: Option<String>,
    #[builder(into)]
    pub auth_key: Option<SecretString>,
    #[builder(into)]
    pub user_agent: Option<String>,
}
