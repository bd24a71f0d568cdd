//! Request signing.
//!
//! Every call carries an `x-auth-key` header holding an HMAC-SHA512 over the
//! client identity, the call arguments and the current UTC minute. Keys are
//! only accepted within the minute they were generated, so they are derived
//! per request and never cached.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac as _};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use secrecy::ExposeSecret as _;
use sha2::Sha512;

use crate::Result;
use crate::config::Config;

pub const DEVICE_ID: &str = "x-device-id";
pub const DEVICE_NAME: &str = "x-device-name";
pub const OS_NAME: &str = "x-os-name";
pub const OS_VERSION: &str = "x-os-version";
pub const APP_NAME: &str = "x-app-name";
pub const APP_VERSION: &str = "x-app-version";
pub const AUTH_USER: &str = "x-auth-user";
pub const AUTH_KEY: &str = "x-auth-key";

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

type HmacSha512 = Hmac<Sha512>;

/// Derives the lowercase hex signature for one request.
///
/// The signed text is `appName appVersion osName osVersion deviceName deviceId`,
/// then `args` in order, then `timestamp` as `YYYYMMDDHHmm`, all concatenated
/// without separators. Seconds are dropped, so two calls within the same
/// minute with the same inputs yield the same key.
pub fn create_key(config: &Config, args: &[&str], timestamp: DateTime<Utc>) -> Result<String> {
    let mut mac = HmacSha512::new_from_slice(config.auth_key.expose_secret().as_bytes())?;

    for part in [
        &config.app_name,
        &config.app_version,
        &config.os_name,
        &config.os_version,
        &config.device_name,
        &config.device_id,
    ] {
        mac.update(part.as_bytes());
    }
    for arg in args {
        mac.update(arg.as_bytes());
    }
    mac.update(timestamp.format(TIMESTAMP_FORMAT).to_string().as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Builds the full header set for a signed request.
pub fn create_headers(config: &Config, key: &str) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();

    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    map.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

    for (name, value) in [
        (DEVICE_ID, config.device_id.as_str()),
        (DEVICE_NAME, config.device_name.as_str()),
        (OS_NAME, config.os_name.as_str()),
        (OS_VERSION, config.os_version.as_str()),
        (APP_NAME, config.app_name.as_str()),
        (APP_VERSION, config.app_version.as_str()),
        (AUTH_USER, config.auth_user.as_str()),
        (AUTH_KEY, key),
    ] {
        map.insert(HeaderName::from_static(name), HeaderValue::from_str(value)?);
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::config::Options;
    use crate::error::Kind;

    // HMAC-SHA512 computed independently over
    // "ctt.mobile.android.app.ctt1.3.6Android5.1device0123456789abcdef1234567202401021304".
    const KEY_WITH_POSTCODE: &str = "f7bf31808bcc0c1b14b2f0c6c8c419975eafc2225a9e06ac1382d0d10542ae0a276ce7109ce2d34ad6afccdde6c3370a9884af9707ee67de8601f7b9e11f684b";
    const KEY_WITHOUT_ARGS: &str = "c4aa59ce714a0b65901014529bd0d126bde35eb55e28827b315874d9d47df8412171d4e084d05f6b8abddefd4796660d5a13f288216203ad774c344c43c69aa9";

    fn config() -> Config {
        Config::from_options(Options::builder().device_id("0123456789abcdef").build())
    }

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, hour, minute, second)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn create_key_should_match_known_digest() -> Result<()> {
        let key = create_key(&config(), &["1234567"], at(13, 4, 0))?;

        assert_eq!(key, KEY_WITH_POSTCODE);
        Ok(())
    }

    #[test]
    fn create_key_without_args_should_match_known_digest() -> Result<()> {
        let key = create_key(&config(), &[], at(13, 4, 59))?;

        assert_eq!(key, KEY_WITHOUT_ARGS);
        Ok(())
    }

    #[test]
    fn create_key_should_be_stable_within_a_minute() -> Result<()> {
        let first = create_key(&config(), &["1234567"], at(13, 4, 1))?;
        let second = create_key(&config(), &["1234567"], at(13, 4, 58))?;

        assert_eq!(first, second);
        assert_eq!(first.len(), 128);
        assert!(first.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        Ok(())
    }

    #[test]
    fn create_key_should_change_across_minutes() -> Result<()> {
        let first = create_key(&config(), &["1234567"], at(13, 4, 59))?;
        let second = create_key(&config(), &["1234567"], at(13, 5, 0))?;

        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn create_key_should_depend_on_config_and_args() -> Result<()> {
        let base = create_key(&config(), &["1234567"], at(13, 4, 0))?;
        let other_arg = create_key(&config(), &["7654321"], at(13, 4, 0))?;
        let other_secret = create_key(
            &Config::from_options(
                Options::builder()
                    .device_id("0123456789abcdef")
                    .auth_key("other")
                    .build(),
            ),
            &["1234567"],
            at(13, 4, 0),
        )?;

        assert_ne!(base, other_arg);
        assert_ne!(base, other_secret);
        Ok(())
    }

    #[test]
    fn create_headers_should_carry_identity_and_key() -> Result<()> {
        let config = config();
        let headers = create_headers(&config, "abc")?;

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[USER_AGENT], config.user_agent.as_str());
        assert_eq!(headers[DEVICE_ID], "0123456789abcdef");
        assert_eq!(headers[DEVICE_NAME], "device");
        assert_eq!(headers[OS_NAME], "Android");
        assert_eq!(headers[OS_VERSION], "5.1");
        assert_eq!(headers[APP_NAME], "ctt.mobile.android.app.ctt");
        assert_eq!(headers[APP_VERSION], "1.3.6");
        assert_eq!(headers[AUTH_USER], "ANDROID003");
        assert_eq!(headers[AUTH_KEY], "abc");
        assert_eq!(headers.len(), 10);
        Ok(())
    }

    #[test]
    fn create_headers_should_reject_invalid_header_text() {
        let config = Config::from_options(Options::builder().device_name("bad\nname").build());

        let err = create_headers(&config, "abc").expect_err("newline is not valid header text");
        assert_eq!(err.kind(), Kind::Validation);
    }
}
