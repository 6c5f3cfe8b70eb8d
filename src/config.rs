//! Client configuration: environment selection, consumer credentials, and IPN URLs.
//!
//! Configurations are validated when built, so a [`ClientConfig`] value is always usable and
//! every [`ConfigError`] surfaces before the client touches the network.

// crates.io
use url::Host;
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError, model::NotificationMethod};

/// Live gateway base URL.
pub const LIVE_BASE_URL: &str = "https://pay.pesapal.com/v3";
/// Sandbox gateway base URL.
pub const SANDBOX_BASE_URL: &str = "https://cybqa.pesapal.com/pesapalv3";
/// Pause between sequential IPN registrations, avoiding the gateway's rate limiting.
pub const DEFAULT_REGISTRATION_DELAY: StdDuration = StdDuration::from_secs(10);

/// Environment variable selecting the environment.
pub const ENV_ENVIRONMENT: &str = "PESAPAL_ENVIRONMENT";
/// Environment variable carrying the consumer key.
pub const ENV_CONSUMER_KEY: &str = "PESAPAL_CONSUMER_KEY";
/// Environment variable carrying the consumer secret.
pub const ENV_CONSUMER_SECRET: &str = "PESAPAL_CONSUMER_SECRET";
/// Environment variable carrying comma-separated IPN URLs, each optionally prefixed with
/// `GET:` or `POST:`.
pub const ENV_IPN_URLS: &str = "PESAPAL_IPN_URLS";
/// Environment variable carrying the registration delay in milliseconds.
pub const ENV_IPN_DELAY: &str = "PESAPAL_IPN_DELAY";

/// Gateway environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
	/// Test gateway.
	#[default]
	Sandbox,
	/// Production gateway.
	Live,
}
impl Environment {
	/// Maps a label to an environment: `live`/`production` select [`Environment::Live`], any
	/// other non-empty label selects [`Environment::Sandbox`].
	pub fn from_label(label: &str) -> Result<Self, ConfigError> {
		match label.trim() {
			"" => Err(ConfigError::MissingField { field: "environment" }),
			value if value.eq_ignore_ascii_case("live") => Ok(Self::Live),
			value if value.eq_ignore_ascii_case("production") => Ok(Self::Live),
			_ => Ok(Self::Sandbox),
		}
	}

	/// Returns the gateway base URL for the environment.
	pub const fn base_url(self) -> &'static str {
		match self {
			Self::Live => LIVE_BASE_URL,
			Self::Sandbox => SANDBOX_BASE_URL,
		}
	}

	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Live => "live",
			Self::Sandbox => "sandbox",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// IPN URL registered at initialization, with its delivery method.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpnUrl {
	/// URL as it will be registered and later matched.
	pub url: String,
	/// Delivery method (GET unless overridden).
	pub method: NotificationMethod,
}
impl IpnUrl {
	/// Creates a GET IPN URL.
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: url.into(), method: NotificationMethod::Get }
	}

	/// Overrides the delivery method.
	pub fn with_method(mut self, method: NotificationMethod) -> Self {
		self.method = method;

		self
	}

	/// Parses `<url>`, `GET:<url>`, or `POST:<url>`.
	pub fn parse_entry(entry: &str) -> Result<Self, ConfigError> {
		let entry = entry.trim();

		match entry.split_once(':') {
			Some((prefix, url))
				if prefix.eq_ignore_ascii_case("GET") || prefix.eq_ignore_ascii_case("POST") =>
				Ok(Self::new(url.trim()).with_method(prefix.parse()?)),
			_ => Ok(Self::new(entry)),
		}
	}
}
impl From<&str> for IpnUrl {
	fn from(url: &str) -> Self {
		Self::new(url)
	}
}
impl From<String> for IpnUrl {
	fn from(url: String) -> Self {
		Self::new(url)
	}
}

/// Validated, immutable client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Selected environment.
	pub environment: Environment,
	/// Gateway base URL; the environment default unless overridden.
	pub base_url: Url,
	/// Application consumer key.
	pub consumer_key: String,
	/// Application consumer secret.
	pub consumer_secret: Secret,
	/// IPN URLs registered by [`crate::client::PesapalClient::initialize`].
	pub ipn_urls: Vec<IpnUrl>,
	/// Pause between sequential IPN registrations.
	pub registration_delay: StdDuration,
}
impl ClientConfig {
	/// Returns a builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_vars(|key| std::env::var(key).ok())
	}

	/// Reads the configuration through `lookup`, using the `PESAPAL_*` variable names.
	pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut builder = Self::builder();

		if let Some(label) = lookup(ENV_ENVIRONMENT) {
			builder = builder.environment(Environment::from_label(&label)?);
		}
		if let Some(key) = lookup(ENV_CONSUMER_KEY) {
			builder = builder.consumer_key(key);
		}
		if let Some(secret) = lookup(ENV_CONSUMER_SECRET) {
			builder = builder.consumer_secret(secret);
		}
		if let Some(urls) = lookup(ENV_IPN_URLS) {
			for entry in urls.split(',').filter(|entry| !entry.trim().is_empty()) {
				builder = builder.ipn_url(IpnUrl::parse_entry(entry)?);
			}
		}
		if let Some(raw) = lookup(ENV_IPN_DELAY) {
			let millis = raw
				.trim()
				.parse::<u64>()
				.map_err(|_| ConfigError::InvalidDelay { value: raw.clone() })?;

			builder = builder.registration_delay(StdDuration::from_millis(millis));
		}

		builder.build()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	/// Selected environment.
	pub environment: Option<Environment>,
	/// Base URL override.
	pub base_url: Option<Url>,
	/// Application consumer key.
	pub consumer_key: Option<String>,
	/// Application consumer secret.
	pub consumer_secret: Option<Secret>,
	/// IPN URLs to register.
	pub ipn_urls: Vec<IpnUrl>,
	/// Pause between sequential IPN registrations.
	pub registration_delay: Option<StdDuration>,
}
impl ClientConfigBuilder {
	/// Sets the environment.
	pub fn environment(mut self, environment: Environment) -> Self {
		self.environment = Some(environment);

		self
	}

	/// Sets the environment from a label; see [`Environment::from_label`]. Blank labels leave
	/// the environment unset so [`ClientConfigBuilder::build`] reports it as missing.
	pub fn environment_label(mut self, label: &str) -> Self {
		self.environment = Environment::from_label(label).ok();

		self
	}

	/// Overrides the environment's base URL (proxies, mock gateways).
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Sets the consumer key.
	pub fn consumer_key(mut self, key: impl Into<String>) -> Self {
		self.consumer_key = Some(key.into());

		self
	}

	/// Sets the consumer secret.
	pub fn consumer_secret(mut self, secret: impl Into<Secret>) -> Self {
		self.consumer_secret = Some(secret.into());

		self
	}

	/// Appends one IPN URL.
	pub fn ipn_url(mut self, url: impl Into<IpnUrl>) -> Self {
		self.ipn_urls.push(url.into());

		self
	}

	/// Appends several IPN URLs.
	pub fn ipn_urls<I>(mut self, urls: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<IpnUrl>,
	{
		self.ipn_urls.extend(urls.into_iter().map(Into::into));

		self
	}

	/// Overrides the registration delay.
	pub fn registration_delay(mut self, delay: StdDuration) -> Self {
		self.registration_delay = Some(delay);

		self
	}

	/// Validates the inputs and produces a [`ClientConfig`].
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let environment =
			self.environment.ok_or(ConfigError::MissingField { field: "environment" })?;
		let consumer_key = self
			.consumer_key
			.filter(|key| !key.trim().is_empty())
			.ok_or(ConfigError::MissingField { field: "consumer_key" })?;
		let consumer_secret = self
			.consumer_secret
			.filter(|secret| !secret.is_blank())
			.ok_or(ConfigError::MissingField { field: "consumer_secret" })?;

		if self.ipn_urls.is_empty() {
			return Err(ConfigError::NoIpnUrls);
		}
		for ipn in &self.ipn_urls {
			validate_ipn_url(&ipn.url)?;
		}

		let base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(environment.base_url()).map_err(|source| {
				ConfigError::InvalidBaseUrl {
					url: environment.base_url().into(),
					source: Some(source),
				}
			})?,
		};

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl { url: base_url.into(), source: None });
		}

		Ok(ClientConfig {
			environment,
			base_url,
			consumer_key,
			consumer_secret,
			ipn_urls: self.ipn_urls,
			registration_delay: self.registration_delay.unwrap_or(DEFAULT_REGISTRATION_DELAY),
		})
	}
}

/// Checks that an IPN URL uses `http`/`https` and names either `localhost[:port]` or a
/// `[www.]name.tld` host (2+ letter TLD, no port, no credentials).
pub fn validate_ipn_url(raw: &str) -> Result<(), ConfigError> {
	let invalid = |reason| ConfigError::InvalidIpnUrl { url: raw.to_owned(), reason };

	if !raw.starts_with("http://") && !raw.starts_with("https://") {
		return Err(invalid("must start with http:// or https://"));
	}

	let url = Url::parse(raw).map_err(|_| invalid("is not a valid URL"))?;

	if !url.username().is_empty() || url.password().is_some() {
		return Err(invalid("must not carry credentials"));
	}

	match url.host() {
		Some(Host::Domain(domain)) if domain.eq_ignore_ascii_case("localhost") => Ok(()),
		Some(Host::Domain(_)) if url.port().is_some() =>
			Err(invalid("only localhost may specify a port")),
		Some(Host::Domain(domain)) if is_public_hostname(domain) => Ok(()),
		_ => Err(invalid("host must be localhost or a domain name")),
	}
}

fn is_public_hostname(domain: &str) -> bool {
	let Some((name, tld)) = domain.rsplit_once('.') else {
		return false;
	};

	!name.is_empty()
		&& name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
		&& tld.len() >= 2
		&& tld.chars().all(|c| c.is_ascii_alphabetic())
}
