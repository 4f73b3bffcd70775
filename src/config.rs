use std::{fmt, net::IpAddr, str::FromStr};

pub const DEFAULT_PORT: u16 = 4001;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{name} has an invalid value {value:?}")]
	Invalid { name: &'static str, value: String },
}

/// The deployment environment.
///
/// Only the generated documentation and the telemetry resource look at this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
	#[default]
	Development,
	Production,
}

impl Environment {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Development => "development",
			Self::Production => "production",
		}
	}
}

impl fmt::Display for Environment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Environment {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"development" | "dev" => Ok(Self::Development),
			"production" | "prod" => Ok(Self::Production),
			_ => Err(()),
		}
	}
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
	pub host: IpAddr,
	pub port: u16,
	pub database_url: String,
	pub max_connections: u32,
	pub environment: Environment,
	/// The URL the API is reachable at in production.
	pub public_url: Option<String>,
	/// Whether OTLP export is configured through `OTEL_EXPORTER_OTLP_ENDPOINT`.
	pub otlp: bool,
}

impl Config {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
	where
		F: Fn(&str) -> Option<String>,
	{
		let host: Option<IpAddr> = parse(&lookup, "HOST")?;
		let port: Option<u16> = parse(&lookup, "PORT")?;
		let max_connections: Option<u32> = parse(&lookup, "DATABASE_MAX_CONNECTIONS")?;
		let environment: Option<Environment> = parse(&lookup, "APP_ENV")?;

		Ok(Self {
			host: host.unwrap_or(IpAddr::from([127, 0, 0, 1])),
			port: port.unwrap_or(DEFAULT_PORT),
			database_url: lookup("DATABASE_URL")
				.filter(|value| !value.is_empty())
				.ok_or(Error::Missing("DATABASE_URL"))?,
			max_connections: max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
			environment: environment.unwrap_or_default(),
			public_url: lookup("PUBLIC_URL").filter(|value| !value.is_empty()),
			otlp: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").is_some_and(|value| !value.is_empty()),
		})
	}

	/// The server URL advertised in the generated documentation.
	pub fn docs_server_url(&self) -> String {
		match (self.environment, &self.public_url) {
			(Environment::Production, Some(url)) => url.trim_end_matches('/').to_owned(),
			_ => format!("http://localhost:{}", self.port),
		}
	}
}

/// Parses an optional variable, treating an empty value as unset.
fn parse<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, Error>
where
	T: FromStr,
	F: Fn(&str) -> Option<String>,
{
	let Some(value) = lookup(name).filter(|value| !value.is_empty()) else {
		return Ok(None);
	};

	match value.parse() {
		Ok(parsed) => Ok(Some(parsed)),
		Err(_) => Err(Error::Invalid { name, value }),
	}
}
