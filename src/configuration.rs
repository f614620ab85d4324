use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::UserEmail;

#[derive(Deserialize, Debug)]
pub struct Settings{
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub jwt: JWTSettings,
    pub email: EmailSettings,
    pub sms: SmsSettings,
    pub otp: OtpSettings
}

#[derive(Deserialize, Debug)]
pub struct ApplicationSettings{
    pub host: String,
    pub port: u16,
    pub cookie_secure: bool
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings{
    pub username: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub name: String
}

impl DatabaseSettings {
    // Url of the postgres server, without selecting a database
    pub fn get_server_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port
        )
    }

    pub fn get_database_url(&self) -> String {
        format!("{}/{}", self.get_server_url(), self.name)
    }
}

#[derive(Deserialize, Debug)]
pub struct JWTSettings{
    pub secret: SecretString,
    pub expiry_hours: u64
}

#[derive(Deserialize, Debug)]
pub struct EmailSettings{
    pub api_uri: String,
    pub sender: String,
    pub authorization_token: SecretString,
    pub timeout_seconds: u64
}

impl EmailSettings {
    pub fn sender(&self) -> Result<UserEmail, String> {
        UserEmail::parse(self.sender.clone())
    }
}

#[derive(Deserialize, Debug)]
pub struct SmsSettings{
    pub api_uri: String,
    pub authorization_token: SecretString,
    pub timeout_seconds: u64
}

#[derive(Deserialize, Debug)]
pub struct OtpSettings{
    pub expiry_minutes: i64,
    pub max_attempts: i32
}

impl Settings{
    /// Layers `configuration/base.yaml`, the file named by `APP_ENVIRONMENT`
    /// (`local` when unset) and `APP_*` environment variables, in that order.
    pub fn get() -> Result<Self, ConfigError>{
        let environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".to_string());

        Config::builder()
            .add_source(File::with_name("configuration/base.yaml"))
            .add_source(
                File::with_name(&format!("configuration/{}.yaml", environment))
                    .required(false)
            )
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?
            .try_deserialize::<Settings>()
    }
}
