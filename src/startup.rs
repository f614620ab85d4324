use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::{
    auth::{jwt::Tokenizer, session::SessionConfig},
    configuration::Settings,
    email_client::EmailClient,
    error::ApiError,
    routes::{
        create_market, create_meal, delete_market, delete_meal, delete_user, delete_user_by_admin,
        get_market, get_meal, get_profile, get_user, get_user_summaries, get_users, health_check,
        list_markets, list_meals, register, request_password_reset, reset_password, send_mobile_otp,
        signin, signout, update_market, update_meal, update_profile, update_user_by_admin,
        validate_password_reset, verify_mobile_otp
    },
    sms_client::SmsClient,
    utils::get_connection_pool
};

pub struct Application{
    pub host: String,
    pub port: u16,
    server: Server
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, anyhow::Error>{
        let pool = get_connection_pool(&settings.database)
            .context("Failed to build the database connection pool")?;

        let sender = settings.email.sender()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid sender email address")?;
        let email_client = EmailClient::new(
            settings.email.api_uri,
            sender,
            settings.email.authorization_token,
            settings.email.timeout_seconds
        )
        .context("Failed to build the email client")?;

        let sms_client = SmsClient::new(
            settings.sms.api_uri,
            settings.sms.authorization_token,
            settings.sms.timeout_seconds
        )
        .context("Failed to build the sms client")?;

        let tokenizer = web::Data::new(Tokenizer::new(&settings.jwt));
        let session_config = web::Data::new(SessionConfig{ secure: settings.application.cookie_secure });
        let otp_settings = web::Data::new(settings.otp);
        let pool = web::Data::new(pool);
        let email_client = web::Data::new(email_client);
        let sms_client = web::Data::new(sms_client);

        // Port 0 lets the OS pick, the real port is read back from the listener
        let listener = TcpListener::bind((settings.application.host.as_str(), settings.application.port))
            .context("Failed to bind the application address")?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .app_data(json_config())
                .app_data(path_config())
                .app_data(query_config())
                .app_data(pool.clone())
                .app_data(tokenizer.clone())
                .app_data(session_config.clone())
                .app_data(otp_settings.clone())
                .app_data(email_client.clone())
                .app_data(sms_client.clone())
                .route("/health", web::get().to(health_check))
                .service(
                    web::scope("/user")
                        .route("/register", web::post().to(register))
                        .route("/signin", web::post().to(signin))
                        .route("/signout", web::post().to(signout))
                        .route("/profile", web::get().to(get_profile))
                        .route("/summary", web::get().to(get_user_summaries))
                        .route("/update", web::put().to(update_profile))
                        .route("/updatebyadmin/{id}", web::put().to(update_user_by_admin))
                        .route("/delete/{id}", web::delete().to(delete_user_by_admin))
                        .route("/otp/request", web::post().to(request_password_reset))
                        .route("/otp/validate", web::post().to(validate_password_reset))
                        .route("/otp/reset", web::post().to(reset_password))
                        .route("/mobile-otp/send", web::post().to(send_mobile_otp))
                        .route("/mobile-otp/verify", web::post().to(verify_mobile_otp))
                        .route("", web::get().to(get_users))
                        .route("/", web::get().to(get_users))
                        .route("/{id}", web::get().to(get_user))
                        .route("/{id}", web::delete().to(delete_user))
                )
                .service(
                    web::scope("/market")
                        .route("", web::get().to(list_markets))
                        .route("", web::post().to(create_market))
                        .route("/", web::get().to(list_markets))
                        .route("/", web::post().to(create_market))
                        .route("/{id}", web::get().to(get_market))
                        .route("/{id}", web::put().to(update_market))
                        .route("/{id}", web::delete().to(delete_market))
                )
                .service(
                    web::scope("/meal")
                        .route("", web::get().to(list_meals))
                        .route("", web::post().to(create_meal))
                        .route("/", web::get().to(list_meals))
                        .route("/", web::post().to(create_meal))
                        .route("/{id}", web::get().to(get_meal))
                        .route("/{id}", web::put().to(update_meal))
                        .route("/{id}", web::delete().to(delete_meal))
                )
        })
        .listen(listener)?
        .run();

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

// Malformed bodies, ids and query strings all answer 400 with the usual JSON body
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _| ApiError::Validation(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _| ApiError::Validation(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _| ApiError::Validation(err.to_string()).into())
}
