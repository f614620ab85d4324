use std::error::Error;

use diesel::{pg::Pg, r2d2::{ConnectionManager, Pool}, Connection, ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use once_cell::sync::Lazy;
use reqwest::redirect::Policy;
use serde_json::Value;
use united_mess::{
    configuration::{DatabaseSettings, Settings},
    models::User,
    schema::users,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
    utils::DbPool
};
use uuid::Uuid;
use wiremock::MockServer;

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "united-mess-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to set subscriber");
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to set subscriber");
    }
});

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

fn run_migrations(connection: &mut impl MigrationHarness<Pg>)
    -> Result<(), Box<dyn Error + Send + Sync + 'static>>
{
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DbPool,
    pub email_api: MockServer,
    pub sms_api: MockServer,
    pub settings: Settings,
    pub api_client: reqwest::Client
}

// A registered, approved and signed in member
pub struct TestUser{
    pub user_id: Uuid,
    pub email: String,
    pub password: String,
    pub token: String
}

impl TestApp {
    fn create_db(settings: &DatabaseSettings) -> DbPool{
        let mut connection = PgConnection::establish(&settings.get_server_url())
            .expect("Failed to connect to postgres");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");

        let pool = Pool::new(ConnectionManager::<PgConnection>::new(settings.get_database_url()))
            .expect("Failed to build connection pool to test database");

        let mut conn = pool.get().expect("Failed to get connection to test database");
        run_migrations(&mut conn).expect("Failed to run migrations");

        pool
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    pub async fn spawn_app() -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let email_api = MockServer::start().await;
        let sms_api = MockServer::start().await;

        let database_name = Uuid::new_v4().to_string();
        let configure = || {
            let mut settings = Settings::get().expect("Failed to read configuration");
            settings.application.port = 0;
            settings.database.name = database_name.clone();
            settings.email.api_uri = email_api.uri();
            settings.sms.api_uri = sms_api.uri();
            settings
        };

        let pool = TestApp::create_db(&configure().database);

        let application = Application::build(configure())
            .await
            .expect("Failed to build application");

        let host = application.host.clone();
        let port = application.port;
        tokio::task::spawn(application.run_until_stopped());

        let api_client = reqwest::Client::builder()
            .redirect(Policy::none())
            .cookie_store(true)
            .build()
            .unwrap();

        let settings = configure();
        TestApp{
            host,
            port,
            pool,
            email_api,
            sms_api,
            settings,
            api_client
        }
    }

    pub async fn post_json(&self, path: &str, body: &Value, token: Option<&str>) -> reqwest::Response {
        let mut request = reqwest::Client::new()
            .post(format!("{}{}", self.get_app_url(), path))
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_json(&self, path: &str, body: &Value, token: Option<&str>) -> reqwest::Response {
        let mut request = reqwest::Client::new()
            .put(format!("{}{}", self.get_app_url(), path))
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = reqwest::Client::new()
            .get(format!("{}{}", self.get_app_url(), path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = reqwest::Client::new()
            .delete(format!("{}{}", self.get_app_url(), path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/user/register",
            &serde_json::json!({ "name": name, "email": email, "password": password }),
            None
        ).await
    }

    pub async fn signin(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/user/signin",
            &serde_json::json!({ "email": email, "password": password }),
            None
        ).await
    }

    pub fn set_user_column(&self, email: &str, role: Option<&str>, user_status: Option<&str>) {
        let mut conn = self.pool.get().expect("Failed to get connection");

        if let Some(role) = role {
            diesel::update(users::table.filter(users::email.eq(email)))
                .set(users::role.eq(role))
                .execute(&mut conn)
                .expect("Failed to update role");
        }

        if let Some(user_status) = user_status {
            diesel::update(users::table.filter(users::email.eq(email)))
                .set(users::user_status.eq(user_status))
                .execute(&mut conn)
                .expect("Failed to update status");
        }
    }

    pub fn approve(&self, email: &str) {
        self.set_user_column(email, None, Some("approved"));
    }

    pub fn find_user(&self, email: &str) -> Option<User> {
        let mut conn = self.pool.get().expect("Failed to get connection");

        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .ok()
    }

    // Registers, approves and signs in a fresh member
    pub async fn member(&self) -> TestUser {
        let email = format!("{}@mess.test", Uuid::new_v4().simple());
        let password = "member-password".to_string();

        let response = self.register("Mess Member", &email, &password).await;
        assert_eq!(response.status().as_u16(), 201);
        self.approve(&email);

        self.signed_in(email, password).await
    }

    pub async fn admin(&self) -> TestUser {
        let email = format!("{}@mess.test", Uuid::new_v4().simple());
        let password = "admin-password".to_string();

        let response = self.register("Mess Admin", &email, &password).await;
        assert_eq!(response.status().as_u16(), 201);
        self.set_user_column(&email, Some("admin"), Some("approved"));

        self.signed_in(email, password).await
    }

    async fn signed_in(&self, email: String, password: String) -> TestUser {
        let response = self.signin(&email, &password).await;
        assert_eq!(response.status().as_u16(), 200);

        let body: Value = response.json().await.unwrap();
        let token = body["token"].as_str().unwrap().to_string();
        let user_id = body["user"]["userId"].as_str().unwrap().parse().unwrap();

        TestUser{ user_id, email, password, token }
    }
}
