use united_mess::{configuration::Settings, startup::Application, telemetry::{get_subscriber, init_subscriber}};

#[actix_web::main]
async fn main() -> anyhow::Result<()>{
    let subscriber = get_subscriber("united_mess".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let settings = Settings::get()?;

    let application = Application::build(settings).await?;
    tracing::info!(host = %application.host, port = application.port, "Starting server");
    application.run_until_stopped().await?;

    Ok(())
}
