use dotenv::dotenv;
use fruit_harvest::configuration::get_configuration;
use fruit_harvest::startup::Application;
use fruit_harvest::telemetry::init_subscriber;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_subscriber("info")?;

    let configuration = get_configuration()?;
    let application = Application::build(configuration).await?;
    tracing::info!(port = application.port(), "fruit-harvest listening");
    application.run_until_stopped().await?;
    Ok(())
}
