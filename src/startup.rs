use crate::configuration::{ApplicationSettings, DatabaseSettings, Settings, StorageBackend};
use crate::routes;
use crate::store::{HarvestStore, InMemoryHarvestStore, PgHarvestStore, migrate};
use actix_web::dev::Server;
use actix_web::web::Data;
use actix_web::{App, HttpServer, middleware};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = match configuration.application.storage {
            StorageBackend::Postgres => {
                let connection_pool = get_connection_pool(&configuration.database);
                if configuration.database.run_migrations {
                    migrate(&connection_pool).await?;
                }
                run(
                    listener,
                    PgHarvestStore::new(connection_pool),
                    &configuration.application,
                )?
            }
            StorageBackend::Memory => {
                tracing::warn!("harvests are kept in memory and lost on shutdown");
                run(
                    listener,
                    InMemoryHarvestStore::default(),
                    &configuration.application,
                )?
            }
        };

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(configuration.connect_options())
}

/// Prefix for links handed out to clients, e.g. the `Location` of a new harvest.
pub struct ApplicationBaseUrl(pub String);

/// Paging of harvest listings.
#[derive(Debug, Clone, Copy)]
pub struct ListingSettings {
    pub page_size: u32,
}

fn run<S: HarvestStore>(
    listener: TcpListener,
    store: S,
    settings: &ApplicationSettings,
) -> Result<Server, anyhow::Error> {
    let store = Data::new(store);
    let base_url = Data::new(ApplicationBaseUrl(settings.base_url.clone()));
    let listing = Data::new(ListingSettings {
        page_size: settings.page_size,
    });
    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .configure(routes::configure::<S>)
            .app_data(store.clone())
            .app_data(base_url.clone())
            .app_data(listing.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
