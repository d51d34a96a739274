use actix_web::web::Data;
use fruit_harvest::domain::OwnerId;
use fruit_harvest::startup::{ApplicationBaseUrl, ListingSettings};
use fruit_harvest::store::{HarvestStore, InMemoryHarvestStore};
use serde_json::{Value, json};

pub const BASE_URL: &str = "http://harvest.test";
pub const PAGE_SIZE: u32 = 3;

pub struct TestState {
    pub store: Data<InMemoryHarvestStore>,
    pub base_url: Data<ApplicationBaseUrl>,
    pub listing: Data<ListingSettings>,
}

impl TestState {
    pub fn new() -> Self {
        Self {
            store: Data::new(InMemoryHarvestStore::default()),
            base_url: Data::new(ApplicationBaseUrl(BASE_URL.to_owned())),
            listing: Data::new(ListingSettings {
                page_size: PAGE_SIZE,
            }),
        }
    }

    pub async fn user(&self, username: &str) -> OwnerId {
        self.store.create_user(username).await.unwrap().id
    }
}

/// Builds the service with every route mounted over the state's store.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(
                    fruit_harvest::routes::configure::<fruit_harvest::store::InMemoryHarvestStore>,
                )
                .app_data($state.store.clone())
                .app_data($state.base_url.clone())
                .app_data($state.listing.clone()),
        )
        .await
    };
}
pub(crate) use init_app;

pub fn harvest(
    date: &str,
    fruit: &str,
    amount: impl Into<Value>,
    price: impl Into<Value>,
) -> Value {
    json!({
        "date": date,
        "fruit": fruit,
        "amount": amount.into(),
        "price": price.into(),
    })
}

pub fn owner_header(owner: OwnerId) -> (&'static str, String) {
    (fruit_harvest::routes::OWNER_HEADER, owner.to_string())
}

pub fn error_kinds(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap().to_owned())
        .collect()
}
