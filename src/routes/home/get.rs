use crate::domain::{FruitTotals, HarvestView, OwnerId};
use crate::routes::common::store_failure;
use crate::store::HarvestStore;
use actix_web::{HttpResponse, web};
use askama_actix::{Template, TemplateToResponse};
use bigdecimal::BigDecimal;
use chrono::{Datelike, Local};

const RECENT_HARVESTS: u32 = 5;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeHtml {
    owner: OwnerId,
    year: i32,
    totals: Vec<FruitTotals>,
    total_amount: i64,
    total_value: BigDecimal,
    recent: Vec<HarvestView>,
}

/// Season summary for the current year and the latest harvests.
#[tracing::instrument(skip(store))]
pub async fn home_page<S: HarvestStore>(store: web::Data<S>, owner: OwnerId) -> HttpResponse {
    let year = Local::now().year();

    let totals = match store.season_totals(owner, year).await {
        Ok(totals) => totals,
        Err(e) => return store_failure(&e, "Error loading season summary."),
    };
    let recent = match store.recent(owner, RECENT_HARVESTS).await {
        Ok(entries) => entries.iter().map(HarvestView::from).collect(),
        Err(e) => return store_failure(&e, "Error loading recent harvests."),
    };

    let total_amount = totals.iter().map(|t| t.total_amount).sum();
    let total_value = totals
        .iter()
        .fold(BigDecimal::from(0), |acc, t| acc + &t.total_value);

    HomeHtml {
        owner,
        year,
        totals,
        total_amount,
        total_value,
        recent,
    }
    .to_response()
}
