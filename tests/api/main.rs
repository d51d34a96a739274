mod helpers;

mod admin;
mod harvests;
