#![allow(async_fn_in_trait)]

extern crate actix_web;
extern crate anyhow;
extern crate chrono;
extern crate dotenv;
extern crate env_logger;
extern crate futures_util;
extern crate jsonwebtoken;
extern crate serde;
extern crate serde_json;
extern crate sqlx;
extern crate thiserror;

mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
pub mod request;
pub mod response;

use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use config::Config;
use database::postgres::PgSqlxManager;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env()?;
    let manager = Data::new(PgSqlxManager::connect(&config.database_url, config.max_connections).await?);
    manager.migrate().await?;
    log::info!("listening on {}:{}", config.bind_host, config.bind_port);
    let secret = config.jwt_secret.into_bytes();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(manager.clone())
            .configure(handlers::routes::<PgSqlxManager>(secret.clone()))
    })
    .bind((config.bind_host.as_str(), config.bind_port))?
    .run()
    .await?;
    Ok(())
}
