use actix_web::web;

use crate::error::ApiError;

mod health;
mod monitors;

/// Registers every route along with the body extractor settings they rely on
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::MalformedBody(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| ApiError::MalformedBody(err.to_string()).into()),
    );

    health::routes(cfg);
    monitors::routes(cfg);
}
