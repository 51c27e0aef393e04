use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::io_struct::{GenerateReqInput, StatusPayload};
use crate::relay_state::RelayState;
use actix_web::{HttpResponse, HttpServer, get, post, web};
use serde_json::Value;

#[get("/api/status")]
pub async fn status() -> HttpResponse {
    HttpResponse::Ok().json(StatusPayload::default())
}

#[post("/api/generate")]
pub async fn generate(
    body: web::Json<Value>,
    app_state: web::Data<RelayState>,
) -> Result<HttpResponse, RelayError> {
    let req = GenerateReqInput::parse(body.into_inner()).ok_or(RelayError::Validation)?;

    match app_state.generate(&req).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => {
            match &e {
                RelayError::UpstreamStatus { status_code } => {
                    log::warn!("Upstream returned status {} for model {}", status_code, req.model)
                }
                _ => log::error!("Generate failed for model {} ({}): {}", req.model, e.kind(), e),
            }
            Err(e)
        }
    }
}

/// Body extraction settings for `/api/generate`.
///
/// Any body that cannot be read as JSON (bad syntax, empty, too large) is answered with the
/// validation envelope instead of actix's plain-text error.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .content_type_required(false)
        .error_handler(|err, _req| {
            log::debug!("Rejected generate body: {}", err);
            RelayError::Validation.into()
        })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate).service(status);
}

pub async fn startup(config: RelayConfig, relay_state: RelayState) -> std::io::Result<()> {
    let app_state = web::Data::new(relay_state);
    let payload_limit = config.max_payload_size;

    log::info!(
        "Starting relay at {}, forwarding to {}",
        config.bind_address(),
        app_state.upstream.base_url()
    );

    let mut server = HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(app_state.clone())
            .app_data(json_config(payload_limit))
            .configure(configure)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server.bind((config.host, config.port))?.run().await?;

    std::io::Result::Ok(())
}
