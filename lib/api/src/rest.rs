use actix_cors::Cors;
use actix_web::dev::Service;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use introducer_core::{Connector, Person};
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Body of `POST /add`
///
/// Keys match `Name`, `Surname`, `Email` and `ID` ignoring case; a repeated key
/// overwrites the earlier one. Unknown keys are skipped, `null` values and a
/// `null` body leave fields empty.
#[derive(Debug, Default)]
struct AddPersonRequest {
    name: String,
    surname: String,
    email: String,
    id: String,
}

impl<'de> Deserialize<'de> for AddPersonRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AddPersonVisitor)
    }
}

struct AddPersonVisitor;

impl<'de> Visitor<'de> for AddPersonVisitor {
    type Value = AddPersonRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a person object")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(AddPersonRequest::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut req = AddPersonRequest::default();

        while let Some(key) = map.next_key::<String>()? {
            let slot = if key.eq_ignore_ascii_case("name") {
                &mut req.name
            } else if key.eq_ignore_ascii_case("surname") {
                &mut req.surname
            } else if key.eq_ignore_ascii_case("email") {
                &mut req.email
            } else if key.eq_ignore_ascii_case("id") {
                &mut req.id
            } else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            if let Some(value) = map.next_value::<Option<String>>()? {
                *slot = value;
            }
        }

        Ok(req)
    }
}

impl From<AddPersonRequest> for Person {
    fn from(req: AddPersonRequest) -> Self {
        Person::new(req.name, req.surname, req.email, req.id)
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        connector: Arc<dyn Connector>,
        host: String,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .wrap_fn(|req, srv| {
                    let method = req.method().clone();
                    let path = req.path().to_owned();
                    let started = Instant::now();
                    let fut = srv.call(req);
                    async move {
                        let res = fut.await?;
                        info!(
                            "{} {} -> {} ({:?})",
                            method,
                            path,
                            res.status().as_u16(),
                            started.elapsed()
                        );
                        Ok(res)
                    }
                })
                .app_data(web::Data::new(connector.clone()))
                .configure(configure)
        })
        // shutdown is driven by the binary's signal listener
        .disable_signals()
        .bind((host.as_str(), port))?
        .run()
        .await
    }
}

/// Register the routes on an existing app.
///
/// Expects `web::Data<Arc<dyn Connector>>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::resource("/add").route(web::post().to(add_person)));
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            warn!("json invalid: {}", err);
            let body = serde_json::json!({ "error": err.to_string() });
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}

async fn add_person(
    connector: web::Data<Arc<dyn Connector>>,
    req: web::Json<AddPersonRequest>,
) -> ActixResult<HttpResponse> {
    let person = Person::from(req.into_inner());

    let client = match connector.connect().await {
        Ok(client) => client,
        Err(e) => {
            error!("was not created service: {}", e);
            return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            })));
        }
    };

    let result = client.know(&person).await;

    if let Err(e) = client.close().await {
        warn!("failed to close client: {}", e);
    }

    match result {
        Ok(id) => Ok(HttpResponse::Created().json(id)),
        Err(e) => {
            error!("service error: {}", e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            })))
        }
    }
}
