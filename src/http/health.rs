use crate::services::TaskDispatcher;
use actix_web::web::Data;
use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    in_flight_tasks: usize,
}

pub(crate) async fn readiness_check(dispatcher: Data<Arc<TaskDispatcher>>) -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok",
        in_flight_tasks: dispatcher.in_flight(),
    })
}
