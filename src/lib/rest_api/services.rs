use actix_web::{HttpResponse, Responder, web};

use crate::lib::rest_api::{
    detections_list, sites_list, sites_mutations, sites_stats, toml_mutations,
};

async fn say_ping() -> impl Responder {
    HttpResponse::Ok().body("pong")
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(RapiDoc::with_openapi("/docs.json", ApiDoc::openapi()))
            .service(RapiDoc::new("/api/docs.json").path("/docs"))
            .route("/ping", web::get().to(say_ping))
            .service(
                web::scope("/sites")
                    .route("/all", web::get().to(sites_list::all_sites_list)),
            )
            .service(
                web::scope("/stats")
                    .route("/all", web::get().to(sites_stats::all_sites_stats)),
            )
            .service(
                web::scope("/realtime")
                    .route("/live", web::get().to(sites_stats::live_conditions)),
            )
            .service(
                web::scope("/detections")
                    .route("/history", web::get().to(detections_list::detections_history)),
            )
            .service(
                web::scope("/mutations")
                    .route("/set_site_active", web::post().to(sites_mutations::set_site_active))
                    .route("/save_toml", web::get().to(toml_mutations::save_toml)),
            ),
    );
}

/* Swagger section */
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        sites_list::all_sites_list,
        sites_stats::all_sites_stats,
        sites_stats::live_conditions,
        detections_list::detections_history,
    ),
    tags(
        (name = "Sites", description = "Main information about monitoring sites"),
        (name = "Statistics", description = "Aggregated and real-time traffic conditions for the monitoring sites"),
        (name = "Detections", description = "Append-only detection history"),
    ),
    components(
        // We need to import all possible schemas since `utopia` can't discover recursive schemas (yet?)
        schemas(
            crate::lib::rest_api::sites_list::AllSites,
            crate::lib::rest_api::sites_list::SiteInfo,
            crate::lib::rest_api::sites_stats::AllSitesStats,
            crate::lib::rest_api::sites_stats::SiteStats,
            crate::lib::rest_api::sites_stats::SiteAggregates,
            crate::lib::rest_api::sites_stats::LiveConditions,
            crate::lib::rest_api::sites_stats::SiteLive,
            crate::lib::rest_api::detections_list::DetectionsHistory,
            crate::lib::sites::Detection,
            crate::lib::sites::Scenario,
        ),
    )
)]
struct ApiDoc;
