//! Request handler definitions
//!
//! Define each route and its handler here. Handlers stay short: parse the request, call the
//! [`MatchLifecycleApi`], and shape the response. Anything longer belongs in the engine.
//!
//! Every handler is async and never blocks the worker thread. Store and cache access is already expressed as futures
//! by the engine.
//!
//! Static paths such as `/matches/stats` must be registered before `/matches/{id}`, otherwise the `{id}` pattern
//! claims them first. [`configure`] registers everything in the right order.
use actix_web::{error::InternalError, get, web, HttpResponse, Responder, ResponseError};
use log::*;
use score_engine::{
    db_types::{MatchFilter, MatchStatus},
    MatchLifecycleApi,
    MatchStore,
    ResultCache,
};

use crate::{
    data_objects::{ListQuery, MatchResponse, NewMatchRequest, ScoreUpdateRequest, StatusQuery},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Registers every route, plus extractor settings that turn malformed requests into JSON `400` responses.
pub fn configure<B, C>(cfg: &mut web::ServiceConfig)
where
    B: MatchStore + 'static,
    C: ResultCache + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, ServerError::InvalidRequestBody(message).error_response()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, ServerError::InvalidQuery(message).error_response()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, ServerError::InvalidRequestPath(message).error_response()).into()
    }))
    .service(health)
    .service(MatchStatsRoute::<B, C>::new())
    .service(InProgressMatchesRoute::<B, C>::new())
    .service(ClosedMatchesRoute::<B, C>::new())
    .service(CreateMatchRoute::<B, C>::new())
    .service(ListMatchesRoute::<B, C>::new())
    .service(MatchByIdRoute::<B, C>::new())
    .service(DeleteMatchRoute::<B, C>::new())
    .service(UpdateScoreRoute::<B, C>::new())
    .service(UpdateStatusRoute::<B, C>::new());
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Matches  ----------------------------------------------------
route!(create_match => Post "/matches" impl MatchStore, ResultCache);
/// Registers a new match. Responds with `201 Created` and the stored match.
///
/// `scheduled_at` accepts RFC 3339 timestamps, or `YYYY-MM-DDTHH:MM:SS`, which is read as UTC.
pub async fn create_match<B: MatchStore, C: ResultCache>(
    body: web::Json<NewMatchRequest>,
    api: web::Data<MatchLifecycleApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST new match: {} vs {}", request.team_a, request.team_b);
    let scheduled_at = request.scheduled_at()?;
    let record = api.create(&request.team_a, &request.team_b, scheduled_at).await?;
    Ok(HttpResponse::Created().json(MatchResponse::from(record)))
}

route!(list_matches => Get "/matches" impl MatchStore, ResultCache);
/// Lists matches, most recently scheduled first.
///
/// Filter with `?status=IN_PROGRESS|CLOSED`, or with `?from=...&to=...` for an inclusive kick-off window. If both are
/// given, the status wins.
pub async fn list_matches<B: MatchStore, C: ResultCache>(
    query: web::Query<ListQuery>,
    api: web::Data<MatchLifecycleApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    let filter = MatchFilter::try_from(query.into_inner())?;
    debug!("💻️ GET matches ({filter})");
    respond_with_list(api.as_ref(), filter).await
}

route!(in_progress_matches => Get "/matches/in_progress" impl MatchStore, ResultCache);
pub async fn in_progress_matches<B: MatchStore, C: ResultCache>(
    api: web::Data<MatchLifecycleApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET matches in progress");
    respond_with_list(api.as_ref(), MatchFilter::Status(MatchStatus::InProgress)).await
}

route!(closed_matches => Get "/matches/closed" impl MatchStore, ResultCache);
pub async fn closed_matches<B: MatchStore, C: ResultCache>(
    api: web::Data<MatchLifecycleApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET closed matches");
    respond_with_list(api.as_ref(), MatchFilter::Status(MatchStatus::Closed)).await
}

async fn respond_with_list<B: MatchStore, C: ResultCache>(
    api: &MatchLifecycleApi<B, C>,
    filter: MatchFilter,
) -> Result<HttpResponse, ServerError> {
    let matches = api.list(filter).await?.into_iter().map(MatchResponse::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(matches))
}

route!(match_stats => Get "/matches/stats" impl MatchStore, ResultCache);
/// Match counts: `{"total": 3, "in_progress": 2, "closed": 1}`.
pub async fn match_stats<B: MatchStore, C: ResultCache>(
    api: web::Data<MatchLifecycleApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET match stats");
    let stats = api.stats_summary().await?;
    trace!("💻️ {stats}");
    Ok(HttpResponse::Ok().json(stats))
}

route!(match_by_id => Get "/matches/{id}" impl MatchStore, ResultCache);
pub async fn match_by_id<B: MatchStore, C: ResultCache>(
    path: web::Path<i64>,
    api: web::Data<MatchLifecycleApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET match #{id}");
    match api.get_by_id(id).await? {
        Some(record) => Ok(HttpResponse::Ok().json(MatchResponse::from(record))),
        None => Err(ServerError::NoRecordFound(format!("Match #{id} was not found"))),
    }
}

route!(update_score => Put "/matches/{id}/score" impl MatchStore, ResultCache);
/// Replaces both scores of a match in progress. Closed matches are rejected with `400`.
pub async fn update_score<B: MatchStore, C: ResultCache>(
    path: web::Path<i64>,
    body: web::Json<ScoreUpdateRequest>,
    api: web::Data<MatchLifecycleApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let ScoreUpdateRequest { score_a, score_b } = body.into_inner();
    debug!("💻️ PUT score for match #{id}: {score_a} x {score_b}");
    let record = api.update_score(id, score_a, score_b).await?;
    Ok(HttpResponse::Ok().json(MatchResponse::from(record)))
}

route!(update_status => Put "/matches/{id}/status" impl MatchStore, ResultCache);
/// Changes the status of a match. The only transition allowed is to `CLOSED`.
pub async fn update_status<B: MatchStore, C: ResultCache>(
    path: web::Path<i64>,
    query: web::Query<StatusQuery>,
    api: web::Data<MatchLifecycleApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let status = query
        .into_inner()
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ServerError::InvalidQuery("The 'status' parameter is required".to_string()))?;
    let status = status.parse::<MatchStatus>()?;
    debug!("💻️ PUT status for match #{id}: {status}");
    if status != MatchStatus::Closed {
        return Err(ServerError::ValidationError(format!("A match can only be moved to {}", MatchStatus::Closed)));
    }
    let record = api.close(id).await?;
    Ok(HttpResponse::Ok().json(MatchResponse::from(record)))
}

route!(delete_match => Delete "/matches/{id}" impl MatchStore, ResultCache);
pub async fn delete_match<B: MatchStore, C: ResultCache>(
    path: web::Path<i64>,
    api: web::Data<MatchLifecycleApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE match #{id}");
    api.remove(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
