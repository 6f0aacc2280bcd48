use actix_web::{
    http::{header::CONTENT_SECURITY_POLICY, StatusCode},
    test,
    test::TestRequest,
    web,
    App,
};
use log::debug;
use score_engine::{events::EventProducers, InMemoryDatabase, MatchLifecycleApi, MatchStore, MemoryCache, ResultCache};
use serde::de::DeserializeOwned;

use crate::{config::DEFAULT_CONTENT_SECURITY_POLICY, middleware::CspMiddlewareFactory, routes};

pub type TestApi = web::Data<MatchLifecycleApi<InMemoryDatabase, MemoryCache>>;

pub fn memory_api() -> TestApi {
    let _ = env_logger::try_init();
    web::Data::new(MatchLifecycleApi::new(InMemoryDatabase::new(), MemoryCache::default(), EventProducers::default()))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub csp: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_str(&self.body).unwrap_or_else(|e| panic!("Invalid JSON response {}. {e}", self.body))
    }

    pub fn error_message(&self) -> String {
        let value: serde_json::Value = self.json();
        value["error"].as_str().unwrap_or_default().to_string()
    }
}

pub async fn send<B, C>(api: &web::Data<MatchLifecycleApi<B, C>>, req: TestRequest) -> TestResponse
where
    B: MatchStore + 'static,
    C: ResultCache + 'static,
{
    send_with_policy(api, req, Some(DEFAULT_CONTENT_SECURITY_POLICY)).await
}

pub async fn send_with_policy<B, C>(
    api: &web::Data<MatchLifecycleApi<B, C>>,
    req: TestRequest,
    policy: Option<&str>,
) -> TestResponse
where
    B: MatchStore + 'static,
    C: ResultCache + 'static,
{
    let app = App::new()
        .wrap(CspMiddlewareFactory::new(policy))
        .app_data(api.clone())
        .configure(routes::configure::<B, C>);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let csp = res.headers().get(CONTENT_SECURITY_POLICY).and_then(|v| v.to_str().ok()).map(String::from);
    let body = test::read_body(res).await;
    TestResponse { status, csp, body: String::from_utf8_lossy(&body).into_owned() }
}
