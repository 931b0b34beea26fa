use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use clima_cep::{
    Address, AddressResolver, ClientError, LocationQuery, PostalCode, TemperatureSource,
    WeatherService, web,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// Resolver answering every lookup with the same address, or failing
pub struct FixedResolver {
    address: Option<Address>,
    pub calls: AtomicUsize,
}

impl FixedResolver {
    pub fn found(locality: &str, state: &str) -> Arc<Self> {
        Arc::new(Self {
            address: Some(Address::new(locality, state)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn not_found() -> Arc<Self> {
        Arc::new(Self {
            address: Some(Address::not_found()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Fails every lookup as if ViaCEP were down
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            address: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressResolver for FixedResolver {
    async fn lookup(
        &self,
        _code: &PostalCode,
        _cancel: &CancellationToken,
    ) -> Result<Address, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.address.clone().ok_or(ClientError::Status { status: 503 })
    }
}

/// Temperature source answering with a fixed reading or a fixed status
pub struct FixedSource {
    temp_c: Result<f64, u16>,
    pub calls: AtomicUsize,
}

impl FixedSource {
    pub fn reading(temp_c: f64) -> Arc<Self> {
        Arc::new(Self {
            temp_c: Ok(temp_c),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn status(status: u16) -> Arc<Self> {
        Arc::new(Self {
            temp_c: Err(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TemperatureSource for FixedSource {
    async fn current_temp_c(
        &self,
        _query: &LocationQuery,
        _cancel: &CancellationToken,
    ) -> Result<f64, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.temp_c.map_err(|status| ClientError::Status { status })
    }
}

/// Resolver that never answers, keeping hold of the token it was handed
#[derive(Default)]
pub struct HangingResolver {
    token: Mutex<Option<CancellationToken>>,
}

impl HangingResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Token passed to the last lookup, if any lookup started
    pub fn token(&self) -> Option<CancellationToken> {
        self.token.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressResolver for HangingResolver {
    async fn lookup(
        &self,
        _code: &PostalCode,
        cancel: &CancellationToken,
    ) -> Result<Address, ClientError> {
        *self.token.lock().unwrap() = Some(cancel.clone());
        std::future::pending().await
    }
}

pub fn app(resolver: Arc<FixedResolver>, source: Arc<FixedSource>) -> Router {
    app_with_timeout(resolver, source, Duration::from_secs(5))
}

pub fn app_with_timeout(
    resolver: Arc<dyn AddressResolver>,
    source: Arc<dyn TemperatureSource>,
    request_timeout: Duration,
) -> Router {
    web::app(WeatherService::new(resolver, source), request_timeout)
}

/// Send `GET uri` through the router and return the status with the JSON body
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
