//! Scripted collaborator fakes for tests.
//!
//! Every fake records what it was asked and answers from a script set up by
//! the test. Failures are switched on per fake.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{Notify, RwLock};

use crate::address::{Region, RegionLookup};
use crate::error::ServiceError;
use crate::ids::{CourierCode, RegionId};
use crate::order::{NavigationEffect, Notice, OrderResponse, OrderService, OrderSubmission, Navigator};
use crate::shipping::{QuoteRequest, ShippingQuoteOption, ShippingQuoteService};

/// Region lookup answering from fixed lists.
#[derive(Default)]
pub struct FakeRegionLookup {
    provinces: Vec<Region>,
    children: HashMap<RegionId, Vec<Region>>,
    failure: RwLock<Option<ServiceError>>,
    calls: RwLock<Vec<String>>,
}

impl FakeRegionLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provinces(mut self, provinces: Vec<Region>) -> Self {
        self.provinces = provinces;
        self
    }

    /// Cities of a province or districts of a city.
    pub fn with_children(mut self, parent: &str, regions: Vec<Region>) -> Self {
        self.children.insert(RegionId::new(parent), regions);
        self
    }

    pub async fn fail_with(&self, err: Option<ServiceError>) {
        *self.failure.write().await = err;
    }

    /// Calls made so far, e.g. `"cities:p1"`.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    async fn answer(&self, call: String, parent: Option<&RegionId>) -> Result<Vec<Region>, ServiceError> {
        self.calls.write().await.push(call);
        if let Some(err) = self.failure.read().await.clone() {
            return Err(err);
        }
        Ok(match parent {
            Some(parent) => self.children.get(parent).cloned().unwrap_or_default(),
            None => self.provinces.clone(),
        })
    }
}

#[async_trait]
impl RegionLookup for FakeRegionLookup {
    async fn list_provinces(&self) -> Result<Vec<Region>, ServiceError> {
        self.answer("provinces".to_string(), None).await
    }

    async fn list_cities(&self, province_id: &RegionId) -> Result<Vec<Region>, ServiceError> {
        self.answer(format!("cities:{}", province_id), Some(province_id)).await
    }

    async fn list_districts(&self, city_id: &RegionId) -> Result<Vec<Region>, ServiceError> {
        self.answer(format!("districts:{}", city_id), Some(city_id)).await
    }
}

/// Quote service answering per courier.
///
/// While paused, calls wait until [`FakeQuoteService::release`] is called,
/// so a test can change state between the start of a fetch and its result.
#[derive(Default)]
pub struct FakeQuoteService {
    options: RwLock<HashMap<CourierCode, Vec<ShippingQuoteOption>>>,
    failure: RwLock<Option<ServiceError>>,
    requests: RwLock<Vec<QuoteRequest>>,
    paused: RwLock<bool>,
    gate: Notify,
}

impl FakeQuoteService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_options(&self, courier: &str, options: Vec<ShippingQuoteOption>) {
        self.options
            .write()
            .await
            .insert(CourierCode::new(courier), options);
    }

    pub async fn fail_with(&self, err: Option<ServiceError>) {
        *self.failure.write().await = err;
    }

    pub async fn pause(&self) {
        *self.paused.write().await = true;
    }

    pub async fn resume(&self) {
        *self.paused.write().await = false;
    }

    /// Let one waiting call through.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub async fn requests(&self) -> Vec<QuoteRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl ShippingQuoteService for FakeQuoteService {
    async fn quote(&self, request: &QuoteRequest) -> Result<Vec<ShippingQuoteOption>, ServiceError> {
        self.requests.write().await.push(request.clone());
        if *self.paused.read().await {
            self.gate.notified().await;
        }
        if let Some(err) = self.failure.read().await.clone() {
            return Err(err);
        }
        Ok(self
            .options
            .read()
            .await
            .get(&request.courier_code)
            .cloned()
            .unwrap_or_default())
    }
}

/// Order service replaying queued responses in order.
#[derive(Default)]
pub struct FakeOrderService {
    responses: RwLock<VecDeque<Result<OrderResponse, ServiceError>>>,
    submissions: RwLock<Vec<OrderSubmission>>,
}

impl FakeOrderService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_response(&self, response: Result<OrderResponse, ServiceError>) {
        self.responses.write().await.push_back(response);
    }

    pub async fn submissions(&self) -> Vec<OrderSubmission> {
        self.submissions.read().await.clone()
    }
}

#[async_trait]
impl OrderService for FakeOrderService {
    async fn submit(&self, order: &OrderSubmission) -> Result<OrderResponse, ServiceError> {
        self.submissions.write().await.push(order.clone());
        self.responses
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Transport("no scripted response".to_string())))
    }
}

/// Navigator that records effects and notices.
#[derive(Default)]
pub struct RecordingNavigator {
    effects: Mutex<Vec<NavigationEffect>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> Vec<NavigationEffect> {
        self.effects.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn apply(&self, effect: &NavigationEffect) {
        self.effects.lock().unwrap().push(effect.clone());
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// A quote option with the usual test defaults.
pub fn quote_option(code: &str, service: &str, cost: i64) -> ShippingQuoteOption {
    ShippingQuoteOption {
        name: code.to_uppercase(),
        code: code.to_string(),
        service_name: service.to_string(),
        description: String::new(),
        cost,
        estimated_duration: "2-3".to_string(),
    }
}
