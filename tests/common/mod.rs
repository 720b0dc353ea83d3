#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use barangay_registry::access::ScopeResolver;
use barangay_registry::auth::{Claims, JwtVerifier};
use barangay_registry::database::memory::InMemoryStore;
use barangay_registry::database::models::{
    AdminAccount, Barangay, Household, Municipality, Resident, Zone,
};
use barangay_registry::{app, AppState, RegistryService};

pub const SECRET: &str = "registry-test-secret";

/// Router over a seeded in-memory store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_store(seeded_store().await)
    }

    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        let resolver = ScopeResolver::new(Arc::new(JwtVerifier::new(SECRET, None)));
        let state = AppState::new(RegistryService::new(store.clone()), resolver);
        Self {
            router: app(state),
            store,
        }
    }

    /// Send one request; returns status and parsed JSON body (Null when empty)
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }
}

pub fn token(role: &str, municipality_id: Option<i64>, barangay_id: Option<i64>) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: format!("{}-test", role),
        role: role.to_string(),
        municipality_id,
        barangay_id,
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
        iss: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

pub fn super_admin() -> String {
    token("SuperAdmin", None, None)
}

pub fn municipality_admin(municipality_id: i64) -> String {
    token("MunicipalityAdmin", Some(municipality_id), None)
}

pub fn barangay_admin(municipality_id: i64, barangay_id: i64) -> String {
    token("BarangayAdmin", Some(municipality_id), Some(barangay_id))
}

pub fn resident(id: i64, household_id: i64, is_head: bool) -> Resident {
    Resident {
        id,
        first_name: format!("Resident{}", id),
        middle_name: None,
        last_name: "Dela Cruz".into(),
        suffix: None,
        birth_date: None,
        gender: None,
        civil_status: None,
        occupation: None,
        contact_number: None,
        is_head,
        is_active: true,
        household_id,
        zone_id: 0,
        barangay_id: 0,
        municipality_id: 0,
    }
}

/// Alpha (1) with Centro (10, zone 100, household 1000 with two residents)
/// and Norte (20, zone 200); Beta (2) with Sur (30, zone 300)
pub async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    for (id, name) in [(1, "Alpha"), (2, "Beta")] {
        store
            .seed(Municipality {
                id,
                name: name.into(),
                code: name.to_uppercase(),
                region: "Region IV-A".into(),
                province: "Laguna".into(),
            })
            .await;
    }
    for (id, name, municipality_id) in [(10, "Centro", 1), (20, "Norte", 1), (30, "Sur", 2)] {
        store
            .seed(Barangay {
                id,
                name: name.into(),
                code: name.to_uppercase(),
                municipality_id,
            })
            .await;
    }
    for (id, barangay_id) in [(100, 10), (200, 20), (300, 30)] {
        store
            .seed(Zone {
                id,
                name: format!("Z-{}", id),
                description: None,
                barangay_id,
            })
            .await;
    }
    store
        .seed(Household {
            id: 1000,
            name: "H1".into(),
            zone_id: 100,
        })
        .await;
    for (id, is_head) in [(1, true), (2, false)] {
        let mut r = resident(id, 1000, is_head);
        r.zone_id = 100;
        r.barangay_id = 10;
        r.municipality_id = 1;
        store.seed(r).await;
    }
    store
        .seed(AdminAccount {
            id: 1,
            username: "root".into(),
            role: "SuperAdmin".into(),
            municipality_id: None,
            barangay_id: None,
            is_active: true,
        })
        .await;
    store
}
