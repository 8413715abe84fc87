//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use maph_core::AuthError;
use maph_core::resource::{ApiError, Resource, ResourceClient, UploadFile};
use maph_core::session::{AuthGateway, Credentials, LoginGrant, Session, SessionUser};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(Resource),
    Create(Resource, Value),
    Update(Resource, Option<String>, Value),
    Delete(Resource, String),
    Upload(Resource, Vec<String>, Vec<(String, String)>),
}

/// Scriptable `ResourceClient` that records every call.
///
/// Unscripted lists return an empty list; unscripted mutations succeed.
/// With a gate installed, every call waits for `release()` after recording.
#[derive(Default)]
pub struct MockResourceClient {
    lists: Mutex<HashMap<Resource, Result<Vec<Value>, ApiError>>>,
    mutations: Mutex<HashMap<Resource, ApiError>>,
    calls: Mutex<Vec<Call>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockResourceClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_list(&self, resource: Resource, records: Vec<Value>) {
        self.lists.lock().unwrap().insert(resource, Ok(records));
    }

    pub fn fail_list(&self, resource: Resource, err: ApiError) {
        self.lists.lock().unwrap().insert(resource, Err(err));
    }

    /// Makes every create/update/delete/upload on `resource` fail.
    pub fn fail_mutations(&self, resource: Resource, err: ApiError) {
        self.mutations.lock().unwrap().insert(resource, err);
    }

    pub fn clear_failures(&self) {
        self.mutations.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::List(_)))
            .collect()
    }

    /// Holds subsequent calls until [`MockResourceClient::release`].
    pub fn hold(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn release(&self) {
        if let Some(notify) = self.gate.lock().unwrap().take() {
            notify.notify_waiters();
            notify.notify_one();
        }
    }

    async fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(notify) = gate {
            notify.notified().await;
        }
    }

    fn mutation_result(&self, resource: Resource) -> Result<(), ApiError> {
        match self.mutations.lock().unwrap().get(&resource) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceClient for MockResourceClient {
    async fn list(&self, resource: Resource) -> Result<Vec<Value>, ApiError> {
        self.record(Call::List(resource)).await;
        self.lists
            .lock()
            .unwrap()
            .get(&resource)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create(&self, resource: Resource, payload: Value) -> Result<Value, ApiError> {
        self.record(Call::Create(resource, payload)).await;
        self.mutation_result(resource).map(|_| Value::Null)
    }

    async fn update(
        &self,
        resource: Resource,
        id: Option<&str>,
        partial: Value,
    ) -> Result<Value, ApiError> {
        self.record(Call::Update(resource, id.map(str::to_string), partial))
            .await;
        self.mutation_result(resource).map(|_| Value::Null)
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        self.record(Call::Delete(resource, id.to_string())).await;
        self.mutation_result(resource)
    }

    async fn upload(
        &self,
        resource: Resource,
        files: Vec<UploadFile>,
        fields: Vec<(String, String)>,
    ) -> Result<(), ApiError> {
        let names = files.into_iter().map(|f| f.field_name).collect();
        self.record(Call::Upload(resource, names, fields)).await;
        self.mutation_result(resource)
    }
}

/// Gateway answering every login with a fixed outcome.
pub struct MockAuthGateway {
    outcome: Mutex<Result<LoginGrant, AuthError>>,
    attempts: Mutex<u32>,
}

impl MockAuthGateway {
    pub fn granting(user: SessionUser, token: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Ok(LoginGrant {
                user,
                token: token.to_string(),
            })),
            attempts: Mutex::new(0),
        })
    }

    pub fn failing(err: AuthError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Err(err)),
            attempts: Mutex::new(0),
        })
    }

    pub fn attempts(&self) -> u32 {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        *self.attempts.lock().unwrap() += 1;
        self.outcome.lock().unwrap().clone()
    }
}

pub fn user(role: Option<&str>) -> SessionUser {
    SessionUser {
        user_id: "101".into(),
        company_id: "7".into(),
        first_name: "Ana".into(),
        last_names: "Mora".into(),
        role: role.map(str::to_string),
        phone: Some("88887777".into()),
        email: None,
    }
}

pub fn session() -> Session {
    Session::new(user(Some("A")), "token-101")
}

pub fn appointment(id: u32, date: &str, patient: &str) -> Value {
    json!({
        "numero_cita": id,
        "fecha": format!("{}T00:00:00.000Z", date),
        "nombre_usuario": "Dr. Solis",
        "nombre_paciente": patient,
        "hora_inicio": "8:00",
        "hora_final": "9:00"
    })
}

pub fn patient(id: &str, name: &str) -> Value {
    json!({ "id_cedula": id, "nombre": name, "apellidos": "Rojas" })
}

/// Yields until `client` has recorded at least `count` calls.
pub async fn wait_for_calls(client: &MockResourceClient, count: usize) {
    for _ in 0..1000 {
        if client.calls().len() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("expected {} calls, saw {:?}", count, client.calls());
}
