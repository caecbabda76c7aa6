//! In-memory backend and identity provider
//!
//! [`InMemoryBackend`] implements [`Transport`] and answers like the real
//! registry backend: snake_case records, `{success, data}` envelopes on the
//! address and contact routes, 404 for missing medical info, bearer token
//! required everywhere except the email availability check. Every request is
//! recorded so tests can assert on what went over the wire.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::ApiError;
use crate::session::{IdentityError, IdentityProvider, SessionState, SessionUser};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

const COLLECTIONS: [&str; 5] = [
    "addresses",
    "emergency-contacts",
    "health-insurance",
    "bank-accounts",
    "emergency-events",
];

/// Routes whose answers come wrapped in `{success, data}`
const ENVELOPED: [&str; 2] = ["addresses", "emergency-contacts"];

#[derive(Default)]
struct BackendState {
    collections: HashMap<String, Vec<Value>>,
    medical_info: Option<Value>,
    profile: Option<Value>,
    registrations: Vec<Value>,
    taken_emails: HashSet<String>,
    requests: Vec<HttpRequest>,
    queued: VecDeque<HttpResponse>,
}

pub struct InMemoryBackend {
    prefix: String,
    user_id: String,
    state: Mutex<BackendState>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            prefix: "/v1".to_string(),
            user_id: "user-1".to_string(),
            state: Mutex::new(BackendState::default()),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state().requests.clone()
    }

    /// Answer the next request with `status` and `body`, whatever it is
    pub fn fail_next(&self, status: u16, body: Value) {
        self.state().queued.push_back(HttpResponse::json(status, &body));
    }

    /// Answer the next request with `200 {"success": false, "message": ...}`
    pub fn fail_next_with_envelope(&self, message: &str) {
        self.fail_next(200, json!({ "success": false, "message": message }));
    }

    /// Insert a wire record into a collection, assigning an id if it has none
    pub fn seed(&self, collection: &str, record: Value) -> String {
        let mut record = record;
        let id = ensure_id(&mut record);
        self.state()
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
        id
    }

    /// Wire records currently stored in a collection
    pub fn collection(&self, collection: &str) -> Vec<Value> {
        self.state().collections.get(collection).cloned().unwrap_or_default()
    }

    pub fn set_profile(&self, profile: Value) {
        self.state().profile = Some(profile);
    }

    pub fn set_medical_info(&self, record: Value) {
        self.state().medical_info = Some(record);
    }

    pub fn medical_info(&self) -> Option<Value> {
        self.state().medical_info.clone()
    }

    /// Bodies received on the registration route
    pub fn registrations(&self) -> Vec<Value> {
        self.state().registrations.clone()
    }

    pub fn take_email(&self, email: &str) {
        self.state().taken_emails.insert(email.to_ascii_lowercase());
    }

    fn respond(&self, request: HttpRequest) -> HttpResponse {
        let mut state = self.state();
        state.requests.push(request.clone());
        if let Some(queued) = state.queued.pop_front() {
            return queued;
        }

        let (path, query) = match self.route_of(&request.url) {
            Some(route) => route,
            None => return not_found("Ruta no encontrada"),
        };

        let anonymous = path == "/auth/check-email";
        if !anonymous && request.bearer_token().map_or(true, str::is_empty) {
            return HttpResponse::json(401, &json!({ "message": "Token inválido" }));
        }

        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(percent_decode)
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let body = request.body.unwrap_or(Value::Null);

        match (request.method, segments.as_slice()) {
            (Method::Get, ["auth", "check-email"]) => {
                let email = query_param(&query, "email").unwrap_or_default().to_ascii_lowercase();
                let available = !state.taken_emails.contains(&email);
                HttpResponse::json(200, &json!({ "available": available }))
            }
            (Method::Post, ["auth", "register"]) => self.register(&mut state, body),
            (Method::Post, ["auth", "logout"]) => HttpResponse::json(200, &json!({ "success": true })),
            (Method::Post, ["auth", "verify-email"]) => {
                let email = state.profile.as_ref().and_then(|p| p.get("email")).cloned();
                HttpResponse::json(200, &json!({ "email_verified": true, "email": email }))
            }
            (Method::Get, ["users", "me"]) => match &state.profile {
                Some(profile) => HttpResponse::json(200, profile),
                None => not_found("Usuario no encontrado"),
            },
            (Method::Put, ["users", "me"]) => match state.profile.as_mut() {
                Some(profile) => {
                    merge(profile, body);
                    touch(profile);
                    HttpResponse::json(200, profile)
                }
                None => not_found("Usuario no encontrado"),
            },
            (Method::Get, ["users", "rut", rut]) => {
                self.find_profile(&state, |p| p.get("rut").and_then(Value::as_str) == Some(*rut))
            }
            (Method::Get, ["users", "phone", phone]) => self.find_profile(&state, |p| {
                ["phone", "phone_number"]
                    .iter()
                    .any(|key| p.get(*key).and_then(Value::as_str) == Some(*phone))
            }),
            (method, ["medical-info"]) => self.medical(&mut state, method, body),
            (Method::Patch, ["addresses", id, "primary"]) => {
                let records = state.collections.entry("addresses".to_string()).or_default();
                if !records.iter().any(|r| record_id(r) == Some(*id)) {
                    return not_found("Dirección no encontrada");
                }
                let mut target = Value::Null;
                for record in records.iter_mut() {
                    let primary = record_id(record) == Some(*id);
                    if let Value::Object(fields) = &mut *record {
                        fields.insert("is_primary".to_string(), Value::Bool(primary));
                    }
                    if primary {
                        touch(record);
                        target = record.clone();
                    }
                }
                reply("addresses", 200, target)
            }
            (method, [collection]) if COLLECTIONS.contains(collection) => {
                self.collection_route(&mut state, method, collection, body)
            }
            (method, [collection, id]) if COLLECTIONS.contains(collection) => {
                item_route(&mut state, method, collection, id, body)
            }
            _ => not_found("Ruta no encontrada"),
        }
    }

    /// Path (without the API prefix) and query string of `url`
    fn route_of(&self, url: &str) -> Option<(String, String)> {
        let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        let path_and_query = &after_scheme[after_scheme.find('/')?..];
        let rest = path_and_query.strip_prefix(self.prefix.as_str())?;
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        Some((path.to_string(), query.to_string()))
    }

    fn register(&self, state: &mut BackendState, body: Value) -> HttpResponse {
        let uid = body.get("uid").and_then(Value::as_str).unwrap_or_default().to_string();
        let email = body.get("email").and_then(Value::as_str).unwrap_or_default().to_string();
        if uid.is_empty() || email.is_empty() {
            return HttpResponse::json(400, &json!({ "message": "uid y email son obligatorios" }));
        }
        if !state.taken_emails.insert(email.to_ascii_lowercase()) {
            return HttpResponse::json(409, &json!({ "message": "Este correo ya está registrado" }));
        }

        let now = Utc::now().to_rfc3339();
        let profile = json!({
            "id": uid,
            "email": email,
            "first_name": body.get("firstName").cloned().unwrap_or(Value::Null),
            "last_name": body.get("lastName").cloned().unwrap_or(Value::Null),
            "phone": body.get("phone").cloned().unwrap_or(Value::Null),
            "role": "user",
            "is_active": true,
            "created_at": now,
            "updated_at": now,
        });
        state.registrations.push(body);
        state.profile = Some(profile.clone());
        HttpResponse::json(201, &json!({ "success": true, "data": profile }))
    }

    fn find_profile(&self, state: &BackendState, matches: impl Fn(&Value) -> bool) -> HttpResponse {
        match state.profile.as_ref().filter(|p| matches(p)) {
            Some(profile) => HttpResponse::json(200, profile),
            None => not_found("Usuario no encontrado"),
        }
    }

    fn medical(&self, state: &mut BackendState, method: Method, body: Value) -> HttpResponse {
        match method {
            Method::Get => match &state.medical_info {
                Some(record) => HttpResponse::json(200, record),
                None => not_found("Información médica no encontrada"),
            },
            Method::Post if state.medical_info.is_some() => {
                HttpResponse::json(409, &json!({ "message": "La información médica ya existe" }))
            }
            Method::Post | Method::Patch => {
                let record = match state.medical_info.take() {
                    Some(mut existing) => {
                        merge(&mut existing, body);
                        touch(&mut existing);
                        existing
                    }
                    None => self.new_record(body),
                };
                state.medical_info = Some(record.clone());
                HttpResponse::json(if method == Method::Post { 201 } else { 200 }, &record)
            }
            Method::Put => match state.medical_info.as_mut() {
                Some(existing) => {
                    merge(existing, body);
                    touch(existing);
                    HttpResponse::json(200, existing)
                }
                None => not_found("Información médica no encontrada"),
            },
            Method::Delete => match state.medical_info.take() {
                Some(_) => HttpResponse::new(204, ""),
                None => not_found("Información médica no encontrada"),
            },
        }
    }

    fn collection_route(
        &self,
        state: &mut BackendState,
        method: Method,
        collection: &str,
        body: Value,
    ) -> HttpResponse {
        match method {
            Method::Get => {
                let records = state.collections.get(collection).cloned().unwrap_or_default();
                reply(collection, 200, Value::Array(records))
            }
            Method::Post => {
                let mut record = self.new_record(body);
                if collection == "emergency-events" {
                    if let Value::Object(fields) = &mut record {
                        fields.entry("status").or_insert_with(|| json!("pending"));
                    }
                }
                state
                    .collections
                    .entry(collection.to_string())
                    .or_default()
                    .push(record.clone());
                reply(collection, 201, record)
            }
            _ => HttpResponse::json(405, &json!({ "message": "Método no permitido" })),
        }
    }

    /// Server-side fields added to every created record
    fn new_record(&self, body: Value) -> Value {
        let mut record = match body {
            Value::Object(fields) => Value::Object(fields),
            _ => Value::Object(Map::new()),
        };
        ensure_id(&mut record);
        let now = Utc::now().to_rfc3339();
        if let Value::Object(fields) = &mut record {
            fields.entry("user_id").or_insert_with(|| json!(self.user_id));
            fields.entry("created_at").or_insert_with(|| json!(now));
            fields.insert("updated_at".to_string(), json!(now));
        }
        record
    }
}

#[async_trait]
impl Transport for InMemoryBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        Ok(self.respond(request))
    }
}

fn item_route(state: &mut BackendState, method: Method, collection: &str, id: &str, body: Value) -> HttpResponse {
    let records = state.collections.entry(collection.to_string()).or_default();
    let position = match records.iter().position(|r| record_id(r) == Some(id)) {
        Some(position) => position,
        None => return not_found("Recurso no encontrado"),
    };

    match method {
        Method::Get => reply(collection, 200, records[position].clone()),
        Method::Put | Method::Patch => {
            let record = &mut records[position];
            merge(record, body);
            touch(record);
            reply(collection, 200, record.clone())
        }
        Method::Delete => {
            records.remove(position);
            if ENVELOPED.contains(&collection) {
                HttpResponse::json(200, &json!({ "success": true }))
            } else {
                HttpResponse::new(204, "")
            }
        }
        Method::Post => HttpResponse::json(405, &json!({ "message": "Método no permitido" })),
    }
}

fn reply(collection: &str, status: u16, data: Value) -> HttpResponse {
    if ENVELOPED.contains(&collection) {
        HttpResponse::json(status, &json!({ "success": true, "data": data }))
    } else {
        HttpResponse::json(status, &data)
    }
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::json(404, &json!({ "message": message }))
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn ensure_id(record: &mut Value) -> String {
    if let Some(id) = record_id(record) {
        return id.to_string();
    }
    let id = Uuid::new_v4().to_string();
    if let Value::Object(fields) = record {
        fields.insert("id".to_string(), json!(id));
    }
    id
}

fn merge(target: &mut Value, patch: Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (key, value) in patch {
            target.insert(key, value);
        }
    }
}

fn touch(record: &mut Value) {
    if let Value::Object(fields) = record {
        fields.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
    }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode(value))
}

fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |decoded| decoded.into_owned())
}

/// Identity provider with in-memory accounts
pub struct FakeIdentity {
    token: watch::Sender<Option<String>>,
    state: watch::Sender<SessionState>,
    /// email -> (password, uid)
    accounts: Mutex<HashMap<String, (String, String)>>,
    deleted: Mutex<Vec<String>>,
}

impl FakeIdentity {
    pub fn signed_out() -> Self {
        let (token, _) = watch::channel(None);
        let (state, _) = watch::channel(SessionState::SignedOut);
        Self {
            token,
            state,
            accounts: Mutex::new(HashMap::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn signed_in(uid: &str, email: &str) -> Self {
        let identity = Self::signed_out();
        identity.establish(SessionUser::new(uid).with_email(email));
        identity
    }

    /// Register an account that can sign in
    pub fn with_account(self, email: &str, password: &str, uid: &str) -> Self {
        lock(&self.accounts).insert(email.to_ascii_lowercase(), (password.to_string(), uid.to_string()));
        self
    }

    /// Current token, empty when signed out
    pub fn token(&self) -> String {
        self.token.borrow().clone().unwrap_or_default()
    }

    pub fn account_exists(&self, email: &str) -> bool {
        lock(&self.accounts).contains_key(&email.to_ascii_lowercase())
    }

    /// Uids removed through `delete_current_user`
    pub fn deleted_users(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }

    fn establish(&self, user: SessionUser) {
        self.token.send_replace(Some(format!("token-{}", user.uid)));
        self.state.send_replace(SessionState::SignedIn(user));
    }

    fn clear(&self) {
        self.token.send_replace(None);
        self.state.send_replace(SessionState::SignedOut);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn id_token(&self) -> Result<Option<String>, IdentityError> {
        Ok(self.token.borrow().clone())
    }

    fn session(&self) -> SessionState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser, IdentityError> {
        let uid = {
            let accounts = lock(&self.accounts);
            match accounts.get(&email.to_ascii_lowercase()) {
                None => return Err(IdentityError::from_code("auth/user-not-found")),
                Some((expected, _)) if expected != password => {
                    return Err(IdentityError::from_code("auth/wrong-password"))
                }
                Some((_, uid)) => uid.clone(),
            }
        };
        let user = SessionUser::new(uid).with_email(email);
        self.establish(user.clone());
        Ok(user)
    }

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SessionUser, IdentityError> {
        let uid = {
            let mut accounts = lock(&self.accounts);
            let key = email.to_ascii_lowercase();
            if accounts.contains_key(&key) {
                return Err(IdentityError::from_code("auth/email-already-in-use"));
            }
            if password.chars().count() < 6 {
                return Err(IdentityError::from_code("auth/weak-password"));
            }
            let uid = Uuid::new_v4().to_string();
            accounts.insert(key, (password.to_string(), uid.clone()));
            uid
        };
        let mut user = SessionUser::new(uid).with_email(email);
        user.display_name = Some(display_name.to_string());
        self.establish(user.clone());
        Ok(user)
    }

    async fn delete_current_user(&self) -> Result<(), IdentityError> {
        let uid = match self.session().user() {
            Some(user) => user.uid.clone(),
            None => return Err(IdentityError::NoSession),
        };
        lock(&self.accounts).retain(|_, (_, account_uid)| *account_uid != uid);
        lock(&self.deleted).push(uid);
        self.clear();
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.clear();
        Ok(())
    }
}
