//! An in process stand in for the Rentix REST backend. Keeps just enough
//! state to drive the client through real HTTP

use std::{
    collections::HashSet,
    net::TcpListener,
    sync::{Arc, LazyLock, Mutex},
};

use actix_web::{
    http::{header, StatusCode},
    web, App, HttpRequest, HttpResponse, HttpServer,
};
use rentix_client_core::{Client, MemoryTokenStore, SessionManager, SharedTokenStore};
use rentix_shared::{
    req_args::{LoginReqArgs, UserSearchReqArgs},
    resources::{AddressDraft, CompanyDraft, FiscalIdentityDraft, Property, PropertyDraft},
    telemetry::{self, get_subscriber, init_subscriber},
};
use serde_json::{json, Value};
use uuid::Uuid;

pub const TEST_EMAIL: &str = "ana@rentix.es";
pub const TEST_PASSWORD: &str = "correct-horse";
pub const LOGIN_TOKEN: &str = "login-token";
pub const REFRESH_TOKEN: &str = "refresh-token";
/// Id the mock gives to the logged in user
pub const TEST_USER_ID: &str = "u-1";

// Ensure that the `tracing` stack is only initialised once
static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_core_tests{}", Uuid::new_v4());
        let (file, path) = telemetry::create_trace_file(&log_file_name).unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

/// What the mock backend knows. Tests reach in to change it between requests
#[derive(Debug, Default)]
pub struct MockState {
    /// `(companyId, role)` of the test user
    pub memberships: Mutex<Vec<(String, String)>>,
    pub app_role: Mutex<String>,
    pub valid_tokens: Mutex<HashSet<String>>,
    pub properties: Mutex<Vec<Property>>,
    /// `(id, email)` of every account
    pub users: Mutex<Vec<(String, String)>>,
    pub address_ids: Mutex<Vec<String>>,
    pub fiscal_ids: Mutex<Vec<String>>,
    /// `"<METHOD> <path> <bearer or ->"` for every request received
    pub requests: Mutex<Vec<String>>,
}

impl MockState {
    pub fn set_memberships(&self, memberships: &[(&str, &str)]) {
        *self.memberships.lock().unwrap() = memberships
            .iter()
            .map(|(id, role)| (id.to_string(), role.to_string()))
            .collect();
    }

    pub fn revoke_all_tokens(&self) {
        self.valid_tokens.lock().unwrap().clear();
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub struct TestApp {
    pub mock: web::Data<MockState>,
    pub store: SharedTokenStore,
    pub core_client: Client,
}

impl TestApp {
    pub fn session(&self) -> SessionManager<Client> {
        SessionManager::new(self.core_client.clone(), Arc::clone(&self.store))
    }

    pub fn login_args(&self) -> LoginReqArgs {
        LoginReqArgs::new(
            TEST_EMAIL.try_into().unwrap(),
            TEST_PASSWORD.to_string().into(),
        )
    }
}

pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let mock = web::Data::new(MockState {
        app_role: Mutex::new("USER".to_string()),
        users: Mutex::new(vec![
            (TEST_USER_ID.to_string(), TEST_EMAIL.to_string()),
            ("u-2".to_string(), "luis@rentix.es".to_string()),
        ]),
        ..Default::default()
    });
    let server_state = mock.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .route("/auth/login", web::post().to(login))
            .route("/users/me", web::get().to(users_me))
            .route("/companies/my-companies", web::get().to(my_companies))
            .route("/context/select-company", web::post().to(select_company))
            .route("/properties", web::get().to(list_properties))
            .route("/properties", web::post().to(create_property))
            .route("/properties/trash", web::get().to(list_trash))
            .route("/properties/{id}", web::delete().to(remove_property))
            .route("/properties/{id}/restore", web::patch().to(restore_property))
            .route("/users", web::get().to(search_users))
            .route("/users", web::post().to(create_user))
            .route("/addresses/draft", web::post().to(create_address_draft))
            .route("/fiscal-identities", web::post().to(create_fiscal_identity))
            .route("/companies", web::post().to(create_company))
    })
    .workers(1)
    .listen(listener)
    .expect("failed to listen")
    .run();
    tokio::spawn(server);

    let address = format!("http://127.0.0.1:{port}");
    let store = MemoryTokenStore::shared();
    let core_client = Client::new(address, Arc::clone(&store));
    TestApp {
        mock,
        store,
        core_client,
    }
}

fn error(status: StatusCode, message: Value) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "message": message,
        "error": status.canonical_reason(),
        "statusCode": status.as_u16(),
    }))
}

fn unauthorized() -> HttpResponse {
    error(StatusCode::UNAUTHORIZED, json!("Unauthorized"))
}

/// Records the request and returns the bearer if it is currently valid
fn authorize(req: &HttpRequest, state: &MockState) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);
    state.requests.lock().unwrap().push(format!(
        "{} {} {}",
        req.method(),
        req.path(),
        bearer.as_deref().unwrap_or("-")
    ));
    bearer.filter(|token| state.valid_tokens.lock().unwrap().contains(token))
}

async fn login(req: HttpRequest, state: web::Data<MockState>, body: web::Json<Value>) -> HttpResponse {
    authorize(&req, &state);
    if body["email"] != TEST_EMAIL || body["password"] != TEST_PASSWORD {
        return error(StatusCode::UNAUTHORIZED, json!("Invalid credentials"));
    }
    state
        .valid_tokens
        .lock()
        .unwrap()
        .insert(LOGIN_TOKEN.to_string());
    HttpResponse::Ok().json(json!({
        "accessToken": LOGIN_TOKEN,
        "refreshToken": REFRESH_TOKEN,
    }))
}

fn memberships_json(state: &MockState) -> Value {
    state
        .memberships
        .lock()
        .unwrap()
        .iter()
        .map(|(id, role)| json!({ "companyId": id, "role": role }))
        .collect()
}

async fn users_me(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    HttpResponse::Ok().json(json!({
        "id": TEST_USER_ID,
        "email": TEST_EMAIL,
        "appRole": state.app_role.lock().unwrap().clone(),
        "companyMemberships": memberships_json(&state),
    }))
}

async fn my_companies(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    HttpResponse::Ok().json(memberships_json(&state))
}

async fn select_company(
    req: HttpRequest,
    state: web::Data<MockState>,
    body: web::Json<Value>,
) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    let Some(company_id) = body["companyId"].as_str() else {
        return error(StatusCode::BAD_REQUEST, json!(["companyId must be a string"]));
    };
    let is_member = state
        .memberships
        .lock()
        .unwrap()
        .iter()
        .any(|(id, _)| id == company_id);
    if !is_member {
        return error(
            StatusCode::FORBIDDEN,
            json!("You do not belong to this company"),
        );
    }
    let token = context_token(company_id);
    state.valid_tokens.lock().unwrap().insert(token.clone());
    HttpResponse::Ok().json(json!({ "accessToken": token }))
}

pub fn context_token(company_id: &str) -> String {
    format!("ctx-{company_id}")
}

async fn list_properties(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    let properties = state.properties.lock().unwrap();
    let active: Vec<&Property> = properties.iter().filter(|p| p.is_active).collect();
    HttpResponse::Ok().json(active)
}

async fn list_trash(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    let properties = state.properties.lock().unwrap();
    let trashed: Vec<&Property> = properties.iter().filter(|p| !p.is_active).collect();
    HttpResponse::Ok().json(trashed)
}

async fn create_property(
    req: HttpRequest,
    state: web::Data<MockState>,
    body: web::Json<PropertyDraft>,
) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    let draft = body.into_inner();
    let mut problems = vec![];
    if draft.name.trim().is_empty() {
        problems.push("name should not be empty");
    }
    if draft.address.trim().is_empty() {
        problems.push("address should not be empty");
    }
    if !problems.is_empty() {
        return error(StatusCode::BAD_REQUEST, json!(problems));
    }
    let mut properties = state.properties.lock().unwrap();
    let property = Property {
        id: format!("p-{}", properties.len() + 1).try_into().unwrap(),
        name: draft.name,
        address: draft.address,
        city: draft.city,
        cadastral_reference: draft.cadastral_reference,
        is_active: true,
        deleted_at: None,
    };
    properties.push(property.clone());
    HttpResponse::Created().json(property)
}

async fn remove_property(
    req: HttpRequest,
    state: web::Data<MockState>,
    id: web::Path<String>,
) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    let mut properties = state.properties.lock().unwrap();
    match properties.iter_mut().find(|p| p.id.as_ref() == id.as_str()) {
        Some(property) => {
            property.is_active = false;
            property.deleted_at = Some(chrono::Utc::now());
            HttpResponse::Ok().finish()
        }
        None => error(StatusCode::NOT_FOUND, json!("Property not found")),
    }
}

async fn restore_property(
    req: HttpRequest,
    state: web::Data<MockState>,
    id: web::Path<String>,
) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    let mut properties = state.properties.lock().unwrap();
    match properties.iter_mut().find(|p| p.id.as_ref() == id.as_str()) {
        Some(property) => {
            property.is_active = true;
            property.deleted_at = None;
            HttpResponse::Ok().json(property.clone())
        }
        None => error(StatusCode::NOT_FOUND, json!("Property not found")),
    }
}

async fn search_users(
    req: HttpRequest,
    state: web::Data<MockState>,
    query: web::Query<UserSearchReqArgs>,
) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    let search = query.search.clone().unwrap_or_default();
    let found: Vec<Value> = state
        .users
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, email)| email.contains(&search))
        .map(|(id, email)| json!({ "id": id, "email": email, "appRole": "USER" }))
        .collect();
    HttpResponse::Ok().json(json!({ "total": found.len(), "data": found }))
}

async fn create_user(
    req: HttpRequest,
    state: web::Data<MockState>,
    body: web::Json<Value>,
) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();
    if password.len() < 6 {
        return error(
            StatusCode::BAD_REQUEST,
            json!(["password must be longer than or equal to 6 characters"]),
        );
    }
    let mut users = state.users.lock().unwrap();
    if users.iter().any(|(_, existing)| existing == &email) {
        return error(StatusCode::CONFLICT, json!("Email already registered"));
    }
    let id = format!("u-{}", users.len() + 1);
    users.push((id.clone(), email.clone()));
    HttpResponse::Created().json(json!({ "id": id, "email": email, "appRole": body["appRole"] }))
}

async fn create_address_draft(
    req: HttpRequest,
    state: web::Data<MockState>,
    body: web::Json<AddressDraft>,
) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    let mut ids = state.address_ids.lock().unwrap();
    let id = format!("a-{}", ids.len() + 1);
    ids.push(id.clone());
    let mut address = serde_json::to_value(body.into_inner()).unwrap();
    address["id"] = json!(id);
    HttpResponse::Created().json(address)
}

async fn create_fiscal_identity(
    req: HttpRequest,
    state: web::Data<MockState>,
    body: web::Json<FiscalIdentityDraft>,
) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    if body.tax_id.chars().count() != 9 {
        return error(StatusCode::BAD_REQUEST, json!(["taxId is not a valid NIF"]));
    }
    let mut ids = state.fiscal_ids.lock().unwrap();
    let id = format!("f-{}", ids.len() + 1);
    ids.push(id.clone());
    let mut fiscal = serde_json::to_value(body.into_inner()).unwrap();
    fiscal["id"] = json!(id);
    HttpResponse::Created().json(fiscal)
}

/// The test user becomes owner of the companies registered for them
async fn create_company(
    req: HttpRequest,
    state: web::Data<MockState>,
    body: web::Json<CompanyDraft>,
) -> HttpResponse {
    if authorize(&req, &state).is_none() {
        return unauthorized();
    }
    let draft = body.into_inner();
    let mut problems = vec![];
    if !state
        .address_ids
        .lock()
        .unwrap()
        .iter()
        .any(|id| id == draft.fiscal_address_id.as_ref())
    {
        problems.push("fiscalAddressId must reference an existing address");
    }
    if !state
        .fiscal_ids
        .lock()
        .unwrap()
        .iter()
        .any(|id| id == draft.facturae_party_id.as_ref())
    {
        problems.push("facturaePartyId must reference an existing fiscal identity");
    }
    if !problems.is_empty() {
        return error(StatusCode::BAD_REQUEST, json!(problems));
    }
    let mut memberships = state.memberships.lock().unwrap();
    let id = format!("company-{}", memberships.len() + 1);
    if draft.user_id.as_ref() == TEST_USER_ID {
        memberships.push((id.clone(), "PROPIETARIO".to_string()));
    }
    HttpResponse::Created().json(json!({ "id": id, "legalName": "Pisos Sol SL" }))
}
