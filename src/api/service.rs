use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use super::client::ApiClient;
use super::envelope::Envelope;
use super::forms::{
    DormChangeForm, ForgotPasswordForm, LoginForm, PayBillForm, RegisterForm, RepairForm,
    VisitorForm,
};
use super::types::RequestDescriptor;
use crate::constants::{
    PATH_BUILDINGS, PATH_DORM_CHANGES, PATH_FORGOT_PASSWORD, PATH_LOGIN, PATH_LOGOUT,
    PATH_REGISTER, PATH_REPAIRS, PATH_STUDENT_DORM, PATH_STUDENT_INFO, PATH_STUDENT_PHOTO,
    PATH_UTILITY_BILLS, PATH_UTILITY_BILLS_PAY, PATH_VISITORS, PHOTO_FIELD_NAME,
};
use crate::utils::Result;

/// Typed call shapes for every screen of the dormitory client.
///
/// Each method returns the decoded envelope; interpreting `code` and `msg`
/// is left to the caller.
pub struct DormService {
    client: ApiClient,
}

impl DormService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Log in and cache the returned profile on success
    pub async fn login(&self, form: &LoginForm) -> Result<Envelope> {
        form.validate()?;

        let envelope: Envelope = self.post(PATH_LOGIN, form).await?;
        if envelope.is_success() {
            let profile = envelope.data.clone().unwrap_or(Value::Null);
            self.client.session().set_profile(profile)?;
            info!("Logged in as {}", form.username);
        }
        Ok(envelope)
    }

    /// Tell the backend we are leaving, then drop all local state.
    /// The local session is cleared even when the backend is unreachable.
    pub async fn logout(&self) -> Result<()> {
        let request = RequestDescriptor::post(PATH_LOGOUT, Value::Object(Default::default()));
        if let Err(e) = self.client.call(request).await {
            warn!("Logout request failed, clearing local session anyway: {}", e);
        }
        self.client.session().clear()
    }

    pub async fn register(&self, form: RegisterForm) -> Result<Envelope> {
        form.validate()?;
        self.post(PATH_REGISTER, &form.normalized()).await
    }

    pub async fn forgot_password(&self, form: &ForgotPasswordForm) -> Result<Envelope> {
        self.post(PATH_FORGOT_PASSWORD, form).await
    }

    pub async fn buildings(&self) -> Result<Envelope<Vec<String>>> {
        self.get(PATH_BUILDINGS).await
    }

    pub async fn student_info(&self) -> Result<Envelope> {
        self.get(PATH_STUDENT_INFO).await
    }

    pub async fn student_dorm(&self) -> Result<Envelope> {
        self.get(PATH_STUDENT_DORM).await
    }

    /// Upload a profile photo from disk
    pub async fn upload_photo(&self, file: &Path) -> Result<Envelope> {
        let contents = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("photo");

        let response = self
            .client
            .upload(PATH_STUDENT_PHOTO, PHOTO_FIELD_NAME, file_name, contents)
            .await?;
        response.envelope()
    }

    pub async fn repairs(&self) -> Result<Envelope<Vec<Value>>> {
        self.get(PATH_REPAIRS).await
    }

    pub async fn submit_repair(&self, form: &RepairForm) -> Result<Envelope> {
        self.post(PATH_REPAIRS, form).await
    }

    pub async fn visitors(&self) -> Result<Envelope<Vec<Value>>> {
        self.get(PATH_VISITORS).await
    }

    pub async fn register_visitor(&self, form: &VisitorForm) -> Result<Envelope> {
        self.post(PATH_VISITORS, form).await
    }

    pub async fn dorm_changes(&self) -> Result<Envelope<Vec<Value>>> {
        self.get(PATH_DORM_CHANGES).await
    }

    pub async fn submit_dorm_change(&self, form: &DormChangeForm) -> Result<Envelope> {
        form.validate()?;
        self.post(PATH_DORM_CHANGES, form).await
    }

    pub async fn utility_bills(&self) -> Result<Envelope<Vec<Value>>> {
        self.get(PATH_UTILITY_BILLS).await
    }

    pub async fn pay_bill(&self, bill_id: i64) -> Result<Envelope> {
        self.post(PATH_UTILITY_BILLS_PAY, &PayBillForm::new(bill_id))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        let response = self.client.call(RequestDescriptor::get(path)).await?;
        response.envelope()
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>> {
        let request = RequestDescriptor::post(path, serde_json::to_value(body)?);
        let response = self.client.call(request).await?;
        response.envelope()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::forms::UserType;
    use crate::app::ConfigStore;
    use crate::session::{LoginGuard, Navigator, Route, SessionStore};
    use crate::storage::{MemoryStorage, Storage};
    use crate::utils::DormError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct CountingNavigator(AtomicUsize);

    impl Navigator for &CountingNavigator {
        fn redirect(&self, _route: Route) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn service() -> (MockServer, DormService, Arc<SessionStore>) {
        let server = MockServer::start().await;
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let config = Arc::new(ConfigStore::load(
            Arc::clone(&storage),
            format!("{}/api", server.uri()),
        ));
        let session = Arc::new(SessionStore::new(storage));
        let client = ApiClient::new(config, Arc::clone(&session)).unwrap();
        (server, DormService::new(client), session)
    }

    fn student_login() -> LoginForm {
        LoginForm {
            username: "2021001".to_string(),
            password: "secret".to_string(),
            user_type: UserType::Student,
        }
    }

    #[tokio::test]
    async fn test_login_stores_cookie_and_profile_and_unlocks_guard() {
        let (server, service, session) = service().await;

        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_json(json!({
                "username": "2021001",
                "password": "secret",
                "userType": "student"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Set-Cookie", "sid=xyz")
                    .set_body_json(json!({"code": 200, "data": {"id": 1, "name": "A"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let navigator = CountingNavigator::default();
        let guard = LoginGuard::new(Arc::clone(&session), &navigator);
        assert!(!guard.ensure_logged_in());

        let envelope = service.login(&student_login()).await.unwrap();
        assert!(envelope.is_success());
        assert_eq!(session.cookie().as_deref(), Some("sid=xyz"));
        assert_eq!(session.profile(), Some(json!({"id": 1, "name": "A"})));

        assert!(guard.ensure_logged_in());
        assert_eq!(navigator.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_login_resolves_and_changes_nothing() {
        let (server, service, session) = service().await;

        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"code": 401, "msg": "invalid credentials"})),
            )
            .mount(&server)
            .await;

        let envelope = service.login(&student_login()).await.unwrap();
        assert_eq!(envelope.code, 401);
        assert_eq!(envelope.message_or("Login failed"), "invalid credentials");
        assert!(session.cookie().is_none());
        assert!(session.profile().is_none());
    }

    #[tokio::test]
    async fn test_login_presence_check_skips_network() {
        let (server, service, _) = service().await;

        let mut form = student_login();
        form.password.clear();
        let err = service.login(&form).await.unwrap_err();

        assert!(matches!(err, DormError::MissingField("password")));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_registration_never_reaches_backend() {
        let (server, service, _) = service().await;

        let form = RegisterForm {
            username: "root".to_string(),
            name: "Admin".to_string(),
            email: "root@example.com".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
            user_type: UserType::Admin,
            phone: "123".to_string(),
            responsible_building: None,
            invitation_code: None,
        };

        assert!(matches!(
            service.register(form).await,
            Err(DormError::InvalidField { field: "userType", .. })
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let (server, service, session) = service().await;
        session.set_cookie("sid=abc").unwrap();
        session.set_profile(json!({"id": 1})).unwrap();

        Mock::given(method("POST"))
            .and(path("/api/logout"))
            .and(header("Cookie", "sid=abc"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        service.logout().await.unwrap();
        assert!(session.cookie().is_none());
        assert!(session.profile().is_none());
    }

    #[tokio::test]
    async fn test_typed_list_endpoints() {
        let (server, service, _) = service().await;

        Mock::given(method("GET"))
            .and(path("/api/buildings"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": ["North", "South"]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/utility_bills"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"code": 200, "data": [{"id": 4, "amount": 35.5, "status": "unpaid"}]}),
            ))
            .mount(&server)
            .await;

        let buildings = service.buildings().await.unwrap();
        assert_eq!(buildings.data, Some(vec!["North".to_string(), "South".to_string()]));

        let bills = service.utility_bills().await.unwrap();
        assert_eq!(bills.data.unwrap()[0]["id"], json!(4));
    }

    #[tokio::test]
    async fn test_pay_bill_and_dorm_change_payloads() {
        let (server, service, _) = service().await;

        Mock::given(method("POST"))
            .and(path("/api/utility_bills/pay"))
            .and(body_json(json!({"bill_id": 4, "payment_method": "wechat"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/dorm_changes"))
            .and(body_json(json!({"target_dorm_id": null, "reason": "quiet room"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
            .expect(1)
            .mount(&server)
            .await;

        assert!(service.pay_bill(4).await.unwrap().is_success());
        let form = DormChangeForm::new(None, "quiet room");
        assert!(service.submit_dorm_change(&form).await.unwrap().is_success());

        let empty = DormChangeForm::new(None, " ");
        assert!(service.submit_dorm_change(&empty).await.is_err());
    }

    #[tokio::test]
    async fn test_upload_photo_from_disk() {
        let (server, service, _) = service().await;
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("avatar.jpg");
        std::fs::write(&file, b"jpeg-bytes").unwrap();

        Mock::given(method("POST"))
            .and(path("/api/student/photo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
            .expect(1)
            .mount(&server)
            .await;

        assert!(service.upload_photo(&file).await.unwrap().is_success());

        let missing = temp_dir.path().join("missing.jpg");
        assert!(matches!(
            service.upload_photo(&missing).await,
            Err(DormError::Io(_))
        ));
    }
}
