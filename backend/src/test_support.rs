//! Test doubles and an in-memory application harness.
//!
//! Compiled for unit tests and, through the `test-support` feature, for the
//! integration suites in `tests/`. Everything here runs without a database
//! or network access.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use mockable::DefaultClock;

use crate::Trace;
use crate::domain::ports::{
    MailTransport, MailTransportError, MailingList, MailingListError, PasswordHasher,
    PasswordHasherError,
};
use crate::domain::{
    EmailAddress, NewPassword, NotificationSettings, OutboundEmail, PasswordDigest,
    StaffBootstrap, UserId, Username,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::settings::StaffAccount;
use crate::wiring::{Collaborators, InMemoryRepositories, build_http_state, ensure_staff_account};

const TEST_FROM_ADDRESS: &str = "noreply@gameconnect.test";

/// Mail transport that keeps every message it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingMailTransport {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailTransport {
    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Messages addressed to `to`.
    pub fn sent_to(&self, to: &str) -> Vec<OutboundEmail> {
        self.sent()
            .into_iter()
            .filter(|email| email.to.as_str() == to)
            .collect()
    }
}

#[async_trait]
impl MailTransport for RecordingMailTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailTransportError> {
        self.sent
            .lock()
            .map_err(|_| MailTransportError::transport("recording lock poisoned"))?
            .push(email.clone());
        Ok(())
    }
}

/// Mail transport whose provider is always unreachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingMailTransport;

#[async_trait]
impl MailTransport for FailingMailTransport {
    async fn send(&self, _email: &OutboundEmail) -> Result<(), MailTransportError> {
        Err(MailTransportError::transport("connection refused"))
    }
}

/// Mailing list that remembers subscribed addresses.
#[derive(Debug, Default)]
pub struct RecordingMailingList {
    members: Mutex<Vec<EmailAddress>>,
}

impl RecordingMailingList {
    pub fn members(&self) -> Vec<String> {
        self.members
            .lock()
            .map(|members| members.iter().map(|m| m.as_str().to_owned()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MailingList for RecordingMailingList {
    async fn add_member(&self, email: &EmailAddress) -> Result<(), MailingListError> {
        self.members
            .lock()
            .map_err(|_| MailingListError::transport("recording lock poisoned"))?
            .push(email.clone());
        Ok(())
    }
}

/// Reversible hasher that keeps test suites fast.
///
/// Never use outside tests: the digest contains the password.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextPasswordHasher;

impl PasswordHasher for PlaintextPasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHasherError> {
        Ok(PasswordDigest::new(format!("plain${password}")))
    }

    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, PasswordHasherError> {
        digest
            .as_str()
            .strip_prefix("plain$")
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHasherError::hash("digest was not produced by this hasher"))
    }
}

/// Fully wired application over the in-memory store.
pub struct TestBackend {
    pub store: Arc<InMemoryStore>,
    pub mail: Arc<RecordingMailTransport>,
    pub mailing_list: Arc<RecordingMailingList>,
    state: HttpState,
}

impl TestBackend {
    /// Wire the services with recording mail adapters.
    pub fn new() -> Self {
        let mail = Arc::new(RecordingMailTransport::default());
        Self::with_mail(mail.clone(), mail)
    }

    /// Wire the services with a mail transport that always fails.
    ///
    /// The returned [`Self::mail`] recorder stays empty.
    pub fn with_failing_mail() -> Self {
        Self::with_mail(
            Arc::new(RecordingMailTransport::default()),
            Arc::new(FailingMailTransport),
        )
    }

    fn with_mail(recorder: Arc<RecordingMailTransport>, transport: Arc<dyn MailTransport>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let mailing_list = Arc::new(RecordingMailingList::default());
        let from_address = EmailAddress::new(TEST_FROM_ADDRESS)
            .unwrap_or_else(|err| panic!("test sender address is valid: {err}"));
        let state = build_http_state(
            InMemoryRepositories::in_memory(Arc::clone(&store)),
            Collaborators {
                hasher: Arc::new(PlaintextPasswordHasher),
                mail: transport,
                mailing_list: mailing_list.clone(),
                notification_settings: NotificationSettings { from_address },
                clock: Arc::new(DefaultClock),
            },
        );
        Self {
            store,
            mail: recorder,
            mailing_list,
            state,
        }
    }

    /// Create a staff account directly in the store.
    pub async fn create_staff(&self, username: &str, password: &str) -> UserId {
        let staff = StaffAccount {
            username: Username::new(username)
                .unwrap_or_else(|err| panic!("staff username {username:?}: {err}")),
            email: EmailAddress::new(format!("{username}@gameconnect.test"))
                .unwrap_or_else(|err| panic!("staff email: {err}")),
            password: NewPassword::new(password, password)
                .unwrap_or_else(|err| panic!("staff password: {err}")),
        };
        let outcome = ensure_staff_account(
            Arc::clone(&self.store),
            Arc::new(PlaintextPasswordHasher),
            Arc::new(DefaultClock),
            staff,
        )
        .await
        .unwrap_or_else(|err| panic!("staff bootstrap: {err}"));
        match outcome {
            StaffBootstrap::Created(id) | StaffBootstrap::AlreadyPresent(id) => id,
        }
    }

    pub fn state(&self) -> HttpState {
        self.state.clone()
    }

    /// Actix application mounting the API the way the server does, with a
    /// non-secure cookie so plain-HTTP test requests keep their session.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(web::Data::new(self.state()))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .configure(crate::inbound::http::configure),
            )
    }
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn app_keeps_working_after_the_backend_is_dropped() {
        let app = {
            let backend = TestBackend::new();
            backend.app()
        };
        let service = test::init_service(app).await;

        let request = test::TestRequest::get().uri("/api/v1/front-page").to_request();
        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
