//! Choose outbound adapters from settings and build the HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use gameconnect::domain::ports::{
    MailTransport, MailingList, PasswordHasher, UserRepository,
};
use gameconnect::domain::{Error, StaffBootstrap};
use gameconnect::inbound::http::state::HttpState;
use gameconnect::outbound::mail::{LogMailTransport, MandrillMailTransport};
use gameconnect::outbound::mailing_list::{
    LogMailingList, MailchimpMailingList, MailchimpSetupError,
};
use gameconnect::outbound::memory::InMemoryStore;
use gameconnect::outbound::password::Argon2PasswordHasher;
use gameconnect::outbound::persistence::{
    DbPool, MigrationError, PoolConfig, PoolError, run_pending_migrations,
};
use gameconnect::settings::{AppSettings, SettingsError, StaffAccount};
use gameconnect::wiring::{
    Collaborators, DieselRepositories, InMemoryRepositories, ensure_staff_account,
};

/// Failures that abort start-up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("cannot build mail client: {0}")]
    MailClient(#[from] reqwest::Error),
    #[error(transparent)]
    MailingList(#[from] MailchimpSetupError),
    #[error("staff bootstrap failed: {0}")]
    Staff(Error),
}

fn mail_transport(settings: &AppSettings) -> Result<Arc<dyn MailTransport>, StartupError> {
    match settings.mail_settings()? {
        Some(mail) => {
            info!(endpoint = %mail.endpoint, "mail provider configured");
            Ok(Arc::new(MandrillMailTransport::new(mail)?))
        }
        None => {
            warn!("no mail provider configured; outbound mail will only be logged");
            Ok(Arc::new(LogMailTransport))
        }
    }
}

fn mailing_list(settings: &AppSettings) -> Result<Arc<dyn MailingList>, StartupError> {
    match settings.mailchimp_settings()? {
        Some(list) => {
            info!(data_center = %list.data_center, "mailing list configured");
            Ok(Arc::new(MailchimpMailingList::new(list)?))
        }
        None => {
            warn!("no mailing list configured; subscriptions will only be logged");
            Ok(Arc::new(LogMailingList))
        }
    }
}

async fn bootstrap_staff<U>(
    users: Arc<U>,
    collaborators: &Collaborators,
    staff: Option<StaffAccount>,
) -> Result<(), StartupError>
where
    U: UserRepository + 'static,
{
    let Some(staff) = staff else {
        return Ok(());
    };
    let outcome = ensure_staff_account(
        users,
        Arc::clone(&collaborators.hasher),
        Arc::clone(&collaborators.clock),
        staff,
    )
    .await
    .map_err(StartupError::Staff)?;
    match outcome {
        StaffBootstrap::Created(id) => info!(user_id = %id, "staff account created"),
        StaffBootstrap::AlreadyPresent(id) => info!(user_id = %id, "staff account already present"),
    }
    Ok(())
}

/// Build the HTTP state, preferring PostgreSQL when a database URL is set.
pub async fn build_http_state(settings: &AppSettings) -> Result<HttpState, StartupError> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let collaborators = Collaborators {
        hasher,
        mail: mail_transport(settings)?,
        mailing_list: mailing_list(settings)?,
        notification_settings: settings.notification_settings()?,
        clock: Arc::new(DefaultClock),
    };
    let staff = settings.staff_account()?;

    match settings.database_url.as_deref() {
        Some(url) => {
            run_pending_migrations(url).await?;
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            let repos = DieselRepositories::diesel(&pool);
            bootstrap_staff(Arc::clone(&repos.users), &collaborators, staff).await?;
            info!("using PostgreSQL persistence");
            Ok(gameconnect::wiring::build_http_state(repos, collaborators))
        }
        None => {
            warn!("no database configured; state is kept in memory and lost on restart");
            let repos = InMemoryRepositories::in_memory(Arc::new(InMemoryStore::new()));
            bootstrap_staff(Arc::clone(&repos.users), &collaborators, staff).await?;
            Ok(gameconnect::wiring::build_http_state(repos, collaborators))
        }
    }
}
