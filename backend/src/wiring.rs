//! Assembly of domain services into the HTTP adapter state.
//!
//! [`build_http_state`] is generic over the repository adapters so the
//! server, the integration tests and local development all share one wiring
//! path; only the choice of [`Repositories`] differs.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ArticleRepository, GameRepository, MailTransport, MailingList, NotificationRepository,
    OfferLedgerRepository, PasswordHasher, UserRepository,
};
use crate::domain::{
    AccountService, CatalogueService, Error, FrontPageService, MarketRepositories, MarketService,
    NotificationService, NotificationSettings, StaffBootstrap, SubscriptionService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselGameRepository, DieselNotificationRepository,
    DieselOfferLedgerRepository, DieselUserRepository,
};
use crate::settings::StaffAccount;

/// Driven repository adapters, one per aggregate.
pub struct Repositories<U, G, A, L, N> {
    pub users: Arc<U>,
    pub games: Arc<G>,
    pub articles: Arc<A>,
    pub ledger: Arc<L>,
    pub notifications: Arc<N>,
}

/// Repositories that all share one process-local store.
pub type InMemoryRepositories =
    Repositories<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore>;

/// PostgreSQL repositories sharing one connection pool.
pub type DieselRepositories = Repositories<
    DieselUserRepository,
    DieselGameRepository,
    DieselArticleRepository,
    DieselOfferLedgerRepository,
    DieselNotificationRepository,
>;

impl InMemoryRepositories {
    #[must_use]
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: Arc::clone(&store),
            games: Arc::clone(&store),
            articles: Arc::clone(&store),
            ledger: Arc::clone(&store),
            notifications: store,
        }
    }
}

impl DieselRepositories {
    #[must_use]
    pub fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            games: Arc::new(DieselGameRepository::new(pool.clone())),
            articles: Arc::new(DieselArticleRepository::new(pool.clone())),
            ledger: Arc::new(DieselOfferLedgerRepository::new(pool.clone())),
            notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        }
    }
}

impl<U, G, A, L, N> Clone for Repositories<U, G, A, L, N> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            games: Arc::clone(&self.games),
            articles: Arc::clone(&self.articles),
            ledger: Arc::clone(&self.ledger),
            notifications: Arc::clone(&self.notifications),
        }
    }
}

/// Non-repository collaborators shared by the services.
#[derive(Clone)]
pub struct Collaborators {
    pub hasher: Arc<dyn PasswordHasher>,
    pub mail: Arc<dyn MailTransport>,
    pub mailing_list: Arc<dyn MailingList>,
    pub notification_settings: NotificationSettings,
    pub clock: Arc<dyn Clock>,
}

/// Wire every driving port onto services over `repos`.
pub fn build_http_state<U, G, A, L, N>(
    repos: Repositories<U, G, A, L, N>,
    collaborators: Collaborators,
) -> HttpState
where
    U: UserRepository + 'static,
    G: GameRepository + 'static,
    A: ArticleRepository + 'static,
    L: OfferLedgerRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Repositories {
        users,
        games,
        articles,
        ledger,
        notifications,
    } = repos;
    let Collaborators {
        hasher,
        mail,
        mailing_list,
        notification_settings,
        clock,
    } = collaborators;

    let accounts = Arc::new(AccountService::new(users.clone(), hasher, clock.clone()));
    let catalogue = Arc::new(CatalogueService::new(games.clone(), articles, clock.clone()));
    let market = Arc::new(MarketService::new(
        MarketRepositories {
            ledger,
            games,
            users,
            notifications: notifications.clone(),
        },
        mail.clone(),
        notification_settings.clone(),
        clock,
    ));
    let inbox = Arc::new(NotificationService::new(notifications));
    let front_page = Arc::new(FrontPageService::new(catalogue.clone(), market.clone()));
    let subscriptions = Arc::new(SubscriptionService::new(
        mailing_list,
        mail,
        notification_settings,
    ));

    HttpState {
        login: accounts.clone(),
        accounts: accounts.clone(),
        users: accounts,
        market: market.clone(),
        market_query: market,
        notifications: inbox.clone(),
        notifications_query: inbox,
        catalogue: catalogue.clone(),
        catalogue_query: catalogue,
        front_page,
        subscriptions,
    }
}

/// Create the configured staff account unless its username is already taken.
pub async fn ensure_staff_account<U>(
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    staff: StaffAccount,
) -> Result<StaffBootstrap, Error>
where
    U: UserRepository + 'static,
{
    let StaffAccount {
        username,
        email,
        password,
    } = staff;
    AccountService::new(users, hasher, clock)
        .ensure_staff_account(username, email, &password)
        .await
}
