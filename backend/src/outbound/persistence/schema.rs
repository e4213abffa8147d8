//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        is_staff -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    games (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Editorial articles keyed by their URL slug.
    articles (slug) {
        slug -> Varchar,
        game_id -> Uuid,
        title -> Varchar,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Listings. `is_open` only ever moves from true to false.
    exchange_offers (id) {
        id -> Uuid,
        owner_id -> Uuid,
        /// `sell`, `exchange` or `buy`.
        offer_type -> Varchar,
        game_id -> Uuid,
        price_cents -> Nullable<Int8>,
        description -> Text,
        is_open -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Counter-offers made against listings.
    customer_offers (id) {
        id -> Uuid,
        exchange_offer_id -> Uuid,
        customer_id -> Uuid,
        game_id -> Uuid,
        price_cents -> Nullable<Int8>,
        description -> Text,
        /// `pending`, `accepted` or `rejected`.
        status -> Varchar,
        created_at -> Timestamptz,
        /// Insertion order, assigned by the database.
        seq -> Int8,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        recipient_id -> Uuid,
        description -> Text,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(articles -> games (game_id));
diesel::joinable!(exchange_offers -> games (game_id));
diesel::joinable!(exchange_offers -> users (owner_id));
diesel::joinable!(customer_offers -> exchange_offers (exchange_offer_id));
diesel::joinable!(notifications -> users (recipient_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    games,
    articles,
    exchange_offers,
    customer_offers,
    notifications,
);
