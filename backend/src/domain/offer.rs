//! Offer ledger entities: listings (exchange offers) and counter-offers.
//!
//! A listing is `Open` until its owner accepts a counter-offer, after which it
//! is `Closed` for good. Counter-offers start `Pending` and are resolved
//! exactly once, to `Accepted` or `Rejected`, by the acceptance workflow.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::catalogue::GameId;
use super::identifier::define_uuid_id;
use super::user::UserId;

define_uuid_id! {
    /// Identifier of a listing.
    pub struct ExchangeOfferId;
}

define_uuid_id! {
    /// Identifier of a counter-offer.
    pub struct CustomerOfferId;
}

/// Maximum number of significant digits in a price.
pub const PRICE_MAX_DIGITS: u32 = 10;
/// Number of fractional digits in a price.
pub const PRICE_DECIMAL_PLACES: u32 = 2;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 2_000;

/// Validation errors for offer values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfferValidationError {
    #[error("price must be a decimal number")]
    MalformedPrice,
    #[error("price must not be negative")]
    NegativePrice,
    #[error("price must have at most 2 decimal places")]
    PriceTooPrecise,
    #[error("price must have at most 10 digits")]
    PriceTooLarge,
    #[error("{offer_type} listings require a price")]
    PriceRequired { offer_type: OfferType },
    #[error("offer type must be one of sell, exchange or buy")]
    UnknownOfferType,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
}

/// What the listing owner wants to do with the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferType {
    Sell,
    Exchange,
    Buy,
}

impl OfferType {
    /// Human-readable label used in notifications.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sell => "Sell",
            Self::Exchange => "Exchange",
            Self::Buy => "Buy",
        }
    }

    /// Stable lowercase code used on the wire and in storage.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sell => "sell",
            Self::Exchange => "exchange",
            Self::Buy => "buy",
        }
    }

    /// Whether listings of this type must state a price.
    #[must_use]
    pub const fn requires_price(self) -> bool {
        matches!(self, Self::Sell | Self::Buy)
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OfferType {
    type Err = OfferValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sell" | "s" => Ok(Self::Sell),
            "exchange" | "e" => Ok(Self::Exchange),
            "buy" | "b" => Ok(Self::Buy),
            _ => Err(OfferValidationError::UnknownOfferType),
        }
    }
}

/// Non-negative fixed-point price with two decimal places.
///
/// # Examples
/// ```
/// use gameconnect::domain::Price;
///
/// let price: Price = "19.9".parse().unwrap();
/// assert_eq!(price.cents(), 1990);
/// assert_eq!(price.to_string(), "19.90");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Price {
    amount: Decimal,
    cents: i64,
}

impl Price {
    /// Validate a decimal amount.
    pub fn new(value: Decimal) -> Result<Self, OfferValidationError> {
        if value < Decimal::ZERO {
            return Err(OfferValidationError::NegativePrice);
        }
        if value.normalize().scale() > PRICE_DECIMAL_PLACES {
            return Err(OfferValidationError::PriceTooPrecise);
        }
        let mut amount = value;
        amount.rescale(PRICE_DECIMAL_PLACES);
        let cents =
            i64::try_from(amount.mantissa()).map_err(|_| OfferValidationError::PriceTooLarge)?;
        if cents >= 10_i64.pow(PRICE_MAX_DIGITS) {
            return Err(OfferValidationError::PriceTooLarge);
        }
        Ok(Self { amount, cents })
    }

    /// Rebuild a price from its stored cent value.
    pub fn from_cents(cents: i64) -> Result<Self, OfferValidationError> {
        Self::new(Decimal::new(cents, PRICE_DECIMAL_PLACES))
    }

    /// Amount in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Amount as a decimal with two fractional digits.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount)
    }
}

impl FromStr for Price {
    type Err = OfferValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| OfferValidationError::MalformedPrice)?;
        Self::new(value)
    }
}

/// Free-text description attached to listings and counter-offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferDescription(String);

impl OfferDescription {
    /// Validate and construct a description.
    pub fn new(raw: impl Into<String>) -> Result<Self, OfferValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(OfferValidationError::EmptyDescription);
        }
        if trimmed.chars().count() > DESCRIPTION_MAX {
            return Err(OfferValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the description.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Listing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    Open,
    Closed,
}

impl ListingStatus {
    /// Map the persisted open flag.
    #[must_use]
    pub const fn from_open_flag(is_open: bool) -> Self {
        if is_open { Self::Open } else { Self::Closed }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Counter-offer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOfferStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Raised when a lifecycle transition would break monotonicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("counter-offer is already {from:?}")]
pub struct TransitionError {
    pub from: CounterOfferStatus,
}

impl CounterOfferStatus {
    /// Resolve a pending counter-offer.
    pub const fn resolve(self, accepted: bool) -> Result<Self, TransitionError> {
        match self {
            Self::Pending if accepted => Ok(Self::Accepted),
            Self::Pending => Ok(Self::Rejected),
            other => Err(TransitionError { from: other }),
        }
    }

    /// Stable lowercase code used on the wire and in storage.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for CounterOfferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown counter-offer status {other:?}")),
        }
    }
}

/// Listing created by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOffer {
    pub id: ExchangeOfferId,
    pub owner_id: UserId,
    pub offer_type: OfferType,
    pub game_id: GameId,
    pub price: Option<Price>,
    pub description: OfferDescription,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for a new listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub offer_type: OfferType,
    pub game_id: GameId,
    pub price: Option<Price>,
    pub description: OfferDescription,
}

impl ListingDraft {
    /// Check the per-type price rule.
    pub fn new(
        offer_type: OfferType,
        game_id: GameId,
        price: Option<Price>,
        description: OfferDescription,
    ) -> Result<Self, OfferValidationError> {
        if offer_type.requires_price() && price.is_none() {
            return Err(OfferValidationError::PriceRequired { offer_type });
        }
        Ok(Self {
            offer_type,
            game_id,
            price,
            description,
        })
    }
}

impl ExchangeOffer {
    /// Open a new listing owned by `owner_id`.
    #[must_use]
    pub fn open(owner_id: UserId, draft: ListingDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: ExchangeOfferId::random(),
            owner_id,
            offer_type: draft.offer_type,
            game_id: draft.game_id,
            price: draft.price,
            description: draft.description,
            status: ListingStatus::Open,
            created_at: now,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }
}

/// Counter-offer submitted against a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerOffer {
    pub id: CustomerOfferId,
    pub exchange_offer_id: ExchangeOfferId,
    pub customer_id: UserId,
    pub game_id: GameId,
    pub price: Option<Price>,
    pub description: OfferDescription,
    pub status: CounterOfferStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for a new counter-offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterOfferDraft {
    pub game_id: GameId,
    pub price: Option<Price>,
    pub description: OfferDescription,
}

impl CustomerOffer {
    /// Create a pending counter-offer against `listing`.
    #[must_use]
    pub fn pending(
        listing: ExchangeOfferId,
        customer_id: UserId,
        draft: CounterOfferDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CustomerOfferId::random(),
            exchange_offer_id: listing,
            customer_id,
            game_id: draft.game_id,
            price: draft.price,
            description: draft.description,
            status: CounterOfferStatus::Pending,
            created_at: now,
        }
    }
}
