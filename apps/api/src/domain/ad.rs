use rust_decimal::Decimal;

/// Decimal places a stored price may carry
const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound of a stored price (`NUMERIC(12, 2)`)
const PRICE_LIMIT: i64 = 10_000_000_000;

/// Ad listing as read back from storage
///
/// Carries the author's username and the category name alongside the
/// foreign keys so a projection never needs a second lookup.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Ad {
    pub id: i64,
    pub name: String,
    pub author_id: i64,
    pub author_username: String,
    pub price: Decimal,
    pub description: String,
    pub is_published: bool,
    /// Path of the stored image relative to the media root
    pub image: Option<String>,
    pub category_id: i64,
    pub category_name: String,
}

/// Validated write model for creating or overwriting an ad
///
/// # Invariants
/// - Name is not blank
/// - Price is not negative, below 10^10 and has at most two decimals
///
/// The image is never part of this model; it is set through its own
/// upload operation and left untouched by updates.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAd {
    name: String,
    author_id: i64,
    category_id: i64,
    price: Decimal,
    description: String,
    is_published: bool,
}

impl NewAd {
    /// Creates a new ad write model
    ///
    /// # Returns
    /// * `Ok(NewAd)` - If all fields are valid
    /// * `Err(String)` - If any invariant is violated
    pub fn new(
        name: String,
        author_id: i64,
        category_id: i64,
        price: Decimal,
        description: String,
        is_published: bool,
    ) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Ad name cannot be empty".to_string());
        }

        if price < Decimal::ZERO {
            return Err("Price cannot be negative".to_string());
        }

        if price >= Decimal::new(PRICE_LIMIT, 0) {
            return Err(format!("Price must be less than {}", PRICE_LIMIT));
        }

        if price.normalize().scale() > PRICE_SCALE {
            return Err(format!(
                "Price cannot have more than {} decimal places",
                PRICE_SCALE
            ));
        }

        Ok(Self {
            name,
            author_id,
            category_id,
            price,
            description,
            is_published,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author_id(&self) -> i64 {
        self.author_id
    }

    pub fn category_id(&self) -> i64 {
        self.category_id
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }
}
