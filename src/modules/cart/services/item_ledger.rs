use rust_decimal::Decimal;

use crate::core::{AppError, Currency, Money, Result};
use crate::modules::cart::models::{LineItem, NewItem};

/// Ordered list of line items with an incrementally maintained total.
///
/// The total always equals Σ quantity × unit_price over `items()`. It is updated
/// in the same call that appends, and a rejected add leaves both untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemLedger {
    items: Vec<LineItem>,
    currency: Currency,
    total: Decimal,
}

impl ItemLedger {
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
            total: Decimal::ZERO,
        }
    }

    /// Currency for items added from now on
    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Add a single item
    pub fn add_item(&mut self, item: NewItem) -> Result<&mut Self> {
        self.add_items(std::iter::once(item))
    }

    /// Add a batch of items in order. Every item is validated before any is
    /// appended.
    pub fn add_items<I>(&mut self, items: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = NewItem>,
    {
        let validated = items
            .into_iter()
            .map(|item| LineItem::new(item, self.currency))
            .collect::<Result<Vec<_>>>()?;

        let total = validated
            .iter()
            .try_fold(self.total, |acc, item| acc.checked_add(item.subtotal()))
            .ok_or_else(|| AppError::invalid_item("Cart total exceeds the representable range"))?;

        self.items.extend(validated);
        self.total = total;

        Ok(self)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Total labelled with the ledger's current currency
    pub fn money(&self) -> Money {
        Money::new(self.total, self.currency)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
