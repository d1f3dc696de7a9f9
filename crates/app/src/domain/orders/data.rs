//! Orders Data

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    money::{Cents, MoneyError},
    orders::records::OrderStatus,
    users::records::UserUuid,
    validation::ValidationErrors,
};

pub const PRODUCT_NAME_MAX_LEN: usize = 255;

const ORDER_NUMBER_PREFIX: &str = "ORD-";
const ORDER_NUMBER_ENTROPY_LEN: usize = 8;

/// New Order Data, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_uuid: UserUuid,
    pub items: Vec<NewOrderItem>,
}

/// New Order Item Data, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// A validated order ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub user_uuid: UserUuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub total_amount: Cents,
    pub lines: Vec<OrderLine>,
}

/// A priced order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Cents,
    pub total_price: Cents,
}

impl NewOrder {
    /// Check every item and price the order.
    ///
    /// # Errors
    ///
    /// Returns every rejected field, addressed as `order_items[i].field`.
    pub fn validate(self) -> Result<OrderDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.items.is_empty() {
            errors.add("order_items", "must contain at least one item");
        }

        let mut lines = Vec::with_capacity(self.items.len());

        for (index, item) in self.items.into_iter().enumerate() {
            if let Some(line) = price_line(&mut errors, index, item) {
                lines.push(line);
            }
        }

        let total_amount = lines
            .iter()
            .try_fold(Cents::ZERO, |total, line| total.checked_add(line.total_price))
            .filter(|total| total.to_i64().is_ok());

        let Some(total_amount) = total_amount else {
            errors.add("order_items", "total amount is too large");
            return Err(errors);
        };

        errors.finish(OrderDraft {
            user_uuid: self.user_uuid,
            order_number: generate_order_number(),
            status: OrderStatus::Pending,
            total_amount,
            lines,
        })
    }
}

fn price_line(errors: &mut ValidationErrors, index: usize, item: NewOrderItem) -> Option<OrderLine> {
    let field = |name: &str| format!("order_items[{index}].{name}");
    let before = errors.errors().len();

    errors.check_length(&field("product_name"), &item.product_name, 1, PRODUCT_NAME_MAX_LEN);

    let quantity = match i32::try_from(item.quantity) {
        _ if item.quantity < 1 => {
            errors.add(field("quantity"), "must be at least 1");
            None
        }
        Ok(quantity) => Some(quantity.unsigned_abs()),
        Err(_) => {
            errors.add(field("quantity"), "is too large");
            None
        }
    };

    let unit_price = match Cents::from_decimal(item.unit_price) {
        Ok(price) if price > Cents::ZERO => Some(price),
        Ok(_) | Err(MoneyError::Negative) => {
            errors.add(field("unit_price"), "must be greater than 0");
            None
        }
        Err(error) => {
            errors.add(field("unit_price"), error.to_string());
            None
        }
    };

    let (Some(quantity), Some(unit_price)) = (quantity, unit_price) else {
        return None;
    };

    let Some(total_price) = unit_price.checked_mul(quantity) else {
        errors.add(format!("order_items[{index}]"), "total price is too large");
        return None;
    };

    (errors.errors().len() == before).then_some(OrderLine {
        product_name: item.product_name,
        quantity,
        unit_price,
        total_price,
    })
}

/// `ORD-` followed by eight hex digits of a random UUID.
#[must_use]
pub fn generate_order_number() -> String {
    let entropy: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(ORDER_NUMBER_ENTROPY_LEN)
        .collect();

    format!("{ORDER_NUMBER_PREFIX}{entropy}")
}
