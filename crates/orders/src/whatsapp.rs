//! WhatsApp order hand-off: message formatting and the deep-link relay.

use velora_cart::CartItem;
use velora_core::BackendError;

/// Contact details rendered into the order message. All fields optional;
/// missing ones fall back to placeholder text.
#[derive(Debug, Clone, Default)]
pub struct Customer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn format_usd(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Render the plain-text order summary sent to the merchant.
pub fn format_order_message(items: &[CartItem], customer: &Customer, order_id: &str) -> String {
    let items_list = items
        .iter()
        .map(|item| {
            format!(
                "• {} - Qty: {} - Price: {}",
                item.name,
                item.quantity,
                format_usd(item.unit_price_cents)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let total_cents: u64 = items.iter().map(CartItem::line_total_cents).sum();

    format!(
        "🛒 *New Order Request*\n\n\
         *Customer:* {}\n\
         *Phone:* {}\n\
         *Email:* {}\n\n\
         *Order Items:*\n\
         {}\n\n\
         *Total Amount:* {}\n\n\
         *Order ID:* {}\n\n\
         Please contact the customer to complete the order.",
        customer.name.as_deref().unwrap_or("Guest"),
        customer.phone.as_deref().unwrap_or("Not provided"),
        customer.email.as_deref().unwrap_or("Not provided"),
        items_list,
        format_usd(total_cents),
        order_id,
    )
}

/// Build the `wa.me` deep link carrying the percent-encoded message.
pub fn wa_link(number: &str, message: &str) -> String {
    format!("https://wa.me/{}?text={}", number, urlencoding::encode(message))
}

/// Hands a prepared deep link to the user's messaging channel.
///
/// Delivery is one-way: a successful hand-off says nothing about whether
/// the merchant ever received or read the message.
pub trait MessageRelay: Send + Sync {
    fn deliver(&self, url: &str) -> Result<(), BackendError>;
}

/// Relay that surfaces the deep link through the log. The hosting UI is
/// expected to watch for it and open the URL.
#[derive(Debug, Default)]
pub struct LoggedRelay;

impl MessageRelay for LoggedRelay {
    fn deliver(&self, url: &str) -> Result<(), BackendError> {
        tracing::info!(target: "velora::whatsapp", %url, "order hand-off link ready");
        Ok(())
    }
}
