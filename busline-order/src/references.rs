use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// `<prefix><unix millis><9 random uppercase alphanumerics>`
fn reference(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("{}{}{}", prefix, Utc::now().timestamp_millis(), suffix.to_uppercase())
}

pub fn generate_booking_id() -> String {
    reference("BK")
}

pub fn generate_payment_id() -> String {
    reference("PAY")
}
