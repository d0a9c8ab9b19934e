//! Invoice number generation.
//!
//! Format: `INV-<unix_millis>-<4-digit-random>`. Not unique by construction;
//! the creation flow retries once on a uniqueness violation from the store.

use chrono::Utc;
use rand::Rng;

/// Generates a candidate invoice number.
#[must_use]
pub fn generate_invoice_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let rand: u16 = rand::rng().random_range(1000..=9999);
    format!("INV-{millis}-{rand}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let number = generate_invoice_number();
        let parts: Vec<&str> = number.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "INV");
        assert!(parts[1].parse::<i64>().unwrap() > 0);

        let suffix: u16 = parts[2].parse().unwrap();
        assert!((1000..=9999).contains(&suffix));
        assert_eq!(parts[2].len(), 4);
    }

    #[test]
    fn test_consecutive_candidates_are_usually_distinct() {
        // Timestamp + random makes collisions possible but vanishingly rare;
        // two back-to-back candidates should differ.
        let a = generate_invoice_number();
        let b = generate_invoice_number();
        assert_ne!(a, b);
    }
}
