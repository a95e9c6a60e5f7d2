//! QR access token generation
//!
//! Issues the credential artifact attached to a booking at approval.
//! The token is opaque to the booking core: a base64 payload the mobile
//! client renders as a QR code and the station scans at the start of
//! the session.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::{Booking, CredentialIssuer, DomainResult};

/// Token prefix for identification
const TOKEN_PREFIX: &str = "txbk_";

/// Local token issuer. Binds the token to the booking's slot via a
/// salted SHA-256 digest so a scanned code can be checked offline
/// against the booking record.
pub struct QrTokenIssuer;

impl QrTokenIssuer {
    pub fn new() -> Self {
        Self
    }

    fn generate(&self, booking: &Booking) -> String {
        let mut rng = rand::thread_rng();
        let nonce: [u8; 16] = rng.gen();

        let mut hasher = Sha256::new();
        hasher.update(booking.id.as_bytes());
        hasher.update(booking.station_id.as_bytes());
        hasher.update(booking.date.to_string().as_bytes());
        hasher.update([booking.hour]);
        hasher.update(nonce);
        let digest = hex::encode(hasher.finalize());

        let payload = format!("{}|{}|{}", booking.id, hex::encode(nonce), digest);
        format!("{}{}", TOKEN_PREFIX, URL_SAFE_NO_PAD.encode(payload))
    }
}

impl Default for QrTokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialIssuer for QrTokenIssuer {
    async fn issue(&self, booking: &Booking) -> DomainResult<String> {
        Ok(self.generate(booking))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReservationHour;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn sample_booking() -> Booking {
        Booking::new(
            Uuid::new_v4(),
            "driver-1",
            "ST-001",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            ReservationHour::new(10).unwrap(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn token_carries_prefix_and_decodable_payload() {
        let issuer = QrTokenIssuer::new();
        let booking = sample_booking();

        let token = issuer.issue(&booking).await.unwrap();
        assert!(token.starts_with(TOKEN_PREFIX));

        let decoded = URL_SAFE_NO_PAD
            .decode(token.trim_start_matches(TOKEN_PREFIX))
            .unwrap();
        let payload = String::from_utf8(decoded).unwrap();
        assert!(payload.starts_with(&booking.id.to_string()));
        assert_eq!(payload.split('|').count(), 3);
    }

    #[tokio::test]
    async fn tokens_are_unique_per_issue() {
        let issuer = QrTokenIssuer::new();
        let booking = sample_booking();

        let a = issuer.issue(&booking).await.unwrap();
        let b = issuer.issue(&booking).await.unwrap();
        assert_ne!(a, b);
    }
}
