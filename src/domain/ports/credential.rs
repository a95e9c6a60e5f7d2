//! Credential issuance port
//!
//! Approval attaches an access-credential artifact (a QR token) to the
//! booking. Generation is an external concern behind this port; the
//! booking core only stores the returned opaque string.

use async_trait::async_trait;

use super::super::booking::Booking;
use super::super::repositories::DomainResult;

#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Produce an access token for an approved booking.
    async fn issue(&self, booking: &Booking) -> DomainResult<String>;
}
