use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Checks webhook bodies against the channel secret.
///
/// The platform signs the raw request body with HMAC-SHA256 keyed by the
/// channel secret and sends the base64-encoded digest in
/// [`SIGNATURE_HEADER`].
pub struct SignatureVerifier {
    channel_secret: String,
}

impl SignatureVerifier {
    pub fn new(channel_secret: impl Into<String>) -> Self {
        Self {
            channel_secret: channel_secret.into(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length, including empty.
        HmacSha256::new_from_slice(self.channel_secret.as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC key length is unrestricted"))
    }

    /// Base64 signature for `body`, as the platform would compute it.
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.mac();
        mac.update(body);
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Constant-time check of `signature` against `body`.
    pub fn verify(&self, body: &[u8], signature: &str) -> bool {
        let Ok(expected) = STANDARD.decode(signature.trim()) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(body);
        mac.verify_slice(&expected).is_ok()
    }
}
