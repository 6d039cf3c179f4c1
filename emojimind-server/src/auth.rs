use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_JWKS_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/certs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleIdClaims {
    pub aud: String,           // Audience (our client id)
    pub iss: String,           // Issuer
    pub exp: u64,              // Expiry
    pub sub: String,           // Google account id
    pub email: Option<String>, // User email - absent without the email scope
    pub name: Option<String>,  // Display name - optional
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwksKey {
    pub kty: String,
    pub kid: String,
    pub alg: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwksResponse {
    pub keys: Vec<JwksKey>,
}

/// The identity extracted from a validated ID token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthProfile {
    pub email: String,
    pub display_name: String,
}

pub struct GoogleAuthService {
    client: Client,
    jwks_cache: Arc<RwLock<HashMap<String, (DecodingKey, SystemTime)>>>,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    dev_mode: bool,
}

impl GoogleAuthService {
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            client: Client::new(),
            jwks_cache: Arc::new(RwLock::new(HashMap::new())),
            client_id,
            client_secret,
            redirect_url,
            dev_mode: false,
        }
    }

    pub fn new_dev_mode() -> Self {
        Self {
            client: Client::new(),
            jwks_cache: Arc::new(RwLock::new(HashMap::new())),
            client_id: "dev".to_string(),
            client_secret: "dev".to_string(),
            redirect_url: "http://localhost:8080/auth/callback".to_string(),
            dev_mode: true,
        }
    }

    /// The Google consent URL to redirect a login to.
    pub fn authorize_url(&self, state: &str) -> String {
        let url = reqwest::Url::parse_with_params(
            GOOGLE_AUTH_ENDPOINT,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("access_type", "online"),
                ("state", state),
            ],
        )
        .expect("auth endpoint is a valid base URL");
        url.to_string()
    }

    /// Exchange an authorization code for the ID token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        #[derive(Deserialize)]
        struct TokenResponse {
            id_token: String,
        }

        let response = self
            .client
            .post(GOOGLE_TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Token exchange request failed: {:?}", e);
                AuthError::TokenExchangeFailed
            })?;

        if !response.status().is_success() {
            tracing::warn!("Token exchange returned status: {}", response.status());
            return Err(AuthError::TokenExchangeFailed);
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            tracing::warn!("Failed to parse token response: {:?}", e);
            AuthError::TokenExchangeFailed
        })?;

        Ok(token.id_token)
    }

    /// Validate a Google ID token and extract the signed-in profile.
    pub async fn validate_id_token(&self, token: &str) -> Result<AuthProfile, AuthError> {
        if self.dev_mode {
            return self.validate_dev_token(token);
        }

        // Decode header to get key ID
        let header = decode_header(token).map_err(|e| {
            tracing::warn!("Failed to decode JWT header: {:?}", e);
            AuthError::InvalidToken
        })?;
        let kid = header.kid.ok_or_else(|| {
            tracing::warn!("JWT header missing 'kid' field");
            AuthError::InvalidToken
        })?;

        tracing::debug!("Fetching decoding key for kid: {}", kid);
        let decoding_key = self.get_decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(&["https://accounts.google.com", "accounts.google.com"]);

        let token_data =
            decode::<GoogleIdClaims>(token, &decoding_key, &validation).map_err(|e| {
                tracing::warn!("ID token validation failed: {:?}", e);
                AuthError::InvalidToken
            })?;

        let claims = token_data.claims;
        tracing::debug!("Token claims - aud: {}, iss: {}, sub: {}", claims.aud, claims.iss, claims.sub);

        // Verify token is not expired
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        if claims.exp < now {
            tracing::warn!("Token expired: exp={}, now={}", claims.exp, now);
            return Err(AuthError::TokenExpired);
        }

        Self::profile_from_claims(claims)
    }

    fn profile_from_claims(claims: GoogleIdClaims) -> Result<AuthProfile, AuthError> {
        // Accounts are keyed by email; a token without one is unusable.
        let email = claims.email.ok_or(AuthError::MissingEmail)?;
        let display_name = claims.name.unwrap_or_else(|| email.clone());
        Ok(AuthProfile {
            email,
            display_name,
        })
    }

    async fn get_decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        // Check cache first
        {
            let cache = self.jwks_cache.read().await;
            if let Some((key, cached_time)) = cache.get(kid) {
                // Cache for 1 hour
                let elapsed = cached_time.elapsed().unwrap_or(Duration::from_secs(3600));
                if elapsed < Duration::from_secs(3600) {
                    tracing::debug!("Using cached decoding key for kid '{}'", kid);
                    return Ok(key.clone());
                }
                tracing::debug!("Cached key for kid '{}' is expired, fetching fresh", kid);
            }
        }

        let response = self
            .client
            .get(GOOGLE_JWKS_ENDPOINT)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to fetch JWKS: {:?}", e);
                AuthError::JwksFetchError
            })?;

        if !response.status().is_success() {
            tracing::warn!("JWKS fetch returned status: {}", response.status());
            return Err(AuthError::JwksFetchError);
        }

        let jwks: JwksResponse = response.json().await.map_err(|e| {
            tracing::warn!("Failed to parse JWKS JSON: {:?}", e);
            AuthError::JwksFetchError
        })?;

        let jwks_key = jwks.keys.iter().find(|key| key.kid == kid).ok_or_else(|| {
            tracing::warn!("Key with kid '{}' not found in JWKS; key may have rotated", kid);
            AuthError::KeyNotFound
        })?;

        let (Some(n), Some(e)) = (&jwks_key.n, &jwks_key.e) else {
            tracing::warn!("JWKS key '{}' is missing RSA components", kid);
            return Err(AuthError::InvalidKey);
        };
        let decoding_key = DecodingKey::from_rsa_components(n, e).map_err(|e| {
            tracing::warn!("Failed to create decoding key from RSA components: {:?}", e);
            AuthError::InvalidKey
        })?;

        // Cache the key
        {
            let mut cache = self.jwks_cache.write().await;
            cache.insert(kid.to_string(), (decoding_key.clone(), SystemTime::now()));
        }

        Ok(decoding_key)
    }

    fn validate_dev_token(&self, token: &str) -> Result<AuthProfile, AuthError> {
        // Dev mode skips signature validation. Accepts a JWT whose payload
        // is decoded unverified, a bare JSON object, or "email:name".
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() == 3 {
            let payload_b64 = parts[1];

            // Re-pad and convert URL-safe base64 back to standard
            let padded = match payload_b64.len() % 4 {
                0 => payload_b64.to_string(),
                n => format!("{}{}", payload_b64, "=".repeat(4 - n)),
            };
            let standard = padded.replace('-', "+").replace('_', "/");

            let payload_bytes = base64::engine::general_purpose::STANDARD
                .decode(standard)
                .map_err(|e| {
                    tracing::warn!("Failed to decode JWT payload in dev mode: {:?}", e);
                    AuthError::InvalidToken
                })?;

            let claims: GoogleIdClaims = serde_json::from_slice(&payload_bytes).map_err(|e| {
                tracing::warn!("Failed to parse JWT claims in dev mode: {:?}", e);
                AuthError::InvalidToken
            })?;

            return Self::profile_from_claims(claims);
        }

        if token.starts_with('{') && token.ends_with('}') {
            #[derive(Deserialize)]
            struct DevClaims {
                email: String,
                name: String,
            }

            let claims: DevClaims =
                serde_json::from_str(token).map_err(|_| AuthError::InvalidToken)?;
            return Ok(AuthProfile {
                email: claims.email,
                display_name: claims.name,
            });
        }

        // Simple string format: "email:name"
        match token.split_once(':') {
            Some((email, name)) if !email.is_empty() && !name.is_empty() => Ok(AuthProfile {
                email: email.to_string(),
                display_name: name.to_string(),
            }),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Failed to fetch JWKS")]
    JwksFetchError,
    #[error("Key not found")]
    KeyNotFound,
    #[error("Invalid key")]
    InvalidKey,
    #[error("Token exchange failed")]
    TokenExchangeFailed,
    #[error("Token carries no email claim")]
    MissingEmail,
    #[error("Unknown login state")]
    UnknownLoginState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev_service() -> GoogleAuthService {
        GoogleAuthService::new_dev_mode()
    }

    #[test]
    fn test_authorize_url_carries_client_and_state() {
        let service = GoogleAuthService::new(
            "client-123".to_string(),
            "secret".to_string(),
            "http://localhost:8080/auth/callback".to_string(),
        );

        let url = service.authorize_url("state-abc");
        assert!(url.starts_with(GOOGLE_AUTH_ENDPOINT));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("state=state-abc"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid+email+profile"));
    }

    #[tokio::test]
    async fn test_dev_token_simple_format() {
        let profile = dev_service()
            .validate_id_token("alice@example.com:Alice")
            .await
            .unwrap();
        assert_eq!(profile.email, "alice@example.com");
        assert_eq!(profile.display_name, "Alice");
    }

    #[tokio::test]
    async fn test_dev_token_json_format() {
        let profile = dev_service()
            .validate_id_token(r#"{"email":"bob@example.com","name":"Bob"}"#)
            .await
            .unwrap();
        assert_eq!(profile.email, "bob@example.com");
        assert_eq!(profile.display_name, "Bob");
    }

    #[tokio::test]
    async fn test_dev_token_invalid_format() {
        let result = dev_service().validate_id_token("nonsense").await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_real_mode_rejects_malformed_token() {
        let service = GoogleAuthService::new(
            "client".to_string(),
            "secret".to_string(),
            "http://localhost/auth/callback".to_string(),
        );
        let result = service.validate_id_token("not-a-jwt").await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken));
    }

    #[test]
    fn test_profile_requires_email() {
        let claims = GoogleIdClaims {
            aud: "client".to_string(),
            iss: "https://accounts.google.com".to_string(),
            exp: u64::MAX,
            sub: "12345".to_string(),
            email: None,
            name: Some("No Email".to_string()),
        };
        assert!(matches!(
            GoogleAuthService::profile_from_claims(claims).unwrap_err(),
            AuthError::MissingEmail
        ));
    }

    #[test]
    fn test_profile_falls_back_to_email_for_name() {
        let claims = GoogleIdClaims {
            aud: "client".to_string(),
            iss: "https://accounts.google.com".to_string(),
            exp: u64::MAX,
            sub: "12345".to_string(),
            email: Some("carol@example.com".to_string()),
            name: None,
        };
        let profile = GoogleAuthService::profile_from_claims(claims).unwrap();
        assert_eq!(profile.display_name, "carol@example.com");
    }
}
