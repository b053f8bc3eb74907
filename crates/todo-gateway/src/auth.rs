//! Bearer token authorization
//!
//! Tokens are RS256 JWTs verified against a signing certificate. The
//! certificate shipped in `certs/signing-cert.pem` is compiled into the binary
//! and can be replaced at runtime through `jwt_certificate_path`.

use crate::config::GatewayConfig;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

/// Signing certificate embedded at build time
pub const EMBEDDED_CERTIFICATE: &str = include_str!("../certs/signing-cert.pem");

/// IAM policy language version used in policy documents
pub const POLICY_VERSION: &str = "2012-10-17";

/// Action granted or denied by the authorizer
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Resource covered by authorizer policies
pub const ANY_RESOURCE: &str = "*";

/// Principal reported on a deny decision
pub const DENIED_PRINCIPAL: &str = "user";

/// Authorization failures
#[derive(Error, Debug)]
pub enum AuthError {
    /// Header absent, empty, or not `Bearer <token>`
    #[error("invalid authorization header")]
    InvalidHeader,

    /// Signature, expiry or claim check failed
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The signing certificate could not be loaded
    #[error("invalid signing certificate: {0}")]
    Certificate(String),
}

/// Claims as they appear in the token payload
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    iss: Option<String>,
}

/// Claims of a token whose signature and expiry have been checked.
///
/// Only [`Authorizer::verify`] creates these.
#[derive(Clone, Debug)]
pub struct VerifiedClaims {
    subject: String,
    expires_at: DateTime<Utc>,
    issued_at: Option<DateTime<Utc>>,
    issuer: Option<String>,
}

impl VerifiedClaims {
    fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        if claims.sub.is_empty() {
            return Err(AuthError::Unauthorized("empty subject".to_string()));
        }
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AuthError::Unauthorized("exp out of range".to_string()))?;

        Ok(Self {
            subject: claims.sub,
            expires_at,
            issued_at: claims.iat.and_then(|iat| DateTime::from_timestamp(iat, 0)),
            issuer: claims.iss,
        })
    }

    /// Subject (owner identifier)
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }

    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }
}

const BEARER_SCHEME: &str = "bearer ";

/// Extract bearer token from Authorization header.
///
/// The scheme is matched case-insensitively and must be followed by exactly
/// one space; the token ends at the next space.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let scheme = auth_header.get(..BEARER_SCHEME.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }

    auth_header[BEARER_SCHEME.len()..]
        .split(' ')
        .next()
        .filter(|token| !token.is_empty())
}

/// Verifies bearer tokens and turns them into access decisions
pub struct Authorizer {
    key: DecodingKey,
    validation: Validation,
}

impl Authorizer {
    /// Authorizer using the embedded signing certificate
    pub fn embedded() -> Result<Self, AuthError> {
        Self::from_pem(EMBEDDED_CERTIFICATE.as_bytes())
    }

    /// Authorizer using a PEM certificate or public key
    pub fn from_pem(pem: &[u8]) -> Result<Self, AuthError> {
        let key =
            DecodingKey::from_rsa_pem(pem).map_err(|e| AuthError::Certificate(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self { key, validation })
    }

    /// Build from configuration: certificate override, issuer and audience
    pub fn from_config(config: &GatewayConfig) -> Result<Self, AuthError> {
        let mut authorizer = match &config.jwt_certificate_path {
            Some(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    AuthError::Certificate(format!("{}: {}", path.display(), e))
                })?;
                Self::from_pem(&pem)?
            }
            None => Self::embedded()?,
        };

        if let Some(issuer) = &config.jwt_issuer {
            authorizer = authorizer.with_issuer(issuer);
        }
        if let Some(audience) = &config.jwt_audience {
            authorizer = authorizer.with_audience(audience);
        }
        Ok(authorizer)
    }

    /// Require a specific `iss` claim
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    /// Require a specific `aud` claim
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }

    /// Validate an Authorization header value and extract its claims
    pub fn verify(&self, auth_header: &str) -> Result<VerifiedClaims, AuthError> {
        let token = extract_bearer_token(auth_header).ok_or(AuthError::InvalidHeader)?;

        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::Unauthorized(e.to_string()))?;

        VerifiedClaims::from_claims(data.claims)
    }

    /// [`verify`](Self::verify) with the authorization audit trail: every
    /// attempt is logged at info, every failure at error.
    pub fn authenticate(&self, auth_header: &str) -> Result<VerifiedClaims, AuthError> {
        info!("Authorizing a user");

        match self.verify(auth_header) {
            Ok(claims) => {
                info!(principal = claims.subject(), "User was authorized");
                Ok(claims)
            }
            Err(e) => {
                error!(error = %e, "User not authorized");
                Err(e)
            }
        }
    }

    /// Produce an allow/deny decision for an Authorization header value.
    ///
    /// The reason for a deny is logged, never returned.
    pub fn authorize(&self, auth_header: &str, resource: &str) -> AccessDecision {
        match self.authenticate(auth_header) {
            Ok(claims) => AccessDecision::allow(claims.subject(), resource),
            Err(_) => AccessDecision::deny(resource),
        }
    }
}

/// Allow or deny
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// One IAM policy statement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

/// IAM policy attached to an access decision
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

/// Authorizer output: who the caller is and what they may invoke
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

impl AccessDecision {
    /// Grant invocation to a principal
    pub fn allow(principal_id: impl Into<String>, resource: &str) -> Self {
        Self::new(principal_id.into(), Effect::Allow, resource)
    }

    /// Deny invocation under the generic principal
    pub fn deny(resource: &str) -> Self {
        Self::new(DENIED_PRINCIPAL.to_string(), Effect::Deny, resource)
    }

    fn new(principal_id: String, effect: Effect, resource: &str) -> Self {
        Self {
            principal_id,
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![PolicyStatement {
                    action: INVOKE_ACTION.to_string(),
                    effect,
                    resource: resource.to_string(),
                }],
            },
        }
    }

    /// Effect of the (single) statement
    pub fn effect(&self) -> Effect {
        self.policy_document
            .statement
            .first()
            .map(|s| s.effect)
            .unwrap_or(Effect::Deny)
    }

    pub fn is_allowed(&self) -> bool {
        self.effect() == Effect::Allow
    }
}

/// API Gateway TOKEN authorizer event
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAuthorizerEvent {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub authorization_token: Option<String>,
    #[serde(default)]
    pub method_arn: Option<String>,
}

/// Answer a TOKEN authorizer invocation
pub fn handle_authorizer_event(
    authorizer: &Authorizer,
    event: TokenAuthorizerEvent,
) -> AccessDecision {
    let span = tracing::info_span!(
        "authorizer",
        method_arn = event.method_arn.as_deref().unwrap_or_default()
    );
    let _enter = span.enter();

    authorizer.authorize(
        event.authorization_token.as_deref().unwrap_or_default(),
        ANY_RESOURCE,
    )
}
