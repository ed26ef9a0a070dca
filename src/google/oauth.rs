use oauth2::{
    basic::{
        BasicClient, BasicErrorResponse, BasicRevocationErrorResponse,
        BasicTokenIntrospectionResponse, BasicTokenResponse,
    },
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, RedirectUrl, Scope, StandardRevocableToken, TokenResponse, TokenUrl,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v3/token";

type GoogleClient = oauth2::Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,    // Auth URL
    EndpointNotSet, // Device auth
    EndpointNotSet, // Introspection
    EndpointNotSet, // Revocation
    EndpointSet,    // Token URL
>;

pub struct OAuth2Client {
    client: GoogleClient,
    redirect_url: String,
    scopes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

impl Token {
    pub fn from_token_response(response: &BasicTokenResponse) -> Self {
        let expires_at = response
            .expires_in()
            .map(|duration| unix_now() + duration.as_secs() as i64);

        Token {
            access_token: response.access_token().secret().clone(),
            refresh_token: response.refresh_token().map(|r| r.secret().clone()),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| exp <= unix_now())
    }

    /// Google leaves the refresh token out of refresh responses, so the one
    /// already stored is carried over.
    pub fn keep_refresh_token(mut self, previous: &Token) -> Self {
        if self.refresh_token.is_none() {
            self.refresh_token = previous.refresh_token.clone();
        }
        self
    }
}

impl OAuth2Client {
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_url: &str,
        scopes: &[String],
    ) -> anyhow::Result<Self> {
        let client = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_auth_uri(AuthUrl::new(AUTH_URL.to_string())?)
            .set_token_uri(TokenUrl::new(TOKEN_URL.to_string())?)
            .set_redirect_uri(RedirectUrl::new(redirect_url.to_string())?);

        Ok(Self {
            client,
            redirect_url: redirect_url.to_string(),
            scopes: scopes.to_vec(),
        })
    }

    pub async fn oauth_flow(&self) -> anyhow::Result<Token> {
        let http_client = reqwest::Client::new();

        let (pkce_code_challenge, pkce_code_verifier) = PkceCodeChallenge::new_random_sha256();

        let (authorize_url, csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "offline")
            .set_pkce_challenge(pkce_code_challenge)
            .url();

        let redirect_url_host = self
            .redirect_url
            .strip_prefix("http://")
            .unwrap_or(&self.redirect_url)
            .trim_end_matches('/');

        let listener = tokio::net::TcpListener::bind(redirect_url_host).await?;
        if webbrowser::open(authorize_url.as_ref()).is_err() {
            eprintln!("Open the following link in your browser:\n{}", authorize_url);
        }

        let (mut stream, _) = listener.accept().await?;

        let mut reader = AsyncBufReader::new(&mut stream);
        let mut redirect_request_line = String::new();

        reader.read_line(&mut redirect_request_line).await?;

        let path = redirect_request_line
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| anyhow::anyhow!("malformed redirect request"))?;
        let redirect_url_and_path = Url::parse(&("http://localhost".to_string() + path))?;

        let state = redirect_url_and_path
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, state)| state.into_owned());
        if state.as_deref() != Some(csrf_state.secret().as_str()) {
            anyhow::bail!("state mismatch in OAuth redirect");
        }

        let code = redirect_url_and_path
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, code)| AuthorizationCode::new(code.into_owned()))
            .ok_or(anyhow::anyhow!("no code"))?;

        let message = "Go back to your terminal :)";
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-length: {}\r\n\r\n{}",
            message.len(),
            message
        );
        stream.write_all(response.as_bytes()).await?;

        let token_response = self
            .client
            .exchange_code(code)
            .set_pkce_verifier(pkce_code_verifier)
            .request_async(&http_client)
            .await?;

        Ok(Token::from_token_response(&token_response))
    }

    pub async fn refresh_token(&self, refresh_token: String) -> anyhow::Result<Token> {
        let refresh_token = oauth2::RefreshToken::new(refresh_token);
        let http_client = reqwest::Client::new();
        let token_response = self
            .client
            .exchange_refresh_token(&refresh_token)
            .request_async(&http_client)
            .await?;

        Ok(Token::from_token_response(&token_response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expiry() {
        let expired = Token {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: Some(unix_now() - 10),
        };
        let fresh = Token {
            expires_at: Some(unix_now() + 3600),
            ..expired.clone()
        };
        let unbounded = Token {
            expires_at: None,
            ..expired.clone()
        };

        assert!(expired.is_expired());
        assert!(!fresh.is_expired());
        assert!(!unbounded.is_expired());
    }

    #[test]
    fn test_refresh_keeps_stored_refresh_token() {
        let stored = Token {
            access_token: "old".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some(0),
        };
        let refreshed = Token {
            access_token: "new".to_string(),
            refresh_token: None,
            expires_at: Some(unix_now() + 3600),
        };

        let merged = refreshed.keep_refresh_token(&stored);

        assert_eq!(merged.access_token, "new");
        assert_eq!(merged.refresh_token.as_deref(), Some("refresh"));
    }

    #[test]
    fn test_client_rejects_invalid_redirect_url() {
        assert!(OAuth2Client::new("id", "secret", "not a url", &[]).is_err());
        assert!(OAuth2Client::new("id", "secret", "http://127.0.0.1:9004", &[]).is_ok());
    }
}
