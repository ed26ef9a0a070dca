use crate::agenda::error::AgendaError;
use crate::agenda::presenter::{render, RenderedLine};
use crate::agenda::provider::CalendarProvider;
use crate::agenda::resolver::{CalendarResolver, Resolution};
use crate::agenda::window::{Clock, EventWindow, RealClock, MAX_RESULTS};
use crate::config::{self, Config};
use crate::google::calendar::client::GoogleCalendarClient;
use crate::google::oauth::{OAuth2Client, Token};
use chrono::{Local, TimeZone};
use std::fs;
use std::path::Path;

pub struct Galendar {
    config: Config,
    token: Option<Token>,
}

/// Everything one invocation prints.
#[derive(Debug)]
pub struct Agenda {
    pub query: String,
    pub resolution: Resolution,
    pub lines: Vec<RenderedLine>,
}

impl Agenda {
    /// Set when the calendar shown is not the one literally asked for.
    pub fn notice(&self) -> Option<String> {
        match &self.resolution {
            Resolution::Fuzzy(id) => Some(format!(
                "No exact match for {}, but found {}",
                self.query, id
            )),
            _ => None,
        }
    }
}

pub async fn fetch_agenda<P, C, TZ>(
    provider: &P,
    clock: &C,
    tz: &TZ,
    query: &str,
) -> anyhow::Result<Agenda>
where
    P: CalendarProvider + ?Sized,
    C: Clock,
    TZ: TimeZone,
{
    let resolution = if query.is_empty() {
        Resolution::Primary
    } else {
        let known_ids = provider.calendar_ids().await?;
        let resolver: CalendarResolver = CalendarResolver::default();
        resolver.resolve(query, &known_ids)
    };

    if resolution == Resolution::NoMatch {
        return Err(AgendaError::NoMatchingCalendar(query.to_string()).into());
    }

    let calendar_id = resolution.calendar_id();
    tracing::info!(query, calendar_id, "resolved calendar");

    let window = EventWindow::from_clock(clock, tz);
    let events = provider
        .upcoming_events(
            calendar_id,
            &window.since_rfc3339(),
            &window.until_rfc3339(),
            MAX_RESULTS,
        )
        .await?;

    let lines = render(calendar_id, &events, &window.since);

    Ok(Agenda {
        query: query.to_string(),
        resolution,
        lines,
    })
}

impl Galendar {
    pub fn new() -> anyhow::Result<Self> {
        let config = config::init()?;
        Ok(Self {
            config,
            token: None,
        })
    }

    fn oauth2_client(&self) -> anyhow::Result<OAuth2Client> {
        let oauth2 = &self.config.source.google.oauth2;
        OAuth2Client::new(
            &oauth2.client_id,
            &oauth2.client_secret,
            &oauth2.redirect_url,
            &oauth2.scopes,
        )
    }

    pub async fn oauth(&mut self) -> anyhow::Result<()> {
        let oauth2_client = self.oauth2_client()?;

        let token = match fs::read_to_string(&self.config.settings.oauth_file_path) {
            Ok(content) => {
                let stored = serde_json::from_str::<Token>(&content)?;

                if stored.is_expired() {
                    tracing::debug!("stored token expired");
                    if let Some(ref refresh) = stored.refresh_token {
                        let refreshed = oauth2_client
                            .refresh_token(refresh.clone())
                            .await?
                            .keep_refresh_token(&stored);
                        self.save_token(&refreshed)?;
                        refreshed
                    } else {
                        let token = oauth2_client.oauth_flow().await?;
                        self.save_token(&token)?;
                        token
                    }
                } else {
                    stored
                }
            }
            Err(_) => {
                tracing::debug!(
                    path = %self.config.settings.oauth_file_path,
                    "no stored token, starting browser flow"
                );
                let new_token = oauth2_client.oauth_flow().await?;
                self.save_token(&new_token)?;
                new_token
            }
        };

        self.token = Some(token);

        Ok(())
    }

    pub async fn agenda(&self, query: &str) -> anyhow::Result<Agenda> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("not authenticated"))?;
        let client = GoogleCalendarClient::new(token.access_token.clone());

        match self.config.settings.tz {
            Some(tz) => fetch_agenda(&client, &RealClock, &tz, query).await,
            None => fetch_agenda(&client, &RealClock, &Local, query).await,
        }
    }

    fn save_token(&self, token: &Token) -> anyhow::Result<()> {
        let path = Path::new(&self.config.settings.oauth_file_path);
        let text = serde_json::to_string_pretty(&token)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, text)?;
        tracing::info!(path = %path.display(), "saved credential file");
        Ok(())
    }
}
