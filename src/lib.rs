use std::{thread::sleep, time::Duration};

use colored::Colorize;
use serde::de::DeserializeOwned;

pub mod attendees;
pub mod groups;
pub mod membership;
pub mod report;

use groups::GroupDirectory;
use membership::Membership;

/// Environment variable holding the Meetup API key
pub const API_KEY_VAR: &str = "MEETUP_API_KEY";

const MEETUP_API_ROOT: &str = "https://api.meetup.com";

/// Numeric identifier of a Meetup member
pub type MemberId = u64;

#[derive(Debug, thiserror::Error)]
pub enum MeetupError {
    #[error("MEETUP_API_KEY not found")]
    MissingApiKey,

    #[error("Could not talk to Meetup: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Meetup answered with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Could not deserialize Meetup's response. Error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// How long we wait between calls to Meetup
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Pause before retrying a group lookup that returned garbage
    pub retry_backoff: Duration,
    /// Pause after every group lookup, to stay under the rate limit
    pub request_interval: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            retry_backoff: Duration::from_millis(500),
            request_interval: Duration::from_millis(400),
        }
    }
}

impl Pacing {
    /// No waiting at all. Only useful when Meetup is not on the other end.
    pub fn immediate() -> Self {
        Self {
            retry_backoff: Duration::ZERO,
            request_interval: Duration::ZERO,
        }
    }
}

pub struct Bootstrap {
    api_key: String,
    api_root: String,
    http: reqwest::blocking::Client,
}

impl Bootstrap {
    pub fn new() -> Result<Self, MeetupError> {
        println!(
            "{}",
            "I'm checking there is a Meetup API key in the MEETUP_API_KEY environment variable..."
                .yellow()
        );

        let bootstrap = Self::from_api_key(std::env::var(API_KEY_VAR).ok())?;
        println!(
            "{} {}...",
            "I have key:".green(),
            mask_key(&bootstrap.api_key).white()
        );

        Ok(bootstrap)
    }

    pub fn from_api_key(api_key: Option<String>) -> Result<Self, MeetupError> {
        match api_key {
            Some(api_key) if !api_key.trim().is_empty() => Ok(Self {
                api_key,
                api_root: MEETUP_API_ROOT.to_string(),
                http: reqwest::blocking::Client::new(),
            }),
            _ => Err(MeetupError::MissingApiKey),
        }
    }

    /// Send every request to `api_root` instead of the public Meetup API
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into().trim_end_matches('/').to_string();
        self
    }

    /// Build a signed URL for `path`, with optional extra query parameters
    fn signed_url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut query = format!("sign=true&key={}", urlencoding::encode(&self.api_key));
        for (name, value) in params {
            query.push_str(&format!("&{}={}", name, urlencoding::encode(value)));
        }
        format!(
            "{}/{}?{}",
            self.api_root,
            path.trim_start_matches('/'),
            query
        )
    }

    /// Make a single signed GET request to Meetup and deserialize the body
    fn make_meetup_request<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T, MeetupError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.signed_url(path, params))
            .header("User-Agent", "Meetup Union")
            .header("Accept", "application/json")
            .send()?;

        let status = response.status();
        let content = response.text()?;
        if !status.is_success() {
            return Err(MeetupError::Api {
                status: status.as_u16(),
                message: content,
            });
        }

        Ok(serde_json::from_str::<T>(&content)?)
    }
}

/// Only show the start of the key, enough to tell which one is in use
fn mask_key(key: &str) -> String {
    key.chars().take(4).collect()
}

/// Classify every attendee of `event_id` against the two groups.
///
/// States come back in the order Meetup lists the attendees.
pub fn run_union_audit(
    bootstrap: &Bootstrap,
    own_meetup: &str,
    target_meetup: &str,
    event_id: u64,
    pacing: Pacing,
) -> Result<Vec<Option<Membership>>, MeetupError> {
    println!(
        "{} {} {} {}",
        "I'm going to fetch the attendees of event".yellow(),
        event_id.to_string().white(),
        "from".yellow(),
        own_meetup.white()
    );
    let attendee_ids = attendees::fetch_attendee_ids(bootstrap, own_meetup, event_id)?;
    println!(
        "{} {} {}",
        "Success! I found".green(),
        attendee_ids.len().to_string().white(),
        "attendees".green()
    );

    resolve_memberships(bootstrap, &attendee_ids, own_meetup, target_meetup, pacing)
}

/// Look up the groups of each member, one at a time, and classify them
pub fn resolve_memberships(
    directory: &impl GroupDirectory,
    member_ids: &[MemberId],
    own_meetup: &str,
    target_meetup: &str,
    pacing: Pacing,
) -> Result<Vec<Option<Membership>>, MeetupError> {
    println!(
        "{}",
        "Now I will check which groups each attendee belongs to...".yellow()
    );

    let ten_percent = (member_ids.len() / 10).max(1);
    let mut states = Vec::with_capacity(member_ids.len());

    for (progress, &member_id) in member_ids.iter().enumerate() {
        let urlnames =
            groups::fetch_member_group_urlnames(directory, member_id, pacing.retry_backoff)?;
        sleep(pacing.request_interval);

        states.push(membership::get_membership_state(
            &urlnames,
            own_meetup,
            target_meetup,
        ));

        if (progress + 1) % ten_percent == 0 {
            println!(
                "Processed {}/{} attendees",
                (progress + 1).to_string().blue(),
                member_ids.len()
            );
        }
    }

    Ok(states)
}
