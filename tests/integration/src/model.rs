//! Sample match-storage service model.
//!
//! A minimal stand-in for generated per-service code: three operations over
//! a match archive, each implementing [`Operation`] by hand the way a code
//! generator would emit it.

use http::Method;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use stratus_model::{MarshalError, Operation, UnmarshalError, WireRequest, WireResponse};

/// One stored match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Caller-assigned match id.
    pub id: String,
    /// White player.
    pub white: String,
    /// Black player.
    pub black: String,
    /// Winner, if the match is decided.
    #[serde(default)]
    pub winner: Option<String>,
}

/// Store a match.
#[derive(Debug)]
pub struct PutMatch;

/// Response to [`PutMatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutMatchOutput {
    /// Id of the stored match.
    pub id: String,
    /// Monotonic revision assigned by the service.
    pub revision: u64,
}

impl Operation for PutMatch {
    type Input = MatchRecord;
    type Output = PutMatchOutput;

    const NAME: &'static str = "PutMatch";

    fn marshall(input: &Self::Input) -> Result<WireRequest, MarshalError> {
        if input.id.is_empty() {
            return Err(MarshalError::Invalid("match id must not be empty".to_owned()));
        }
        let mut request = WireRequest::new(Self::NAME, Method::POST, "/matches");
        request.set_header("content-type", "application/json")?;
        request.set_body(serde_json::to_vec(input)?);
        Ok(request)
    }

    fn unmarshall(response: &WireResponse) -> Result<Self::Output, UnmarshalError> {
        Ok(serde_json::from_slice(response.body())?)
    }
}

/// Fetch one match by id.
#[derive(Debug)]
pub struct GetMatch;

/// Input to [`GetMatch`].
#[derive(Debug, Clone)]
pub struct GetMatchInput {
    /// Id of the match to fetch.
    pub id: String,
}

/// Response to [`GetMatch`]. An absent record is a valid outcome when the
/// caller suppresses not-found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetMatchOutput {
    /// The stored match, if it exists.
    pub record: Option<MatchRecord>,
}

impl Operation for GetMatch {
    type Input = GetMatchInput;
    type Output = GetMatchOutput;

    const NAME: &'static str = "GetMatch";

    fn marshall(input: &Self::Input) -> Result<WireRequest, MarshalError> {
        let id = utf8_percent_encode(&input.id, NON_ALPHANUMERIC).to_string();
        Ok(WireRequest::new(
            Self::NAME,
            Method::GET,
            format!("/matches/{id}"),
        ))
    }

    fn unmarshall(response: &WireResponse) -> Result<Self::Output, UnmarshalError> {
        if response.body().is_empty() {
            return Ok(Self::Output::default());
        }
        Ok(Self::Output {
            record: Some(serde_json::from_slice(response.body())?),
        })
    }
}

/// List stored matches, optionally filtered by player.
#[derive(Debug)]
pub struct ListMatches;

/// Input to [`ListMatches`].
#[derive(Debug, Clone, Default)]
pub struct ListMatchesInput {
    /// Only matches involving this player.
    pub player: Option<String>,
    /// Maximum number of matches to return.
    pub limit: Option<u32>,
}

/// Response to [`ListMatches`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMatchesOutput {
    /// Matches in insertion order.
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

impl Operation for ListMatches {
    type Input = ListMatchesInput;
    type Output = ListMatchesOutput;

    const NAME: &'static str = "ListMatches";

    fn marshall(input: &Self::Input) -> Result<WireRequest, MarshalError> {
        let mut request = WireRequest::new(Self::NAME, Method::GET, "/matches");
        if let Some(player) = &input.player {
            let player = utf8_percent_encode(player, NON_ALPHANUMERIC).to_string();
            request.add_query("player", player);
        }
        if let Some(limit) = input.limit {
            request.add_query("limit", limit.to_string());
        }
        Ok(request)
    }

    fn unmarshall(response: &WireResponse) -> Result<Self::Output, UnmarshalError> {
        Ok(serde_json::from_slice(response.body())?)
    }
}
