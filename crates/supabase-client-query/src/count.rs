use std::fmt;
use std::str::FromStr;

use reqwest::header::HeaderMap;

use supabase_client_core::{SupabaseError, SupabaseResult, UNKNOWN_COUNT};

/// Counting strategy requested through the `Prefer: count=...` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountMode {
    /// No count requested.
    #[default]
    None,
    /// `count=exact`: exact `COUNT(*)`, slow on large tables.
    Exact,
    /// `count=planned`: the planner's row estimate.
    Planned,
    /// `count=estimated`: exact below the server's threshold, planned above.
    Estimated,
}

impl CountMode {
    /// Value for the `Prefer` header, or `None` when no count is requested.
    pub fn prefer_value(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Exact => Some("count=exact"),
            Self::Planned => Some("count=planned"),
            Self::Estimated => Some("count=estimated"),
        }
    }

    pub fn is_requested(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for CountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, ""),
            Self::Exact => write!(f, "exact"),
            Self::Planned => write!(f, "planned"),
            Self::Estimated => write!(f, "estimated"),
        }
    }
}

impl FromStr for CountMode {
    type Err = SupabaseError;

    /// Parses `""`, `"exact"`, `"planned"` and `"estimated"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "exact" => Ok(Self::Exact),
            "planned" => Ok(Self::Planned),
            "estimated" => Ok(Self::Estimated),
            other => Err(SupabaseError::config(format!("Unknown count mode '{other}'"))),
        }
    }
}

/// Recover the row count from a PostgREST response.
///
/// PostgREST reports counts in `Content-Range: <start>-<end>/<total>` (or
/// `*/<total>` for empty ranges). A total of `*` means the count was not
/// computed. Returns `-1` when `mode` is [`CountMode::None`], when the header
/// is absent, or when the total is `*`. A header that is present but
/// malformed is a [`SupabaseError::Decode`].
pub fn extract_count(headers: &HeaderMap, mode: CountMode) -> SupabaseResult<i64> {
    if !mode.is_requested() {
        return Ok(UNKNOWN_COUNT);
    }

    let Some(value) = headers.get("content-range") else {
        return Ok(UNKNOWN_COUNT);
    };

    let raw = value
        .to_str()
        .map_err(|_| SupabaseError::decode("Content-Range header is not valid ASCII"))?;

    let (_, total) = raw
        .rsplit_once('/')
        .ok_or_else(|| SupabaseError::decode(format!("Malformed Content-Range header '{raw}'")))?;

    let total = total.trim();
    if total == "*" {
        return Ok(UNKNOWN_COUNT);
    }

    let parsed: u64 = total.parse().map_err(|_| {
        SupabaseError::decode(format!("Malformed Content-Range total in '{raw}'"))
    })?;
    i64::try_from(parsed)
        .map_err(|_| SupabaseError::decode(format!("Content-Range total out of range in '{raw}'")))
}
