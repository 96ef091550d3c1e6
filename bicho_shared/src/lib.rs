use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinRequest {
    pub bet: f64,
}

/// Body returned by the `/rodar` endpoint.
///
/// Every field is optional on the wire: a response without `grid` is treated
/// by the client the same way as a failed request.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SpinResponse {
    #[serde(default)]
    pub grid: Option<Vec<Vec<String>>>, // grid[reel][row]
    #[serde(default, deserialize_with = "lenient_amount")]
    pub balance_player: Option<f64>,
    #[serde(default)]
    pub wins: Option<Vec<WinLine>>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub win: Option<f64>,
}

impl SpinResponse {
    /// Grid to display, if the server sent a non-empty one.
    pub fn grid(&self) -> Option<&Vec<Vec<String>>> {
        self.grid.as_ref().filter(|g| !g.is_empty())
    }

    pub fn wins(&self) -> &[WinLine] {
        self.wins.as_deref().unwrap_or(&[])
    }

    pub fn win_amount(&self) -> f64 {
        self.win.filter(|w| w.is_finite()).unwrap_or(0.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WinLine {
    /// `[reel, row]` pairs.
    #[serde(default)]
    pub positions: Vec<[usize; 2]>,
}

// The server reports money either as a JSON number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Amount> = Option::deserialize(deserializer)?;
    let amount = match raw {
        Some(Amount::Number(n)) => Some(n),
        Some(Amount::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };
    // "NaN" and "inf" parse as f64 but are not money.
    Ok(amount.filter(|n| n.is_finite()))
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid response: {0}")]
    Invalid(String),
    #[error("server returned status {0}")]
    Status(u16),
}
