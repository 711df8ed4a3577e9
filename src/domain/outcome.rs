use std::fmt::Formatter;

/// The BigMarker resource a submission is relayed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Channel,
    Conference,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Channel => write!(f, "channel"),
            Target::Conference => write!(f, "conference"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Delivery {
    /// `reference` is the subscriber id or conference url BigMarker handed back,
    /// `stored` tells whether it was written to the acting user's profile.
    Delivered {
        reference: Option<String>,
        stored: bool,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TargetResult {
    pub target: Target,
    #[serde(flatten)]
    pub delivery: Delivery,
}

/// Result of relaying one submission; empty when nothing was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RelayOutcome {
    pub results: Vec<TargetResult>,
}

impl RelayOutcome {
    pub fn record(&mut self, target: Target, delivery: Delivery) {
        self.results.push(TargetResult { target, delivery });
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, target: Target) -> Option<&Delivery> {
        self.results
            .iter()
            .find(|result| result.target == target)
            .map(|result| &result.delivery)
    }

    pub fn errors(&self) -> impl Iterator<Item = (Target, &str)> {
        self.results.iter().filter_map(|result| match &result.delivery {
            Delivery::Failed { error } => Some((result.target, error.as_str())),
            Delivery::Delivered { .. } => None,
        })
    }
}
