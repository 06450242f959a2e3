use serde::{Deserialize, Serialize};

use super::ArticleId;

/// The policy that produced a recommendation list, serialized as 1..=5
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "u8", try_from = "u8")]
pub enum Strategy {
    /// No interactions: most clicked articles
    Popular = 1,
    /// One interaction on a popular article: the other popular articles
    PopularExcludingRead = 2,
    /// One interaction outside the popular set: same cluster, similar size
    SingleClickContent = 3,
    /// Several interactions, all in one cluster
    SingleCluster = 4,
    /// Several interactions across clusters, most engaged cluster first
    MultiCluster = 5,
}

impl From<Strategy> for u8 {
    fn from(strategy: Strategy) -> Self {
        strategy as u8
    }
}

impl TryFrom<u8> for Strategy {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Strategy::Popular),
            2 => Ok(Strategy::PopularExcludingRead),
            3 => Ok(Strategy::SingleClickContent),
            4 => Ok(Strategy::SingleCluster),
            5 => Ok(Strategy::MultiCluster),
            other => Err(format!("unknown strategy {}", other)),
        }
    }
}

/// Ranked article ids for a user and the strategy that produced them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    #[serde(rename = "recommendations")]
    pub article_ids: Vec<ArticleId>,
    pub strategy: Strategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_wire_format() {
        let rec = Recommendation {
            article_ids: vec![3, 1],
            strategy: Strategy::SingleCluster,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"recommendations":[3,1],"strategy":4}"#);
    }

    #[test]
    fn test_strategy_rejects_out_of_range() {
        assert!(serde_json::from_str::<Strategy>("0").is_err());
        assert_eq!(serde_json::from_str::<Strategy>("2").unwrap(), Strategy::PopularExcludingRead);
    }
}
