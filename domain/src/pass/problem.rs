//! Problem: the classified form of a command.

use serde::{Deserialize, Serialize};

/// Category a command falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    Query,
    Task,
    Creation,
    Analysis,
    Deployment,
    Communication,
}

impl ProblemType {
    pub const ALL: [ProblemType; 6] = [
        ProblemType::Query,
        ProblemType::Task,
        ProblemType::Creation,
        ProblemType::Analysis,
        ProblemType::Deployment,
        ProblemType::Communication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::Query => "query",
            ProblemType::Task => "task",
            ProblemType::Creation => "creation",
            ProblemType::Analysis => "analysis",
            ProblemType::Deployment => "deployment",
            ProblemType::Communication => "communication",
        }
    }
}

impl std::str::FromStr for ProblemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProblemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Invalid ProblemType: {}", s))
    }
}

impl std::fmt::Display for ProblemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

impl std::str::FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            "critical" => Ok(Urgency::Critical),
            _ => Err(format!("Invalid Urgency: {}", s)),
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rough size of a command, also used as the solution's complexity estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Simple,
    Moderate,
    Complex,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Simple => "simple",
            Scope::Moderate => "moderate",
            Scope::Complex => "complex",
        }
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Scope::Simple),
            "moderate" => Ok(Scope::Moderate),
            "complex" => Ok(Scope::Complex),
            _ => Err(format!("Invalid Scope: {}", s)),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified command. Derived once per command and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    /// The original command text.
    pub intent: String,
    pub entities: Vec<String>,
    pub urgency: Urgency,
    pub scope: Scope,
}
