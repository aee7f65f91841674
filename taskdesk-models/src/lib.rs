use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// Shared models for the taskdesk client and the project-management REST API.
// Records are passed through as the server sends them; unknown fields are ignored.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    /// Server timestamp, kept verbatim
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

impl Project {
    /// Comma-separated member names, `"None"` when nobody is assigned.
    pub fn team_members_label(&self) -> String {
        if self.team_members.is_empty() {
            return "None".to_string();
        }
        self.team_members
            .iter()
            .map(|member| member.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub priority_reasoning: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<f64>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "skills_list")]
    pub required_skills: Option<Vec<String>>,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub assigned_to_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Task {
    pub fn skills_label(&self) -> String {
        join_or_none(self.required_skills.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "skills_list")]
    pub skills: Option<Vec<String>>,
}

impl TeamMember {
    pub fn skills_label(&self) -> String {
        join_or_none(self.skills.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
}

/// `role` is always serialized, as `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTeamMemberRequest {
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiQuestion {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnswer {
    pub answer: String,
}

/// Result of a prioritize call. The server answers with the whole updated task;
/// only the priority fields are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedTask {
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub priority_reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSuggestions {
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub summary: String,
    /// Metric name to value, in server order
    #[serde(default)]
    pub key_metrics: Map<String, Value>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ProjectReport {
    /// `"name: value"` lines; string values are shown without quotes.
    pub fn metric_lines(&self) -> Vec<String> {
        self.key_metrics
            .iter()
            .map(|(name, value)| match value {
                Value::String(text) => format!("{}: {}", name, text),
                other => format!("{}: {}", name, other),
            })
            .collect()
    }
}

/// Split a comma-separated skills field into trimmed, non-empty entries.
pub fn parse_skills(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_or_none(items: Option<&[String]>) -> String {
    match items {
        Some(items) if !items.is_empty() => items.join(", "),
        _ => "None".to_string(),
    }
}

// The API stores skill lists as JSON text and does not always decode them
// before answering, so accept an array, a JSON-encoded array, or a comma list.
fn skills_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::List(skills)) => Some(skills),
        Some(Raw::Text(text)) => match serde_json::from_str::<Vec<String>>(&text) {
            Ok(skills) => Some(skills),
            Err(_) => Some(parse_skills(&text)),
        },
    })
}
