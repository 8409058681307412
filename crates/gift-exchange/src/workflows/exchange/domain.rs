use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered participants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

/// Matching pool a participant belongs to. Pools are drawn independently:
/// a child can never give to or receive from an adult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupTag {
    Adult,
    Child,
}

impl GroupTag {
    pub const fn label(self) -> &'static str {
        match self {
            GroupTag::Adult => "adult",
            GroupTag::Child => "child",
        }
    }
}

impl Default for GroupTag {
    fn default() -> Self {
        GroupTag::Adult
    }
}

/// Inbound signup payload collected from the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub pin: String,
    #[serde(default)]
    pub group: GroupTag,
    #[serde(default)]
    pub partner: Option<ParticipantId>,
    #[serde(default)]
    pub food_preference: Option<String>,
    #[serde(default)]
    pub fun_fact: Option<String>,
}

/// Validated participant data as stored at signup. The partner link is a
/// symmetric exclusion, not ownership: it is honored in both directions no
/// matter which of the two records carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    pub id: ParticipantId,
    pub name: String,
    pub pin: String,
    pub group: GroupTag,
    pub partner: Option<ParticipantId>,
    pub food_preference: Option<String>,
    pub fun_fact: Option<String>,
}

/// The reduction of a participant the draw engine is allowed to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCandidate {
    pub id: ParticipantId,
    pub partner: Option<ParticipantId>,
    pub group: GroupTag,
}

/// Roster entry safe for unauthenticated viewers: no PIN, no partner link,
/// no assignment.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub name: String,
    pub group: &'static str,
    pub revealed: bool,
}

/// What a verified giver learns about their recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientView {
    pub id: ParticipantId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fun_fact: Option<String>,
}

/// Deployment-wide event configuration. The draw engine only ever touches
/// `draw_complete`; deadline and budget belong to the admin surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSettings {
    pub deadline: NaiveDate,
    pub budget: u32,
    pub draw_complete: bool,
}

/// Externally observable draw state. The transient in-memory generation
/// phase is deliberately absent: until a commit fully succeeds the state
/// stays `NotDrawn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawStatus {
    NotDrawn,
    Drawn,
}

impl DrawStatus {
    pub const fn from_flag(draw_complete: bool) -> Self {
        if draw_complete {
            DrawStatus::Drawn
        } else {
            DrawStatus::NotDrawn
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DrawStatus::NotDrawn => "not_drawn",
            DrawStatus::Drawn => "drawn",
        }
    }
}

/// Snapshot of the event returned by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeStatusView {
    pub status: &'static str,
    pub draw_complete: bool,
    pub participants: usize,
    pub deadline: NaiveDate,
    pub budget: u32,
}
