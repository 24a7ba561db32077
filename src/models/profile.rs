use serde::{Deserialize, Serialize};

/// How many generations separate a member from the homeland.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    RecentArrival,
    FirstGeneration,
    SecondGeneration,
    ThirdGeneration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionStyle {
    Expressive,
    Reserved,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialStyle {
    FamilyOriented,
    CommunityActive,
    ProfessionalFocused,
    CulturalImmersive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStyle {
    Formal,
    Casual,
    Warm,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStyle {
    Intellectual,
    Emotional,
    Practical,
    Humorous,
}

/// Heritage section: where a member's roots are and how strongly they hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeritageProfile {
    /// Origin regions in the homeland (e.g. "norte", "lisboa", "acores").
    pub origin_regions: Vec<String>,
    pub generation: Generation,
    /// 0-100: how strongly ancestral culture shapes identity.
    pub heritage_strength: u8,
    pub cultural_practices: Vec<String>,
    /// 0-10 fluency in the heritage language.
    pub primary_fluency: u8,
    /// 0-10 fluency in the local language.
    pub secondary_fluency: u8,
    pub dialects: Vec<String>,
}

/// Emotional section: the saudade dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalProfile {
    pub emotional_connection: u8,
    pub homeland_attachment: u8,
    pub nostalgia_level: u8,
    pub expression_style: ExpressionStyle,
    pub music_affinities: Vec<String>,
    pub tradition_importance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleProfile {
    pub social_style: SocialStyle,
    pub event_interests: Vec<String>,
    pub relationship_goals: Vec<String>,
    pub communication_style: CommunicationStyle,
    pub family_values: u8,
    pub community_involvement: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalProfile {
    /// Cultural zone of residence (see `core::geography::zone_table`).
    pub residence_zone: String,
    pub preferred_meeting_zones: Vec<String>,
    /// 0-100 willingness to travel for meetups.
    pub travel_willingness: u8,
    pub venue_affiliations: Vec<String>,
    pub institution_affiliations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedInsights {
    pub personality_type: String,
    pub compatibility_factors: Vec<String>,
    pub conversation_style: ConversationStyle,
    pub relationship_readiness: u8,
    pub growth_potential: u8,
    pub community_influence: u8,
}

/// Fully resolved member profile. Every bounded score is already clamped to
/// [0,100] and every categorical field carries a concrete value, so the
/// extractors never have to reason about missing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityProfile {
    #[serde(rename = "memberId")]
    pub member_id: String,
    pub heritage: HeritageProfile,
    pub emotional: EmotionalProfile,
    pub lifestyle: LifestyleProfile,
    pub regional: RegionalProfile,
    pub insights: DerivedInsights,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "isVerified", default)]
    pub is_verified: bool,
    /// Not scored; carried only so the candidate filter can apply age ranges.
    #[serde(default)]
    pub age: Option<u8>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_true() -> bool {
    true
}

impl CompatibilityProfile {
    /// Profile completeness 0-100, used when deriving recommendation
    /// confidence: six 15-point section checks plus a 10-point base.
    pub fn completeness(&self) -> u8 {
        let mut score = 10u8;
        if !self.heritage.origin_regions.is_empty() {
            score += 15;
        }
        if self.heritage.heritage_strength > 0 {
            score += 15;
        }
        if self.emotional.emotional_connection > 0 {
            score += 15;
        }
        if !self.lifestyle.event_interests.is_empty() {
            score += 15;
        }
        if !self.regional.residence_zone.is_empty() {
            score += 15;
        }
        if !self.insights.personality_type.is_empty() {
            score += 15;
        }
        score.min(100)
    }
}

/// A profile as it exists in the store: any section may be absent. The
/// presentation layer upserts whatever it has collected so far.
///
/// `into_profile` is the single, total mapping from stored data to a scorable
/// profile: one resolution per field, always producing a value. Defaults are
/// neutral mid-range values chosen so an unfilled section neither boosts nor
/// tanks a pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(rename = "memberId")]
    pub member_id: String,
    #[serde(default)]
    pub heritage: Option<HeritageProfile>,
    #[serde(default)]
    pub emotional: Option<EmotionalProfile>,
    #[serde(default)]
    pub lifestyle: Option<LifestyleProfile>,
    #[serde(default)]
    pub regional: Option<RegionalProfile>,
    #[serde(default)]
    pub insights: Option<DerivedInsights>,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "isVerified", default)]
    pub is_verified: bool,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

// Hand-written so `is_active` matches the serde default: a freshly built
// document must be visible to the candidate query.
impl Default for ProfileDocument {
    fn default() -> Self {
        Self {
            member_id: String::new(),
            heritage: None,
            emotional: None,
            lifestyle: None,
            regional: None,
            insights: None,
            is_active: true,
            is_verified: false,
            age: None,
            latitude: None,
            longitude: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl ProfileDocument {
    /// All five sections present. A requester must pass this before
    /// `find_matches` runs; candidates fall back to defaults instead.
    pub fn is_complete(&self) -> bool {
        self.heritage.is_some()
            && self.emotional.is_some()
            && self.lifestyle.is_some()
            && self.regional.is_some()
            && self.insights.is_some()
    }

    pub fn into_profile(self) -> CompatibilityProfile {
        let heritage = self.heritage.map(clamp_heritage).unwrap_or_else(default_heritage);
        let emotional = self.emotional.map(clamp_emotional).unwrap_or_else(default_emotional);
        let lifestyle = self.lifestyle.map(clamp_lifestyle).unwrap_or_else(default_lifestyle);
        let regional = self.regional.map(clamp_regional).unwrap_or_else(default_regional);
        let insights = self.insights.map(clamp_insights).unwrap_or_else(default_insights);

        CompatibilityProfile {
            member_id: self.member_id,
            heritage,
            emotional,
            lifestyle,
            regional,
            insights,
            is_active: self.is_active,
            is_verified: self.is_verified,
            age: self.age,
            // Stockwell, the historic heart of the community catchment.
            latitude: self.latitude.unwrap_or(51.4646),
            longitude: self.longitude.unwrap_or(-0.1227),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<CompatibilityProfile> for ProfileDocument {
    fn from(p: CompatibilityProfile) -> Self {
        ProfileDocument {
            member_id: p.member_id,
            heritage: Some(p.heritage),
            emotional: Some(p.emotional),
            lifestyle: Some(p.lifestyle),
            regional: Some(p.regional),
            insights: Some(p.insights),
            is_active: p.is_active,
            is_verified: p.is_verified,
            age: p.age,
            latitude: Some(p.latitude),
            longitude: Some(p.longitude),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

fn clamp_score(v: u8) -> u8 {
    v.min(100)
}

fn clamp_fluency(v: u8) -> u8 {
    v.min(10)
}

fn clamp_heritage(mut h: HeritageProfile) -> HeritageProfile {
    h.heritage_strength = clamp_score(h.heritage_strength);
    h.primary_fluency = clamp_fluency(h.primary_fluency);
    h.secondary_fluency = clamp_fluency(h.secondary_fluency);
    if h.origin_regions.is_empty() {
        h.origin_regions = vec!["lisboa".to_string()];
    }
    h
}

fn clamp_emotional(mut e: EmotionalProfile) -> EmotionalProfile {
    e.emotional_connection = clamp_score(e.emotional_connection);
    e.homeland_attachment = clamp_score(e.homeland_attachment);
    e.nostalgia_level = clamp_score(e.nostalgia_level);
    e.tradition_importance = clamp_score(e.tradition_importance);
    e
}

fn clamp_lifestyle(mut l: LifestyleProfile) -> LifestyleProfile {
    l.family_values = clamp_score(l.family_values);
    l.community_involvement = clamp_score(l.community_involvement);
    l
}

fn clamp_regional(mut r: RegionalProfile) -> RegionalProfile {
    r.travel_willingness = clamp_score(r.travel_willingness);
    if r.residence_zone.is_empty() {
        r.residence_zone = "stockwell_vauxhall".to_string();
    }
    r
}

fn clamp_insights(mut i: DerivedInsights) -> DerivedInsights {
    i.relationship_readiness = clamp_score(i.relationship_readiness);
    i.growth_potential = clamp_score(i.growth_potential);
    i.community_influence = clamp_score(i.community_influence);
    i
}

fn default_heritage() -> HeritageProfile {
    HeritageProfile {
        origin_regions: vec!["lisboa".to_string()],
        generation: Generation::SecondGeneration,
        heritage_strength: 70,
        cultural_practices: vec![
            "fado".to_string(),
            "cuisine".to_string(),
            "family_gatherings".to_string(),
        ],
        primary_fluency: 5,
        secondary_fluency: 8,
        dialects: vec!["standard".to_string()],
    }
}

fn default_emotional() -> EmotionalProfile {
    EmotionalProfile {
        emotional_connection: 70,
        homeland_attachment: 60,
        nostalgia_level: 65,
        expression_style: ExpressionStyle::Balanced,
        music_affinities: vec!["folk".to_string()],
        tradition_importance: 70,
    }
}

fn default_lifestyle() -> LifestyleProfile {
    LifestyleProfile {
        social_style: SocialStyle::CommunityActive,
        event_interests: vec!["cultural_events".to_string(), "social_gatherings".to_string()],
        relationship_goals: vec![
            "long_term_relationship".to_string(),
            "cultural_connection".to_string(),
        ],
        communication_style: CommunicationStyle::Warm,
        family_values: 85,
        community_involvement: 70,
    }
}

fn default_regional() -> RegionalProfile {
    RegionalProfile {
        residence_zone: "stockwell_vauxhall".to_string(),
        preferred_meeting_zones: vec!["stockwell_vauxhall".to_string()],
        travel_willingness: 75,
        venue_affiliations: vec!["instituto_camoes".to_string()],
        institution_affiliations: vec![],
    }
}

fn default_insights() -> DerivedInsights {
    DerivedInsights {
        personality_type: "cultural_connector".to_string(),
        compatibility_factors: vec![
            "cultural_heritage".to_string(),
            "family_values".to_string(),
            "community_connection".to_string(),
        ],
        conversation_style: ConversationStyle::Emotional,
        relationship_readiness: 75,
        growth_potential: 70,
        community_influence: 60,
    }
}
