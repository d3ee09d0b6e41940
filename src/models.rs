use serde::{Deserialize, Serialize};

// --- Domain types ---

/// Normalized weather summary: current conditions plus up to five
/// representative forecast days. Built fresh for every consumer, never
/// cached between the display fetch and the pre-analysis fetch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub days: Vec<DayForecast>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub humidity_percent: u8,
    pub condition: String,
    pub description: String,
    pub observed_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    pub day_label: String,
    pub temperature_c: f64,
    pub humidity_percent: u8,
    pub condition: String,
}

/// The structured answer the model is asked to produce. Every section is
/// optional so a partial response still renders; `error` present means the
/// image was declined, not identified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantReport {
    pub name: Option<String>,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
    pub health_analysis: Option<String>,
    pub health_overview: Option<HealthOverview>,
    pub potential_health_conditions: Option<Vec<HealthCondition>>,
    pub plant_care: Option<CareGuide>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOverview {
    #[serde(default)]
    pub overall_health: u8,
    #[serde(default)]
    pub watering_needs: u8,
    #[serde(default)]
    pub light_exposure: u8,
    pub temperature_suitability: Option<String>,
    pub humidity_suitability: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCondition {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub possible_causes: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareGuide {
    #[serde(default)]
    pub watering: Vec<String>,
    #[serde(default)]
    pub light: Vec<String>,
    #[serde(default)]
    pub humidity: Vec<String>,
    #[serde(default)]
    pub temperature: Vec<String>,
    #[serde(default)]
    pub fertilization: Vec<String>,
    #[serde(default)]
    pub soil: Vec<String>,
    #[serde(default)]
    pub forecast: Vec<String>,
}

// --- OpenWeather API types ---

/// 5-day/3-hour forecast payload, ~40 entries.
#[derive(Debug, Deserialize)]
pub struct ForecastPayload {
    pub list: Vec<ForecastEntry>,
    #[serde(default)]
    pub city: Option<CityInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: EntryMain,
    pub weather: Vec<EntryWeather>,
    #[serde(default)]
    pub dt_txt: String,
}

#[derive(Debug, Deserialize)]
pub struct EntryMain {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub struct EntryWeather {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CityInfo {
    // Shift in seconds from UTC.
    #[serde(default)]
    pub timezone: i64,
}

// --- Gemini API types ---

#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
pub struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    pub content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidateContent {
    #[serde(default)]
    pub parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponsePart {
    pub text: String,
}
