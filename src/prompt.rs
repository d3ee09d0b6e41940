use crate::models::WeatherSnapshot;

/// Fixed instruction block. Only the weather section below it varies.
const PLANT_PROMPT: &str = r#"Identify the plant species in the photo, analyze its health, and provide care recommendations.
Respond with ONLY a JSON object in exactly this format:
{
  "name": "Plant name",
  "scientificName": "Scientific name",
  "description": "Short description about the plant",
  "healthAnalysis": "Detected health issues, diseases, or deficiencies",
  "healthOverview": {
    "overallHealth": <0-100>,
    "wateringNeeds": <0-100>,
    "lightExposure": <0-100>,
    "temperatureSuitability": "<Poor/Fair/Good/Excellent>",
    "humiditySuitability": "<Poor/Fair/Good/Excellent>"
  },
  "potentialHealthConditions": [
    {
      "title": "Condition name",
      "possibleCauses": ["First cause", "Second cause"],
      "solutions": ["First solution", "Second solution"]
    }
  ],
  "plantCare": {
    "watering": ["Watering tip"],
    "light": ["Light tip"],
    "humidity": ["Humidity tip"],
    "temperature": ["Temperature tip"],
    "fertilization": ["Fertilization tip"],
    "soil": ["Soil tip"],
    "forecast": ["Care tip based on the forecast below"]
  }
}
If the image does not show a plant, respond instead with:
{ "error": "Short explanation of why the image could not be analyzed" }
"#;

/// Fixed instruction template plus the rendered weather section.
pub fn build_prompt(snapshot: &WeatherSnapshot) -> String {
    let mut prompt = String::from(PLANT_PROMPT);

    prompt.push_str("\nLocal weather conditions:\n");
    prompt.push_str(&format!(
        "Current: {}, {}°C, {}% humidity (as of {})\n",
        snapshot.current.description,
        snapshot.current.temperature_c.round(),
        snapshot.current.humidity_percent,
        snapshot.current.observed_at,
    ));

    for day in &snapshot.days {
        prompt.push_str(&format!(
            "{}: {}, {}°C, {}% humidity\n",
            day.day_label,
            day.condition,
            day.temperature_c.round(),
            day.humidity_percent,
        ));
    }

    prompt.push_str("Tailor the care recommendations to these conditions.\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentConditions, DayForecast};

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            current: CurrentConditions {
                temperature_c: 21.6,
                humidity_percent: 48,
                condition: "Clear".to_string(),
                description: "clear sky".to_string(),
                observed_at: "2024-05-01 12:00:00".to_string(),
            },
            days: vec![DayForecast {
                day_label: "Thu".to_string(),
                temperature_c: 24.4,
                humidity_percent: 61,
                condition: "Rain".to_string(),
            }],
        }
    }

    #[test]
    fn starts_with_the_fixed_template() {
        let prompt = build_prompt(&snapshot());
        assert!(prompt.starts_with(PLANT_PROMPT));
    }

    #[test]
    fn renders_current_conditions_with_rounded_degrees() {
        let prompt = build_prompt(&snapshot());
        assert!(prompt.contains("Current: clear sky, 22°C, 48% humidity (as of 2024-05-01 12:00:00)"));
    }

    #[test]
    fn renders_one_line_per_forecast_day() {
        let prompt = build_prompt(&snapshot());
        assert!(prompt.contains("Thu: Rain, 24°C, 61% humidity"));
    }

    #[test]
    fn asks_for_the_error_field_on_non_plant_images() {
        assert!(PLANT_PROMPT.contains(r#""error""#));
    }
}
