use std::env;

const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/forecast";

pub struct Config {
    pub gemini_api_key: String,
    pub gemini_endpoint: String,
    pub weather_api_key: String,
    pub weather_endpoint: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set"),
            gemini_endpoint: env::var("GEMINI_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GEMINI_ENDPOINT.to_string()),
            weather_api_key: env::var("OPENWEATHER_API_KEY")
                .expect("OPENWEATHER_API_KEY must be set"),
            weather_endpoint: env::var("OPENWEATHER_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_WEATHER_ENDPOINT.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
        }
    }
}
